// src/codegen/mod.rs

//! # 코드 생성
//!
//! 파라미터 목록과 워드 폭으로부터 `encode`/`decode` 셰이더 함수 텍스트를 만들고,
//! 완성된 텍스트를 출력 대상(`CodeSink`)에 한 번에 씁니다.
pub mod emitter;
pub mod options;
pub mod sink;

pub use emitter::Emitter;
pub use options::EmitOptions;
pub use sink::{CodeSink, IoSink, LogSink};

use crate::error::Result;
use crate::packing::planner::plan;
use crate::packing::types::Parameter;

/// 계획 → 양자화 검증 → 조립/분해 → 출력 전체 파이프라인.
/// 실패하면 부분 결과 없이 에러만 반환합니다.
pub fn generate_code(parameters: &[Parameter], word_width: u32, options: &EmitOptions) -> Result<String> {
    let plan = plan(parameters, word_width)?;
    let code = Emitter::new(parameters, &plan, options)?.emit()?;
    log::debug!(
        "generated {} lines for {} parameters",
        code.lines().count(),
        parameters.len()
    );
    Ok(code)
}

pub fn generate_to<S: CodeSink + ?Sized>(
    sink: &mut S,
    parameters: &[Parameter],
    word_width: u32,
    options: &EmitOptions,
) -> Result<()> {
    let code = generate_code(parameters, word_width, options)?;
    sink.write_code(&code)
}
