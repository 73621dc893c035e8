// src/packing/mod.rs

//! # 비트 패킹 코어
//!
//! 경계가 있는 실수 파라미터들을 최소 개수의 고정 폭 워드에 담는 레이아웃을 계획하고,
//! 그 역변환을 위한 연산 목록을 만듭니다.
//!
//! 흐름: 파라미터 모델 → 레이아웃 계획 → {양자화, 워드 조립, 워드 분해} → 코드 생성.
//! 코어(`planner`, `codec`, `assembler`, `disassembler`)는 부수 효과가 없는 순수 함수입니다.
pub mod assembler;
pub mod batch;
pub mod codec;
pub mod disassembler;
pub mod model;
pub mod planner;
pub mod types;

pub use assembler::{assemble, pack, Combine, Shift, WordBuildOp, WordProgram};
pub use batch::BatchCodec;
pub use codec::QuantizationRange;
pub use disassembler::{disassemble, unpack, ChunkOp, ParameterProgram};
pub use model::{ParameterModel, ParameterUpdate};
pub use planner::plan;
pub use types::{Offset, Parameter, ParameterId, Plan};

#[cfg(test)]
mod __test__;
