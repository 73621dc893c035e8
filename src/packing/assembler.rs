// src/packing/assembler.rs

//! # 워드 조립
//!
//! 양자화된 코드들을 출력 워드로 합치는 시프트/OR 연산 목록을 만듭니다.
//! 워드 `i`의 구간 `[i*W, (i+1)*W)`와 겹치는 파라미터마다 연산이 하나씩 생기며,
//! 여러 워드에 걸친 파라미터는 뒤쪽 워드에서 오른쪽 시프트로 꼬리 비트만 들어갑니다.

use super::types::{low_mask, Plan};
use crate::error::{PackError, Result};

/// 코드에 적용할 시프트
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shift {
    None,
    Left(u32),
    Right(u32),
}

impl Shift {
    /// `from - i*W` 값으로부터 시프트 방향 결정
    pub fn from_amount(amount: i64) -> Self {
        match amount {
            0 => Shift::None,
            n if n > 0 => Shift::Left(n as u32),
            n => Shift::Right(n.unsigned_abs() as u32),
        }
    }

    #[inline]
    pub fn apply(self, value: u32) -> u32 {
        match self {
            Shift::None => value,
            Shift::Left(n) => value << n,
            Shift::Right(n) => value >> n,
        }
    }
}

/// 워드에 값을 대입할지 OR로 합칠지
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combine {
    Assign,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordBuildOp {
    pub word: usize,
    pub parameter: usize,
    pub shift: Shift,
    pub combine: Combine,
}

/// 한 워드를 만드는 연산 묶음
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordProgram {
    pub word: usize,
    pub ops: Vec<WordBuildOp>,
}

/// 워드 인덱스 순, 워드 내부는 레이아웃 순으로 연산 목록을 생성합니다.
pub fn assemble(plan: &Plan) -> Vec<WordProgram> {
    (0..plan.word_count)
        .map(|word| {
            let (start, _) = plan.word_window(word);
            let ops = plan
                .overlapping(word)
                .enumerate()
                .map(|(n, offset)| {
                    let op = WordBuildOp {
                        word,
                        parameter: offset.parameter,
                        shift: Shift::from_amount(offset.from as i64 - start as i64),
                        combine: if n == 0 { Combine::Assign } else { Combine::Or },
                    };
                    log::trace!("{:?}", op);
                    op
                })
                .collect();
            WordProgram { word, ops }
        })
        .collect()
}

/// 연산 목록을 실행하여 실제 워드 값을 계산합니다.
///
/// 각 코드는 자신의 비트 길이로, 각 워드는 워드 폭으로 마스킹됩니다.
pub fn pack(plan: &Plan, codes: &[u32]) -> Result<Vec<u32>> {
    if codes.len() != plan.parameter_count() {
        return Err(PackError::ValueCountMismatch {
            expected: plan.parameter_count(),
            actual: codes.len(),
        });
    }
    let mut words = vec![0u32; plan.word_count];
    run_programs(plan, &assemble(plan), codes, &mut words);
    Ok(words)
}

/// 검증이 끝난 입력에 대해 미리 만든 연산 목록을 실행 (배치 경로에서 재사용)
pub(crate) fn run_programs(plan: &Plan, programs: &[WordProgram], codes: &[u32], words: &mut [u32]) {
    let word_mask = plan.word_mask();
    for program in programs {
        // 기여 파라미터가 없는 워드는 0
        let mut word = 0u32;
        for op in &program.ops {
            let offset = &plan.offsets[op.parameter];
            let code = codes[op.parameter] & low_mask(offset.len());
            let value = op.shift.apply(code);
            word = match op.combine {
                Combine::Assign => value,
                Combine::Or => word | value,
            };
        }
        words[program.word] = word & word_mask;
    }
}
