// src/packing/disassembler.rs

//! # 워드 분해
//!
//! 패킹된 워드들로부터 각 파라미터의 양자화 코드를 복원하는 마스크/시프트/OR 연산을 만듭니다.
//! 한 파라미터가 여러 워드에 걸치면 워드마다 조각(chunk)을 하나씩 꺼내 합칩니다.

use super::types::{low_mask, Plan};
use crate::error::{PackError, Result};

/// 워드 하나에서 비트 조각을 꺼내는 연산
///
/// `((word >> shift_right) & mask) << shift_left`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkOp {
    pub word: usize,
    pub shift_right: u32,
    pub length: u32,
    pub mask: u32,
    /// 파라미터 자체 값 안에서 이 조각이 시작하는 위치. 첫 워드 이후 조각에서만 0보다 큼
    pub shift_left: u32,
}

impl ChunkOp {
    #[inline]
    pub fn extract(&self, word: u32) -> u32 {
        let chunk = (word >> self.shift_right) & self.mask;
        if self.shift_left > 0 {
            chunk << self.shift_left
        } else {
            chunk
        }
    }
}

/// 한 파라미터의 복원 연산 (워드 오름차순)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterProgram {
    pub parameter: usize,
    pub chunks: Vec<ChunkOp>,
}

pub fn disassemble(plan: &Plan) -> Vec<ParameterProgram> {
    plan.offsets
        .iter()
        .map(|offset| {
            let chunks = plan
                .words_of(offset)
                .map(|word| {
                    let (start, end) = plan.word_window(word);
                    let overlap_from = start.max(offset.from);
                    let overlap_to = end.min(offset.to);
                    let length = overlap_to - overlap_from;
                    let start_bit_index = start as i64 - offset.from as i64;
                    let chunk = ChunkOp {
                        word,
                        shift_right: overlap_from - start,
                        length,
                        mask: low_mask(length),
                        shift_left: start_bit_index.max(0) as u32,
                    };
                    log::trace!("parameter {}: {:?}", offset.parameter, chunk);
                    chunk
                })
                .collect();
            ParameterProgram {
                parameter: offset.parameter,
                chunks,
            }
        })
        .collect()
}

/// 워드 값으로부터 파라미터별 코드를 계산합니다.
pub fn unpack(plan: &Plan, words: &[u32]) -> Result<Vec<u32>> {
    if words.len() != plan.word_count {
        return Err(PackError::ValueCountMismatch {
            expected: plan.word_count,
            actual: words.len(),
        });
    }
    let mut codes = vec![0u32; plan.parameter_count()];
    run_programs(&disassemble(plan), words, &mut codes);
    Ok(codes)
}

pub(crate) fn run_programs(programs: &[ParameterProgram], words: &[u32], codes: &mut [u32]) {
    for program in programs {
        codes[program.parameter] = program
            .chunks
            .iter()
            .fold(0u32, |acc, chunk| acc | chunk.extract(words[chunk.word]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packing::planner::plan;
    use crate::packing::types::Parameter;

    #[test]
    fn test_single_word_unpack() {
        let params = vec![Parameter::new("x", 8, 0.0, 1.0)];
        let plan = plan(&params, 32).unwrap();
        let programs = disassemble(&plan);
        assert_eq!(
            programs[0].chunks,
            vec![ChunkOp { word: 0, shift_right: 0, length: 8, mask: 255, shift_left: 0 }]
        );
        assert_eq!(unpack(&plan, &[0xFFFF_FF80]).unwrap(), vec![0x80]);
    }

    #[test]
    fn test_spanning_chunks() {
        let params = vec![
            Parameter::new("a", 20, 0.0, 1.0),
            Parameter::new("b", 20, 0.0, 1.0),
        ];
        let plan = plan(&params, 32).unwrap();
        let programs = disassemble(&plan);

        assert_eq!(programs[1].chunks.len(), 2);
        assert_eq!(
            programs[1].chunks[0],
            ChunkOp { word: 0, shift_right: 20, length: 12, mask: 0xFFF, shift_left: 0 }
        );
        assert_eq!(
            programs[1].chunks[1],
            ChunkOp { word: 1, shift_right: 0, length: 8, mask: 0xFF, shift_left: 12 }
        );
    }

    #[test]
    fn test_full_width_parameter() {
        let params = vec![Parameter::new("a", 4, 0.0, 1.0), Parameter::new("b", 32, 0.0, 1.0)];
        let plan = plan(&params, 32).unwrap();
        let programs = disassemble(&plan);
        assert_eq!(programs[1].chunks[0].mask, 0x0FFF_FFFF);
        assert_eq!(programs[1].chunks[1].mask, 0xF);
        assert_eq!(programs[1].chunks[1].shift_left, 28);
    }

    #[test]
    fn test_unpack_count_mismatch() {
        let params = vec![Parameter::new("a", 20, 0.0, 1.0), Parameter::new("b", 20, 0.0, 1.0)];
        let plan = plan(&params, 32).unwrap();
        assert!(matches!(
            unpack(&plan, &[0]),
            Err(PackError::ValueCountMismatch { expected: 2, actual: 1 })
        ));
    }
}
