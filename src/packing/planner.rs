// src/packing/planner.rs

//! # 레이아웃 계획
//!
//! 파라미터를 목록 순서대로 하나의 논리 비트 스트림에 빈틈없이 배치하고,
//! 필요한 워드 개수를 계산합니다. 재배치나 패딩은 없습니다.

use num_integer::Integer;

use super::types::{Offset, Parameter, Plan, MAX_BITS, MIN_BITS};
use crate::error::{PackError, Result};

/// 워드 폭 검증
pub fn check_word_width(word_width: u32) -> Result<()> {
    if !(MIN_BITS..=MAX_BITS).contains(&word_width) {
        return Err(PackError::InvalidConfiguration(format!(
            "word width {} is outside [{}, {}]",
            word_width, MIN_BITS, MAX_BITS
        )));
    }
    Ok(())
}

/// 파라미터 비트 길이 검증
pub fn check_bit_length(param: &Parameter) -> Result<()> {
    if !(MIN_BITS..=MAX_BITS).contains(&param.bit_length) {
        return Err(PackError::InvalidConfiguration(format!(
            "parameter '{}' has bit length {} outside [{}, {}]",
            param.name, param.bit_length, MIN_BITS, MAX_BITS
        )));
    }
    Ok(())
}

/// 파라미터 목록에 대한 비트 레이아웃을 계산합니다.
///
/// 범위를 벗어난 값은 다시 클램핑하지 않고 `InvalidConfiguration`으로 거부합니다.
pub fn plan(parameters: &[Parameter], word_width: u32) -> Result<Plan> {
    check_word_width(word_width)?;

    let mut offsets = Vec::with_capacity(parameters.len());
    let mut cursor = 0u32;
    for (index, param) in parameters.iter().enumerate() {
        check_bit_length(param)?;
        let to = cursor.checked_add(param.bit_length).ok_or_else(|| {
            PackError::InvalidConfiguration("total bit length overflows".to_string())
        })?;
        offsets.push(Offset {
            from: cursor,
            to,
            parameter: index,
        });
        cursor = to;
    }

    let total_bits = cursor;
    let word_count = Integer::div_ceil(&total_bits, &word_width) as usize;

    log::debug!(
        "planned {} parameters: {} bits -> {} x {}-bit words",
        parameters.len(),
        total_bits,
        word_count,
        word_width
    );

    Ok(Plan {
        offsets,
        total_bits,
        word_count,
        word_width,
    })
}
