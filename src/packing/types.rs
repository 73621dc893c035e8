// src/packing/types.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// 파라미터 및 워드 비트 폭의 허용 범위
pub const MIN_BITS: u32 = 1;
pub const MAX_BITS: u32 = 32;

/// 편집기 기본값
pub const DEFAULT_BIT_LENGTH: u32 = 32;
pub const DEFAULT_WORD_WIDTH: u32 = 32;
pub const DEFAULT_MINIMUM: f64 = 0.0;
pub const DEFAULT_MAXIMUM: f64 = 1.0;

/// 파라미터 식별자 (이름과 무관하게 편집 중에도 유지됨)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct ParameterId(pub u32);

impl fmt::Display for ParameterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 이름, 비트 예산, 기대 범위를 가진 스칼라 입력
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub id: ParameterId,
    pub name: String,
    pub bit_length: u32,
    pub minimum: f64,
    pub maximum: f64,
}

impl Parameter {
    pub fn new(name: impl Into<String>, bit_length: u32, minimum: f64, maximum: f64) -> Self {
        Self {
            id: ParameterId::default(),
            name: name.into(),
            bit_length,
            minimum,
            maximum,
        }
    }

    /// 편집기에서 새로 추가되는 파라미터 (`parameter{id}`, 32비트, [0, 1])
    pub fn with_defaults(id: ParameterId) -> Self {
        Self {
            id,
            name: format!("parameter{}", id.0),
            bit_length: DEFAULT_BIT_LENGTH,
            minimum: DEFAULT_MINIMUM,
            maximum: DEFAULT_MAXIMUM,
        }
    }

    /// `2^bit_length - 1`
    #[inline]
    pub fn max_code(&self) -> u32 {
        low_mask(self.bit_length)
    }
}

/// 논리 비트 스트림 안에서 한 파라미터가 차지하는 `[from, to)` 구간
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset {
    pub from: u32,
    pub to: u32,
    /// 파라미터 목록 상의 인덱스
    pub parameter: usize,
}

impl Offset {
    #[inline]
    pub fn len(&self) -> u32 {
        self.to - self.from
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    /// `[start, end)` 윈도우와 겹치는지 여부
    #[inline]
    pub fn intersects(&self, start: u32, end: u32) -> bool {
        self.to > start && self.from < end
    }
}

/// 파라미터 목록과 워드 폭으로부터 유도되는 전체 레이아웃
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub offsets: Vec<Offset>,
    pub total_bits: u32,
    pub word_count: usize,
    pub word_width: u32,
}

impl Plan {
    /// `i`번째 워드가 덮는 논리 비트 구간 `[i*W, (i+1)*W)`
    #[inline]
    pub fn word_window(&self, index: usize) -> (u32, u32) {
        let start = index as u32 * self.word_width;
        (start, start + self.word_width)
    }

    /// `i`번째 워드와 겹치는 오프셋들 (레이아웃 순서)
    pub fn overlapping(&self, index: usize) -> impl Iterator<Item = &Offset> {
        let (start, end) = self.word_window(index);
        self.offsets
            .iter()
            .filter(move |offset| offset.intersects(start, end))
    }

    /// 워드 인덱스 범위 중 `offset`과 겹치는 것들
    pub fn words_of(&self, offset: &Offset) -> impl Iterator<Item = usize> + '_ {
        let offset = *offset;
        (0..self.word_count).filter(move |&i| {
            let (start, end) = self.word_window(i);
            offset.intersects(start, end)
        })
    }

    #[inline]
    pub fn word_mask(&self) -> u32 {
        low_mask(self.word_width)
    }

    pub fn parameter_count(&self) -> usize {
        self.offsets.len()
    }
}

/// 하위 `bits`비트가 1인 마스크 (`bits`는 0..=32)
#[inline(always)]
pub fn low_mask(bits: u32) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_mask() {
        assert_eq!(low_mask(0), 0);
        assert_eq!(low_mask(1), 1);
        assert_eq!(low_mask(8), 0xFF);
        assert_eq!(low_mask(20), 0xFFFFF);
        assert_eq!(low_mask(32), u32::MAX);
    }

    #[test]
    fn test_offset_intersects() {
        let offset = Offset { from: 20, to: 40, parameter: 1 };
        assert!(offset.intersects(0, 32));
        assert!(offset.intersects(32, 64));
        assert!(!offset.intersects(40, 72));
        assert!(!offset.intersects(0, 20));
        assert_eq!(offset.len(), 20);
    }

    #[test]
    fn test_default_parameter() {
        let param = Parameter::with_defaults(ParameterId(3));
        assert_eq!(param.name, "parameter3");
        assert_eq!(param.bit_length, 32);
        assert_eq!(param.max_code(), u32::MAX);
    }
}
