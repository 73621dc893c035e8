// src/packing/codec.rs

//! # 선형 양자화
//!
//! `[minimum, maximum]` 범위의 실수를 `[0, 2^bits - 1]` 정수 코드로 사상합니다.
//! 변환은 0 방향 절삭(truncation)이며 반올림하지 않습니다.

use super::types::Parameter;
use crate::error::{PackError, Result};

/// 파라미터별 양자화 범위
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantizationRange {
    pub minimum: f64,
    /// `maximum - minimum`
    pub range: f64,
    /// `2^bit_length - 1`
    pub scale: u32,
}

impl QuantizationRange {
    /// `range == 0`이면 0으로 나누게 되므로 `DegenerateRange`를 반환합니다.
    pub fn new(param: &Parameter) -> Result<Self> {
        if !param.minimum.is_finite() || !param.maximum.is_finite() {
            return Err(PackError::InvalidConfiguration(format!(
                "parameter '{}' has a non-finite bound [{}, {}]",
                param.name, param.minimum, param.maximum
            )));
        }
        let range = param.maximum - param.minimum;
        if range == 0.0 {
            return Err(PackError::DegenerateRange {
                name: param.name.clone(),
            });
        }
        Ok(Self {
            minimum: param.minimum,
            range,
            scale: param.max_code(),
        })
    }

    /// float -> 정수 코드. 범위 밖의 값은 `[0, scale]`로 포화됩니다.
    #[inline]
    pub fn quantize(&self, value: f64) -> u32 {
        let normalized = (value - self.minimum) / self.range;
        // `as`는 0 방향 절삭 + 포화 변환
        let code = (normalized * self.scale as f64) as u32;
        code.min(self.scale)
    }

    /// 정수 코드 -> float
    #[inline]
    pub fn dequantize(&self, code: u32) -> f64 {
        (code as f64 / self.scale as f64) * self.range + self.minimum
    }

    /// 양자화 간격
    #[inline]
    pub fn step(&self) -> f64 {
        self.range / self.scale as f64
    }
}

/// 모든 파라미터의 양자화 범위를 한 번에 검증하여 생성
pub fn ranges_for(parameters: &[Parameter]) -> Result<Vec<QuantizationRange>> {
    parameters.iter().map(QuantizationRange::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_single_word_quantize() {
        let param = Parameter::new("x", 8, 0.0, 1.0);
        let q = QuantizationRange::new(&param).unwrap();
        assert_eq!(q.scale, 255);
        assert_eq!(q.quantize(0.0), 0);
        assert_eq!(q.quantize(1.0), 255);
        assert_abs_diff_eq!(q.dequantize(255), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_truncation_not_rounding() {
        let param = Parameter::new("x", 2, 0.0, 3.0);
        let q = QuantizationRange::new(&param).unwrap();
        // 2.9 -> 2.9 (scale 3, range 3) -> 2
        assert_eq!(q.quantize(2.9), 2);
        assert_eq!(q.quantize(0.99), 0);
    }

    #[test]
    fn test_negative_range_bounds() {
        let param = Parameter::new("t", 10, -2.5, 2.5);
        let q = QuantizationRange::new(&param).unwrap();
        assert_eq!(q.quantize(-2.5), 0);
        assert_eq!(q.quantize(2.5), 1023);
        assert_abs_diff_eq!(q.dequantize(0), -2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_out_of_range_saturates() {
        let param = Parameter::new("x", 4, 0.0, 1.0);
        let q = QuantizationRange::new(&param).unwrap();
        assert_eq!(q.quantize(-1.0), 0);
        assert_eq!(q.quantize(7.0), 15);
    }

    #[test]
    fn test_degenerate_range() {
        let param = Parameter::new("flat", 8, 0.5, 0.5);
        match QuantizationRange::new(&param) {
            Err(PackError::DegenerateRange { name }) => assert_eq!(name, "flat"),
            other => panic!("expected DegenerateRange, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_bound() {
        let param = Parameter::new("x", 8, 0.0, f64::INFINITY);
        assert!(matches!(
            QuantizationRange::new(&param),
            Err(PackError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_32bit_scale() {
        let param = Parameter::new("wide", 32, 0.0, 1.0);
        let q = QuantizationRange::new(&param).unwrap();
        assert_eq!(q.scale, u32::MAX);
        assert_eq!(q.quantize(1.0), u32::MAX);
        assert_eq!(q.quantize(0.0), 0);
    }
}
