// src/error.rs

//! # 에러 타입
//!
//! 레이아웃 계획, 양자화, 코드 생성 전 단계에서 공유하는 에러 정의입니다.
//! 모든 실패는 입력 검증 문제이므로 재시도하지 않습니다.

use thiserror::Error;

use crate::packing::types::ParameterId;

#[derive(Debug, Error)]
pub enum PackError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("parameter '{name}' has minimum == maximum, the quantization range is zero")]
    DegenerateRange { name: String },

    #[error("parameter name '{name}' is used more than once")]
    NameCollision { name: String },

    #[error("'{name}' is not a valid identifier")]
    InvalidName { name: String },

    #[error("no parameter with id {0}")]
    UnknownParameter(ParameterId),

    #[error("the last remaining parameter cannot be removed")]
    LastParameter,

    #[error("expected {expected} values, got {actual}")]
    ValueCountMismatch { expected: usize, actual: usize },

    #[error("expected {expected} columns, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("format error: {0}")]
    Format(#[from] std::fmt::Error),
}

pub type Result<T> = std::result::Result<T, PackError>;

#[cfg(feature = "python")]
impl From<PackError> for pyo3::PyErr {
    fn from(err: PackError) -> Self {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
