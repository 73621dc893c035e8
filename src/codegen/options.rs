// src/codegen/options.rs

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// 코드 생성 설정
///
/// JSON으로 일부 필드만 지정해도 나머지는 기본값으로 채워집니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitOptions {
    /// 최소값/범위 리터럴의 소수점 자릿수
    pub precision: usize,
    /// `min == 0`, `range == 1`일 때 항을 생략할지 여부
    pub simplify: bool,
    pub header: String,
    pub word_type: String,
    pub float_type: String,
    pub struct_name: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            precision: 4,
            simplify: true,
            header: "// Generated code".to_string(),
            word_type: "uint".to_string(),
            float_type: "float".to_string(),
            struct_name: "Values".to_string(),
        }
    }
}

impl EmitOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
