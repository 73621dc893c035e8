// src/packing/model.rs

//! # 파라미터 모델
//!
//! 편집 화면이 다루는 가변 상태입니다. 추가/삭제/수정 연산과 입력 정리 규칙을 제공하고,
//! 코드 생성은 항상 `snapshot()`으로 복사한 값 위에서 수행합니다.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::types::{
    Parameter, ParameterId, DEFAULT_WORD_WIDTH, MAX_BITS, MIN_BITS,
};
use super::planner::{check_bit_length, check_word_width};
use crate::codegen::{generate_code, EmitOptions};
use crate::error::{PackError, Result};

/// 범위 값 입력의 증감 단위
pub const BOUND_STEP: f64 = 0.0001;

/// 단조 증가 ID 생성기
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdGenerator {
    next: u32,
}

impl IdGenerator {
    pub fn starting_at(next: u32) -> Self {
        Self { next }
    }

    /// ID 공간(`u32`)을 다 쓰면 `InvalidConfiguration`
    pub fn next_id(&mut self) -> Result<ParameterId> {
        let next = self.next.checked_add(1).ok_or_else(|| {
            PackError::InvalidConfiguration("parameter id space exhausted".to_string())
        })?;
        let id = ParameterId(self.next);
        self.next = next;
        Ok(id)
    }

    /// 다음에 발급될 ID
    pub fn peek(&self) -> u32 {
        self.next
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::starting_at(0)
    }
}

/// 부분 수정. `None` 필드는 그대로 유지됩니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterUpdate {
    pub name: Option<String>,
    pub bit_length: Option<f64>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

/// 앞뒤 공백 제거 후 내부 공백을 `_`로 치환
pub fn sanitize_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// 숫자 입력 정리: `[min, max]`로 클램핑 후 `min`을 기준으로 `step` 격자에 맞춤.
/// NaN이면 `None`을 반환하고 이전 값을 유지합니다.
pub fn snap_value(value: f64, min: Option<f64>, max: Option<f64>, step: f64) -> Option<f64> {
    if value.is_nan() {
        return None;
    }
    let clamped = value
        .min(max.unwrap_or(f64::INFINITY))
        .max(min.unwrap_or(f64::NEG_INFINITY));
    let base = min.unwrap_or(0.0);
    Some(((clamped - base) / step).round() * step + base)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterModel {
    parameters: Vec<Parameter>,
    word_width: u32,
    ids: IdGenerator,
}

impl Default for ParameterModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterModel {
    /// 기본 파라미터 하나(`parameter0`)와 32비트 워드로 시작합니다.
    pub fn new() -> Self {
        let first = Parameter::with_defaults(ParameterId(0));
        let ids = IdGenerator::starting_at(1);
        Self {
            parameters: vec![first],
            word_width: DEFAULT_WORD_WIDTH,
            ids,
        }
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn word_width(&self) -> u32 {
        self.word_width
    }

    pub fn get(&self, id: ParameterId) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.id == id)
    }

    pub fn add(&mut self) -> Result<ParameterId> {
        let id = self.ids.next_id()?;
        self.parameters.push(Parameter::with_defaults(id));
        log::debug!("added parameter {}", id);
        Ok(id)
    }

    pub fn remove(&mut self, id: ParameterId) -> Result<Parameter> {
        let index = self.index_of(id)?;
        if self.parameters.len() <= 1 {
            return Err(PackError::LastParameter);
        }
        log::debug!("removed parameter {}", id);
        Ok(self.parameters.remove(index))
    }

    pub fn update(&mut self, id: ParameterId, update: ParameterUpdate) -> Result<&Parameter> {
        let index = self.index_of(id)?;
        let param = &mut self.parameters[index];

        if let Some(name) = update.name {
            param.name = sanitize_name(&name);
        }
        if let Some(len) = update.bit_length.and_then(|v| {
            snap_value(v, Some(MIN_BITS as f64), Some(MAX_BITS as f64), 1.0)
        }) {
            param.bit_length = len as u32;
        }
        if let Some(min) = update.minimum.and_then(|v| snap_value(v, None, None, BOUND_STEP)) {
            param.minimum = min;
        }
        if let Some(max) = update.maximum.and_then(|v| snap_value(v, None, None, BOUND_STEP)) {
            param.maximum = max;
        }
        Ok(param)
    }

    /// 워드 폭 입력도 `[1, 32]` 정수로 정리됩니다.
    pub fn set_word_width(&mut self, width: f64) {
        if let Some(w) = snap_value(width, Some(MIN_BITS as f64), Some(MAX_BITS as f64), 1.0) {
            self.word_width = w as u32;
        }
    }

    /// 코어에 넘길 불변 복사본
    pub fn snapshot(&self) -> (Vec<Parameter>, u32) {
        (self.parameters.clone(), self.word_width)
    }

    pub fn generate(&self, options: &EmitOptions) -> Result<String> {
        let (parameters, word_width) = self.snapshot();
        generate_code(&parameters, word_width, options)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 역직렬화 후 편집기와 같은 규칙을 검사합니다.
    pub fn from_json(json: &str) -> Result<Self> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// 모델 불변식: 파라미터가 하나 이상, ID 중복 없음, 다음 ID가 기존 ID보다 큼,
    /// 워드 폭과 비트 길이는 `[1, 32]`
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(PackError::InvalidConfiguration(msg));

        if self.parameters.is_empty() {
            return invalid("model has no parameters".to_string());
        }
        check_word_width(self.word_width)?;

        let mut seen = HashSet::new();
        for param in &self.parameters {
            check_bit_length(param)?;
            if !seen.insert(param.id) {
                return invalid(format!("duplicate parameter id {}", param.id));
            }
            if param.id.0 >= self.ids.peek() {
                return invalid(format!(
                    "parameter id {} is not below the next id {}",
                    param.id,
                    self.ids.peek()
                ));
            }
        }
        Ok(())
    }

    fn index_of(&self, id: ParameterId) -> Result<usize> {
        self.parameters
            .iter()
            .position(|p| p.id == id)
            .ok_or(PackError::UnknownParameter(id))
    }
}
