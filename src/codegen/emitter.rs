// src/codegen/emitter.rs

//! # 셰이더 코드 출력
//!
//! 조립/분해 연산 목록을 `encode`, `decode` 두 함수의 본문으로 직렬화합니다.
//! 연산 하나당 문장 하나이며, 순서는 연산 목록 순서를 그대로 따릅니다.
//! 여기서는 추가 계산을 하지 않습니다.

use std::collections::HashSet;
use std::fmt::Write;

use super::options::EmitOptions;
use crate::error::{PackError, Result};
use crate::packing::assembler::{assemble, Combine, Shift, WordBuildOp};
use crate::packing::codec::{ranges_for, QuantizationRange};
use crate::packing::disassembler::{disassemble, ChunkOp};
use crate::packing::types::{Parameter, Plan};

/// 식별자 규칙: `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// 출력 코드에서 항상 쓰이는 지역 변수 이름
pub const RESERVED_LOCALS: [&str; 2] = ["encoded", "decoded"];

/// 출력 전에 이름을 검사합니다.
///
/// 함수 인자(`x`), 변환 변수(`xConv`), 고정 지역 변수(`encoded`, `decoded`)는
/// 한 스코프에 함께 선언되므로 서로 겹치면 `NameCollision`입니다.
pub fn check_names(parameters: &[Parameter]) -> Result<()> {
    let mut seen: HashSet<String> = RESERVED_LOCALS.iter().map(|s| s.to_string()).collect();
    for param in parameters {
        if !is_identifier(&param.name) {
            return Err(PackError::InvalidName {
                name: param.name.clone(),
            });
        }
    }
    let declared = parameters
        .iter()
        .map(|p| p.name.clone())
        .chain(parameters.iter().map(|p| format!("{}Conv", p.name)));
    for name in declared {
        if !seen.insert(name.clone()) {
            return Err(PackError::NameCollision { name });
        }
    }
    Ok(())
}

pub struct Emitter<'a> {
    parameters: &'a [Parameter],
    ranges: Vec<QuantizationRange>,
    plan: &'a Plan,
    options: &'a EmitOptions,
}

impl<'a> Emitter<'a> {
    /// `plan`은 같은 `parameters`로 만든 것이어야 하며, 범위가 0인 파라미터는 거부됩니다.
    pub fn new(parameters: &'a [Parameter], plan: &'a Plan, options: &'a EmitOptions) -> Result<Self> {
        if plan.parameter_count() != parameters.len() {
            return Err(PackError::ValueCountMismatch {
                expected: plan.parameter_count(),
                actual: parameters.len(),
            });
        }
        for (offset, param) in plan.offsets.iter().zip(parameters) {
            if offset.len() != param.bit_length {
                return Err(PackError::InvalidConfiguration(format!(
                    "plan does not match parameter '{}' ({} bits planned, {} declared)",
                    param.name,
                    offset.len(),
                    param.bit_length
                )));
            }
        }
        check_names(parameters)?;
        let ranges = ranges_for(parameters)?;
        Ok(Self {
            parameters,
            ranges,
            plan,
            options,
        })
    }

    pub fn emit(&self) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "{}", self.options.header)?;
        self.emit_encode(&mut out)?;
        writeln!(out)?;
        self.emit_values_struct(&mut out)?;
        writeln!(out)?;
        self.emit_decode(&mut out)?;
        Ok(out)
    }

    fn array_type(&self) -> String {
        format!("{}[{}]", self.options.word_type, self.plan.word_count)
    }

    fn literal(&self, value: f64) -> String {
        format!("{:.*}", self.options.precision, value)
    }

    fn keep_minimum(&self, q: &QuantizationRange) -> bool {
        !self.options.simplify || q.minimum != 0.0
    }

    fn keep_range(&self, q: &QuantizationRange) -> bool {
        !self.options.simplify || q.range != 1.0
    }

    // 빈 목록이어도 빈 줄 하나가 남음
    fn write_block(out: &mut String, lines: Vec<String>) -> Result<()> {
        writeln!(out, "{}", lines.join("\n"))?;
        Ok(())
    }

    fn emit_encode(&self, out: &mut String) -> Result<()> {
        let args = self
            .parameters
            .iter()
            .map(|p| format!("{} {}", self.options.float_type, p.name))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(out, "{} encode({}) {{", self.array_type(), args)?;

        let converted = self
            .parameters
            .iter()
            .zip(&self.ranges)
            .map(|(param, q)| self.quantize_line(param, q))
            .collect();
        Self::write_block(out, converted)?;
        writeln!(out, "    {} encoded;", self.array_type())?;
        let word_ops = assemble(self.plan)
            .iter()
            .flat_map(|program| program.ops.iter().map(|op| self.word_op_line(op)))
            .collect();
        Self::write_block(out, word_ops)?;
        writeln!(out, "    return encoded;")?;
        writeln!(out, "}}")?;
        Ok(())
    }

    /// `uint xConv = uint(((x - min) / range) * scale.0);`
    fn quantize_line(&self, param: &Parameter, q: &QuantizationRange) -> String {
        let sub = if self.keep_minimum(q) {
            format!(" - {}", self.literal(q.minimum))
        } else {
            String::new()
        };
        let div = if self.keep_range(q) {
            format!(" / {}", self.literal(q.range))
        } else {
            String::new()
        };
        format!(
            "    {ty} {name}Conv = {ty}((({name}{sub}){div}) * {scale}.0);",
            ty = self.options.word_type,
            name = param.name,
            sub = sub,
            div = div,
            scale = q.scale,
        )
    }

    fn word_op_line(&self, op: &WordBuildOp) -> String {
        let name = &self.parameters[op.parameter].name;
        let shift = match op.shift {
            Shift::None => String::new(),
            Shift::Left(n) => format!(" << {}", n),
            Shift::Right(n) => format!(" >> {}", n),
        };
        let assign = match op.combine {
            Combine::Assign => "=",
            Combine::Or => "|=",
        };
        format!("    encoded[{}] {} {}Conv{};", op.word, assign, name, shift)
    }

    fn emit_values_struct(&self, out: &mut String) -> Result<()> {
        writeln!(out, "struct {} {{", self.options.struct_name)?;
        let fields = self
            .parameters
            .iter()
            .map(|p| format!("    {} {};", self.options.float_type, p.name))
            .collect();
        Self::write_block(out, fields)?;
        writeln!(out, "}};")?;
        Ok(())
    }

    fn emit_decode(&self, out: &mut String) -> Result<()> {
        let values = &self.options.struct_name;
        writeln!(out, "{} decode({} encoded) {{", values, self.array_type())?;
        writeln!(out, "    {} decoded;", values)?;

        let decoding = disassemble(self.plan)
            .iter()
            .map(|program| {
                let param = &self.parameters[program.parameter];
                let q = &self.ranges[program.parameter];
                let bits = program
                    .chunks
                    .iter()
                    .map(chunk_expr)
                    .collect::<Vec<_>>()
                    .join(" | ");
                let range_mul = if self.keep_range(q) {
                    format!(" * {}", self.literal(q.range))
                } else {
                    String::new()
                };
                let min_add = if self.keep_minimum(q) {
                    format!(" + {}", self.literal(q.minimum))
                } else {
                    String::new()
                };
                format!(
                    "    decoded.{} = {}({}) / {}.0{}{};",
                    param.name, self.options.float_type, bits, q.scale, range_mul, min_add
                )
            })
            .collect();
        Self::write_block(out, decoding)?;

        writeln!(out, "    return decoded;")?;
        write!(out, "}}")?;
        Ok(())
    }
}

/// `(((encoded[i] >> r) & mask) << l)`
fn chunk_expr(chunk: &ChunkOp) -> String {
    let shift = if chunk.shift_right != 0 {
        format!(" >> {}", chunk.shift_right)
    } else {
        String::new()
    };
    let place = if chunk.shift_left > 0 {
        format!(" << {}", chunk.shift_left)
    } else {
        String::new()
    };
    format!("(((encoded[{}]{}) & {}u){})", chunk.word, shift, chunk.mask, place)
}
