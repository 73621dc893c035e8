//! # bitpack_gen
//!
//! 경계가 있는 실수 파라미터들을 최소 개수의 고정 폭 정수 워드에 담는 비트 레이아웃을 계획하고,
//! 인코딩/디코딩 셰이더 함수를 생성합니다.
//!
//! ```
//! use _rust::codegen::{generate_code, EmitOptions};
//! use _rust::packing::Parameter;
//!
//! let params = vec![Parameter::new("x", 8, 0.0, 1.0)];
//! let code = generate_code(&params, 32, &EmitOptions::default()).unwrap();
//! assert!(code.contains("decoded.x = float((((encoded[0]) & 255u))) / 255.0;"));
//! ```

pub mod codegen;
pub mod error;
pub mod packing;

#[cfg(feature = "python")]
mod bindings;

pub use codegen::{generate_code, generate_to, EmitOptions};
pub use error::{PackError, Result};
pub use packing::{plan, BatchCodec, Parameter, ParameterModel, Plan};
