//! Literal rendering
//!
//! Two parallel rule sets over the same `(Value, SemanticType)` pairs:
//!
//! - [`render_sql_literal`] - SQL literal text, e.g. `POINT '(3.5,4.5)'`
//! - [`render_code_literal`] - Rust constructor expression, e.g. `Point::new(3.5, 4.5)`
//!
//! A pair outside the mapping is reported as [`LiteralError::Unmapped`], never coerced.

mod code;
mod range;
mod sql;
mod text;

pub use code::render_code_literal;
pub use range::{parse_range, parse_range_literal};
pub use sql::{render_sql_literal, string_literal};

use pgschema_types::postgres::{SemanticType, Value};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LiteralError {
    #[error("no literal mapping for a {value} value of type {ty}")]
    Unmapped { value: &'static str, ty: String },

    #[error("{value} value is out of range for type {ty}")]
    OutOfRange { value: &'static str, ty: String },

    #[error("invalid range literal '{text}': {reason}")]
    InvalidRange { text: String, reason: &'static str },
}

impl LiteralError {
    pub(crate) fn unmapped(value: &Value, ty: &SemanticType) -> Self {
        Self::Unmapped {
            value: value.kind(),
            ty: ty.store_type().into_owned(),
        }
    }

    pub(crate) fn out_of_range(value: &Value, ty: &SemanticType) -> Self {
        Self::OutOfRange {
            value: value.kind(),
            ty: ty.store_type().into_owned(),
        }
    }

    pub(crate) fn invalid_range(text: &str, reason: &'static str) -> Self {
        Self::InvalidRange {
            text: text.to_string(),
            reason,
        }
    }
}
