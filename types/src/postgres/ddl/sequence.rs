//! PostgreSQL sequence descriptor
//!
//! See: <https://www.postgresql.org/docs/current/sql-createsequence.html>

use std::borrow::Cow;

use crate::postgres::SemanticType;

/// A standalone sequence
///
/// `semantic_type` selects the `AS <type>` clause on servers that support it; a sequence
/// is 64-bit unless stated otherwise.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Sequence {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub schema: Option<Cow<'static, str>>,
    pub name: Cow<'static, str>,
    #[cfg_attr(feature = "serde", serde(default = "default_sequence_type"))]
    pub semantic_type: SemanticType,
    #[cfg_attr(feature = "serde", serde(default = "default_one"))]
    pub start_with: i64,
    #[cfg_attr(feature = "serde", serde(default = "default_one"))]
    pub increment_by: i64,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub min_value: Option<i64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub max_value: Option<i64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cycle: bool,
}

#[cfg(feature = "serde")]
fn default_sequence_type() -> SemanticType {
    SemanticType::BigInt
}

#[cfg(feature = "serde")]
const fn default_one() -> i64 {
    1
}

impl Default for Sequence {
    fn default() -> Self {
        Self {
            schema: None,
            name: Cow::Borrowed(""),
            semantic_type: SemanticType::BigInt,
            start_with: 1,
            increment_by: 1,
            min_value: None,
            max_value: None,
            cycle: false,
        }
    }
}

impl Sequence {
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn schema(self, schema: impl Into<Cow<'static, str>>) -> Self {
        Self {
            schema: Some(schema.into()),
            ..self
        }
    }

    /// Schema given as an optional value, as read from a column or model setting
    #[must_use]
    pub fn in_schema(self, schema: Option<Cow<'static, str>>) -> Self {
        Self { schema, ..self }
    }

    #[must_use]
    pub fn semantic_type(self, semantic_type: SemanticType) -> Self {
        Self {
            semantic_type,
            ..self
        }
    }

    #[must_use]
    pub fn start_with(self, start_with: i64) -> Self {
        Self { start_with, ..self }
    }

    #[must_use]
    pub fn increment_by(self, increment_by: i64) -> Self {
        Self {
            increment_by,
            ..self
        }
    }

    #[must_use]
    pub fn min_value(self, min_value: i64) -> Self {
        Self {
            min_value: Some(min_value),
            ..self
        }
    }

    #[must_use]
    pub fn max_value(self, max_value: i64) -> Self {
        Self {
            max_value: Some(max_value),
            ..self
        }
    }

    #[must_use]
    pub fn cycle(self) -> Self {
        Self {
            cycle: true,
            ..self
        }
    }
}
