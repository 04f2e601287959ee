//! Table storage parameters (`WITH (fillfactor=70, ...)`)

use std::borrow::Cow;

/// Value of a storage parameter
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum StorageValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Cow<'static, str>),
}

impl From<bool> for StorageValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for StorageValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<i64> for StorageValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for StorageValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&'static str> for StorageValue {
    fn from(value: &'static str) -> Self {
        Self::Str(Cow::Borrowed(value))
    }
}

impl From<String> for StorageValue {
    fn from(value: String) -> Self {
        Self::Str(Cow::Owned(value))
    }
}

/// Renders the value the way it appears after `key=`: booleans bare, strings
/// single-quoted, numbers in their natural form.
impl core::fmt::Display for StorageValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bool(true) => f.write_str("true"),
            Self::Bool(false) => f.write_str("false"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "'{s}'"),
        }
    }
}

/// One `key=value` storage parameter; order of declaration is preserved on the table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StorageParameter {
    pub name: Cow<'static, str>,
    pub value: StorageValue,
}

impl StorageParameter {
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>, value: impl Into<StorageValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
