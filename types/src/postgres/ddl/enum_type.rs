//! PostgreSQL enum type declaration
//!
//! See: <https://www.postgresql.org/docs/current/datatype-enum.html>

use std::borrow::Cow;

/// A user-declared enum type with ordered labels
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Enum {
    /// `None` falls back to the model's default schema
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub schema: Option<Cow<'static, str>>,
    pub name: Cow<'static, str>,
    pub labels: Vec<Cow<'static, str>>,
}

impl Enum {
    #[must_use]
    pub fn new<I, S>(schema: Option<&str>, name: impl Into<Cow<'static, str>>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        Self {
            schema: schema.map(|s| Cow::Owned(s.to_string())),
            name: name.into(),
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// `(schema, name)` key used to diff declarations
    #[must_use]
    pub fn key(&self) -> (Option<&str>, &str) {
        (self.schema.as_deref(), &self.name)
    }
}
