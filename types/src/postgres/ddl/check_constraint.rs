//! PostgreSQL check constraint descriptor

use std::borrow::Cow;

/// Check constraint; `sql` is the boolean expression without the surrounding parentheses
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheckConstraint {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub name: Option<Cow<'static, str>>,
    pub sql: Cow<'static, str>,
}

impl CheckConstraint {
    #[must_use]
    pub fn new(sql: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: None,
            sql: sql.into(),
        }
    }

    #[must_use]
    pub fn named(self, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: Some(name.into()),
            ..self
        }
    }
}
