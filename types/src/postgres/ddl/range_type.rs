//! PostgreSQL range type declaration
//!
//! See: <https://www.postgresql.org/docs/current/rangetypes.html#RANGETYPES-DEFINING>

use std::borrow::Cow;

/// A user-declared range type
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RangeType {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub schema: Option<Cow<'static, str>>,
    pub name: Cow<'static, str>,
    /// Element type, as an SQL type name
    pub subtype: Cow<'static, str>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub canonical_function: Option<Cow<'static, str>>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub subtype_opclass: Option<Cow<'static, str>>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub collation: Option<Cow<'static, str>>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub subtype_diff: Option<Cow<'static, str>>,
}

impl RangeType {
    #[must_use]
    pub fn new(
        schema: Option<&str>,
        name: impl Into<Cow<'static, str>>,
        subtype: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            schema: schema.map(|s| Cow::Owned(s.to_string())),
            name: name.into(),
            subtype: subtype.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn canonical_function(self, function: impl Into<Cow<'static, str>>) -> Self {
        Self {
            canonical_function: Some(function.into()),
            ..self
        }
    }

    #[must_use]
    pub fn subtype_opclass(self, opclass: impl Into<Cow<'static, str>>) -> Self {
        Self {
            subtype_opclass: Some(opclass.into()),
            ..self
        }
    }

    #[must_use]
    pub fn collation(self, collation: impl Into<Cow<'static, str>>) -> Self {
        Self {
            collation: Some(collation.into()),
            ..self
        }
    }

    #[must_use]
    pub fn subtype_diff(self, function: impl Into<Cow<'static, str>>) -> Self {
        Self {
            subtype_diff: Some(function.into()),
            ..self
        }
    }

    /// Returns `true` if any of the optional hooks is set.
    #[must_use]
    pub fn has_customizations(&self) -> bool {
        self.canonical_function.is_some()
            || self.subtype_opclass.is_some()
            || self.collation.is_some()
            || self.subtype_diff.is_some()
    }

    #[must_use]
    pub fn key(&self) -> (Option<&str>, &str) {
        (self.schema.as_deref(), &self.name)
    }
}
