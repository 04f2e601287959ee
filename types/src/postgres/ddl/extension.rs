//! PostgreSQL extension declaration

use std::borrow::Cow;

/// An extension the database must have installed (`CREATE EXTENSION`)
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extension {
    /// Schema to install the extension's objects into
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub schema: Option<Cow<'static, str>>,
    pub name: Cow<'static, str>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub version: Option<Cow<'static, str>>,
}

impl Extension {
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

    #[must_use]
    pub fn version(self, version: impl Into<Cow<'static, str>>) -> Self {
        Self {
            version: Some(version.into()),
            ..self
        }
    }
}
