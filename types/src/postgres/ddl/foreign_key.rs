//! PostgreSQL foreign key descriptor

use std::borrow::Cow;

// =============================================================================
// Shared Types
// =============================================================================

/// Foreign key referential action
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ReferentialAction {
    /// No action (default)
    #[default]
    NoAction,
    /// Restrict deletion
    Restrict,
    /// Cascade changes
    Cascade,
    /// Set to NULL
    SetNull,
    /// Set to default value
    SetDefault,
}

impl ReferentialAction {
    /// Get the SQL representation
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }

    /// Parse from SQL string
    pub fn from_sql(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "NO ACTION" => Some(Self::NoAction),
            "RESTRICT" => Some(Self::Restrict),
            "CASCADE" => Some(Self::Cascade),
            "SET NULL" => Some(Self::SetNull),
            "SET DEFAULT" => Some(Self::SetDefault),
            _ => None,
        }
    }
}

impl core::fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_sql())
    }
}

// =============================================================================
// Runtime Type
// =============================================================================

/// Foreign key constraint, inline in `CREATE TABLE` or added with `ALTER TABLE`
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ForeignKey {
    /// Constraint name; unnamed constraints get a server-chosen name
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub name: Option<Cow<'static, str>>,
    pub columns: Vec<Cow<'static, str>>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub principal_schema: Option<Cow<'static, str>>,
    pub principal_table: Cow<'static, str>,
    /// Referenced columns; empty references the principal's primary key
    #[cfg_attr(feature = "serde", serde(default))]
    pub principal_columns: Vec<Cow<'static, str>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_update: ReferentialAction,
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_delete: ReferentialAction,
}

impl ForeignKey {
    #[must_use]
    pub fn new<I, S>(columns: I, principal_table: impl Into<Cow<'static, str>>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            principal_table: principal_table.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn named(self, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: Some(name.into()),
            ..self
        }
    }

    #[must_use]
    pub fn principal_schema(self, schema: impl Into<Cow<'static, str>>) -> Self {
        Self {
            principal_schema: Some(schema.into()),
            ..self
        }
    }

    #[must_use]
    pub fn principal_columns<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        Self {
            principal_columns: columns.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    #[must_use]
    pub fn on_update(self, action: ReferentialAction) -> Self {
        Self {
            on_update: action,
            ..self
        }
    }

    #[must_use]
    pub fn on_delete(self, action: ReferentialAction) -> Self {
        Self {
            on_delete: action,
            ..self
        }
    }
}
