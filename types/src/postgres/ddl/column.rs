//! PostgreSQL column descriptor

use std::borrow::Cow;

use crate::postgres::{SemanticType, ValueGenerationStrategy, Value};

/// A column as it appears in table creation and column operations.
///
/// The store type is optional: when absent it is resolved from the schema snapshot or,
/// failing that, from [`SemanticType::resolve_store_type`] using the length facets.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Column {
    pub name: Cow<'static, str>,
    pub semantic_type: SemanticType,
    /// Explicit SQL type, written verbatim (e.g. `TEXT`, `varchar(3)`)
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub store_type: Option<Cow<'static, str>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub nullable: bool,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub max_length: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub fixed_length: bool,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub default_value: Option<Value>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub default_sql: Option<Cow<'static, str>>,
    /// Expression of a stored generated column
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub computed_sql: Option<Cow<'static, str>>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub comment: Option<Cow<'static, str>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub strategy: ValueGenerationStrategy,
    /// Set when the column was described with the retired `ValueGeneratedOnAdd`
    /// annotation; generators refuse such columns.
    #[cfg_attr(feature = "serde", serde(default))]
    pub legacy_value_generated_on_add: bool,
}

impl Column {
    /// Create a NOT NULL column of the given semantic type
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>, semantic_type: SemanticType) -> Self {
        Self {
            name: name.into(),
            semantic_type,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn store_type(self, store_type: impl Into<Cow<'static, str>>) -> Self {
        Self {
            store_type: Some(store_type.into()),
            ..self
        }
    }

    #[must_use]
    pub fn nullable(self, nullable: bool) -> Self {
        Self { nullable, ..self }
    }

    #[must_use]
    pub fn max_length(self, max_length: u32) -> Self {
        Self {
            max_length: Some(max_length),
            ..self
        }
    }

    #[must_use]
    pub fn fixed_length(self) -> Self {
        Self {
            fixed_length: true,
            ..self
        }
    }

    #[must_use]
    pub fn default_value(self, value: impl Into<Value>) -> Self {
        Self {
            default_value: Some(value.into()),
            ..self
        }
    }

    #[must_use]
    pub fn default_sql(self, sql: impl Into<Cow<'static, str>>) -> Self {
        Self {
            default_sql: Some(sql.into()),
            ..self
        }
    }

    #[must_use]
    pub fn computed(self, sql: impl Into<Cow<'static, str>>) -> Self {
        Self {
            computed_sql: Some(sql.into()),
            ..self
        }
    }

    #[must_use]
    pub fn comment(self, comment: impl Into<Cow<'static, str>>) -> Self {
        Self {
            comment: Some(comment.into()),
            ..self
        }
    }

    #[must_use]
    pub fn strategy(self, strategy: ValueGenerationStrategy) -> Self {
        Self { strategy, ..self }
    }

    /// Store type from this column alone, ignoring any schema snapshot.
    #[must_use]
    pub fn own_store_type(&self) -> Cow<'static, str> {
        match &self.store_type {
            Some(store_type) => store_type.clone(),
            None => self
                .semantic_type
                .resolve_store_type(self.max_length, self.fixed_length),
        }
    }

    /// Returns `true` if the column has a literal or SQL default.
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.default_value.is_some() || self.default_sql.is_some()
    }
}
