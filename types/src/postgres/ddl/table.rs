//! PostgreSQL table descriptor and table-level options

use std::borrow::Cow;

use super::{CheckConstraint, Column, ForeignKey, PrimaryKey, StorageParameter, UniqueConstraint};

// =============================================================================
// Options
// =============================================================================

/// Dialect options of a table
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TableOptions {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub comment: Option<Cow<'static, str>>,
    /// `None` is treated as logged
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub unlogged: Option<bool>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub storage_parameters: Vec<StorageParameter>,
}

impl TableOptions {
    #[must_use]
    pub fn is_unlogged(&self) -> bool {
        self.unlogged.unwrap_or(false)
    }
}

/// CockroachDB `INTERLEAVE IN PARENT`
///
/// See: <https://www.cockroachlabs.com/docs/stable/interleave-in-parent.html>
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct InterleaveInParent {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub parent_schema: Option<Cow<'static, str>>,
    pub parent_table: Cow<'static, str>,
    pub prefix: Vec<Cow<'static, str>>,
}

impl InterleaveInParent {
    #[must_use]
    pub fn new<I, S>(
        parent_schema: Option<&str>,
        parent_table: impl Into<Cow<'static, str>>,
        prefix: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        Self {
            parent_schema: parent_schema.map(|s| Cow::Owned(s.to_string())),
            parent_table: parent_table.into(),
            prefix: prefix.into_iter().map(Into::into).collect(),
        }
    }
}

// =============================================================================
// Runtime Type
// =============================================================================

#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Table {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub schema: Option<Cow<'static, str>>,
    pub name: Cow<'static, str>,
    pub columns: Vec<Column>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub primary_key: Option<PrimaryKey>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub unique_constraints: Vec<UniqueConstraint>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub check_constraints: Vec<CheckConstraint>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub foreign_keys: Vec<ForeignKey>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub options: TableOptions,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub interleave_in_parent: Option<InterleaveInParent>,
}

impl Table {
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
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    #[must_use]
    pub fn primary_key(self, primary_key: PrimaryKey) -> Self {
        Self {
            primary_key: Some(primary_key),
            ..self
        }
    }

    #[must_use]
    pub fn unique_constraint(mut self, constraint: UniqueConstraint) -> Self {
        self.unique_constraints.push(constraint);
        self
    }

    #[must_use]
    pub fn check_constraint(mut self, constraint: CheckConstraint) -> Self {
        self.check_constraints.push(constraint);
        self
    }

    #[must_use]
    pub fn foreign_key(mut self, foreign_key: ForeignKey) -> Self {
        self.foreign_keys.push(foreign_key);
        self
    }

    #[must_use]
    pub fn comment(mut self, comment: impl Into<Cow<'static, str>>) -> Self {
        self.options.comment = Some(comment.into());
        self
    }

    #[must_use]
    pub fn unlogged(mut self, unlogged: bool) -> Self {
        self.options.unlogged = Some(unlogged);
        self
    }

    #[must_use]
    pub fn storage_parameter(mut self, parameter: StorageParameter) -> Self {
        self.options.storage_parameters.push(parameter);
        self
    }

    #[must_use]
    pub fn interleave_in_parent(self, interleave: InterleaveInParent) -> Self {
        Self {
            interleave_in_parent: Some(interleave),
            ..self
        }
    }

    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}
