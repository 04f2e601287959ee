//! PostgreSQL index descriptor
//!
//! Per-column modifiers are positional: `options.operators[i]` applies to `columns[i]`.
//! Any list shorter than the column list leaves the remaining columns at their defaults.

use std::borrow::Cow;

// =============================================================================
// Shared Types
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NullSortOrder {
    #[default]
    Unspecified,
    NullsFirst,
    NullsLast,
}

impl NullSortOrder {
    /// `NULLS FIRST` / `NULLS LAST`, or `None` when unspecified
    #[must_use]
    pub const fn as_sql(&self) -> Option<&'static str> {
        match self {
            Self::Unspecified => None,
            Self::NullsFirst => Some("NULLS FIRST"),
            Self::NullsLast => Some("NULLS LAST"),
        }
    }
}

/// Dialect options of an index
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct IndexOptions {
    /// Access method (`btree`, `gin`, `gist`, ...); `None` is the server default
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub method: Option<Cow<'static, str>>,
    /// Operator class per column; an empty string means none
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub operators: Vec<Cow<'static, str>>,
    /// Collation per column; an empty string means none
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub collations: Vec<Cow<'static, str>>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub sort_orders: Vec<SortOrder>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub null_sort_orders: Vec<NullSortOrder>,
    /// Non-key columns stored in the index (`INCLUDE`)
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub include: Vec<Cow<'static, str>>,
}

impl IndexOptions {
    /// Returns `true` when the method allows per-column `DESC` / `NULLS` modifiers.
    ///
    /// Of the built-in access methods only btree (the default) supports ordering.
    #[must_use]
    pub fn supports_ordering(&self) -> bool {
        self.method.as_deref().is_none_or(|m| m == "btree")
    }
}

/// One resolved column of an index with its modifiers
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexColumn<'a> {
    pub name: &'a str,
    pub operator: Option<&'a str>,
    pub collation: Option<&'a str>,
    pub sort_order: SortOrder,
    pub null_sort_order: NullSortOrder,
}

// =============================================================================
// Runtime Type
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Index {
    pub name: Cow<'static, str>,
    /// Schema of the indexed table
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub schema: Option<Cow<'static, str>>,
    pub table: Cow<'static, str>,
    pub columns: Vec<Cow<'static, str>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub unique: bool,
    /// Partial index predicate
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub filter: Option<Cow<'static, str>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub options: IndexOptions,
}

impl Index {
    #[must_use]
    pub fn new<I, S>(
        name: impl Into<Cow<'static, str>>,
        table: impl Into<Cow<'static, str>>,
        columns: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        Self {
            name: name.into(),
            table: table.into(),
            columns: columns.into_iter().map(Into::into).collect(),
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
    pub fn unique(self) -> Self {
        Self {
            unique: true,
            ..self
        }
    }

    #[must_use]
    pub fn filter(self, filter: impl Into<Cow<'static, str>>) -> Self {
        Self {
            filter: Some(filter.into()),
            ..self
        }
    }

    #[must_use]
    pub fn method(mut self, method: impl Into<Cow<'static, str>>) -> Self {
        self.options.method = Some(method.into());
        self
    }

    #[must_use]
    pub fn operators<I, S>(mut self, operators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        self.options.operators = operators.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn collations<I, S>(mut self, collations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        self.options.collations = collations.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn sort_orders(mut self, sort_orders: impl Into<Vec<SortOrder>>) -> Self {
        self.options.sort_orders = sort_orders.into();
        self
    }

    #[must_use]
    pub fn null_sort_orders(mut self, null_sort_orders: impl Into<Vec<NullSortOrder>>) -> Self {
        self.options.null_sort_orders = null_sort_orders.into();
        self
    }

    #[must_use]
    pub fn include<I, S>(mut self, include: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        self.options.include = include.into_iter().map(Into::into).collect();
        self
    }

    /// Columns zipped with their positional modifiers
    pub fn index_columns(&self) -> impl Iterator<Item = IndexColumn<'_>> {
        let opts = &self.options;
        self.columns.iter().enumerate().map(move |(i, name)| IndexColumn {
            name,
            operator: opts
                .operators
                .get(i)
                .map(|s| s.as_ref())
                .filter(|s| !s.is_empty()),
            collation: opts
                .collations
                .get(i)
                .map(|s| s.as_ref())
                .filter(|s| !s.is_empty()),
            sort_order: opts.sort_orders.get(i).copied().unwrap_or_default(),
            null_sort_order: opts.null_sort_orders.get(i).copied().unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_modifier_lists_default_the_rest() {
        let index = Index::new("IX_People_A_B", "People", ["A", "B"])
            .operators(["text_pattern_ops"])
            .sort_orders([SortOrder::Descending]);

        let cols: Vec<_> = index.index_columns().collect();
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[0].operator, Some("text_pattern_ops"));
        assert_eq!(cols[0].sort_order, SortOrder::Descending);
        assert_eq!(cols[1].operator, None);
        assert_eq!(cols[1].sort_order, SortOrder::Ascending);
        assert_eq!(cols[1].null_sort_order, NullSortOrder::Unspecified);
    }

    #[test]
    fn test_empty_operator_means_none() {
        let index = Index::new("ix", "t", ["a", "b"]).operators(["", "gist_trgm_ops"]);
        let ops: Vec<_> = index.index_columns().map(|c| c.operator).collect();
        assert_eq!(ops, vec![None, Some("gist_trgm_ops")]);
    }

    #[test]
    fn test_ordering_support_by_method() {
        assert!(IndexOptions::default().supports_ordering());
        assert!(Index::new("ix", "t", ["a"]).method("btree").options.supports_ordering());
        assert!(!Index::new("ix", "t", ["a"]).method("gin").options.supports_ordering());
    }
}
