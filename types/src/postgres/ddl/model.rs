//! Read-only schema snapshot handed to the DDL generator
//!
//! Besides the declared tables, the model carries the database-level objects that
//! don't belong to any table (extensions, enums, ranges, sequences) and the
//! model-wide settings: default schema, key value-generation strategy, HiLo
//! sequence, creation template and tablespace.

use std::borrow::Cow;

use super::{Column, Enum, Extension, RangeType, Sequence, Table};
use crate::postgres::ValueGenerationStrategy;

/// Schema used when neither an object nor the model names one
pub const DEFAULT_SCHEMA: &str = "public";

/// Sequence backing [`ValueGenerationStrategy::SequenceHiLo`] unless renamed
pub const DEFAULT_HILO_SEQUENCE_NAME: &str = "HiLoSequence";

/// Block size of the HiLo sequence created by [`DatabaseModel::use_hilo`]
pub const DEFAULT_HILO_INCREMENT: i64 = 10;

#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct DatabaseModel {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub default_schema: Option<Cow<'static, str>>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub strategy: Option<ValueGenerationStrategy>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub hilo_sequence_name: Option<Cow<'static, str>>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub hilo_sequence_schema: Option<Cow<'static, str>>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub database_template: Option<Cow<'static, str>>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub tablespace: Option<Cow<'static, str>>,
    pub extensions: Vec<Extension>,
    pub enums: Vec<Enum>,
    pub ranges: Vec<RangeType>,
    pub sequences: Vec<Sequence>,
    pub tables: Vec<Table>,
}

impl DatabaseModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_default_schema(self, schema: impl Into<Cow<'static, str>>) -> Self {
        Self {
            default_schema: Some(schema.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    /// The model's default schema, `public` when none is configured
    #[must_use]
    pub fn default_schema(&self) -> &str {
        self.default_schema.as_deref().unwrap_or(DEFAULT_SCHEMA)
    }

    /// Schema an object ends up in: its own, else the model default
    #[must_use]
    pub fn schema_or_default<'a>(&'a self, schema: Option<&'a str>) -> &'a str {
        schema.unwrap_or_else(|| self.default_schema())
    }

    #[must_use]
    pub fn hilo_sequence_name(&self) -> &str {
        self.hilo_sequence_name
            .as_deref()
            .unwrap_or(DEFAULT_HILO_SEQUENCE_NAME)
    }

    // =========================================================================
    // Value generation
    // =========================================================================

    /// Switch key generation to HiLo, declaring the backing sequence if it doesn't exist.
    pub fn use_hilo(&mut self, name: Option<&str>, schema: Option<&str>) -> &mut Self {
        let name = name.unwrap_or(DEFAULT_HILO_SEQUENCE_NAME).to_string();
        let schema = schema.map(str::to_string);

        if self.find_sequence(&name, schema.as_deref()).is_none() {
            self.sequences.push(
                Sequence::new(name.clone())
                    .in_schema(schema.clone().map(Cow::Owned))
                    .increment_by(DEFAULT_HILO_INCREMENT),
            );
        }

        self.strategy = Some(ValueGenerationStrategy::SequenceHiLo);
        self.hilo_sequence_name = Some(Cow::Owned(name));
        self.hilo_sequence_schema = schema.map(Cow::Owned);
        self
    }

    pub fn use_serial_columns(&mut self) -> &mut Self {
        self.set_column_strategy(ValueGenerationStrategy::SerialColumn)
    }

    pub fn use_identity_always_columns(&mut self) -> &mut Self {
        self.set_column_strategy(ValueGenerationStrategy::IdentityAlwaysColumn)
    }

    pub fn use_identity_by_default_columns(&mut self) -> &mut Self {
        self.set_column_strategy(ValueGenerationStrategy::IdentityByDefaultColumn)
    }

    /// Alias of [`use_identity_by_default_columns`](Self::use_identity_by_default_columns)
    pub fn use_identity_columns(&mut self) -> &mut Self {
        self.use_identity_by_default_columns()
    }

    fn set_column_strategy(&mut self, strategy: ValueGenerationStrategy) -> &mut Self {
        self.strategy = Some(strategy);
        self.hilo_sequence_name = None;
        self.hilo_sequence_schema = None;
        self
    }

    // =========================================================================
    // Database-level objects
    // =========================================================================

    pub fn get_or_add_extension(
        &mut self,
        schema: Option<&str>,
        name: &str,
        version: Option<&str>,
    ) -> &mut Extension {
        let pos = match self.extensions.iter().position(|e| {
            e.name == name && e.schema.as_deref() == schema
        }) {
            Some(pos) => pos,
            None => {
                let mut extension = Extension::new(name.to_string());
                extension.schema = schema.map(|s| Cow::Owned(s.to_string()));
                extension.version = version.map(|v| Cow::Owned(v.to_string()));
                self.extensions.push(extension);
                self.extensions.len() - 1
            }
        };
        &mut self.extensions[pos]
    }

    pub fn get_or_add_enum<I, S>(&mut self, schema: Option<&str>, name: &str, labels: I) -> &mut Enum
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        let pos = match self.enums.iter().position(|e| e.key() == (schema, name)) {
            Some(pos) => pos,
            None => {
                self.enums
                    .push(Enum::new(schema, name.to_string(), labels));
                self.enums.len() - 1
            }
        };
        &mut self.enums[pos]
    }

    /// Declare a range type; an existing declaration with the same key is returned untouched.
    pub fn get_or_add_range(&mut self, range: RangeType) -> &mut RangeType {
        let pos = match self
            .ranges
            .iter()
            .position(|r| r.key() == range.key())
        {
            Some(pos) => pos,
            None => {
                self.ranges.push(range);
                self.ranges.len() - 1
            }
        };
        &mut self.ranges[pos]
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    pub fn find_sequence(&self, name: &str, schema: Option<&str>) -> Option<&Sequence> {
        let schema = self.schema_or_default(schema);
        self.sequences
            .iter()
            .find(|s| s.name == name && self.schema_or_default(s.schema.as_deref()) == schema)
    }

    pub fn find_table(&self, name: &str, schema: Option<&str>) -> Option<&Table> {
        let schema = self.schema_or_default(schema);
        self.tables
            .iter()
            .find(|t| t.name == name && self.schema_or_default(t.schema.as_deref()) == schema)
    }

    pub fn find_column(&self, schema: Option<&str>, table: &str, column: &str) -> Option<&Column> {
        self.find_table(table, schema)?.find_column(column)
    }
}
