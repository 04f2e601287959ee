//! Vendor annotations and their typed counterparts
//!
//! Scaffolding tools and schema differs exchange dialect extensions as a flat list of
//! named [`Annotation`]s. Inside this workspace every entity carries a typed options
//! struct instead; the `from_annotations` / `to_annotations` pairs here translate
//! between the two shapes.
//!
//! Database-level objects are encoded in the annotation *name*:
//! `Postgres:Enum:app.mood` declares the enum `mood` in schema `app`.

use std::borrow::Cow;

use thiserror::Error;

use super::ValueGenerationStrategy;
use super::ddl::{
    DatabaseModel, Enum, Extension, IndexOptions, NullSortOrder, RangeType, SortOrder,
    StorageParameter, StorageValue, TableOptions,
};
use crate::ident::split_schema;

/// Annotation names
pub mod names {
    pub const PREFIX: &str = "Postgres:";

    /// Model default schema (owned by the host framework, not this dialect)
    pub const DEFAULT_SCHEMA: &str = "Relational:DefaultSchema";

    pub const VALUE_GENERATION_STRATEGY: &str = "Postgres:ValueGenerationStrategy";
    /// Retired predecessor of [`VALUE_GENERATION_STRATEGY`]; rejected wherever it appears
    pub const VALUE_GENERATED_ON_ADD: &str = "Postgres:ValueGeneratedOnAdd";
    pub const HILO_SEQUENCE_NAME: &str = "Postgres:HiLoSequenceName";
    pub const HILO_SEQUENCE_SCHEMA: &str = "Postgres:HiLoSequenceSchema";
    pub const DATABASE_TEMPLATE: &str = "Postgres:DatabaseTemplate";
    pub const TABLESPACE: &str = "Postgres:Tablespace";

    pub const COMMENT: &str = "Postgres:Comment";
    pub const UNLOGGED_TABLE: &str = "Postgres:UnloggedTable";
    pub const STORAGE_PARAMETER_PREFIX: &str = "Postgres:StorageParameter:";

    pub const INDEX_METHOD: &str = "Postgres:IndexMethod";
    pub const INDEX_OPERATORS: &str = "Postgres:IndexOperators";
    pub const INDEX_COLLATION: &str = "Postgres:IndexCollation";
    pub const INDEX_SORT_ORDER: &str = "Postgres:IndexSortOrder";
    pub const INDEX_NULL_SORT_ORDER: &str = "Postgres:IndexNullSortOrder";
    pub const INDEX_INCLUDE: &str = "Postgres:IndexInclude";

    pub const EXTENSION_PREFIX: &str = "Postgres:PostgresExtension:";
    pub const ENUM_PREFIX: &str = "Postgres:Enum:";
    pub const RANGE_PREFIX: &str = "Postgres:Range:";
}

// =============================================================================
// Annotation
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnnotationValue {
    Null,
    Bool(bool),
    Text(Cow<'static, str>),
    TextList(Vec<Cow<'static, str>>),
    Strategy(ValueGenerationStrategy),
    SortOrders(Vec<SortOrder>),
    NullSortOrders(Vec<NullSortOrder>),
    Storage(StorageValue),
}

impl AnnotationValue {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Text(_) => "text",
            Self::TextList(_) => "text list",
            Self::Strategy(_) => "strategy",
            Self::SortOrders(_) => "sort orders",
            Self::NullSortOrders(_) => "null sort orders",
            Self::Storage(_) => "storage value",
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// A named dialect extension attached to a model, table, column or index
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Annotation {
    pub name: Cow<'static, str>,
    pub value: AnnotationValue,
}

impl Annotation {
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>, value: AnnotationValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    #[must_use]
    pub fn text(name: impl Into<Cow<'static, str>>, value: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, AnnotationValue::Text(value.into()))
    }

    #[must_use]
    pub fn text_list<I, S>(name: impl Into<Cow<'static, str>>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        Self::new(
            name,
            AnnotationValue::TextList(values.into_iter().map(Into::into).collect()),
        )
    }

    /// The part of the name after `prefix`, if the name starts with it
    #[must_use]
    pub fn suffix_after(&self, prefix: &str) -> Option<&str> {
        self.name.strip_prefix(prefix)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnnotationError {
    #[error("annotation '{name}' expects a {expected} value, found {found}")]
    UnexpectedValue {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("annotation '{0}' does not name a database object")]
    MissingObjectName(String),

    #[error("malformed range annotation '{0}': expected subtype followed by four optional hooks")]
    MalformedRange(String),

    #[error(
        "the '{}' annotation has been replaced by '{}'; regenerate the model with the current annotation scheme",
        names::VALUE_GENERATED_ON_ADD,
        names::VALUE_GENERATION_STRATEGY
    )]
    LegacyValueGeneratedOnAdd,
}

fn unexpected(annotation: &Annotation, expected: &'static str) -> AnnotationError {
    AnnotationError::UnexpectedValue {
        name: annotation.name.to_string(),
        expected,
        found: annotation.value.kind(),
    }
}

fn text_value(annotation: &Annotation) -> Result<Option<Cow<'static, str>>, AnnotationError> {
    match &annotation.value {
        AnnotationValue::Text(s) => Ok(Some(s.clone())),
        AnnotationValue::Null => Ok(None),
        _ => Err(unexpected(annotation, "text")),
    }
}

fn text_list_value(annotation: &Annotation) -> Result<Vec<Cow<'static, str>>, AnnotationError> {
    match &annotation.value {
        AnnotationValue::TextList(values) => Ok(values.clone()),
        AnnotationValue::Null => Ok(Vec::new()),
        _ => Err(unexpected(annotation, "text list")),
    }
}

fn optional_text(name: &'static str, value: &Option<Cow<'static, str>>, out: &mut Vec<Annotation>) {
    if let Some(value) = value {
        out.push(Annotation::text(name, value.clone()));
    }
}

/// Split `schema.name` from an object annotation name.
fn object_key(annotation: &Annotation, prefix: &str) -> Result<(Option<String>, String), AnnotationError> {
    let key = annotation
        .suffix_after(prefix)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| AnnotationError::MissingObjectName(annotation.name.to_string()))?;
    let (schema, name) = split_schema(key);
    if name.is_empty() {
        return Err(AnnotationError::MissingObjectName(annotation.name.to_string()));
    }
    Ok((schema.map(str::to_string), name.to_string()))
}

fn object_name(prefix: &str, schema: Option<&str>, name: &str) -> String {
    match schema {
        Some(schema) => format!("{prefix}{schema}.{name}"),
        None => format!("{prefix}{name}"),
    }
}

// =============================================================================
// Column
// =============================================================================

/// Dialect options of a column
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ColumnOptions {
    pub comment: Option<Cow<'static, str>>,
    pub strategy: Option<ValueGenerationStrategy>,
}

impl ColumnOptions {
    /// Collect the column annotations this dialect owns; others are ignored.
    ///
    /// # Errors
    ///
    /// Fails on a value of the wrong kind and on the retired `ValueGeneratedOnAdd`
    /// annotation.
    pub fn from_annotations(annotations: &[Annotation]) -> Result<Self, AnnotationError> {
        let mut options = Self::default();
        for annotation in annotations {
            match annotation.name.as_ref() {
                names::VALUE_GENERATED_ON_ADD => {
                    return Err(AnnotationError::LegacyValueGeneratedOnAdd);
                }
                names::COMMENT => options.comment = text_value(annotation)?,
                names::VALUE_GENERATION_STRATEGY => match &annotation.value {
                    AnnotationValue::Strategy(strategy) => options.strategy = Some(*strategy),
                    AnnotationValue::Null => options.strategy = None,
                    _ => return Err(unexpected(annotation, "strategy")),
                },
                _ => {}
            }
        }
        Ok(options)
    }

    #[must_use]
    pub fn to_annotations(&self) -> Vec<Annotation> {
        let mut out = Vec::new();
        if let Some(strategy) = self.strategy {
            out.push(Annotation::new(
                names::VALUE_GENERATION_STRATEGY,
                AnnotationValue::Strategy(strategy),
            ));
        }
        optional_text(names::COMMENT, &self.comment, &mut out);
        out
    }
}

// =============================================================================
// Table
// =============================================================================

impl TableOptions {
    /// Collect comment, unlogged flag and storage parameters in declaration order.
    ///
    /// # Errors
    ///
    /// Fails on a value of the wrong kind.
    pub fn from_annotations(annotations: &[Annotation]) -> Result<Self, AnnotationError> {
        let mut options = Self::default();
        for annotation in annotations {
            if let Some(key) = annotation.suffix_after(names::STORAGE_PARAMETER_PREFIX) {
                let value = match &annotation.value {
                    AnnotationValue::Storage(v) => v.clone(),
                    AnnotationValue::Bool(b) => StorageValue::Bool(*b),
                    AnnotationValue::Text(s) => StorageValue::Str(s.clone()),
                    _ => return Err(unexpected(annotation, "storage value")),
                };
                options
                    .storage_parameters
                    .push(StorageParameter::new(key.to_string(), value));
                continue;
            }

            match annotation.name.as_ref() {
                names::COMMENT => options.comment = text_value(annotation)?,
                names::UNLOGGED_TABLE => match annotation.value {
                    AnnotationValue::Bool(b) => options.unlogged = Some(b),
                    AnnotationValue::Null => options.unlogged = None,
                    _ => return Err(unexpected(annotation, "bool")),
                },
                _ => {}
            }
        }
        Ok(options)
    }

    #[must_use]
    pub fn to_annotations(&self) -> Vec<Annotation> {
        let mut out = Vec::new();
        optional_text(names::COMMENT, &self.comment, &mut out);
        if let Some(unlogged) = self.unlogged {
            out.push(Annotation::new(
                names::UNLOGGED_TABLE,
                AnnotationValue::Bool(unlogged),
            ));
        }
        for parameter in &self.storage_parameters {
            out.push(Annotation::new(
                format!("{}{}", names::STORAGE_PARAMETER_PREFIX, parameter.name),
                AnnotationValue::Storage(parameter.value.clone()),
            ));
        }
        out
    }
}

// =============================================================================
// Index
// =============================================================================

impl IndexOptions {
    /// # Errors
    ///
    /// Fails on a value of the wrong kind.
    pub fn from_annotations(annotations: &[Annotation]) -> Result<Self, AnnotationError> {
        let mut options = Self::default();
        for annotation in annotations {
            match annotation.name.as_ref() {
                names::INDEX_METHOD => options.method = text_value(annotation)?,
                names::INDEX_OPERATORS => options.operators = text_list_value(annotation)?,
                names::INDEX_COLLATION => options.collations = text_list_value(annotation)?,
                names::INDEX_INCLUDE => options.include = text_list_value(annotation)?,
                names::INDEX_SORT_ORDER => match &annotation.value {
                    AnnotationValue::SortOrders(v) => options.sort_orders = v.clone(),
                    _ => return Err(unexpected(annotation, "sort orders")),
                },
                names::INDEX_NULL_SORT_ORDER => match &annotation.value {
                    AnnotationValue::NullSortOrders(v) => options.null_sort_orders = v.clone(),
                    _ => return Err(unexpected(annotation, "null sort orders")),
                },
                _ => {}
            }
        }
        Ok(options)
    }

    #[must_use]
    pub fn to_annotations(&self) -> Vec<Annotation> {
        let mut out = Vec::new();
        optional_text(names::INDEX_METHOD, &self.method, &mut out);
        if !self.operators.is_empty() {
            out.push(Annotation::text_list(names::INDEX_OPERATORS, self.operators.clone()));
        }
        if !self.collations.is_empty() {
            out.push(Annotation::text_list(names::INDEX_COLLATION, self.collations.clone()));
        }
        if !self.sort_orders.is_empty() {
            out.push(Annotation::new(
                names::INDEX_SORT_ORDER,
                AnnotationValue::SortOrders(self.sort_orders.clone()),
            ));
        }
        if !self.null_sort_orders.is_empty() {
            out.push(Annotation::new(
                names::INDEX_NULL_SORT_ORDER,
                AnnotationValue::NullSortOrders(self.null_sort_orders.clone()),
            ));
        }
        if !self.include.is_empty() {
            out.push(Annotation::text_list(names::INDEX_INCLUDE, self.include.clone()));
        }
        out
    }
}

// =============================================================================
// Database-level objects
// =============================================================================

impl Extension {
    /// `Postgres:PostgresExtension:[schema.]name`, value the version (or null)
    ///
    /// # Errors
    ///
    /// Fails when the name has no object part or the value is not text.
    pub fn from_annotation(annotation: &Annotation) -> Result<Self, AnnotationError> {
        let (schema, name) = object_key(annotation, names::EXTENSION_PREFIX)?;
        Ok(Self {
            schema: schema.map(Cow::Owned),
            name: Cow::Owned(name),
            version: text_value(annotation)?,
        })
    }

    #[must_use]
    pub fn to_annotation(&self) -> Annotation {
        Annotation::new(
            object_name(names::EXTENSION_PREFIX, self.schema.as_deref(), &self.name),
            self.version
                .clone()
                .map_or(AnnotationValue::Null, AnnotationValue::Text),
        )
    }
}

impl Enum {
    /// `Postgres:Enum:[schema.]name`, value the ordered labels
    ///
    /// # Errors
    ///
    /// Fails when the name has no object part or the value is not a text list.
    pub fn from_annotation(annotation: &Annotation) -> Result<Self, AnnotationError> {
        let (schema, name) = object_key(annotation, names::ENUM_PREFIX)?;
        Ok(Self {
            schema: schema.map(Cow::Owned),
            name: Cow::Owned(name),
            labels: text_list_value(annotation)?,
        })
    }

    #[must_use]
    pub fn to_annotation(&self) -> Annotation {
        Annotation::text_list(
            object_name(names::ENUM_PREFIX, self.schema.as_deref(), &self.name),
            self.labels.clone(),
        )
    }
}

impl RangeType {
    /// `Postgres:Range:[schema.]name`, value `[subtype, canonical, opclass, collation, diff]`
    /// with empty strings for unset hooks
    ///
    /// # Errors
    ///
    /// Fails when the name has no object part or the value is not a five-element list
    /// beginning with a subtype.
    pub fn from_annotation(annotation: &Annotation) -> Result<Self, AnnotationError> {
        let (schema, name) = object_key(annotation, names::RANGE_PREFIX)?;
        let parts = text_list_value(annotation)?;
        let [subtype, canonical, opclass, collation, diff]: [Cow<'static, str>; 5] = parts
            .try_into()
            .map_err(|_| AnnotationError::MalformedRange(annotation.name.to_string()))?;
        if subtype.is_empty() {
            return Err(AnnotationError::MalformedRange(annotation.name.to_string()));
        }

        let hook = |s: Cow<'static, str>| (!s.is_empty()).then_some(s);
        Ok(Self {
            schema: schema.map(Cow::Owned),
            name: Cow::Owned(name),
            subtype,
            canonical_function: hook(canonical),
            subtype_opclass: hook(opclass),
            collation: hook(collation),
            subtype_diff: hook(diff),
        })
    }

    #[must_use]
    pub fn to_annotation(&self) -> Annotation {
        let hook = |s: &Option<Cow<'static, str>>| s.clone().unwrap_or(Cow::Borrowed(""));
        Annotation::text_list(
            object_name(names::RANGE_PREFIX, self.schema.as_deref(), &self.name),
            [
                self.subtype.clone(),
                hook(&self.canonical_function),
                hook(&self.subtype_opclass),
                hook(&self.collation),
                hook(&self.subtype_diff),
            ],
        )
    }
}

impl DatabaseModel {
    /// Model-level annotations, in the order scaffolding emits them
    #[must_use]
    pub fn to_annotations(&self) -> Vec<Annotation> {
        let mut out = Vec::new();
        optional_text(names::DEFAULT_SCHEMA, &self.default_schema, &mut out);
        if let Some(strategy) = self.strategy {
            out.push(Annotation::new(
                names::VALUE_GENERATION_STRATEGY,
                AnnotationValue::Strategy(strategy),
            ));
        }
        optional_text(names::HILO_SEQUENCE_NAME, &self.hilo_sequence_name, &mut out);
        optional_text(names::HILO_SEQUENCE_SCHEMA, &self.hilo_sequence_schema, &mut out);
        optional_text(names::DATABASE_TEMPLATE, &self.database_template, &mut out);
        optional_text(names::TABLESPACE, &self.tablespace, &mut out);
        out.extend(self.extensions.iter().map(Extension::to_annotation));
        out.extend(self.enums.iter().map(Enum::to_annotation));
        out.extend(self.ranges.iter().map(RangeType::to_annotation));
        out
    }

    /// Rebuild the model-wide settings and database-level objects from annotations.
    ///
    /// Tables and sequences are not carried by annotations and stay empty.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed annotation.
    pub fn from_annotations(annotations: &[Annotation]) -> Result<Self, AnnotationError> {
        let mut model = Self::default();
        for annotation in annotations {
            if annotation.name.starts_with(names::EXTENSION_PREFIX) {
                model.extensions.push(Extension::from_annotation(annotation)?);
                continue;
            }
            if annotation.name.starts_with(names::ENUM_PREFIX) {
                model.enums.push(Enum::from_annotation(annotation)?);
                continue;
            }
            if annotation.name.starts_with(names::RANGE_PREFIX) {
                model.ranges.push(RangeType::from_annotation(annotation)?);
                continue;
            }

            match annotation.name.as_ref() {
                names::DEFAULT_SCHEMA => model.default_schema = text_value(annotation)?,
                names::HILO_SEQUENCE_NAME => model.hilo_sequence_name = text_value(annotation)?,
                names::HILO_SEQUENCE_SCHEMA => model.hilo_sequence_schema = text_value(annotation)?,
                names::DATABASE_TEMPLATE => model.database_template = text_value(annotation)?,
                names::TABLESPACE => model.tablespace = text_value(annotation)?,
                names::VALUE_GENERATION_STRATEGY => match &annotation.value {
                    AnnotationValue::Strategy(strategy) => model.strategy = Some(*strategy),
                    AnnotationValue::Null => model.strategy = None,
                    _ => return Err(unexpected(annotation, "strategy")),
                },
                _ => {}
            }
        }
        Ok(model)
    }
}
