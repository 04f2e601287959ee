//! Shared type definitions for pgschema
//!
//! This crate provides the data model the other pgschema crates operate on:
//!
//! - [`DialectVersion`] - optional server version gating syntax availability
//! - Identifier quoting in [`ident`]
//! - PostgreSQL semantic types, runtime values, DDL descriptors and annotations in the
//!   [`postgres`] module
//!
//! # Features
//!
//! - `std` - Standard library support (enabled by default)
//! - `serde` - Enable serde serialization/deserialization of descriptors and values

pub mod ident;
pub mod postgres;
pub mod serde_helpers;
mod version;

pub use ident::{delimit_identifier, delimit_qualified, requires_quoting, split_schema};
pub use version::{DialectVersion, VersionParseError, at_least};

/// Prelude module for commonly used types
pub mod prelude {
    pub use crate::DialectVersion;
    pub use crate::postgres::ddl::{Column, DatabaseModel, Index, Sequence, Table};
    pub use crate::postgres::{Annotation, AnnotationValue, SemanticType, ValueGenerationStrategy, Value};
}
