//! PostgreSQL type definitions
//!
//! - [`SemanticType`] - application-level column types and their store types
//! - [`Value`] - runtime values embedded as literals
//! - [`ValueGenerationStrategy`] - how key values are generated
//! - [`ddl`] - descriptors of tables, columns, indexes and database-level objects
//! - [`annotations`] - vendor annotation names and the typed bridge

pub mod annotations;
pub mod ddl;
mod sql_type;
mod strategy;
mod values;

pub use annotations::{Annotation, AnnotationError, AnnotationValue, ColumnOptions};
pub use sql_type::{MAX_VARCHAR_LENGTH, SemanticType, is_integer_store_type, serial_store_type};
pub use strategy::ValueGenerationStrategy;
pub use values::{Circle, Line, Path, Range, Tid, TimeTz, Value};
