//! # pgschema
//!
//! PostgreSQL DDL synthesis and literal rendering for ORM migrations.
//!
//! ## Quick Start
//!
//! ```rust
//! use pgschema::prelude::*;
//!
//! let table = Table::new("People")
//!     .schema("dbo")
//!     .column(Column::new("Id", SemanticType::Integer).strategy(ValueGenerationStrategy::IdentityByDefaultColumn))
//!     .primary_key(PrimaryKey::new(["Id"]));
//!
//! let commands = PostgresGenerator::new()
//!     .generate(&[SchemaOperation::CreateTable(table)], None)
//!     .unwrap();
//!
//! assert_eq!(
//!     commands[0].sql,
//!     "CREATE TABLE dbo.\"People\" (\n    \"Id\" integer NOT NULL GENERATED BY DEFAULT AS IDENTITY,\n    PRIMARY KEY (\"Id\")\n);\n"
//! );
//! ```
//!
//! ## Crates
//!
//! | Crate                 | Contents                                                      |
//! |-----------------------|---------------------------------------------------------------|
//! | `pgschema-types`      | versions, semantic types, values, DDL descriptors, annotations |
//! | `pgschema-postgres`   | SQL and Rust literal rendering, range literal parsing          |
//! | `pgschema-migrations` | operations, SQL generation, scaffolding, HiLo state cache      |
//!
//! ## Features
//!
//! - `std` - Standard library support (enabled by default)
//! - `serde` - serde support for descriptors and values
//! - `tracing` - `tracing` events for generated operations and batches

pub use pgschema_migrations as migrations;
pub use pgschema_postgres as literal;
pub use pgschema_types as types;

pub use pgschema_migrations::{MigrationCommand, MigrationError, PostgresGenerator, SchemaOperation};
pub use pgschema_postgres::{LiteralError, render_code_literal, render_sql_literal};
pub use pgschema_types::DialectVersion;

/// Prelude module for commonly used types
pub mod prelude {
    pub use pgschema_migrations::config::GeneratorConfig;
    pub use pgschema_migrations::postgres::{
        AnnotationClassifier, AnnotationTarget, ClassifierRegistry, DatabaseObjects,
        MigrationCommand, PostgresAnnotationClassifier, PostgresGenerator, Rename,
        SchemaOperation, ValueGeneratorCache,
    };
    pub use pgschema_migrations::MigrationError;
    pub use pgschema_postgres::{render_code_literal, render_sql_literal};
    pub use pgschema_types::postgres::ddl::{
        CheckConstraint, Column, DatabaseModel, Enum, Extension, ForeignKey, Index, PrimaryKey,
        RangeType, Sequence, StorageParameter, Table, TableOptions, UniqueConstraint,
    };
    pub use pgschema_types::postgres::{
        Annotation, AnnotationValue, SemanticType, Value, ValueGenerationStrategy,
    };
    pub use pgschema_types::{DialectVersion, delimit_identifier, delimit_qualified};
}
