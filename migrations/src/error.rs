//! Error types for DDL generation and scaffolding

use pgschema_postgres::LiteralError;
use pgschema_types::postgres::{AnnotationError, ValueGenerationStrategy};
use pgschema_types::DialectVersion;

/// Errors that abort DDL generation or builder-call scaffolding.
///
/// None of these are transient; callers should discard any commands generated
/// before the failure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MigrationError {
    #[error(
        "don't know how to migrate column {table}.{column} from value generation strategy {from} to {to}"
    )]
    UnsupportedStrategyTransition {
        table: String,
        column: String,
        from: ValueGenerationStrategy,
        to: ValueGenerationStrategy,
    },

    #[error("migrating column {table}.{column} from identity to serial isn't supported")]
    IdentityToSerial { table: String, column: String },

    #[error(
        "column {table}.{column} can't become a serial column: store type '{store_type}' is not an integer type"
    )]
    SerialOnNonInteger {
        table: String,
        column: String,
        store_type: String,
    },

    #[error(
        "computed column {table}.{column} requires PostgreSQL 12 or later (targeting {version})"
    )]
    ComputedColumnsUnsupported {
        table: String,
        column: String,
        version: DialectVersion,
    },

    #[error(
        "identity column {table}.{column} ({strategy}) requires PostgreSQL 10 or later (targeting {version})"
    )]
    IdentityColumnsUnsupported {
        table: String,
        column: String,
        strategy: ValueGenerationStrategy,
        version: DialectVersion,
    },

    #[error(
        "column {table}.{column} carries the retired ValueGeneratedOnAdd annotation; use the \
         ValueGenerationStrategy annotation with SerialColumn for serial columns and remove it elsewhere"
    )]
    LegacyValueGeneratedOnAdd { table: String, column: String },

    #[error("altering enum type {0} isn't supported")]
    EnumAlteration(String),

    #[error("altering range type {0} isn't supported")]
    RangeAlteration(String),

    #[error("sequence HiLo has no scaffolding builder call for {0}")]
    HiLoScaffolding(String),

    #[error("Literal error: {0}")]
    Literal(#[from] LiteralError),

    #[error("Annotation error: {0}")]
    Annotation(#[from] AnnotationError),
}
