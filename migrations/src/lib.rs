//! pgschema Migrations - PostgreSQL DDL generation for pgschema
//!
//! This crate provides:
//! - [`SchemaOperation`], the ordered schema changes a differ produces
//! - [`PostgresGenerator`], which turns operations into SQL command batches
//! - Annotation classification and builder-call rendering for model scaffolding
//! - [`ValueGeneratorCache`], the shared HiLo allocator state per sequence
//! - TOML configuration via [`GeneratorConfig`]
//!
//! # Generating SQL
//!
//! ```
//! use pgschema_migrations::{PostgresGenerator, SchemaOperation};
//!
//! let ops = [
//!     SchemaOperation::EnsureSchema { name: "app".into() },
//!     SchemaOperation::RestartSequence {
//!         schema: Some("app".into()),
//!         name: "orders_id_seq".into(),
//!         start_value: 1000,
//!     },
//! ];
//!
//! let commands = PostgresGenerator::new().generate(&ops, None).unwrap();
//! assert_eq!(commands[0].sql, "CREATE SCHEMA IF NOT EXISTS app;\n");
//! assert_eq!(commands[1].sql, "ALTER SEQUENCE app.orders_id_seq RESTART WITH 1000;\n");
//! ```
//!
//! Batches are independent: each [`MigrationCommand`] is executed on its own, and
//! those marked `suppress_transaction` must run outside a transaction.
//!
//! # Configuration
//!
//! ```toml
//! # pgschema.toml
//! postgres_version = "9.6"
//! default_schema = "app"
//! breakpoints = true
//! ```
//!
//! ```ignore
//! let config = GeneratorConfig::from_file("pgschema.toml".as_ref())?;
//! let generator = PostgresGenerator::from_config(&config)?;
//! ```
//!
//! # Tracing
//!
//! With the `tracing` feature every consumed operation, emitted batch and rejected
//! operation is reported as a `tracing` event.

pub mod config;
pub mod error;
pub mod postgres;
mod tracing;

pub use config::{ConfigError, GeneratorConfig};
pub use error::MigrationError;
pub use postgres::{
    AnnotationClassifier, AnnotationTarget, BuilderCall, CallArgument, ClassifierRegistry,
    CommandListBuilder, DatabaseObjects, HiLoState, MigrationCommand, PostgresAnnotationClassifier,
    PostgresGenerator, Rename, SchemaOperation, ValueGeneratorCache,
};

// Re-export serde_json for callers exchanging operation lists
pub use serde_json;
