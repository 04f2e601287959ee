//! PostgreSQL DDL entity descriptors
//!
//! Every type here is an owned runtime value with `Cow<'static, str>` names, so a
//! description can be built from string literals in tests or deserialized from JSON.
//!
//! # PostgreSQL-Specific Features
//!
//! - **Schemas** - Namespace support (`public`, `custom_schema`, etc.)
//! - **Enums** and **Ranges** - User-defined types declared on the model
//! - **Extensions** - `CREATE EXTENSION` requirements
//! - **Sequences** - Standalone sequences, including the HiLo sequence
//! - **Identity / Serial Columns** - per-column value generation strategies
//! - **Generated Columns** - GENERATED ALWAYS AS expression STORED
//! - **Index Options** - Access methods, operator classes, collations, null ordering
//! - **Storage Parameters** - `WITH (fillfactor=70)` on tables

mod check_constraint;
mod column;
mod enum_type;
mod extension;
mod foreign_key;
mod index;
mod model;
mod primary_key;
mod range_type;
mod sequence;
mod storage;
mod table;
mod unique_constraint;

pub use check_constraint::CheckConstraint;
pub use column::Column;
pub use enum_type::Enum;
pub use extension::Extension;
pub use foreign_key::{ForeignKey, ReferentialAction};
pub use index::{Index, IndexColumn, IndexOptions, NullSortOrder, SortOrder};
pub use model::{DEFAULT_HILO_INCREMENT, DEFAULT_HILO_SEQUENCE_NAME, DEFAULT_SCHEMA, DatabaseModel};
pub use primary_key::PrimaryKey;
pub use range_type::RangeType;
pub use sequence::Sequence;
pub use storage::{StorageParameter, StorageValue};
pub use table::{InterleaveInParent, Table, TableOptions};
pub use unique_constraint::UniqueConstraint;
