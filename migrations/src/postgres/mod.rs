//! PostgreSQL DDL generation and scaffolding support

pub mod classifier;
pub mod codegen;
pub mod command;
pub mod filter;
pub mod operations;
pub mod statements;
pub mod value_generator;

pub use classifier::{
    AnnotationClassifier, AnnotationTarget, ClassifierRegistry, PostgresAnnotationClassifier,
};
pub use codegen::{BuilderCall, CallArgument, render_chain};
pub use command::{BREAKPOINT, CommandListBuilder, MigrationCommand, render_script};
pub use filter::{SYSTEM_COLUMNS, StorageDiff, is_system_column, storage_parameters};
pub use operations::{DatabaseObjects, Rename, SchemaOperation};
pub use statements::PostgresGenerator;
pub use value_generator::{HiLoState, ValueGeneratorCache};
