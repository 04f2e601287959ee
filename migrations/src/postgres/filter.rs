//! Storage parameter rendering and system column filtering
//!
//! Both table creation and table alteration read storage parameters through
//! [`storage_parameters`], so `WITH (...)`, `SET (...)` and `RESET (...)` always agree
//! on key order and value rendering.

use pgschema_types::postgres::ddl::{Column, TableOptions};

/// Columns every PostgreSQL table has implicitly
///
/// See: <https://www.postgresql.org/docs/current/ddl-system-columns.html>
pub const SYSTEM_COLUMNS: &[&str] = &["oid", "tableoid", "xmin", "cmin", "xmax", "cmax", "ctid"];

/// Returns `true` for names that DDL must never create, alter or drop.
#[must_use]
pub fn is_system_column(name: &str) -> bool {
    SYSTEM_COLUMNS.contains(&name)
}

/// Columns of a table definition that DDL should emit
pub fn user_columns(columns: &[Column]) -> impl Iterator<Item = &Column> {
    columns.iter().filter(|c| !is_system_column(&c.name))
}

/// Storage parameters as rendered `(key, value)` pairs in declaration order
///
/// A key declared twice keeps its first position and its last value.
#[must_use]
pub fn storage_parameters(options: &TableOptions) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = Vec::with_capacity(options.storage_parameters.len());
    for parameter in &options.storage_parameters {
        let value = parameter.value.to_string();
        match out.iter_mut().find(|(key, _)| *key == parameter.name) {
            Some((_, existing)) => *existing = value,
            None => out.push((parameter.name.to_string(), value)),
        }
    }
    out
}

/// `key=value, key=value`
#[must_use]
pub fn format_assignments(parameters: &[(String, String)]) -> String {
    parameters
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Storage parameter changes between two versions of a table
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StorageDiff {
    /// New or changed parameters, in the new declaration order
    pub set: Vec<(String, String)>,
    /// Keys present before but not after, in the old declaration order
    pub reset: Vec<String>,
}

impl StorageDiff {
    #[must_use]
    pub fn between(old: &TableOptions, new: &TableOptions) -> Self {
        let old = storage_parameters(old);
        let new = storage_parameters(new);

        let set = new
            .iter()
            .filter(|(key, value)| !old.iter().any(|(k, v)| k == key && v == value))
            .cloned()
            .collect();
        let reset = old
            .iter()
            .filter(|(key, _)| !new.iter().any(|(k, _)| k == key))
            .map(|(key, _)| key.clone())
            .collect();

        Self { set, reset }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.reset.is_empty()
    }
}
