//! Tracing utilities for DDL generation observability.
//!
//! Enable the `tracing` feature to emit events via the `tracing` crate.
//! These macros no-op when the feature is disabled, avoiding `#[cfg]` boilerplate
//! at every call site.

/// Emit a debug-level tracing event for each schema operation consumed.
///
/// ```ignore
/// pgschema_trace_operation!("alter_column", "dbo.People.Id");
/// ```
#[macro_export]
macro_rules! pgschema_trace_operation {
    ($kind:expr, $target:expr) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!(kind = $kind, target = %$target, "pgschema.operation");
    };
}

/// Emit a debug-level tracing event for each finished command batch.
///
/// ```ignore
/// pgschema_trace_command!(&command.sql, command.suppress_transaction);
/// ```
#[macro_export]
macro_rules! pgschema_trace_command {
    ($sql:expr, $suppress_transaction:expr) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!(
            sql = %$sql,
            suppress_transaction = $suppress_transaction,
            "pgschema.command"
        );
    };
}

/// Emit a warn-level tracing event right before generation is aborted.
///
/// ```ignore
/// pgschema_trace_rejected!(&err);
/// ```
#[macro_export]
macro_rules! pgschema_trace_rejected {
    ($reason:expr) => {
        #[cfg(feature = "tracing")]
        ::tracing::warn!(reason = %$reason, "pgschema.rejected");
    };
}
