//! Command batches produced by the DDL generator

use serde::{Deserialize, Serialize};

/// Line separating command batches in a rendered migration script
pub const BREAKPOINT: &str = "--> statement-breakpoint";

/// One executable batch of SQL statements
///
/// Statements inside a batch are each terminated by `;` and a newline. A batch marked
/// `suppress_transaction` must run outside any explicit transaction (`CREATE DATABASE`,
/// `DROP DATABASE`).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MigrationCommand {
    pub sql: String,
    #[serde(default)]
    pub suppress_transaction: bool,
}

impl MigrationCommand {
    #[must_use]
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            suppress_transaction: false,
        }
    }

    /// Individual statements of the batch, without their terminators
    ///
    /// A `;` and newline inside a quoted string or identifier does not end a statement.
    /// Dollar-quoted bodies (`$$ ... $$`) are not recognized and are split like plain text.
    pub fn statements(&self) -> impl Iterator<Item = &str> {
        split_statements(&self.sql)
            .into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

fn split_statements(sql: &str) -> Vec<&str> {
    let bytes = sql.as_bytes();
    let mut statements = Vec::new();
    let mut start = 0;
    let mut quote: Option<u8> = None;
    // inside an E'...' string, where a backslash escapes the next byte
    let mut escapes = false;

    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(_) if escapes && b == b'\\' => i += 1,
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'\'' => {
                    // a doubled quote reopens the string it just closed
                    let reopened = i > 0 && bytes[i - 1] == b'\'';
                    if !reopened {
                        escapes = i > 0 && matches!(bytes[i - 1], b'E' | b'e');
                    }
                    quote = Some(b);
                }
                b'"' => {
                    escapes = false;
                    quote = Some(b);
                }
                b';' if bytes.get(i + 1) == Some(&b'\n') => {
                    statements.push(&sql[start..i]);
                    start = i + 2;
                    i += 1;
                }
                _ => {}
            },
        }
        i += 1;
    }
    statements.push(&sql[start..]);
    statements
}

/// Accumulates SQL text and cuts it into [`MigrationCommand`]s
#[derive(Debug, Default)]
pub struct CommandListBuilder {
    buffer: String,
    commands: Vec<MigrationCommand>,
}

impl CommandListBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, sql: &str) -> &mut Self {
        self.buffer.push_str(sql);
        self
    }

    /// Append one statement followed by its terminator
    pub fn append_statement(&mut self, sql: &str) -> &mut Self {
        self.buffer.push_str(sql);
        self.buffer.push_str(";\n");
        self
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Close the current batch; an empty buffer produces no command
    pub fn end_command(&mut self, suppress_transaction: bool) -> &mut Self {
        if !self.buffer.is_empty() {
            let sql = std::mem::take(&mut self.buffer);
            crate::pgschema_trace_command!(&sql, suppress_transaction);
            self.commands.push(MigrationCommand {
                sql,
                suppress_transaction,
            });
        }
        self
    }

    /// Commands produced so far, closing any pending batch
    #[must_use]
    pub fn build(mut self) -> Vec<MigrationCommand> {
        self.end_command(false);
        self.commands
    }
}

/// Join commands into a single script
///
/// With `breakpoints` set, batches are separated by `delimiter` on a line of its own.
#[must_use]
pub fn render_script(commands: &[MigrationCommand], breakpoints: bool, delimiter: &str) -> String {
    let mut out = String::new();
    for (i, command) in commands.iter().enumerate() {
        if i > 0 && breakpoints {
            out.push_str(delimiter);
            out.push('\n');
        }
        out.push_str(&command.sql);
        if !command.sql.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}
