//! PostgreSQL SQL generation from schema operations
//!
//! [`PostgresGenerator::generate`] walks the operation list in order and appends
//! statements to a [`CommandListBuilder`]. Most operations end their own batch; the
//! exceptions are noted on the individual emitters.

use std::borrow::Cow;

use pgschema_postgres::{render_sql_literal, string_literal};
use pgschema_types::postgres::ddl::{
    CheckConstraint, Column, DatabaseModel, Enum, Extension, ForeignKey, Index, PrimaryKey,
    RangeType, ReferentialAction, Sequence, SortOrder, Table, TableOptions, UniqueConstraint,
};
use pgschema_types::postgres::{
    SemanticType, ValueGenerationStrategy, is_integer_store_type, serial_store_type,
};
use pgschema_types::{DialectVersion, at_least, delimit_identifier, delimit_qualified};

use super::command::{BREAKPOINT, CommandListBuilder, MigrationCommand, render_script};
use super::filter::{StorageDiff, format_assignments, is_system_column, storage_parameters, user_columns};
use super::operations::{DatabaseObjects, Rename, SchemaOperation};
use crate::config::{ConfigError, GeneratorConfig};
use crate::error::MigrationError;

const INDENT: &str = "    ";

// =============================================================================
// Generator
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresGenerator {
    /// Target server version; `None` allows the newest syntax
    pub version: Option<DialectVersion>,
    /// Schema for enums and ranges when neither they nor the model name one
    pub default_schema: Option<String>,
    pub breakpoints: bool,
    pub batch_delimiter: String,
}

impl Default for PostgresGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PostgresGenerator {
    pub fn new() -> Self {
        Self {
            version: None,
            default_schema: None,
            breakpoints: true,
            batch_delimiter: BREAKPOINT.to_string(),
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            version: config.version()?,
            default_schema: Some(config.default_schema.clone()),
            breakpoints: config.breakpoints,
            batch_delimiter: config.batch_delimiter.clone(),
        })
    }

    pub fn with_version(mut self, version: DialectVersion) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_default_schema(mut self, schema: impl Into<String>) -> Self {
        self.default_schema = Some(schema.into());
        self
    }

    pub fn with_breakpoints(mut self, breakpoints: bool) -> Self {
        self.breakpoints = breakpoints;
        self
    }

    /// Translate `operations` into command batches.
    ///
    /// `model` is the target schema snapshot; it supplies store types for columns that
    /// don't carry one and the default schema for enums and ranges.
    ///
    /// # Errors
    ///
    /// Stops at the first operation that can't be expressed for the target version.
    /// Commands generated before the failure are discarded.
    pub fn generate(
        &self,
        operations: &[SchemaOperation],
        model: Option<&DatabaseModel>,
    ) -> Result<Vec<MigrationCommand>, MigrationError> {
        let mut generation = Generation {
            generator: self,
            model,
            out: CommandListBuilder::new(),
        };

        for operation in operations {
            crate::pgschema_trace_operation!(operation.kind(), operation.target());
            if let Err(err) = generation.operation(operation) {
                crate::pgschema_trace_rejected!(&err);
                return Err(err);
            }
        }

        Ok(generation.out.build())
    }

    /// Like [`generate`](Self::generate), joined into one script with the configured
    /// batch delimiter.
    pub fn generate_script(
        &self,
        operations: &[SchemaOperation],
        model: Option<&DatabaseModel>,
    ) -> Result<String, MigrationError> {
        let commands = self.generate(operations, model)?;
        Ok(render_script(&commands, self.breakpoints, &self.batch_delimiter))
    }
}

// =============================================================================
// Generation
// =============================================================================

/// State of one `generate` call
struct Generation<'g, 'm> {
    generator: &'g PostgresGenerator,
    model: Option<&'m DatabaseModel>,
    out: CommandListBuilder,
}

impl Generation<'_, '_> {
    fn operation(&mut self, operation: &SchemaOperation) -> Result<(), MigrationError> {
        match operation {
            SchemaOperation::CreateTable(table) => self.create_table(table)?,
            SchemaOperation::DropTable { schema, name } => {
                self.statement(&format!("DROP TABLE {}", delimit_qualified(name, schema.as_deref())));
            }
            SchemaOperation::RenameTable(rename) => self.rename("TABLE", rename),
            SchemaOperation::AlterTable { schema, name, old, new } => {
                self.alter_table(schema.as_deref(), name, old, new);
            }

            SchemaOperation::AddColumn { schema, table, column } => {
                self.add_column(schema.as_deref(), table, column)?;
            }
            SchemaOperation::DropColumn { schema, table, name } => {
                self.drop_column(schema.as_deref(), table, name);
            }
            SchemaOperation::AlterColumn { schema, table, old, new } => {
                self.alter_column(schema.as_deref(), table, old, new)?;
            }
            SchemaOperation::RenameColumn { schema, table, name, new_name } => {
                self.statement(&format!(
                    "ALTER TABLE {} RENAME COLUMN {} TO {}",
                    delimit_qualified(table, schema.as_deref()),
                    delimit_identifier(name),
                    delimit_identifier(new_name)
                ));
            }

            SchemaOperation::CreateIndex(index) => self.create_index(index),
            SchemaOperation::DropIndex { schema, name } => {
                self.statement(&format!("DROP INDEX {}", delimit_qualified(name, schema.as_deref())));
            }
            SchemaOperation::RenameIndex { schema, name, new_name } => {
                // indexes always live in their table's schema
                if new_name != name {
                    self.out.append_statement(&format!(
                        "ALTER INDEX {} RENAME TO {}",
                        delimit_qualified(name, schema.as_deref()),
                        delimit_identifier(new_name)
                    ));
                }
                self.out.end_command(false);
            }

            SchemaOperation::CreateSequence(sequence) => self.create_sequence(sequence),
            SchemaOperation::AlterSequence(sequence) => {
                self.statement(&format!(
                    "ALTER SEQUENCE {}{}",
                    delimit_qualified(&sequence.name, sequence.schema.as_deref()),
                    sequence_options(sequence)
                ));
            }
            SchemaOperation::DropSequence { schema, name } => {
                self.statement(&format!(
                    "DROP SEQUENCE {}",
                    delimit_qualified(name, schema.as_deref())
                ));
            }
            SchemaOperation::RenameSequence(rename) => self.rename("SEQUENCE", rename),
            SchemaOperation::RestartSequence { schema, name, start_value } => {
                self.statement(&format!(
                    "ALTER SEQUENCE {} RESTART WITH {start_value}",
                    delimit_qualified(name, schema.as_deref())
                ));
            }

            SchemaOperation::EnsureSchema { name } => self.ensure_schema(name),
            SchemaOperation::DropSchema { name } => {
                self.statement(&format!("DROP SCHEMA {}", delimit_identifier(name)));
            }

            SchemaOperation::AlterDatabase { old, new } => self.alter_database(old, new)?,
            SchemaOperation::CreateDatabase { name, template, tablespace } => {
                // the model supplies what the operation leaves out
                let model = self.model;
                let template = template
                    .as_deref()
                    .or_else(|| model.and_then(|m| m.database_template.as_deref()));
                let tablespace = tablespace
                    .as_deref()
                    .or_else(|| model.and_then(|m| m.tablespace.as_deref()));
                self.create_database(name, template, tablespace);
            }
            SchemaOperation::DropDatabase { name } => self.drop_database(name),

            SchemaOperation::AddPrimaryKey { schema, table, primary_key } => {
                self.add_constraint(schema.as_deref(), table, &primary_key_clause(primary_key));
            }
            SchemaOperation::AddUniqueConstraint { schema, table, constraint } => {
                self.add_constraint(schema.as_deref(), table, &unique_clause(constraint));
            }
            SchemaOperation::AddForeignKey { schema, table, foreign_key } => {
                self.add_constraint(schema.as_deref(), table, &foreign_key_clause(foreign_key));
            }
            SchemaOperation::AddCheckConstraint { schema, table, constraint } => {
                self.add_constraint(schema.as_deref(), table, &check_clause(constraint));
            }
            SchemaOperation::DropPrimaryKey { schema, table, name }
            | SchemaOperation::DropUniqueConstraint { schema, table, name }
            | SchemaOperation::DropForeignKey { schema, table, name }
            | SchemaOperation::DropCheckConstraint { schema, table, name } => {
                self.statement(&format!(
                    "ALTER TABLE {} DROP CONSTRAINT {}",
                    delimit_qualified(table, schema.as_deref()),
                    delimit_identifier(name)
                ));
            }

            SchemaOperation::Sql { sql, suppress_transaction } => {
                self.out.append(sql);
                if !sql.ends_with('\n') {
                    self.out.append("\n");
                }
                self.out.end_command(*suppress_transaction);
            }
        }
        Ok(())
    }

    /// A single statement forming its own batch
    fn statement(&mut self, sql: &str) {
        self.out.append_statement(sql).end_command(false);
    }

    // -------------------------------------------------------------------------
    // Tables
    // -------------------------------------------------------------------------

    /// `CREATE TABLE` followed by its comments, all in one batch
    fn create_table(&mut self, table: &Table) -> Result<(), MigrationError> {
        let schema = table.schema.as_deref();
        let qualified = delimit_qualified(&table.name, schema);

        let mut lines = Vec::new();
        for column in user_columns(&table.columns) {
            lines.push(self.column_definition(schema, &table.name, column)?);
        }
        if let Some(primary_key) = &table.primary_key {
            lines.push(primary_key_clause(primary_key));
        }
        lines.extend(table.unique_constraints.iter().map(unique_clause));
        lines.extend(table.check_constraints.iter().map(check_clause));
        lines.extend(table.foreign_keys.iter().map(foreign_key_clause));

        let mut sql = String::from("CREATE ");
        if table.options.is_unlogged() {
            sql.push_str("UNLOGGED ");
        }
        sql.push_str(&format!("TABLE {qualified} (\n"));
        sql.push_str(
            &lines
                .iter()
                .map(|line| format!("{INDENT}{line}"))
                .collect::<Vec<_>>()
                .join(",\n"),
        );
        sql.push_str("\n)");

        // CockroachDB, see https://www.cockroachlabs.com/docs/stable/interleave-in-parent.html
        if let Some(interleave) = &table.interleave_in_parent {
            sql.push_str(&format!(
                "\nINTERLEAVE IN PARENT {} ({})",
                delimit_qualified(&interleave.parent_table, interleave.parent_schema.as_deref()),
                column_list(&interleave.prefix)
            ));
        }

        let parameters = storage_parameters(&table.options);
        if !parameters.is_empty() {
            sql.push_str(&format!("\nWITH ({})", format_assignments(&parameters)));
        }
        self.out.append_statement(&sql);

        if let Some(comment) = table.options.comment.as_deref().filter(|c| !c.is_empty()) {
            self.out.append_statement(&format!(
                "COMMENT ON TABLE {qualified} IS {}",
                string_literal(comment)
            ));
        }
        for column in user_columns(&table.columns) {
            if let Some(comment) = &column.comment {
                self.out.append_statement(&format!(
                    "COMMENT ON COLUMN {qualified}.{} IS {}",
                    delimit_identifier(&column.name),
                    string_literal(comment)
                ));
            }
        }

        self.out.end_command(false);
        Ok(())
    }

    /// Storage parameters, comment and logging, each only when changed
    fn alter_table(&mut self, schema: Option<&str>, name: &str, old: &TableOptions, new: &TableOptions) {
        let qualified = delimit_qualified(name, schema);
        let mut changed = false;

        let storage = StorageDiff::between(old, new);
        if !storage.set.is_empty() {
            self.out.append_statement(&format!(
                "ALTER TABLE {qualified} SET ({})",
                format_assignments(&storage.set)
            ));
            changed = true;
        }
        if !storage.reset.is_empty() {
            self.out.append_statement(&format!(
                "ALTER TABLE {qualified} RESET ({})",
                storage.reset.join(", ")
            ));
            changed = true;
        }

        if old.comment != new.comment {
            self.out.append_statement(&format!(
                "COMMENT ON TABLE {qualified} IS {}",
                comment_literal(new.comment.as_deref())
            ));
            changed = true;
        }

        if old.is_unlogged() != new.is_unlogged() {
            let logging = if new.is_unlogged() { "UNLOGGED" } else { "LOGGED" };
            self.out
                .append_statement(&format!("ALTER TABLE {qualified} SET {logging}"));
            changed = true;
        }

        if changed {
            self.out.end_command(false);
        }
    }

    fn rename(&mut self, kind: &str, rename: &Rename) {
        let schema = rename.schema.as_deref();
        let mut name: &str = &rename.name;

        if let Some(new_name) = rename.new_name.as_deref().filter(|n| *n != name) {
            self.out.append_statement(&format!(
                "ALTER {kind} {} RENAME TO {}",
                delimit_qualified(name, schema),
                delimit_identifier(new_name)
            ));
            name = new_name;
        }

        if let Some(new_schema) = rename.new_schema.as_deref().filter(|s| Some(*s) != schema) {
            self.out.append_statement(&format!(
                "ALTER {kind} {} SET SCHEMA {}",
                delimit_qualified(name, schema),
                delimit_identifier(new_schema)
            ));
        }

        self.out.end_command(false);
    }

    fn add_constraint(&mut self, schema: Option<&str>, table: &str, clause: &str) {
        self.statement(&format!(
            "ALTER TABLE {} ADD {clause}",
            delimit_qualified(table, schema)
        ));
    }

    // -------------------------------------------------------------------------
    // Columns
    // -------------------------------------------------------------------------

    /// Store type from the column, else the model snapshot, else the semantic type
    fn column_type(&self, schema: Option<&str>, table: &str, column: &Column) -> Cow<'static, str> {
        if let Some(store_type) = &column.store_type {
            return store_type.clone();
        }
        self.model
            .and_then(|model| model.find_column(schema, table, &column.name))
            .and_then(|c| c.store_type.clone())
            .unwrap_or_else(|| column.own_store_type())
    }

    fn check_value_generation(&self, table: &str, column: &Column) -> Result<(), MigrationError> {
        if column.legacy_value_generated_on_add {
            return Err(MigrationError::LegacyValueGeneratedOnAdd {
                table: table.to_string(),
                column: column.name.to_string(),
            });
        }
        self.check_identity_supported(table, &column.name, column.strategy)
    }

    fn check_identity_supported(
        &self,
        table: &str,
        column: &str,
        strategy: ValueGenerationStrategy,
    ) -> Result<(), MigrationError> {
        if !strategy.is_identity() {
            return Ok(());
        }
        match self.generator.version.filter(|v| *v < DialectVersion::V10) {
            Some(version) => Err(MigrationError::IdentityColumnsUnsupported {
                table: table.to_string(),
                column: column.to_string(),
                strategy,
                version,
            }),
            None => Ok(()),
        }
    }

    fn column_definition(
        &self,
        schema: Option<&str>,
        table: &str,
        column: &Column,
    ) -> Result<String, MigrationError> {
        let name = delimit_identifier(&column.name);
        let store_type = self.column_type(schema, table, column);

        if let Some(sql) = &column.computed_sql {
            if let Some(version) = self.generator.version.filter(|v| *v < DialectVersion::V12) {
                return Err(MigrationError::ComputedColumnsUnsupported {
                    table: table.to_string(),
                    column: column.name.to_string(),
                    version,
                });
            }
            return Ok(format!("{name} {store_type} GENERATED ALWAYS AS ({sql}) STORED"));
        }

        self.check_value_generation(table, column)?;

        let store_type = match column.strategy {
            ValueGenerationStrategy::SerialColumn => serial_store_type(&store_type)
                .map(Cow::Borrowed)
                .unwrap_or(store_type),
            _ => store_type,
        };

        let mut sql = format!(
            "{name} {store_type} {}",
            if column.nullable { "NULL" } else { "NOT NULL" }
        );
        sql.push_str(&default_clause(column)?);
        if let Some(clause) = column.strategy.identity_clause() {
            sql.push_str(&format!(" GENERATED {clause} AS IDENTITY"));
        }
        Ok(sql)
    }

    fn add_column(&mut self, schema: Option<&str>, table: &str, column: &Column) -> Result<(), MigrationError> {
        if is_system_column(&column.name) {
            return Ok(());
        }

        let qualified = delimit_qualified(table, schema);
        let definition = self.column_definition(schema, table, column)?;
        self.out
            .append_statement(&format!("ALTER TABLE {qualified} ADD {definition}"));

        if let Some(comment) = column.comment.as_deref().filter(|c| !c.is_empty()) {
            self.out.append_statement(&format!(
                "COMMENT ON COLUMN {qualified}.{} IS {}",
                delimit_identifier(&column.name),
                string_literal(comment)
            ));
        }

        self.out.end_command(false);
        Ok(())
    }

    fn drop_column(&mut self, schema: Option<&str>, table: &str, name: &str) {
        if is_system_column(name) {
            return;
        }
        self.statement(&format!(
            "ALTER TABLE {} DROP COLUMN {}",
            delimit_qualified(table, schema),
            delimit_identifier(name)
        ));
    }

    fn alter_column(
        &mut self,
        schema: Option<&str>,
        table: &str,
        old: &Column,
        new: &Column,
    ) -> Result<(), MigrationError> {
        if is_system_column(&new.name) {
            return Ok(());
        }

        // no ALTER COLUMN form makes a column generated; the drop batch must precede the add
        if new.computed_sql.is_some() {
            self.drop_column(schema, table, &new.name);
            return self.add_column(schema, table, new);
        }

        if new.legacy_value_generated_on_add {
            return Err(MigrationError::LegacyValueGeneratedOnAdd {
                table: table.to_string(),
                column: new.name.to_string(),
            });
        }

        let column_type = self.column_type(schema, table, new);
        let qualified_table = delimit_qualified(table, schema);
        let column = delimit_identifier(&new.name);
        let alter_base = format!("ALTER TABLE {qualified_table} ALTER COLUMN {column} ");

        self.out
            .append_statement(&format!("{alter_base}TYPE {column_type}"));
        self.out.append_statement(&format!(
            "{alter_base}{}",
            if new.nullable { "DROP NOT NULL" } else { "SET NOT NULL" }
        ));

        let mut owned_sequence = None;
        if old.strategy != new.strategy {
            owned_sequence = self.strategy_transition(
                StrategyChange {
                    schema,
                    table,
                    column: new,
                    column_type: &column_type,
                    alter_base: &alter_base,
                },
                old.strategy,
            )?;
        }

        // generated columns manage their defaults through the transition above
        if new.strategy == ValueGenerationStrategy::None {
            let default = default_clause(new)?;
            if default.is_empty() {
                self.out.append_statement(&format!("{alter_base}DROP DEFAULT"));
            } else {
                self.out.append_statement(&format!("{alter_base}SET{default}"));
            }
        }

        if let Some(sequence) = owned_sequence {
            self.out.append_statement(&format!(
                "ALTER SEQUENCE {sequence} OWNED BY {qualified_table}.{column}"
            ));
        }

        if old.comment != new.comment {
            self.out.append_statement(&format!(
                "COMMENT ON COLUMN {qualified_table}.{column} IS {}",
                comment_literal(new.comment.as_deref())
            ));
        }

        self.out.end_command(false);
        Ok(())
    }

    /// Rewrite a column from one value generation strategy to another.
    ///
    /// Returns the qualified name of a sequence created for the column, whose ownership
    /// must be transferred once the column default is in place.
    fn strategy_transition(
        &mut self,
        change: StrategyChange<'_>,
        from: ValueGenerationStrategy,
    ) -> Result<Option<String>, MigrationError> {
        use ValueGenerationStrategy as S;

        let StrategyChange { schema, table, column, column_type, alter_base } = change;
        let to = column.strategy;
        self.check_identity_supported(table, &column.name, to)?;

        let sequence_name = format!("{table}_{}_seq", column.name);
        let sequence = delimit_qualified(&sequence_name, schema);

        match (from, to) {
            (S::SerialColumn, S::None) => {
                self.out
                    .append_statement(&format!("DROP SEQUENCE {sequence} CASCADE"));
            }
            (S::SerialColumn, S::IdentityAlwaysColumn | S::IdentityByDefaultColumn) => {
                // keep the current sequence value across the switch
                let old_sequence_name = format!("{table}_{}_old_seq", column.name);
                let old_sequence = delimit_qualified(&old_sequence_name, schema);
                let clause = to.identity_clause().unwrap_or_default();

                self.out
                    .append_statement(&format!(
                        "ALTER SEQUENCE {sequence} RENAME TO {}",
                        delimit_identifier(&old_sequence_name)
                    ))
                    .append_statement(&format!("{alter_base}DROP DEFAULT"))
                    .append_statement(&format!("{alter_base}ADD GENERATED {clause} AS IDENTITY"))
                    .append_statement(&format!(
                        "SELECT * FROM setval({}, nextval({}), false)",
                        string_literal(&sequence),
                        string_literal(&old_sequence)
                    ))
                    .append_statement(&format!("DROP SEQUENCE {old_sequence}"));
            }
            (S::IdentityAlwaysColumn | S::IdentityByDefaultColumn, S::None) => {
                self.out
                    .append_statement(&format!("{alter_base}DROP IDENTITY"));
            }
            (
                S::IdentityAlwaysColumn | S::IdentityByDefaultColumn,
                S::IdentityAlwaysColumn | S::IdentityByDefaultColumn,
            ) => {
                let clause = to.identity_clause().unwrap_or_default();
                self.out
                    .append_statement(&format!("{alter_base}SET GENERATED {clause}"));
            }
            (S::IdentityAlwaysColumn | S::IdentityByDefaultColumn, S::SerialColumn) => {
                return Err(MigrationError::IdentityToSerial {
                    table: table.to_string(),
                    column: column.name.to_string(),
                });
            }
            (S::None, S::IdentityAlwaysColumn | S::IdentityByDefaultColumn) => {
                let clause = to.identity_clause().unwrap_or_default();
                self.out
                    .append_statement(&format!("{alter_base}ADD GENERATED {clause} AS IDENTITY"));
            }
            (S::None, S::SerialColumn) => {
                if !is_integer_store_type(column_type) {
                    return Err(MigrationError::SerialOnNonInteger {
                        table: table.to_string(),
                        column: column.name.to_string(),
                        store_type: column_type.to_string(),
                    });
                }

                // CREATE SEQUENCE closes the batch holding TYPE and NOT NULL
                self.create_sequence(
                    &Sequence::new(sequence_name)
                        .in_schema(schema.map(|s| Cow::Owned(s.to_string())))
                        .semantic_type(integer_semantic_type(column_type)),
                );
                self.out.append_statement(&format!(
                    "{alter_base}SET DEFAULT (nextval({}))",
                    string_literal(&sequence)
                ));
                return Ok(Some(sequence));
            }
            // HiLo keys are plain columns fed from a shared sequence
            (S::SequenceHiLo, _) => {}
            _ => {
                return Err(MigrationError::UnsupportedStrategyTransition {
                    table: table.to_string(),
                    column: column.name.to_string(),
                    from,
                    to,
                });
            }
        }

        Ok(None)
    }

    // -------------------------------------------------------------------------
    // Indexes and sequences
    // -------------------------------------------------------------------------

    fn create_index(&mut self, index: &Index) {
        let mut sql = String::from("CREATE ");
        if index.unique {
            sql.push_str("UNIQUE ");
        }
        sql.push_str(&format!(
            "INDEX {} ON {}",
            delimit_identifier(&index.name),
            delimit_qualified(&index.table, index.schema.as_deref())
        ));

        let options = &index.options;
        if let Some(method) = options.method.as_deref().filter(|m| !m.is_empty()) {
            sql.push_str(&format!(" USING {method}"));
        }

        let supports_ordering = options.supports_ordering();
        let columns = index
            .index_columns()
            .map(|column| {
                let mut item = delimit_identifier(column.name);
                if let Some(operator) = column.operator {
                    item.push(' ');
                    item.push_str(&delimit_operator(operator));
                }
                if let Some(collation) = column.collation {
                    item.push_str(&format!(" COLLATE {collation}"));
                }
                // of the built-in access methods only btree sorts
                if supports_ordering {
                    if column.sort_order == SortOrder::Descending {
                        item.push_str(" DESC");
                    }
                    if let Some(nulls) = column.null_sort_order.as_sql() {
                        item.push(' ');
                        item.push_str(nulls);
                    }
                }
                item
            })
            .collect::<Vec<_>>()
            .join(", ");
        sql.push_str(&format!(" ({columns})"));

        if !options.include.is_empty() {
            sql.push_str(&format!(" INCLUDE ({})", column_list(&options.include)));
        }
        if let Some(filter) = &index.filter {
            sql.push_str(&format!(" WHERE {filter}"));
        }

        self.statement(&sql);
    }

    /// `AS <type>` only exists from 10 on; older servers always get a 64-bit sequence
    fn create_sequence(&mut self, sequence: &Sequence) {
        let mut sql = format!(
            "CREATE SEQUENCE {}",
            delimit_qualified(&sequence.name, sequence.schema.as_deref())
        );
        if sequence.semantic_type != SemanticType::BigInt && at_least(self.generator.version, 10, 0) {
            sql.push_str(&format!(" AS {}", sequence.semantic_type.store_type()));
        }
        sql.push_str(&format!(" START WITH {}", sequence.start_with));
        sql.push_str(&sequence_options(sequence));
        self.statement(&sql);
    }

    // -------------------------------------------------------------------------
    // Schemas and databases
    // -------------------------------------------------------------------------

    /// `public` always exists and is never ensured
    fn ensure_schema(&mut self, name: &str) {
        if name == "public" {
            return;
        }
        self.statement(&format!(
            "CREATE SCHEMA IF NOT EXISTS {}",
            delimit_identifier(name)
        ));
    }

    fn create_database(&mut self, name: &str, template: Option<&str>, tablespace: Option<&str>) {
        let mut sql = format!("CREATE DATABASE {}", delimit_identifier(name));
        if let Some(template) = template {
            sql.push_str(&format!(" TEMPLATE {}", delimit_identifier(template)));
        }
        if let Some(tablespace) = tablespace {
            sql.push_str(&format!(" TABLESPACE {}", delimit_identifier(tablespace)));
        }
        self.out.append_statement(&sql).end_command(true);
    }

    /// Sessions are cut off in a batch of their own before the drop
    fn drop_database(&mut self, name: &str) {
        let database = delimit_identifier(name);
        self.out
            .append_statement(&format!("REVOKE CONNECT ON DATABASE {database} FROM PUBLIC"))
            .append_statement(&format!(
                "SELECT pg_terminate_backend(pg_stat_activity.pid) FROM pg_stat_activity WHERE datname = {}",
                string_literal(name)
            ))
            .end_command(true)
            .append_statement(&format!("DROP DATABASE {database}"))
            .end_command(true);
    }

    /// Enums, then ranges, then extensions, in one batch
    fn alter_database(&mut self, old: &DatabaseObjects, new: &DatabaseObjects) -> Result<(), MigrationError> {
        for enumeration in new.enums.iter().filter(|n| !old.enums.iter().any(|o| o.key() == n.key())) {
            self.create_enum(enumeration);
        }
        for enumeration in old.enums.iter().filter(|o| !new.enums.iter().any(|n| n.key() == o.key())) {
            self.drop_type(enumeration.schema.as_deref(), &enumeration.name);
        }
        if let Some(altered) = new
            .enums
            .iter()
            .find(|n| old.enums.iter().any(|o| o.key() == n.key() && o != *n))
        {
            return Err(MigrationError::EnumAlteration(
                self.object_name(altered.schema.as_deref(), &altered.name),
            ));
        }

        for range in new.ranges.iter().filter(|n| !old.ranges.iter().any(|o| o.key() == n.key())) {
            self.create_range(range);
        }
        for range in old.ranges.iter().filter(|o| !new.ranges.iter().any(|n| n.key() == o.key())) {
            self.drop_type(range.schema.as_deref(), &range.name);
        }
        if let Some(altered) = new
            .ranges
            .iter()
            .find(|n| old.ranges.iter().any(|o| o.key() == n.key() && o != *n))
        {
            return Err(MigrationError::RangeAlteration(
                self.object_name(altered.schema.as_deref(), &altered.name),
            ));
        }

        for extension in &new.extensions {
            self.create_extension(extension);
        }

        self.out.end_command(false);
        Ok(())
    }

    /// Schema of a database-level type: its own, the model's default, the generator's default
    fn object_schema(&self, schema: Option<&str>) -> Option<String> {
        schema
            .map(str::to_string)
            .or_else(|| {
                self.model
                    .and_then(|model| model.default_schema.as_deref())
                    .map(str::to_string)
            })
            .or_else(|| self.generator.default_schema.clone())
    }

    fn object_name(&self, schema: Option<&str>, name: &str) -> String {
        delimit_qualified(name, self.object_schema(schema).as_deref())
    }

    /// The schema differ doesn't know about types, so their schema is ensured here
    fn create_enum(&mut self, enumeration: &Enum) {
        let schema = self.object_schema(enumeration.schema.as_deref());
        if let Some(schema) = &schema {
            self.ensure_schema(schema);
        }

        let labels = enumeration
            .labels
            .iter()
            .map(|label| string_literal(label))
            .collect::<Vec<_>>()
            .join(", ");
        self.out.append_statement(&format!(
            "CREATE TYPE {} AS ENUM ({labels})",
            delimit_qualified(&enumeration.name, schema.as_deref())
        ));
    }

    fn create_range(&mut self, range: &RangeType) {
        let schema = self.object_schema(range.schema.as_deref());
        if let Some(schema) = &schema {
            self.ensure_schema(schema);
        }

        let mut definition = vec![format!("SUBTYPE = {}", range.subtype)];
        if let Some(canonical) = &range.canonical_function {
            definition.push(format!("CANONICAL = {canonical}"));
        }
        if let Some(opclass) = &range.subtype_opclass {
            definition.push(format!("SUBTYPE_OPCLASS = {opclass}"));
        }
        if let Some(collation) = &range.collation {
            definition.push(format!("COLLATION = {collation}"));
        }
        if let Some(diff) = &range.subtype_diff {
            definition.push(format!("SUBTYPE_DIFF = {diff}"));
        }

        let body = definition
            .iter()
            .map(|line| format!("{INDENT}{line}"))
            .collect::<Vec<_>>()
            .join(",\n");
        self.out.append_statement(&format!(
            "CREATE TYPE {} AS RANGE (\n{body}\n)",
            delimit_qualified(&range.name, schema.as_deref())
        ));
    }

    fn drop_type(&mut self, schema: Option<&str>, name: &str) {
        let name = self.object_name(schema, name);
        self.out.append_statement(&format!("DROP TYPE {name}"));
    }

    fn create_extension(&mut self, extension: &Extension) {
        let mut sql = format!(
            "CREATE EXTENSION IF NOT EXISTS {}",
            delimit_identifier(&extension.name)
        );
        if let Some(schema) = &extension.schema {
            sql.push_str(&format!(" SCHEMA {}", delimit_identifier(schema)));
        }
        if let Some(version) = &extension.version {
            sql.push_str(&format!(" VERSION {}", delimit_identifier(version)));
        }
        self.out.append_statement(&sql);
    }
}

/// Column context shared by the strategy transition arms
struct StrategyChange<'a> {
    schema: Option<&'a str>,
    table: &'a str,
    column: &'a Column,
    column_type: &'a str,
    alter_base: &'a str,
}

// =============================================================================
// Fragments
// =============================================================================

/// ` DEFAULT (sql)`, ` DEFAULT literal`, or empty
fn default_clause(column: &Column) -> Result<String, MigrationError> {
    if let Some(sql) = &column.default_sql {
        return Ok(format!(" DEFAULT ({sql})"));
    }
    match &column.default_value {
        Some(value) => Ok(format!(
            " DEFAULT {}",
            render_sql_literal(value, &column.semantic_type)?
        )),
        None => Ok(String::new()),
    }
}

fn comment_literal(comment: Option<&str>) -> String {
    comment.map_or_else(|| "NULL".to_string(), string_literal)
}

fn sequence_options(sequence: &Sequence) -> String {
    let mut sql = format!(" INCREMENT BY {}", sequence.increment_by);
    match sequence.min_value {
        Some(min) => sql.push_str(&format!(" MINVALUE {min}")),
        None => sql.push_str(" NO MINVALUE"),
    }
    match sequence.max_value {
        Some(max) => sql.push_str(&format!(" MAXVALUE {max}")),
        None => sql.push_str(" NO MAXVALUE"),
    }
    sql.push_str(if sequence.cycle { " CYCLE" } else { " NO CYCLE" });
    sql
}

fn integer_semantic_type(store_type: &str) -> SemanticType {
    match store_type {
        "smallint" | "int2" => SemanticType::SmallInt,
        "bigint" | "int8" => SemanticType::BigInt,
        _ => SemanticType::Integer,
    }
}

/// `schema.opclass` is delimited part by part
fn delimit_operator(operator: &str) -> String {
    match operator.split_once('.') {
        Some((schema, name)) => delimit_qualified(name, Some(schema)),
        None => delimit_identifier(operator),
    }
}

fn column_list(columns: &[Cow<'static, str>]) -> String {
    columns
        .iter()
        .map(|c| delimit_identifier(c))
        .collect::<Vec<_>>()
        .join(", ")
}

fn constraint_name(name: Option<&str>) -> String {
    name.map(|n| format!("CONSTRAINT {} ", delimit_identifier(n)))
        .unwrap_or_default()
}

fn primary_key_clause(primary_key: &PrimaryKey) -> String {
    format!(
        "{}PRIMARY KEY ({})",
        constraint_name(primary_key.name.as_deref()),
        column_list(&primary_key.columns)
    )
}

fn unique_clause(constraint: &UniqueConstraint) -> String {
    format!(
        "{}UNIQUE ({})",
        constraint_name(constraint.name.as_deref()),
        column_list(&constraint.columns)
    )
}

fn check_clause(constraint: &CheckConstraint) -> String {
    format!(
        "{}CHECK ({})",
        constraint_name(constraint.name.as_deref()),
        constraint.sql
    )
}

fn foreign_key_clause(foreign_key: &ForeignKey) -> String {
    let mut sql = format!(
        "{}FOREIGN KEY ({}) REFERENCES {}",
        constraint_name(foreign_key.name.as_deref()),
        column_list(&foreign_key.columns),
        delimit_qualified(
            &foreign_key.principal_table,
            foreign_key.principal_schema.as_deref()
        )
    );
    if !foreign_key.principal_columns.is_empty() {
        sql.push_str(&format!(" ({})", column_list(&foreign_key.principal_columns)));
    }
    if foreign_key.on_update != ReferentialAction::NoAction {
        sql.push_str(&format!(" ON UPDATE {}", foreign_key.on_update.as_sql()));
    }
    if foreign_key.on_delete != ReferentialAction::NoAction {
        sql.push_str(&format!(" ON DELETE {}", foreign_key.on_delete.as_sql()));
    }
    sql
}
