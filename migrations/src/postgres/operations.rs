//! Schema-change operations consumed by the DDL generator
//!
//! A schema differ emits these in dependency order; [`PostgresGenerator`] turns each
//! one into zero or more commands without reordering or mutating them.
//!
//! [`PostgresGenerator`]: super::PostgresGenerator

use std::borrow::Cow;

use pgschema_types::delimit_qualified;
use pgschema_types::postgres::ddl::{
    CheckConstraint, Column, DatabaseModel, Enum, Extension, ForeignKey, Index, PrimaryKey,
    RangeType, Sequence, Table, TableOptions, UniqueConstraint,
};
use serde::{Deserialize, Serialize};

type Name = Cow<'static, str>;

/// Database-level declarations compared by [`SchemaOperation::AlterDatabase`]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(default)]
pub struct DatabaseObjects {
    pub extensions: Vec<Extension>,
    pub enums: Vec<Enum>,
    pub ranges: Vec<RangeType>,
}

impl DatabaseObjects {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The declarations carried by a model
    #[must_use]
    pub fn from_model(model: &DatabaseModel) -> Self {
        Self {
            extensions: model.extensions.clone(),
            enums: model.enums.clone(),
            ranges: model.ranges.clone(),
        }
    }

    #[must_use]
    pub fn extension(mut self, extension: Extension) -> Self {
        self.extensions.push(extension);
        self
    }

    #[must_use]
    pub fn enumeration(mut self, enumeration: Enum) -> Self {
        self.enums.push(enumeration);
        self
    }

    #[must_use]
    pub fn range(mut self, range: RangeType) -> Self {
        self.ranges.push(range);
        self
    }
}

/// Rename and/or move an object to another schema
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Rename {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Name>,
    pub name: Name,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_schema: Option<Name>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_name: Option<Name>,
}

impl Rename {
    #[must_use]
    pub fn new(schema: Option<&str>, name: impl Into<Name>) -> Self {
        Self {
            schema: schema.map(|s| Cow::Owned(s.to_string())),
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn to(self, new_name: impl Into<Name>) -> Self {
        Self {
            new_name: Some(new_name.into()),
            ..self
        }
    }

    #[must_use]
    pub fn to_schema(self, new_schema: impl Into<Name>) -> Self {
        Self {
            new_schema: Some(new_schema.into()),
            ..self
        }
    }
}

/// One abstract schema change
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchemaOperation {
    CreateTable(Table),
    DropTable {
        #[serde(default)]
        schema: Option<Name>,
        name: Name,
    },
    RenameTable(Rename),
    /// Diff of the table-level options: storage parameters, comment, logging
    AlterTable {
        #[serde(default)]
        schema: Option<Name>,
        name: Name,
        old: TableOptions,
        new: TableOptions,
    },

    AddColumn {
        #[serde(default)]
        schema: Option<Name>,
        table: Name,
        column: Column,
    },
    DropColumn {
        #[serde(default)]
        schema: Option<Name>,
        table: Name,
        name: Name,
    },
    /// `new.name` is the column being altered; `old` only contributes its
    /// strategy and comment
    AlterColumn {
        #[serde(default)]
        schema: Option<Name>,
        table: Name,
        old: Column,
        new: Column,
    },
    RenameColumn {
        #[serde(default)]
        schema: Option<Name>,
        table: Name,
        name: Name,
        new_name: Name,
    },

    CreateIndex(Index),
    DropIndex {
        #[serde(default)]
        schema: Option<Name>,
        name: Name,
    },
    /// Indexes always live in their table's schema, so only the name changes
    RenameIndex {
        #[serde(default)]
        schema: Option<Name>,
        name: Name,
        new_name: Name,
    },

    CreateSequence(Sequence),
    /// Restates increment, bounds and cycling; the start value is left alone
    AlterSequence(Sequence),
    DropSequence {
        #[serde(default)]
        schema: Option<Name>,
        name: Name,
    },
    RenameSequence(Rename),
    RestartSequence {
        #[serde(default)]
        schema: Option<Name>,
        name: Name,
        start_value: i64,
    },

    EnsureSchema {
        name: Name,
    },
    DropSchema {
        name: Name,
    },

    AlterDatabase {
        #[serde(default)]
        old: DatabaseObjects,
        #[serde(default)]
        new: DatabaseObjects,
    },
    CreateDatabase {
        name: Name,
        #[serde(default)]
        template: Option<Name>,
        #[serde(default)]
        tablespace: Option<Name>,
    },
    DropDatabase {
        name: Name,
    },

    AddPrimaryKey {
        #[serde(default)]
        schema: Option<Name>,
        table: Name,
        primary_key: PrimaryKey,
    },
    DropPrimaryKey {
        #[serde(default)]
        schema: Option<Name>,
        table: Name,
        name: Name,
    },
    AddUniqueConstraint {
        #[serde(default)]
        schema: Option<Name>,
        table: Name,
        constraint: UniqueConstraint,
    },
    DropUniqueConstraint {
        #[serde(default)]
        schema: Option<Name>,
        table: Name,
        name: Name,
    },
    AddForeignKey {
        #[serde(default)]
        schema: Option<Name>,
        table: Name,
        foreign_key: ForeignKey,
    },
    DropForeignKey {
        #[serde(default)]
        schema: Option<Name>,
        table: Name,
        name: Name,
    },
    AddCheckConstraint {
        #[serde(default)]
        schema: Option<Name>,
        table: Name,
        constraint: CheckConstraint,
    },
    DropCheckConstraint {
        #[serde(default)]
        schema: Option<Name>,
        table: Name,
        name: Name,
    },

    /// Raw SQL, emitted verbatim as its own command
    Sql {
        sql: Name,
        #[serde(default)]
        suppress_transaction: bool,
    },
}

impl SchemaOperation {
    /// Operation name in snake case, as used in serialized form
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::CreateTable(_) => "create_table",
            Self::DropTable { .. } => "drop_table",
            Self::RenameTable(_) => "rename_table",
            Self::AlterTable { .. } => "alter_table",
            Self::AddColumn { .. } => "add_column",
            Self::DropColumn { .. } => "drop_column",
            Self::AlterColumn { .. } => "alter_column",
            Self::RenameColumn { .. } => "rename_column",
            Self::CreateIndex(_) => "create_index",
            Self::DropIndex { .. } => "drop_index",
            Self::RenameIndex { .. } => "rename_index",
            Self::CreateSequence(_) => "create_sequence",
            Self::AlterSequence(_) => "alter_sequence",
            Self::DropSequence { .. } => "drop_sequence",
            Self::RenameSequence(_) => "rename_sequence",
            Self::RestartSequence { .. } => "restart_sequence",
            Self::EnsureSchema { .. } => "ensure_schema",
            Self::DropSchema { .. } => "drop_schema",
            Self::AlterDatabase { .. } => "alter_database",
            Self::CreateDatabase { .. } => "create_database",
            Self::DropDatabase { .. } => "drop_database",
            Self::AddPrimaryKey { .. } => "add_primary_key",
            Self::DropPrimaryKey { .. } => "drop_primary_key",
            Self::AddUniqueConstraint { .. } => "add_unique_constraint",
            Self::DropUniqueConstraint { .. } => "drop_unique_constraint",
            Self::AddForeignKey { .. } => "add_foreign_key",
            Self::DropForeignKey { .. } => "drop_foreign_key",
            Self::AddCheckConstraint { .. } => "add_check_constraint",
            Self::DropCheckConstraint { .. } => "drop_check_constraint",
            Self::Sql { .. } => "sql",
        }
    }

    /// Qualified name of the object the operation targets, for diagnostics
    #[must_use]
    pub fn target(&self) -> String {
        match self {
            Self::CreateTable(table) => delimit_qualified(&table.name, table.schema.as_deref()),
            Self::CreateIndex(index) => delimit_qualified(&index.name, index.schema.as_deref()),
            Self::CreateSequence(seq) | Self::AlterSequence(seq) => {
                delimit_qualified(&seq.name, seq.schema.as_deref())
            }
            Self::RenameTable(r) | Self::RenameSequence(r) => {
                delimit_qualified(&r.name, r.schema.as_deref())
            }
            Self::DropTable { schema, name }
            | Self::AlterTable { schema, name, .. }
            | Self::DropIndex { schema, name }
            | Self::RenameIndex { schema, name, .. }
            | Self::DropSequence { schema, name }
            | Self::RestartSequence { schema, name, .. } => {
                delimit_qualified(name, schema.as_deref())
            }
            Self::AddColumn { schema, table, column } => {
                format!("{}.{}", delimit_qualified(table, schema.as_deref()), column.name)
            }
            Self::AlterColumn { schema, table, new, .. } => {
                format!("{}.{}", delimit_qualified(table, schema.as_deref()), new.name)
            }
            Self::DropColumn { schema, table, name }
            | Self::RenameColumn { schema, table, name, .. }
            | Self::DropPrimaryKey { schema, table, name }
            | Self::DropUniqueConstraint { schema, table, name }
            | Self::DropForeignKey { schema, table, name }
            | Self::DropCheckConstraint { schema, table, name } => {
                format!("{}.{}", delimit_qualified(table, schema.as_deref()), name)
            }
            Self::AddPrimaryKey { schema, table, .. }
            | Self::AddUniqueConstraint { schema, table, .. }
            | Self::AddForeignKey { schema, table, .. }
            | Self::AddCheckConstraint { schema, table, .. } => {
                delimit_qualified(table, schema.as_deref())
            }
            Self::EnsureSchema { name }
            | Self::DropSchema { name }
            | Self::CreateDatabase { name, .. }
            | Self::DropDatabase { name } => name.to_string(),
            Self::AlterDatabase { .. } => "database".to_string(),
            Self::Sql { .. } => "sql".to_string(),
        }
    }
}
