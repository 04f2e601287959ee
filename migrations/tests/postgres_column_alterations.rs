//! PostgreSQL ALTER COLUMN tests
//!
//! Column alterations are the one place where a single operation expands into several
//! statements spread over more than one batch, mostly because of value generation
//! strategy changes.

use pgschema_migrations::MigrationError;
use pgschema_migrations::postgres::{PostgresGenerator, SchemaOperation};
use pgschema_types::DialectVersion;
use pgschema_types::postgres::ddl::Column;
use pgschema_types::postgres::{SemanticType, ValueGenerationStrategy as Strategy};

// =============================================================================
// Helper Functions
// =============================================================================

fn alter(old: Column, new: Column) -> SchemaOperation {
    SchemaOperation::AlterColumn {
        schema: None,
        table: "People".into(),
        old,
        new,
    }
}

fn alter_sql(old: Column, new: Column) -> Vec<String> {
    PostgresGenerator::new()
        .generate(&[alter(old, new)], None)
        .expect("alteration should generate")
        .into_iter()
        .map(|c| c.sql)
        .collect()
}

fn int_key(strategy: Strategy) -> Column {
    Column::new("IntKey", SemanticType::Integer)
        .store_type("int")
        .strategy(strategy)
}

const TYPE_AND_NULLABILITY: &str = "ALTER TABLE \"People\" ALTER COLUMN \"IntKey\" TYPE int;\n\
                                    ALTER TABLE \"People\" ALTER COLUMN \"IntKey\" SET NOT NULL;\n";

// =============================================================================
// Plain alterations
// =============================================================================

#[test]
fn test_alter_column_type_nullability_default() {
    let old = Column::new("LuckyNumber", SemanticType::Integer);
    let new = Column::new("LuckyNumber", SemanticType::Integer)
        .nullable(true)
        .default_value(7);

    assert_eq!(
        alter_sql(old, new),
        vec![
            "ALTER TABLE \"People\" ALTER COLUMN \"LuckyNumber\" TYPE integer;\n\
             ALTER TABLE \"People\" ALTER COLUMN \"LuckyNumber\" DROP NOT NULL;\n\
             ALTER TABLE \"People\" ALTER COLUMN \"LuckyNumber\" SET DEFAULT 7;\n"
        ]
    );
}

#[test]
fn test_alter_column_drops_default_and_sets_comment() {
    let old = Column::new("name", SemanticType::Text).default_sql("'x'");
    let new = Column::new("name", SemanticType::Text).comment("Some comment");

    assert_eq!(
        PostgresGenerator::new()
            .generate(
                &[SchemaOperation::AlterColumn {
                    schema: Some("dbo".into()),
                    table: "People".into(),
                    old,
                    new,
                }],
                None,
            )
            .unwrap()[0]
            .sql,
        "ALTER TABLE dbo.\"People\" ALTER COLUMN name TYPE text;\n\
         ALTER TABLE dbo.\"People\" ALTER COLUMN name SET NOT NULL;\n\
         ALTER TABLE dbo.\"People\" ALTER COLUMN name DROP DEFAULT;\n\
         COMMENT ON COLUMN dbo.\"People\".name IS 'Some comment';\n"
    );
}

#[test]
fn test_alter_column_removes_comment() {
    let old = Column::new("name", SemanticType::Text).comment("Some comment");
    let new = Column::new("name", SemanticType::Text);

    let sql = alter_sql(old, new);
    assert!(sql[0].ends_with("COMMENT ON COLUMN \"People\".name IS NULL;\n"), "{sql:?}");
}

#[test]
fn test_alter_to_computed_column_recreates_it() {
    let old = Column::new("Sum", SemanticType::Integer);
    let new = Column::new("Sum", SemanticType::Integer)
        .nullable(true)
        .computed("\"A\" + \"B\"");

    assert_eq!(
        alter_sql(old, new),
        vec![
            "ALTER TABLE \"People\" DROP COLUMN \"Sum\";\n",
            "ALTER TABLE \"People\" ADD \"Sum\" integer GENERATED ALWAYS AS (\"A\" + \"B\") STORED;\n",
        ]
    );
}

#[test]
fn test_alter_legacy_annotated_column_fails() {
    let mut new = Column::new("Id", SemanticType::Integer);
    new.legacy_value_generated_on_add = true;

    let result = PostgresGenerator::new().generate(
        &[alter(Column::new("Id", SemanticType::Integer), new)],
        None,
    );
    assert_eq!(
        result,
        Err(MigrationError::LegacyValueGeneratedOnAdd {
            table: "People".to_string(),
            column: "Id".to_string(),
        })
    );
}

// =============================================================================
// Value generation strategy transitions
// =============================================================================

#[test]
fn test_none_to_serial_creates_owned_sequence() {
    assert_eq!(
        alter_sql(int_key(Strategy::None), int_key(Strategy::SerialColumn)),
        vec![
            format!(
                "{TYPE_AND_NULLABILITY}CREATE SEQUENCE \"People_IntKey_seq\" AS integer START WITH 1 \
                 INCREMENT BY 1 NO MINVALUE NO MAXVALUE NO CYCLE;\n"
            ),
            "ALTER TABLE \"People\" ALTER COLUMN \"IntKey\" SET DEFAULT (nextval('\"People_IntKey_seq\"'));\n\
             ALTER SEQUENCE \"People_IntKey_seq\" OWNED BY \"People\".\"IntKey\";\n"
                .to_string(),
        ]
    );
}

#[test]
fn test_none_to_serial_sequence_follows_store_type() {
    let old = Column::new("BigKey", SemanticType::BigInt);
    let new = Column::new("BigKey", SemanticType::BigInt).strategy(Strategy::SerialColumn);

    let commands = PostgresGenerator::new()
        .generate(
            &[SchemaOperation::AlterColumn {
                schema: Some("dbo".into()),
                table: "People".into(),
                old,
                new,
            }],
            None,
        )
        .unwrap();

    assert!(commands[0].sql.ends_with(
        "CREATE SEQUENCE dbo.\"People_BigKey_seq\" START WITH 1 INCREMENT BY 1 NO MINVALUE NO MAXVALUE NO CYCLE;\n"
    ));
    assert_eq!(
        commands[1].sql,
        "ALTER TABLE dbo.\"People\" ALTER COLUMN \"BigKey\" SET DEFAULT (nextval('dbo.\"People_BigKey_seq\"'));\n\
         ALTER SEQUENCE dbo.\"People_BigKey_seq\" OWNED BY dbo.\"People\".\"BigKey\";\n"
    );
}

#[test]
fn test_none_to_serial_on_text_fails() {
    let old = Column::new("Code", SemanticType::Text);
    let new = Column::new("Code", SemanticType::Text).strategy(Strategy::SerialColumn);

    let result = PostgresGenerator::new().generate(&[alter(old, new)], None);
    assert_eq!(
        result,
        Err(MigrationError::SerialOnNonInteger {
            table: "People".to_string(),
            column: "Code".to_string(),
            store_type: "text".to_string(),
        })
    );
}

#[test]
fn test_serial_to_none_drops_sequence() {
    assert_eq!(
        alter_sql(int_key(Strategy::SerialColumn), int_key(Strategy::None)),
        vec![format!(
            "{TYPE_AND_NULLABILITY}DROP SEQUENCE \"People_IntKey_seq\" CASCADE;\n\
             ALTER TABLE \"People\" ALTER COLUMN \"IntKey\" DROP DEFAULT;\n"
        )]
    );
}

#[test]
fn test_serial_to_identity_preserves_sequence_value() {
    assert_eq!(
        alter_sql(
            int_key(Strategy::SerialColumn),
            int_key(Strategy::IdentityAlwaysColumn)
        ),
        vec![format!(
            "{TYPE_AND_NULLABILITY}\
             ALTER SEQUENCE \"People_IntKey_seq\" RENAME TO \"People_IntKey_old_seq\";\n\
             ALTER TABLE \"People\" ALTER COLUMN \"IntKey\" DROP DEFAULT;\n\
             ALTER TABLE \"People\" ALTER COLUMN \"IntKey\" ADD GENERATED ALWAYS AS IDENTITY;\n\
             SELECT * FROM setval('\"People_IntKey_seq\"', nextval('\"People_IntKey_old_seq\"'), false);\n\
             DROP SEQUENCE \"People_IntKey_old_seq\";\n"
        )]
    );
}

#[test]
fn test_serial_to_identity_by_default_preserves_sequence_value() {
    assert_eq!(
        alter_sql(
            int_key(Strategy::SerialColumn),
            int_key(Strategy::IdentityByDefaultColumn)
        ),
        vec![format!(
            "{TYPE_AND_NULLABILITY}\
             ALTER SEQUENCE \"People_IntKey_seq\" RENAME TO \"People_IntKey_old_seq\";\n\
             ALTER TABLE \"People\" ALTER COLUMN \"IntKey\" DROP DEFAULT;\n\
             ALTER TABLE \"People\" ALTER COLUMN \"IntKey\" ADD GENERATED BY DEFAULT AS IDENTITY;\n\
             SELECT * FROM setval('\"People_IntKey_seq\"', nextval('\"People_IntKey_old_seq\"'), false);\n\
             DROP SEQUENCE \"People_IntKey_old_seq\";\n"
        )]
    );
}

#[test]
fn test_serial_sequence_names_are_escaped_in_literals() {
    let commands = PostgresGenerator::new()
        .generate(
            &[SchemaOperation::AlterColumn {
                schema: None,
                table: "O'Brien".into(),
                old: int_key(Strategy::SerialColumn),
                new: int_key(Strategy::IdentityAlwaysColumn),
            }],
            None,
        )
        .unwrap();

    assert!(
        commands[0].sql.contains(
            "SELECT * FROM setval('\"O''Brien_IntKey_seq\"', nextval('\"O''Brien_IntKey_old_seq\"'), false);\n"
        ),
        "{}",
        commands[0].sql
    );
}

#[test]
fn test_none_to_identity_always() {
    assert_eq!(
        alter_sql(
            int_key(Strategy::None),
            int_key(Strategy::IdentityAlwaysColumn)
        ),
        vec![format!(
            "{TYPE_AND_NULLABILITY}ALTER TABLE \"People\" ALTER COLUMN \"IntKey\" ADD GENERATED ALWAYS AS IDENTITY;\n"
        )]
    );
}

#[test]
fn test_none_to_identity() {
    assert_eq!(
        alter_sql(
            int_key(Strategy::None),
            int_key(Strategy::IdentityByDefaultColumn)
        ),
        vec![format!(
            "{TYPE_AND_NULLABILITY}ALTER TABLE \"People\" ALTER COLUMN \"IntKey\" ADD GENERATED BY DEFAULT AS IDENTITY;\n"
        )]
    );
}

#[test]
fn test_identity_to_none() {
    assert_eq!(
        alter_sql(
            int_key(Strategy::IdentityByDefaultColumn),
            int_key(Strategy::None)
        ),
        vec![format!(
            "{TYPE_AND_NULLABILITY}ALTER TABLE \"People\" ALTER COLUMN \"IntKey\" DROP IDENTITY;\n\
             ALTER TABLE \"People\" ALTER COLUMN \"IntKey\" DROP DEFAULT;\n"
        )]
    );
}

#[test]
fn test_identity_always_to_none() {
    assert_eq!(
        alter_sql(
            int_key(Strategy::IdentityAlwaysColumn),
            int_key(Strategy::None)
        ),
        vec![format!(
            "{TYPE_AND_NULLABILITY}ALTER TABLE \"People\" ALTER COLUMN \"IntKey\" DROP IDENTITY;\n\
             ALTER TABLE \"People\" ALTER COLUMN \"IntKey\" DROP DEFAULT;\n"
        )]
    );
}

#[test]
fn test_identity_always_to_by_default() {
    assert_eq!(
        alter_sql(
            int_key(Strategy::IdentityAlwaysColumn),
            int_key(Strategy::IdentityByDefaultColumn)
        ),
        vec![format!(
            "{TYPE_AND_NULLABILITY}ALTER TABLE \"People\" ALTER COLUMN \"IntKey\" SET GENERATED BY DEFAULT;\n"
        )]
    );
}

#[test]
fn test_identity_kind_change() {
    assert_eq!(
        alter_sql(
            int_key(Strategy::IdentityByDefaultColumn),
            int_key(Strategy::IdentityAlwaysColumn)
        ),
        vec![format!(
            "{TYPE_AND_NULLABILITY}ALTER TABLE \"People\" ALTER COLUMN \"IntKey\" SET GENERATED ALWAYS;\n"
        )]
    );
}

#[test]
fn test_identity_to_serial_fails() {
    let result = PostgresGenerator::new().generate(
        &[alter(
            int_key(Strategy::IdentityAlwaysColumn),
            int_key(Strategy::SerialColumn),
        )],
        None,
    );
    assert_eq!(
        result,
        Err(MigrationError::IdentityToSerial {
            table: "People".to_string(),
            column: "IntKey".to_string(),
        })
    );
}

#[test]
fn test_transition_into_hilo_fails() {
    for from in [Strategy::None, Strategy::SerialColumn, Strategy::IdentityAlwaysColumn] {
        let result = PostgresGenerator::new()
            .generate(&[alter(int_key(from), int_key(Strategy::SequenceHiLo))], None);
        assert_eq!(
            result,
            Err(MigrationError::UnsupportedStrategyTransition {
                table: "People".to_string(),
                column: "IntKey".to_string(),
                from,
                to: Strategy::SequenceHiLo,
            })
        );
    }
}

#[test]
fn test_transition_out_of_hilo_only_alters_type() {
    assert_eq!(
        alter_sql(int_key(Strategy::SequenceHiLo), int_key(Strategy::SerialColumn)),
        vec![TYPE_AND_NULLABILITY.to_string()]
    );
}

#[test]
fn test_identity_transition_before_10_fails() {
    let result = PostgresGenerator::new()
        .with_version(DialectVersion::new(9, 6))
        .generate(
            &[alter(int_key(Strategy::None), int_key(Strategy::IdentityAlwaysColumn))],
            None,
        );

    assert_eq!(
        result,
        Err(MigrationError::IdentityColumnsUnsupported {
            table: "People".to_string(),
            column: "IntKey".to_string(),
            strategy: Strategy::IdentityAlwaysColumn,
            version: DialectVersion::new(9, 6),
        })
    );
}

#[test]
fn test_serial_sequence_before_10_has_no_type() {
    let commands = PostgresGenerator::new()
        .with_version(DialectVersion::new(9, 6))
        .generate(
            &[alter(int_key(Strategy::None), int_key(Strategy::SerialColumn))],
            None,
        )
        .unwrap();

    assert!(
        commands[0].sql.ends_with(
            "CREATE SEQUENCE \"People_IntKey_seq\" START WITH 1 INCREMENT BY 1 NO MINVALUE NO MAXVALUE NO CYCLE;\n"
        ),
        "{}",
        commands[0].sql
    );
}
