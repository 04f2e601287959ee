//! PostgreSQL literal rendering for pgschema
//!
//! Turns a [`Value`](pgschema_types::postgres::Value) paired with its
//! [`SemanticType`](pgschema_types::postgres::SemanticType) into either SQL literal text
//! (for `DEFAULT` clauses and seed data) or a Rust expression (for scaffolded models).
//!
//! ```
//! use pgschema_postgres::render_sql_literal;
//! use pgschema_types::postgres::{SemanticType, Value};
//!
//! let sql = render_sql_literal(&Value::from(vec![3, 4]), &SemanticType::array(SemanticType::Integer))?;
//! assert_eq!(sql, "ARRAY[3,4]::integer[]");
//! # Ok::<(), pgschema_postgres::LiteralError>(())
//! ```

pub mod literal;

pub use literal::{
    LiteralError, parse_range, parse_range_literal, render_code_literal, render_sql_literal,
    string_literal,
};
