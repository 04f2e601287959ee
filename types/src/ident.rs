//! Identifier delimiting
//!
//! PostgreSQL folds unquoted identifiers to lower case, so anything that is not already
//! a plain lower-case word (or that collides with a reserved keyword) must be
//! double-quoted to survive a round trip.

/// Keywords that PostgreSQL reserves outright (appendix C, "reserved" column).
///
/// Non-reserved and type-name keywords (`text`, `char`, `varchar`, `bit`, ...) are
/// usable as bare identifiers and are intentionally absent.
const RESERVED_KEYWORDS: &[&str] = &[
    "all",
    "analyse",
    "analyze",
    "and",
    "any",
    "array",
    "as",
    "asc",
    "asymmetric",
    "both",
    "case",
    "cast",
    "check",
    "collate",
    "column",
    "constraint",
    "create",
    "current_catalog",
    "current_date",
    "current_role",
    "current_time",
    "current_timestamp",
    "current_user",
    "default",
    "deferrable",
    "desc",
    "distinct",
    "do",
    "else",
    "end",
    "except",
    "false",
    "fetch",
    "for",
    "foreign",
    "from",
    "grant",
    "group",
    "having",
    "in",
    "initially",
    "intersect",
    "into",
    "lateral",
    "leading",
    "limit",
    "localtime",
    "localtimestamp",
    "not",
    "null",
    "offset",
    "on",
    "only",
    "or",
    "order",
    "placing",
    "primary",
    "references",
    "returning",
    "select",
    "session_user",
    "some",
    "symmetric",
    "table",
    "then",
    "to",
    "trailing",
    "true",
    "union",
    "unique",
    "user",
    "using",
    "variadic",
    "when",
    "where",
    "window",
    "with",
];

/// Returns `true` if `identifier` must be double-quoted.
#[must_use]
pub fn requires_quoting(identifier: &str) -> bool {
    let mut chars = identifier.chars();
    let Some(first) = chars.next() else {
        return true;
    };
    if !(first.is_ascii_lowercase() || first == '_') {
        return true;
    }
    if !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '$') {
        return true;
    }
    RESERVED_KEYWORDS.binary_search(&identifier).is_ok()
}

/// Delimit a single identifier, quoting (and escaping embedded quotes) only when needed.
///
/// ```
/// use pgschema_types::delimit_identifier;
///
/// assert_eq!(delimit_identifier("people"), "people");
/// assert_eq!(delimit_identifier("People"), "\"People\"");
/// assert_eq!(delimit_identifier("user"), "\"user\"");
/// ```
#[must_use]
pub fn delimit_identifier(identifier: &str) -> String {
    if requires_quoting(identifier) {
        format!("\"{}\"", identifier.replace('"', "\"\""))
    } else {
        identifier.to_string()
    }
}

/// Delimit `name`, prefixed by the delimited `schema` when one is given.
///
/// ```
/// use pgschema_types::delimit_qualified;
///
/// assert_eq!(delimit_qualified("People", Some("dbo")), "dbo.\"People\"");
/// assert_eq!(delimit_qualified("People", None), "\"People\"");
/// ```
#[must_use]
pub fn delimit_qualified(name: &str, schema: Option<&str>) -> String {
    match schema {
        Some(schema) => format!("{}.{}", delimit_identifier(schema), delimit_identifier(name)),
        None => delimit_identifier(name),
    }
}

/// Split `schema.name` at the first dot.
#[must_use]
pub fn split_schema(identifier: &str) -> (Option<&str>, &str) {
    match identifier.split_once('.') {
        Some((schema, name)) => (Some(schema), name),
        None => (None, identifier),
    }
}
