//! Range text: rendering bounds and parsing the server's range syntax back
//!
//! See: <https://www.postgresql.org/docs/current/rangetypes.html#RANGETYPES-IO>

use std::ops::Bound;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use pgschema_types::postgres::{Range, SemanticType, Value};

use super::LiteralError;
use super::text::scalar_text;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

fn needs_quoting(bound: &str) -> bool {
    bound.is_empty()
        || bound.eq_ignore_ascii_case("empty")
        || bound
            .chars()
            .any(|c| matches!(c, '"' | '\\' | '(' | ')' | '[' | ']' | ',') || c.is_whitespace())
}

fn bound_text(value: &Value, subtype: &SemanticType) -> Result<String, LiteralError> {
    let text = scalar_text(value, subtype)?;
    if needs_quoting(&text) {
        Ok(format!(
            "\"{}\"",
            text.replace('\\', "\\\\").replace('"', "\\\"")
        ))
    } else {
        Ok(text)
    }
}

/// `empty`, or `<lb><lower>,<upper><ub>` with infinite sides left blank.
pub(crate) fn range_text(range: &Range, subtype: &SemanticType) -> Result<String, LiteralError> {
    let Range::Bounded { lower, upper } = range else {
        return Ok("empty".to_string());
    };

    let (open, lower) = match lower {
        Bound::Included(v) => ('[', bound_text(v, subtype)?),
        Bound::Excluded(v) => ('(', bound_text(v, subtype)?),
        Bound::Unbounded => ('(', String::new()),
    };
    let (close, upper) = match upper {
        Bound::Included(v) => (']', bound_text(v, subtype)?),
        Bound::Excluded(v) => (')', bound_text(v, subtype)?),
        Bound::Unbounded => (')', String::new()),
    };
    Ok(format!("{open}{lower},{upper}{close}"))
}

//------------------------------------------------------------------------------
// Parsing
//------------------------------------------------------------------------------

fn parse_scalar(text: &str, subtype: &SemanticType, whole: &str) -> Result<Value, LiteralError> {
    use SemanticType as T;

    let invalid = || LiteralError::invalid_range(whole, "bound does not parse as the subtype");
    let value = match subtype {
        T::SmallInt => Value::SmallInt(text.parse().map_err(|_| invalid())?),
        T::Integer => Value::Integer(text.parse().map_err(|_| invalid())?),
        T::BigInt => Value::BigInt(text.parse().map_err(|_| invalid())?),
        T::Real => Value::Real(text.parse().map_err(|_| invalid())?),
        T::DoublePrecision | T::Numeric => Value::Double(text.parse().map_err(|_| invalid())?),
        T::Text => Value::Text(text.to_string()),
        T::Date => Value::Date(NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| invalid())?),
        T::Timestamp => Value::Timestamp(
            NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT).map_err(|_| invalid())?,
        ),
        T::Timestamptz => match text.strip_suffix(" UTC") {
            Some(naive) => Value::TimestampUtc(
                NaiveDateTime::parse_from_str(naive, TIMESTAMP_FORMAT)
                    .map_err(|_| invalid())?
                    .and_utc(),
            ),
            None => Value::TimestampTz(
                DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f%:z").map_err(|_| invalid())?,
            ),
        },
        _ => {
            return Err(LiteralError::Unmapped {
                value: "range bound",
                ty: subtype.store_type().into_owned(),
            });
        }
    };
    Ok(value)
}

/// Split the inside of `[...]` at the separating comma, honoring double quotes.
///
/// Returns each side unquoted, with `None` for a blank (infinite) side.
fn split_bounds(inner: &str, whole: &str) -> Result<(Option<String>, Option<String>), LiteralError> {
    let mut sides: Vec<Option<String>> = Vec::with_capacity(2);
    let mut current = String::new();
    let mut quoted_side = false;
    let mut in_quotes = false;
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                // "" inside quotes is a literal quote
                if chars.clone().next() == Some('"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => {
                in_quotes = true;
                quoted_side = true;
            }
            '\\' => match chars.next() {
                Some(escaped) => current.push(escaped),
                None => return Err(LiteralError::invalid_range(whole, "dangling escape")),
            },
            ',' if !in_quotes => {
                sides.push((quoted_side || !current.is_empty()).then(|| std::mem::take(&mut current)));
                quoted_side = false;
                if sides.len() > 1 {
                    return Err(LiteralError::invalid_range(whole, "more than two bounds"));
                }
            }
            _ => current.push(c),
        }
    }

    if in_quotes {
        return Err(LiteralError::invalid_range(whole, "unterminated quote"));
    }
    sides.push((quoted_side || !current.is_empty()).then_some(current));

    match <[Option<String>; 2]>::try_from(sides) {
        Ok([lower, upper]) => Ok((lower, upper)),
        Err(_) => Err(LiteralError::invalid_range(whole, "expected two bounds")),
    }
}

/// Parse range text as the server prints it (`[4,7)`, `(,7]`, `empty`).
///
/// # Errors
///
/// [`LiteralError::InvalidRange`] for malformed text, [`LiteralError::Unmapped`] when the
/// subtype has no bound parser.
pub fn parse_range(text: &str, subtype: &SemanticType) -> Result<Range, LiteralError> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("empty") {
        return Ok(Range::Empty);
    }

    let mut chars = trimmed.chars();
    let (Some(open), Some(close)) = (chars.next(), chars.next_back()) else {
        return Err(LiteralError::invalid_range(text, "too short"));
    };
    let inner = chars.as_str();
    let (lower, upper) = split_bounds(inner, text)?;

    let lower = match (open, lower) {
        ('[' | '(', None) => Bound::Unbounded,
        ('[', Some(v)) => Bound::Included(parse_scalar(&v, subtype, text)?),
        ('(', Some(v)) => Bound::Excluded(parse_scalar(&v, subtype, text)?),
        _ => return Err(LiteralError::invalid_range(text, "expected '[' or '('")),
    };
    let upper = match (close, upper) {
        (']' | ')', None) => Bound::Unbounded,
        (']', Some(v)) => Bound::Included(parse_scalar(&v, subtype, text)?),
        (')', Some(v)) => Bound::Excluded(parse_scalar(&v, subtype, text)?),
        _ => return Err(LiteralError::invalid_range(text, "expected ']' or ')'")),
    };
    Ok(Range::Bounded { lower, upper })
}

/// Parse a rendered range literal, `'[4,7]'::int4range`, back into a range.
///
/// The `::type` suffix is optional; `subtype` decides how bounds are read.
///
/// # Errors
///
/// See [`parse_range`].
pub fn parse_range_literal(literal: &str, subtype: &SemanticType) -> Result<Range, LiteralError> {
    let body = literal
        .trim()
        .strip_prefix('\'')
        .ok_or_else(|| LiteralError::invalid_range(literal, "expected a quoted literal"))?;

    let mut text = String::new();
    let mut chars = body.chars();
    loop {
        match chars.next() {
            Some('\'') if chars.clone().next() == Some('\'') => {
                chars.next();
                text.push('\'');
            }
            Some('\'') => break,
            Some(c) => text.push(c),
            None => return Err(LiteralError::invalid_range(literal, "unterminated literal")),
        }
    }

    let rest = chars.as_str().trim();
    if !(rest.is_empty() || rest.starts_with("::")) {
        return Err(LiteralError::invalid_range(literal, "unexpected text after literal"));
    }
    parse_range(&text, subtype)
}
