//! SQL literal rendering

use pgschema_types::postgres::{SemanticType, Value};

use super::LiteralError;
use super::range::range_text;
use super::text::{hex_upper, scalar_text};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Form {
    /// Self-describing literal: `DATE '2015-03-12'`, `'sad'::mood`
    Typed,
    /// Bare literal used inside a typed context: `'2015-03-12'`
    Unwrapped,
}

/// Quote `s` as an SQL string literal, doubling embedded single quotes.
///
/// ```
/// use pgschema_postgres::literal::string_literal;
///
/// assert_eq!(string_literal("it's"), "'it''s'");
/// ```
#[must_use]
pub fn string_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn typed(form: Form, keyword: &str, literal: String) -> String {
    match form {
        Form::Typed => format!("{keyword} {literal}"),
        Form::Unwrapped => literal,
    }
}

fn cast(form: Form, literal: String, ty: &SemanticType) -> String {
    match form {
        Form::Typed => format!("{literal}::{}", ty.store_type()),
        Form::Unwrapped => literal,
    }
}

/// Keyword prefixing a quoted literal of `ty`, if the type uses that shape.
fn keyword(ty: &SemanticType) -> Option<&'static str> {
    use SemanticType as T;
    Some(match ty {
        T::Uuid => "UUID",
        T::Date => "DATE",
        T::Timestamp => "TIMESTAMP",
        T::Timestamptz => "TIMESTAMPTZ",
        T::Time => "TIME",
        T::Timetz => "TIMETZ",
        T::Interval => "INTERVAL",
        T::MacAddr => "MACADDR",
        T::MacAddr8 => "MACADDR8",
        T::Inet => "INET",
        T::Cidr => "CIDR",
        T::Point => "POINT",
        T::Line => "LINE",
        T::LineSegment => "LSEG",
        T::Box => "BOX",
        T::Path => "PATH",
        T::Polygon => "POLYGON",
        T::Circle => "CIRCLE",
        T::Tid => "TID",
        T::TsQuery => "TSQUERY",
        T::TsVector => "TSVECTOR",
        _ => return None,
    })
}

fn hstore_text(pairs: &[(String, Option<String>)]) -> String {
    let quote = |s: &str| format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""));
    pairs
        .iter()
        .map(|(k, v)| match v {
            Some(v) => format!("{}=>{}", quote(k), quote(v)),
            None => format!("{}=>NULL", quote(k)),
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn render(value: &Value, ty: &SemanticType, form: Form) -> Result<String, LiteralError> {
    use SemanticType as T;
    use Value as V;

    let literal = match (ty, value) {
        (_, V::Null) => "NULL".to_string(),

        (T::Boolean, V::Bool(true)) => "TRUE".to_string(),
        (T::Boolean, V::Bool(false)) => "FALSE".to_string(),

        // NaN and the infinities only exist as quoted input
        (T::Real | T::DoublePrecision | T::Numeric, V::Real(x)) if !x.is_finite() => {
            string_literal(&scalar_text(value, ty)?)
        }
        (T::Real | T::DoublePrecision | T::Numeric, V::Double(x)) if !x.is_finite() => {
            string_literal(&scalar_text(value, ty)?)
        }
        (
            T::SmallInt | T::Integer | T::BigInt | T::Real | T::DoublePrecision | T::Numeric,
            V::SmallInt(_) | V::Integer(_) | V::BigInt(_) | V::Real(_) | V::Double(_),
        ) => scalar_text(value, ty)?,

        (T::Text | T::Json | T::Jsonb, V::Text(s)) => string_literal(s),

        (T::Enum { .. }, V::Text(label)) => cast(form, string_literal(label), ty),

        (T::Bytea, V::Bytes(bytes)) => typed(form, "BYTEA", format!("E'\\\\x{}'", hex_upper(bytes))),

        (T::Bit, V::Bits(_)) => typed(form, "BIT", format!("B'{}'", scalar_text(value, ty)?)),
        (T::VarBit, V::Bits(_)) => typed(form, "VARBIT", format!("B'{}'", scalar_text(value, ty)?)),

        (T::Hstore, V::Hstore(pairs)) => typed(form, "HSTORE", string_literal(&hstore_text(pairs))),

        (T::Range { subtype, .. }, V::Range(range)) => {
            cast(form, string_literal(&range_text(range, subtype)?), ty)
        }

        (T::Array(element), V::Array(items)) => {
            let elements = items
                .iter()
                .map(|item| render(item, element, Form::Unwrapped))
                .collect::<Result<Vec<_>, _>>()?
                .join(",");
            match form {
                Form::Typed => format!("ARRAY[{elements}]::{}", ty.store_type()),
                Form::Unwrapped => format!("ARRAY[{elements}]"),
            }
        }

        _ => match keyword(ty) {
            Some(keyword) => typed(form, keyword, string_literal(&scalar_text(value, ty)?)),
            None => return Err(LiteralError::unmapped(value, ty)),
        },
    };
    Ok(literal)
}

/// Render `value` as an SQL literal of type `ty`.
///
/// # Examples
///
/// ```
/// use pgschema_types::postgres::{SemanticType, Value};
/// use pgschema_postgres::render_sql_literal;
///
/// let literal = render_sql_literal(&Value::from(vec![3, 4]), &SemanticType::array(SemanticType::Integer));
/// assert_eq!(literal.unwrap(), "ARRAY[3,4]::integer[]");
/// ```
///
/// # Errors
///
/// [`LiteralError::Unmapped`] when the value has no literal form for `ty`.
pub fn render_sql_literal(value: &Value, ty: &SemanticType) -> Result<String, LiteralError> {
    render(value, ty, Form::Typed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bit_vec::BitVec;
    use chrono::{FixedOffset, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
    use geo_types::{LineString, Point, Rect};
    use pgschema_types::postgres::{Circle, Line, Path, Range, Tid, TimeTz};
    use std::net::IpAddr;

    fn sql(value: impl Into<Value>, ty: SemanticType) -> String {
        render_sql_literal(&value.into(), &ty).unwrap()
    }

    fn ts(h: u32, m: u32, s: u32, micro: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(1997, 12, 17)
            .unwrap()
            .and_hms_micro_opt(h, m, s, micro)
            .unwrap()
    }

    #[test]
    fn test_date_and_timestamp() {
        assert_eq!(
            sql(NaiveDate::from_ymd_opt(2015, 3, 12).unwrap(), SemanticType::Date),
            "DATE '2015-03-12'"
        );
        assert_eq!(
            sql(ts(7, 37, 16, 0), SemanticType::Timestamp),
            "TIMESTAMP '1997-12-17 07:37:16'"
        );
        assert_eq!(
            sql(ts(7, 37, 16, 345_000), SemanticType::Timestamp),
            "TIMESTAMP '1997-12-17 07:37:16.345'"
        );
        assert_eq!(
            sql(ts(7, 37, 16, 0).and_utc(), SemanticType::Timestamp),
            "TIMESTAMP '1997-12-17 07:37:16'"
        );
        let max = NaiveDate::from_ymd_opt(9999, 12, 31)
            .unwrap()
            .and_hms_nano_opt(23, 59, 59, 999_999_900)
            .unwrap();
        assert_eq!(
            sql(max, SemanticType::Timestamp),
            "TIMESTAMP '9999-12-31 23:59:59.999999'"
        );
    }

    #[test]
    fn test_timestamptz() {
        assert_eq!(
            sql(ts(7, 37, 16, 0).and_utc(), SemanticType::Timestamptz),
            "TIMESTAMPTZ '1997-12-17 07:37:16 UTC'"
        );
        assert_eq!(
            sql(ts(7, 37, 16, 0), SemanticType::Timestamptz),
            "TIMESTAMPTZ '1997-12-17 07:37:16 UTC'"
        );
        assert_eq!(
            sql(
                Utc.from_utc_datetime(&ts(7, 37, 16, 345_678)),
                SemanticType::Timestamptz
            ),
            "TIMESTAMPTZ '1997-12-17 07:37:16.345678 UTC'"
        );

        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let local = plus_two.from_local_datetime(&ts(7, 37, 16, 345_000)).unwrap();
        assert_eq!(
            sql(local, SemanticType::Timestamptz),
            "TIMESTAMPTZ '1997-12-17 07:37:16.345+02:00'"
        );
    }

    #[test]
    fn test_time_and_timetz() {
        let t = |micro| NaiveTime::from_hms_micro_opt(4, 5, 6, micro).unwrap();
        assert_eq!(sql(t(123_456), SemanticType::Time), "TIME '04:05:06.123456'");
        assert_eq!(sql(t(123), SemanticType::Time), "TIME '04:05:06.000123'");
        assert_eq!(sql(t(0), SemanticType::Time), "TIME '04:05:06'");

        let tz = |micro, hours| TimeTz::new(t(micro), FixedOffset::east_opt(hours * 3600).unwrap());
        assert_eq!(sql(tz(789_000, 3), SemanticType::Timetz), "TIMETZ '04:05:06.789+3'");
        assert_eq!(sql(tz(0, -3), SemanticType::Timetz), "TIMETZ '04:05:06-3'");
    }

    #[test]
    fn test_interval() {
        let d = TimeDelta::days(3)
            + TimeDelta::hours(4)
            + TimeDelta::minutes(5)
            + TimeDelta::seconds(6)
            + TimeDelta::milliseconds(7);
        assert_eq!(sql(d, SemanticType::Interval), "INTERVAL '3 04:05:06.007'");
        assert_eq!(sql(-d, SemanticType::Interval), "INTERVAL '-3 04:05:06.007'");
    }

    #[test]
    fn test_network() {
        assert_eq!(
            sql(Value::MacAddr([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]), SemanticType::MacAddr),
            "MACADDR '001122334455'"
        );
        assert_eq!(
            sql(
                Value::MacAddr8([0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77]),
                SemanticType::MacAddr8
            ),
            "MACADDR8 '0011223344556677'"
        );
        let addr: IpAddr = "192.168.1.1".parse().unwrap();
        assert_eq!(sql(addr, SemanticType::Inet), "INET '192.168.1.1'");
        let cidr: cidr::IpCidr = "192.168.1.0/24".parse().unwrap();
        assert_eq!(sql(cidr, SemanticType::Cidr), "CIDR '192.168.1.0/24'");
    }

    #[test]
    fn test_geometry() {
        assert_eq!(sql(Point::new(3.5, 4.5), SemanticType::Point), "POINT '(3.5,4.5)'");
        assert_eq!(sql(Line::new(3.5, 4.5, 10.0), SemanticType::Line), "LINE '{3.5,4.5,10}'");
        assert_eq!(
            sql(geo_types::Line::new((3.5, 4.5), (5.5, 6.5)), SemanticType::LineSegment),
            "LSEG '[(3.5,4.5),(5.5,6.5)]'"
        );
        // corners are normalized to (max),(min)
        assert_eq!(
            sql(Rect::new((4.0, 1.0), (2.0, 3.0)), SemanticType::Box),
            "BOX '((4,3),(2,1))'"
        );
        let points = vec![(1.0, 2.0), (3.0, 4.0)];
        assert_eq!(
            sql(Path::new(points.clone(), false), SemanticType::Path),
            "PATH '((1,2),(3,4))'"
        );
        assert_eq!(
            sql(Path::new(points.clone(), true), SemanticType::Path),
            "PATH '[(1,2),(3,4)]'"
        );
        assert_eq!(
            sql(Value::Polygon(LineString::from(points)), SemanticType::Polygon),
            "POLYGON '((1,2),(3,4))'"
        );
        assert_eq!(
            sql(Circle::new(Point::new(3.5, 4.5), 5.5), SemanticType::Circle),
            "CIRCLE '<(3.5,4.5),5.5>'"
        );
    }

    #[test]
    fn test_misc_scalars() {
        assert_eq!(sql(true, SemanticType::Boolean), "TRUE");
        let bits: BitVec = [true, false].into_iter().collect();
        assert_eq!(sql(bits.clone(), SemanticType::VarBit), "VARBIT B'10'");
        assert_eq!(sql(bits, SemanticType::Bit), "BIT B'10'");
        assert_eq!(
            sql(Value::Bytes(vec![222, 173, 190, 239]), SemanticType::Bytea),
            r"BYTEA E'\\xDEADBEEF'"
        );
        assert_eq!(
            sql(
                Value::Hstore(vec![
                    ("k1".into(), Some("v1".into())),
                    ("k2".into(), Some("v2".into()))
                ]),
                SemanticType::Hstore
            ),
            r#"HSTORE '"k1"=>"v1","k2"=>"v2"'"#
        );
        assert_eq!(sql(r#"{"a":1}"#, SemanticType::Jsonb), r#"'{"a":1}'"#);
        assert_eq!(sql(r#"{"a":1}"#, SemanticType::Json), r#"'{"a":1}'"#);
        assert_eq!(sql(Tid::new(0, 1), SemanticType::Tid), "TID '(0,1)'");
        assert_eq!(sql("it's", SemanticType::Text), "'it''s'");
        assert_eq!(sql(Value::Null, SemanticType::Integer), "NULL");
    }

    #[test]
    fn test_text_search_literals_double_quotes() {
        assert_eq!(sql("'a' & 'b'", SemanticType::TsQuery), "TSQUERY '''a'' & ''b'''");
        assert_eq!(sql("'a' 'b'", SemanticType::TsVector), "TSVECTOR '''a'' ''b'''");
        assert_eq!(
            sql(vec!["'a'"], SemanticType::array(SemanticType::TsVector)),
            "ARRAY['''a''']::tsvector[]"
        );
    }

    #[test]
    fn test_interval_beyond_microsecond_range_fails() {
        assert_eq!(
            render_sql_literal(&Value::Interval(TimeDelta::MAX), &SemanticType::Interval),
            Err(LiteralError::OutOfRange {
                value: "interval",
                ty: "interval".to_string()
            })
        );
    }

    #[test]
    fn test_hstore_escapes_and_nulls() {
        let pairs = vec![
            ("a\"b".to_string(), Some("it's".to_string())),
            ("k".to_string(), None),
        ];
        assert_eq!(
            sql(Value::Hstore(pairs), SemanticType::Hstore),
            r#"HSTORE '"a\"b"=>"it''s","k"=>NULL'"#
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(sql(42, SemanticType::Integer), "42");
        assert_eq!(sql(-7_i64, SemanticType::BigInt), "-7");
        assert_eq!(sql(10.0, SemanticType::DoublePrecision), "10");
        assert_eq!(sql(0.5_f32, SemanticType::Real), "0.5");
        assert_eq!(sql(f64::NAN, SemanticType::DoublePrecision), "'NaN'");
        assert_eq!(sql(f64::INFINITY, SemanticType::DoublePrecision), "'Infinity'");
        assert_eq!(sql(f64::NEG_INFINITY, SemanticType::DoublePrecision), "'-Infinity'");
    }

    #[test]
    fn test_enums() {
        assert_eq!(
            sql("sad", SemanticType::enumeration(None, "dummy_enum")),
            "'sad'::dummy_enum"
        );
        assert_eq!(
            sql("sad", SemanticType::enumeration(None, "DummyEnum")),
            r#"'sad'::"DummyEnum""#
        );
        assert_eq!(
            sql("sad", SemanticType::enumeration(Some("app"), "mood")),
            "'sad'::app.mood"
        );
    }

    #[test]
    fn test_arrays() {
        assert_eq!(
            sql(vec![3, 4], SemanticType::array(SemanticType::Integer)),
            "ARRAY[3,4]::integer[]"
        );
        assert_eq!(
            sql(Vec::<i16>::new(), SemanticType::array(SemanticType::SmallInt)),
            "ARRAY[]::smallint[]"
        );
        assert_eq!(
            sql(
                vec![NaiveDate::from_ymd_opt(2015, 3, 12).unwrap()],
                SemanticType::array(SemanticType::Date)
            ),
            "ARRAY['2015-03-12']::date[]"
        );
        assert_eq!(
            sql(
                vec!["happy", "sad"],
                SemanticType::array(SemanticType::enumeration(None, "mood"))
            ),
            "ARRAY['happy','sad']::mood[]"
        );
    }

    #[test]
    fn test_ranges() {
        let int4 = SemanticType::int4range();
        assert_eq!(sql(Range::empty(), int4.clone()), "'empty'::int4range");
        assert_eq!(sql(Range::inclusive(4, 7), int4.clone()), "'[4,7]'::int4range");
        assert_eq!(
            sql(
                Range::new(
                    std::ops::Bound::Excluded(Value::Integer(4)),
                    std::ops::Bound::Included(Value::Integer(7))
                ),
                int4.clone()
            ),
            "'(4,7]'::int4range"
        );
        assert_eq!(
            sql(
                Range::new(std::ops::Bound::Unbounded, std::ops::Bound::Included(Value::Integer(7))),
                int4
            ),
            "'(,7]'::int4range"
        );
    }

    #[test]
    fn test_unmapped_pair_fails() {
        let err = render_sql_literal(&Value::Bool(true), &SemanticType::Point).unwrap_err();
        assert_eq!(
            err,
            LiteralError::Unmapped {
                value: "bool",
                ty: "point".to_string()
            }
        );
        assert!(render_sql_literal(&Value::Integer(1), &SemanticType::Text).is_err());
    }
}
