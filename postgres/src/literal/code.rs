//! Rust constructor expressions for scaffolded model code
//!
//! Each expression is what a user would write by hand to obtain the same value with
//! the crates [`Value`] is built on: `chrono`, `cidr`, `geo-types`, `bit-vec`, `uuid`.

use core::fmt::Write;
use std::net::IpAddr;
use std::ops::Bound;

use chrono::{Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use heck::ToUpperCamelCase;
use pgschema_types::postgres::{Range, SemanticType, Value};

use super::LiteralError;

fn float_code(x: f64) -> String {
    if x.is_nan() {
        "f64::NAN".to_string()
    } else if x.is_infinite() {
        if x > 0.0 { "f64::INFINITY" } else { "f64::NEG_INFINITY" }.to_string()
    } else {
        format!("{x:?}")
    }
}

fn f32_code(x: f32) -> String {
    if x.is_nan() {
        "f32::NAN".to_string()
    } else if x.is_infinite() {
        if x > 0.0 { "f32::INFINITY" } else { "f32::NEG_INFINITY" }.to_string()
    } else {
        format!("{x:?}_f32")
    }
}

/// Integer literal suffixed for the Rust type scaffolded for `ty`
fn integer_code(n: i64, ty: &SemanticType) -> String {
    match ty {
        SemanticType::SmallInt => format!("{n}_i16"),
        SemanticType::BigInt => format!("{n}_i64"),
        _ => n.to_string(),
    }
}

fn bytes_code(bytes: &[u8]) -> String {
    let mut out = String::from("[");
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "0x{b:02X}");
    }
    out.push(']');
    out
}

fn date_code(date: &NaiveDate) -> String {
    format!(
        "NaiveDate::from_ymd_opt({}, {}, {}).unwrap()",
        date.year(),
        date.month(),
        date.day()
    )
}

fn time_args(time: &NaiveTime) -> String {
    let micros = time.nanosecond() / 1_000;
    if micros == 0 {
        format!("hms_opt({}, {}, {})", time.hour(), time.minute(), time.second())
    } else {
        format!(
            "hms_micro_opt({}, {}, {}, {micros})",
            time.hour(),
            time.minute(),
            time.second()
        )
    }
}

fn time_code(time: &NaiveTime) -> String {
    format!("NaiveTime::from_{}.unwrap()", time_args(time))
}

fn timestamp_code(ts: &NaiveDateTime) -> String {
    format!("{}.and_{}.unwrap()", date_code(&ts.date()), time_args(&ts.time()))
}

fn offset_code(offset: &FixedOffset) -> String {
    format!("FixedOffset::east_opt({}).unwrap()", offset.local_minus_utc())
}

fn ip_code(addr: &IpAddr) -> String {
    match addr {
        IpAddr::V4(v4) => {
            let [a, b, c, d] = v4.octets();
            format!("IpAddr::V4(Ipv4Addr::new({a}, {b}, {c}, {d}))")
        }
        IpAddr::V6(v6) => {
            let segments = v6
                .segments()
                .iter()
                .map(|s| format!("0x{s:x}"))
                .collect::<Vec<_>>()
                .join(", ");
            format!("IpAddr::V6(Ipv6Addr::new({segments}))")
        }
    }
}

fn coord_code(x: f64, y: f64) -> String {
    format!("({}, {})", float_code(x), float_code(y))
}

fn coords_code(points: &geo_types::LineString<f64>) -> String {
    let coords = points
        .coords()
        .map(|c| coord_code(c.x, c.y))
        .collect::<Vec<_>>()
        .join(", ");
    format!("vec![{coords}]")
}

fn bound_code(bound: &Bound<Value>, subtype: &SemanticType) -> Result<String, LiteralError> {
    // bounds are scalars
    if let Bound::Included(v) | Bound::Excluded(v) = bound
        && matches!(
            v,
            Value::Null | Value::Bytes(_) | Value::Hstore(_) | Value::Array(_) | Value::Range(_)
        )
    {
        return Err(LiteralError::unmapped(v, subtype));
    }
    Ok(match bound {
        Bound::Included(v) => format!("Bound::Included({}.into())", render(v, subtype)?),
        Bound::Excluded(v) => format!("Bound::Excluded({}.into())", render(v, subtype)?),
        Bound::Unbounded => "Bound::Unbounded".to_string(),
    })
}

fn range_code(range: &Range, subtype: &SemanticType) -> Result<String, LiteralError> {
    match range {
        Range::Empty => Ok("Range::Empty".to_string()),
        Range::Bounded { lower, upper } => Ok(format!(
            "Range::new({}, {})",
            bound_code(lower, subtype)?,
            bound_code(upper, subtype)?
        )),
    }
}

fn render(value: &Value, ty: &SemanticType) -> Result<String, LiteralError> {
    use SemanticType as T;
    use Value as V;

    let code = match (ty, value) {
        (_, V::Null) => "None".to_string(),

        (T::Boolean, V::Bool(b)) => b.to_string(),
        (T::SmallInt | T::Integer | T::BigInt | T::Numeric, V::SmallInt(n)) => {
            integer_code(i64::from(*n), ty)
        }
        (T::SmallInt | T::Integer | T::BigInt | T::Numeric, V::Integer(n)) => {
            integer_code(i64::from(*n), ty)
        }
        (T::SmallInt | T::Integer | T::BigInt | T::Numeric, V::BigInt(n)) => integer_code(*n, ty),
        (T::Real, V::Real(x)) => f32_code(*x),
        (T::Real, V::Double(x)) => f32_code(*x as f32),
        (T::DoublePrecision | T::Numeric, V::Real(x)) => float_code(f64::from(*x)),
        (T::DoublePrecision | T::Numeric, V::Double(x)) => float_code(*x),

        (T::Text | T::Json | T::Jsonb | T::TsQuery | T::TsVector, V::Text(s)) => format!("{s:?}"),
        (T::Enum { name, .. }, V::Text(label)) => format!(
            "{}::{}",
            name.to_upper_camel_case(),
            label.to_upper_camel_case()
        ),
        (T::Bytea, V::Bytes(bytes)) => format!("vec!{}", bytes_code(bytes)),
        (T::Uuid, V::Uuid(u)) => format!("Uuid::from_u128(0x{:032x})", u.as_u128()),

        (T::Date, V::Date(d)) => date_code(d),
        (T::Timestamp, V::Timestamp(ts)) => timestamp_code(ts),
        (T::Timestamp, V::TimestampUtc(ts)) => timestamp_code(&ts.naive_utc()),
        (T::Timestamp, V::TimestampTz(ts)) => timestamp_code(&ts.naive_local()),
        (T::Timestamptz, V::Timestamp(ts)) => format!("{}.and_utc()", timestamp_code(ts)),
        (T::Timestamptz, V::TimestampUtc(ts)) => {
            format!("{}.and_utc()", timestamp_code(&ts.naive_utc()))
        }
        (T::Timestamptz, V::TimestampTz(ts)) => format!(
            "{}.and_local_timezone({}).unwrap()",
            timestamp_code(&ts.naive_local()),
            offset_code(ts.offset())
        ),
        (T::Time, V::Time(t)) => time_code(t),
        (T::Timetz, V::TimeTz(t)) => format!(
            "TimeTz::new({}, {})",
            time_code(&t.time),
            offset_code(&t.offset)
        ),
        (T::Interval, V::Interval(d)) => {
            // sub-microsecond precision is not representable server-side
            let Some(micros) = d.num_microseconds() else {
                return Err(LiteralError::out_of_range(value, ty));
            };
            format!("TimeDelta::microseconds({micros})")
        }

        (T::MacAddr, V::MacAddr(bytes)) => bytes_code(bytes),
        (T::MacAddr8, V::MacAddr8(bytes)) => bytes_code(bytes),
        (T::Inet, V::Inet(addr)) => ip_code(addr),
        (T::Cidr, V::Cidr(cidr)) => format!(
            "IpCidr::new({}, {}).unwrap()",
            ip_code(&cidr.first_address()),
            cidr.network_length()
        ),

        (T::Point, V::Point(p)) => {
            format!("Point::new({}, {})", float_code(p.x()), float_code(p.y()))
        }
        (T::Line, V::Line(l)) => format!(
            "Line::new({}, {}, {})",
            float_code(l.a),
            float_code(l.b),
            float_code(l.c)
        ),
        (T::LineSegment, V::LineSegment(seg)) => format!(
            "geo_types::Line::new({}, {})",
            coord_code(seg.start.x, seg.start.y),
            coord_code(seg.end.x, seg.end.y)
        ),
        (T::Box, V::Box(rect)) => format!(
            "Rect::new({}, {})",
            coord_code(rect.max().x, rect.max().y),
            coord_code(rect.min().x, rect.min().y)
        ),
        (T::Path, V::Path(path)) => {
            format!("Path::new({}, {})", coords_code(&path.points), path.open)
        }
        (T::Polygon, V::Polygon(points)) => format!("LineString::from({})", coords_code(points)),
        (T::Circle, V::Circle(c)) => format!(
            "Circle::new(Point::new({}, {}), {})",
            float_code(c.center.x()),
            float_code(c.center.y()),
            float_code(c.radius)
        ),

        (T::Bit | T::VarBit, V::Bits(bits)) => format!(
            "BitVec::from_iter([{}])",
            bits.iter().map(|b| b.to_string()).collect::<Vec<_>>().join(", ")
        ),
        (T::Hstore, V::Hstore(pairs)) => {
            let entries = pairs
                .iter()
                .map(|(k, v)| match v {
                    Some(v) => format!("({k:?}.to_string(), Some({v:?}.to_string()))"),
                    None => format!("({k:?}.to_string(), None)"),
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("vec![{entries}]")
        }
        (T::Tid, V::Tid(tid)) => format!("Tid::new({}, {})", tid.block, tid.offset),

        (T::Array(element), V::Array(items)) => {
            let items = items
                .iter()
                .map(|item| render(item, element))
                .collect::<Result<Vec<_>, _>>()?
                .join(", ");
            format!("vec![{items}]")
        }
        (T::Range { subtype, .. }, V::Range(range)) => range_code(range, subtype)?,

        _ => return Err(LiteralError::unmapped(value, ty)),
    };
    Ok(code)
}

/// Render `value` as a Rust expression of the type scaffolded for `ty`.
///
/// # Errors
///
/// [`LiteralError::Unmapped`] when the `(value, ty)` pair has no code mapping.
pub fn render_code_literal(value: &Value, ty: &SemanticType) -> Result<String, LiteralError> {
    render(value, ty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone, Utc};
    use geo_types::{Point, Rect, coord};
    use pgschema_types::postgres::{Circle, Path, Tid, TimeTz};

    fn code(value: impl Into<Value>, ty: SemanticType) -> String {
        render_code_literal(&value.into(), &ty).unwrap()
    }

    #[test]
    fn test_scalar_code() {
        assert_eq!(code(true, SemanticType::Boolean), "true");
        assert_eq!(code(42, SemanticType::Integer), "42");
        assert_eq!(code(42_i64, SemanticType::BigInt), "42_i64");
        assert_eq!(code(10.0, SemanticType::DoublePrecision), "10.0");
        assert_eq!(code(1.5_f32, SemanticType::Real), "1.5_f32");
        assert_eq!(code(f64::NAN, SemanticType::DoublePrecision), "f64::NAN");
        assert_eq!(code("it's \"x\"", SemanticType::Text), r#""it's \"x\"""#);
        assert_eq!(code(None::<i32>, SemanticType::Integer), "None");
    }

    #[test]
    fn test_bytes_and_uuid() {
        assert_eq!(
            code(Value::Bytes(vec![0xDE, 0xAD]), SemanticType::Bytea),
            "vec![0xDE, 0xAD]"
        );
        let id = uuid::Uuid::from_u128(0x1234);
        assert_eq!(
            code(id, SemanticType::Uuid),
            "Uuid::from_u128(0x00000000000000000000000000001234)"
        );
    }

    #[test]
    fn test_temporal_code() {
        let date = NaiveDate::from_ymd_opt(2015, 3, 12).unwrap();
        assert_eq!(
            code(date, SemanticType::Date),
            "NaiveDate::from_ymd_opt(2015, 3, 12).unwrap()"
        );

        let ts = NaiveDate::from_ymd_opt(1997, 12, 17)
            .unwrap()
            .and_hms_milli_opt(7, 37, 16, 345)
            .unwrap();
        assert_eq!(
            code(ts, SemanticType::Timestamp),
            "NaiveDate::from_ymd_opt(1997, 12, 17).unwrap().and_hms_micro_opt(7, 37, 16, 345000).unwrap()"
        );
        assert_eq!(
            code(Utc.from_utc_datetime(&ts), SemanticType::Timestamptz),
            "NaiveDate::from_ymd_opt(1997, 12, 17).unwrap().and_hms_micro_opt(7, 37, 16, 345000).unwrap().and_utc()"
        );

        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let zoned = offset.from_local_datetime(&ts.with_nanosecond(0).unwrap()).unwrap();
        assert_eq!(
            code(zoned, SemanticType::Timestamptz),
            "NaiveDate::from_ymd_opt(1997, 12, 17).unwrap().and_hms_opt(7, 37, 16).unwrap()\
             .and_local_timezone(FixedOffset::east_opt(7200).unwrap()).unwrap()"
        );

        let time = NaiveTime::from_hms_opt(4, 5, 6).unwrap();
        assert_eq!(
            code(TimeTz::new(time, FixedOffset::east_opt(-3 * 3600).unwrap()), SemanticType::Timetz),
            "TimeTz::new(NaiveTime::from_hms_opt(4, 5, 6).unwrap(), FixedOffset::east_opt(-10800).unwrap())"
        );
        assert_eq!(
            code(TimeDelta::seconds(90), SemanticType::Interval),
            "TimeDelta::microseconds(90000000)"
        );
    }

    #[test]
    fn test_network_code() {
        assert_eq!(
            code(Value::MacAddr([0, 0x11, 0x22, 0x33, 0x44, 0x55]), SemanticType::MacAddr),
            "[0x00, 0x11, 0x22, 0x33, 0x44, 0x55]"
        );
        let addr: IpAddr = "192.168.1.2".parse().unwrap();
        assert_eq!(
            code(addr, SemanticType::Inet),
            "IpAddr::V4(Ipv4Addr::new(192, 168, 1, 2))"
        );
        let cidr: cidr::IpCidr = "192.168.1.0/24".parse().unwrap();
        assert_eq!(
            code(cidr, SemanticType::Cidr),
            "IpCidr::new(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 0)), 24).unwrap()"
        );
    }

    #[test]
    fn test_geometry_code() {
        assert_eq!(code(Point::new(3.5, 4.5), SemanticType::Point), "Point::new(3.5, 4.5)");
        assert_eq!(
            code(
                pgschema_types::postgres::Line::new(3.5, 4.5, 10.0),
                SemanticType::Line
            ),
            "Line::new(3.5, 4.5, 10.0)"
        );
        assert_eq!(
            code(
                Rect::new(coord! { x: 1.0, y: 2.0 }, coord! { x: 7.0, y: 8.0 }),
                SemanticType::Box
            ),
            "Rect::new((7.0, 8.0), (1.0, 2.0))"
        );
        assert_eq!(
            code(Path::new(vec![(1.0, 2.0), (3.0, 4.0)], true), SemanticType::Path),
            "Path::new(vec![(1.0, 2.0), (3.0, 4.0)], true)"
        );
        assert_eq!(
            code(Circle::new(Point::new(3.5, 4.5), 5.5), SemanticType::Circle),
            "Circle::new(Point::new(3.5, 4.5), 5.5)"
        );
        assert_eq!(code(Tid::new(0, 1), SemanticType::Tid), "Tid::new(0, 1)");
    }

    #[test]
    fn test_enum_code_uses_type_and_label_casing() {
        assert_eq!(
            code("sad", SemanticType::enumeration(None, "dummy_enum")),
            "DummyEnum::Sad"
        );
        assert_eq!(
            code("very_happy", SemanticType::enumeration(Some("app"), "Mood")),
            "Mood::VeryHappy"
        );
    }

    #[test]
    fn test_array_and_range_code() {
        assert_eq!(
            code(vec![3, 4], SemanticType::array(SemanticType::Integer)),
            "vec![3, 4]"
        );
        assert_eq!(
            code(Range::empty(), SemanticType::int4range()),
            "Range::Empty"
        );
        assert_eq!(
            code(
                Range::new(Bound::Included(Value::Integer(4)), Bound::Unbounded),
                SemanticType::int4range()
            ),
            "Range::new(Bound::Included(4.into()), Bound::Unbounded)"
        );
    }

    #[test]
    fn test_numbers_follow_target_type() {
        assert_eq!(code(5, SemanticType::BigInt), "5_i64");
        assert_eq!(code(5, SemanticType::SmallInt), "5_i16");
        assert_eq!(code(5_i16, SemanticType::Integer), "5");
        assert_eq!(code(5_i64, SemanticType::Numeric), "5");
        assert_eq!(code(2.5, SemanticType::Real), "2.5_f32");
        assert_eq!(code(2.5_f32, SemanticType::Numeric), "2.5");
        assert_eq!(code(2.5_f32, SemanticType::DoublePrecision), "2.5");
    }

    #[test]
    fn test_timestamps_follow_target_type() {
        let ts = NaiveDate::from_ymd_opt(1997, 12, 17)
            .unwrap()
            .and_hms_opt(7, 37, 16)
            .unwrap();
        let naive = "NaiveDate::from_ymd_opt(1997, 12, 17).unwrap().and_hms_opt(7, 37, 16).unwrap()";

        assert_eq!(code(ts, SemanticType::Timestamptz), format!("{naive}.and_utc()"));
        assert_eq!(code(ts.and_utc(), SemanticType::Timestamp), naive);
        let offset = FixedOffset::east_opt(3600).unwrap();
        assert_eq!(
            code(offset.from_local_datetime(&ts).unwrap(), SemanticType::Timestamp),
            naive
        );
    }

    #[test]
    fn test_text_search_code() {
        assert_eq!(code("'a' & 'b'", SemanticType::TsQuery), r#""'a' & 'b'""#);
        assert_eq!(code("'a' 'b'", SemanticType::TsVector), r#""'a' 'b'""#);
    }

    #[test]
    fn test_interval_beyond_microsecond_range_fails() {
        assert_eq!(
            render_code_literal(&Value::Interval(TimeDelta::MAX), &SemanticType::Interval),
            Err(LiteralError::OutOfRange {
                value: "interval",
                ty: "interval".to_string()
            })
        );
    }

    #[test]
    fn test_null_range_bound_is_unmapped() {
        let range = Range::new(Bound::Included(Value::Null), Bound::Unbounded);
        assert!(render_code_literal(&Value::range(range), &SemanticType::int4range()).is_err());
    }

    #[test]
    fn test_mismatched_pair_is_unmapped() {
        let err = render_code_literal(&Value::Text("x".into()), &SemanticType::Integer).unwrap_err();
        assert_eq!(
            err,
            LiteralError::Unmapped {
                value: "text",
                ty: "integer".to_string()
            }
        );
    }
}
