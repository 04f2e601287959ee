//! SQL and code literal agreement
//!
//! Every `(Value, SemanticType)` pair the SQL renderer accepts must also render as code,
//! and every pair it rejects must be rejected as code too.

use std::net::IpAddr;
use std::ops::Bound;

use bit_vec::BitVec;
use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};
use geo_types::{LineString, Point, Rect};
use pgschema_postgres::{render_code_literal, render_sql_literal};
use pgschema_types::postgres::{Circle, Line, Path, Range, SemanticType, Tid, TimeTz, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1997, 12, 17)
        .unwrap()
        .and_hms_opt(7, 37, 16)
        .unwrap()
}

fn semantic_types() -> Vec<SemanticType> {
    use SemanticType as T;
    vec![
        T::Boolean,
        T::SmallInt,
        T::Integer,
        T::BigInt,
        T::Real,
        T::DoublePrecision,
        T::Numeric,
        T::Text,
        T::Json,
        T::Jsonb,
        T::Bytea,
        T::Uuid,
        T::Date,
        T::Timestamp,
        T::Timestamptz,
        T::Time,
        T::Timetz,
        T::Interval,
        T::MacAddr,
        T::MacAddr8,
        T::Inet,
        T::Cidr,
        T::Point,
        T::Line,
        T::LineSegment,
        T::Box,
        T::Path,
        T::Polygon,
        T::Circle,
        T::Bit,
        T::VarBit,
        T::Hstore,
        T::Tid,
        T::TsQuery,
        T::TsVector,
        T::enumeration(None, "mood"),
        T::int4range(),
        T::numrange(),
        T::tsrange(),
        T::tstzrange(),
        T::array(T::Integer),
        T::array(T::Text),
        T::array(T::enumeration(Some("app"), "mood")),
    ]
}

fn values() -> Vec<Value> {
    let ts = timestamp();
    let offset = FixedOffset::east_opt(2 * 3600).unwrap();
    let points = vec![(1.0, 2.0), (3.0, 4.0)];
    vec![
        Value::Null,
        true.into(),
        5_i16.into(),
        5.into(),
        5_i64.into(),
        2.5_f32.into(),
        2.5.into(),
        f64::NAN.into(),
        "'a' & 'b'".into(),
        Value::Bytes(vec![0xDE, 0xAD]),
        uuid::Uuid::from_u128(0x1234).into(),
        ts.date().into(),
        ts.into(),
        ts.and_utc().into(),
        offset.from_local_datetime(&ts).unwrap().into(),
        NaiveTime::from_hms_opt(4, 5, 6).unwrap().into(),
        TimeTz::new(NaiveTime::from_hms_opt(4, 5, 6).unwrap(), offset).into(),
        TimeDelta::seconds(90).into(),
        TimeDelta::MAX.into(),
        Value::MacAddr([0, 0x11, 0x22, 0x33, 0x44, 0x55]),
        Value::MacAddr8([0, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77]),
        "192.168.1.1".parse::<IpAddr>().unwrap().into(),
        "192.168.1.0/24".parse::<cidr::IpCidr>().unwrap().into(),
        Point::new(3.5, 4.5).into(),
        Line::new(3.5, 4.5, 10.0).into(),
        geo_types::Line::new((3.5, 4.5), (5.5, 6.5)).into(),
        Rect::new((4.0, 1.0), (2.0, 3.0)).into(),
        Path::new(points.clone(), true).into(),
        Value::Polygon(LineString::from(points)),
        Circle::new(Point::new(3.5, 4.5), 5.5).into(),
        [true, false].into_iter().collect::<BitVec>().into(),
        Value::Hstore(vec![("k".into(), Some("v".into()))]),
        Tid::new(0, 1).into(),
        vec![3, 4].into(),
        vec!["happy", "sad"].into(),
        Value::Array(Vec::new()),
        Range::empty().into(),
        Range::inclusive(4, 7).into(),
        Range::new(Bound::Included(Value::from(ts)), Bound::Unbounded).into(),
        Range::new(Bound::Included(Value::Null), Bound::Unbounded).into(),
    ]
}

// =============================================================================
// Tests
// =============================================================================

#[test]
fn test_renderers_accept_the_same_pairs() {
    let mut mismatches = Vec::new();
    for ty in semantic_types() {
        for value in values() {
            let sql = render_sql_literal(&value, &ty);
            let code = render_code_literal(&value, &ty);
            if sql.is_ok() != code.is_ok() {
                mismatches.push(format!("{value:?} as {ty}: sql {sql:?}, code {code:?}"));
            }
        }
    }
    assert!(mismatches.is_empty(), "{mismatches:#?}");
}

#[test]
fn test_widened_pairs_render_both_ways() {
    let cases = [
        (Value::Integer(5), SemanticType::BigInt, "5", "5_i64"),
        (Value::Integer(5), SemanticType::SmallInt, "5", "5_i16"),
        (Value::Double(2.5), SemanticType::Real, "2.5", "2.5_f32"),
        (Value::Real(2.5), SemanticType::Numeric, "2.5", "2.5"),
    ];
    for (value, ty, sql, code) in cases {
        assert_eq!(render_sql_literal(&value, &ty).unwrap(), sql);
        assert_eq!(render_code_literal(&value, &ty).unwrap(), code);
    }

    let naive = Value::from(timestamp());
    assert_eq!(
        render_sql_literal(&naive, &SemanticType::Timestamptz).unwrap(),
        "TIMESTAMPTZ '1997-12-17 07:37:16 UTC'"
    );
    assert_eq!(
        render_code_literal(&naive, &SemanticType::Timestamptz).unwrap(),
        "NaiveDate::from_ymd_opt(1997, 12, 17).unwrap().and_hms_opt(7, 37, 16).unwrap().and_utc()"
    );
}

#[test]
fn test_text_search_literals() {
    let query = Value::from("'a' & 'b'");
    assert_eq!(
        render_sql_literal(&query, &SemanticType::TsQuery).unwrap(),
        "TSQUERY '''a'' & ''b'''"
    );
    let vector = Value::from("'a' 'b'");
    assert_eq!(
        render_sql_literal(&vector, &SemanticType::TsVector).unwrap(),
        "TSVECTOR '''a'' ''b'''"
    );
}
