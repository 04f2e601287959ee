//! Runtime values that can be embedded into generated SQL or scaffolded code
//!
//! Scalar and temporal values reuse `chrono`, network values `cidr` / `std::net`,
//! geometry `geo-types` and bit strings `bit-vec`. Shapes PostgreSQL has but those crates
//! don't model (line equations, paths with an open flag, circles, tids, zoned times and
//! ranges) are defined here.

use std::net::IpAddr;
use std::ops::Bound;

use bit_vec::BitVec;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use cidr::IpCidr;
use geo_types::{LineString, Point, Rect};
use uuid::Uuid;

//------------------------------------------------------------------------------
// Value
//------------------------------------------------------------------------------

/// A value paired with a [`SemanticType`](super::SemanticType) at render time.
///
/// Enum labels and JSON documents are carried as [`Value::Text`]; the semantic type
/// decides how they are spelled.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Null,
    Bool(bool),
    SmallInt(i16),
    Integer(i32),
    BigInt(i64),
    Real(f32),
    Double(f64),
    Text(String),
    Bytes(Vec<u8>),
    Uuid(Uuid),

    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    /// Zoned timestamp known to be UTC, rendered with a `UTC` suffix
    TimestampUtc(DateTime<Utc>),
    /// Zoned timestamp rendered with its own offset
    TimestampTz(DateTime<FixedOffset>),
    Time(NaiveTime),
    TimeTz(TimeTz),
    Interval(
        #[cfg_attr(feature = "serde", serde(with = "crate::serde_helpers::time_delta_micros"))]
        TimeDelta,
    ),

    MacAddr([u8; 6]),
    MacAddr8([u8; 8]),
    Inet(IpAddr),
    Cidr(IpCidr),

    Point(Point<f64>),
    Line(Line),
    LineSegment(geo_types::Line<f64>),
    Box(Rect<f64>),
    Path(Path),
    Polygon(LineString<f64>),
    Circle(Circle),

    Bits(BitVec),
    /// `hstore` pairs in insertion order; a `None` value is SQL `NULL`
    Hstore(Vec<(String, Option<String>)>),
    Tid(Tid),

    Array(Vec<Value>),
    Range(std::boxed::Box<Range>),
}

impl Value {
    /// Short name of the variant, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::SmallInt(_) => "smallint",
            Value::Integer(_) => "integer",
            Value::BigInt(_) => "bigint",
            Value::Real(_) => "real",
            Value::Double(_) => "double",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Uuid(_) => "uuid",
            Value::Date(_) => "date",
            Value::Timestamp(_) => "timestamp",
            Value::TimestampUtc(_) => "timestamp (utc)",
            Value::TimestampTz(_) => "timestamp (offset)",
            Value::Time(_) => "time",
            Value::TimeTz(_) => "timetz",
            Value::Interval(_) => "interval",
            Value::MacAddr(_) => "macaddr",
            Value::MacAddr8(_) => "macaddr8",
            Value::Inet(_) => "inet",
            Value::Cidr(_) => "cidr",
            Value::Point(_) => "point",
            Value::Line(_) => "line",
            Value::LineSegment(_) => "lseg",
            Value::Box(_) => "box",
            Value::Path(_) => "path",
            Value::Polygon(_) => "polygon",
            Value::Circle(_) => "circle",
            Value::Bits(_) => "bits",
            Value::Hstore(_) => "hstore",
            Value::Tid(_) => "tid",
            Value::Array(_) => "array",
            Value::Range(_) => "range",
        }
    }

    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    #[must_use]
    pub fn range(range: Range) -> Self {
        Value::Range(std::boxed::Box::new(range))
    }
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

impl_from_value! {
    bool => Bool,
    i16 => SmallInt,
    i32 => Integer,
    i64 => BigInt,
    f32 => Real,
    f64 => Double,
    String => Text,
    Uuid => Uuid,
    NaiveDate => Date,
    NaiveDateTime => Timestamp,
    DateTime<Utc> => TimestampUtc,
    DateTime<FixedOffset> => TimestampTz,
    NaiveTime => Time,
    TimeTz => TimeTz,
    TimeDelta => Interval,
    IpAddr => Inet,
    IpCidr => Cidr,
    Point<f64> => Point,
    Line => Line,
    geo_types::Line<f64> => LineSegment,
    Rect<f64> => Box,
    Path => Path,
    Circle => Circle,
    BitVec => Bits,
    Tid => Tid,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<Range> for Value {
    fn from(value: Range) -> Self {
        Value::range(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::Array(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

//------------------------------------------------------------------------------
// Dialect-specific shapes
//------------------------------------------------------------------------------

/// Time of day with a UTC offset (`timetz`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeTz {
    pub time: NaiveTime,
    #[cfg_attr(feature = "serde", serde(with = "crate::serde_helpers::fixed_offset_seconds"))]
    pub offset: FixedOffset,
}

impl TimeTz {
    #[must_use]
    pub const fn new(time: NaiveTime, offset: FixedOffset) -> Self {
        Self { time, offset }
    }
}

/// Infinite line `{A,B,C}` satisfying `Ax + By + C = 0`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Line {
    #[must_use]
    pub const fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }
}

/// Sequence of points, closed (`(...)`) or open (`[...]`)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    pub points: LineString<f64>,
    pub open: bool,
}

impl Path {
    #[must_use]
    pub fn new(points: impl Into<LineString<f64>>, open: bool) -> Self {
        Self {
            points: points.into(),
            open,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Circle {
    pub center: Point<f64>,
    pub radius: f64,
}

impl Circle {
    #[must_use]
    pub const fn new(center: Point<f64>, radius: f64) -> Self {
        Self { center, radius }
    }
}

/// Tuple identifier: `(block, offset)` of a row version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tid {
    pub block: u32,
    pub offset: u16,
}

impl Tid {
    #[must_use]
    pub const fn new(block: u32, offset: u16) -> Self {
        Self { block, offset }
    }
}

//------------------------------------------------------------------------------
// Range
//------------------------------------------------------------------------------

/// Value of a range type
///
/// `Bound::Unbounded` is an infinite side. An empty range has no bounds at all, which
/// is why it is a separate variant rather than a pair of equal exclusive bounds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Range {
    Empty,
    Bounded { lower: Bound<Value>, upper: Bound<Value> },
}

impl Range {
    #[must_use]
    pub const fn empty() -> Self {
        Range::Empty
    }

    #[must_use]
    pub fn new(lower: Bound<Value>, upper: Bound<Value>) -> Self {
        Range::Bounded { lower, upper }
    }

    /// `[lower,upper]`
    #[must_use]
    pub fn inclusive(lower: impl Into<Value>, upper: impl Into<Value>) -> Self {
        Self::new(Bound::Included(lower.into()), Bound::Included(upper.into()))
    }

    /// `[lower,upper)`, the canonical form of discrete ranges
    #[must_use]
    pub fn closed_open(lower: impl Into<Value>, upper: impl Into<Value>) -> Self {
        Self::new(Bound::Included(lower.into()), Bound::Excluded(upper.into()))
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Range::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_into_value() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some(3)), Value::Integer(3));
    }

    #[test]
    fn test_vec_into_array() {
        assert_eq!(
            Value::from(vec![3, 4]),
            Value::Array(vec![Value::Integer(3), Value::Integer(4)])
        );
    }

    #[test]
    fn test_range_constructors() {
        let r = Range::closed_open(1, 10);
        assert_eq!(
            r,
            Range::Bounded {
                lower: Bound::Included(Value::Integer(1)),
                upper: Bound::Excluded(Value::Integer(10)),
            }
        );
        assert!(!r.is_empty());
        assert!(Range::empty().is_empty());
    }
}
