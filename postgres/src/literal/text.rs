//! Textual forms of scalar values, shared by SQL literals and range bounds
//!
//! The text here is what goes *between* the quotes of a typed literal
//! (`DATE '<text>'`) and what a range bound holds before bound quoting.

use core::fmt::Write;

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use pgschema_types::postgres::{SemanticType, Value};

use super::LiteralError;

pub(crate) fn hex_upper(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02X}");
    }
    out
}

/// `.ffffff` with trailing zeros trimmed, empty when the fraction is zero.
///
/// Precision below one microsecond is truncated.
pub(crate) fn fraction(nanos: u32) -> String {
    let micros = (nanos % 1_000_000_000) / 1_000;
    if micros == 0 {
        return String::new();
    }
    let digits = format!("{micros:06}");
    format!(".{}", digits.trim_end_matches('0'))
}

pub(crate) fn date_text(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub(crate) fn time_text(time: &NaiveTime) -> String {
    format!(
        "{:02}:{:02}:{:02}{}",
        time.hour(),
        time.minute(),
        time.second(),
        fraction(time.nanosecond())
    )
}

pub(crate) fn timestamp_text(ts: &NaiveDateTime) -> String {
    format!("{} {}", date_text(&ts.date()), time_text(&ts.time()))
}

/// `+02:00` style offset, used by zoned timestamps
pub(crate) fn offset_text(offset: &FixedOffset) -> String {
    let seconds = offset.local_minus_utc();
    let sign = if seconds < 0 { '-' } else { '+' };
    let abs = seconds.unsigned_abs();
    format!("{sign}{:02}:{:02}", abs / 3600, (abs % 3600) / 60)
}

/// Shortest offset that parses back: `+3`, `-3`, `+5:30`
pub(crate) fn short_offset_text(offset: &FixedOffset) -> String {
    let seconds = offset.local_minus_utc();
    let sign = if seconds < 0 { '-' } else { '+' };
    let abs = seconds.unsigned_abs();
    let (hours, minutes) = (abs / 3600, (abs % 3600) / 60);
    if minutes == 0 {
        format!("{sign}{hours}")
    } else {
        format!("{sign}{hours}:{minutes:02}")
    }
}

/// `[-][D ]HH:MM:SS[.ffffff]`, the sign applying to the whole interval
pub(crate) fn interval_text(delta: &TimeDelta) -> String {
    let negative = *delta < TimeDelta::zero();
    let abs = delta.abs();
    let total_seconds = abs.num_seconds();
    let days = total_seconds / 86_400;
    let rem = total_seconds % 86_400;
    let (hours, minutes, seconds) = (rem / 3600, (rem % 3600) / 60, rem % 60);
    let nanos = u32::try_from(abs.subsec_nanos()).unwrap_or(0);

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    if days != 0 {
        let _ = write!(out, "{days} ");
    }
    let _ = write!(out, "{hours:02}:{minutes:02}:{seconds:02}{}", fraction(nanos));
    out
}

/// Display of a finite float, `NaN` / `Infinity` / `-Infinity` otherwise
pub(crate) fn float_text<F>(x: F) -> String
where
    F: Into<f64> + Copy + core::fmt::Display,
{
    let wide: f64 = x.into();
    if wide.is_nan() {
        "NaN".to_string()
    } else if wide.is_infinite() {
        if wide > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        x.to_string()
    }
}

fn point_text(x: f64, y: f64) -> String {
    format!("({x},{y})")
}

fn points_text(points: &geo_types::LineString<f64>) -> String {
    points
        .coords()
        .map(|c| point_text(c.x, c.y))
        .collect::<Vec<_>>()
        .join(",")
}

/// Text of a scalar value, or [`LiteralError::Unmapped`] if the pair has no mapping.
pub(crate) fn scalar_text(value: &Value, ty: &SemanticType) -> Result<String, LiteralError> {
    use SemanticType as T;
    use Value as V;

    let text = match (ty, value) {
        (T::Boolean, V::Bool(b)) => b.to_string(),

        (T::SmallInt | T::Integer | T::BigInt | T::Numeric, V::SmallInt(n)) => n.to_string(),
        (T::SmallInt | T::Integer | T::BigInt | T::Numeric, V::Integer(n)) => n.to_string(),
        (T::SmallInt | T::Integer | T::BigInt | T::Numeric, V::BigInt(n)) => n.to_string(),
        (T::Real | T::DoublePrecision | T::Numeric, V::Real(x)) => float_text(*x),
        (T::Real | T::DoublePrecision | T::Numeric, V::Double(x)) => float_text(*x),

        (T::Text | T::Json | T::Jsonb | T::TsQuery | T::TsVector, V::Text(s)) => s.clone(),
        (T::Enum { .. }, V::Text(label)) => label.clone(),
        (T::Uuid, V::Uuid(u)) => u.hyphenated().to_string(),

        (T::Date, V::Date(d)) => date_text(d),
        (T::Timestamp, V::Timestamp(ts)) => timestamp_text(ts),
        (T::Timestamp, V::TimestampUtc(ts)) => timestamp_text(&ts.naive_utc()),
        (T::Timestamp, V::TimestampTz(ts)) => timestamp_text(&ts.naive_local()),
        (T::Timestamptz, V::Timestamp(ts)) => format!("{} UTC", timestamp_text(ts)),
        (T::Timestamptz, V::TimestampUtc(ts)) => format!("{} UTC", timestamp_text(&ts.naive_utc())),
        (T::Timestamptz, V::TimestampTz(ts)) => format!(
            "{}{}",
            timestamp_text(&ts.naive_local()),
            offset_text(ts.offset())
        ),
        (T::Time, V::Time(t)) => time_text(t),
        (T::Timetz, V::TimeTz(t)) => {
            format!("{}{}", time_text(&t.time), short_offset_text(&t.offset))
        }
        // interval time is held server-side as an i64 microsecond count
        (T::Interval, V::Interval(d)) if d.num_microseconds().is_none() => {
            return Err(LiteralError::out_of_range(value, ty));
        }
        (T::Interval, V::Interval(d)) => interval_text(d),

        (T::MacAddr, V::MacAddr(bytes)) => hex_upper(bytes),
        (T::MacAddr8, V::MacAddr8(bytes)) => hex_upper(bytes),
        (T::Inet, V::Inet(addr)) => addr.to_string(),
        (T::Cidr, V::Cidr(cidr)) => format!("{}/{}", cidr.first_address(), cidr.network_length()),

        (T::Point, V::Point(p)) => point_text(p.x(), p.y()),
        (T::Line, V::Line(l)) => format!("{{{},{},{}}}", l.a, l.b, l.c),
        (T::LineSegment, V::LineSegment(seg)) => format!(
            "[{},{}]",
            point_text(seg.start.x, seg.start.y),
            point_text(seg.end.x, seg.end.y)
        ),
        (T::Box, V::Box(rect)) => format!(
            "({},{})",
            point_text(rect.max().x, rect.max().y),
            point_text(rect.min().x, rect.min().y)
        ),
        (T::Path, V::Path(path)) if path.open => format!("[{}]", points_text(&path.points)),
        (T::Path, V::Path(path)) => format!("({})", points_text(&path.points)),
        (T::Polygon, V::Polygon(points)) => format!("({})", points_text(points)),
        (T::Circle, V::Circle(c)) => format!(
            "<{},{}>",
            point_text(c.center.x(), c.center.y()),
            c.radius
        ),

        (T::Bit | T::VarBit, V::Bits(bits)) => bits.iter().map(|b| if b { '1' } else { '0' }).collect(),
        (T::Tid, V::Tid(tid)) => format!("({},{})", tid.block, tid.offset),

        _ => return Err(LiteralError::unmapped(value, ty)),
    };
    Ok(text)
}
