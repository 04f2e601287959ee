//! Serde helpers for types without their own serde support

/// (De)serialize a `chrono::TimeDelta` as a whole number of microseconds
///
/// PostgreSQL intervals have microsecond resolution, so nothing is lost for
/// values that came from (or are going to) the database.
#[cfg(feature = "serde")]
pub mod time_delta_micros {
    use chrono::TimeDelta;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(delta: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match delta.num_microseconds() {
            Some(micros) => serializer.serialize_i64(micros),
            None => Err(serde::ser::Error::custom("interval out of microsecond range")),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<TimeDelta, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros = i64::deserialize(deserializer)?;
        Ok(TimeDelta::microseconds(micros))
    }
}

/// (De)serialize a `chrono::FixedOffset` as seconds east of UTC
#[cfg(feature = "serde")]
pub mod fixed_offset_seconds {
    use chrono::FixedOffset;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(offset: &FixedOffset, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i32(offset.local_minus_utc())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<FixedOffset, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = i32::deserialize(deserializer)?;
        FixedOffset::east_opt(seconds)
            .ok_or_else(|| serde::de::Error::custom("utc offset out of range"))
    }
}
