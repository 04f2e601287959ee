//! PostgreSQL server version gate
//!
//! A [`DialectVersion`] is the `(major, minor)` pair of the server the DDL targets.
//! Generators hold an `Option<DialectVersion>`: `None` means "assume the newest server",
//! which is why every gate goes through [`at_least`] rather than comparing directly.

use core::fmt;

/// Target PostgreSQL version
///
/// # Examples
///
/// ```
/// use pgschema_types::DialectVersion;
///
/// let v: DialectVersion = "9.6".parse().unwrap();
/// assert!(v < DialectVersion::new(10, 0));
/// assert_eq!(v.to_string(), "9.6");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DialectVersion {
    pub major: u32,
    pub minor: u32,
}

impl DialectVersion {
    /// PostgreSQL 10, first release with identity columns and `CREATE SEQUENCE ... AS`
    pub const V10: Self = Self::new(10, 0);

    /// PostgreSQL 12, first release with stored generated columns
    pub const V12: Self = Self::new(12, 0);

    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse `"major"` or `"major.minor"`; any further components are ignored
    /// (`"11.4.2"` parses as `11.4`).
    pub fn parse(s: &str) -> Result<Self, VersionParseError> {
        let s = s.trim();
        let mut parts = s.split('.');
        let major = parts
            .next()
            .filter(|p| !p.is_empty())
            .and_then(|p| p.parse::<u32>().ok())
            .ok_or_else(|| VersionParseError(s.to_string()))?;
        let minor = match parts.next() {
            Some(p) => p
                .parse::<u32>()
                .map_err(|_| VersionParseError(s.to_string()))?,
            None => 0,
        };
        Ok(Self { major, minor })
    }
}

/// Returns `true` when `version` is absent or at least `major.minor`.
#[inline]
#[must_use]
pub fn at_least(version: Option<DialectVersion>, major: u32, minor: u32) -> bool {
    version.is_none_or(|v| v >= DialectVersion::new(major, minor))
}

impl fmt::Display for DialectVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl core::str::FromStr for DialectVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Error returned when a version string is not `major[.minor]`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid PostgreSQL version: {0:?}")]
pub struct VersionParseError(pub String);
