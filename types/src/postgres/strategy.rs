//! Value generation strategies for key columns

use crate::version::{DialectVersion, at_least};

/// How PostgreSQL produces values for a column on insert
///
/// At most one strategy is active per column. `None` is the absence of any
/// database-side generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueGenerationStrategy {
    #[default]
    None,
    /// Client-side hi/lo allocation backed by an ordinary sequence
    SequenceHiLo,
    /// `serial` / `bigserial` / `smallserial` pseudo-type with an owned sequence
    SerialColumn,
    /// `GENERATED ALWAYS AS IDENTITY`
    IdentityAlwaysColumn,
    /// `GENERATED BY DEFAULT AS IDENTITY`
    IdentityByDefaultColumn,
}

impl ValueGenerationStrategy {
    /// The strategy a key column gets with no explicit configuration.
    ///
    /// Serial below 10.0, identity-by-default from 10.0 on (and when the version is unknown).
    #[must_use]
    pub fn conventional(version: Option<DialectVersion>) -> Self {
        if at_least(version, 10, 0) {
            Self::IdentityByDefaultColumn
        } else {
            Self::SerialColumn
        }
    }

    #[must_use]
    pub const fn is_identity(&self) -> bool {
        matches!(
            self,
            Self::IdentityAlwaysColumn | Self::IdentityByDefaultColumn
        )
    }

    /// `ALWAYS` / `BY DEFAULT` for identity strategies.
    #[must_use]
    pub const fn identity_clause(&self) -> Option<&'static str> {
        match self {
            Self::IdentityAlwaysColumn => Some("ALWAYS"),
            Self::IdentityByDefaultColumn => Some("BY DEFAULT"),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::SequenceHiLo => "SequenceHiLo",
            Self::SerialColumn => "SerialColumn",
            Self::IdentityAlwaysColumn => "IdentityAlwaysColumn",
            Self::IdentityByDefaultColumn => "IdentityByDefaultColumn",
        }
    }
}

impl core::fmt::Display for ValueGenerationStrategy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
