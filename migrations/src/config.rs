//! Configuration types for pgschema.toml

use pgschema_types::{DialectVersion, VersionParseError};
use serde::{Deserialize, Serialize};

use crate::postgres::BREAKPOINT;

/// Generator configuration, usually read from `pgschema.toml`
///
/// ```toml
/// postgres_version = "9.6"
/// default_schema = "app"
/// breakpoints = true
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Target server version; absent means the newest syntax is allowed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postgres_version: Option<String>,
    /// Schema assumed for enums and ranges the model doesn't place explicitly
    #[serde(default = "default_schema")]
    pub default_schema: String,
    /// Separate command batches with a delimiter line when rendering a script
    #[serde(default = "default_breakpoints")]
    pub breakpoints: bool,
    #[serde(default = "default_batch_delimiter")]
    pub batch_delimiter: String,
}

fn default_schema() -> String {
    pgschema_types::postgres::ddl::DEFAULT_SCHEMA.to_string()
}

fn default_breakpoints() -> bool {
    true
}

fn default_batch_delimiter() -> String {
    BREAKPOINT.to_string()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            postgres_version: None,
            default_schema: default_schema(),
            breakpoints: default_breakpoints(),
            batch_delimiter: default_batch_delimiter(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::parse(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// The parsed target version, if one is configured
    pub fn version(&self) -> Result<Option<DialectVersion>, ConfigError> {
        self.postgres_version
            .as_deref()
            .map(DialectVersion::parse)
            .transpose()
            .map_err(ConfigError::from)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Invalid version: {0}")]
    InvalidVersion(#[from] VersionParseError),
}
