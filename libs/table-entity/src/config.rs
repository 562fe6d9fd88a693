use serde::Deserialize;

use crate::error::ConvertError;

/// Which calendar synthesized partition keys follow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockZone {
    /// Host local time.
    #[default]
    Local,
    Utc,
}

/// Converter configuration, parsed from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConverterConfig {
    /// Clock used for `"{year}-{month}"` partition keys.
    #[serde(default)]
    pub clock: ClockZone,

    /// Skip `#[entity(ignore)]` fields in both directions.
    #[serde(default = "default_honor_ignore")]
    pub honor_ignore: bool,
}

fn default_honor_ignore() -> bool {
    true
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            clock: ClockZone::default(),
            honor_ignore: default_honor_ignore(),
        }
    }
}

impl ConverterConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self, ConvertError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConvertError::Config(format!("{path}: {e}")))?;
        Self::parse(&content).map_err(|e| e.with_context(path))
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, ConvertError> {
        toml::from_str(toml_str).map_err(|e| ConvertError::Config(e.to_string()))
    }
}
