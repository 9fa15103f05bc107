//! Top-level configuration for codec tooling.
//!
//! This module aggregates:
//!
//! - logging (`LogConfig`),
//! - the protocol parameter set used for parameter-sized arrays.
//!
//! A `CodecConfig` can be built from defaults, from a named preset, or from
//! a JSON node configuration file of the form
//! `{ "log": { "level": "info" }, "const": { ... } }`.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::params::{ParamsError, ProtocolParameters};

/// Logging configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default `tracing` filter level, e.g. `"info"` or `"debug"`.
    ///
    /// `RUST_LOG` takes precedence when set.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Top-level codec configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    #[serde(default)]
    pub log: LogConfig,
    #[serde(rename = "const", default)]
    pub params: ProtocolParameters,
}

/// Errors raised while loading a [`CodecConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io(std::io::Error),
    /// The file is not valid JSON for this shape.
    Parse(serde_json::Error),
    /// The parameter set is internally inconsistent.
    Params(ParamsError),
    /// A preset name that is neither `tiny` nor `full`.
    UnknownPreset(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read config: {e}"),
            ConfigError::Parse(e) => write!(f, "failed to parse config: {e}"),
            ConfigError::Params(e) => write!(f, "{e}"),
            ConfigError::UnknownPreset(name) => {
                write!(f, "unknown preset {name:?}, expected tiny or full")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<ParamsError> for ConfigError {
    fn from(e: ParamsError) -> Self {
        ConfigError::Params(e)
    }
}

impl CodecConfig {
    /// Parses and validates a configuration from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: CodecConfig = serde_json::from_str(text)?;
        cfg.params.validate().inspect_err(|e| {
            tracing::warn!(error = %e, "rejecting protocol parameters");
        })?;
        Ok(cfg)
    }

    /// Reads and validates a configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let cfg = Self::from_json_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded codec config");
        Ok(cfg)
    }

    /// Resolves a `--params` argument: a preset name or a config file path.
    pub fn from_preset_or_file(source: &str) -> Result<Self, ConfigError> {
        if let Some(params) = ProtocolParameters::preset(source) {
            return Ok(Self {
                params,
                ..Self::default()
            });
        }
        if source.ends_with(".json") || Path::new(source).exists() {
            return Self::from_json_file(source);
        }
        Err(ConfigError::UnknownPreset(source.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_full_parameters() {
        let cfg = CodecConfig::default();
        assert_eq!(cfg.params, ProtocolParameters::full());
        assert_eq!(cfg.log.level, "info");
    }

    #[test]
    fn parses_node_config_shape() {
        let text = r#"{
            "log": { "level": "debug" },
            "const": {
                "validators_count": 6,
                "cores_count": 2,
                "epoch_length": 12,
                "tickets_per_validator": 3,
                "max_tickets_per_block": 3,
                "validators_super_majority": 5,
                "avail_bitfield_bytes": 1,
                "auth_pool_max_size": 8,
                "auth_queue_size": 80,
                "rotation_period": 4
            }
        }"#;
        let cfg = CodecConfig::from_json_str(text).expect("tiny config should load");
        assert_eq!(cfg.log.level, "debug");
        assert_eq!(cfg.params, ProtocolParameters::tiny());
    }

    #[test]
    fn inconsistent_params_are_rejected() {
        let text = r#"{
            "const": {
                "validators_count": 6,
                "cores_count": 2,
                "epoch_length": 12,
                "tickets_per_validator": 3,
                "max_tickets_per_block": 3,
                "validators_super_majority": 6,
                "avail_bitfield_bytes": 1,
                "auth_pool_max_size": 8,
                "auth_queue_size": 80
            }
        }"#;
        let err = CodecConfig::from_json_str(text).expect_err("super majority is wrong");
        assert!(matches!(err, ConfigError::Params(_)));
    }

    #[test]
    fn preset_names_resolve() {
        let cfg = CodecConfig::from_preset_or_file("tiny").expect("tiny is a preset");
        assert_eq!(cfg.params.validators_count, 6);
        assert!(matches!(
            CodecConfig::from_preset_or_file("medium"),
            Err(ConfigError::UnknownPreset(_))
        ));
    }
}
