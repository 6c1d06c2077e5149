//! Initial parameter values and the top-level TOML configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::stream::StreamConfig;

/// Default volume, matching the host-facing `VOLUME` parameter.
const DEFAULT_VOLUME: f32 = 0.5;

/// Parameter values a processor starts from.
///
/// Values are taken as given: out-of-range numbers are accepted and mapped
/// like any other. Only NaN and infinities are rejected by
/// [`validate`](Self::validate).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorSettings {
    /// Linear output gain.
    pub volume: f32,
    /// Tone shaper drive (sub-bass cut, low-mid boost, high roll-off).
    pub first_eq: f32,
    /// Low-cut amount.
    pub low_cut: f32,
    /// High-cut amount.
    pub high_cut: f32,
}

impl ProcessorSettings {
    /// Check that every value is finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("volume", self.volume),
            ("first_eq", self.first_eq),
            ("low_cut", self.low_cut),
            ("high_cut", self.high_cut),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteSetting { name, value });
            }
        }
        Ok(())
    }
}

impl Default for ProcessorSettings {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            first_eq: 0.0,
            low_cut: 0.0,
            high_cut: 0.0,
        }
    }
}

/// Complete processor configuration: stream shape plus initial settings.
///
/// Both tables are optional in TOML; missing tables and keys fall back to
/// their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VinylConfig {
    /// Stream the processor is prepared for.
    pub stream: StreamConfig,
    /// Initial parameter values.
    pub settings: ProcessorSettings,
}

impl VinylConfig {
    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate both the stream and the settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.stream.validate()?;
        self.settings.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_defaults() {
        let s = ProcessorSettings::default();
        assert_eq!(s.volume, 0.5);
        assert_eq!(s.first_eq, 0.0);
        assert_eq!(s.low_cut, 0.0);
        assert_eq!(s.high_cut, 0.0);
    }

    #[test]
    fn out_of_range_settings_are_accepted() {
        let s = ProcessorSettings {
            volume: 2.0,
            first_eq: -0.5,
            low_cut: 1.5,
            high_cut: 0.0,
        };
        assert!(s.validate().is_ok());
    }

    #[test]
    fn nan_setting_is_rejected() {
        let s = ProcessorSettings {
            low_cut: f32::NAN,
            ..ProcessorSettings::default()
        };
        let err = s.validate().unwrap_err();
        assert!(matches!(err, ConfigError::NonFiniteSetting { name: "low_cut", .. }));
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = VinylConfig::from_toml_str("").unwrap();
        assert_eq!(config, VinylConfig::default());
    }

    #[test]
    fn partial_tables_fill_in_defaults() {
        let config = VinylConfig::from_toml_str(
            r#"
            [stream]
            sample_rate = 44100.0

            [settings]
            first_eq = 0.7
            "#,
        )
        .unwrap();
        assert_eq!(config.stream.sample_rate, 44100.0);
        assert_eq!(config.stream.max_block_size, 512);
        assert_eq!(config.stream.num_channels, 2);
        assert_eq!(config.settings.first_eq, 0.7);
        assert_eq!(config.settings.volume, 0.5);
    }

    #[test]
    fn invalid_stream_in_toml_is_rejected() {
        let err = VinylConfig::from_toml_str("[stream]\nmax_block_size = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBlockSize(0)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = VinylConfig::from_toml_str("[stream\nsample_rate = 1").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn wrong_type_is_a_parse_error() {
        let err = VinylConfig::from_toml_str("[settings]\nvolume = \"loud\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }
}
