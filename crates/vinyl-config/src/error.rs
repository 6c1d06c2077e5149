//! Error types for configuration operations.

use thiserror::Error;

use crate::layout::BusLayout;

/// Errors that can occur while building or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Sample rate is zero, negative, or not finite.
    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(f32),

    /// Maximum block size is zero.
    #[error("invalid maximum block size: {0}")]
    InvalidBlockSize(usize),

    /// Channel count is zero or above what the processor supports.
    #[error("invalid channel count {count} (supported: 1 to {max})")]
    InvalidChannelCount {
        /// Requested channel count.
        count: usize,
        /// Largest supported channel count.
        max: usize,
    },

    /// The host offered a bus layout the processor rejects.
    #[error("unsupported bus layout: {0}")]
    UnsupportedLayout(BusLayout),

    /// An initial parameter value is NaN or infinite.
    #[error("setting '{name}' must be finite, got {value}")]
    NonFiniteSetting {
        /// Name of the offending setting.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
}
