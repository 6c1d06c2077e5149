//! Stream shape fixed at prepare time.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::layout::{BusLayout, MAX_CHANNELS};

/// Sample rate, block size, and channel count of one audio stream.
///
/// All three are fixed between two `prepare` calls. Changing any of them
/// means preparing again.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Sample rate in Hz.
    pub sample_rate: f32,
    /// Largest block the host will deliver, in frames.
    pub max_block_size: usize,
    /// Number of audio channels.
    pub num_channels: usize,
}

impl StreamConfig {
    /// Create a stream configuration. Call [`validate`](Self::validate)
    /// before using it.
    pub fn new(sample_rate: f32, max_block_size: usize, num_channels: usize) -> Self {
        Self {
            sample_rate,
            max_block_size,
            num_channels,
        }
    }

    /// Derive a stream configuration from a negotiated bus layout.
    ///
    /// Fails with [`ConfigError::UnsupportedLayout`] when the layout is
    /// rejected by [`BusLayout::is_supported`].
    pub fn from_layout(
        layout: BusLayout,
        sample_rate: f32,
        max_block_size: usize,
    ) -> Result<Self, ConfigError> {
        if !layout.is_supported() {
            return Err(ConfigError::UnsupportedLayout(layout));
        }
        let config = Self::new(sample_rate, max_block_size, layout.output.count());
        config.validate()?;
        Ok(config)
    }

    /// Check that the stream can be processed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(ConfigError::InvalidSampleRate(self.sample_rate));
        }
        if self.max_block_size == 0 {
            return Err(ConfigError::InvalidBlockSize(self.max_block_size));
        }
        if self.num_channels == 0 || self.num_channels > MAX_CHANNELS {
            return Err(ConfigError::InvalidChannelCount {
                count: self.num_channels,
                max: MAX_CHANNELS,
            });
        }
        Ok(())
    }

    /// Nyquist frequency in Hz.
    pub fn nyquist(&self) -> f32 {
        self.sample_rate * 0.5
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::new(48000.0, 512, 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ChannelSet;

    #[test]
    fn default_is_valid() {
        assert!(StreamConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_sample_rates() {
        for sr in [0.0, -44100.0, f32::NAN, f32::INFINITY] {
            let err = StreamConfig::new(sr, 512, 2).validate().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidSampleRate(_)), "sr={sr}: {err}");
        }
    }

    #[test]
    fn rejects_zero_block_size() {
        let err = StreamConfig::new(48000.0, 0, 2).validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBlockSize(0)));
    }

    #[test]
    fn rejects_channel_counts_outside_mono_stereo() {
        for n in [0, 3, 6] {
            let err = StreamConfig::new(48000.0, 512, n).validate().unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidChannelCount { count, max: 2 } if count == n),
                "n={n}: {err}"
            );
        }
        assert!(StreamConfig::new(48000.0, 512, 1).validate().is_ok());
    }

    #[test]
    fn from_layout_takes_channel_count_from_output() {
        let mono = BusLayout::new(ChannelSet::Mono, ChannelSet::Mono);
        let config = StreamConfig::from_layout(mono, 96000.0, 128).unwrap();
        assert_eq!(config.num_channels, 1);
        assert_eq!(config.sample_rate, 96000.0);
        assert_eq!(config.max_block_size, 128);
    }

    #[test]
    fn from_layout_rejects_unsupported_layout() {
        let layout = BusLayout::new(ChannelSet::Mono, ChannelSet::Stereo);
        let err = StreamConfig::from_layout(layout, 48000.0, 512).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedLayout(l) if l == layout));
    }

    #[test]
    fn nyquist() {
        assert_eq!(StreamConfig::new(44100.0, 64, 1).nyquist(), 22050.0);
    }
}
