//! Channel layout negotiation.
//!
//! The processor is a mono or stereo insert effect: the output bus must be
//! mono or stereo and the input bus must match it. Hosts ask before
//! configuring a stream; a rejected layout is a plain `false`, never an
//! error raised during processing.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Largest channel count the processor accepts.
pub const MAX_CHANNELS: usize = 2;

/// Set of channels on one bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelSet {
    /// Bus is not connected.
    Disabled,
    /// One channel.
    Mono,
    /// Left and right.
    Stereo,
    /// Any other channel count.
    Discrete(usize),
}

impl ChannelSet {
    /// Channel set for a plain channel count.
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => Self::Disabled,
            1 => Self::Mono,
            2 => Self::Stereo,
            n => Self::Discrete(n),
        }
    }

    /// Number of channels in this set.
    pub fn count(self) -> usize {
        match self {
            Self::Disabled => 0,
            Self::Mono => 1,
            Self::Stereo => 2,
            Self::Discrete(n) => n,
        }
    }
}

impl fmt::Display for ChannelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "disabled"),
            Self::Mono => write!(f, "mono"),
            Self::Stereo => write!(f, "stereo"),
            Self::Discrete(n) => write!(f, "{n} channels"),
        }
    }
}

/// Main input and output bus of one processor instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BusLayout {
    /// Main input bus.
    pub input: ChannelSet,
    /// Main output bus.
    pub output: ChannelSet,
}

impl BusLayout {
    /// Create a layout from an input and output channel set.
    pub fn new(input: ChannelSet, output: ChannelSet) -> Self {
        Self { input, output }
    }

    /// Stereo in, stereo out: the layout the processor is built around.
    pub fn stereo() -> Self {
        Self::new(ChannelSet::Stereo, ChannelSet::Stereo)
    }

    /// Whether the processor can run with this layout.
    ///
    /// Output must be mono or stereo, and input must equal output.
    ///
    /// ```rust
    /// use vinyl_config::{BusLayout, ChannelSet};
    ///
    /// assert!(BusLayout::stereo().is_supported());
    /// assert!(!BusLayout::new(ChannelSet::Mono, ChannelSet::Stereo).is_supported());
    /// ```
    pub fn is_supported(&self) -> bool {
        matches!(self.output, ChannelSet::Mono | ChannelSet::Stereo) && self.input == self.output
    }
}

impl Default for BusLayout {
    fn default() -> Self {
        Self::stereo()
    }
}

impl fmt::Display for BusLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in, {} out", self.input, self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mono_and_stereo_matching_layouts_are_supported() {
        assert!(BusLayout::new(ChannelSet::Mono, ChannelSet::Mono).is_supported());
        assert!(BusLayout::new(ChannelSet::Stereo, ChannelSet::Stereo).is_supported());
    }

    #[test]
    fn mismatched_layouts_are_rejected() {
        assert!(!BusLayout::new(ChannelSet::Mono, ChannelSet::Stereo).is_supported());
        assert!(!BusLayout::new(ChannelSet::Stereo, ChannelSet::Mono).is_supported());
        assert!(!BusLayout::new(ChannelSet::Disabled, ChannelSet::Stereo).is_supported());
    }

    #[test]
    fn surround_and_disabled_outputs_are_rejected() {
        let surround = ChannelSet::Discrete(6);
        assert!(!BusLayout::new(surround, surround).is_supported());
        assert!(!BusLayout::new(ChannelSet::Disabled, ChannelSet::Disabled).is_supported());
    }

    #[test]
    fn from_count_roundtrips() {
        for n in 0..8 {
            assert_eq!(ChannelSet::from_count(n).count(), n);
        }
        assert_eq!(ChannelSet::from_count(2), ChannelSet::Stereo);
    }

    #[test]
    fn display() {
        assert_eq!(BusLayout::stereo().to_string(), "stereo in, stereo out");
        assert_eq!(ChannelSet::Discrete(6).to_string(), "6 channels");
    }
}
