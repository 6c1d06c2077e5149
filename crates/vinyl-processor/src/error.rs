//! Errors raised by the processor entry points.

use thiserror::Error;
use vinyl_config::ConfigError;

/// Error type for prepare and process calls.
///
/// Parameter setters never fail: out-of-range values are mapped like any
/// other.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// `process` was called before `prepare`, or after `release`.
    #[error("processor is not prepared; call prepare() before processing")]
    NotPrepared,

    /// The block is longer than the prepared maximum.
    #[error("block of {len} frames exceeds prepared maximum of {max}")]
    BlockTooLarge {
        /// Frames in the offending block.
        len: usize,
        /// Prepared maximum block size.
        max: usize,
    },

    /// More input channels than the processor was prepared for.
    #[error("{got} input channels, prepared for {prepared}")]
    TooManyChannels {
        /// Input channels supplied.
        got: usize,
        /// Channels allocated at prepare time.
        prepared: usize,
    },

    /// Planar channels of different lengths in one block.
    #[error("channel {channel} has {len} frames, expected {expected}")]
    ChannelLengthMismatch {
        /// Index of the first mismatched channel.
        channel: usize,
        /// Its length.
        len: usize,
        /// Length of channel 0.
        expected: usize,
    },

    /// Interleaved buffer length is not a whole number of frames.
    #[error("interleaved buffer of {len} samples is not a multiple of {num_channels} channels")]
    PartialFrame {
        /// Samples in the buffer.
        len: usize,
        /// Declared channel count.
        num_channels: usize,
    },

    /// Stream configuration rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Convenience result type for processor operations.
pub type Result<T> = std::result::Result<T, ProcessorError>;
