//! Configuration for the vinyl tone processor.
//!
//! Everything a host decides before audio starts flowing lives here: the
//! stream shape the processor is prepared for, the channel layout it is
//! offered, and the parameter values it starts from.
//!
//! # Example
//!
//! ```rust
//! use vinyl_config::VinylConfig;
//!
//! let config = VinylConfig::from_toml_str(r#"
//!     [stream]
//!     sample_rate = 44100.0
//!     max_block_size = 256
//!     num_channels = 2
//!
//!     [settings]
//!     volume = 0.8
//!     high_cut = 0.25
//! "#).unwrap();
//!
//! assert_eq!(config.stream.sample_rate, 44100.0);
//! assert_eq!(config.settings.high_cut, 0.25);
//! assert_eq!(config.settings.low_cut, 0.0);
//! ```

mod error;
mod layout;
mod settings;
mod stream;

pub use error::ConfigError;
pub use layout::{BusLayout, ChannelSet, MAX_CHANNELS};
pub use settings::{ProcessorSettings, VinylConfig};
pub use stream::StreamConfig;
