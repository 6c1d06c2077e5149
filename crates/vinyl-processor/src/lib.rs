//! Vinyl tone processor.
//!
//! A chain of five biquad stages driven by three tone controls, plus a
//! volume, applied in place to blocks of audio:
//!
//! 1. volume
//! 2. low cut (high-pass, 80 to 280 Hz)
//! 3. high cut (low-pass, 10 kHz down to 5 kHz)
//! 4. first EQ: sub-bass cut, low-mid boost, high roll-off
//!
//! A stage whose control is at zero is skipped entirely.
//!
//! # Threads
//!
//! [`VinylProcessor`] belongs to the audio thread. [`VinylControls`] can be
//! cloned to any number of other threads; its setters derive new
//! coefficients and publish them through [`arc_swap`] cells that the audio
//! thread reads without locking.
//!
//! ```rust
//! use std::thread;
//! use vinyl_processor::VinylProcessor;
//!
//! let mut processor = VinylProcessor::new();
//! processor.prepare(48000.0, 128, 1).unwrap();
//!
//! let controls = processor.controls();
//! let ui = thread::spawn(move || {
//!     controls.set_low_cut_value(0.5);
//! });
//!
//! let mut block = [0.25f32; 128];
//! processor.process(&mut [&mut block[..]], 1).unwrap();
//! ui.join().unwrap();
//! ```

mod bank;
mod error;
mod host;
mod mapping;
mod params;
mod processor;

pub use bank::{CoefficientBank, FilterBank};
pub use error::{ProcessorError, Result};
pub use host::{FIRST_EQ, HIGH_CUT, LOW_CUT, VOLUME};
pub use mapping::{
    BUTTERWORTH_Q, FilterDesign, FilterKind, HIGH_CUT_BYPASS_HZ, LOW_CUT_BYPASS_HZ,
    MIN_DESIGN_HZ, MIN_DESIGN_Q, NYQUIST_LIMIT, ToneCoefficients, ToneShape, high_cut_design,
    low_cut_design,
};
pub use params::{ParamValues, ParameterStore};
pub use processor::{VinylControls, VinylProcessor};

pub use vinyl_config::{BusLayout, ChannelSet, ProcessorSettings, StreamConfig, VinylConfig};
