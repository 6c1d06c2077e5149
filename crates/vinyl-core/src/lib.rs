//! Vinyl Core - DSP primitives for the vinyl tone processor
//!
//! This crate provides the building blocks the processor is assembled from,
//! designed for real-time audio processing with zero allocation in the audio
//! path.
//!
//! # Filters
//!
//! - [`Biquad`] - Second-order IIR filter (Direct Form I)
//! - [`BiquadCoefficients`] - Normalized coefficient set, cheap to publish
//!   across threads
//! - RBJ cookbook designs: [`lowpass_coefficients`], [`highpass_coefficients`],
//!   [`peaking_eq_coefficients`], [`allpass_coefficients`]
//!
//! # Parameters
//!
//! - [`AtomicParam`] - Lock-free `f32` cell (control thread writes, audio
//!   thread reads)
//! - [`ParameterInfo`] / [`ParamDescriptor`] - Host-facing parameter
//!   introspection
//!
//! # Utilities
//!
//! - Math functions: [`db_to_linear`], [`linear_to_db`], [`flush_denormal`],
//!   [`apply_gain`]
//!
//! # no_std Support
//!
//! Disable the default `std` feature for embedded targets:
//!
//! ```toml
//! [dependencies]
//! vinyl-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod biquad;
pub mod math;
pub mod param;
pub mod param_info;

pub use biquad::{
    Biquad, BiquadCoefficients, allpass_coefficients, highpass_coefficients,
    lowpass_coefficients, peaking_eq_coefficients,
};
pub use math::{apply_gain, db_to_linear, flush_denormal, linear_to_db};
pub use param::AtomicParam;
pub use param_info::{ParamDescriptor, ParamFlags, ParamId, ParamUnit, ParameterInfo};
