//! Biquad (bi-quadratic) filter structure.
//!
//! Provides a second-order IIR filter plus the coefficient designs the
//! tone stages need (low-pass, high-pass, peaking, all-pass).
//!
//! Coefficient calculation uses the RBJ Audio EQ Cookbook formulas. The
//! design functions return raw `(b0, b1, b2, a0, a1, a2)` tuples;
//! [`BiquadCoefficients::from_raw`] normalizes them by `a0` into the form the
//! filter consumes.

use core::f32::consts::PI;
use libm::{cosf, sinf};

use crate::math::flush_denormal;

/// Normalized biquad coefficients (`a0 == 1`).
///
/// A plain `Copy` value so a whole set can be published from one thread and
/// copied into a running [`Biquad`] on another without touching its history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    /// Feedforward coefficient for x[n].
    pub b0: f32,
    /// Feedforward coefficient for x[n-1].
    pub b1: f32,
    /// Feedforward coefficient for x[n-2].
    pub b2: f32,
    /// Feedback coefficient for y[n-1].
    pub a1: f32,
    /// Feedback coefficient for y[n-2].
    pub a2: f32,
}

impl BiquadCoefficients {
    /// Passthrough coefficients: `y[n] = x[n]`.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Builds a normalized set from a raw `(b0, b1, b2, a0, a1, a2)` tuple.
    ///
    /// # Example
    ///
    /// ```rust
    /// use vinyl_core::{BiquadCoefficients, lowpass_coefficients};
    ///
    /// let coeffs = BiquadCoefficients::from_raw(lowpass_coefficients(1000.0, 0.707, 48000.0));
    /// assert!(coeffs.b0 > 0.0);
    /// ```
    pub fn from_raw(raw: (f32, f32, f32, f32, f32, f32)) -> Self {
        let (b0, b1, b2, a0, a1, a2) = raw;
        let a0_inv = 1.0 / a0;
        Self {
            b0: b0 * a0_inv,
            b1: b1 * a0_inv,
            b2: b2 * a0_inv,
            a1: a1 * a0_inv,
            a2: a2 * a0_inv,
        }
    }
}

impl Default for BiquadCoefficients {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Generic biquad filter coefficients and state.
///
/// Implements the Direct Form I biquad structure:
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
///
/// Coefficients can be replaced at any time; the delay lines are only
/// cleared by [`clear`](Self::clear).
#[derive(Debug, Clone)]
pub struct Biquad {
    coeffs: BiquadCoefficients,

    /// Input delay line: x[n-1], x[n-2]
    x1: f32,
    x2: f32,

    /// Output delay line: y[n-1], y[n-2]
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Creates a new biquad with passthrough coefficients.
    ///
    /// Initial state: `y[n] = x[n]` (no filtering)
    pub fn new() -> Self {
        Self {
            coeffs: BiquadCoefficients::IDENTITY,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Sets the biquad coefficients.
    ///
    /// # Arguments
    ///
    /// * `b0, b1, b2` - Feedforward coefficients
    /// * `a0, a1, a2` - Feedback coefficients (a0 is typically 1.0)
    ///
    /// Note: This function normalizes by a0 internally.
    pub fn set_coefficients(&mut self, b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) {
        self.coeffs = BiquadCoefficients::from_raw((b0, b1, b2, a0, a1, a2));
    }

    /// Replaces the coefficients with an already-normalized set.
    ///
    /// Filter history is kept, so swapping coefficients mid-stream does not
    /// restart the filter.
    #[inline]
    pub fn set_normalized(&mut self, coeffs: BiquadCoefficients) {
        self.coeffs = coeffs;
    }

    /// Returns the current normalized coefficients.
    pub fn coefficients(&self) -> BiquadCoefficients {
        self.coeffs
    }

    /// Processes a single sample through the biquad filter.
    ///
    /// Uses Direct Form I structure for numerical stability.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let c = &self.coeffs;
        let output = c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2
                                  - c.a1 * self.y1 - c.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        // Decaying tails must not sink into the subnormal range.
        self.y1 = flush_denormal(output);

        output
    }

    /// Processes a block of samples in place.
    #[inline]
    pub fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Clears the filter state (delay lines).
    ///
    /// Useful for resetting the filter without changing coefficients.
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

/// Calculates low-pass filter coefficients using the RBJ cookbook formula.
///
/// # Arguments
///
/// * `frequency` - Cutoff frequency in Hz
/// * `q` - Q factor (typically 0.707 for Butterworth response)
/// * `sample_rate` - Sample rate in Hz
///
/// # Returns
///
/// (b0, b1, b2, a0, a1, a2) coefficients
pub fn lowpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> (f32, f32, f32, f32, f32, f32) {
    let omega = 2.0 * PI * frequency / sample_rate;
    let cos_omega = cosf(omega);
    let sin_omega = sinf(omega);
    let alpha = sin_omega / (2.0 * q);

    let b0 = (1.0 - cos_omega) / 2.0;
    let b1 = 1.0 - cos_omega;
    let b2 = (1.0 - cos_omega) / 2.0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha;

    (b0, b1, b2, a0, a1, a2)
}

/// Calculates high-pass filter coefficients using the RBJ cookbook formula.
///
/// # Arguments
///
/// * `frequency` - Cutoff frequency in Hz
/// * `q` - Q factor (typically 0.707 for Butterworth response)
/// * `sample_rate` - Sample rate in Hz
///
/// # Returns
///
/// (b0, b1, b2, a0, a1, a2) coefficients
pub fn highpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> (f32, f32, f32, f32, f32, f32) {
    let omega = 2.0 * PI * frequency / sample_rate;
    let cos_omega = cosf(omega);
    let sin_omega = sinf(omega);
    let alpha = sin_omega / (2.0 * q);

    let b0 = (1.0 + cos_omega) / 2.0;
    let b1 = -(1.0 + cos_omega);
    let b2 = (1.0 + cos_omega) / 2.0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha;

    (b0, b1, b2, a0, a1, a2)
}

/// Calculates all-pass filter coefficients using the RBJ cookbook formula.
///
/// Flat magnitude response at every frequency; only the phase turns around
/// `frequency`. Used as the neutral setting of a stage that must stay in
/// the chain without colouring the signal.
///
/// # Arguments
///
/// * `frequency` - Centre of the phase transition in Hz
/// * `q` - Q factor (steepness of the phase transition)
/// * `sample_rate` - Sample rate in Hz
///
/// # Returns
///
/// (b0, b1, b2, a0, a1, a2) coefficients
pub fn allpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> (f32, f32, f32, f32, f32, f32) {
    let omega = 2.0 * PI * frequency / sample_rate;
    let cos_omega = cosf(omega);
    let sin_omega = sinf(omega);
    let alpha = sin_omega / (2.0 * q);

    let b0 = 1.0 - alpha;
    let b1 = -2.0 * cos_omega;
    let b2 = 1.0 + alpha;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha;

    (b0, b1, b2, a0, a1, a2)
}

/// Calculates peaking EQ filter coefficients using the RBJ cookbook formula.
///
/// A peaking EQ boosts or cuts around a center frequency with a specified bandwidth.
///
/// # Arguments
///
/// * `frequency` - Center frequency in Hz
/// * `q` - Q factor (bandwidth = frequency / Q)
/// * `gain_db` - Gain in decibels (positive = boost, negative = cut)
/// * `sample_rate` - Sample rate in Hz
///
/// # Returns
///
/// (b0, b1, b2, a0, a1, a2) coefficients
pub fn peaking_eq_coefficients(frequency: f32, q: f32, gain_db: f32, sample_rate: f32) -> (f32, f32, f32, f32, f32, f32) {
    use libm::powf;

    let a = powf(10.0, gain_db / 40.0); // sqrt(10^(dB/20))
    let omega = 2.0 * PI * frequency / sample_rate;
    let cos_omega = cosf(omega);
    let sin_omega = sinf(omega);
    let alpha = sin_omega / (2.0 * q);

    let b0 = 1.0 + alpha * a;
    let b1 = -2.0 * cos_omega;
    let b2 = 1.0 - alpha * a;
    let a0 = 1.0 + alpha / a;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha / a;

    (b0, b1, b2, a0, a1, a2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle_dc(biquad: &mut Biquad) -> f32 {
        let mut output = 0.0;
        for _ in 0..4000 {
            output = biquad.process(1.0);
        }
        output
    }

    #[test]
    fn test_biquad_passthrough() {
        let mut biquad = Biquad::new();

        for i in 0..10 {
            let input = i as f32 * 0.1;
            let output = biquad.process(input);
            assert!((output - input).abs() < 0.0001);
        }
    }

    #[test]
    fn test_biquad_clear() {
        let mut biquad = Biquad::new();
        biquad.set_normalized(BiquadCoefficients::from_raw(lowpass_coefficients(
            500.0, 0.707, 48000.0,
        )));

        for _ in 0..10 {
            biquad.process(1.0);
        }

        biquad.clear();

        assert_eq!(biquad.x1, 0.0);
        assert_eq!(biquad.x2, 0.0);
        assert_eq!(biquad.y1, 0.0);
        assert_eq!(biquad.y2, 0.0);
    }

    #[test]
    fn test_set_normalized_keeps_history() {
        let mut biquad = Biquad::new();
        biquad.process(0.5);
        biquad.process(0.25);

        biquad.set_normalized(BiquadCoefficients::from_raw(highpass_coefficients(
            100.0, 0.707, 48000.0,
        )));

        assert_eq!(biquad.x1, 0.25);
        assert_eq!(biquad.x2, 0.5);
    }

    #[test]
    fn test_from_raw_normalizes() {
        let coeffs = BiquadCoefficients::from_raw((2.0, 4.0, 6.0, 2.0, 1.0, 0.5));
        assert_eq!(coeffs.b0, 1.0);
        assert_eq!(coeffs.b1, 2.0);
        assert_eq!(coeffs.b2, 3.0);
        assert_eq!(coeffs.a1, 0.5);
        assert_eq!(coeffs.a2, 0.25);
    }

    #[test]
    fn test_biquad_lowpass_dc_pass() {
        let mut biquad = Biquad::new();
        let (b0, b1, b2, a0, a1, a2) = lowpass_coefficients(1000.0, 0.707, 44100.0);
        biquad.set_coefficients(b0, b1, b2, a0, a1, a2);

        let output = settle_dc(&mut biquad);
        assert!((output - 1.0).abs() < 0.05);
    }

    #[test]
    fn test_biquad_highpass_blocks_dc() {
        let mut biquad = Biquad::new();
        biquad.set_normalized(BiquadCoefficients::from_raw(highpass_coefficients(
            80.0, 0.707, 48000.0,
        )));

        let output = settle_dc(&mut biquad);
        assert!(output.abs() < 0.01, "DC should be blocked, got {output}");
    }

    #[test]
    fn test_allpass_dc_unity() {
        let mut biquad = Biquad::new();
        biquad.set_normalized(BiquadCoefficients::from_raw(allpass_coefficients(
            325.0, 0.707, 48000.0,
        )));

        let output = settle_dc(&mut biquad);
        assert!((output - 1.0).abs() < 0.01, "all-pass DC gain should be 1, got {output}");
    }

    #[test]
    fn test_allpass_coefficients_mirror() {
        // All-pass numerator is the reversed denominator.
        let (b0, b1, b2, a0, a1, a2) = allpass_coefficients(325.0, 0.707, 48000.0);
        assert_eq!(b0, a2);
        assert_eq!(b1, a1);
        assert_eq!(b2, a0);
    }

    #[test]
    fn test_peaking_eq_coefficients() {
        let (b0, b1, b2, a0, a1, a2) = peaking_eq_coefficients(1000.0, 1.0, 6.0, 44100.0);
        for c in [b0, b1, b2, a0, a1, a2] {
            assert!(c.is_finite());
        }

        let (b0, b1, b2, a0, a1, a2) = peaking_eq_coefficients(1000.0, 1.0, -6.0, 44100.0);
        for c in [b0, b1, b2, a0, a1, a2] {
            assert!(c.is_finite());
        }
    }

    #[test]
    fn test_peaking_eq_unity_at_zero_gain() {
        let mut biquad = Biquad::new();
        let (b0, b1, b2, a0, a1, a2) = peaking_eq_coefficients(1000.0, 1.0, 0.0, 44100.0);
        biquad.set_coefficients(b0, b1, b2, a0, a1, a2);

        let output = settle_dc(&mut biquad);
        assert!((output - 1.0).abs() < 0.05, "DC should pass at 0dB gain, got {}", output);
    }

    #[test]
    fn test_denormal_tail_flushed() {
        let mut biquad = Biquad::new();
        biquad.set_normalized(BiquadCoefficients::from_raw(lowpass_coefficients(
            100.0, 0.707, 48000.0,
        )));
        biquad.process(1.0);
        for _ in 0..200_000 {
            biquad.process(0.0);
        }
        assert_eq!(biquad.y1, 0.0);
        assert_eq!(biquad.y2, 0.0);
    }
}
