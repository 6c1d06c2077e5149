//! Control value to filter design mapping.
//!
//! Every stage of the processor is one biquad whose design is a pure
//! function of a single control value in 0.0 to 1.0. A value of exactly
//! zero selects the stage's bypass design. The functions here are pure and
//! run on the control thread; the audio thread only ever sees the resulting
//! [`BiquadCoefficients`].
//!
//! | Stage | Kind | Active design (`v > 0`) | Bypass (`v == 0`) |
//! |-------|------|-------------------------|-------------------|
//! | Low cut | high-pass | `80 + 200 v` Hz | 20 Hz |
//! | High cut | low-pass | `10000 - 5000 v` Hz | 20 kHz |
//! | Sub-bass | high-pass 80 Hz | Q `1 - 0.3 v²` | Q 1/√2 |
//! | Low-mid | peak 325 Hz, Q 1 | gain `1 + 0.5 v²` | all-pass 325 Hz |
//! | High roll-off | low-pass | 10 kHz, Q `1 - 0.15 v²` | 20 kHz, Q 1/√2 |
//!
//! The sub-bass and roll-off values shape the resonance at the corner, not
//! the level: well inside the passband both stages stay at unity.

use vinyl_core::{
    BiquadCoefficients, allpass_coefficients, highpass_coefficients, linear_to_db,
    lowpass_coefficients, peaking_eq_coefficients,
};

/// Maximally flat Q for second-order high-pass and low-pass stages.
pub const BUTTERWORTH_Q: f32 = core::f32::consts::FRAC_1_SQRT_2;

/// Highest design frequency as a fraction of the sample rate.
pub const NYQUIST_LIMIT: f32 = 0.475;

/// Lowest design frequency in Hz.
///
/// Below this the f32 cookbook formulas lose the pole radius to rounding.
pub const MIN_DESIGN_HZ: f32 = 10.0;

/// Lowest design Q.
///
/// Out-of-range tone values drive the shaped Q to zero or below, where the
/// cookbook poles leave the unit circle.
pub const MIN_DESIGN_Q: f32 = 0.1;

/// Low-cut cutoff when the control is at zero.
pub const LOW_CUT_BYPASS_HZ: f32 = 20.0;
/// High-cut and roll-off cutoff when the control is at zero.
pub const HIGH_CUT_BYPASS_HZ: f32 = 20_000.0;

const LOW_CUT_BASE_HZ: f32 = 80.0;
const LOW_CUT_RANGE_HZ: f32 = 200.0;
const HIGH_CUT_BASE_HZ: f32 = 10_000.0;
const HIGH_CUT_RANGE_HZ: f32 = 5000.0;

const SUB_BASS_HZ: f32 = 80.0;
const SUB_BASS_DEPTH: f32 = 0.3;
const LOW_MID_HZ: f32 = 325.0;
const LOW_MID_Q: f32 = 1.0;
const LOW_MID_DEPTH: f32 = 0.5;
const ROLL_OFF_HZ: f32 = 10_000.0;
const ROLL_OFF_DEPTH: f32 = 0.15;

/// Response type of a single biquad stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// Second-order high-pass.
    Highpass,
    /// Second-order low-pass.
    Lowpass,
    /// Peaking bell around a centre frequency.
    Peak,
    /// Flat-magnitude all-pass.
    Allpass,
}

/// Design parameters of one biquad stage.
///
/// `gain` is the linear gain at a peak's centre frequency. High-pass,
/// low-pass and all-pass stages are unity-gain and ignore it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterDesign {
    /// Response type.
    pub kind: FilterKind,
    /// Cutoff or centre frequency in Hz, before Nyquist clamping.
    pub cutoff_hz: f32,
    /// Quality factor.
    pub q: f32,
    /// Linear gain.
    pub gain: f32,
}

impl FilterDesign {
    /// Unity-gain high-pass.
    pub fn highpass(cutoff_hz: f32, q: f32) -> Self {
        Self {
            kind: FilterKind::Highpass,
            cutoff_hz,
            q,
            gain: 1.0,
        }
    }

    /// Unity-gain low-pass.
    pub fn lowpass(cutoff_hz: f32, q: f32) -> Self {
        Self {
            kind: FilterKind::Lowpass,
            cutoff_hz,
            q,
            gain: 1.0,
        }
    }

    /// Peaking bell with a linear centre gain.
    pub fn peak(cutoff_hz: f32, q: f32, gain: f32) -> Self {
        Self {
            kind: FilterKind::Peak,
            cutoff_hz,
            q,
            gain,
        }
    }

    /// Neutral all-pass at Butterworth Q.
    pub fn allpass(cutoff_hz: f32) -> Self {
        Self {
            kind: FilterKind::Allpass,
            cutoff_hz,
            q: BUTTERWORTH_Q,
            gain: 1.0,
        }
    }

    /// Normalized coefficients for this design at `sample_rate`.
    ///
    /// The design frequency is clamped into
    /// `[MIN_DESIGN_HZ, NYQUIST_LIMIT * sample_rate]` and Q is raised to at
    /// least [`MIN_DESIGN_Q`] first.
    pub fn coefficients(&self, sample_rate: f32) -> BiquadCoefficients {
        let freq = clamp_design_frequency(self.cutoff_hz, sample_rate);
        // `max` also maps a NaN Q to the floor.
        let q = self.q.max(MIN_DESIGN_Q);
        match self.kind {
            FilterKind::Highpass => {
                BiquadCoefficients::from_raw(highpass_coefficients(freq, q, sample_rate))
            }
            FilterKind::Lowpass => {
                BiquadCoefficients::from_raw(lowpass_coefficients(freq, q, sample_rate))
            }
            FilterKind::Peak => BiquadCoefficients::from_raw(peaking_eq_coefficients(
                freq,
                q,
                linear_to_db(self.gain),
                sample_rate,
            )),
            FilterKind::Allpass => {
                BiquadCoefficients::from_raw(allpass_coefficients(freq, q, sample_rate))
            }
        }
    }
}

fn clamp_design_frequency(freq: f32, sample_rate: f32) -> f32 {
    let max_freq = sample_rate * NYQUIST_LIMIT;
    if freq > max_freq {
        max_freq
    } else if freq < MIN_DESIGN_HZ {
        MIN_DESIGN_HZ
    } else {
        freq
    }
}

// NaN and infinities select the bypass design.
fn control(v: f32) -> f32 {
    if v.is_finite() { v } else { 0.0 }
}

/// Low-cut (high-pass) design for a control value.
pub fn low_cut_design(value: f32) -> FilterDesign {
    let v = control(value);
    let cutoff = if v == 0.0 {
        LOW_CUT_BYPASS_HZ
    } else {
        LOW_CUT_BASE_HZ + v * LOW_CUT_RANGE_HZ
    };
    FilterDesign::highpass(cutoff, BUTTERWORTH_Q)
}

/// High-cut (low-pass) design for a control value.
pub fn high_cut_design(value: f32) -> FilterDesign {
    let v = control(value);
    let cutoff = if v == 0.0 {
        HIGH_CUT_BYPASS_HZ
    } else {
        HIGH_CUT_BASE_HZ - v * HIGH_CUT_RANGE_HZ
    };
    FilterDesign::lowpass(cutoff, BUTTERWORTH_Q)
}

/// The three coupled stages driven by the first EQ control.
///
/// Always derived together from one value, and always published together,
/// so the audio thread never runs a half-updated tone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneShape {
    /// High-pass at 80 Hz whose Q shapes the sub-bass corner.
    pub sub_bass: FilterDesign,
    /// Peak at 325 Hz that adds low-mid warmth.
    pub low_mid: FilterDesign,
    /// Low-pass whose cutoff and Q soften the top end.
    pub high_freq: FilterDesign,
}

impl ToneShape {
    /// Derive all three stage designs from the first EQ control value.
    ///
    /// ```rust
    /// use vinyl_processor::{FilterKind, ToneShape};
    ///
    /// let flat = ToneShape::from_value(0.0);
    /// assert_eq!(flat.low_mid.kind, FilterKind::Allpass);
    /// assert_eq!(flat.high_freq.cutoff_hz, 20000.0);
    ///
    /// let warm = ToneShape::from_value(1.0);
    /// assert_eq!(warm.low_mid.kind, FilterKind::Peak);
    /// assert_eq!(warm.low_mid.gain, 1.5);
    /// ```
    pub fn from_value(value: f32) -> Self {
        let v = control(value);
        if v == 0.0 {
            return Self {
                sub_bass: FilterDesign::highpass(SUB_BASS_HZ, BUTTERWORTH_Q),
                low_mid: FilterDesign::allpass(LOW_MID_HZ),
                high_freq: FilterDesign::lowpass(HIGH_CUT_BYPASS_HZ, BUTTERWORTH_Q),
            };
        }

        let v2 = v * v;
        Self {
            sub_bass: FilterDesign::highpass(SUB_BASS_HZ, 1.0 - v2 * SUB_BASS_DEPTH),
            low_mid: FilterDesign::peak(LOW_MID_HZ, LOW_MID_Q, 1.0 + v2 * LOW_MID_DEPTH),
            high_freq: FilterDesign::lowpass(ROLL_OFF_HZ, 1.0 - v2 * ROLL_OFF_DEPTH),
        }
    }

    /// Coefficients for all three stages at `sample_rate`.
    pub fn coefficients(&self, sample_rate: f32) -> ToneCoefficients {
        ToneCoefficients {
            sub_bass: self.sub_bass.coefficients(sample_rate),
            low_mid: self.low_mid.coefficients(sample_rate),
            high_freq: self.high_freq.coefficients(sample_rate),
        }
    }
}

/// Coefficient sets for the three tone stages, in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ToneCoefficients {
    /// Sub-bass cut.
    pub sub_bass: BiquadCoefficients,
    /// Low-mid boost.
    pub low_mid: BiquadCoefficients,
    /// High-frequency roll-off.
    pub high_freq: BiquadCoefficients,
}
