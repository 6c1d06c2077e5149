//! Filter bank: published coefficients and the per-channel filters that
//! consume them.
//!
//! The control thread derives coefficients and publishes them into a
//! [`CoefficientBank`]. The audio thread owns a [`FilterBank`], loads the
//! published sets once per block and copies them into its biquads. Biquad
//! history is never touched by a coefficient swap, only by
//! [`FilterBank::reset`].

use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use vinyl_core::{Biquad, BiquadCoefficients};

use crate::mapping::ToneCoefficients;
use crate::params::ParamValues;

/// One published value plus the set it replaced.
///
/// A reader that loaded the old set while it was being swapped out may end
/// up holding the last reference to it. Keeping the replaced set alive until
/// the next publish means the control thread, not the audio thread, frees it.
#[derive(Debug)]
struct Published<T> {
    current: ArcSwap<T>,
    retired: Mutex<Arc<T>>,
}

impl<T: Copy> Published<T> {
    fn new(value: T) -> Self {
        Self {
            current: ArcSwap::from_pointee(value),
            retired: Mutex::new(Arc::new(value)),
        }
    }

    fn publish(&self, value: T) {
        let previous = self.current.swap(Arc::new(value));
        // The set retired one publish ago is dropped here.
        drop(std::mem::replace(&mut *self.retired.lock(), previous));
    }

    #[inline]
    fn load(&self) -> T {
        **self.current.load()
    }
}

/// Latest coefficient sets, published for wait-free reads.
///
/// One cell per independently updated unit: the low cut, the high cut, and
/// the three tone stages as a whole. Readers never lock and never free a
/// set; retired sets are released by the next publish.
#[derive(Debug)]
pub struct CoefficientBank {
    low_cut: Published<BiquadCoefficients>,
    high_cut: Published<BiquadCoefficients>,
    tone: Published<ToneCoefficients>,
}

impl CoefficientBank {
    /// Create a bank holding passthrough coefficients.
    pub fn new() -> Self {
        Self {
            low_cut: Published::new(BiquadCoefficients::IDENTITY),
            high_cut: Published::new(BiquadCoefficients::IDENTITY),
            tone: Published::new(ToneCoefficients::default()),
        }
    }

    /// Replace the low-cut coefficients.
    pub fn publish_low_cut(&self, coeffs: BiquadCoefficients) {
        self.low_cut.publish(coeffs);
    }

    /// Replace the high-cut coefficients.
    pub fn publish_high_cut(&self, coeffs: BiquadCoefficients) {
        self.high_cut.publish(coeffs);
    }

    /// Replace all three tone stages in one swap.
    pub fn publish_tone(&self, coeffs: ToneCoefficients) {
        self.tone.publish(coeffs);
    }

    /// Current low-cut coefficients.
    pub fn low_cut(&self) -> BiquadCoefficients {
        self.low_cut.load()
    }

    /// Current high-cut coefficients.
    pub fn high_cut(&self) -> BiquadCoefficients {
        self.high_cut.load()
    }

    /// Current tone coefficients.
    pub fn tone(&self) -> ToneCoefficients {
        self.tone.load()
    }
}

impl Default for CoefficientBank {
    fn default() -> Self {
        Self::new()
    }
}

/// One biquad stage, with a filter per channel.
#[derive(Debug, Clone)]
struct FilterSlot {
    filters: Vec<Biquad>,
}

impl FilterSlot {
    fn new(num_channels: usize) -> Self {
        Self {
            filters: vec![Biquad::new(); num_channels],
        }
    }

    fn set_coefficients(&mut self, coeffs: BiquadCoefficients) {
        for filter in &mut self.filters {
            filter.set_normalized(coeffs);
        }
    }

    #[inline]
    fn process_block(&mut self, channel: usize, buffer: &mut [f32]) {
        self.filters[channel].process_block_inplace(buffer);
    }

    #[inline]
    fn process(&mut self, channel: usize, sample: f32) -> f32 {
        self.filters[channel].process(sample)
    }

    fn clear(&mut self) {
        for filter in &mut self.filters {
            filter.clear();
        }
    }
}

/// Audio-side filters for all five stages.
///
/// Sized for a fixed channel count at prepare time; processing never
/// allocates.
#[derive(Debug, Clone)]
pub struct FilterBank {
    low_cut: FilterSlot,
    high_cut: FilterSlot,
    sub_bass: FilterSlot,
    low_mid: FilterSlot,
    high_freq: FilterSlot,
}

impl FilterBank {
    /// Allocate filters for `num_channels` channels, with cleared history.
    pub fn new(num_channels: usize) -> Self {
        Self {
            low_cut: FilterSlot::new(num_channels),
            high_cut: FilterSlot::new(num_channels),
            sub_bass: FilterSlot::new(num_channels),
            low_mid: FilterSlot::new(num_channels),
            high_freq: FilterSlot::new(num_channels),
        }
    }

    /// Number of channels the bank was built for.
    pub fn num_channels(&self) -> usize {
        self.low_cut.filters.len()
    }

    /// Copy the latest published coefficients into the filters.
    pub fn sync(&mut self, bank: &CoefficientBank) {
        self.low_cut.set_coefficients(bank.low_cut());
        self.high_cut.set_coefficients(bank.high_cut());

        let tone = bank.tone();
        self.sub_bass.set_coefficients(tone.sub_bass);
        self.low_mid.set_coefficients(tone.low_mid);
        self.high_freq.set_coefficients(tone.high_freq);
    }

    /// Run the active stages over one channel's block, in place.
    ///
    /// Order: low cut, high cut, then sub-bass, low-mid and high roll-off.
    pub fn process_channel(&mut self, channel: usize, buffer: &mut [f32], values: &ParamValues) {
        if values.low_cut_active() {
            self.low_cut.process_block(channel, buffer);
        }
        if values.high_cut_active() {
            self.high_cut.process_block(channel, buffer);
        }
        if values.tone_active() {
            self.sub_bass.process_block(channel, buffer);
            self.low_mid.process_block(channel, buffer);
            self.high_freq.process_block(channel, buffer);
        }
    }

    /// Run the active stages over a single sample, in the same order as
    /// [`process_channel`](Self::process_channel).
    #[inline]
    pub fn process_sample(&mut self, channel: usize, sample: f32, values: &ParamValues) -> f32 {
        let mut x = sample;
        if values.low_cut_active() {
            x = self.low_cut.process(channel, x);
        }
        if values.high_cut_active() {
            x = self.high_cut.process(channel, x);
        }
        if values.tone_active() {
            x = self.sub_bass.process(channel, x);
            x = self.low_mid.process(channel, x);
            x = self.high_freq.process(channel, x);
        }
        x
    }

    /// Clear every filter's history. Coefficients are kept.
    pub fn reset(&mut self) {
        self.low_cut.clear();
        self.high_cut.clear();
        self.sub_bass.clear();
        self.low_mid.clear();
        self.high_freq.clear();
    }
}
