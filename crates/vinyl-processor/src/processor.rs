//! The vinyl tone processor: control handle and audio-side pipeline.
//!
//! [`VinylProcessor`] owns the stream state (filters, block limits) and is
//! driven by the audio thread. [`VinylControls`] is a cheap clone handle for
//! any other thread. Both point at the same shared state:
//!
//! ```text
//! control thread                      audio thread
//! ──────────────                      ────────────
//! set_low_cut_value(v)
//!   └─ ParameterStore.store(v)
//!   └─ low_cut_design(v) → coeffs
//!   └─ CoefficientBank.publish ──▶    process(block)
//!                                       └─ snapshot params
//!                                       └─ load coeffs → FilterBank
//!                                       └─ volume, stages in order
//! ```
//!
//! The audio thread never takes a lock. Setters serialize among themselves
//! so that the last publish always reflects the latest stored value and
//! sample rate.

use std::sync::Arc;

use parking_lot::Mutex;
use vinyl_config::{BusLayout, ProcessorSettings, StreamConfig, VinylConfig};
use vinyl_core::{AtomicParam, BiquadCoefficients, apply_gain};

use crate::bank::{CoefficientBank, FilterBank};
use crate::error::{ProcessorError, Result};
use crate::mapping::{ToneCoefficients, ToneShape, high_cut_design, low_cut_design};
use crate::params::{ParamValues, ParameterStore};

/// State shared by the processor and every control handle.
#[derive(Debug)]
struct Shared {
    params: ParameterStore,
    coefficients: CoefficientBank,
    /// Zero until the first prepare.
    sample_rate: AtomicParam,
    /// Serializes derive-and-publish on the control side.
    publish: Mutex<()>,
}

impl Shared {
    fn new(settings: &ProcessorSettings) -> Self {
        Self {
            params: ParameterStore::new(settings),
            coefficients: CoefficientBank::new(),
            sample_rate: AtomicParam::new(0.0),
            publish: Mutex::new(()),
        }
    }

    fn sample_rate(&self) -> Option<f32> {
        let sr = self.sample_rate.load();
        (sr > 0.0).then_some(sr)
    }

    fn set_volume(&self, volume: f32) {
        self.params.volume.store(volume);
    }

    fn set_first_eq(&self, value: f32) {
        self.params.first_eq.store(value);
        self.update_tone();
    }

    fn set_low_cut(&self, value: f32) {
        self.params.low_cut.store(value);
        self.update_low_cut();
    }

    fn set_high_cut(&self, value: f32) {
        self.params.high_cut.store(value);
        self.update_high_cut();
    }

    fn update_low_cut(&self) {
        let _guard = self.publish.lock();
        match self.sample_rate() {
            Some(sr) => self.publish_low_cut(sr),
            None => tracing::debug!(
                value = self.params.low_cut_value(),
                "low cut stored, coefficients deferred until prepare"
            ),
        }
    }

    fn update_high_cut(&self) {
        let _guard = self.publish.lock();
        match self.sample_rate() {
            Some(sr) => self.publish_high_cut(sr),
            None => tracing::debug!(
                value = self.params.high_cut_value(),
                "high cut stored, coefficients deferred until prepare"
            ),
        }
    }

    fn update_tone(&self) {
        let _guard = self.publish.lock();
        match self.sample_rate() {
            Some(sr) => self.publish_tone(sr),
            None => tracing::debug!(
                value = self.params.first_eq_value(),
                "first EQ stored, coefficients deferred until prepare"
            ),
        }
    }

    /// Adopt a new sample rate and re-derive every stage from the stored
    /// values.
    fn rederive_all(&self, sample_rate: f32) {
        let _guard = self.publish.lock();
        self.sample_rate.store(sample_rate);
        self.publish_low_cut(sample_rate);
        self.publish_high_cut(sample_rate);
        self.publish_tone(sample_rate);
    }

    fn update_all(&self) {
        if let Some(sr) = self.sample_rate() {
            self.rederive_all(sr);
        }
    }

    // The publish_* helpers expect the publish lock to be held.

    fn publish_low_cut(&self, sample_rate: f32) {
        let design = low_cut_design(self.params.low_cut_value());
        self.coefficients
            .publish_low_cut(design.coefficients(sample_rate));
        tracing::debug!(cutoff_hz = design.cutoff_hz, sample_rate, "low cut published");
    }

    fn publish_high_cut(&self, sample_rate: f32) {
        let design = high_cut_design(self.params.high_cut_value());
        self.coefficients
            .publish_high_cut(design.coefficients(sample_rate));
        tracing::debug!(cutoff_hz = design.cutoff_hz, sample_rate, "high cut published");
    }

    fn publish_tone(&self, sample_rate: f32) {
        let shape = ToneShape::from_value(self.params.first_eq_value());
        self.coefficients.publish_tone(shape.coefficients(sample_rate));
        tracing::debug!(
            sub_bass_q = shape.sub_bass.q,
            low_mid_gain = shape.low_mid.gain,
            roll_off_hz = shape.high_freq.cutoff_hz,
            roll_off_q = shape.high_freq.q,
            sample_rate,
            "tone published"
        );
    }
}

/// Thread-safe control handle.
///
/// Clone it into a UI, automation, or test thread. Setters store the value
/// as given (no clamping) and, when a sample rate is known, derive and
/// publish the affected coefficients before returning. Before the first
/// prepare, values are stored and derivation waits for prepare.
#[derive(Debug, Clone)]
pub struct VinylControls {
    shared: Arc<Shared>,
}

impl VinylControls {
    /// Set the linear output gain.
    pub fn set_volume(&self, volume: f32) {
        self.shared.set_volume(volume);
    }

    /// Set the tone shaper drive. Re-derives all three tone stages.
    pub fn set_first_eq_value(&self, value: f32) {
        self.shared.set_first_eq(value);
    }

    /// Set the low-cut amount.
    pub fn set_low_cut_value(&self, value: f32) {
        self.shared.set_low_cut(value);
    }

    /// Set the high-cut amount.
    pub fn set_high_cut_value(&self, value: f32) {
        self.shared.set_high_cut(value);
    }

    /// Store all four values, then re-derive every stage.
    pub fn apply_settings(&self, settings: &ProcessorSettings) {
        let params = &self.shared.params;
        params.volume.store(settings.volume);
        params.first_eq.store(settings.first_eq);
        params.low_cut.store(settings.low_cut);
        params.high_cut.store(settings.high_cut);
        self.shared.update_all();
    }

    /// Restore the values the processor was created with.
    pub fn reset_parameters(&self) {
        self.shared.params.reset();
        self.shared.update_all();
    }

    /// Current linear output gain.
    pub fn volume(&self) -> f32 {
        self.shared.params.volume()
    }

    /// Current tone shaper drive.
    pub fn first_eq_value(&self) -> f32 {
        self.shared.params.first_eq_value()
    }

    /// Current low-cut amount.
    pub fn low_cut_value(&self) -> f32 {
        self.shared.params.low_cut_value()
    }

    /// Current high-cut amount.
    pub fn high_cut_value(&self) -> f32 {
        self.shared.params.high_cut_value()
    }

    /// All four values.
    pub fn values(&self) -> ParamValues {
        self.shared.params.snapshot()
    }

    /// The underlying parameter store.
    pub fn params(&self) -> &ParameterStore {
        &self.shared.params
    }

    /// Sample rate of the last prepare, if any.
    pub fn sample_rate(&self) -> Option<f32> {
        self.shared.sample_rate()
    }

    /// Low-cut coefficients currently published.
    pub fn low_cut_coefficients(&self) -> BiquadCoefficients {
        self.shared.coefficients.low_cut()
    }

    /// High-cut coefficients currently published.
    pub fn high_cut_coefficients(&self) -> BiquadCoefficients {
        self.shared.coefficients.high_cut()
    }

    /// Tone coefficients currently published.
    pub fn tone_coefficients(&self) -> ToneCoefficients {
        self.shared.coefficients.tone()
    }
}

/// Stream-dependent state, present between prepare and release.
#[derive(Debug)]
struct StreamState {
    config: StreamConfig,
    filters: FilterBank,
}

/// Audio-side processor.
///
/// # Lifecycle
///
/// 1. [`prepare`](Self::prepare) with the stream's sample rate, maximum
///    block size and channel count.
/// 2. [`process`](Self::process) once per block.
/// 3. [`release`](Self::release) when the stream stops, or prepare again
///    to change the stream.
///
/// # Example
///
/// ```rust
/// use vinyl_processor::VinylProcessor;
///
/// let mut processor = VinylProcessor::new();
/// processor.prepare(48000.0, 256, 2).unwrap();
///
/// let controls = processor.controls();
/// controls.set_volume(1.0);
/// controls.set_first_eq_value(0.6);
///
/// let mut left = vec![0.1f32; 256];
/// let mut right = vec![-0.1f32; 256];
/// processor.process(&mut [&mut left[..], &mut right[..]], 2).unwrap();
/// ```
#[derive(Debug)]
pub struct VinylProcessor {
    shared: Arc<Shared>,
    stream: Option<StreamState>,
}

impl VinylProcessor {
    /// Create an unprepared processor with default settings.
    pub fn new() -> Self {
        Self::with_settings(&ProcessorSettings::default())
    }

    /// Create an unprepared processor starting from `settings`.
    pub fn with_settings(settings: &ProcessorSettings) -> Self {
        Self {
            shared: Arc::new(Shared::new(settings)),
            stream: None,
        }
    }

    /// Create and prepare a processor from a full configuration.
    pub fn from_config(config: &VinylConfig) -> Result<Self> {
        config.settings.validate()?;
        let mut processor = Self::with_settings(&config.settings);
        processor.prepare_with(&config.stream)?;
        Ok(processor)
    }

    /// Whether the processor can run with a host-offered bus layout.
    pub fn supports_layout(layout: &BusLayout) -> bool {
        layout.is_supported()
    }

    /// A control handle sharing this processor's parameters.
    pub fn controls(&self) -> VinylControls {
        VinylControls {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Prepare for a stream.
    ///
    /// Re-derives every coefficient at `sample_rate` and allocates filters
    /// with cleared history. On error the previous stream state is kept.
    pub fn prepare(
        &mut self,
        sample_rate: f32,
        max_block_size: usize,
        num_channels: usize,
    ) -> Result<()> {
        self.prepare_with(&StreamConfig::new(sample_rate, max_block_size, num_channels))
    }

    /// Prepare for a stream described by `config`.
    pub fn prepare_with(&mut self, config: &StreamConfig) -> Result<()> {
        config.validate()?;

        self.shared.rederive_all(config.sample_rate);
        let mut filters = FilterBank::new(config.num_channels);
        filters.sync(&self.shared.coefficients);
        self.stream = Some(StreamState {
            config: *config,
            filters,
        });

        tracing::info!(
            sample_rate = config.sample_rate,
            max_block_size = config.max_block_size,
            num_channels = config.num_channels,
            "vinyl processor prepared"
        );
        Ok(())
    }

    /// Drop stream state. Processing fails with
    /// [`ProcessorError::NotPrepared`] until the next prepare.
    pub fn release(&mut self) {
        if self.stream.take().is_some() {
            tracing::info!("vinyl processor released");
        }
    }

    /// Whether [`process`](Self::process) can be called.
    pub fn is_prepared(&self) -> bool {
        self.stream.is_some()
    }

    /// Stream configuration of the last successful prepare, until release.
    pub fn stream_config(&self) -> Option<&StreamConfig> {
        self.stream.as_ref().map(|s| &s.config)
    }

    /// Clear all filter history. Coefficients and parameters are kept.
    pub fn reset(&mut self) {
        if let Some(stream) = &mut self.stream {
            stream.filters.reset();
        }
    }

    /// Processing latency in samples. Always zero.
    pub fn latency_samples(&self) -> usize {
        0
    }

    /// Length of the audible tail after input stops, in seconds. Reported
    /// as zero.
    pub fn tail_length_seconds(&self) -> f64 {
        0.0
    }

    /// Process one block of planar audio in place.
    ///
    /// The first `num_input_channels` entries of `channels` carry input;
    /// any further entries are output-only and are zeroed. All channels
    /// must have the same length.
    pub fn process(&mut self, channels: &mut [&mut [f32]], num_input_channels: usize) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(ProcessorError::NotPrepared)?;

        let Some(frames) = channels.first().map(|c| c.len()) else {
            return Ok(());
        };
        if let Some((channel, c)) = channels.iter().enumerate().find(|(_, c)| c.len() != frames) {
            return Err(ProcessorError::ChannelLengthMismatch {
                channel,
                len: c.len(),
                expected: frames,
            });
        }
        if frames > stream.config.max_block_size {
            return Err(ProcessorError::BlockTooLarge {
                len: frames,
                max: stream.config.max_block_size,
            });
        }
        let num_inputs = num_input_channels.min(channels.len());
        if num_inputs > stream.filters.num_channels() {
            return Err(ProcessorError::TooManyChannels {
                got: num_inputs,
                prepared: stream.filters.num_channels(),
            });
        }

        let (inputs, outputs_only) = channels.split_at_mut(num_inputs);
        for channel in outputs_only.iter_mut() {
            channel.fill(0.0);
        }

        let values = self.shared.params.snapshot();
        stream.filters.sync(&self.shared.coefficients);

        for (index, channel) in inputs.iter_mut().enumerate() {
            apply_gain(channel, values.volume);
            stream.filters.process_channel(index, channel, &values);
        }
        Ok(())
    }

    /// Process one block of interleaved audio in place.
    ///
    /// Every channel is an input channel.
    pub fn process_interleaved(&mut self, buffer: &mut [f32], num_channels: usize) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(ProcessorError::NotPrepared)?;

        if buffer.is_empty() {
            return Ok(());
        }
        if num_channels == 0 || buffer.len() % num_channels != 0 {
            return Err(ProcessorError::PartialFrame {
                len: buffer.len(),
                num_channels,
            });
        }
        let frames = buffer.len() / num_channels;
        if frames > stream.config.max_block_size {
            return Err(ProcessorError::BlockTooLarge {
                len: frames,
                max: stream.config.max_block_size,
            });
        }
        if num_channels > stream.filters.num_channels() {
            return Err(ProcessorError::TooManyChannels {
                got: num_channels,
                prepared: stream.filters.num_channels(),
            });
        }

        let values = self.shared.params.snapshot();
        stream.filters.sync(&self.shared.coefficients);

        for frame in buffer.chunks_exact_mut(num_channels) {
            for (channel, sample) in frame.iter_mut().enumerate() {
                *sample = stream
                    .filters
                    .process_sample(channel, *sample * values.volume, &values);
            }
        }
        Ok(())
    }

    /// See [`VinylControls::set_volume`].
    pub fn set_volume(&self, volume: f32) {
        self.shared.set_volume(volume);
    }

    /// See [`VinylControls::set_first_eq_value`].
    pub fn set_first_eq_value(&self, value: f32) {
        self.shared.set_first_eq(value);
    }

    /// See [`VinylControls::set_low_cut_value`].
    pub fn set_low_cut_value(&self, value: f32) {
        self.shared.set_low_cut(value);
    }

    /// See [`VinylControls::set_high_cut_value`].
    pub fn set_high_cut_value(&self, value: f32) {
        self.shared.set_high_cut(value);
    }

    /// Current parameter values.
    pub fn values(&self) -> ParamValues {
        self.shared.params.snapshot()
    }
}

impl Default for VinylProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vinyl_config::ConfigError;

    fn prepared(channels: usize) -> VinylProcessor {
        let mut p = VinylProcessor::new();
        p.prepare(48000.0, 512, channels).unwrap();
        p
    }

    #[test]
    fn process_before_prepare_fails() {
        let mut p = VinylProcessor::new();
        let mut buf = [0.0f32; 16];
        let err = p.process(&mut [&mut buf], 1).unwrap_err();
        assert!(matches!(err, ProcessorError::NotPrepared));
        let err = p.process_interleaved(&mut buf, 2).unwrap_err();
        assert!(matches!(err, ProcessorError::NotPrepared));
    }

    #[test]
    fn release_returns_to_unprepared() {
        let mut p = prepared(2);
        assert!(p.is_prepared());
        p.release();
        assert!(!p.is_prepared());
        assert!(p.stream_config().is_none());
        let mut buf = [0.0f32; 4];
        assert!(matches!(
            p.process(&mut [&mut buf], 1),
            Err(ProcessorError::NotPrepared)
        ));
        p.prepare(44100.0, 64, 1).unwrap();
        assert!(p.process(&mut [&mut buf], 1).is_ok());
    }

    #[test]
    fn invalid_prepare_keeps_previous_stream() {
        let mut p = prepared(2);
        let err = p.prepare(0.0, 512, 2).unwrap_err();
        assert!(matches!(err, ProcessorError::Config(ConfigError::InvalidSampleRate(_))));
        assert_eq!(p.stream_config().map(|c| c.sample_rate), Some(48000.0));
        assert_eq!(p.controls().sample_rate(), Some(48000.0));
    }

    #[test]
    fn block_too_large() {
        let mut p = VinylProcessor::new();
        p.prepare(48000.0, 64, 1).unwrap();
        let mut buf = [0.0f32; 65];
        let err = p.process(&mut [&mut buf], 1).unwrap_err();
        assert!(matches!(err, ProcessorError::BlockTooLarge { len: 65, max: 64 }));

        let mut interleaved = [0.0f32; 130];
        let mut p2 = VinylProcessor::new();
        p2.prepare(48000.0, 64, 2).unwrap();
        let err = p2.process_interleaved(&mut interleaved, 2).unwrap_err();
        assert!(matches!(err, ProcessorError::BlockTooLarge { len: 65, max: 64 }));
    }

    #[test]
    fn too_many_input_channels() {
        let mut p = prepared(1);
        let mut l = [0.0f32; 8];
        let mut r = [0.0f32; 8];
        let err = p.process(&mut [&mut l, &mut r], 2).unwrap_err();
        assert!(matches!(err, ProcessorError::TooManyChannels { got: 2, prepared: 1 }));
    }

    #[test]
    fn mismatched_channel_lengths() {
        let mut p = prepared(2);
        let mut l = [0.0f32; 8];
        let mut r = [0.0f32; 7];
        let err = p.process(&mut [&mut l, &mut r], 2).unwrap_err();
        assert!(matches!(
            err,
            ProcessorError::ChannelLengthMismatch { channel: 1, len: 7, expected: 8 }
        ));
    }

    #[test]
    fn partial_interleaved_frame() {
        let mut p = prepared(2);
        let mut buf = [0.0f32; 7];
        let err = p.process_interleaved(&mut buf, 2).unwrap_err();
        assert!(matches!(err, ProcessorError::PartialFrame { len: 7, num_channels: 2 }));
        let err = p.process_interleaved(&mut buf, 0).unwrap_err();
        assert!(matches!(err, ProcessorError::PartialFrame { .. }));
    }

    #[test]
    fn empty_block_is_a_no_op() {
        let mut p = prepared(2);
        assert!(p.process(&mut [], 0).is_ok());
        let mut empty: [f32; 0] = [];
        assert!(p.process(&mut [&mut empty], 1).is_ok());
        assert!(p.process_interleaved(&mut empty, 2).is_ok());
    }

    #[test]
    fn setters_before_prepare_defer_derivation() {
        let p = VinylProcessor::new();
        let controls = p.controls();
        controls.set_low_cut_value(0.5);
        assert_eq!(controls.low_cut_value(), 0.5);
        assert_eq!(controls.sample_rate(), None);
        assert_eq!(controls.low_cut_coefficients(), BiquadCoefficients::IDENTITY);

        let mut p = p;
        p.prepare(48000.0, 128, 2).unwrap();
        assert_eq!(
            controls.low_cut_coefficients(),
            low_cut_design(0.5).coefficients(48000.0)
        );
    }

    #[test]
    fn prepare_rederives_at_new_sample_rate() {
        let mut p = prepared(2);
        p.set_high_cut_value(0.2);
        let at_48k = p.controls().high_cut_coefficients();
        p.prepare(96000.0, 512, 2).unwrap();
        let at_96k = p.controls().high_cut_coefficients();
        assert_ne!(at_48k, at_96k);
        assert_eq!(at_96k, high_cut_design(0.2).coefficients(96000.0));
    }

    #[test]
    fn apply_and_reset_parameters() {
        let settings = ProcessorSettings {
            volume: 0.8,
            first_eq: 0.3,
            low_cut: 0.0,
            high_cut: 0.6,
        };
        let p = prepared(2);
        let controls = p.controls();
        controls.apply_settings(&settings);
        assert_eq!(p.values(), ParamValues::from(settings));
        assert_eq!(
            controls.tone_coefficients(),
            ToneShape::from_value(0.3).coefficients(48000.0)
        );

        controls.reset_parameters();
        assert_eq!(p.values(), ParamValues::from(ProcessorSettings::default()));
        assert_eq!(
            controls.high_cut_coefficients(),
            high_cut_design(0.0).coefficients(48000.0)
        );
    }

    #[test]
    fn from_config_prepares() {
        let config = VinylConfig::from_toml_str("[settings]\nvolume = 1.0\nlow_cut = 0.2\n").unwrap();
        let p = VinylProcessor::from_config(&config).unwrap();
        assert!(p.is_prepared());
        assert_eq!(p.controls().volume(), 1.0);
        assert_eq!(
            p.controls().low_cut_coefficients(),
            low_cut_design(0.2).coefficients(48000.0)
        );
    }

    #[test]
    fn latency_and_tail_are_zero() {
        let p = VinylProcessor::default();
        assert_eq!(p.latency_samples(), 0);
        assert_eq!(p.tail_length_seconds(), 0.0);
    }

    #[test]
    fn layout_check() {
        use vinyl_config::ChannelSet;
        assert!(VinylProcessor::supports_layout(&BusLayout::stereo()));
        assert!(!VinylProcessor::supports_layout(&BusLayout::new(
            ChannelSet::Stereo,
            ChannelSet::Mono
        )));
    }
}
