//! Parameter store shared between the control and audio threads.
//!
//! Each value is an [`AtomicParam`]: written by setters, read by the audio
//! thread once per block. Values are stored exactly as given, with no
//! clamping. Range enforcement belongs to the host layer (see
//! [`ParameterInfo`](vinyl_core::ParameterInfo)).

use vinyl_config::ProcessorSettings;
use vinyl_core::AtomicParam;

/// Current control values of one processor instance.
#[derive(Debug)]
pub struct ParameterStore {
    pub(crate) volume: AtomicParam,
    pub(crate) first_eq: AtomicParam,
    pub(crate) low_cut: AtomicParam,
    pub(crate) high_cut: AtomicParam,
}

impl ParameterStore {
    /// Create a store holding `settings`.
    ///
    /// The settings also become each parameter's default.
    pub fn new(settings: &ProcessorSettings) -> Self {
        Self {
            volume: AtomicParam::new(settings.volume),
            first_eq: AtomicParam::new(settings.first_eq),
            low_cut: AtomicParam::new(settings.low_cut),
            high_cut: AtomicParam::new(settings.high_cut),
        }
    }

    /// Linear output gain.
    pub fn volume(&self) -> f32 {
        self.volume.load()
    }

    /// Tone shaper drive.
    pub fn first_eq_value(&self) -> f32 {
        self.first_eq.load()
    }

    /// Low-cut amount.
    pub fn low_cut_value(&self) -> f32 {
        self.low_cut.load()
    }

    /// High-cut amount.
    pub fn high_cut_value(&self) -> f32 {
        self.high_cut.load()
    }

    /// Read all four values.
    ///
    /// Each load is atomic on its own; a setter racing with the snapshot
    /// may land in it or not, per value.
    pub fn snapshot(&self) -> ParamValues {
        ParamValues {
            volume: self.volume(),
            first_eq: self.first_eq_value(),
            low_cut: self.low_cut_value(),
            high_cut: self.high_cut_value(),
        }
    }

    /// Restore every value to its default.
    pub(crate) fn reset(&self) {
        self.volume.reset();
        self.first_eq.reset();
        self.low_cut.reset();
        self.high_cut.reset();
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new(&ProcessorSettings::default())
    }
}

/// Plain copy of the four control values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamValues {
    /// Linear output gain.
    pub volume: f32,
    /// Tone shaper drive.
    pub first_eq: f32,
    /// Low-cut amount.
    pub low_cut: f32,
    /// High-cut amount.
    pub high_cut: f32,
}

impl ParamValues {
    /// Whether the low-cut stage runs this block.
    pub fn low_cut_active(&self) -> bool {
        self.low_cut > 0.0
    }

    /// Whether the high-cut stage runs this block.
    pub fn high_cut_active(&self) -> bool {
        self.high_cut > 0.0
    }

    /// Whether the three tone stages run this block.
    pub fn tone_active(&self) -> bool {
        self.first_eq > 0.0
    }
}

impl From<ProcessorSettings> for ParamValues {
    fn from(s: ProcessorSettings) -> Self {
        Self {
            volume: s.volume,
            first_eq: s.first_eq,
            low_cut: s.low_cut,
            high_cut: s.high_cut,
        }
    }
}
