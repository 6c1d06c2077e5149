//! Host-facing parameter exposure.
//!
//! Four automatable parameters with stable ids. Writes through
//! [`ParameterInfo::set_param`] are clamped to the descriptor range (NaN
//! falls back to the default); the direct setters on
//! [`VinylControls`] store values unclamped.

use vinyl_core::{ParamDescriptor, ParamId, ParameterInfo};

use crate::processor::{VinylControls, VinylProcessor};

/// Stable id of the volume parameter.
pub const VOLUME: ParamId = ParamId(0);
/// Stable id of the first EQ (tone shaper) parameter.
pub const FIRST_EQ: ParamId = ParamId(1);
/// Stable id of the low-cut parameter.
pub const LOW_CUT: ParamId = ParamId(2);
/// Stable id of the high-cut parameter.
pub const HIGH_CUT: ParamId = ParamId(3);

const PARAM_COUNT: usize = 4;

fn descriptor(index: usize) -> Option<ParamDescriptor> {
    match index {
        0 => Some(ParamDescriptor::linear_gain("Volume", "Vol", 0.5).with_id(VOLUME, "VOLUME")),
        1 => Some(
            ParamDescriptor::normalized("First EQ", "Tone", 0.0)
                .with_id(FIRST_EQ, "FIRST_EQ")
                .with_group("EQ"),
        ),
        2 => Some(
            ParamDescriptor::normalized("Low Cut", "LowCut", 0.0)
                .with_id(LOW_CUT, "LOW_CUT")
                .with_group("EQ"),
        ),
        3 => Some(
            ParamDescriptor::normalized("High Cut", "HighCut", 0.0)
                .with_id(HIGH_CUT, "HIGH_CUT")
                .with_group("EQ"),
        ),
        _ => None,
    }
}

impl ParameterInfo for VinylControls {
    fn param_count(&self) -> usize {
        PARAM_COUNT
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        descriptor(index)
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.volume(),
            1 => self.first_eq_value(),
            2 => self.low_cut_value(),
            3 => self.high_cut_value(),
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        let Some(desc) = descriptor(index) else {
            return;
        };
        let value = desc.clamp(value);
        match index {
            0 => self.set_volume(value),
            1 => self.set_first_eq_value(value),
            2 => self.set_low_cut_value(value),
            3 => self.set_high_cut_value(value),
            _ => {}
        }
    }
}

impl ParameterInfo for VinylProcessor {
    fn param_count(&self) -> usize {
        PARAM_COUNT
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        descriptor(index)
    }

    fn get_param(&self, index: usize) -> f32 {
        self.controls().get_param(index)
    }

    fn set_param(&mut self, index: usize, value: f32) {
        self.controls().set_param(index, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vinyl_core::ParamUnit;

    #[test]
    fn descriptors() {
        let controls = VinylProcessor::new().controls();
        assert_eq!(controls.param_count(), 4);

        let volume = controls.param_info(0).unwrap();
        assert_eq!(volume.string_id, "VOLUME");
        assert_eq!(volume.unit, ParamUnit::LinearGain);
        assert_eq!(volume.default, 0.5);

        for index in 1..4 {
            let desc = controls.param_info(index).unwrap();
            assert_eq!((desc.min, desc.max, desc.default), (0.0, 1.0, 0.0));
            assert_eq!(desc.group, "EQ");
        }
        assert!(controls.param_info(4).is_none());
    }

    #[test]
    fn ids_are_stable_and_unique() {
        let controls = VinylProcessor::new().controls();
        let ids: Vec<_> = (0..4).filter_map(|i| controls.param_id(i)).collect();
        assert_eq!(ids, vec![VOLUME, FIRST_EQ, LOW_CUT, HIGH_CUT]);
        assert_eq!(controls.param_index_by_id(HIGH_CUT), Some(3));
        assert_eq!(controls.find_param_by_name("low_cut"), Some(2));
        assert_eq!(controls.find_param_by_name("tone"), Some(1));
    }

    #[test]
    fn host_writes_are_clamped() {
        let mut controls = VinylProcessor::new().controls();
        controls.set_param(0, 4.0);
        assert_eq!(controls.volume(), 1.0);
        controls.set_param(2, -3.0);
        assert_eq!(controls.low_cut_value(), 0.0);
        controls.set_param(3, f32::NAN);
        assert_eq!(controls.high_cut_value(), 0.0);

        // Direct setters are not clamped.
        controls.set_volume(4.0);
        assert_eq!(controls.get_param(0), 4.0);
    }

    #[test]
    fn processor_delegates_to_shared_controls() {
        let mut processor = VinylProcessor::new();
        let controls = processor.controls();
        processor.set_param(1, 0.4);
        assert_eq!(controls.first_eq_value(), 0.4);
        assert_eq!(processor.get_param(1), 0.4);
        processor.set_param(99, 1.0);
        assert_eq!(processor.get_param(99), 0.0);
    }
}
