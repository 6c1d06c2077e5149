//! Lock-free parameter cell shared between a control thread and the audio thread.
//!
//! [`AtomicParam`] stores an `f32` bit-cast into an `AtomicU32`. One thread
//! writes, any number read, nobody blocks and nothing allocates. The value
//! is stored exactly as given: range policy belongs to whoever calls
//! [`store`](AtomicParam::store) (host parameter layers clamp through
//! [`ParamDescriptor::clamp`](crate::ParamDescriptor::clamp) first).

use core::sync::atomic::{AtomicU32, Ordering};

/// A thread-safe `f32` parameter.
///
/// Control thread writes, audio thread reads. No locks, no allocations.
///
/// # Example
///
/// ```rust
/// use vinyl_core::AtomicParam;
///
/// let volume = AtomicParam::new(0.5);
/// volume.store(0.8);
/// assert_eq!(volume.load(), 0.8);
///
/// volume.reset();
/// assert_eq!(volume.load(), 0.5);
/// ```
#[derive(Debug)]
pub struct AtomicParam {
    value: AtomicU32,
    default: f32,
}

impl AtomicParam {
    /// Create a new parameter holding `default`.
    pub fn new(default: f32) -> Self {
        Self {
            value: AtomicU32::new(default.to_bits()),
            default,
        }
    }

    /// Set the parameter value (control thread).
    #[inline]
    pub fn store(&self, value: f32) {
        self.value.store(value.to_bits(), Ordering::Release);
    }

    /// Get the parameter value (audio thread).
    #[inline]
    pub fn load(&self) -> f32 {
        f32::from_bits(self.value.load(Ordering::Acquire))
    }

    /// The value the parameter was created with.
    pub fn default_value(&self) -> f32 {
        self.default
    }

    /// Reset to the default value.
    pub fn reset(&self) {
        self.store(self.default);
    }
}

impl Clone for AtomicParam {
    fn clone(&self) -> Self {
        Self {
            value: AtomicU32::new(self.value.load(Ordering::Acquire)),
            default: self.default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_is_unclamped() {
        let param = AtomicParam::new(0.0);

        param.store(1.5);
        assert_eq!(param.load(), 1.5);

        param.store(-0.25);
        assert_eq!(param.load(), -0.25);
    }

    #[test]
    fn test_bit_exact_roundtrip() {
        let param = AtomicParam::new(0.0);
        let value = 0.7_f32;
        param.store(value);
        assert_eq!(param.load().to_bits(), value.to_bits());
    }

    #[test]
    fn test_reset() {
        let param = AtomicParam::new(0.5);
        param.store(0.9);
        param.reset();
        assert_eq!(param.load(), 0.5);
        assert_eq!(param.default_value(), 0.5);
    }

    #[test]
    fn test_clone_snapshots_value() {
        let param = AtomicParam::new(0.5);
        param.store(0.75);
        let copy = param.clone();
        param.store(0.1);
        assert_eq!(copy.load(), 0.75);
        assert_eq!(copy.default_value(), 0.5);
    }
}
