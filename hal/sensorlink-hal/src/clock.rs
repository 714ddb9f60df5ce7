//! Monotonic millisecond clock

/// Millisecond tick source
///
/// Must be monotonic and non-decreasing. Consumers are free to truncate
/// the tick (the framer keeps only the low 16 bits), so wraparound is
/// expected and not an error.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin (usually boot)
    fn now_ms(&self) -> u32;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

/// Clock that always reports the same tick
///
/// Useful for nodes without a timer and for deterministic frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FixedClock(pub u32);

impl Clock for FixedClock {
    fn now_ms(&self) -> u32 {
        self.0
    }
}
