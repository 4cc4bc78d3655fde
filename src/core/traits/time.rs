//! Time abstraction traits for platform-agnostic timing operations.
//!
//! This module provides the `TimeSource` trait that abstracts over different
//! time providers (Embassy, mock, etc.) to enable host testing without
//! embedded dependencies.
//!
//! Both counters are 32-bit and wrap. All elapsed-time arithmetic in the
//! scheduler goes through `wrapping_sub`, so a difference stays correct
//! across a rollover as long as the real interval is shorter than one
//! rollover period.

use core::cell::Cell;

/// Rollover period of the millisecond counter, in milliseconds (~49.7 days).
pub const MS_CLOCK_ROLLOVER: u64 = 1 << 32;

/// Rollover period of the microsecond counter, in microseconds (~71.6 minutes).
pub const US_CLOCK_ROLLOVER: u64 = 1 << 32;

/// Platform-agnostic monotonic clock for the scheduler.
///
/// This trait abstracts over different time providers:
/// - `EmbassyTime` (with the `embassy` feature) for embedded targets
/// - `MockTime` for host testing with controllable time
///
/// # Example
///
/// ```
/// use coop_sched::core::traits::{MockTime, TimeSource};
///
/// let time = MockTime::new();
/// let start = time.now_ms();
/// time.advance_ms(25);
/// assert_eq!(time.elapsed_ms(start), 25);
/// ```
pub trait TimeSource {
    /// Returns the wrapping millisecond counter.
    fn now_ms(&self) -> u32;

    /// Returns the wrapping microsecond counter.
    fn now_us(&self) -> u32;

    /// Returns milliseconds elapsed since `reference_ms`.
    ///
    /// Uses wrapping subtraction so the result survives counter rollover.
    fn elapsed_ms(&self, reference_ms: u32) -> u32 {
        self.now_ms().wrapping_sub(reference_ms)
    }
}

// ============================================================================
// Embassy Implementation
// ============================================================================

/// Embassy-based time source using the Embassy time driver.
///
/// The 64-bit Embassy instant is truncated to the wrapping 32-bit counters.
#[cfg(feature = "embassy")]
#[derive(Clone, Copy, Default)]
pub struct EmbassyTime;

#[cfg(feature = "embassy")]
impl TimeSource for EmbassyTime {
    fn now_ms(&self) -> u32 {
        embassy_time::Instant::now().as_millis() as u32
    }

    fn now_us(&self) -> u32 {
        embassy_time::Instant::now().as_micros() as u32
    }
}

// ============================================================================
// Mock Implementation (always available for testing)
// ============================================================================

/// Mock time source for testing with controllable time advancement.
///
/// Time is held as a 64-bit microsecond count; the millisecond and
/// microsecond views are truncated to 32 bits exactly like a hardware
/// counter, so rollover can be exercised by starting near `u32::MAX` ms.
///
/// # Example
///
/// ```
/// use coop_sched::core::traits::{MockTime, TimeSource};
///
/// let time = MockTime::new();
/// assert_eq!(time.now_us(), 0);
///
/// time.advance_us(1000); // Advance 1ms
/// assert_eq!(time.now_us(), 1000);
/// assert_eq!(time.now_ms(), 1);
/// ```
#[derive(Clone, Default, Debug)]
pub struct MockTime {
    current_us: Cell<u64>,
}

impl MockTime {
    /// Creates a new `MockTime` starting at time 0.
    pub fn new() -> Self {
        Self {
            current_us: Cell::new(0),
        }
    }

    /// Creates a new `MockTime` starting at the specified time in microseconds.
    pub fn with_initial(us: u64) -> Self {
        Self {
            current_us: Cell::new(us),
        }
    }

    /// Sets the current time to an absolute value in microseconds.
    pub fn set(&self, us: u64) {
        self.current_us.set(us);
    }

    /// Sets the current time to an absolute value in milliseconds.
    pub fn set_ms(&self, ms: u64) {
        self.current_us.set(ms * 1000);
    }

    /// Advances the current time by the specified number of microseconds.
    pub fn advance_us(&self, us: u64) {
        self.current_us.set(self.current_us.get() + us);
    }

    /// Advances the current time by the specified number of milliseconds.
    pub fn advance_ms(&self, ms: u64) {
        self.advance_us(ms * 1000);
    }
}

impl TimeSource for MockTime {
    fn now_ms(&self) -> u32 {
        (self.current_us.get() / 1000) as u32
    }

    fn now_us(&self) -> u32 {
        self.current_us.get() as u32
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_time_initial_value() {
        let time = MockTime::new();
        assert_eq!(time.now_us(), 0);
        assert_eq!(time.now_ms(), 0);
    }

    #[test]
    fn mock_time_with_initial() {
        let time = MockTime::with_initial(5_000_000);
        assert_eq!(time.now_us(), 5_000_000);
        assert_eq!(time.now_ms(), 5000);
    }

    #[test]
    fn mock_time_set_ms() {
        let time = MockTime::new();
        time.set_ms(1000);
        assert_eq!(time.now_us(), 1_000_000);
        assert_eq!(time.now_ms(), 1000);
    }

    #[test]
    fn mock_time_advance() {
        let time = MockTime::new();
        time.advance_us(500);
        time.advance_ms(2);
        assert_eq!(time.now_us(), 2500);
        assert_eq!(time.now_ms(), 2);
    }

    #[test]
    fn mock_time_ms_rounds_down() {
        let time = MockTime::new();
        time.set(1_999);
        assert_eq!(time.now_ms(), 1);

        time.set(2_000);
        assert_eq!(time.now_ms(), 2);
    }

    #[test]
    fn ms_counter_wraps_at_rollover() {
        let time = MockTime::new();
        time.set_ms(MS_CLOCK_ROLLOVER - 5);
        assert_eq!(time.now_ms(), u32::MAX - 4);

        let before = time.now_ms();
        time.advance_ms(10);
        assert_eq!(time.now_ms(), 5);
        assert_eq!(time.elapsed_ms(before), 10);
    }

    #[test]
    fn us_counter_wraps_at_rollover() {
        let time = MockTime::with_initial(US_CLOCK_ROLLOVER - 100);
        let before = time.now_us();
        time.advance_us(300);
        assert_eq!(time.now_us(), 200);
        assert_eq!(time.now_us().wrapping_sub(before), 300);
    }
}
