//! Build-time scheduler configuration
//!
//! `build.rs` validates the tuning environment variables and forwards them
//! through `cargo:rustc-env`; they are parsed here at compile time.
//!
//! - `COOP_SCHED_MIN_TASK_INTERVAL` - minimum ms between passes (1-32767, default 10)
//! - `COOP_SCHED_OVERDUE_WINDOW` - points in the rolling overdue average (1-64, default 8)

use super::error::SchedError;

/// Minimum spacing between scheduler passes in milliseconds.
///
/// Smaller values give finer task timing but leave less room for long
/// tasks before later tasks in the table start running late.
pub const MIN_TASK_INTERVAL: u32 = {
    const S: &str = env!("COOP_SCHED_MIN_TASK_INTERVAL");
    const_parse_u32(S)
};

/// Number of passes averaged by the rolling overdue average.
pub const OVERDUE_WINDOW: usize = {
    const S: &str = env!("COOP_SCHED_OVERDUE_WINDOW");
    const_parse_u32(S) as usize
};

/// Largest accepted minimum interval.
pub const MAX_MIN_TASK_INTERVAL: u32 = 32767;

const _: () = assert!(MIN_TASK_INTERVAL >= 1 && MIN_TASK_INTERVAL <= MAX_MIN_TASK_INTERVAL);
const _: () = assert!(OVERDUE_WINDOW >= 1);

/// Parse a decimal u32 at compile time
///
/// Panics (at compile time) on an empty string or a non-digit character;
/// build.rs has already rejected those, this only guards hand-set values.
const fn const_parse_u32(s: &str) -> u32 {
    let bytes = s.as_bytes();
    assert!(!bytes.is_empty(), "empty scheduler configuration value");

    let mut value: u32 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        assert!(b >= b'0' && b <= b'9', "scheduler configuration must be decimal");
        value = value * 10 + (b - b'0') as u32;
        i += 1;
    }
    value
}

/// Per-instance scheduler configuration
///
/// Production code uses [`SchedulerConfig::DEFAULT`], which carries the
/// build-time [`MIN_TASK_INTERVAL`]. Other values are accepted through
/// [`SchedulerConfig::new`] so independent instances (and tests) can run
/// with a different pass cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SchedulerConfig {
    min_task_interval: u32,
}

impl SchedulerConfig {
    /// Configuration built from the compile-time constants
    pub const DEFAULT: Self = Self {
        min_task_interval: MIN_TASK_INTERVAL,
    };

    /// Create a configuration with a custom minimum pass interval
    ///
    /// # Errors
    ///
    /// `SchedError::InvalidConfig` if `min_task_interval` is outside 1..=32767.
    pub fn new(min_task_interval: u32) -> Result<Self, SchedError> {
        if min_task_interval == 0 || min_task_interval > MAX_MIN_TASK_INTERVAL {
            crate::log_error!(
                "rejected min task interval {}ms, valid range 1..={}",
                min_task_interval,
                MAX_MIN_TASK_INTERVAL
            );
            return Err(SchedError::InvalidConfig);
        }
        Ok(Self { min_task_interval })
    }

    /// Minimum spacing between passes in milliseconds
    #[inline]
    pub const fn min_task_interval(&self) -> u32 {
        self.min_task_interval
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_const_parse() {
        assert_eq!(const_parse_u32("0"), 0);
        assert_eq!(const_parse_u32("10"), 10);
        assert_eq!(const_parse_u32("32767"), 32767);
    }

    #[test]
    fn test_default_uses_build_constant() {
        assert_eq!(
            SchedulerConfig::default().min_task_interval(),
            MIN_TASK_INTERVAL
        );
    }

    #[test]
    fn test_config_bounds() {
        assert_eq!(SchedulerConfig::new(0), Err(SchedError::InvalidConfig));
        assert_eq!(SchedulerConfig::new(32768), Err(SchedError::InvalidConfig));
        assert_eq!(SchedulerConfig::new(1).unwrap().min_task_interval(), 1);
        assert_eq!(
            SchedulerConfig::new(32767).unwrap().min_task_interval(),
            32767
        );
    }
}
