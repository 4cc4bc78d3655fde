//! Core types for the task scheduler
//!
//! This module defines the fundamental types used by the scheduler:
//! - Task identity and status values
//! - Task table entries (per-task scheduling state)
//! - Scheduler statistics (aggregate pass telemetry, `stats` feature)
//! - Result types for passes and task-control operations

/// Index of a task in the task table (`0..N`)
pub type TaskId = usize;

/// Task status word
///
/// | value | meaning |
/// |---|---|
/// | `< -1` | user error, task stopped |
/// | `-1` | reserved, never a task's own status |
/// | `0` | stopped (and, as an argument, "initialise") |
/// | `1` | start, first scheduled run |
/// | `2..` | user-defined running states |
pub type Status = i32;

/// Argument passed to a task exactly once, by `init`
pub const STATUS_INIT: Status = 0;

/// Returned by a task to stop itself cleanly
pub const STATUS_STOPPED: Status = 0;

/// Status a task is started with
pub const STATUS_START: Status = 1;

/// Reserved value; a task must not return it
pub const STATUS_RESERVED: Status = -1;

/// True when the status makes the task eligible for scheduling
#[inline]
pub const fn is_running(status: Status) -> bool {
    status > 0
}

/// True when the status is an application-reported failure
#[inline]
pub const fn is_user_error(status: Status) -> bool {
    status < STATUS_RESERVED
}

/// Scheduling state of one task table slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskEntry {
    /// Next due time on the millisecond clock (meaningless while stopped)
    pub next: u32,

    /// Duration of the most recent invocation in microseconds
    pub last: u32,

    /// Current status, see [`Status`]
    pub status: Status,

    /// Milliseconds between invocations; `<= 0` means no schedule set
    pub interval: i32,

    /// Task ran during the most recently completed pass
    pub executed: bool,
}

impl TaskEntry {
    /// Zero-initialised entry
    pub const EMPTY: Self = Self {
        next: 0,
        last: 0,
        status: STATUS_STOPPED,
        interval: 0,
        executed: false,
    };

    /// Task has an interval configured
    #[inline]
    pub const fn has_interval(&self) -> bool {
        self.interval > 0
    }

    /// Task is eligible to run in a pass
    #[inline]
    pub const fn is_running(&self) -> bool {
        is_running(self.status)
    }
}

/// Aggregate statistics over scheduler passes
///
/// All times are taken from the wrapping clocks: pass timestamps and loop
/// duration in milliseconds, execution time in microseconds.
#[cfg(feature = "stats")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stats {
    /// Pass start time (ms)
    pub start: u32,

    /// Pass end time (ms)
    pub finish: u32,

    /// Worst single-task execution time since the last `stats()` read (us)
    pub max_exec: u32,

    /// Task that produced `max_exec`
    pub max_id: TaskId,

    /// Number of tasks run in the last pass
    pub qty: u32,

    /// How late, beyond the minimum interval, the last pass was called (ms)
    pub overdue: u32,

    /// Worst `overdue` since the last `stats()` read
    pub overdue_max: u32,

    /// Rolling average of `overdue` over the last `OVERDUE_WINDOW` passes
    pub overdue_avg: u32,

    /// Longest pass processing time (ms), never reset
    pub max_loop: u32,
}

#[cfg(feature = "stats")]
impl Stats {
    /// All-zero statistics
    pub const ZERO: Self = Self {
        start: 0,
        finish: 0,
        max_exec: 0,
        max_id: 0,
        qty: 0,
        overdue: 0,
        overdue_max: 0,
        overdue_avg: 0,
        max_loop: 0,
    };
}

/// Result of one call to the pass executor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PassOutcome {
    /// Minimum interval has not elapsed; nothing was touched
    TooEarly,
    /// A pass ran and invoked this many tasks (may be zero)
    Executed(usize),
}

impl PassOutcome {
    /// Number of tasks run, `None` if the call was too early
    pub const fn executed(self) -> Option<usize> {
        match self {
            PassOutcome::TooEarly => None,
            PassOutcome::Executed(n) => Some(n),
        }
    }
}

/// How an accepted `set_interval` was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IntervalUpdate {
    /// Interval stored and next due time reset to now + interval
    Rescheduled,
    /// Interval stored; the task is running, its next due time is computed
    /// by the pass when it returns
    Deferred,
}

/// Result of a valid ID check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IdState {
    /// Valid and not currently being invoked
    Idle,
    /// Valid and currently being invoked by a pass or by `init`
    Running,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(!is_running(STATUS_STOPPED));
        assert!(is_running(STATUS_START));
        assert!(is_running(32767));
        assert!(!is_running(-5));

        assert!(is_user_error(-2));
        assert!(is_user_error(-5));
        assert!(!is_user_error(STATUS_RESERVED));
        assert!(!is_user_error(STATUS_STOPPED));
    }

    #[test]
    fn test_empty_entry() {
        let entry = TaskEntry::EMPTY;
        assert_eq!(entry, TaskEntry::default());
        assert!(!entry.has_interval());
        assert!(!entry.is_running());
    }

    #[test]
    fn test_pass_outcome_executed() {
        assert_eq!(PassOutcome::TooEarly.executed(), None);
        assert_eq!(PassOutcome::Executed(0).executed(), Some(0));
        assert_eq!(PassOutcome::Executed(3).executed(), Some(3));
    }
}
