//! Scheduler error types
//!
//! Every task-control operation reports failure through [`SchedError`].
//! Errors are returned to the immediate caller only; the scheduler never
//! retries, escalates or aborts on them.

use core::fmt;

/// Errors from scheduler and task-control operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedError {
    /// Task ID outside `0..N`
    InvalidId,
    /// Interval below the configured minimum pass interval
    InvalidInterval,
    /// Task has no interval configured (`interval <= 0`)
    NoInterval,
    /// Task already has a running status (`status > 0`)
    AlreadyStarted,
    /// Operation targets the task currently being invoked by a pass
    TaskRunning,
    /// No registered task matches the lookup key
    NotFound,
    /// Lookup key is empty
    InvalidArgument,
    /// Task table has no entries
    EmptyTable,
    /// `init` has already run on this scheduler
    AlreadyInitialized,
    /// Configuration value out of range
    InvalidConfig,
}

impl SchedError {
    /// Identity failures (bad ID or lookup key)
    pub const fn is_identity(self) -> bool {
        matches!(
            self,
            SchedError::InvalidId | SchedError::NotFound | SchedError::InvalidArgument
        )
    }

    /// Conflicts with the current task state rather than bad input
    pub const fn is_state_conflict(self) -> bool {
        matches!(
            self,
            SchedError::AlreadyStarted | SchedError::TaskRunning | SchedError::AlreadyInitialized
        )
    }
}

impl fmt::Display for SchedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedError::InvalidId => write!(f, "invalid task ID"),
            SchedError::InvalidInterval => write!(f, "interval below minimum task interval"),
            SchedError::NoInterval => write!(f, "task has no interval configured"),
            SchedError::AlreadyStarted => write!(f, "task already started"),
            SchedError::TaskRunning => write!(f, "task is currently running"),
            SchedError::NotFound => write!(f, "task not found"),
            SchedError::InvalidArgument => write!(f, "invalid task lookup argument"),
            SchedError::EmptyTable => write!(f, "task table is empty"),
            SchedError::AlreadyInitialized => write!(f, "scheduler already initialized"),
            SchedError::InvalidConfig => write!(f, "invalid scheduler configuration"),
        }
    }
}
