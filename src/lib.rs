#![cfg_attr(not(test), no_std)]

//! coop_sched - Cooperative task scheduler for resource-constrained targets
//!
//! Runs a fixed, compile-time table of tasks. Each call to
//! [`Scheduler::run`] checks whether the minimum pass interval has elapsed
//! and, if so, walks the table once and invokes every due task in table
//! order. Tasks are plain state-transition functions; nothing is preempted
//! and nothing is allocated.
//!
//! # Features
//!
//! - **`stats`** (default): pass statistics and `stats()` snapshot
//! - **`task-log`** (default): end-of-pass task table snapshot via `log()`
//! - **`defmt`**: defmt logging and `defmt::Format` on public types
//! - **`embassy`**: `EmbassyTime` clock and `CriticalSnapshot` cell

// Core systems (scheduler, traits, logging)
pub mod core;

pub use crate::core::scheduler::{
    PassOutcome, SchedError, Scheduler, SchedulerConfig, Status, Task, TaskControl, TaskEntry,
    TaskId,
};
pub use crate::core::traits::TimeSource;
