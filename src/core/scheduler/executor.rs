//! Pass executor and initializer
//!
//! [`Scheduler`] drives the task table. The outer loop calls [`Scheduler::run`]
//! as often as it likes; a pass only happens once the minimum interval has
//! elapsed since the previous one. A pass walks the table once in index
//! order and invokes every running task whose due time has arrived.
//!
//! Tasks run to completion. A task that blocks stalls the whole scheduler,
//! so task bodies must stay short relative to the minimum pass interval.

use core::ops::{Deref, DerefMut};

use super::config::SchedulerConfig;
use super::control::TaskControl;
use super::error::SchedError;
use super::registry::Task;
use super::types::{is_user_error, PassOutcome, Status, TaskId, STATUS_INIT, STATUS_RESERVED};
use crate::core::traits::TimeSource;

/// Cooperative scheduler over a fixed table of `N` tasks
///
/// Dereferences to [`TaskControl`], so external code uses the same
/// start/query/retune operations as the tasks themselves. `run` and `init`
/// are only reachable through the scheduler, never from inside a task.
///
/// # Example
///
/// ```
/// use coop_sched::core::scheduler::{Scheduler, Status, TaskControl, TaskId, PassOutcome};
/// use coop_sched::core::traits::MockTime;
///
/// fn heartbeat(ctl: &mut TaskControl<MockTime, 1>, id: TaskId, status: Status) -> Status {
///     if status == 0 {
///         ctl.set_interval(id, 100).ok();
///     }
///     1
/// }
///
/// let mut sched = Scheduler::new(MockTime::new(), coop_sched::task_table![heartbeat]);
/// sched.init().unwrap();
///
/// sched.clock().set_ms(100);
/// assert_eq!(sched.run(), PassOutcome::Executed(1));
/// ```
pub struct Scheduler<C, const N: usize> {
    ctl: TaskControl<C, N>,
    initialized: bool,
}

impl<C: TimeSource, const N: usize> Scheduler<C, N> {
    /// Create a scheduler with the build-time configuration
    pub fn new(clock: C, tasks: [Task<C, N>; N]) -> Self {
        Self::with_config(clock, tasks, SchedulerConfig::DEFAULT)
    }

    /// Create a scheduler with an explicit configuration
    pub fn with_config(clock: C, tasks: [Task<C, N>; N], config: SchedulerConfig) -> Self {
        Self {
            ctl: TaskControl::new(clock, tasks, config),
            initialized: false,
        }
    }

    /// Initialise every task
    ///
    /// Calls each task once, in table order, with the init status. A task
    /// sets its own interval during this call and returns the status to
    /// begin with (`0` to stay stopped, `> 0` to be scheduled one interval
    /// from now).
    ///
    /// # Returns
    ///
    /// Number of tasks initialised
    ///
    /// # Errors
    ///
    /// - `SchedError::EmptyTable` if the table has no tasks
    /// - `SchedError::AlreadyInitialized` on a second call
    pub fn init(&mut self) -> Result<usize, SchedError> {
        if N == 0 {
            crate::log_error!("scheduler init with an empty task table");
            return Err(SchedError::EmptyTable);
        }
        if self.initialized {
            return Err(SchedError::AlreadyInitialized);
        }

        let ctl = &mut self.ctl;
        let ms = ctl.clock.now_ms();
        ctl.old_ms = ms;

        let mut started = 0usize;
        for id in 0..N {
            ctl.running = Some(id);
            let run = ctl.tasks[id].run;
            let begin_us = ctl.clock.now_us();
            let status = run(ctl, id, STATUS_INIT);
            let elapsed_us = ctl.clock.now_us().wrapping_sub(begin_us);
            ctl.running = None;

            let entry = &mut ctl.table[id];
            entry.status = status;
            entry.last = elapsed_us;
            entry.executed = true;
            if entry.is_running() {
                entry.next = ms.wrapping_add(entry.interval as u32);
                started += 1;
            }
            check_returned_status(ctl.tasks[id].name, id, status);
        }

        ctl.publish();
        self.initialized = true;

        crate::log_info!(
            "scheduler initialised {} tasks, {} scheduled, min interval {}ms",
            N,
            started,
            self.ctl.config.min_task_interval()
        );
        Ok(N)
    }

    /// Perform one scheduling pass if the minimum interval has elapsed
    ///
    /// A task is due when `now - next <= since_last_pass` in wrapping
    /// arithmetic, i.e. its due time fell inside the window since the last
    /// pass. This stays correct across clock rollover.
    ///
    /// # Returns
    ///
    /// - `PassOutcome::TooEarly` if called before the minimum interval; the
    ///   table and statistics are untouched
    /// - `PassOutcome::Executed(n)` with the number of tasks invoked
    pub fn run(&mut self) -> PassOutcome {
        let ctl = &mut self.ctl;
        let since_last = ctl.clock.elapsed_ms(ctl.old_ms);
        if since_last < ctl.config.min_task_interval() {
            return PassOutcome::TooEarly;
        }
        let ms = ctl.old_ms.wrapping_add(since_last);
        ctl.old_ms = ms;

        let mut done = 0usize;
        for id in 0..N {
            let entry = &mut ctl.table[id];
            if !entry.is_running() || ms.wrapping_sub(entry.next) > since_last {
                entry.executed = false;
                continue;
            }

            let status = entry.status;
            ctl.running = Some(id);
            let run = ctl.tasks[id].run;
            let begin_us = ctl.clock.now_us();
            let new_status = run(ctl, id, status);
            let elapsed_us = ctl.clock.now_us().wrapping_sub(begin_us);
            ctl.running = None;

            // Interval is re-read so a set_interval made by the task applies now
            let entry = &mut ctl.table[id];
            entry.status = new_status;
            if entry.is_running() {
                entry.next = ms.wrapping_add(entry.interval as u32);
            }
            entry.last = elapsed_us;
            entry.executed = true;
            check_returned_status(ctl.tasks[id].name, id, new_status);

            #[cfg(feature = "stats")]
            ctl.stats.record_exec(id, elapsed_us);

            done += 1;
        }

        #[cfg(feature = "stats")]
        {
            let finish = ctl.clock.now_ms();
            let min_interval = ctl.config.min_task_interval();
            ctl.stats.finish_pass(ms, finish, done, since_last, min_interval);
        }

        ctl.publish();
        PassOutcome::Executed(done)
    }

    /// `init` has completed
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

impl<C, const N: usize> Deref for Scheduler<C, N> {
    type Target = TaskControl<C, N>;

    fn deref(&self) -> &Self::Target {
        &self.ctl
    }
}

impl<C, const N: usize> DerefMut for Scheduler<C, N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.ctl
    }
}

/// Log stop statuses that observers will want to know about
#[allow(unused_variables)]
fn check_returned_status(name: &str, id: TaskId, status: Status) {
    if is_user_error(status) {
        crate::log_warn!(
            "task '{}' ({}) stopped with error status {}",
            name,
            id,
            status
        );
    } else if status == STATUS_RESERVED {
        crate::log_warn!(
            "task '{}' ({}) returned reserved status -1, treated as stopped",
            name,
            id
        );
    }
}
