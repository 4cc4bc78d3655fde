//! Task-control API
//!
//! [`TaskControl`] owns the task table and everything a task may touch while
//! it runs. The pass executor lends it to each task it invokes, and the
//! scheduler exposes it to external code between passes, so both sides use
//! the same operations with the same rules:
//!
//! - every operation validates the ID first (`InvalidId` outside `0..N`)
//! - the task currently being invoked is "running": its status, interval
//!   and next due time belong to the pass until it returns
//! - a task can be started from outside, but only the task itself stops
//!   itself, by returning a status `<= 0`

use super::config::SchedulerConfig;
use super::error::SchedError;
use super::registry::{find_by_name, Task};
use super::types::{IdState, IntervalUpdate, Status, TaskEntry, TaskId, STATUS_START};
use crate::core::traits::TimeSource;

#[cfg(any(feature = "stats", feature = "task-log"))]
use crate::core::traits::SnapshotCell;

#[cfg(feature = "stats")]
use super::stats::StatsTracker;
#[cfg(feature = "stats")]
use super::types::Stats;

/// Task table plus the control surface used by tasks and external code
pub struct TaskControl<C, const N: usize> {
    pub(crate) clock: C,
    pub(crate) config: SchedulerConfig,
    pub(crate) tasks: [Task<C, N>; N],
    pub(crate) table: [TaskEntry; N],
    /// Task being invoked by a pass or by init
    pub(crate) running: Option<TaskId>,
    /// Clock value of the last accepted pass (or of init)
    pub(crate) old_ms: u32,
    #[cfg(feature = "stats")]
    pub(crate) stats: StatsTracker,
    #[cfg(feature = "stats")]
    pub(crate) stats_copy: Stats,
    #[cfg(feature = "task-log")]
    pub(crate) table_copy: [TaskEntry; N],
}

impl<C: TimeSource, const N: usize> TaskControl<C, N> {
    pub(crate) fn new(clock: C, tasks: [Task<C, N>; N], config: SchedulerConfig) -> Self {
        Self {
            clock,
            config,
            tasks,
            table: [TaskEntry::EMPTY; N],
            running: None,
            old_ms: 0,
            #[cfg(feature = "stats")]
            stats: StatsTracker::new(),
            #[cfg(feature = "stats")]
            stats_copy: Stats::ZERO,
            #[cfg(feature = "task-log")]
            table_copy: [TaskEntry::EMPTY; N],
        }
    }

    /// Validate a task ID and report whether it is currently being invoked
    ///
    /// # Errors
    ///
    /// `SchedError::InvalidId` if `id` is outside `0..N`.
    pub fn check_id(&self, id: TaskId) -> Result<IdState, SchedError> {
        if id >= N {
            return Err(SchedError::InvalidId);
        }
        if self.running == Some(id) {
            Ok(IdState::Running)
        } else {
            Ok(IdState::Idle)
        }
    }

    /// Set a task's interval in milliseconds
    ///
    /// If the task is not running its next due time becomes now + interval.
    /// If it is running (typically a task retuning itself) only the interval
    /// is stored; the pass computes the next due time when the task returns.
    ///
    /// # Errors
    ///
    /// - `SchedError::InvalidId` if `id` is outside `0..N`
    /// - `SchedError::InvalidInterval` if `interval` is below the minimum pass interval
    pub fn set_interval(&mut self, id: TaskId, interval: i32) -> Result<IntervalUpdate, SchedError> {
        let state = self.check_id(id)?;
        if interval < self.config.min_task_interval() as i32 {
            return Err(SchedError::InvalidInterval);
        }

        let entry = &mut self.table[id];
        entry.interval = interval;
        match state {
            IdState::Running => Ok(IntervalUpdate::Deferred),
            IdState::Idle => {
                entry.next = self.clock.now_ms().wrapping_add(interval as u32);
                Ok(IntervalUpdate::Rescheduled)
            }
        }
    }

    /// Get a task's interval in milliseconds (`<= 0` means unset)
    ///
    /// # Errors
    ///
    /// `SchedError::InvalidId` if `id` is outside `0..N`.
    pub fn interval(&self, id: TaskId) -> Result<i32, SchedError> {
        self.check_id(id)?;
        Ok(self.table[id].interval)
    }

    /// Get a task's next due time on the millisecond clock
    ///
    /// # Errors
    ///
    /// - `SchedError::InvalidId` if `id` is outside `0..N`
    /// - `SchedError::NoInterval` if the task has no interval, so no due time exists
    pub fn time(&self, id: TaskId) -> Result<u32, SchedError> {
        self.check_id(id)?;
        let entry = &self.table[id];
        if !entry.has_interval() {
            return Err(SchedError::NoInterval);
        }
        Ok(entry.next)
    }

    /// Get a task's raw status, including user error codes
    ///
    /// # Errors
    ///
    /// `SchedError::InvalidId` if `id` is outside `0..N`.
    pub fn status(&self, id: TaskId) -> Result<Status, SchedError> {
        self.check_id(id)?;
        Ok(self.table[id].status)
    }

    /// Start a stopped task
    ///
    /// Sets the status to start and schedules the first run one interval
    /// after the last pass. A task stopped with a user error status can be
    /// restarted the same way.
    ///
    /// # Errors
    ///
    /// - `SchedError::InvalidId` if `id` is outside `0..N`
    /// - `SchedError::TaskRunning` if the task is currently being invoked
    /// - `SchedError::NoInterval` if no interval has been set
    /// - `SchedError::AlreadyStarted` if the task already has a running status
    pub fn start(&mut self, id: TaskId) -> Result<(), SchedError> {
        if self.check_id(id)? == IdState::Running {
            return Err(SchedError::TaskRunning);
        }

        let entry = &mut self.table[id];
        if !entry.has_interval() {
            return Err(SchedError::NoInterval);
        }
        if entry.is_running() {
            return Err(SchedError::AlreadyStarted);
        }

        let previous = entry.status;
        entry.status = STATUS_START;
        entry.next = self.old_ms.wrapping_add(entry.interval as u32);

        crate::log_debug!(
            "task '{}' started (previous status {}), due at {}ms",
            self.tasks[id].name,
            previous,
            entry.next
        );
        Ok(())
    }

    /// Look up a task ID by its registered name
    ///
    /// # Errors
    ///
    /// - `SchedError::InvalidArgument` if `name` is empty
    /// - `SchedError::NotFound` if no task has that name
    pub fn find_id(&self, name: &str) -> Result<TaskId, SchedError> {
        find_by_name(&self.tasks, name)
    }

    /// Read a task's full live table entry
    ///
    /// # Errors
    ///
    /// `SchedError::InvalidId` if `id` is outside `0..N`.
    pub fn entry(&self, id: TaskId) -> Result<TaskEntry, SchedError> {
        self.check_id(id)?;
        Ok(self.table[id])
    }

    /// Registered name of a task
    ///
    /// # Errors
    ///
    /// `SchedError::InvalidId` if `id` is outside `0..N`.
    pub fn task_name(&self, id: TaskId) -> Result<&'static str, SchedError> {
        self.check_id(id)?;
        Ok(self.tasks[id].name)
    }

    /// Number of tasks in the table
    #[inline]
    pub const fn task_count(&self) -> usize {
        N
    }

    /// Task currently being invoked, if any
    #[inline]
    pub fn running(&self) -> Option<TaskId> {
        self.running
    }

    /// Clock value of the last accepted pass
    #[inline]
    pub fn last_pass_ms(&self) -> u32 {
        self.old_ms
    }

    /// Active configuration
    #[inline]
    pub fn config(&self) -> SchedulerConfig {
        self.config
    }

    /// Clock the scheduler runs on
    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Task table as it was at the end of the last completed pass
    #[cfg(feature = "task-log")]
    pub fn log(&self) -> &[TaskEntry; N] {
        &self.table_copy
    }

    /// Statistics as they were at the end of the last completed pass
    ///
    /// Reading clears `max_exec`, `max_id` and `overdue_max` in the live
    /// statistics, so the next snapshot only reports what happened after
    /// this call. The returned snapshot itself is unchanged until the next
    /// pass completes.
    #[cfg(feature = "stats")]
    pub fn stats(&mut self) -> Stats {
        self.stats.reset_records();
        self.stats_copy
    }

    /// Statistics snapshot without clearing the record fields
    #[cfg(feature = "stats")]
    pub fn peek_stats(&self) -> Stats {
        self.stats_copy
    }

    /// Publish the table snapshot to a cell read outside the driving loop
    #[cfg(feature = "task-log")]
    pub fn share_log<S: SnapshotCell<[TaskEntry; N]>>(&self, cell: &S) {
        cell.publish(self.table_copy);
    }

    /// Publish the statistics snapshot to a cell, without clearing records
    #[cfg(feature = "stats")]
    pub fn share_stats<S: SnapshotCell<Stats>>(&self, cell: &S) {
        cell.publish(self.stats_copy);
    }

    /// Publish end-of-pass snapshots; must run after all table mutation
    pub(crate) fn publish(&mut self) {
        #[cfg(feature = "task-log")]
        {
            self.table_copy = self.table;
        }
        #[cfg(feature = "stats")]
        {
            self.stats_copy = self.stats.current();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scheduler::{STATUS_STOPPED, Task};
    use crate::core::traits::MockTime;
    #[cfg(any(feature = "stats", feature = "task-log"))]
    use crate::core::traits::LocalSnapshot;

    fn idle(_ctl: &mut TaskControl<MockTime, 2>, _id: TaskId, _status: Status) -> Status {
        STATUS_STOPPED
    }

    fn control() -> TaskControl<MockTime, 2> {
        TaskControl::new(
            MockTime::new(),
            [Task::new("alpha", idle), Task::new("beta", idle)],
            SchedulerConfig::new(10).unwrap(),
        )
    }

    #[test]
    fn test_check_id() {
        let mut ctl = control();
        assert_eq!(ctl.check_id(0), Ok(IdState::Idle));
        assert_eq!(ctl.check_id(1), Ok(IdState::Idle));
        assert_eq!(ctl.check_id(2), Err(SchedError::InvalidId));

        ctl.running = Some(1);
        assert_eq!(ctl.check_id(1), Ok(IdState::Running));
        assert_eq!(ctl.check_id(0), Ok(IdState::Idle));
    }

    #[test]
    fn test_invalid_id_everywhere_mutates_nothing() {
        let mut ctl = control();
        let before = ctl.table;

        for id in [2, 3, usize::MAX] {
            assert_eq!(ctl.set_interval(id, 50), Err(SchedError::InvalidId));
            assert_eq!(ctl.interval(id), Err(SchedError::InvalidId));
            assert_eq!(ctl.time(id), Err(SchedError::InvalidId));
            assert_eq!(ctl.status(id), Err(SchedError::InvalidId));
            assert_eq!(ctl.start(id), Err(SchedError::InvalidId));
            assert_eq!(ctl.entry(id), Err(SchedError::InvalidId));
            assert_eq!(ctl.task_name(id), Err(SchedError::InvalidId));
        }

        assert_eq!(ctl.table, before);
    }

    #[test]
    fn test_set_interval_idle_reschedules() {
        let mut ctl = control();
        ctl.clock.set_ms(100);

        assert_eq!(ctl.set_interval(0, 20), Ok(IntervalUpdate::Rescheduled));
        assert_eq!(ctl.interval(0), Ok(20));
        assert_eq!(ctl.time(0), Ok(120));
    }

    #[test]
    fn test_set_interval_running_defers() {
        let mut ctl = control();
        ctl.clock.set_ms(100);
        ctl.table[0].next = 42;
        ctl.running = Some(0);

        assert_eq!(ctl.set_interval(0, 30), Ok(IntervalUpdate::Deferred));
        assert_eq!(ctl.table[0].interval, 30);
        assert_eq!(ctl.table[0].next, 42);
    }

    #[test]
    fn test_set_interval_below_minimum() {
        let mut ctl = control();
        assert_eq!(ctl.set_interval(0, 9), Err(SchedError::InvalidInterval));
        assert_eq!(ctl.set_interval(0, 0), Err(SchedError::InvalidInterval));
        assert_eq!(ctl.set_interval(0, -20), Err(SchedError::InvalidInterval));
        assert_eq!(ctl.interval(0), Ok(0));

        assert_eq!(ctl.set_interval(0, 10), Ok(IntervalUpdate::Rescheduled));
    }

    #[test]
    fn test_time_without_interval() {
        let ctl = control();
        assert_eq!(ctl.time(0), Err(SchedError::NoInterval));
    }

    #[test]
    fn test_start_requires_interval() {
        let mut ctl = control();
        assert_eq!(ctl.start(0), Err(SchedError::NoInterval));
        assert_eq!(ctl.status(0), Ok(STATUS_STOPPED));
    }

    #[test]
    fn test_start_schedules_from_last_pass() {
        let mut ctl = control();
        ctl.table[1].interval = 50;
        ctl.old_ms = 200;
        ctl.clock.set_ms(207);

        assert_eq!(ctl.start(1), Ok(()));
        assert_eq!(ctl.status(1), Ok(STATUS_START));
        assert_eq!(ctl.time(1), Ok(250));
    }

    #[test]
    fn test_start_already_started() {
        let mut ctl = control();
        ctl.table[0].interval = 50;
        ctl.table[0].status = 4;

        assert_eq!(ctl.start(0), Err(SchedError::AlreadyStarted));
        assert_eq!(ctl.status(0), Ok(4));
    }

    #[test]
    fn test_start_running_task_refused() {
        let mut ctl = control();
        ctl.table[0].interval = 50;
        ctl.running = Some(0);

        assert_eq!(ctl.start(0), Err(SchedError::TaskRunning));
        assert_eq!(ctl.status(0), Ok(STATUS_STOPPED));
    }

    #[test]
    fn test_start_after_user_error() {
        let mut ctl = control();
        ctl.table[0].interval = 20;
        ctl.table[0].status = -5;

        assert_eq!(ctl.status(0), Ok(-5));
        assert_eq!(ctl.start(0), Ok(()));
        assert_eq!(ctl.status(0), Ok(STATUS_START));
    }

    #[test]
    fn test_find_id_and_names() {
        let ctl = control();
        assert_eq!(ctl.find_id("beta"), Ok(1));
        assert_eq!(ctl.find_id("gamma"), Err(SchedError::NotFound));
        assert_eq!(ctl.find_id(""), Err(SchedError::InvalidArgument));
        assert_eq!(ctl.task_name(0), Ok("alpha"));
        assert_eq!(ctl.task_count(), 2);
    }

    #[cfg(feature = "task-log")]
    #[test]
    fn test_log_only_changes_on_publish() {
        let mut ctl = control();
        ctl.table[0].interval = 25;
        assert_eq!(ctl.log()[0].interval, 0);

        ctl.publish();
        assert_eq!(ctl.log()[0].interval, 25);

        let cell = LocalSnapshot::new([TaskEntry::EMPTY; 2]);
        ctl.share_log(&cell);
        assert_eq!(cell.value()[0].interval, 25);
        assert_eq!(cell.read().generation, 1);
    }

    #[cfg(feature = "stats")]
    #[test]
    fn test_stats_read_resets_records() {
        let mut ctl = control();
        ctl.stats.record_exec(1, 700);
        ctl.stats.finish_pass(0, 3, 1, 40, 10);
        ctl.publish();

        let first = ctl.stats();
        assert_eq!(first.max_exec, 700);
        assert_eq!(first.max_id, 1);
        assert_eq!(first.overdue_max, 30);
        assert_eq!(first.max_loop, 3);

        // Live records were cleared; the snapshot refreshes on the next publish
        ctl.stats.finish_pass(10, 10, 0, 10, 10);
        ctl.publish();

        let second = ctl.stats();
        assert_eq!(second.max_exec, 0);
        assert_eq!(second.max_id, 0);
        assert_eq!(second.overdue_max, 0);
        assert_eq!(second.max_loop, 3);

        let cell = LocalSnapshot::new(Stats::ZERO);
        ctl.share_stats(&cell);
        assert_eq!(cell.value().max_loop, 3);
        assert_eq!(ctl.peek_stats(), second);
    }
}
