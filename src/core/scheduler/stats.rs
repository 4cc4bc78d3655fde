//! Scheduler statistics tracking
//!
//! The tracker aggregates per-pass observations into a live [`Stats`]
//! record. The pass executor copies that record into a snapshot at the end
//! of every pass; readers only ever see the snapshot.
//!
//! Record fields (`max_exec`, `max_id`, `overdue_max`) are consumer-reset:
//! each `stats()` read clears them in the live record, so a caller that
//! needs history must accumulate it. `max_loop` is never reset.

use heapless::HistoryBuffer;

use super::config::OVERDUE_WINDOW;
use super::types::{Stats, TaskId};

/// Fixed window of recent overdue values
///
/// Slots not yet written count as zero, so the average ramps up over the
/// first `K` passes.
#[derive(Debug, Clone)]
pub struct OverdueWindow<const K: usize> {
    history: HistoryBuffer<u32, K>,
}

impl<const K: usize> OverdueWindow<K> {
    /// Create an empty window
    pub const fn new() -> Self {
        Self {
            history: HistoryBuffer::new(),
        }
    }

    /// Push a value, evicting the oldest once the window is full
    pub fn push(&mut self, overdue: u32) {
        self.history.write(overdue);
    }

    /// Arithmetic mean over all `K` slots
    pub fn average(&self) -> u32 {
        if K == 0 {
            return 0;
        }
        let total: u64 = self.history.as_slice().iter().map(|&v| u64::from(v)).sum();
        (total / K as u64) as u32
    }
}

impl<const K: usize> Default for OverdueWindow<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Live statistics accumulator
#[derive(Debug, Clone)]
pub struct StatsTracker {
    live: Stats,
    window: OverdueWindow<OVERDUE_WINDOW>,
}

impl StatsTracker {
    /// Create a tracker with all statistics zeroed
    pub const fn new() -> Self {
        Self {
            live: Stats::ZERO,
            window: OverdueWindow::new(),
        }
    }

    /// Record one task invocation
    pub fn record_exec(&mut self, task_id: TaskId, execution_us: u32) {
        if execution_us > self.live.max_exec {
            self.live.max_exec = execution_us;
            self.live.max_id = task_id;
        }
    }

    /// Close a pass
    ///
    /// # Arguments
    ///
    /// * `start_ms` - Clock value the pass was started at
    /// * `finish_ms` - Clock value after the last task returned
    /// * `executed` - Number of tasks invoked
    /// * `since_last_ms` - Time since the previous pass
    /// * `min_interval_ms` - Configured minimum pass interval
    pub fn finish_pass(
        &mut self,
        start_ms: u32,
        finish_ms: u32,
        executed: usize,
        since_last_ms: u32,
        min_interval_ms: u32,
    ) {
        let live = &mut self.live;
        live.start = start_ms;
        live.finish = finish_ms;

        let loop_ms = finish_ms.wrapping_sub(start_ms);
        if loop_ms > live.max_loop {
            live.max_loop = loop_ms;
        }

        live.qty = executed as u32;

        // Only lateness beyond the expected cadence counts
        let overdue = since_last_ms.saturating_sub(min_interval_ms);
        live.overdue = overdue;
        if overdue > live.overdue_max {
            live.overdue_max = overdue;
        }

        self.window.push(overdue);
        live.overdue_avg = self.window.average();
    }

    /// Clear the consumer-reset record fields
    pub fn reset_records(&mut self) {
        self.live.max_exec = 0;
        self.live.max_id = 0;
        self.live.overdue_max = 0;
    }

    /// Copy of the live statistics
    pub fn current(&self) -> Stats {
        self.live
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_average_before_full() {
        let mut window = OverdueWindow::<8>::new();
        assert_eq!(window.average(), 0);

        window.push(16);
        assert_eq!(window.average(), 2); // 16 / 8, unfilled slots are zero

        window.push(8);
        assert_eq!(window.average(), 3); // 24 / 8
    }

    #[test]
    fn test_window_evicts_oldest() {
        let mut window = OverdueWindow::<4>::new();
        for v in [4, 8, 12, 16] {
            window.push(v);
        }
        assert_eq!(window.average(), 10); // 40 / 4

        window.push(0); // evicts 4
        assert_eq!(window.average(), 9); // 36 / 4

        window.push(0); // evicts 8
        assert_eq!(window.average(), 7); // 28 / 4
    }

    #[test]
    fn test_record_exec_tracks_worst() {
        let mut tracker = StatsTracker::new();
        tracker.record_exec(0, 150);
        tracker.record_exec(1, 400);
        tracker.record_exec(2, 300);

        let stats = tracker.current();
        assert_eq!(stats.max_exec, 400);
        assert_eq!(stats.max_id, 1);
    }

    #[test]
    fn test_finish_pass_overdue_normalised() {
        let mut tracker = StatsTracker::new();

        // On time: exactly the minimum interval
        tracker.finish_pass(100, 101, 2, 10, 10);
        let stats = tracker.current();
        assert_eq!(stats.overdue, 0);
        assert_eq!(stats.qty, 2);
        assert_eq!(stats.start, 100);
        assert_eq!(stats.finish, 101);
        assert_eq!(stats.max_loop, 1);

        // 25ms since last pass with a 10ms minimum: 15ms late
        tracker.finish_pass(125, 125, 1, 25, 10);
        let stats = tracker.current();
        assert_eq!(stats.overdue, 15);
        assert_eq!(stats.overdue_max, 15);
        assert_eq!(stats.max_loop, 1);
        assert_eq!(stats.qty, 1);
    }

    #[test]
    fn test_reset_records_keeps_persistent_fields() {
        let mut tracker = StatsTracker::new();
        tracker.record_exec(3, 900);
        tracker.finish_pass(0, 4, 1, 30, 10);

        tracker.reset_records();
        let stats = tracker.current();
        assert_eq!(stats.max_exec, 0);
        assert_eq!(stats.max_id, 0);
        assert_eq!(stats.overdue_max, 0);

        assert_eq!(stats.max_loop, 4);
        assert_eq!(stats.qty, 1);
        assert_eq!(stats.overdue, 20);
        assert_eq!(stats.overdue_avg, 20 / OVERDUE_WINDOW as u32);
    }

    #[test]
    fn test_loop_time_across_rollover() {
        let mut tracker = StatsTracker::new();
        tracker.finish_pass(u32::MAX - 1, 3, 0, 10, 10);
        assert_eq!(tracker.current().max_loop, 5);
    }
}
