//! Compile-time task registration
//!
//! The task list is a fixed array handed to the scheduler at construction.
//! Its length is the table size `N`; nothing can be added or removed later.
//! Tasks are registered with the `task_table!` macro or by building the
//! array of [`Task`] values directly.

use super::control::TaskControl;
use super::error::SchedError;
use super::types::{Status, TaskId};

/// Task state-transition function
///
/// Called as `run(ctl, id, status)` and returns the task's next status.
/// `ctl` is the task-control handle: a task uses it to change its own
/// interval, start peers, or read statistics while it runs.
pub type TaskFn<C, const N: usize> = fn(&mut TaskControl<C, N>, TaskId, Status) -> Status;

/// One registered task
///
/// The name is the task's lookup key for [`TaskControl::find_id`].
pub struct Task<C, const N: usize> {
    /// Lookup key, unique within a table
    pub name: &'static str,

    /// State-transition function
    pub run: TaskFn<C, N>,
}

impl<C, const N: usize> Task<C, N> {
    /// Create a task record
    pub const fn new(name: &'static str, run: TaskFn<C, N>) -> Self {
        Self { name, run }
    }
}

impl<C, const N: usize> Clone for Task<C, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C, const N: usize> Copy for Task<C, N> {}

impl<C, const N: usize> core::fmt::Debug for Task<C, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Task").field("name", &self.name).finish()
    }
}

/// Look up a task ID by name
///
/// Performs a linear search; tables hold tens of tasks at most. Duplicate
/// names are unsupported, the first match wins.
pub(crate) fn find_by_name<C, const N: usize>(
    tasks: &[Task<C, N>; N],
    name: &str,
) -> Result<TaskId, SchedError> {
    if name.is_empty() {
        return Err(SchedError::InvalidArgument);
    }
    tasks
        .iter()
        .position(|task| task.name == name)
        .ok_or(SchedError::NotFound)
}

/// Build a task array from task function names
///
/// Each function's identifier becomes its lookup name.
///
/// # Example
///
/// ```rust,ignore
/// use coop_sched::task_table;
///
/// let tasks = task_table![blink_led, read_buttons, refresh_display];
/// let mut sched = Scheduler::new(EmbassyTime, tasks);
/// ```
#[macro_export]
macro_rules! task_table {
    ($($task:ident),* $(,)?) => {
        [$($crate::core::scheduler::Task::new(stringify!($task), $task)),*]
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::MockTime;

    fn first(_ctl: &mut TaskControl<MockTime, 3>, _id: TaskId, _status: Status) -> Status {
        0
    }

    fn second(_ctl: &mut TaskControl<MockTime, 3>, _id: TaskId, _status: Status) -> Status {
        0
    }

    fn third(_ctl: &mut TaskControl<MockTime, 3>, _id: TaskId, _status: Status) -> Status {
        0
    }

    #[test]
    fn test_task_table_macro_names() {
        let tasks: [Task<MockTime, 3>; 3] = crate::task_table![first, second, third];
        assert_eq!(tasks[0].name, "first");
        assert_eq!(tasks[1].name, "second");
        assert_eq!(tasks[2].name, "third");
    }

    #[test]
    fn test_find_by_name() {
        let tasks: [Task<MockTime, 3>; 3] = crate::task_table![first, second, third];

        assert_eq!(find_by_name(&tasks, "first"), Ok(0));
        assert_eq!(find_by_name(&tasks, "third"), Ok(2));
        assert_eq!(find_by_name(&tasks, "missing"), Err(SchedError::NotFound));
        assert_eq!(find_by_name(&tasks, ""), Err(SchedError::InvalidArgument));
    }

    #[test]
    fn test_duplicate_name_first_match_wins() {
        let tasks: [Task<MockTime, 3>; 3] = [
            Task::new("dup", first),
            Task::new("dup", second),
            Task::new("other", third),
        ];
        assert_eq!(find_by_name(&tasks, "dup"), Ok(0));
    }
}
