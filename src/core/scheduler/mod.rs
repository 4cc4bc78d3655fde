//! Cooperative task scheduler
//!
//! Runs a fixed, compile-time task table. Each task is a state-transition
//! function `fn(ctl, id, status) -> status`: the scheduler calls it with its
//! current status and stores what it returns. A status `> 0` keeps the task
//! scheduled every `interval` ms; `<= 0` stops it until it is started again.
//!
//! # Components
//!
//! - [`types`]: Task entries, status values, statistics and result types
//! - [`registry`]: Task registration records and lookup by name
//! - [`stats`]: Overdue rolling average and worst-case tracking
//! - [`control`]: Task-control API shared by tasks and external code
//! - [`executor`]: Pass executor and initializer
//! - [`config`]: Build-time tuning
//!
//! # Example
//!
//! ```rust,ignore
//! use coop_sched::core::scheduler::{Scheduler, Status, TaskControl, TaskId};
//! use coop_sched::core::traits::EmbassyTime;
//! use coop_sched::task_table;
//!
//! type Ctl = TaskControl<EmbassyTime, 2>;
//!
//! fn blink(ctl: &mut Ctl, id: TaskId, status: Status) -> Status {
//!     match status {
//!         0 => {
//!             ctl.set_interval(id, 500).ok();
//!             1
//!         }
//!         1 => { led_on(); 2 }
//!         _ => { led_off(); 1 }
//!     }
//! }
//!
//! let mut sched = Scheduler::new(EmbassyTime, task_table![blink, buttons]);
//! sched.init().unwrap();
//! loop {
//!     sched.run();
//! }
//! ```

pub mod config;
pub mod control;
pub mod error;
pub mod executor;
pub mod registry;
#[cfg(feature = "stats")]
pub mod stats;
pub mod types;

pub use config::{SchedulerConfig, MIN_TASK_INTERVAL, OVERDUE_WINDOW};
pub use control::TaskControl;
pub use error::SchedError;
pub use executor::Scheduler;
pub use registry::{Task, TaskFn};
#[cfg(feature = "stats")]
pub use stats::{OverdueWindow, StatsTracker};
pub use types::*;
