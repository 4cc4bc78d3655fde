//! Host driving loop
//!
//! Runs three tasks against the wall clock for a few seconds:
//!
//! - `blink` toggles a pretend LED every 250ms
//! - `sensor` samples every 100ms and stops itself with an error after a
//!   run of bad readings
//! - `watchdog` checks on `sensor` every second and restarts it
//!
//! Statistics and the task table snapshot are printed once per second.
//!
//! Run with: `cargo run --example host_loop`

use std::cell::Cell;
use std::time::{Duration, Instant};

use coop_sched::core::scheduler::{PassOutcome, STATUS_INIT, STATUS_START, STATUS_STOPPED};
use coop_sched::{task_table, Scheduler, Status, TaskControl, TaskId, TimeSource};

/// Wall clock measured from process start, truncated like a hardware counter
struct HostClock {
    epoch: Instant,
}

impl HostClock {
    fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl TimeSource for HostClock {
    fn now_ms(&self) -> u32 {
        self.epoch.elapsed().as_millis() as u32
    }

    fn now_us(&self) -> u32 {
        self.epoch.elapsed().as_micros() as u32
    }
}

type Ctl = TaskControl<HostClock, 3>;

const SENSOR_FAULT: Status = -3;

thread_local! {
    static LED: Cell<bool> = const { Cell::new(false) };
    static SAMPLES: Cell<u32> = const { Cell::new(0) };
}

fn blink(ctl: &mut Ctl, id: TaskId, status: Status) -> Status {
    if status == STATUS_INIT {
        ctl.set_interval(id, 250).ok();
        return STATUS_START;
    }
    let on = !LED.with(Cell::get);
    LED.with(|led| led.set(on));
    status
}

fn sensor(ctl: &mut Ctl, id: TaskId, status: Status) -> Status {
    if status == STATUS_INIT {
        ctl.set_interval(id, 100).ok();
        return STATUS_START;
    }

    let n = SAMPLES.with(|s| {
        s.set(s.get() + 1);
        s.get()
    });
    // Every 15th sample starts a bad run; three in a row trips the fault
    match (status, n % 15 == 0) {
        (3, _) => SENSOR_FAULT,
        (s, _) if s > 1 => s + 1,
        (_, true) => 2,
        _ => STATUS_START,
    }
}

fn watchdog(ctl: &mut Ctl, id: TaskId, status: Status) -> Status {
    if status == STATUS_INIT {
        ctl.set_interval(id, 1000).ok();
        return STATUS_START;
    }

    let Ok(peer) = ctl.find_id("sensor") else {
        return STATUS_STOPPED;
    };
    if let Ok(code) = ctl.status(peer) {
        if code <= 0 {
            println!("watchdog: sensor stopped with {code}, restarting");
            ctl.start(peer).ok();
        }
    }
    STATUS_START
}

fn main() {
    let mut sched = Scheduler::new(HostClock::new(), task_table![blink, sensor, watchdog]);
    match sched.init() {
        Ok(n) => println!("initialised {n} tasks"),
        Err(e) => {
            eprintln!("init failed: {e}");
            return;
        }
    }

    let deadline = Instant::now() + Duration::from_secs(5);
    let mut next_report = Instant::now() + Duration::from_secs(1);

    while Instant::now() < deadline {
        if let PassOutcome::TooEarly = sched.run() {
            std::thread::sleep(Duration::from_millis(1));
        }

        if Instant::now() >= next_report {
            next_report += Duration::from_secs(1);
            let stats = sched.stats();
            println!(
                "pass @{}ms: {} run, loop max {}ms, exec max {}us (task {}), overdue {}ms avg {}ms max {}ms",
                stats.start,
                stats.qty,
                stats.max_loop,
                stats.max_exec,
                stats.max_id,
                stats.overdue,
                stats.overdue_avg,
                stats.overdue_max,
            );
            for (id, entry) in sched.log().iter().enumerate() {
                let name = sched.task_name(id).unwrap_or("?");
                println!(
                    "  {name:<8} status {:>3} every {:>4}ms next {:>6} last {:>4}us{}",
                    entry.status,
                    entry.interval,
                    entry.next,
                    entry.last,
                    if entry.executed { " *" } else { "" },
                );
            }
        }
    }
}
