use std::env;

/// Minimum spacing between scheduler passes in ms
const DEFAULT_MIN_TASK_INTERVAL: u32 = 10;

/// Points in the rolling overdue average
const DEFAULT_OVERDUE_WINDOW: u32 = 8;

fn main() {
    // Scheduler tuning is fixed at build time. Values are validated here so
    // a bad setting fails the build instead of producing a broken scheduler.

    let min_interval = read_bounded(
        "COOP_SCHED_MIN_TASK_INTERVAL",
        DEFAULT_MIN_TASK_INTERVAL,
        1,
        32767,
    );
    println!("cargo:rustc-env=COOP_SCHED_MIN_TASK_INTERVAL={}", min_interval);

    let window = read_bounded("COOP_SCHED_OVERDUE_WINDOW", DEFAULT_OVERDUE_WINDOW, 1, 64);
    println!("cargo:rustc-env=COOP_SCHED_OVERDUE_WINDOW={}", window);

    // Rerun if environment variables change
    println!("cargo:rerun-if-env-changed=COOP_SCHED_MIN_TASK_INTERVAL");
    println!("cargo:rerun-if-env-changed=COOP_SCHED_OVERDUE_WINDOW");
}

fn read_bounded(name: &str, default: u32, min: u32, max: u32) -> u32 {
    match env::var(name) {
        Ok(raw) => {
            let value: u32 = raw
                .trim()
                .parse()
                .unwrap_or_else(|_| panic!("{} must be an unsigned integer, got {:?}", name, raw));
            if value < min || value > max {
                panic!("{} must be in {}..={}, got {}", name, min, max, value);
            }
            println!("cargo:warning=Using {} from environment: {}", name, value);
            value
        }
        Err(_) => default,
    }
}
