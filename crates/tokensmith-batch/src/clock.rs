use chrono::{DateTime, Local, SecondsFormat};

/// Source of "now" for a run. Swapped for a fixed clock in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Always returns the same instant.
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// Filename stamp shared by a run's snapshot and log, e.g. `03_04_25_09_30`.
pub fn run_stamp(at: &DateTime<Local>) -> String {
    at.format("%m_%d_%y_%H_%M").to_string()
}

pub fn iso8601(at: &DateTime<Local>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, false)
}
