use chrono::{DateTime, Local};

pub trait ClockPort: Send + Sync {
    fn now_ms(&self) -> i64;

    /// Wall-clock time in the local zone; history file names derive from it.
    fn now_local(&self) -> DateTime<Local>;
}
