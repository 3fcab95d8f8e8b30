use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Local};
use cv_core::ports::ClockPort;

pub struct SystemClock;

impl ClockPort for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or_default()
    }

    fn now_local(&self) -> DateTime<Local> {
        Local::now()
    }
}
