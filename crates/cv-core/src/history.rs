//! History retention policy.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum spacing between two retention sweeps, in hours.
pub const CLEANUP_INTERVAL_HOURS: i64 = 24;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown retention period: {0}")]
pub struct UnknownRetention(pub String);

/// How long persisted history entries are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionPeriod {
    Day,
    Week,
    Month,
    /// Keep everything.
    None,
}

impl RetentionPeriod {
    pub fn from_name(name: &str) -> Result<Self, UnknownRetention> {
        match name.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "none" => Ok(Self::None),
            _ => Err(UnknownRetention(name.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::None => "none",
        }
    }

    pub fn period(&self) -> Option<Duration> {
        match self {
            Self::Day => Some(Duration::days(1)),
            Self::Week => Some(Duration::days(7)),
            Self::Month => Some(Duration::days(30)),
            Self::None => None,
        }
    }

    /// Entries stamped before the returned instant are expired.
    ///
    /// `now` is rounded to the nearest midnight first, except for `Day`, so a
    /// sweep at 23:00 and one at 01:00 the next day agree on the cutoff.
    pub fn cutoff(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let period = self.period()?;
        let anchor = match self {
            Self::Day => now,
            _ => round_to_nearest_day(now),
        };
        anchor.checked_sub_signed(period)
    }
}

fn round_to_nearest_day(at: NaiveDateTime) -> NaiveDateTime {
    let midnight = at.date().and_time(NaiveTime::default());
    if at - midnight >= Duration::hours(12) {
        midnight + Duration::days(1)
    } else {
        midnight
    }
}

impl fmt::Display for RetentionPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RetentionPeriod {
    type Err = UnknownRetention;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!(RetentionPeriod::from_name("Week").unwrap(), RetentionPeriod::Week);
        assert_eq!("none".parse::<RetentionPeriod>().unwrap(), RetentionPeriod::None);
        assert!(RetentionPeriod::from_name("forever").is_err());
    }

    #[test]
    fn day_cutoff_uses_the_exact_time() {
        assert_eq!(RetentionPeriod::Day.cutoff(at(10, 15, 30)), Some(at(9, 15, 30)));
    }

    #[test]
    fn longer_periods_round_to_the_nearest_midnight() {
        assert_eq!(RetentionPeriod::Week.cutoff(at(10, 11, 59)), Some(at(3, 0, 0)));
        assert_eq!(RetentionPeriod::Week.cutoff(at(10, 12, 0)), Some(at(4, 0, 0)));
        assert_eq!(
            RetentionPeriod::Month.cutoff(at(31, 1, 0)),
            Some(at(1, 0, 0))
        );
    }

    #[test]
    fn none_never_expires() {
        assert_eq!(RetentionPeriod::None.cutoff(at(10, 0, 0)), None);
    }
}
