//! Time-in-status calculation.
//!
//! Durations are measured from a check-in's reference timestamp
//! (`status_changed_at`, else `check_in_time`) to the board's shared clock
//! tick, so every row on screen agrees on "now".

use chrono::{DateTime, Duration, Utc};
use std::fmt;

use crate::constants::EMPTY_DISPLAY;
use crate::models::CheckIn;

/// Elapsed time from `reference` to `now`; `None` when the clock is skewed
/// into the future.
pub fn elapsed(reference: DateTime<Utc>, now: DateTime<Utc>) -> Option<Duration> {
    let elapsed = now.signed_duration_since(reference);
    (elapsed >= Duration::zero()).then_some(elapsed)
}

/// Formatted time a patient has spent in the current status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeInStatus {
    LessThanMinute,
    Minutes(i64),
    HoursMinutes { hours: i64, minutes: i64 },
    /// No usable timestamp or negative elapsed time
    Unknown,
}

impl TimeInStatus {
    pub fn from_elapsed(elapsed: Option<Duration>) -> Self {
        let Some(elapsed) = elapsed else {
            return Self::Unknown;
        };
        let total_minutes = elapsed.num_minutes();
        if total_minutes < 0 {
            Self::Unknown
        } else if total_minutes < 1 {
            Self::LessThanMinute
        } else if total_minutes < 60 {
            Self::Minutes(total_minutes)
        } else {
            Self::HoursMinutes {
                hours: total_minutes / 60,
                minutes: total_minutes % 60,
            }
        }
    }

    /// Time in status for a check-in at the given clock tick
    pub fn for_checkin(checkin: &CheckIn, now: DateTime<Utc>) -> Self {
        Self::from_elapsed(
            checkin
                .status_reference_time()
                .and_then(|reference| elapsed(reference, now)),
        )
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for TimeInStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LessThanMinute => f.write_str("<1 min"),
            Self::Minutes(minutes) => write!(f, "{minutes} min"),
            Self::HoursMinutes { hours, minutes } => write!(f, "{hours}h {minutes}m"),
            Self::Unknown => f.write_str(EMPTY_DISPLAY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn format_seconds(seconds: i64) -> TimeInStatus {
        let now = Utc.with_ymd_and_hms(2025, 3, 4, 12, 0, 0).unwrap();
        let reference = now - Duration::seconds(seconds);
        TimeInStatus::from_elapsed(elapsed(reference, now))
    }

    #[test]
    fn test_formatting_boundaries() {
        assert_eq!(format_seconds(0).to_string(), "<1 min");
        assert_eq!(format_seconds(59).to_string(), "<1 min");
        assert_eq!(format_seconds(60).to_string(), "1 min");
        assert_eq!(format_seconds(3599).to_string(), "59 min");
        assert_eq!(format_seconds(3600).to_string(), "1h 0m");
        assert_eq!(format_seconds(3900).to_string(), "1h 5m");
    }

    #[test]
    fn test_negative_elapsed_is_unknown() {
        let status = format_seconds(-5);
        assert_eq!(status, TimeInStatus::Unknown);
        assert_eq!(status.to_string(), EMPTY_DISPLAY);
    }

    #[test]
    fn test_missing_timestamp_is_unknown() {
        assert!(TimeInStatus::from_elapsed(None).is_unknown());
    }
}
