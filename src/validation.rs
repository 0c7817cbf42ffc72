// Validation utilities module
// Provides custom validation functions for time-grid and duration rules

use chrono::{DateTime, Timelike, Utc};

/// Checks whether a timestamp sits on the 30-minute booking grid
/// (minutes 00 or 30, zero seconds and sub-seconds)
pub fn is_on_half_hour_grid(dt: DateTime<Utc>) -> bool {
    dt.second() == 0
        && dt.nanosecond() == 0
        && (dt.minute() == 0 || dt.minute() == 30)
}

/// Checks whether a duration in minutes is a positive multiple of 30
pub fn is_valid_grid_duration(minutes: i64) -> bool {
    minutes >= 30 && minutes % 30 == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, h, m, s).unwrap()
    }

    #[test]
    fn full_hour_is_on_grid() {
        assert!(is_on_half_hour_grid(at(10, 0, 0)));
    }

    #[test]
    fn half_hour_is_on_grid() {
        assert!(is_on_half_hour_grid(at(10, 30, 0)));
    }

    #[test]
    fn quarter_hour_is_off_grid() {
        assert!(!is_on_half_hour_grid(at(10, 15, 0)));
    }

    #[test]
    fn nonzero_seconds_are_off_grid() {
        assert!(!is_on_half_hour_grid(at(10, 0, 1)));
    }

    #[test]
    fn nonzero_nanoseconds_are_off_grid() {
        let dt = at(10, 0, 0) + chrono::Duration::nanoseconds(1);
        assert!(!is_on_half_hour_grid(dt));
    }

    #[test]
    fn duration_must_be_at_least_thirty_minutes() {
        assert!(!is_valid_grid_duration(0));
        assert!(!is_valid_grid_duration(15));
        assert!(is_valid_grid_duration(30));
    }

    #[test]
    fn duration_must_be_a_multiple_of_thirty() {
        assert!(is_valid_grid_duration(90));
        assert!(is_valid_grid_duration(120));
        assert!(!is_valid_grid_duration(100));
        assert!(!is_valid_grid_duration(45));
    }
}
