// Operating-hours evaluator
//
// Decides whether a candidate interval fits inside the facility's weekly
// open/close schedule, day by day.

use chrono::{DateTime, Datelike, Utc};

use crate::availability::{AvailabilityCheckResult, AvailabilityConflictType};
use crate::schedule::{weekday_name, OperatingHours};

/// Check a candidate interval against a facility's operating hours
///
/// A facility with no entries at all is open 24/7. Otherwise every calendar
/// date the interval touches must be open, and the effective portion of the
/// interval on that date must fit inside the day's open/close window. A
/// booking spanning midnight therefore has to satisfy every day it touches.
pub fn check_operating_hours(
    operating_hours: &[OperatingHours],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> AvailabilityCheckResult {
    if operating_hours.is_empty() {
        // No schedule defined: open 24/7 by policy
        return AvailabilityCheckResult::available();
    }

    let first_date = start.date_naive();
    let last_date = end.date_naive();

    let mut date = first_date;
    while date <= last_date {
        let weekday = date.weekday();
        let entry = operating_hours.iter().find(|h| h.applies_to(weekday));

        let entry = match entry {
            Some(entry) if !entry.is_closed => entry,
            // Missing entry counts as closed once any schedule exists
            _ => {
                return AvailabilityCheckResult::unavailable(
                    AvailabilityConflictType::FacilityClosed,
                    format!(
                        "Facility is closed on {} ({})",
                        date.format("%Y-%m-%d"),
                        weekday_name(weekday)
                    ),
                );
            }
        };

        // Effective window for this date: the candidate's own times on its
        // first/last day, the open/close times on intermediate days
        let day_start = if date == first_date {
            start.time()
        } else {
            entry.open_time
        };
        let day_end = if date == last_date {
            end.time()
        } else {
            entry.close_time
        };

        if day_start < entry.open_time {
            return AvailabilityCheckResult::unavailable(
                AvailabilityConflictType::OutsideOperatingHours,
                format!(
                    "Booking starts before opening time ({}) on {}",
                    entry.open_time.format("%H:%M"),
                    date.format("%Y-%m-%d")
                ),
            );
        }

        if day_end > entry.close_time {
            return AvailabilityCheckResult::unavailable(
                AvailabilityConflictType::OutsideOperatingHours,
                format!(
                    "Booking ends after closing time ({}) on {}",
                    entry.close_time.format("%H:%M"),
                    date.format("%Y-%m-%d")
                ),
            );
        }

        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    AvailabilityCheckResult::available()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, TimeZone, Weekday};
    use crate::schedule::weekday_index;

    fn entry(weekday: Weekday, open: (u32, u32), close: (u32, u32), is_closed: bool) -> OperatingHours {
        OperatingHours {
            id: 0,
            facility_id: 1,
            day_of_week: weekday_index(weekday),
            open_time: NaiveTime::from_hms_opt(open.0, open.1, 0).unwrap(),
            close_time: NaiveTime::from_hms_opt(close.0, close.1, 0).unwrap(),
            is_closed,
        }
    }

    fn every_day_8_to_22() -> Vec<OperatingHours> {
        [
            Weekday::Sun,
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
        ]
        .into_iter()
        .map(|d| entry(d, (8, 0), (22, 0), false))
        .collect()
    }

    fn at(day: u32, h: u32, m: u32) -> DateTime<Utc> {
        // June 2026: the 1st is a Monday, the 6th a Saturday, the 7th a Sunday
        Utc.with_ymd_and_hms(2026, 6, day, h, m, 0).unwrap()
    }

    #[test]
    fn no_schedule_means_open_around_the_clock() {
        let result = check_operating_hours(&[], at(1, 2, 0), at(1, 4, 0));
        assert!(result.is_available);
    }

    #[test]
    fn interval_inside_open_window_is_available() {
        let result = check_operating_hours(&every_day_8_to_22(), at(1, 10, 0), at(1, 12, 0));
        assert!(result.is_available);
    }

    #[test]
    fn start_before_opening_is_outside_operating_hours() {
        let result = check_operating_hours(&every_day_8_to_22(), at(1, 7, 0), at(1, 9, 0));
        assert!(!result.is_available);
        assert_eq!(result.conflict_type, AvailabilityConflictType::OutsideOperatingHours);
    }

    #[test]
    fn end_after_closing_is_outside_operating_hours() {
        let result = check_operating_hours(&every_day_8_to_22(), at(1, 21, 0), at(1, 23, 0));
        assert!(!result.is_available);
        assert_eq!(result.conflict_type, AvailabilityConflictType::OutsideOperatingHours);
    }

    #[test]
    fn day_with_no_entry_is_closed_when_schedule_exists() {
        // Only Monday is defined; a Tuesday booking finds no entry
        let hours = vec![entry(Weekday::Mon, (8, 0), (22, 0), false)];
        let result = check_operating_hours(&hours, at(2, 10, 0), at(2, 12, 0));
        assert!(!result.is_available);
        assert_eq!(result.conflict_type, AvailabilityConflictType::FacilityClosed);
    }

    #[test]
    fn closed_flag_wins_over_open_window() {
        let mut hours = every_day_8_to_22();
        for h in &mut hours {
            if h.day_of_week == weekday_index(Weekday::Mon) {
                h.is_closed = true;
            }
        }
        let result = check_operating_hours(&hours, at(1, 10, 0), at(1, 12, 0));
        assert!(!result.is_available);
        assert_eq!(result.conflict_type, AvailabilityConflictType::FacilityClosed);
    }

    #[test]
    fn saturday_night_into_closed_sunday_names_sunday() {
        // Open all week except Sunday, which is closed
        let mut hours: Vec<OperatingHours> = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
        ]
        .into_iter()
        .map(|d| entry(d, (0, 0), (23, 59), false))
        .collect();
        hours.push(entry(Weekday::Sun, (8, 0), (22, 0), true));

        // Saturday 23:00 to Sunday 01:00
        let result = check_operating_hours(&hours, at(6, 23, 0), at(7, 1, 0));
        assert!(!result.is_available);
        assert_eq!(result.conflict_type, AvailabilityConflictType::FacilityClosed);
        let message = result.message.unwrap();
        assert!(message.contains("Sunday"), "message was: {}", message);
        assert!(message.contains("2026-06-07"), "message was: {}", message);
    }

    #[test]
    fn multi_day_booking_must_fit_every_day() {
        // Monday open until 22:00, so an overnight stay fails on day one's close
        let result = check_operating_hours(&every_day_8_to_22(), at(1, 10, 0), at(2, 10, 0));
        assert!(!result.is_available);
        assert_eq!(result.conflict_type, AvailabilityConflictType::OutsideOperatingHours);
    }

    #[test]
    fn failure_message_names_the_failing_date() {
        let hours = vec![entry(Weekday::Mon, (8, 0), (22, 0), false)];
        let result = check_operating_hours(&hours, at(2, 10, 0), at(2, 12, 0));
        let message = result.message.unwrap();
        assert!(message.contains("2026-06-02"), "message was: {}", message);
        assert!(message.contains("Tuesday"), "message was: {}", message);
    }
}
