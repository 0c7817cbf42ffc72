// Slot enumerator
//
// Reporting view over a single facility day: fixed one-hour slots, each
// classified against the clock, active bookings, and active time blocks.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};

use crate::availability::{overlaps, TimeSlot, TimeSlotStatus};
use crate::bookings::{Booking, BookingStatus};
use crate::schedule::{OperatingHours, TimeBlock};

/// Default day window used when the facility has no entry for a weekday
pub const DEFAULT_OPEN_HOUR: u32 = 8;
pub const DEFAULT_CLOSE_HOUR: u32 = 22;

/// Restartable iterator over a day's fixed one-hour slots
///
/// Yields half-open `[start, start + 1h)` intervals from the open time up
/// to the close time; a partial trailing hour is not emitted.
#[derive(Debug, Clone)]
pub struct DaySlots {
    next_start: DateTime<Utc>,
    close: DateTime<Utc>,
}

impl DaySlots {
    pub fn new(date: NaiveDate, open: NaiveTime, close: NaiveTime) -> Self {
        Self {
            next_start: date.and_time(open).and_utc(),
            close: date.and_time(close).and_utc(),
        }
    }
}

impl Iterator for DaySlots {
    type Item = (DateTime<Utc>, DateTime<Utc>);

    fn next(&mut self) -> Option<Self::Item> {
        let end = self.next_start + Duration::hours(1);
        if end > self.close {
            return None;
        }
        let slot = (self.next_start, end);
        self.next_start = end;
        Some(slot)
    }
}

/// Classify one slot, in priority order: Past, Booked, Blocked, Available
///
/// Uses the same half-open overlap rule as the availability evaluators,
/// but classifies instead of rejecting.
pub fn classify_slot(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    now: DateTime<Utc>,
    bookings: &[Booking],
    blocks: &[TimeBlock],
) -> TimeSlotStatus {
    if start < now {
        return TimeSlotStatus::Past;
    }

    let booked = bookings
        .iter()
        .filter(|b| b.status == BookingStatus::Active)
        .any(|b| overlaps(b.start_time, b.end_time, start, end));
    if booked {
        return TimeSlotStatus::Booked;
    }

    let blocked = blocks
        .iter()
        .filter(|b| b.is_active)
        .any(|b| overlaps(b.start_time, b.end_time, start, end));
    if blocked {
        return TimeSlotStatus::Blocked;
    }

    TimeSlotStatus::Available
}

/// Build the classified schedule for one facility day
///
/// The day window comes from the facility's operating-hours entry for that
/// weekday, falling back to 08:00-22:00 when no entry exists. A day marked
/// closed yields no slots.
pub fn day_schedule(
    date: NaiveDate,
    operating_hours: &[OperatingHours],
    bookings: &[Booking],
    blocks: &[TimeBlock],
    now: DateTime<Utc>,
) -> Vec<TimeSlot> {
    let entry = operating_hours.iter().find(|h| h.applies_to(date.weekday()));

    let (open, close) = match entry {
        Some(entry) if entry.is_closed => return Vec::new(),
        Some(entry) => (entry.open_time, entry.close_time),
        None => {
            let open = NaiveTime::from_hms_opt(DEFAULT_OPEN_HOUR, 0, 0)
                .unwrap_or(NaiveTime::MIN);
            let close = NaiveTime::from_hms_opt(DEFAULT_CLOSE_HOUR, 0, 0)
                .unwrap_or(NaiveTime::MIN);
            (open, close)
        }
    };

    DaySlots::new(date, open, close)
        .map(|(start, end)| TimeSlot {
            start,
            end,
            status: classify_slot(start, end, now, bookings, blocks),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use uuid::Uuid;
    use crate::bookings::BookingType;
    use crate::schedule::{weekday_index, BlockType};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, h, m, 0).unwrap()
    }

    fn active_booking(start: DateTime<Utc>, end: DateTime<Utc>) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            facility_id: 1,
            customer_id: 1,
            start_time: start,
            end_time: end,
            players_count: 1,
            booking_type: BookingType::Exclusive,
            total_price: dec!(100),
            status: BookingStatus::Active,
            created_at: at(0, 0),
            updated_at: at(0, 0),
            cancelled_at: None,
        }
    }

    fn active_block(start: DateTime<Utc>, end: DateTime<Utc>) -> TimeBlock {
        TimeBlock {
            id: 1,
            facility_id: 1,
            block_type: BlockType::Maintenance,
            start_time: start,
            end_time: end,
            reason: None,
            is_active: true,
            created_at: at(0, 0),
        }
    }

    #[test]
    fn default_window_yields_fourteen_slots() {
        let slots = day_schedule(date(), &[], &[], &[], at(0, 0));
        assert_eq!(slots.len(), 14);
        assert_eq!(slots[0].start, at(8, 0));
        assert_eq!(slots[13].end, at(22, 0));
    }

    #[test]
    fn closed_day_yields_no_slots() {
        let hours = vec![OperatingHours {
            id: 1,
            facility_id: 1,
            day_of_week: weekday_index(chrono::Weekday::Mon),
            open_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            close_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            is_closed: true,
        }];
        let slots = day_schedule(date(), &hours, &[], &[], at(0, 0));
        assert!(slots.is_empty());
    }

    #[test]
    fn day_slots_iterator_is_restartable() {
        let open = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        let close = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        let iter = DaySlots::new(date(), open, close);
        let first: Vec<_> = iter.clone().collect();
        let second: Vec<_> = iter.collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn partial_trailing_hour_is_not_emitted() {
        let open = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        let close = NaiveTime::from_hms_opt(10, 30, 0).unwrap();
        let slots: Vec<_> = DaySlots::new(date(), open, close).collect();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[1].1, at(10, 0));
    }

    #[test]
    fn past_slots_are_marked_past_first() {
        // A booked slot before "now" still reads as Past
        let bookings = vec![active_booking(at(8, 0), at(10, 0))];
        let slots = day_schedule(date(), &[], &bookings, &[], at(12, 0));
        assert_eq!(slots[0].status, TimeSlotStatus::Past);
        assert_eq!(slots[3].status, TimeSlotStatus::Past);
        assert_eq!(slots[4].status, TimeSlotStatus::Available);
    }

    #[test]
    fn booked_wins_over_blocked() {
        let bookings = vec![active_booking(at(10, 0), at(11, 0))];
        let blocks = vec![active_block(at(10, 0), at(11, 0))];
        let slots = day_schedule(date(), &[], &bookings, &blocks, at(0, 0));
        // 10:00 slot is index 2 within the 08:00-22:00 window
        assert_eq!(slots[2].status, TimeSlotStatus::Booked);
    }

    #[test]
    fn blocked_slot_is_marked_blocked() {
        let blocks = vec![active_block(at(9, 0), at(11, 0))];
        let slots = day_schedule(date(), &[], &[], &blocks, at(0, 0));
        assert_eq!(slots[0].status, TimeSlotStatus::Available);
        assert_eq!(slots[1].status, TimeSlotStatus::Blocked);
        assert_eq!(slots[2].status, TimeSlotStatus::Blocked);
        assert_eq!(slots[3].status, TimeSlotStatus::Available);
    }

    #[test]
    fn canceled_booking_leaves_slot_available() {
        let mut booking = active_booking(at(10, 0), at(11, 0));
        booking.status = BookingStatus::Canceled;
        let slots = day_schedule(date(), &[], &[booking], &[], at(0, 0));
        assert_eq!(slots[2].status, TimeSlotStatus::Available);
    }

    #[test]
    fn booking_touching_slot_end_does_not_mark_it() {
        // Booking starts exactly when the slot ends
        let bookings = vec![active_booking(at(11, 0), at(12, 0))];
        let slots = day_schedule(date(), &[], &bookings, &[], at(0, 0));
        assert_eq!(slots[2].status, TimeSlotStatus::Available); // 10:00-11:00
        assert_eq!(slots[3].status, TimeSlotStatus::Booked); // 11:00-12:00
    }
}
