// Booking overlap evaluator
//
// Applies the booking-type capacity semantics: exclusive bookings occupy
// the whole facility, group classes share it up to the player capacity.

use crate::availability::{overlaps, AvailabilityCheckResult, AvailabilityConflictType, BookingCandidate};
use crate::bookings::{Booking, BookingStatus, BookingType};

/// Check a candidate against the facility's other active bookings
///
/// Only active bookings participate; the candidate's own booking (when
/// rescheduling) is excluded via `candidate.exclude_booking_id`.
pub fn check_booking_conflicts(
    bookings: &[Booking],
    max_players: i32,
    candidate: &BookingCandidate,
) -> AvailabilityCheckResult {
    let overlapping: Vec<&Booking> = bookings
        .iter()
        .filter(|b| b.status == BookingStatus::Active)
        .filter(|b| candidate.exclude_booking_id != Some(b.id))
        .filter(|b| overlaps(b.start_time, b.end_time, candidate.start, candidate.end))
        .collect();

    match candidate.booking_type {
        BookingType::Exclusive => {
            // Exclusive use collides with any overlapping active booking
            if let Some(other) = overlapping.first() {
                return AvailabilityCheckResult::unavailable(
                    AvailabilityConflictType::ExistingBooking,
                    format!(
                        "Facility is already booked in this interval ({} - {})",
                        other.start_time.format("%Y-%m-%d %H:%M"),
                        other.end_time.format("%Y-%m-%d %H:%M")
                    ),
                );
            }
        }
        BookingType::GroupClass => {
            // An overlapping exclusive booking always wins
            if let Some(exclusive) = overlapping
                .iter()
                .find(|b| b.booking_type == BookingType::Exclusive)
            {
                return AvailabilityCheckResult::unavailable(
                    AvailabilityConflictType::ExistingBooking,
                    format!(
                        "Facility is exclusively booked in this interval ({} - {})",
                        exclusive.start_time.format("%Y-%m-%d %H:%M"),
                        exclusive.end_time.format("%Y-%m-%d %H:%M")
                    ),
                );
            }

            // Other group classes share the facility up to max_players.
            // Summed in i64 so an oversized requested count cannot overflow
            let used_places: i64 = overlapping
                .iter()
                .filter(|b| b.booking_type == BookingType::GroupClass)
                .map(|b| b.players_count as i64)
                .sum();

            if used_places + candidate.players_count as i64 > max_players as i64 {
                return AvailabilityCheckResult::unavailable(
                    AvailabilityConflictType::ExistingBooking,
                    format!(
                        "Not enough available places in this interval ({} of {} taken)",
                        used_places, max_players
                    ),
                );
            }
        }
    }

    AvailabilityCheckResult::available()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, h, m, 0).unwrap()
    }

    fn booking(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        booking_type: BookingType,
        players: i32,
        status: BookingStatus,
    ) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            facility_id: 1,
            customer_id: 1,
            start_time: start,
            end_time: end,
            players_count: players,
            booking_type,
            total_price: dec!(100),
            status,
            created_at: at(0, 0),
            updated_at: at(0, 0),
            cancelled_at: None,
        }
    }

    fn exclusive_candidate(start: DateTime<Utc>, end: DateTime<Utc>) -> BookingCandidate {
        BookingCandidate::exclusive(start, end)
    }

    fn group_candidate(start: DateTime<Utc>, end: DateTime<Utc>, players: i32) -> BookingCandidate {
        BookingCandidate {
            start,
            end,
            booking_type: BookingType::GroupClass,
            players_count: players,
            exclude_booking_id: None,
        }
    }

    #[test]
    fn empty_schedule_is_available() {
        let result = check_booking_conflicts(&[], 4, &exclusive_candidate(at(10, 0), at(12, 0)));
        assert!(result.is_available);
    }

    #[test]
    fn exclusive_collides_with_overlapping_exclusive() {
        let existing = vec![booking(at(10, 0), at(12, 0), BookingType::Exclusive, 1, BookingStatus::Active)];
        let result = check_booking_conflicts(&existing, 4, &exclusive_candidate(at(11, 0), at(13, 0)));
        assert!(!result.is_available);
        assert_eq!(result.conflict_type, AvailabilityConflictType::ExistingBooking);
    }

    #[test]
    fn exclusive_collides_with_overlapping_group_class() {
        let existing = vec![booking(at(10, 0), at(12, 0), BookingType::GroupClass, 2, BookingStatus::Active)];
        let result = check_booking_conflicts(&existing, 4, &exclusive_candidate(at(11, 0), at(13, 0)));
        assert!(!result.is_available);
    }

    #[test]
    fn group_class_rejected_under_overlapping_exclusive() {
        let existing = vec![booking(at(10, 0), at(12, 0), BookingType::Exclusive, 1, BookingStatus::Active)];
        let result = check_booking_conflicts(&existing, 4, &group_candidate(at(11, 0), at(13, 0), 1));
        assert!(!result.is_available);
        assert_eq!(result.conflict_type, AvailabilityConflictType::ExistingBooking);
    }

    #[test]
    fn group_classes_share_capacity() {
        let existing = vec![booking(at(10, 0), at(12, 0), BookingType::GroupClass, 2, BookingStatus::Active)];
        // 2 taken of 4, requesting 2 more fits exactly
        let result = check_booking_conflicts(&existing, 4, &group_candidate(at(10, 0), at(12, 0), 2));
        assert!(result.is_available);
    }

    #[test]
    fn group_class_over_capacity_is_rejected() {
        let existing = vec![
            booking(at(10, 0), at(12, 0), BookingType::GroupClass, 2, BookingStatus::Active),
            booking(at(11, 0), at(13, 0), BookingType::GroupClass, 1, BookingStatus::Active),
        ];
        // 3 taken of 4, requesting 2 overflows
        let result = check_booking_conflicts(&existing, 4, &group_candidate(at(11, 0), at(12, 0), 2));
        assert!(!result.is_available);
        let message = result.message.unwrap();
        assert!(message.contains("Not enough available places"), "message was: {}", message);
    }

    #[test]
    fn canceled_bookings_never_collide() {
        let existing = vec![booking(at(10, 0), at(12, 0), BookingType::Exclusive, 1, BookingStatus::Canceled)];
        let result = check_booking_conflicts(&existing, 4, &exclusive_candidate(at(10, 0), at(12, 0)));
        assert!(result.is_available);
    }

    #[test]
    fn touching_bookings_never_collide() {
        let existing = vec![booking(at(10, 0), at(12, 0), BookingType::Exclusive, 1, BookingStatus::Active)];
        let result = check_booking_conflicts(&existing, 4, &exclusive_candidate(at(12, 0), at(14, 0)));
        assert!(result.is_available);
    }

    #[test]
    fn excluded_booking_does_not_collide_with_itself() {
        let existing = vec![booking(at(10, 0), at(12, 0), BookingType::Exclusive, 1, BookingStatus::Active)];
        let mut candidate = exclusive_candidate(at(10, 0), at(11, 0));
        candidate.exclude_booking_id = Some(existing[0].id);
        let result = check_booking_conflicts(&existing, 4, &candidate);
        assert!(result.is_available, "a booking being shortened must not collide with itself");
    }

    #[test]
    fn oversized_players_count_is_rejected_without_overflow() {
        // A request straight off the wire can carry any i32; the capacity
        // sum must reject it rather than wrap
        let existing = vec![booking(at(10, 0), at(12, 0), BookingType::GroupClass, 2, BookingStatus::Active)];
        let result = check_booking_conflicts(&existing, 4, &group_candidate(at(10, 0), at(12, 0), i32::MAX));
        assert!(!result.is_available);
        assert_eq!(result.conflict_type, AvailabilityConflictType::ExistingBooking);
    }

    #[test]
    fn non_overlapping_group_classes_do_not_consume_capacity() {
        let existing = vec![booking(at(8, 0), at(10, 0), BookingType::GroupClass, 4, BookingStatus::Active)];
        let result = check_booking_conflicts(&existing, 4, &group_candidate(at(10, 0), at(12, 0), 4));
        assert!(result.is_available);
    }
}
