use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::bookings::BookingType;

/// Why an interval is unavailable
///
/// Mutually exclusive; carried structurally in responses so callers never
/// have to parse messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityConflictType {
    None,
    ExistingBooking,
    TimeBlock,
    OutsideOperatingHours,
    FacilityClosed,
    FacilityInactive,
}

/// Verdict of an availability check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AvailabilityCheckResult {
    pub is_available: bool,
    pub conflict_type: AvailabilityConflictType,
    pub message: Option<String>,
}

impl AvailabilityCheckResult {
    /// The interval is free
    pub fn available() -> Self {
        Self {
            is_available: true,
            conflict_type: AvailabilityConflictType::None,
            message: None,
        }
    }

    /// The interval is taken, with a typed reason
    pub fn unavailable(conflict_type: AvailabilityConflictType, message: impl Into<String>) -> Self {
        Self {
            is_available: false,
            conflict_type,
            message: Some(message.into()),
        }
    }
}

/// A candidate interval being checked for a facility
///
/// Half-open `[start, end)`. The booking type and player count drive the
/// capacity rules; `exclude_booking_id` lets a reschedule ignore itself.
#[derive(Debug, Clone)]
pub struct BookingCandidate {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub booking_type: BookingType,
    pub players_count: i32,
    pub exclude_booking_id: Option<Uuid>,
}

impl BookingCandidate {
    /// Candidate that would take the whole facility
    pub fn exclusive(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            booking_type: BookingType::Exclusive,
            players_count: 1,
            exclude_booking_id: None,
        }
    }
}

/// Classification of a one-hour slot in the day view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimeSlotStatus {
    Available,
    Booked,
    Blocked,
    Past,
}

/// One fixed-width slot in a facility's day schedule
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: TimeSlotStatus,
}
