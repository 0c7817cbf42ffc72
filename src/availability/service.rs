// Availability checker
//
// Orchestrates the three evaluators in a fixed priority order and produces
// a single verdict with a typed conflict reason.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;

use crate::availability::{
    check_booking_conflicts, check_operating_hours, check_time_blocks, fetch_active_bookings,
    fetch_active_facilities, fetch_facility, AvailabilityCheckResult, AvailabilityConflictType,
    BookingCandidate,
};
use crate::bookings::{Booking, PriceCalculator};
use crate::models::{Facility, SportType};
use crate::schedule::{fetch_active_blocks, fetch_operating_hours, OperatingHours, TimeBlock};

/// Evaluate a candidate against a snapshot of the facility's state
///
/// Pure function shared by the read path (`AvailabilityService::check`) and
/// the booking write path, which re-runs it inside its serializable
/// transaction. Fixed short-circuit order: structural unavailability
/// (inactive, closed) is reported before transient unavailability (blocks,
/// other bookings), so callers get stable, deterministic reasons.
pub fn evaluate(
    facility: Option<&Facility>,
    operating_hours: &[OperatingHours],
    blocks: &[TimeBlock],
    bookings: &[Booking],
    candidate: &BookingCandidate,
) -> AvailabilityCheckResult {
    // 1. Facility must exist and be active
    let facility = match facility {
        None => {
            return AvailabilityCheckResult::unavailable(
                AvailabilityConflictType::FacilityInactive,
                "Facility does not exist",
            );
        }
        Some(f) if !f.is_active => {
            return AvailabilityCheckResult::unavailable(
                AvailabilityConflictType::FacilityInactive,
                "Facility is inactive",
            );
        }
        Some(f) => f,
    };

    // 2. Operating hours for every day the interval touches
    let hours_check = check_operating_hours(operating_hours, candidate.start, candidate.end);
    if !hours_check.is_available {
        return hours_check;
    }

    // 3. Administrative time blocks
    let block_check = check_time_blocks(blocks, candidate.start, candidate.end);
    if !block_check.is_available {
        return block_check;
    }

    // 4. Other active bookings, honoring booking-type capacity rules
    check_booking_conflicts(bookings, facility.max_players, candidate)
}

/// One facility in a search-availability response
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailableFacilityItem {
    pub facility_id: i32,
    pub name: String,
    pub sport_type: SportType,
    pub max_players: i32,
    #[schema(value_type = f64)]
    pub price_per_hour: Decimal,
    #[schema(value_type = f64)]
    pub total_price: Decimal,
    pub min_booking_duration_minutes: i32,
    pub max_booking_duration_minutes: i32,
}

/// Service for availability checks and searches
#[derive(Clone)]
pub struct AvailabilityService {
    pool: PgPool,
}

impl AvailabilityService {
    /// Create a new AvailabilityService
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Check whether a facility is free for a candidate interval
    pub async fn check(
        &self,
        facility_id: i32,
        candidate: &BookingCandidate,
    ) -> Result<AvailabilityCheckResult, sqlx::Error> {
        let facility = fetch_facility(&self.pool, facility_id).await?;

        // Short-circuit before the remaining fetches when the facility
        // itself already fails the check
        let structurally_ok = matches!(&facility, Some(f) if f.is_active);
        if !structurally_ok {
            return Ok(evaluate(facility.as_ref(), &[], &[], &[], candidate));
        }

        let hours = fetch_operating_hours(&self.pool, facility_id).await?;
        let blocks = fetch_active_blocks(&self.pool, facility_id).await?;
        let bookings = fetch_active_bookings(&self.pool, facility_id).await?;

        Ok(evaluate(facility.as_ref(), &hours, &blocks, &bookings, candidate))
    }

    /// Find active facilities free for an interval
    ///
    /// Facilities whose duration bounds reject the interval are skipped.
    /// Results carry the computed total price and are ordered by hourly
    /// price ascending.
    pub async fn search(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        sport_type: Option<SportType>,
        min_players: Option<i32>,
    ) -> Result<Vec<AvailableFacilityItem>, sqlx::Error> {
        let facilities = fetch_active_facilities(&self.pool, sport_type, min_players).await?;
        let duration_minutes = (end - start).num_minutes();

        let mut available = Vec::new();
        for facility in facilities {
            if duration_minutes < facility.min_booking_duration_minutes as i64
                || duration_minutes > facility.max_booking_duration_minutes as i64
            {
                tracing::debug!(
                    "Facility {} skipped: duration {} min outside [{}, {}]",
                    facility.name,
                    duration_minutes,
                    facility.min_booking_duration_minutes,
                    facility.max_booking_duration_minutes
                );
                continue;
            }

            let verdict = self
                .check(facility.id, &BookingCandidate::exclusive(start, end))
                .await?;

            if verdict.is_available {
                available.push(AvailableFacilityItem {
                    facility_id: facility.id,
                    name: facility.name,
                    sport_type: facility.sport_type,
                    max_players: facility.max_players,
                    price_per_hour: facility.price_per_hour,
                    total_price: PriceCalculator::booking_price(start, end, facility.price_per_hour),
                    min_booking_duration_minutes: facility.min_booking_duration_minutes,
                    max_booking_duration_minutes: facility.max_booking_duration_minutes,
                });
            }
        }

        available.sort_by(|a, b| a.price_per_hour.cmp(&b.price_per_hour));
        Ok(available)
    }
}
