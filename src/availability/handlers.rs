// HTTP handlers for the availability read paths

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::availability::{
    fetch_facility, AvailabilityConflictType, AvailableFacilityItem, BookingCandidate, TimeSlot,
};
use crate::bookings::BookingType;
use crate::error::ApiError;
use crate::models::SportType;

/// Query parameters for GET /api/availability/check
#[derive(Debug, Deserialize, IntoParams)]
pub struct CheckAvailabilityQuery {
    pub facility_id: i32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Capacity semantics to check under; defaults to exclusive use
    pub booking_type: Option<BookingType>,
    pub players_count: Option<i32>,
    /// Booking to ignore, for reschedule previews
    pub exclude_booking_id: Option<Uuid>,
}

/// Response DTO for an availability check
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckAvailabilityResponse {
    pub facility_id: i32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub is_available: bool,
    pub conflict_type: AvailabilityConflictType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Handler for GET /api/availability/check
/// Reports whether a facility is free for an interval, with a typed reason
#[utoipa::path(
    get,
    path = "/api/availability/check",
    params(CheckAvailabilityQuery),
    responses(
        (status = 200, description = "Availability verdict", body = CheckAvailabilityResponse),
        (status = 400, description = "Invalid interval")
    ),
    tag = "availability"
)]
pub async fn check_availability_handler(
    State(state): State<crate::AppState>,
    Query(query): Query<CheckAvailabilityQuery>,
) -> Result<Json<CheckAvailabilityResponse>, ApiError> {
    tracing::debug!(
        "Availability check for facility {}: {} - {}",
        query.facility_id,
        query.start,
        query.end
    );

    if query.start >= query.end {
        return Err(ApiError::BadRequest(
            "Start must be before end".to_string(),
        ));
    }

    if let Some(players) = query.players_count {
        if players < 1 {
            return Err(ApiError::BadRequest(
                "Players count must be at least 1".to_string(),
            ));
        }
    }

    let candidate = BookingCandidate {
        start: query.start,
        end: query.end,
        booking_type: query.booking_type.unwrap_or(BookingType::Exclusive),
        players_count: query.players_count.unwrap_or(1),
        exclude_booking_id: query.exclude_booking_id,
    };

    let verdict = state
        .availability
        .check(query.facility_id, &candidate)
        .await?;

    Ok(Json(CheckAvailabilityResponse {
        facility_id: query.facility_id,
        start: query.start,
        end: query.end,
        is_available: verdict.is_available,
        conflict_type: verdict.conflict_type,
        message: verdict.message,
    }))
}

/// Query parameters for GET /api/availability/search
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchAvailabilityQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub sport_type: Option<SportType>,
    pub min_players: Option<i32>,
}

/// Response DTO for an availability search
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchAvailabilityResponse {
    pub search_start: DateTime<Utc>,
    pub search_end: DateTime<Utc>,
    pub total_available_facilities: usize,
    pub available_facilities: Vec<AvailableFacilityItem>,
}

/// Handler for GET /api/availability/search
/// Lists active facilities free for the interval, cheapest first
#[utoipa::path(
    get,
    path = "/api/availability/search",
    params(SearchAvailabilityQuery),
    responses(
        (status = 200, description = "Available facilities", body = SearchAvailabilityResponse),
        (status = 400, description = "Invalid interval")
    ),
    tag = "availability"
)]
pub async fn search_availability_handler(
    State(state): State<crate::AppState>,
    Query(query): Query<SearchAvailabilityQuery>,
) -> Result<Json<SearchAvailabilityResponse>, ApiError> {
    tracing::info!(
        "Availability search: {} - {}, sport_type: {:?}, min_players: {:?}",
        query.start,
        query.end,
        query.sport_type,
        query.min_players
    );

    if query.start >= query.end {
        return Err(ApiError::BadRequest(
            "Start must be before end".to_string(),
        ));
    }

    if query.start < state.clock.now() {
        return Err(ApiError::BadRequest(
            "Cannot search availability in the past".to_string(),
        ));
    }

    let available = state
        .availability
        .search(query.start, query.end, query.sport_type, query.min_players)
        .await?;

    tracing::info!(
        "Found {} available facilities between {} and {}",
        available.len(),
        query.start,
        query.end
    );

    Ok(Json(SearchAvailabilityResponse {
        search_start: query.start,
        search_end: query.end,
        total_available_facilities: available.len(),
        available_facilities: available,
    }))
}

/// Query parameters for GET /api/facilities/:id/slots
#[derive(Debug, Deserialize, IntoParams)]
pub struct DayScheduleQuery {
    /// Calendar date, e.g. 2026-06-01
    pub date: NaiveDate,
}

/// Response DTO for a facility day schedule
#[derive(Debug, Serialize, ToSchema)]
pub struct DayScheduleResponse {
    pub facility_id: i32,
    pub date: NaiveDate,
    pub slots: Vec<TimeSlot>,
}

/// Handler for GET /api/facilities/:id/slots
/// Enumerates the day's one-hour slots with their status
#[utoipa::path(
    get,
    path = "/api/facilities/{id}/slots",
    params(
        ("id" = i32, Path, description = "Facility ID"),
        DayScheduleQuery
    ),
    responses(
        (status = 200, description = "Classified day schedule", body = DayScheduleResponse),
        (status = 404, description = "Facility not found")
    ),
    tag = "availability"
)]
pub async fn day_schedule_handler(
    State(state): State<crate::AppState>,
    Path(facility_id): Path<i32>,
    Query(query): Query<DayScheduleQuery>,
) -> Result<Json<DayScheduleResponse>, ApiError> {
    tracing::debug!("Day schedule for facility {} on {}", facility_id, query.date);

    let facility = fetch_facility(&state.db, facility_id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "Facility".to_string(),
            id: facility_id.to_string(),
        })?;

    let hours = crate::schedule::fetch_operating_hours(&state.db, facility.id).await?;
    let blocks = crate::schedule::fetch_active_blocks(&state.db, facility.id).await?;
    let bookings = crate::availability::fetch_active_bookings(&state.db, facility.id).await?;

    let slots = crate::availability::day_schedule(
        query.date,
        &hours,
        &bookings,
        &blocks,
        state.clock.now(),
    );

    Ok(Json(DayScheduleResponse {
        facility_id,
        date: query.date,
        slots,
    }))
}
