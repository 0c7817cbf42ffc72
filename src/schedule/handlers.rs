// HTTP handlers for the administrative schedule surface
// (weekly operating hours and time blocks)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::error::ApiError;
use crate::schedule::{
    CreateTimeBlock, OperatingHours, SetOperatingHoursRequest, TimeBlock,
};

/// Ensure a facility exists, for schedule operations attached to one
async fn ensure_facility_exists(pool: &sqlx::PgPool, facility_id: i32) -> Result<(), ApiError> {
    let exists: Option<bool> = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM facilities WHERE id = $1)",
    )
    .bind(facility_id)
    .fetch_one(pool)
    .await?;

    if exists.unwrap_or(false) {
        Ok(())
    } else {
        Err(ApiError::NotFound {
            resource: "Facility".to_string(),
            id: facility_id.to_string(),
        })
    }
}

/// Handler for PUT /api/facilities/:id/operating-hours
/// Replaces the facility's weekly schedule
#[utoipa::path(
    put,
    path = "/api/facilities/{id}/operating-hours",
    params(
        ("id" = i32, Path, description = "Facility ID")
    ),
    request_body = SetOperatingHoursRequest,
    responses(
        (status = 200, description = "Schedule replaced", body = Vec<OperatingHours>),
        (status = 400, description = "Invalid schedule"),
        (status = 404, description = "Facility not found")
    ),
    tag = "schedule"
)]
pub async fn set_operating_hours_handler(
    State(state): State<crate::AppState>,
    Path(facility_id): Path<i32>,
    Json(request): Json<SetOperatingHoursRequest>,
) -> Result<Json<Vec<OperatingHours>>, ApiError> {
    tracing::debug!("Replacing operating hours for facility {}", facility_id);

    request.validate()?;

    // At most one entry per day of week, and open < close on open days
    let mut seen_days = [false; 7];
    for entry in &request.entries {
        if !(0..=6).contains(&entry.day_of_week) {
            return Err(ApiError::BadRequest(format!(
                "Day of week must be 0-6, got {}",
                entry.day_of_week
            )));
        }
        let day = entry.day_of_week as usize;
        if seen_days[day] {
            return Err(ApiError::BadRequest(format!(
                "Duplicate entry for day of week {}",
                entry.day_of_week
            )));
        }
        seen_days[day] = true;

        if !entry.is_closed && entry.open_time >= entry.close_time {
            return Err(ApiError::BadRequest(format!(
                "Open time must be before close time for day {}",
                entry.day_of_week
            )));
        }
    }

    ensure_facility_exists(&state.db, facility_id).await?;

    let saved = state
        .schedule_repo
        .replace_operating_hours(facility_id, &request.entries)
        .await?;

    tracing::info!(
        "Replaced operating hours for facility {} with {} entries",
        facility_id,
        saved.len()
    );
    Ok(Json(saved))
}

/// Handler for GET /api/facilities/:id/operating-hours
#[utoipa::path(
    get,
    path = "/api/facilities/{id}/operating-hours",
    params(
        ("id" = i32, Path, description = "Facility ID")
    ),
    responses(
        (status = 200, description = "Weekly schedule", body = Vec<OperatingHours>),
        (status = 404, description = "Facility not found")
    ),
    tag = "schedule"
)]
pub async fn get_operating_hours_handler(
    State(state): State<crate::AppState>,
    Path(facility_id): Path<i32>,
) -> Result<Json<Vec<OperatingHours>>, ApiError> {
    ensure_facility_exists(&state.db, facility_id).await?;

    let hours = state.schedule_repo.operating_hours(facility_id).await?;
    Ok(Json(hours))
}

/// Handler for POST /api/facilities/:id/time-blocks
/// Creates an administrative block; overlapping active blocks are rejected
#[utoipa::path(
    post,
    path = "/api/facilities/{id}/time-blocks",
    params(
        ("id" = i32, Path, description = "Facility ID")
    ),
    request_body = CreateTimeBlock,
    responses(
        (status = 201, description = "Time block created", body = TimeBlock),
        (status = 400, description = "Invalid interval"),
        (status = 404, description = "Facility not found"),
        (status = 409, description = "Overlaps an existing active block")
    ),
    tag = "schedule"
)]
pub async fn create_time_block_handler(
    State(state): State<crate::AppState>,
    Path(facility_id): Path<i32>,
    Json(request): Json<CreateTimeBlock>,
) -> Result<(StatusCode, Json<TimeBlock>), ApiError> {
    tracing::debug!(
        "Creating {} block for facility {}: {} - {}",
        request.block_type,
        facility_id,
        request.start_time,
        request.end_time
    );

    request.validate()?;

    if request.start_time >= request.end_time {
        return Err(ApiError::BadRequest(
            "Start time must be before end time".to_string(),
        ));
    }

    ensure_facility_exists(&state.db, facility_id).await?;

    // No two active blocks may overlap on the same facility
    if state
        .schedule_repo
        .has_overlapping_active_block(facility_id, request.start_time, request.end_time)
        .await?
    {
        tracing::warn!(
            "Rejected overlapping time block on facility {}: {} - {}",
            facility_id,
            request.start_time,
            request.end_time
        );
        return Err(ApiError::Conflict {
            message: "An active time block already exists in this interval".to_string(),
        });
    }

    let block = state
        .schedule_repo
        .create_time_block(
            facility_id,
            request.block_type,
            request.start_time,
            request.end_time,
            request.reason.as_deref(),
        )
        .await?;

    tracing::info!("Created time block {} on facility {}", block.id, facility_id);
    Ok((StatusCode::CREATED, Json(block)))
}

/// Handler for GET /api/facilities/:id/time-blocks
#[utoipa::path(
    get,
    path = "/api/facilities/{id}/time-blocks",
    params(
        ("id" = i32, Path, description = "Facility ID")
    ),
    responses(
        (status = 200, description = "Active time blocks", body = Vec<TimeBlock>),
        (status = 404, description = "Facility not found")
    ),
    tag = "schedule"
)]
pub async fn get_time_blocks_handler(
    State(state): State<crate::AppState>,
    Path(facility_id): Path<i32>,
) -> Result<Json<Vec<TimeBlock>>, ApiError> {
    ensure_facility_exists(&state.db, facility_id).await?;

    let blocks = state.schedule_repo.active_blocks(facility_id).await?;
    Ok(Json(blocks))
}

/// Handler for DELETE /api/time-blocks/:id
/// Deactivates a block rather than deleting the row
#[utoipa::path(
    delete,
    path = "/api/time-blocks/{id}",
    params(
        ("id" = i32, Path, description = "Time block ID")
    ),
    responses(
        (status = 204, description = "Time block deactivated"),
        (status = 404, description = "Active time block not found")
    ),
    tag = "schedule"
)]
pub async fn delete_time_block_handler(
    State(state): State<crate::AppState>,
    Path(block_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let deactivated = state.schedule_repo.deactivate_time_block(block_id).await?;

    if !deactivated {
        return Err(ApiError::NotFound {
            resource: "TimeBlock".to_string(),
            id: block_id.to_string(),
        });
    }

    tracing::info!("Deactivated time block {}", block_id);
    Ok(StatusCode::NO_CONTENT)
}
