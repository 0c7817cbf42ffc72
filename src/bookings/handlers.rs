// HTTP handlers for the booking lifecycle

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::bookings::{
    Booking, BookingError, CancelBookingResponse, CancellationResult, CreateBookingRequest,
    UpdateBookingRequest,
};

/// Handler for POST /api/bookings
/// Creates a booking after running the full conflict evaluation
#[utoipa::path(
    post,
    path = "/api/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = Booking),
        (status = 400, description = "Invalid booking request"),
        (status = 404, description = "Facility or customer not found"),
        (status = 409, description = "Slot unavailable")
    ),
    tag = "bookings"
)]
pub async fn create_booking_handler(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), BookingError> {
    request
        .validate()
        .map_err(|e| BookingError::ValidationError(e.to_string()))?;

    let booking = state.booking_service.create(&request).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// Handler for GET /api/bookings/:id
#[utoipa::path(
    get,
    path = "/api/bookings/{id}",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking found", body = Booking),
        (status = 404, description = "Booking not found")
    ),
    tag = "bookings"
)]
pub async fn get_booking_handler(
    State(state): State<crate::AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Booking>, BookingError> {
    let booking = state
        .bookings_repo
        .find_by_id(booking_id)
        .await?
        .ok_or(BookingError::NotFound)?;
    Ok(Json(booking))
}

/// Query parameters for GET /api/bookings
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListBookingsQuery {
    pub customer_id: i32,
}

/// Handler for GET /api/bookings
/// Lists a customer's bookings, newest start first
#[utoipa::path(
    get,
    path = "/api/bookings",
    params(ListBookingsQuery),
    responses(
        (status = 200, description = "Customer's bookings", body = [Booking]),
        (status = 404, description = "Customer not found")
    ),
    tag = "bookings"
)]
pub async fn list_bookings_handler(
    State(state): State<crate::AppState>,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<Vec<Booking>>, BookingError> {
    if !state.bookings_repo.customer_exists(query.customer_id).await? {
        return Err(BookingError::CustomerNotFound(query.customer_id));
    }
    let bookings = state.bookings_repo.find_by_customer(query.customer_id).await?;
    Ok(Json(bookings))
}

/// Handler for PUT /api/bookings/:id
/// Reschedules an active booking; its own slot never conflicts with itself
#[utoipa::path(
    put,
    path = "/api/bookings/{id}",
    params(("id" = Uuid, Path, description = "Booking ID")),
    request_body = UpdateBookingRequest,
    responses(
        (status = 200, description = "Booking rescheduled", body = Booking),
        (status = 400, description = "Invalid booking request"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "New slot unavailable or booking not active")
    ),
    tag = "bookings"
)]
pub async fn update_booking_handler(
    State(state): State<crate::AppState>,
    Path(booking_id): Path<Uuid>,
    Json(request): Json<UpdateBookingRequest>,
) -> Result<Json<Booking>, BookingError> {
    request
        .validate()
        .map_err(|e| BookingError::ValidationError(e.to_string()))?;

    let booking = state.booking_service.update(booking_id, &request).await?;
    Ok(Json(booking))
}

/// Handler for POST /api/bookings/:id/cancel
/// Idempotent cancellation with a cutoff before the booking starts
#[utoipa::path(
    post,
    path = "/api/bookings/{id}/cancel",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Cancelled (or already cancelled)", body = CancelBookingResponse),
        (status = 404, description = "Booking not found", body = CancelBookingResponse),
        (status = 409, description = "Too late to cancel", body = CancelBookingResponse)
    ),
    tag = "bookings"
)]
pub async fn cancel_booking_handler(
    State(state): State<crate::AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<(StatusCode, Json<CancelBookingResponse>), BookingError> {
    let response = state.booking_service.cancel(booking_id).await?;

    let status = match response.result {
        CancellationResult::Success | CancellationResult::AlreadyCancelled => StatusCode::OK,
        CancellationResult::NotFound => StatusCode::NOT_FOUND,
        CancellationResult::TooLateToCancel => StatusCode::CONFLICT,
    };
    Ok((status, Json(response)))
}
