use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::availability::AvailabilityConflictType;

/// Error types for booking operations
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Booking not found")]
    NotFound,

    #[error("Facility not found: {0}")]
    FacilityNotFound(i32),

    #[error("Customer not found: {0}")]
    CustomerNotFound(i32),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Booking conflict: {message}")]
    Conflict {
        conflict_type: AvailabilityConflictType,
        message: String,
    },

    #[error("Invalid booking state: {0}")]
    InvalidState(String),

    #[error("Concurrent booking attempt, please retry")]
    Concurrency,
}

/// Postgres reports serializable-transaction aborts with SQLSTATE 40001
pub fn is_serialization_failure(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("40001"))
}

impl From<sqlx::Error> for BookingError {
    fn from(err: sqlx::Error) -> Self {
        if is_serialization_failure(&err) {
            return BookingError::Concurrency;
        }
        BookingError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            BookingError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "A database error occurred" }),
                )
            }
            BookingError::NotFound => (
                StatusCode::NOT_FOUND,
                json!({ "error": "Booking not found" }),
            ),
            BookingError::FacilityNotFound(id) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("Facility with id {} not found", id) }),
            ),
            BookingError::CustomerNotFound(id) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("Customer with id {} not found", id) }),
            ),
            BookingError::ValidationError(msg) => {
                (StatusCode::BAD_REQUEST, json!({ "error": msg }))
            }
            BookingError::Conflict {
                conflict_type,
                message,
            } => (
                StatusCode::CONFLICT,
                json!({
                    "error": message,
                    "conflict_type": conflict_type,
                }),
            ),
            BookingError::InvalidState(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            BookingError::Concurrency => (
                StatusCode::CONFLICT,
                json!({ "error": "The slot was taken by a concurrent booking, please retry" }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
