use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Booking status enum representing the lifecycle of a booking
///
/// `Active` is the only live state; `Canceled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Active,
    Canceled,
}

impl BookingStatus {
    /// Convert status to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Active => "active",
            BookingStatus::Canceled => "canceled",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a booking occupies a facility
///
/// `Exclusive` reserves the whole facility; `GroupClass` shares it with
/// other group classes up to the facility's player capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingType {
    Exclusive,
    GroupClass,
}

impl BookingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingType::Exclusive => "exclusive",
            BookingType::GroupClass => "group_class",
        }
    }
}

impl std::fmt::Display for BookingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of a cancellation attempt
///
/// Success-shaped even for `AlreadyCancelled`: cancelling twice is safe and
/// the two calls return distinguishable results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CancellationResult {
    Success,
    NotFound,
    AlreadyCancelled,
    TooLateToCancel,
}

/// Domain model representing a booking in the database
///
/// Interval is half-open `[start_time, end_time)` with `end > start`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Booking {
    pub id: Uuid,
    pub facility_id: i32,
    pub customer_id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub players_count: i32,
    pub booking_type: BookingType,
    #[schema(value_type = f64)]
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

/// Request DTO for creating a booking
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    pub facility_id: i32,
    pub customer_id: i32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[validate(range(min = 1, message = "Players count must be at least 1"))]
    pub players_count: i32,
    pub booking_type: BookingType,
}

/// Request DTO for rescheduling a booking
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBookingRequest {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[validate(range(min = 1, message = "Players count must be at least 1"))]
    pub players_count: i32,
}

/// Response DTO for a cancellation attempt
#[derive(Debug, Serialize, ToSchema)]
pub struct CancelBookingResponse {
    pub booking_id: Uuid,
    pub result: CancellationResult,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
}
