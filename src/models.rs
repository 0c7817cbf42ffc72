use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Sport category a facility is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SportType {
    Tennis,
    Football,
    Padel,
    Squash,
    Badminton,
}

impl SportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SportType::Tennis => "tennis",
            SportType::Football => "football",
            SportType::Padel => "padel",
            SportType::Squash => "squash",
            SportType::Badminton => "badminton",
        }
    }
}

impl std::fmt::Display for SportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Domain model representing a bookable facility (court/field)
///
/// Read-only to the availability and booking engine; mutated only through
/// the administrative CRUD endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Facility {
    pub id: i32,
    pub name: String,
    pub sport_type: SportType,
    pub max_players: i32,
    #[schema(value_type = f64)]
    pub price_per_hour: Decimal,
    pub is_active: bool,
    pub min_booking_duration_minutes: i32,
    pub max_booking_duration_minutes: i32,
}

/// Request DTO for creating a facility
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFacility {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    pub sport_type: SportType,
    #[validate(range(min = 1, message = "Max players must be at least 1"))]
    pub max_players: i32,
    #[schema(value_type = f64)]
    pub price_per_hour: Decimal,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default = "default_min_duration")]
    #[validate(range(min = 1, message = "Minimum booking duration must be positive"))]
    pub min_booking_duration_minutes: i32,
    #[serde(default = "default_max_duration")]
    #[validate(range(min = 1, message = "Maximum booking duration must be positive"))]
    pub max_booking_duration_minutes: i32,
}

fn default_true() -> bool {
    true
}

fn default_min_duration() -> i32 {
    30
}

fn default_max_duration() -> i32 {
    480
}

/// Request DTO for updating a facility; omitted fields keep current values
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateFacility {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    pub sport_type: Option<SportType>,
    #[validate(range(min = 1, message = "Max players must be at least 1"))]
    pub max_players: Option<i32>,
    #[schema(value_type = f64)]
    pub price_per_hour: Option<Decimal>,
    pub is_active: Option<bool>,
    #[validate(range(min = 1, message = "Minimum booking duration must be positive"))]
    pub min_booking_duration_minutes: Option<i32>,
    #[validate(range(min = 1, message = "Maximum booking duration must be positive"))]
    pub max_booking_duration_minutes: Option<i32>,
}

/// Domain model representing a customer
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Customer {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Request DTO for registering a customer
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCustomer {
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}
