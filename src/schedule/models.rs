use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Weekly open/close entry for one facility and one day of the week
///
/// `day_of_week` is stored as 0 = Sunday through 6 = Saturday. A facility
/// with no entries at all is treated as open 24/7; a missing entry on a
/// facility that has any is treated as closed that day.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OperatingHours {
    pub id: i32,
    pub facility_id: i32,
    pub day_of_week: i16,
    #[schema(value_type = String, example = "08:00:00")]
    pub open_time: NaiveTime,
    #[schema(value_type = String, example = "22:00:00")]
    pub close_time: NaiveTime,
    pub is_closed: bool,
}

impl OperatingHours {
    /// Whether this entry applies to the given weekday
    pub fn applies_to(&self, weekday: Weekday) -> bool {
        self.day_of_week == weekday_index(weekday)
    }
}

/// Map a chrono weekday onto the stored 0 = Sunday index
pub fn weekday_index(weekday: Weekday) -> i16 {
    weekday.num_days_from_sunday() as i16
}

/// Full English day name, for availability messages
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// One day's entry in a set-operating-hours request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct OperatingHoursItem {
    #[validate(range(min = 0, max = 6, message = "Day of week must be 0 (Sunday) through 6 (Saturday)"))]
    pub day_of_week: i16,
    #[schema(value_type = String, example = "08:00:00")]
    pub open_time: NaiveTime,
    #[schema(value_type = String, example = "22:00:00")]
    pub close_time: NaiveTime,
    #[serde(default)]
    pub is_closed: bool,
}

/// Request DTO replacing a facility's weekly schedule
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetOperatingHoursRequest {
    #[validate(length(min = 1, message = "At least one day entry is required"))]
    pub entries: Vec<OperatingHoursItem>,
}

/// Category of an administrative time block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    Maintenance,
    SpecialEvent,
    Holiday,
    Other,
}

impl BlockType {
    /// Display name used in conflict messages
    pub fn display_name(&self) -> &'static str {
        match self {
            BlockType::Maintenance => "Maintenance break",
            BlockType::SpecialEvent => "Special event",
            BlockType::Holiday => "Holiday",
            BlockType::Other => "Other",
        }
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Administrative reservation that blocks customer bookings
///
/// Half-open interval `[start_time, end_time)`; only active blocks
/// participate in availability checks.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TimeBlock {
    pub id: i32,
    pub facility_id: i32,
    pub block_type: BlockType,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub reason: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Request DTO for creating a time block
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTimeBlock {
    pub block_type: BlockType,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[validate(length(max = 500, message = "Reason must be at most 500 characters"))]
    pub reason: Option<String>,
}
