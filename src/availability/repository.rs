use sqlx::PgExecutor;

use crate::bookings::Booking;
use crate::models::Facility;

/// Fetch a facility by id
///
/// Generic over the executor so the booking write path can re-read the
/// facility inside its serializable transaction.
pub async fn fetch_facility<'e>(
    executor: impl PgExecutor<'e>,
    facility_id: i32,
) -> Result<Option<Facility>, sqlx::Error> {
    sqlx::query_as::<_, Facility>(
        r#"
        SELECT id, name, sport_type, max_players, price_per_hour, is_active,
               min_booking_duration_minutes, max_booking_duration_minutes
        FROM facilities
        WHERE id = $1
        "#,
    )
    .bind(facility_id)
    .fetch_optional(executor)
    .await
}

/// Fetch all active bookings on a facility
///
/// The evaluators apply the overlap and capacity rules in memory, so the
/// query only narrows by facility and status.
pub async fn fetch_active_bookings<'e>(
    executor: impl PgExecutor<'e>,
    facility_id: i32,
) -> Result<Vec<Booking>, sqlx::Error> {
    sqlx::query_as::<_, Booking>(
        r#"
        SELECT id, facility_id, customer_id, start_time, end_time, players_count,
               booking_type, total_price, status, created_at, updated_at, cancelled_at
        FROM bookings
        WHERE facility_id = $1 AND status = 'active'
        ORDER BY start_time
        "#,
    )
    .bind(facility_id)
    .fetch_all(executor)
    .await
}

/// Fetch active facilities, optionally narrowed by sport type and capacity
pub async fn fetch_active_facilities<'e>(
    executor: impl PgExecutor<'e>,
    sport_type: Option<crate::models::SportType>,
    min_players: Option<i32>,
) -> Result<Vec<Facility>, sqlx::Error> {
    sqlx::query_as::<_, Facility>(
        r#"
        SELECT id, name, sport_type, max_players, price_per_hour, is_active,
               min_booking_duration_minutes, max_booking_duration_minutes
        FROM facilities
        WHERE is_active
          AND ($1::text IS NULL OR sport_type = $1)
          AND ($2::int IS NULL OR max_players >= $2)
        ORDER BY id
        "#,
    )
    .bind(sport_type)
    .bind(min_players)
    .fetch_all(executor)
    .await
}
