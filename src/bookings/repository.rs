use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::bookings::{Booking, BookingStatus, BookingType};

/// Fetch a booking by id
///
/// Generic over the executor so the write paths can re-read the row inside
/// their serializable transactions.
pub async fn fetch_booking<'e>(
    executor: impl PgExecutor<'e>,
    booking_id: Uuid,
) -> Result<Option<Booking>, sqlx::Error> {
    sqlx::query_as::<_, Booking>(
        r#"
        SELECT id, facility_id, customer_id, start_time, end_time, players_count,
               booking_type, total_price, status, created_at, updated_at, cancelled_at
        FROM bookings
        WHERE id = $1
        "#,
    )
    .bind(booking_id)
    .fetch_optional(executor)
    .await
}

/// Insert a new active booking and return the stored row
pub async fn insert_booking<'e>(
    executor: impl PgExecutor<'e>,
    facility_id: i32,
    customer_id: i32,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    players_count: i32,
    booking_type: BookingType,
    total_price: Decimal,
) -> Result<Booking, sqlx::Error> {
    sqlx::query_as::<_, Booking>(
        r#"
        INSERT INTO bookings
            (facility_id, customer_id, start_time, end_time, players_count,
             booking_type, total_price, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, 'active')
        RETURNING id, facility_id, customer_id, start_time, end_time, players_count,
                  booking_type, total_price, status, created_at, updated_at, cancelled_at
        "#,
    )
    .bind(facility_id)
    .bind(customer_id)
    .bind(start)
    .bind(end)
    .bind(players_count)
    .bind(booking_type)
    .bind(total_price)
    .fetch_one(executor)
    .await
}

/// Reschedule an active booking and return the stored row
pub async fn update_booking_interval<'e>(
    executor: impl PgExecutor<'e>,
    booking_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    players_count: i32,
    total_price: Decimal,
) -> Result<Option<Booking>, sqlx::Error> {
    sqlx::query_as::<_, Booking>(
        r#"
        UPDATE bookings
        SET start_time = $2, end_time = $3, players_count = $4,
            total_price = $5, updated_at = NOW()
        WHERE id = $1 AND status = 'active'
        RETURNING id, facility_id, customer_id, start_time, end_time, players_count,
                  booking_type, total_price, status, created_at, updated_at, cancelled_at
        "#,
    )
    .bind(booking_id)
    .bind(start)
    .bind(end)
    .bind(players_count)
    .bind(total_price)
    .fetch_optional(executor)
    .await
}

/// Move an active booking into a terminal status, stamping the
/// cancellation time
///
/// The status to write comes from the caller's `StatusMachine` transition.
pub async fn cancel_booking_row<'e>(
    executor: impl PgExecutor<'e>,
    booking_id: Uuid,
    cancelled_at: DateTime<Utc>,
    status: BookingStatus,
) -> Result<Option<Booking>, sqlx::Error> {
    sqlx::query_as::<_, Booking>(
        r#"
        UPDATE bookings
        SET status = $3, cancelled_at = $2, updated_at = NOW()
        WHERE id = $1 AND status = 'active'
        RETURNING id, facility_id, customer_id, start_time, end_time, players_count,
                  booking_type, total_price, status, created_at, updated_at, cancelled_at
        "#,
    )
    .bind(booking_id)
    .bind(cancelled_at)
    .bind(status)
    .fetch_optional(executor)
    .await
}

/// Repository for pooled booking reads
#[derive(Clone)]
pub struct BookingsRepository {
    pool: PgPool,
}

impl BookingsRepository {
    /// Create a new BookingsRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a booking by id
    pub async fn find_by_id(&self, booking_id: Uuid) -> Result<Option<Booking>, sqlx::Error> {
        fetch_booking(&self.pool, booking_id).await
    }

    /// List a customer's bookings, newest start first
    pub async fn find_by_customer(&self, customer_id: i32) -> Result<Vec<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, facility_id, customer_id, start_time, end_time, players_count,
                   booking_type, total_price, status, created_at, updated_at, cancelled_at
            FROM bookings
            WHERE customer_id = $1
            ORDER BY start_time DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Check whether a customer exists
    pub async fn customer_exists(&self, customer_id: i32) -> Result<bool, sqlx::Error> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE id = $1")
                .bind(customer_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }
}
