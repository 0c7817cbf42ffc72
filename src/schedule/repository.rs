use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};

use crate::error::ApiError;
use crate::schedule::{OperatingHours, OperatingHoursItem, TimeBlock};

/// Fetch every operating-hours entry for a facility
///
/// Generic over the executor so the booking write path can run the same
/// query inside its serializable transaction.
pub async fn fetch_operating_hours<'e>(
    executor: impl PgExecutor<'e>,
    facility_id: i32,
) -> Result<Vec<OperatingHours>, sqlx::Error> {
    sqlx::query_as::<_, OperatingHours>(
        r#"
        SELECT id, facility_id, day_of_week, open_time, close_time, is_closed
        FROM operating_hours
        WHERE facility_id = $1
        ORDER BY day_of_week
        "#,
    )
    .bind(facility_id)
    .fetch_all(executor)
    .await
}

/// Fetch all active time blocks for a facility
pub async fn fetch_active_blocks<'e>(
    executor: impl PgExecutor<'e>,
    facility_id: i32,
) -> Result<Vec<TimeBlock>, sqlx::Error> {
    sqlx::query_as::<_, TimeBlock>(
        r#"
        SELECT id, facility_id, block_type, start_time, end_time, reason, is_active, created_at
        FROM time_blocks
        WHERE facility_id = $1 AND is_active
        ORDER BY start_time
        "#,
    )
    .bind(facility_id)
    .fetch_all(executor)
    .await
}

/// Repository for administrative schedule operations
#[derive(Clone)]
pub struct ScheduleRepository {
    pool: PgPool,
}

impl ScheduleRepository {
    /// Create a new ScheduleRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Read a facility's weekly schedule
    pub async fn operating_hours(&self, facility_id: i32) -> Result<Vec<OperatingHours>, ApiError> {
        Ok(fetch_operating_hours(&self.pool, facility_id).await?)
    }

    /// Replace a facility's weekly schedule atomically
    ///
    /// Deletes the existing entries and inserts the new set in one
    /// transaction, so readers never observe a half-written week.
    pub async fn replace_operating_hours(
        &self,
        facility_id: i32,
        entries: &[OperatingHoursItem],
    ) -> Result<Vec<OperatingHours>, ApiError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM operating_hours WHERE facility_id = $1")
            .bind(facility_id)
            .execute(&mut *tx)
            .await?;

        let mut saved = Vec::with_capacity(entries.len());
        for entry in entries {
            let row = sqlx::query_as::<_, OperatingHours>(
                r#"
                INSERT INTO operating_hours (facility_id, day_of_week, open_time, close_time, is_closed)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, facility_id, day_of_week, open_time, close_time, is_closed
                "#,
            )
            .bind(facility_id)
            .bind(entry.day_of_week)
            .bind(entry.open_time)
            .bind(entry.close_time)
            .bind(entry.is_closed)
            .fetch_one(&mut *tx)
            .await?;
            saved.push(row);
        }

        tx.commit().await?;

        Ok(saved)
    }

    /// Check whether any active block on the facility overlaps the interval
    ///
    /// Half-open overlap rule: `[a, b)` and `[c, d)` overlap iff a < d && b > c.
    pub async fn has_overlapping_active_block(
        &self,
        facility_id: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool, ApiError> {
        let exists: Option<bool> = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM time_blocks
                WHERE facility_id = $1 AND is_active
                  AND start_time < $3 AND end_time > $2
            )
            "#,
        )
        .bind(facility_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.unwrap_or(false))
    }

    /// Insert a new active time block
    pub async fn create_time_block(
        &self,
        facility_id: i32,
        block_type: crate::schedule::BlockType,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        reason: Option<&str>,
    ) -> Result<TimeBlock, ApiError> {
        let block = sqlx::query_as::<_, TimeBlock>(
            r#"
            INSERT INTO time_blocks (facility_id, block_type, start_time, end_time, reason)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, facility_id, block_type, start_time, end_time, reason, is_active, created_at
            "#,
        )
        .bind(facility_id)
        .bind(block_type)
        .bind(start)
        .bind(end)
        .bind(reason)
        .fetch_one(&self.pool)
        .await?;

        Ok(block)
    }

    /// List active time blocks for a facility
    pub async fn active_blocks(&self, facility_id: i32) -> Result<Vec<TimeBlock>, ApiError> {
        Ok(fetch_active_blocks(&self.pool, facility_id).await?)
    }

    /// Deactivate a time block; returns false when no such block exists
    ///
    /// Blocks are soft-deleted so past availability decisions stay auditable.
    pub async fn deactivate_time_block(&self, block_id: i32) -> Result<bool, ApiError> {
        let result = sqlx::query(
            "UPDATE time_blocks SET is_active = FALSE WHERE id = $1 AND is_active",
        )
        .bind(block_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
