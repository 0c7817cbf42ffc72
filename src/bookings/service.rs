// Booking lifecycle service
//
// The write paths (create, reschedule) run inside serializable transactions:
// the facility state is re-read and re-evaluated under isolation, so two
// concurrent requests for the same slot cannot both commit. Serialization
// aborts are retried a bounded number of times before giving up.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::availability::{evaluate, fetch_active_bookings, fetch_facility, BookingCandidate};
use crate::bookings::{
    cancel_booking_row, fetch_booking, insert_booking, update_booking_interval, Booking,
    BookingError, BookingStatus, CancelBookingResponse, CancellationResult, CreateBookingRequest,
    PriceCalculator, StatusMachine, UpdateBookingRequest,
};
use crate::clock::SharedClock;
use crate::models::Facility;
use crate::schedule::{fetch_active_blocks, fetch_operating_hours};
use crate::validation::{is_on_half_hour_grid, is_valid_grid_duration};

const MAX_SERIALIZATION_RETRIES: u32 = 3;

/// Decide the outcome of a cancellation attempt
///
/// Pure so the cutoff and idempotency rules are testable without a
/// database. Cancelling an already-cancelled booking reports
/// `AlreadyCancelled` rather than an error.
pub fn cancellation_outcome(
    booking: Option<&Booking>,
    now: DateTime<Utc>,
    cutoff_minutes: i64,
) -> CancellationResult {
    match booking {
        None => CancellationResult::NotFound,
        Some(b) if b.status == BookingStatus::Canceled => CancellationResult::AlreadyCancelled,
        Some(b) if (b.start_time - now).num_minutes() < cutoff_minutes => {
            CancellationResult::TooLateToCancel
        }
        Some(_) => CancellationResult::Success,
    }
}

/// Service for creating, rescheduling, and cancelling bookings
#[derive(Clone)]
pub struct BookingService {
    pool: PgPool,
    clock: SharedClock,
    cancellation_cutoff_minutes: i64,
}

impl BookingService {
    /// Create a new BookingService
    pub fn new(pool: PgPool, clock: SharedClock, cancellation_cutoff_minutes: i64) -> Self {
        Self {
            pool,
            clock,
            cancellation_cutoff_minutes,
        }
    }

    /// Create a booking
    ///
    /// Validates the interval up front, then runs the conflict evaluation
    /// and insert inside a serializable transaction.
    pub async fn create(&self, req: &CreateBookingRequest) -> Result<Booking, BookingError> {
        validate_interval(req.start, req.end, self.clock.now())?;

        for attempt in 1..=MAX_SERIALIZATION_RETRIES {
            match self.try_create(req).await {
                Err(BookingError::Concurrency) if attempt < MAX_SERIALIZATION_RETRIES => {
                    tracing::warn!(
                        "Serialization conflict creating booking, retrying (attempt {}/{})",
                        attempt,
                        MAX_SERIALIZATION_RETRIES
                    );
                }
                other => return other,
            }
        }
        Err(BookingError::Concurrency)
    }

    async fn try_create(&self, req: &CreateBookingRequest) -> Result<Booking, BookingError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await?;

        let facility = fetch_facility(&mut *tx, req.facility_id)
            .await?
            .ok_or(BookingError::FacilityNotFound(req.facility_id))?;

        let customer_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE id = $1")
            .bind(req.customer_id)
            .fetch_one(&mut *tx)
            .await?;
        if customer_count == 0 {
            return Err(BookingError::CustomerNotFound(req.customer_id));
        }

        validate_facility_constraints(
            &facility,
            (req.end - req.start).num_minutes(),
            req.players_count,
        )?;

        let candidate = BookingCandidate {
            start: req.start,
            end: req.end,
            booking_type: req.booking_type,
            players_count: req.players_count,
            exclude_booking_id: None,
        };
        self.evaluate_in_tx(&mut tx, &facility, &candidate).await?;

        let total_price = PriceCalculator::booking_price(req.start, req.end, facility.price_per_hour);
        let booking = insert_booking(
            &mut *tx,
            req.facility_id,
            req.customer_id,
            req.start,
            req.end,
            req.players_count,
            req.booking_type,
            total_price,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            "Created booking {} on facility {} ({} - {}, {} players, {})",
            booking.id,
            booking.facility_id,
            booking.start_time,
            booking.end_time,
            booking.players_count,
            booking.booking_type
        );
        Ok(booking)
    }

    /// Reschedule an active booking
    ///
    /// The booking's own interval is excluded from the conflict check, so
    /// shortening or shifting within its current slot always succeeds.
    pub async fn update(
        &self,
        booking_id: Uuid,
        req: &UpdateBookingRequest,
    ) -> Result<Booking, BookingError> {
        validate_interval(req.start, req.end, self.clock.now())?;

        for attempt in 1..=MAX_SERIALIZATION_RETRIES {
            match self.try_update(booking_id, req).await {
                Err(BookingError::Concurrency) if attempt < MAX_SERIALIZATION_RETRIES => {
                    tracing::warn!(
                        "Serialization conflict rescheduling booking {}, retrying (attempt {}/{})",
                        booking_id,
                        attempt,
                        MAX_SERIALIZATION_RETRIES
                    );
                }
                other => return other,
            }
        }
        Err(BookingError::Concurrency)
    }

    async fn try_update(
        &self,
        booking_id: Uuid,
        req: &UpdateBookingRequest,
    ) -> Result<Booking, BookingError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await?;

        let booking = fetch_booking(&mut *tx, booking_id)
            .await?
            .ok_or(BookingError::NotFound)?;
        ensure_reschedulable(&booking)?;

        let facility = fetch_facility(&mut *tx, booking.facility_id)
            .await?
            .ok_or(BookingError::FacilityNotFound(booking.facility_id))?;

        validate_facility_constraints(
            &facility,
            (req.end - req.start).num_minutes(),
            req.players_count,
        )?;

        let candidate = BookingCandidate {
            start: req.start,
            end: req.end,
            booking_type: booking.booking_type,
            players_count: req.players_count,
            exclude_booking_id: Some(booking.id),
        };
        self.evaluate_in_tx(&mut tx, &facility, &candidate).await?;

        let total_price = PriceCalculator::booking_price(req.start, req.end, facility.price_per_hour);
        let updated = update_booking_interval(
            &mut *tx,
            booking_id,
            req.start,
            req.end,
            req.players_count,
            total_price,
        )
        .await?
        .ok_or(BookingError::NotFound)?;

        tx.commit().await?;

        tracing::info!(
            "Rescheduled booking {} to {} - {}",
            updated.id,
            updated.start_time,
            updated.end_time
        );
        Ok(updated)
    }

    async fn evaluate_in_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        facility: &Facility,
        candidate: &BookingCandidate,
    ) -> Result<(), BookingError> {
        let hours = fetch_operating_hours(&mut **tx, facility.id).await?;
        let blocks = fetch_active_blocks(&mut **tx, facility.id).await?;
        let bookings = fetch_active_bookings(&mut **tx, facility.id).await?;

        let verdict = evaluate(Some(facility), &hours, &blocks, &bookings, candidate);
        if !verdict.is_available {
            return Err(BookingError::Conflict {
                conflict_type: verdict.conflict_type,
                message: verdict
                    .message
                    .unwrap_or_else(|| "Facility is not available".to_string()),
            });
        }
        Ok(())
    }

    /// Cancel a booking
    ///
    /// Idempotent: cancelling twice returns `AlreadyCancelled` rather than
    /// failing. Cancellation closes `cancellation_cutoff_minutes` before
    /// the booking starts.
    pub async fn cancel(&self, booking_id: Uuid) -> Result<CancelBookingResponse, BookingError> {
        let now = self.clock.now();
        let booking = fetch_booking(&self.pool, booking_id).await?;
        let outcome = cancellation_outcome(booking.as_ref(), now, self.cancellation_cutoff_minutes);

        let response = match outcome {
            CancellationResult::Success => {
                let current = booking
                    .as_ref()
                    .map(|b| b.status)
                    .unwrap_or(BookingStatus::Active);
                let next = cancellation_transition(current)?;
                match cancel_booking_row(&self.pool, booking_id, now, next).await? {
                    Some(cancelled) => {
                        tracing::info!("Cancelled booking {}", booking_id);
                        CancelBookingResponse {
                            booking_id,
                            result: CancellationResult::Success,
                            message: "Booking cancelled successfully".to_string(),
                            cancelled_at: cancelled.cancelled_at,
                        }
                    }
                    // Lost a race with another cancellation between the
                    // read and the update
                    None => CancelBookingResponse {
                        booking_id,
                        result: CancellationResult::AlreadyCancelled,
                        message: "Booking was already cancelled".to_string(),
                        cancelled_at: None,
                    },
                }
            }
            CancellationResult::AlreadyCancelled => CancelBookingResponse {
                booking_id,
                result: CancellationResult::AlreadyCancelled,
                message: "Booking was already cancelled".to_string(),
                cancelled_at: booking.and_then(|b| b.cancelled_at),
            },
            CancellationResult::TooLateToCancel => CancelBookingResponse {
                booking_id,
                result: CancellationResult::TooLateToCancel,
                message: format!(
                    "Bookings can only be cancelled at least {} minutes before they start",
                    self.cancellation_cutoff_minutes
                ),
                cancelled_at: None,
            },
            CancellationResult::NotFound => CancelBookingResponse {
                booking_id,
                result: CancellationResult::NotFound,
                message: "Booking not found".to_string(),
                cancelled_at: None,
            },
        };
        Ok(response)
    }
}

/// Validate an interval against the grid and the clock
fn validate_interval(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), BookingError> {
    if end <= start {
        return Err(BookingError::ValidationError(
            "End time must be after start time".to_string(),
        ));
    }
    if start < now {
        return Err(BookingError::ValidationError(
            "Cannot create bookings in the past".to_string(),
        ));
    }
    if !is_on_half_hour_grid(start) || !is_on_half_hour_grid(end) {
        return Err(BookingError::ValidationError(
            "Booking times must align to 30-minute boundaries".to_string(),
        ));
    }
    if !is_valid_grid_duration((end - start).num_minutes()) {
        return Err(BookingError::ValidationError(
            "Booking duration must be a positive multiple of 30 minutes".to_string(),
        ));
    }
    Ok(())
}

/// A reschedule keeps the booking Active; the status machine rejects it
/// once the booking has left that state
fn ensure_reschedulable(booking: &Booking) -> Result<(), BookingError> {
    StatusMachine::transition(booking.status, BookingStatus::Active).map_err(|_| {
        BookingError::InvalidState("Only active bookings can be rescheduled".to_string())
    })?;
    Ok(())
}

/// Compute the status a cancellation writes, via the status machine
fn cancellation_transition(current: BookingStatus) -> Result<BookingStatus, BookingError> {
    StatusMachine::transition(current, BookingStatus::Canceled).map_err(BookingError::InvalidState)
}

/// Validate per-facility duration and capacity bounds
fn validate_facility_constraints(
    facility: &Facility,
    duration_minutes: i64,
    players_count: i32,
) -> Result<(), BookingError> {
    if players_count < 1 {
        return Err(BookingError::ValidationError(
            "Players count must be at least 1".to_string(),
        ));
    }
    if players_count > facility.max_players {
        return Err(BookingError::ValidationError(format!(
            "Players count {} exceeds facility capacity of {}",
            players_count, facility.max_players
        )));
    }
    if duration_minutes < facility.min_booking_duration_minutes as i64 {
        return Err(BookingError::ValidationError(format!(
            "Booking must last at least {} minutes",
            facility.min_booking_duration_minutes
        )));
    }
    if duration_minutes > facility.max_booking_duration_minutes as i64 {
        return Err(BookingError::ValidationError(format!(
            "Booking must not exceed {} minutes",
            facility.max_booking_duration_minutes
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use crate::bookings::BookingType;
    use crate::models::SportType;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, h, m, 0).unwrap()
    }

    fn facility() -> Facility {
        Facility {
            id: 1,
            name: "Center Court".to_string(),
            sport_type: SportType::Tennis,
            max_players: 4,
            price_per_hour: dec!(50),
            is_active: true,
            min_booking_duration_minutes: 60,
            max_booking_duration_minutes: 240,
        }
    }

    fn active_booking(start: DateTime<Utc>) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            facility_id: 1,
            customer_id: 1,
            start_time: start,
            end_time: start + chrono::Duration::hours(2),
            players_count: 1,
            booking_type: BookingType::Exclusive,
            total_price: dec!(100),
            status: BookingStatus::Active,
            created_at: at(0, 0),
            updated_at: at(0, 0),
            cancelled_at: None,
        }
    }

    #[test]
    fn interval_must_end_after_start() {
        let result = validate_interval(at(12, 0), at(10, 0), at(8, 0));
        assert!(matches!(result, Err(BookingError::ValidationError(_))));
    }

    #[test]
    fn interval_must_not_start_in_past() {
        let result = validate_interval(at(10, 0), at(12, 0), at(11, 0));
        assert!(matches!(result, Err(BookingError::ValidationError(_))));
    }

    #[test]
    fn interval_must_align_to_half_hour_grid() {
        let result = validate_interval(at(10, 15), at(12, 0), at(8, 0));
        assert!(matches!(result, Err(BookingError::ValidationError(_))));
        let result = validate_interval(at(10, 0), at(11, 45), at(8, 0));
        assert!(matches!(result, Err(BookingError::ValidationError(_))));
    }

    #[test]
    fn aligned_future_interval_passes() {
        assert!(validate_interval(at(10, 30), at(12, 0), at(8, 0)).is_ok());
    }

    #[test]
    fn players_count_bounded_by_facility_capacity() {
        let f = facility();
        assert!(validate_facility_constraints(&f, 120, 4).is_ok());
        assert!(validate_facility_constraints(&f, 120, 5).is_err());
        assert!(validate_facility_constraints(&f, 120, 0).is_err());
    }

    #[test]
    fn duration_bounded_by_facility_limits() {
        let f = facility();
        assert!(validate_facility_constraints(&f, 30, 2).is_err());
        assert!(validate_facility_constraints(&f, 60, 2).is_ok());
        assert!(validate_facility_constraints(&f, 240, 2).is_ok());
        assert!(validate_facility_constraints(&f, 270, 2).is_err());
    }

    #[test]
    fn active_booking_is_reschedulable() {
        let booking = active_booking(at(14, 0));
        assert!(ensure_reschedulable(&booking).is_ok());
    }

    #[test]
    fn canceled_booking_is_not_reschedulable() {
        let mut booking = active_booking(at(14, 0));
        booking.status = BookingStatus::Canceled;
        assert!(matches!(
            ensure_reschedulable(&booking),
            Err(BookingError::InvalidState(_))
        ));
    }

    #[test]
    fn cancellation_writes_the_canceled_status() {
        assert_eq!(
            cancellation_transition(BookingStatus::Active).unwrap(),
            BookingStatus::Canceled
        );
    }

    #[test]
    fn missing_booking_cancels_to_not_found() {
        assert_eq!(
            cancellation_outcome(None, at(10, 0), 60),
            CancellationResult::NotFound
        );
    }

    #[test]
    fn cancelled_booking_reports_already_cancelled() {
        let mut booking = active_booking(at(14, 0));
        booking.status = BookingStatus::Canceled;
        booking.cancelled_at = Some(at(9, 0));
        assert_eq!(
            cancellation_outcome(Some(&booking), at(10, 0), 60),
            CancellationResult::AlreadyCancelled
        );
    }

    #[test]
    fn cancellation_inside_cutoff_is_too_late() {
        // Starts at 14:00, now 13:30, cutoff 60 minutes
        let booking = active_booking(at(14, 0));
        assert_eq!(
            cancellation_outcome(Some(&booking), at(13, 30), 60),
            CancellationResult::TooLateToCancel
        );
    }

    #[test]
    fn cancellation_exactly_at_cutoff_succeeds() {
        let booking = active_booking(at(14, 0));
        assert_eq!(
            cancellation_outcome(Some(&booking), at(13, 0), 60),
            CancellationResult::Success
        );
    }

    #[test]
    fn started_booking_cannot_be_cancelled() {
        let booking = active_booking(at(14, 0));
        assert_eq!(
            cancellation_outcome(Some(&booking), at(15, 0), 60),
            CancellationResult::TooLateToCancel
        );
    }
}
