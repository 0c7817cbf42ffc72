use crate::bookings::BookingStatus;

/// Service for managing booking status transitions
pub struct StatusMachine;

impl StatusMachine {
    /// Check if a status transition is valid
    ///
    /// # Valid Transitions
    /// - Active → Canceled
    /// - Any status → Same status (idempotent)
    /// - Canceled → (no other transitions; it is terminal)
    pub fn is_valid_transition(from: BookingStatus, to: BookingStatus) -> bool {
        // Same status is always valid (idempotent)
        if from == to {
            return true;
        }

        matches!((from, to), (BookingStatus::Active, BookingStatus::Canceled))
    }

    /// Attempt to transition from one status to another
    ///
    /// # Returns
    /// `Ok(to)` if the transition is valid, `Err(message)` otherwise
    pub fn transition(from: BookingStatus, to: BookingStatus) -> Result<BookingStatus, String> {
        if Self::is_valid_transition(from, to) {
            Ok(to)
        } else {
            Err(format!("Invalid status transition from {} to {}", from, to))
        }
    }
}
