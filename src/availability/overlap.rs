// Half-open interval overlap, the single predicate every evaluator uses

use chrono::{DateTime, Utc};

/// Whether two half-open intervals `[a_start, a_end)` and `[b_start, b_end)`
/// overlap
///
/// Touching intervals (`a_end == b_start`) never overlap, so a booking
/// ending at 12:00 and one starting at 12:00 coexist.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn minute(offset: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::minutes(offset)
    }

    /// Overlap law: overlaps(A, B) == overlaps(B, A) for all intervals
    #[test]
    fn prop_overlap_is_symmetric() {
        proptest!(|(
            a_start in 0i64..10_000,
            a_len in 1i64..1_000,
            b_start in 0i64..10_000,
            b_len in 1i64..1_000
        )| {
            let (a0, a1) = (minute(a_start), minute(a_start + a_len));
            let (b0, b1) = (minute(b_start), minute(b_start + b_len));
            prop_assert_eq!(overlaps(a0, a1, b0, b1), overlaps(b0, b1, a0, a1));
        });
    }

    /// Touching intervals never overlap, wherever the boundary falls
    #[test]
    fn prop_touching_never_overlaps() {
        proptest!(|(
            start in 0i64..10_000,
            left_len in 1i64..1_000,
            right_len in 1i64..1_000
        )| {
            let boundary = start + left_len;
            prop_assert!(!overlaps(
                minute(start),
                minute(boundary),
                minute(boundary),
                minute(boundary + right_len)
            ));
        });
    }

    /// An interval always overlaps itself
    #[test]
    fn prop_interval_overlaps_itself() {
        proptest!(|(start in 0i64..10_000, len in 1i64..1_000)| {
            let (a, b) = (minute(start), minute(start + len));
            prop_assert!(overlaps(a, b, a, b));
        });
    }
}
