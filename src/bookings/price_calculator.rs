use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Service for calculating booking prices
pub struct PriceCalculator;

impl PriceCalculator {
    /// Calculate the total price for a booking interval
    ///
    /// # Arguments
    /// * `start` - Booking start time
    /// * `end` - Booking end time
    /// * `price_per_hour` - Facility hourly rate
    ///
    /// # Returns
    /// Total price as Decimal (duration in hours * hourly rate)
    pub fn booking_price(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        price_per_hour: Decimal,
    ) -> Decimal {
        let minutes = (end - start).num_minutes();
        Decimal::from(minutes) / Decimal::from(60) * price_per_hour
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn minute(offset: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::minutes(offset)
    }

    /// Price scales linearly with duration: doubling the interval doubles
    /// the total
    #[test]
    fn prop_price_is_linear_in_duration() {
        proptest!(|(
            start in 0i64..10_000,
            len in 30i64..480,
            rate_cents in 1u32..=50_000u32
        )| {
            let rate = Decimal::from(rate_cents) / Decimal::from(100);
            let single = PriceCalculator::booking_price(minute(start), minute(start + len), rate);
            let double = PriceCalculator::booking_price(minute(start), minute(start + 2 * len), rate);
            prop_assert_eq!(double, single * Decimal::from(2));
        });
    }

    /// Prices are never negative for forward intervals
    #[test]
    fn prop_price_is_non_negative() {
        proptest!(|(
            start in 0i64..10_000,
            len in 0i64..480,
            rate_cents in 0u32..=50_000u32
        )| {
            let rate = Decimal::from(rate_cents) / Decimal::from(100);
            let price = PriceCalculator::booking_price(minute(start), minute(start + len), rate);
            prop_assert!(price >= Decimal::ZERO, "price was {}", price);
        });
    }

    /// A whole-hour booking costs exactly hours * rate
    #[test]
    fn prop_whole_hours_cost_hours_times_rate() {
        proptest!(|(
            start in 0i64..10_000,
            hours in 1i64..=8,
            rate_cents in 1u32..=50_000u32
        )| {
            let rate = Decimal::from(rate_cents) / Decimal::from(100);
            let price = PriceCalculator::booking_price(
                minute(start),
                minute(start + hours * 60),
                rate,
            );
            prop_assert_eq!(price, Decimal::from(hours) * rate);
        });
    }
}
