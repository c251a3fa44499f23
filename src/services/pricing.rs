use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};

/// Currency precision for stored amounts.
pub const DECIMAL_PLACES: u32 = 2;

const SECONDS_PER_HOUR: i64 = 3600;

/// Exact duration between two instants in fractional hours.
pub fn hours_between(start: NaiveDateTime, end: NaiveDateTime) -> Decimal {
    Decimal::from((end - start).num_seconds()) / Decimal::from(SECONDS_PER_HOUR)
}

/// Total cost of holding a resource from `start` to `end`.
///
/// Callers must ensure `start < end`. Durations are not rounded to whole
/// hours: 90 minutes at rate R costs 1.5 × R. The multiplication happens
/// before the division so that whole-second spans stay exact, and only the
/// final result is rounded to currency precision. The result always carries
/// exactly two decimal places, so it renders as `100.00` rather than `100`.
pub fn compute_amount(hourly_rate: Decimal, start: NaiveDateTime, end: NaiveDateTime) -> Decimal {
    let seconds = Decimal::from((end - start).num_seconds());
    let mut amount = (hourly_rate * seconds / Decimal::from(SECONDS_PER_HOUR))
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    amount.rescale(DECIMAL_PLACES);
    amount
}

/// Zero at currency scale, the starting point for revenue sums.
pub fn zero_amount() -> Decimal {
    Decimal::new(0, DECIMAL_PLACES)
}
