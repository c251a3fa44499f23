use chrono::NaiveDateTime;

use crate::models::{Booking, BookingStats, BookingStatus};
use crate::services::pricing;

/// Whether `created_at` falls inside the inclusive window. Missing bounds are
/// open.
pub fn in_window(
    created_at: NaiveDateTime,
    from: Option<NaiveDateTime>,
    to: Option<NaiveDateTime>,
) -> bool {
    from.map_or(true, |from| created_at >= from) && to.map_or(true, |to| created_at <= to)
}

/// Reduces bookings created inside the window to per-status counts and
/// revenue.
///
/// Revenue is the sum of recorded amounts over every included booking,
/// cancelled ones too. It reports booked value, not realised income.
pub fn aggregate(
    bookings: &[Booking],
    from: Option<NaiveDateTime>,
    to: Option<NaiveDateTime>,
) -> BookingStats {
    let mut stats = BookingStats {
        total_revenue: pricing::zero_amount(),
        ..BookingStats::default()
    };

    for booking in bookings
        .iter()
        .filter(|b| in_window(b.created_at, from, to))
    {
        stats.total_bookings += 1;
        match booking.status {
            BookingStatus::Pending => stats.pending += 1,
            BookingStatus::Confirmed => stats.confirmed += 1,
            BookingStatus::Ongoing => stats.ongoing += 1,
            BookingStatus::Completed => stats.completed += 1,
            BookingStatus::Cancelled => stats.cancelled += 1,
        }
        stats.total_revenue += booking.total_amount;
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn booking(amount: &str, status: BookingStatus, created_at: &str) -> Booking {
        Booking {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: "user-1".to_string(),
            resource_id: "room-1".to_string(),
            start_time: dt("2030-02-01 10:00"),
            end_time: dt("2030-02-01 12:00"),
            status,
            total_amount: Decimal::from_str(amount).unwrap(),
            notes: None,
            created_at: dt(created_at),
            updated_at: dt(created_at),
        }
    }

    #[test]
    fn test_mixed_statuses_without_window() {
        let bookings = vec![
            booking("100.00", BookingStatus::Pending, "2030-01-01 09:00"),
            booking("150.50", BookingStatus::Confirmed, "2030-01-02 09:00"),
            booking("200.25", BookingStatus::Completed, "2030-01-03 09:00"),
            booking("75.00", BookingStatus::Cancelled, "2030-01-04 09:00"),
        ];

        let stats = aggregate(&bookings, None, None);
        assert_eq!(stats.total_bookings, 4);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.confirmed, 1);
        assert_eq!(stats.ongoing, 0);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.cancelled, 1);
        assert_eq!(stats.total_revenue, Decimal::from_str("525.75").unwrap());
    }

    #[test]
    fn test_cancelled_amounts_count_towards_revenue() {
        let bookings = vec![booking("75.00", BookingStatus::Cancelled, "2030-01-04 09:00")];
        let stats = aggregate(&bookings, None, None);
        assert_eq!(stats.total_revenue, Decimal::from(75));
    }

    #[test]
    fn test_empty_input() {
        let stats = aggregate(&[], None, None);
        assert_eq!(stats, BookingStats::default());
        assert_eq!(stats.total_revenue, Decimal::ZERO);
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let bookings = vec![
            booking("10", BookingStatus::Pending, "2030-01-01 00:00"),
            booking("20", BookingStatus::Pending, "2030-01-02 00:00"),
            booking("40", BookingStatus::Ongoing, "2030-01-03 00:00"),
            booking("80", BookingStatus::Pending, "2030-01-04 00:00"),
        ];

        let stats = aggregate(
            &bookings,
            Some(dt("2030-01-02 00:00")),
            Some(dt("2030-01-03 00:00")),
        );
        assert_eq!(stats.total_bookings, 2);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.ongoing, 1);
        assert_eq!(stats.total_revenue, Decimal::from(60));
    }

    #[test]
    fn test_open_ended_windows() {
        let bookings = vec![
            booking("10", BookingStatus::Pending, "2030-01-01 00:00"),
            booking("20", BookingStatus::Completed, "2030-01-05 00:00"),
        ];

        let after = aggregate(&bookings, Some(dt("2030-01-02 00:00")), None);
        assert_eq!(after.total_bookings, 1);
        assert_eq!(after.completed, 1);

        let before = aggregate(&bookings, None, Some(dt("2030-01-02 00:00")));
        assert_eq!(before.total_bookings, 1);
        assert_eq!(before.pending, 1);
    }

    #[test]
    fn test_status_counts_always_sum_to_total() {
        let statuses = BookingStatus::ALL;
        let bookings: Vec<Booking> = (0..37)
            .map(|i| {
                booking(
                    &format!("{}.{:02}", i * 3, i % 100),
                    statuses[i % statuses.len()],
                    &format!("2030-01-{:02} 12:00", (i % 28) + 1),
                )
            })
            .collect();

        for (from, to) in [
            (None, None),
            (Some(dt("2030-01-10 00:00")), None),
            (None, Some(dt("2030-01-20 00:00"))),
            (Some(dt("2030-01-05 12:00")), Some(dt("2030-01-05 12:00"))),
        ] {
            let stats = aggregate(&bookings, from, to);
            assert_eq!(stats.status_count_sum(), stats.total_bookings);

            let expected: Decimal = bookings
                .iter()
                .filter(|b| in_window(b.created_at, from, to))
                .map(|b| b.total_amount)
                .sum();
            assert_eq!(stats.total_revenue, expected);
        }
    }
}
