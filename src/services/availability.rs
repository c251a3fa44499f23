use chrono::NaiveDateTime;
use rusqlite::Connection;

use crate::db::queries;
use crate::models::{Booking, BookingStatus};

/// Half-open interval overlap: `[a_start, a_end)` and `[b_start, b_end)`
/// overlap iff each starts before the other ends. Touching endpoints do not.
pub fn overlaps(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// First non-cancelled booking in `bookings` that overlaps the candidate span.
///
/// Past bookings are not skipped: a stale pending booking still blocks.
pub fn find_conflict<'a>(
    bookings: &'a [Booking],
    start: NaiveDateTime,
    end: NaiveDateTime,
    exclude_booking_id: Option<&str>,
) -> Option<&'a Booking> {
    bookings.iter().find(|booking| {
        booking.status != BookingStatus::Cancelled
            && exclude_booking_id != Some(booking.id.as_str())
            && overlaps(booking.start_time, booking.end_time, start, end)
    })
}

pub fn has_conflict(
    conn: &Connection,
    resource_id: &str,
    start: NaiveDateTime,
    end: NaiveDateTime,
    exclude_booking_id: Option<&str>,
) -> anyhow::Result<bool> {
    let bookings = queries::get_active_bookings_for_resource(conn, resource_id)?;

    match find_conflict(&bookings, start, end, exclude_booking_id) {
        Some(existing) => {
            tracing::debug!(
                resource_id,
                conflicting_booking = %existing.id,
                "candidate span overlaps existing booking"
            );
            Ok(true)
        }
        None => Ok(false),
    }
}
