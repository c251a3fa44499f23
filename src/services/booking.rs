//! Booking operations: creation, cancellation, status advancement, rating and
//! statistics. Each write runs in its own `BEGIN IMMEDIATE` transaction, so
//! the conflict check and the insert that follows it cannot interleave with
//! another writer, even one in a different process.

use chrono::{NaiveDateTime, Timelike};
use rusqlite::{Connection, TransactionBehavior};
use serde::Deserialize;

use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::{Booking, BookingDetail, BookingStats, BookingStatus, Rating};
use crate::services::clock::Clock;
use crate::services::lifecycle::{self, Actor};
use crate::services::{availability, pricing, stats};

#[derive(Debug, Clone, Deserialize)]
pub struct NewBooking {
    pub resource_id: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub notes: Option<String>,
}

pub fn create_booking(
    conn: &mut Connection,
    clock: &dyn Clock,
    user_id: &str,
    input: NewBooking,
) -> AppResult<Booking> {
    let (start_time, end_time) = (input.start_time, input.end_time);
    let now = clock.now();

    // Timestamps are stored at whole-second precision.
    if start_time.nanosecond() != 0 || end_time.nanosecond() != 0 {
        tracing::warn!(user_id, "booking rejected: sub-second timestamp");
        return Err(AppError::InvalidTimeRange(
            "start and end times must be whole seconds".to_string(),
        ));
    }
    if start_time >= end_time {
        tracing::warn!(user_id, "booking rejected: start is not before end");
        return Err(AppError::InvalidTimeRange(
            "start time must be before end time".to_string(),
        ));
    }
    if start_time <= now {
        tracing::warn!(user_id, "booking rejected: start is not in the future");
        return Err(AppError::InvalidTimeRange(
            "start time must be in the future".to_string(),
        ));
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let resource = match queries::get_resource(&tx, &input.resource_id)? {
        Some(r) if r.is_active => r,
        _ => {
            tracing::warn!(resource_id = %input.resource_id, "booking rejected: resource unavailable");
            return Err(AppError::ResourceUnavailable(format!(
                "resource {} not found or inactive",
                input.resource_id
            )));
        }
    };

    if availability::has_conflict(&tx, &resource.id, start_time, end_time, None)? {
        tracing::warn!(resource_id = %resource.id, "booking rejected: schedule conflict");
        return Err(AppError::ScheduleConflict);
    }

    let booking = Booking {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        resource_id: resource.id,
        start_time,
        end_time,
        status: BookingStatus::Pending,
        total_amount: pricing::compute_amount(resource.hourly_rate, start_time, end_time),
        notes: input.notes,
        created_at: now,
        updated_at: now,
    };

    queries::insert_booking(&tx, &booking)?;
    tx.commit()?;

    tracing::info!(
        booking_id = %booking.id,
        resource_id = %booking.resource_id,
        amount = %booking.total_amount,
        "booking created"
    );
    Ok(booking)
}

/// Requester-initiated cancellation. A booking owned by someone else is
/// reported exactly like a missing one.
pub fn cancel_booking(
    conn: &mut Connection,
    clock: &dyn Clock,
    booking_id: &str,
    user_id: &str,
) -> AppResult<Booking> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let mut booking = queries::get_booking_for_user(&tx, booking_id, user_id)?
        .ok_or_else(|| AppError::NotFound(format!("booking {booking_id}")))?;

    let next = lifecycle::cancel(Actor::Requester, booking.status).inspect_err(|_| {
        tracing::warn!(booking_id, status = %booking.status, "cancellation rejected");
    })?;

    apply_status(&tx, clock, &mut booking, next)?;
    tx.commit()?;

    tracing::info!(booking_id, "booking cancelled by requester");
    Ok(booking)
}

/// Operations-initiated status change through the full transition table.
pub fn advance_status(
    conn: &mut Connection,
    clock: &dyn Clock,
    booking_id: &str,
    requested: BookingStatus,
) -> AppResult<Booking> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let mut booking = queries::get_booking_by_id(&tx, booking_id)?
        .ok_or_else(|| AppError::NotFound(format!("booking {booking_id}")))?;

    let next = lifecycle::transition(booking.status, requested).inspect_err(|_| {
        tracing::warn!(booking_id, from = %booking.status, to = %requested, "status change rejected");
    })?;

    let previous = booking.status;
    apply_status(&tx, clock, &mut booking, next)?;
    tx.commit()?;

    tracing::info!(booking_id, from = %previous, to = %next, "booking status changed");
    Ok(booking)
}

fn apply_status(
    conn: &Connection,
    clock: &dyn Clock,
    booking: &mut Booking,
    next: BookingStatus,
) -> AppResult<()> {
    let now = clock.now();
    if !queries::update_booking_status(conn, &booking.id, next, &now)? {
        return Err(AppError::NotFound(format!("booking {}", booking.id)));
    }
    booking.status = next;
    booking.updated_at = now;
    Ok(())
}

pub fn rate_booking(
    conn: &mut Connection,
    clock: &dyn Clock,
    booking_id: &str,
    user_id: &str,
    score: i64,
    feedback: Option<String>,
) -> AppResult<Rating> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let booking = queries::get_booking_by_id(&tx, booking_id)?
        .ok_or_else(|| AppError::NotFound(format!("booking {booking_id}")))?;

    if booking.status != BookingStatus::Completed {
        return Err(AppError::NotCompleted);
    }
    if booking.user_id != user_id {
        tracing::warn!(booking_id, user_id, "rating rejected: not the booking owner");
        return Err(AppError::Forbidden);
    }
    if queries::get_rating_for_booking(&tx, booking_id)?.is_some() {
        return Err(AppError::AlreadyRated);
    }
    if !(1..=5).contains(&score) {
        return Err(AppError::InvalidScore(score));
    }

    let rating = Rating {
        id: uuid::Uuid::new_v4().to_string(),
        booking_id: booking.id,
        user_id: user_id.to_string(),
        score,
        feedback,
        created_at: clock.now(),
    };

    queries::insert_rating(&tx, &rating)?;
    tx.commit()?;

    tracing::info!(booking_id, score, "booking rated");
    Ok(rating)
}

pub fn get_statistics(
    conn: &Connection,
    from: Option<NaiveDateTime>,
    to: Option<NaiveDateTime>,
) -> AppResult<BookingStats> {
    let bookings = queries::list_bookings_created_between(conn, from.as_ref(), to.as_ref())?;
    Ok(stats::aggregate(&bookings, from, to))
}

pub fn get_booking_detail(conn: &Connection, booking_id: &str) -> AppResult<BookingDetail> {
    queries::get_booking_detail(conn, booking_id)?
        .ok_or_else(|| AppError::NotFound(format!("booking {booking_id}")))
}
