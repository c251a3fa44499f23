use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use super::requester_id;
use crate::db::queries;
use crate::errors::AppResult;
use crate::models::{Booking, BookingWithDetails, Rating};
use crate::services::booking::{self, NewBooking};
use crate::state::AppState;

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<NewBooking>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    let user_id = requester_id(&headers)?;

    let mut db = state.conn()?;
    let created = booking::create_booking(&mut db, state.clock.as_ref(), &user_id, body)?;
    Ok((StatusCode::CREATED, Json(created)))
}

// GET /api/bookings/mine
pub async fn my_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> AppResult<Json<Vec<BookingWithDetails>>> {
    let user_id = requester_id(&headers)?;

    let bookings = {
        let db = state.conn()?;
        queries::list_user_bookings(&db, &user_id)?
    };
    Ok(Json(bookings))
}

// POST /api/bookings/:id/cancel
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> AppResult<Json<Booking>> {
    let user_id = requester_id(&headers)?;

    let mut db = state.conn()?;
    let cancelled = booking::cancel_booking(&mut db, state.clock.as_ref(), &id, &user_id)?;
    Ok(Json(cancelled))
}

#[derive(Deserialize)]
pub struct RatingRequest {
    pub score: i64,
    pub feedback: Option<String>,
}

// POST /api/bookings/:id/rating
pub async fn rate_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<RatingRequest>,
) -> AppResult<(StatusCode, Json<Rating>)> {
    let user_id = requester_id(&headers)?;

    let mut db = state.conn()?;
    let rating = booking::rate_booking(
        &mut db,
        state.clock.as_ref(),
        &id,
        &user_id,
        body.score,
        body.feedback,
    )?;
    Ok((StatusCode::CREATED, Json(rating)))
}
