use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::NaiveDateTime;
use serde::Deserialize;

use super::check_ops_auth;
use crate::db::queries::{self, BookingFilter};
use crate::errors::{AppError, AppResult};
use crate::models::{
    Booking, BookingDetail, BookingStats, BookingStatus, BookingWithDetails, NewResource, Resource,
    ResourceCategory,
};
use crate::services::{booking, catalog};
use crate::state::AppState;

// POST /api/ops/resources
pub async fn create_resource(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<NewResource>,
) -> AppResult<(StatusCode, Json<Resource>)> {
    check_ops_auth(&headers, &state.config.ops_token)?;

    let db = state.conn()?;
    let resource = catalog::create_resource(&db, state.clock.as_ref(), body)?;
    Ok((StatusCode::CREATED, Json(resource)))
}

#[derive(Deserialize)]
pub struct ActiveRequest {
    pub active: bool,
}

// POST /api/ops/resources/:id/active
pub async fn set_resource_active(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<ActiveRequest>,
) -> AppResult<Json<Resource>> {
    check_ops_auth(&headers, &state.config.ops_token)?;

    let db = state.conn()?;
    Ok(Json(catalog::set_resource_active(&db, &id, body.active)?))
}

// GET /api/ops/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub user_id: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl BookingsQuery {
    fn into_filter(self, default_limit: i64) -> AppResult<BookingFilter> {
        let status = match self.status.as_deref() {
            Some(s) => Some(
                BookingStatus::parse(s)
                    .ok_or_else(|| AppError::Validation(format!("unknown status: {s}")))?,
            ),
            None => None,
        };
        let category = match self.category.as_deref() {
            Some(c) => Some(
                ResourceCategory::parse(c)
                    .ok_or_else(|| AppError::Validation(format!("unknown category: {c}")))?,
            ),
            None => None,
        };

        Ok(BookingFilter {
            user_id: self.user_id,
            status,
            category,
            from: self.from,
            to: self.to,
            limit: self.limit.filter(|l| *l > 0).unwrap_or(default_limit),
            offset: self.offset.filter(|o| *o >= 0).unwrap_or(0),
        })
    }
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> AppResult<Json<Vec<BookingWithDetails>>> {
    check_ops_auth(&headers, &state.config.ops_token)?;

    let filter = query.into_filter(state.config.default_page_size)?;
    let bookings = {
        let db = state.conn()?;
        queries::list_bookings(&db, &filter)?
    };
    Ok(Json(bookings))
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: BookingStatus,
}

// POST /api/ops/bookings/:id/status
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<StatusRequest>,
) -> AppResult<Json<Booking>> {
    check_ops_auth(&headers, &state.config.ops_token)?;

    let mut db = state.conn()?;
    let updated = booking::advance_status(&mut db, state.clock.as_ref(), &id, body.status)?;
    Ok(Json(updated))
}

// GET /api/ops/bookings/:id/detail
pub async fn booking_detail(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> AppResult<Json<BookingDetail>> {
    check_ops_auth(&headers, &state.config.ops_token)?;

    let db = state.conn()?;
    Ok(Json(booking::get_booking_detail(&db, &id)?))
}

// GET /api/ops/stats
#[derive(Deserialize)]
pub struct StatsQuery {
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

pub async fn stats(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<StatsQuery>,
) -> AppResult<Json<BookingStats>> {
    check_ops_auth(&headers, &state.config.ops_token)?;

    let db = state.conn()?;
    Ok(Json(booking::get_statistics(&db, query.from, query.to)?))
}
