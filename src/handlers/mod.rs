pub mod bookings;
pub mod health;
pub mod ops;
pub mod resources;
pub mod users;

use std::sync::Arc;

use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::errors::{AppError, AppResult};
use crate::state::AppState;

/// Header carrying the caller's identity, set by the authentication gateway.
pub const USER_ID_HEADER: &str = "x-user-id";

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/resources", get(resources::list_resources))
        .route("/api/resources/:id", get(resources::get_resource))
        .route("/api/users", post(users::register_user))
        .route("/api/users/:id", get(users::get_user))
        .route("/api/bookings", post(bookings::create_booking))
        .route("/api/bookings/mine", get(bookings::my_bookings))
        .route("/api/bookings/:id/cancel", post(bookings::cancel_booking))
        .route("/api/bookings/:id/rating", post(bookings::rate_booking))
        .route("/api/ops/resources", post(ops::create_resource))
        .route(
            "/api/ops/resources/:id/active",
            post(ops::set_resource_active),
        )
        .route("/api/ops/bookings", get(ops::list_bookings))
        .route("/api/ops/bookings/:id/status", post(ops::update_status))
        .route("/api/ops/bookings/:id/detail", get(ops::booking_detail))
        .route("/api/ops/stats", get(ops::stats))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The requester on whose behalf a customer route acts.
pub(crate) fn requester_id(headers: &HeaderMap) -> AppResult<String> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(AppError::Unauthorized)
}

/// Operations routes require the configured bearer token. The comparison
/// takes the same time wherever the first mismatching byte is.
pub(crate) fn check_ops_auth(headers: &HeaderMap, expected_token: &str) -> AppResult<()> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token.is_empty()
        || !constant_time_eq::constant_time_eq(token.as_bytes(), expected_token.as_bytes())
    {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}
