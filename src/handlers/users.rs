use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::errors::AppResult;
use crate::models::User;
use crate::services::catalog;
use crate::state::AppState;

// POST /api/users
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<User>,
) -> AppResult<(StatusCode, Json<User>)> {
    let mut db = state.conn()?;
    let user = catalog::register_user(&mut db, body)?;
    Ok((StatusCode::CREATED, Json(user)))
}

// GET /api/users/:id
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    let db = state.conn()?;
    Ok(Json(catalog::get_user(&db, &id)?))
}
