use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::db::queries;
use crate::errors::AppResult;
use crate::models::Resource;
use crate::services::catalog;
use crate::state::AppState;

// GET /api/resources
pub async fn list_resources(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Resource>>> {
    let resources = {
        let db = state.conn()?;
        queries::list_resources(&db, true)?
    };
    Ok(Json(resources))
}

// GET /api/resources/:id
pub async fn get_resource(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Resource>> {
    let db = state.conn()?;
    Ok(Json(catalog::get_resource(&db, &id)?))
}
