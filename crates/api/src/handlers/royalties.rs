//! Read-only handlers for the royalty ledger.
//!
//! Ledger rows are written exclusively by the sync engine.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use royalty_core::types::DbId;
use royalty_db::repositories::RoyaltyRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/royalties
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let entries = RoyaltyRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/royalties/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let entry = RoyaltyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Royalty", id))?;
    Ok(Json(DataResponse { data: entry }))
}

/// GET /api/v1/royalties/artist/{artist_id}
pub async fn list_by_artist(
    State(state): State<AppState>,
    Path(artist_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let entries = RoyaltyRepo::list_by_artist(&state.pool, artist_id).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/royalties/track/{track_id}
pub async fn list_by_track(
    State(state): State<AppState>,
    Path(track_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let entries = RoyaltyRepo::list_by_track(&state.pool, track_id).await?;
    Ok(Json(DataResponse { data: entries }))
}
