//! Handlers for the `/tracks` resource.
//!
//! Every write goes through [`TrackMutations`](royalty_sync::TrackMutations)
//! so the royalty cache, release aggregates, and ledger are settled before
//! the response is built. Responses re-read the track to include the royalty
//! the sync engine just wrote.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use royalty_core::catalog::{
    validate_duration, validate_isrc, validate_streams, validate_title, validate_url,
};
use royalty_core::error::CoreError;
use royalty_core::types::DbId;
use royalty_db::models::track::{BulkUpdateTracks, CreateTrack, Track, UpdateTrack};
use royalty_db::repositories::{ReleaseRepo, TrackRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Result of a bulk stream update.
#[derive(Debug, Serialize)]
pub struct BulkUpdateResult {
    /// Releases whose aggregates were recomputed, one per distinct release
    /// among the matched tracks.
    pub release_ids: Vec<DbId>,
}

async fn reload(state: &AppState, id: DbId) -> AppResult<Track> {
    TrackRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Track", id))
}

/// POST /api/v1/tracks
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateTrack>,
) -> AppResult<impl IntoResponse> {
    validate_title(&input.title)?;
    validate_duration(input.duration)?;
    if let Some(isrc) = &input.isrc {
        validate_isrc(isrc)?;
    }
    validate_url("file_url", &input.file_url)?;
    if let Some(streams) = input.streams {
        validate_streams(streams)?;
    }
    ReleaseRepo::find_by_id(&state.pool, input.release_id)
        .await?
        .ok_or(AppError::not_found("Release", input.release_id))?;

    let created = state.tracks.create(&input).await?;
    tracing::info!(
        track_id = created.id,
        release_id = created.release_id,
        streams = created.streams,
        "Track created",
    );

    let track = reload(&state, created.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: track })))
}

/// GET /api/v1/tracks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let track = reload(&state, id).await?;
    Ok(Json(DataResponse { data: track }))
}

/// GET /api/v1/tracks/release/{release_id}
pub async fn list_by_release(
    State(state): State<AppState>,
    Path(release_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let tracks = TrackRepo::list_by_release(&state.pool, release_id).await?;
    Ok(Json(DataResponse { data: tracks }))
}

/// PUT /api/v1/tracks/{id}
///
/// A `royalty` field in the body is rejected during deserialization.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTrack>,
) -> AppResult<impl IntoResponse> {
    if let Some(title) = &input.title {
        validate_title(title)?;
    }
    if let Some(duration) = input.duration {
        validate_duration(duration)?;
    }
    if let Some(isrc) = &input.isrc {
        validate_isrc(isrc)?;
    }
    if let Some(url) = &input.file_url {
        validate_url("file_url", url)?;
    }
    if let Some(streams) = input.streams {
        validate_streams(streams)?;
    }

    state
        .tracks
        .update(id, &input)
        .await?
        .ok_or(AppError::not_found("Track", id))?;

    let track = reload(&state, id).await?;
    Ok(Json(DataResponse { data: track }))
}

/// DELETE /api/v1/tracks/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    match state.tracks.delete(id).await? {
        Some(track) => {
            tracing::info!(track_id = id, release_id = track.release_id, "Track deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(AppError::not_found("Track", id)),
    }
}

/// POST /api/v1/tracks/bulk-update
///
/// Either overwrites (`streams`) or increments (`add_streams`) the stream
/// counter of every track matching `filter`.
pub async fn bulk_update(
    State(state): State<AppState>,
    Json(input): Json<BulkUpdateTracks>,
) -> AppResult<impl IntoResponse> {
    if input.filter.is_empty() {
        return Err(AppError::BadRequest(
            "Filter must name a release_id or track_ids".into(),
        ));
    }
    match (input.streams, input.add_streams) {
        (Some(streams), None) => validate_streams(streams)?,
        (None, Some(_)) => {}
        _ => {
            return Err(CoreError::Validation(
                "Exactly one of streams or add_streams must be given".into(),
            )
            .into())
        }
    }

    let release_ids = state.tracks.bulk_update(&input).await?;
    tracing::info!(releases = release_ids.len(), "Bulk track update applied");
    Ok(Json(DataResponse {
        data: BulkUpdateResult { release_ids },
    }))
}
