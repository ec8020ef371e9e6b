//! Handlers for the `/releases` resource.
//!
//! `streams` and `total_royalty` on a release are derived from its tracks
//! and are never accepted from the client.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use royalty_core::catalog::{validate_title, validate_url, ReleaseStatus};
use royalty_core::types::DbId;
use royalty_db::models::release::{CreateRelease, ReleaseWithTracks, UpdateRelease};
use royalty_db::repositories::{ReleaseRepo, TrackRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn validate_media_urls(cover_url: Option<&str>, audio_url: Option<&str>) -> AppResult<()> {
    if let Some(url) = cover_url {
        validate_url("cover_url", url)?;
    }
    if let Some(url) = audio_url {
        validate_url("audio_url", url)?;
    }
    Ok(())
}

/// POST /api/v1/releases
///
/// New releases start `PENDING` with zero streams and royalty.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateRelease>,
) -> AppResult<impl IntoResponse> {
    validate_title(&input.title)?;
    validate_media_urls(input.cover_url.as_deref(), input.audio_url.as_deref())?;
    UserRepo::find_by_id(&state.pool, input.artist_id)
        .await?
        .ok_or(AppError::not_found("User", input.artist_id))?;

    let release = ReleaseRepo::create(&state.pool, &input).await?;
    tracing::info!(
        release_id = release.id,
        artist_id = release.artist_id,
        "Release created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: release })))
}

/// GET /api/v1/releases/{id}
///
/// Returns the release with its tracks embedded.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let release = ReleaseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Release", id))?;
    let tracks = TrackRepo::list_by_release(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: ReleaseWithTracks { release, tracks },
    }))
}

/// GET /api/v1/releases/artist/{artist_id}
pub async fn list_by_artist(
    State(state): State<AppState>,
    Path(artist_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let releases = ReleaseRepo::list_by_artist(&state.pool, artist_id).await?;
    Ok(Json(DataResponse { data: releases }))
}

/// PUT /api/v1/releases/{id}
///
/// `status` is accepted in any case and stored upper-case.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateRelease>,
) -> AppResult<impl IntoResponse> {
    if let Some(title) = &input.title {
        validate_title(title)?;
    }
    validate_media_urls(input.cover_url.as_deref(), input.audio_url.as_deref())?;
    if let Some(status) = input.status.take() {
        input.status = Some(ReleaseStatus::parse(&status)?.as_str().to_string());
    }

    let release = ReleaseRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Release", id))?;
    Ok(Json(DataResponse { data: release }))
}

/// DELETE /api/v1/releases/{id}
///
/// Cascades to the release's tracks and their ledger rows.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if ReleaseRepo::delete(&state.pool, id).await? {
        tracing::info!(release_id = id, "Release deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Release", id))
    }
}
