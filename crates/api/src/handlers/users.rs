//! Handlers for the `/users` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use royalty_core::catalog::{validate_email, validate_user_name, UserRole};
use royalty_core::error::CoreError;
use royalty_core::types::DbId;
use royalty_db::models::user::{CreateUser, UpdateUser};
use royalty_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/users
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateUser>,
) -> AppResult<impl IntoResponse> {
    validate_user_name(&input.name)?;
    validate_email(&input.email)?;
    if let Some(role) = &input.role {
        UserRole::parse(role)?;
    }

    let user = UserRepo::create(&state.pool, &input).await?;
    tracing::info!(user_id = user.id, role = %user.role, "User created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// GET /api/v1/users
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: users }))
}

/// GET /api/v1/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("User", id))?;
    Ok(Json(DataResponse { data: user }))
}

/// PUT /api/v1/users/{id}
///
/// Name and email stay unique across users; a clash with another user is a
/// 409 before anything is written.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        validate_user_name(name)?;
        if UserRepo::find_by_name_excluding(&state.pool, name, id)
            .await?
            .is_some()
        {
            return Err(CoreError::Conflict(format!("User name '{name}' is already taken")).into());
        }
    }
    if let Some(email) = &input.email {
        validate_email(email)?;
        if UserRepo::find_by_email_excluding(&state.pool, email, id)
            .await?
            .is_some()
        {
            return Err(CoreError::Conflict(format!("Email '{email}' is already registered")).into());
        }
    }
    if let Some(role) = &input.role {
        UserRole::parse(role)?;
    }

    let user = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("User", id))?;
    Ok(Json(DataResponse { data: user }))
}

/// DELETE /api/v1/users/{id}
///
/// Cascades to the user's releases, their tracks, and ledger rows.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if UserRepo::delete(&state.pool, id).await? {
        tracing::info!(user_id = id, "User deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("User", id))
    }
}
