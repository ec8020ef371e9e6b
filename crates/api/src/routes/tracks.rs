//! Route definitions for the `/tracks` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::tracks;
use crate::state::AppState;

/// Routes mounted at `/tracks`.
///
/// ```text
/// POST   /                       -> create
/// POST   /bulk-update            -> bulk_update
/// GET    /{id}                   -> get_by_id
/// PUT    /{id}                   -> update
/// DELETE /{id}                   -> delete
/// GET    /release/{release_id}   -> list_by_release
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(tracks::create))
        .route("/bulk-update", post(tracks::bulk_update))
        .route(
            "/{id}",
            get(tracks::get_by_id)
                .put(tracks::update)
                .delete(tracks::delete),
        )
        .route("/release/{release_id}", get(tracks::list_by_release))
}
