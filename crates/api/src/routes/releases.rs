//! Route definitions for the `/releases` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::releases;
use crate::state::AppState;

/// Routes mounted at `/releases`.
///
/// ```text
/// POST   /                      -> create
/// GET    /{id}                  -> get_by_id
/// PUT    /{id}                  -> update
/// DELETE /{id}                  -> delete
/// GET    /artist/{artist_id}    -> list_by_artist
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(releases::create))
        .route(
            "/{id}",
            get(releases::get_by_id)
                .put(releases::update)
                .delete(releases::delete),
        )
        .route("/artist/{artist_id}", get(releases::list_by_artist))
}
