//! Route definitions for the read-only `/royalties` ledger.

use axum::routing::get;
use axum::Router;

use crate::handlers::royalties;
use crate::state::AppState;

/// Routes mounted at `/royalties`.
///
/// ```text
/// GET /                       -> list
/// GET /{id}                   -> get_by_id
/// GET /artist/{artist_id}     -> list_by_artist
/// GET /track/{track_id}       -> list_by_track
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(royalties::list))
        .route("/{id}", get(royalties::get_by_id))
        .route("/artist/{artist_id}", get(royalties::list_by_artist))
        .route("/track/{track_id}", get(royalties::list_by_track))
}
