pub mod health;
pub mod releases;
pub mod royalties;
pub mod tracks;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /users                               list, create
/// /users/{id}                          get, update, delete
///
/// /releases                            create
/// /releases/{id}                       get (with tracks), update, delete
/// /releases/artist/{artist_id}         list by artist
///
/// /tracks                              create
/// /tracks/{id}                         get, update, delete
/// /tracks/release/{release_id}         list by release
/// /tracks/bulk-update                  bulk stream update (POST)
///
/// /royalties                           list
/// /royalties/{id}                      get
/// /royalties/artist/{artist_id}        list by artist
/// /royalties/track/{track_id}          list by track
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/releases", releases::router())
        .nest("/tracks", tracks::router())
        .nest("/royalties", royalties::router())
}
