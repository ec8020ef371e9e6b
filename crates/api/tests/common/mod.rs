#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use royalty_core::period::AccountingPeriod;
use royalty_core::royalty::{RoyaltyCalculator, DEFAULT_RATE_PER_STREAM};
use royalty_sync::{PgSyncStore, RoyaltySync};
use sqlx::PgPool;
use tower::ServiceExt;

use royalty_api::config::ServerConfig;
use royalty_api::router::build_app_router;
use royalty_api::state::AppState;

/// Period every ledger row written through the test app is booked under.
pub const TEST_PERIOD: &str = "2024-03";

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        royalty_rate: DEFAULT_RATE_PER_STREAM,
    }
}

/// Build the production router over `pool`, with ledger rows pinned to
/// [`TEST_PERIOD`].
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let sync = RoyaltySync::new(
        PgSyncStore::new(pool.clone()),
        RoyaltyCalculator::new(config.royalty_rate).unwrap(),
    )
    .with_fixed_period(TEST_PERIOD.parse::<AccountingPeriod>().unwrap());

    let state = AppState::new(pool, Arc::new(config.clone()), Arc::new(sync));
    build_app_router(state, &config)
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create an artist through the API and return its id.
pub async fn create_artist(pool: &PgPool, name: &str) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/users",
        serde_json::json!({"name": name, "email": format!("{name}@example.com")}),
    )
    .await;
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Create a release for `artist_id` and return its id.
pub async fn create_release(pool: &PgPool, artist_id: i64, title: &str) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/releases",
        serde_json::json!({
            "artist_id": artist_id,
            "title": title,
            "release_date": "2024-03-01T00:00:00Z",
        }),
    )
    .await;
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Create a track with `streams` and return the response body's `data`.
pub async fn create_track(pool: &PgPool, release_id: i64, streams: i64) -> serde_json::Value {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/tracks",
        serde_json::json!({
            "release_id": release_id,
            "title": format!("Track with {streams} streams"),
            "duration": 180,
            "file_url": "https://cdn.example.com/audio/track.mp3",
            "streams": streams,
        }),
    )
    .await;
    body_json(response).await["data"].clone()
}
