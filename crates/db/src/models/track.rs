//! Track entity model and DTOs.
//!
//! `streams` is the authoritative counter. `royalty` is a cache written only
//! by the royalty synchronisation engine, so no DTO carries it and unknown
//! fields are rejected.

use royalty_core::money::Money;
use royalty_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tracks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Track {
    pub id: DbId,
    pub release_id: DbId,
    pub title: String,
    /// Length in seconds.
    pub duration: i32,
    pub isrc: Option<String>,
    pub file_url: String,
    pub streams: i64,
    #[sqlx(try_from = "i64")]
    pub royalty: Money,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The `(id, streams)` projection read when recomputing release aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct TrackStreams {
    pub id: DbId,
    pub streams: i64,
}

/// DTO for creating a new track.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTrack {
    pub release_id: DbId,
    pub title: String,
    pub duration: i32,
    pub isrc: Option<String>,
    pub file_url: String,
    /// Defaults to 0 if omitted.
    pub streams: Option<i64>,
}

/// DTO for updating an existing track. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateTrack {
    pub title: Option<String>,
    pub duration: Option<i32>,
    pub isrc: Option<String>,
    pub file_url: Option<String>,
    pub streams: Option<i64>,
}

/// Selects the tracks touched by a bulk update. Criteria are ANDed; at least
/// one must be present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrackFilter {
    pub release_id: Option<DbId>,
    pub track_ids: Option<Vec<DbId>>,
}

impl TrackFilter {
    pub fn is_empty(&self) -> bool {
        self.release_id.is_none() && self.track_ids.is_none()
    }
}

/// DTO for a bulk stream update.
///
/// `streams` overwrites the counter; `add_streams` adds to it (as reported
/// by a stream reporting run). At most one may be given.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BulkUpdateTracks {
    pub filter: TrackFilter,
    pub streams: Option<i64>,
    pub add_streams: Option<i64>,
}
