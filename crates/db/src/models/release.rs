//! Release entity model and DTOs.
//!
//! `streams` and `total_royalty` are aggregates maintained by the royalty
//! synchronisation engine; neither DTO exposes them.

use royalty_core::money::Money;
use royalty_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::track::Track;

/// A row from the `releases` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Release {
    pub id: DbId,
    pub artist_id: DbId,
    pub title: String,
    pub release_date: Timestamp,
    pub cover_url: Option<String>,
    pub audio_url: Option<String>,
    pub status: String,
    /// Sum of the release's track stream counts.
    pub streams: i64,
    /// Sum of the release's track royalties.
    #[sqlx(try_from = "i64")]
    pub total_royalty: Money,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A release together with its tracks.
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseWithTracks {
    #[serde(flatten)]
    pub release: Release,
    pub tracks: Vec<Track>,
}

/// DTO for creating a new release.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateRelease {
    pub artist_id: DbId,
    pub title: String,
    pub release_date: Timestamp,
    pub cover_url: Option<String>,
    pub audio_url: Option<String>,
}

/// DTO for updating an existing release. All fields are optional.
///
/// `status` is matched case-insensitively and stored upper-case.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateRelease {
    pub title: Option<String>,
    pub release_date: Option<Timestamp>,
    pub cover_url: Option<String>,
    pub audio_url: Option<String>,
    pub status: Option<String>,
}
