//! Repository for the `tracks` table.
//!
//! These are raw writes. Caller-initiated track mutations must go through
//! the mutation event source in `royalty-sync` so release aggregates and
//! the royalty ledger follow along.

use royalty_core::money::Money;
use royalty_core::types::DbId;
use sqlx::PgPool;

use crate::models::track::{BulkUpdateTracks, CreateTrack, Track, TrackStreams, UpdateTrack};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, release_id, title, duration, isrc, file_url, streams, royalty, \
                       created_at, updated_at";

/// Provides CRUD operations for tracks.
pub struct TrackRepo;

impl TrackRepo {
    /// Insert a new track, returning the created row.
    ///
    /// If `streams` is `None` in the input, defaults to 0. The royalty cache
    /// starts at zero until the engine fills it in.
    pub async fn create(pool: &PgPool, input: &CreateTrack) -> Result<Track, sqlx::Error> {
        let query = format!(
            "INSERT INTO tracks (release_id, title, duration, isrc, file_url, streams)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Track>(&query)
            .bind(input.release_id)
            .bind(&input.title)
            .bind(input.duration)
            .bind(&input.isrc)
            .bind(&input.file_url)
            .bind(input.streams)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Track>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tracks WHERE id = $1");
        sqlx::query_as::<_, Track>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all tracks of a release in creation order.
    pub async fn list_by_release(
        pool: &PgPool,
        release_id: DbId,
    ) -> Result<Vec<Track>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tracks WHERE release_id = $1 ORDER BY id");
        sqlx::query_as::<_, Track>(&query)
            .bind(release_id)
            .fetch_all(pool)
            .await
    }

    /// The `(id, streams)` pairs of every track under a release.
    pub async fn list_stream_counts(
        pool: &PgPool,
        release_id: DbId,
    ) -> Result<Vec<TrackStreams>, sqlx::Error> {
        sqlx::query_as::<_, TrackStreams>(
            "SELECT id, streams FROM tracks WHERE release_id = $1 ORDER BY id",
        )
        .bind(release_id)
        .fetch_all(pool)
        .await
    }

    /// Update a track. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTrack,
    ) -> Result<Option<Track>, sqlx::Error> {
        let query = format!(
            "UPDATE tracks SET
                title = COALESCE($2, title),
                duration = COALESCE($3, duration),
                isrc = COALESCE($4, isrc),
                file_url = COALESCE($5, file_url),
                streams = COALESCE($6, streams)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Track>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.duration)
            .bind(&input.isrc)
            .bind(&input.file_url)
            .bind(input.streams)
            .fetch_optional(pool)
            .await
    }

    /// Apply a stream change to every track matching the filter.
    ///
    /// Returns the distinct release ids of the matched rows, ascending. An
    /// empty result means nothing matched.
    pub async fn bulk_update(
        pool: &PgPool,
        input: &BulkUpdateTracks,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "WITH updated AS (
                UPDATE tracks SET
                    streams = COALESCE($3, streams + COALESCE($4, 0))
                WHERE ($1::BIGINT IS NULL OR release_id = $1)
                  AND ($2::BIGINT[] IS NULL OR id = ANY($2))
                RETURNING release_id
             )
             SELECT DISTINCT release_id FROM updated ORDER BY release_id",
        )
        .bind(input.filter.release_id)
        .bind(&input.filter.track_ids)
        .bind(input.streams)
        .bind(input.add_streams)
        .fetch_all(pool)
        .await
    }

    /// Overwrite the royalty cache on a track.
    ///
    /// Returns the track's `(release_id, streams)` after the write, or `None`
    /// if the track no longer exists.
    pub async fn set_royalty(
        pool: &PgPool,
        id: DbId,
        royalty: Money,
    ) -> Result<Option<(DbId, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (DbId, i64)>(
            "UPDATE tracks SET royalty = $2 WHERE id = $1 RETURNING release_id, streams",
        )
        .bind(id)
        .bind(royalty.micros())
        .fetch_optional(pool)
        .await
    }

    /// Resolve the artist owning a track through its release.
    pub async fn find_artist_id(pool: &PgPool, id: DbId) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT r.artist_id FROM tracks t JOIN releases r ON r.id = t.release_id \
             WHERE t.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Delete a track, returning the removed row. Its ledger rows go with it
    /// by cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Track>, sqlx::Error> {
        let query = format!("DELETE FROM tracks WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Track>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
