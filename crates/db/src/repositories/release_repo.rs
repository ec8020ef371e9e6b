//! Repository for the `releases` table.

use royalty_core::money::Money;
use royalty_core::types::DbId;
use sqlx::PgPool;

use crate::models::release::{CreateRelease, Release, UpdateRelease};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, artist_id, title, release_date, cover_url, audio_url, status, \
                       streams, total_royalty, created_at, updated_at";

/// Provides CRUD operations for releases.
pub struct ReleaseRepo;

impl ReleaseRepo {
    /// Insert a new release, returning the created row.
    ///
    /// New releases start `PENDING` with zeroed aggregates.
    pub async fn create(pool: &PgPool, input: &CreateRelease) -> Result<Release, sqlx::Error> {
        let query = format!(
            "INSERT INTO releases (artist_id, title, release_date, cover_url, audio_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Release>(&query)
            .bind(input.artist_id)
            .bind(&input.title)
            .bind(input.release_date)
            .bind(&input.cover_url)
            .bind(&input.audio_url)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Release>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM releases WHERE id = $1");
        sqlx::query_as::<_, Release>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List an artist's releases, newest release date first.
    pub async fn list_by_artist(
        pool: &PgPool,
        artist_id: DbId,
    ) -> Result<Vec<Release>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM releases WHERE artist_id = $1 \
             ORDER BY release_date DESC, id DESC"
        );
        sqlx::query_as::<_, Release>(&query)
            .bind(artist_id)
            .fetch_all(pool)
            .await
    }

    /// Update a release's descriptive fields. Only non-`None` fields are
    /// applied; the aggregate columns are never touched here.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRelease,
    ) -> Result<Option<Release>, sqlx::Error> {
        let query = format!(
            "UPDATE releases SET
                title = COALESCE($2, title),
                release_date = COALESCE($3, release_date),
                cover_url = COALESCE($4, cover_url),
                audio_url = COALESCE($5, audio_url),
                status = COALESCE($6, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Release>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.release_date)
            .bind(&input.cover_url)
            .bind(&input.audio_url)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the derived aggregate columns in a single statement.
    ///
    /// Returns `false` if the release no longer exists.
    pub async fn update_aggregates(
        pool: &PgPool,
        id: DbId,
        streams: i64,
        total_royalty: Money,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE releases SET streams = $2, total_royalty = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(streams)
        .bind(total_royalty.micros())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete a release; its tracks and their ledger rows go with
    /// it by cascade. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM releases WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
