//! Repository for the `royalties` ledger table.

use royalty_core::money::Money;
use royalty_core::period::AccountingPeriod;
use royalty_core::types::DbId;
use sqlx::PgPool;

use crate::models::royalty::{RoyaltyDetail, RoyaltyEntry};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, track_id, artist_id, period, amount, created_at, updated_at";

/// Joined read view used by the listing queries.
const DETAIL_SELECT: &str = "SELECT ro.id, ro.track_id, t.title AS track_title, ro.artist_id, \
                             u.name AS artist_name, ro.period, ro.amount, ro.created_at, \
                             ro.updated_at \
                             FROM royalties ro \
                             JOIN tracks t ON t.id = ro.track_id \
                             JOIN users u ON u.id = ro.artist_id";

/// Provides the ledger upsert and read operations.
pub struct RoyaltyRepo;

impl RoyaltyRepo {
    /// Insert or overwrite the ledger row for `(track_id, period)`.
    ///
    /// A repeat within the same period replaces `amount` (and `artist_id`)
    /// on the existing row rather than adding another.
    pub async fn upsert(
        pool: &PgPool,
        track_id: DbId,
        period: AccountingPeriod,
        amount: Money,
        artist_id: DbId,
    ) -> Result<RoyaltyEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO royalties (track_id, period, amount, artist_id) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (track_id, period) \
             DO UPDATE SET amount = EXCLUDED.amount, artist_id = EXCLUDED.artist_id \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RoyaltyEntry>(&query)
            .bind(track_id)
            .bind(period.to_string())
            .bind(amount.micros())
            .bind(artist_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<RoyaltyDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE ro.id = $1");
        sqlx::query_as::<_, RoyaltyDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every ledger row, newest period first.
    pub async fn list(pool: &PgPool) -> Result<Vec<RoyaltyDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} ORDER BY ro.period DESC, ro.id");
        sqlx::query_as::<_, RoyaltyDetail>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_artist(
        pool: &PgPool,
        artist_id: DbId,
    ) -> Result<Vec<RoyaltyDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE ro.artist_id = $1 ORDER BY ro.period DESC, ro.id");
        sqlx::query_as::<_, RoyaltyDetail>(&query)
            .bind(artist_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_track(
        pool: &PgPool,
        track_id: DbId,
    ) -> Result<Vec<RoyaltyDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE ro.track_id = $1 ORDER BY ro.period DESC");
        sqlx::query_as::<_, RoyaltyDetail>(&query)
            .bind(track_id)
            .fetch_all(pool)
            .await
    }

    /// Count ledger rows for a track. Used by tests and diagnostics.
    pub async fn count_for_track(pool: &PgPool, track_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM royalties WHERE track_id = $1")
            .bind(track_id)
            .fetch_one(pool)
            .await
    }
}
