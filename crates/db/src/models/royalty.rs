//! Royalty ledger models.
//!
//! Ledger rows are written only by the synchronisation engine's upsert, so
//! there are no create/update DTOs.

use royalty_core::money::Money;
use royalty_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `royalties` table: one per (track, accounting period).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RoyaltyEntry {
    pub id: DbId,
    pub track_id: DbId,
    pub artist_id: DbId,
    /// Accounting period key, `YYYY-MM`.
    pub period: String,
    #[sqlx(try_from = "i64")]
    pub amount: Money,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A ledger row joined with its track title and artist name, for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RoyaltyDetail {
    pub id: DbId,
    pub track_id: DbId,
    pub track_title: String,
    pub artist_id: DbId,
    pub artist_name: String,
    pub period: String,
    #[sqlx(try_from = "i64")]
    pub amount: Money,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
