//! Storage seam consumed by the synchronisation engine.
//!
//! [`SyncStore`] names exactly the reads and writes the engine performs.
//! [`PgSyncStore`] implements it over the repository layer; unit tests use
//! an in-memory implementation.

use async_trait::async_trait;
use royalty_core::money::Money;
use royalty_core::period::AccountingPeriod;
use royalty_core::types::DbId;
use royalty_db::models::track::TrackStreams;
use royalty_db::repositories::{ReleaseRepo, RoyaltyRepo, TrackRepo};
use royalty_db::DbPool;

use crate::error::StoreError;

/// The state of a track right after the engine wrote its royalty cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrittenTrack {
    pub release_id: DbId,
    pub streams: i64,
}

#[async_trait]
pub trait SyncStore: Send + Sync {
    /// `(id, streams)` of every track currently under the release.
    async fn list_tracks_of_release(&self, release_id: DbId)
        -> Result<Vec<TrackStreams>, StoreError>;

    /// Overwrite a release's aggregates. `Ok(false)` means the release does
    /// not exist.
    async fn update_release_aggregates(
        &self,
        release_id: DbId,
        streams: i64,
        total_royalty: Money,
    ) -> Result<bool, StoreError>;

    /// Overwrite the royalty cache on a track. `Ok(None)` means the track does
    /// not exist.
    async fn write_track_royalty(
        &self,
        track_id: DbId,
        royalty: Money,
    ) -> Result<Option<WrittenTrack>, StoreError>;

    /// The artist owning the track's release, if the track still exists.
    async fn resolve_artist_id(&self, track_id: DbId) -> Result<Option<DbId>, StoreError>;

    /// Insert or overwrite the ledger row for `(track_id, period)`.
    async fn upsert_ledger_entry(
        &self,
        track_id: DbId,
        period: AccountingPeriod,
        amount: Money,
        artist_id: DbId,
    ) -> Result<(), StoreError>;
}

/// [`SyncStore`] backed by PostgreSQL through the repository layer.
#[derive(Clone)]
pub struct PgSyncStore {
    pool: DbPool,
}

impl PgSyncStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SyncStore for PgSyncStore {
    async fn list_tracks_of_release(
        &self,
        release_id: DbId,
    ) -> Result<Vec<TrackStreams>, StoreError> {
        Ok(TrackRepo::list_stream_counts(&self.pool, release_id).await?)
    }

    async fn update_release_aggregates(
        &self,
        release_id: DbId,
        streams: i64,
        total_royalty: Money,
    ) -> Result<bool, StoreError> {
        Ok(ReleaseRepo::update_aggregates(&self.pool, release_id, streams, total_royalty).await?)
    }

    async fn write_track_royalty(
        &self,
        track_id: DbId,
        royalty: Money,
    ) -> Result<Option<WrittenTrack>, StoreError> {
        let row = TrackRepo::set_royalty(&self.pool, track_id, royalty).await?;
        Ok(row.map(|(release_id, streams)| WrittenTrack {
            release_id,
            streams,
        }))
    }

    async fn resolve_artist_id(&self, track_id: DbId) -> Result<Option<DbId>, StoreError> {
        Ok(TrackRepo::find_artist_id(&self.pool, track_id).await?)
    }

    async fn upsert_ledger_entry(
        &self,
        track_id: DbId,
        period: AccountingPeriod,
        amount: Money,
        artist_id: DbId,
    ) -> Result<(), StoreError> {
        RoyaltyRepo::upsert(&self.pool, track_id, period, amount, artist_id).await?;
        Ok(())
    }
}
