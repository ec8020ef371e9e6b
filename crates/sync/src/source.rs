//! Mutation event source.
//!
//! The only sanctioned path for caller-initiated track writes. Each method
//! commits the primary write through [`TrackRepo`], builds the matching
//! [`TrackMutation`], and hands it synchronously to the configured
//! [`TrackMutationHook`] before returning. Errors from the primary write
//! propagate; anything the hook reports is only logged.

use std::sync::Arc;

use royalty_core::mutation::TrackMutation;
use royalty_core::types::DbId;
use royalty_db::models::track::{BulkUpdateTracks, CreateTrack, Track, UpdateTrack};
use royalty_db::repositories::TrackRepo;
use royalty_db::DbPool;

use crate::hook::TrackMutationHook;

#[derive(Clone)]
pub struct TrackMutations {
    pool: DbPool,
    hook: Arc<dyn TrackMutationHook>,
}

impl TrackMutations {
    pub fn new(pool: DbPool, hook: Arc<dyn TrackMutationHook>) -> Self {
        Self { pool, hook }
    }

    pub async fn create(&self, input: &CreateTrack) -> Result<Track, sqlx::Error> {
        let track = TrackRepo::create(&self.pool, input).await?;
        self.publish(TrackMutation::created(track.id, track.release_id, track.streams))
            .await;
        Ok(track)
    }

    /// Returns `None` (and emits nothing) if the track does not exist.
    pub async fn update(
        &self,
        id: DbId,
        input: &UpdateTrack,
    ) -> Result<Option<Track>, sqlx::Error> {
        let track = TrackRepo::update(&self.pool, id, input).await?;
        if let Some(track) = &track {
            self.publish(TrackMutation::updated(track.id, track.release_id, track.streams))
                .await;
        }
        Ok(track)
    }

    /// Returns the removed row, or `None` (and emits nothing) if the track
    /// did not exist.
    pub async fn delete(&self, id: DbId) -> Result<Option<Track>, sqlx::Error> {
        let track = TrackRepo::delete(&self.pool, id).await?;
        if let Some(track) = &track {
            self.publish(TrackMutation::deleted(track.id, track.release_id))
                .await;
        }
        Ok(track)
    }

    /// Apply a bulk stream change and emit one event per distinct release
    /// among the matched rows.
    ///
    /// Returns those release ids; empty if nothing matched.
    pub async fn bulk_update(&self, input: &BulkUpdateTracks) -> Result<Vec<DbId>, sqlx::Error> {
        let release_ids = TrackRepo::bulk_update(&self.pool, input).await?;
        for &release_id in &release_ids {
            self.publish(TrackMutation::bulk_updated(release_id)).await;
        }
        Ok(release_ids)
    }

    async fn publish(&self, event: TrackMutation) {
        let report = self.hook.on_track_mutated(event).await;
        if !report.is_clean() {
            tracing::debug!(
                errors = report.errors.len(),
                "Track write committed with incomplete royalty sync",
            );
        }
    }
}
