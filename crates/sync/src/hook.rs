use async_trait::async_trait;
use royalty_core::mutation::TrackMutation;

use crate::engine::SyncReport;

/// Called by the persistence boundary, in line with commit, after every
/// create, update, delete, or bulk update of tracks (and nothing else).
///
/// The returned report is informational. It must never change the outcome
/// of the write that produced the event.
#[async_trait]
pub trait TrackMutationHook: Send + Sync {
    async fn on_track_mutated(&self, event: TrackMutation) -> SyncReport;
}
