use royalty_core::types::DbId;

/// Boxed error returned by [`SyncStore`](crate::store::SyncStore)
/// implementations.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Failures inside the synchronisation pipeline.
///
/// None of these ever reach the caller of the primary track mutation; they
/// are collected into a [`SyncReport`](crate::engine::SyncReport) and logged.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The release or track targeted by a recompute no longer exists.
    #[error("{entity} {id} no longer exists")]
    NotFound { entity: &'static str, id: DbId },

    /// A stream counter below zero reached the calculator. Its contribution
    /// was clamped to zero.
    #[error("Track {track_id} has negative stream count {streams}; clamped to zero")]
    Computation { track_id: DbId, streams: i64 },

    /// A store read or write failed.
    #[error("Store operation '{operation}' failed: {source}")]
    Persistence {
        operation: &'static str,
        #[source]
        source: StoreError,
    },
}

impl SyncError {
    pub(crate) fn persistence(operation: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Persistence { operation, source }
    }
}
