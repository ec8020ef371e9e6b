use std::sync::Arc;

use royalty_sync::{TrackMutationHook, TrackMutations};

use crate::config::ServerConfig;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheap to clone: everything inside is a pool handle or behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: royalty_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Event source for every caller-initiated track write. Handlers must
    /// never write tracks through `TrackRepo` directly.
    pub tracks: TrackMutations,
}

impl AppState {
    /// Build state whose track writes notify `hook`.
    pub fn new(
        pool: royalty_db::DbPool,
        config: Arc<ServerConfig>,
        hook: Arc<dyn TrackMutationHook>,
    ) -> Self {
        let tracks = TrackMutations::new(pool.clone(), hook);
        Self {
            pool,
            config,
            tracks,
        }
    }
}
