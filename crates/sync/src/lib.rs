//! Derived-state synchronisation for the royalty platform.
//!
//! Every committed track write is turned into a [`TrackMutation`] by the
//! [`TrackMutations`] event source and handed to [`RoyaltySync`], which
//! keeps release aggregates and the per-period royalty ledger in step with
//! the authoritative stream counters.
//!
//! - [`guard`]: stops the engine's own writes from re-triggering it.
//! - [`aggregate`]: release totals from the full track set.
//! - [`ledger`]: one ledger row per (track, accounting period).
//! - [`store`]: the storage seam and its PostgreSQL implementation.
//!
//! [`TrackMutation`]: royalty_core::mutation::TrackMutation

pub mod aggregate;
pub mod engine;
pub mod error;
pub mod guard;
pub mod hook;
pub mod ledger;
pub mod source;
pub mod store;

#[cfg(test)]
mod memory;

pub use engine::{PeriodClock, RoyaltySync, SyncReport};
pub use error::{StoreError, SyncError};
pub use hook::TrackMutationHook;
pub use source::TrackMutations;
pub use store::{PgSyncStore, SyncStore};
