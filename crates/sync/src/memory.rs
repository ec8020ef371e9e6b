//! In-memory [`SyncStore`] used by the engine's unit tests.
//!
//! Also plays the part of the mutation event source: the `insert_track`,
//! `set_streams`, `remove_track` and `bulk_set_streams` helpers apply a
//! primary write and return the event the persistence boundary would emit.

use std::collections::BTreeMap;
use std::io;
use std::sync::Mutex;

use async_trait::async_trait;
use royalty_core::money::Money;
use royalty_core::mutation::TrackMutation;
use royalty_core::period::AccountingPeriod;
use royalty_core::types::DbId;
use royalty_db::models::track::TrackStreams;

use crate::error::StoreError;
use crate::store::{SyncStore, WrittenTrack};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemTrack {
    pub release_id: DbId,
    pub streams: i64,
    pub royalty: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemRelease {
    pub artist_id: DbId,
    pub streams: i64,
    pub total_royalty: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerCell {
    pub amount: Money,
    pub artist_id: DbId,
}

#[derive(Default)]
struct State {
    releases: BTreeMap<DbId, MemRelease>,
    tracks: BTreeMap<DbId, MemTrack>,
    ledger: BTreeMap<(DbId, AccountingPeriod), LedgerCell>,
    next_track_id: DbId,
    aggregate_writes: usize,
    royalty_writes: usize,
    fail_aggregate_writes: bool,
    fail_ledger_writes: bool,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

fn injected(operation: &str) -> StoreError {
    Box::new(io::Error::other(format!("injected failure: {operation}")))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty release owned by `artist_id`.
    pub fn with_release(self, release_id: DbId, artist_id: DbId) -> Self {
        self.lock().releases.insert(
            release_id,
            MemRelease {
                artist_id,
                streams: 0,
                total_royalty: Money::ZERO,
            },
        );
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("memory store mutex poisoned")
    }

    // -- simulated mutation event source --------------------------------

    pub fn insert_track(&self, release_id: DbId, streams: i64) -> TrackMutation {
        let mut state = self.lock();
        state.next_track_id += 1;
        let id = state.next_track_id;
        state.tracks.insert(
            id,
            MemTrack {
                release_id,
                streams,
                royalty: Money::ZERO,
            },
        );
        TrackMutation::created(id, release_id, streams)
    }

    pub fn set_streams(&self, track_id: DbId, streams: i64) -> TrackMutation {
        let mut state = self.lock();
        let track = state.tracks.get_mut(&track_id).expect("unknown track");
        track.streams = streams;
        TrackMutation::updated(track_id, track.release_id, streams)
    }

    /// Delete a track and, as the foreign-key cascade would, its ledger rows.
    pub fn remove_track(&self, track_id: DbId) -> TrackMutation {
        let mut state = self.lock();
        let track = state.tracks.remove(&track_id).expect("unknown track");
        state.ledger.retain(|(id, _), _| *id != track_id);
        TrackMutation::deleted(track_id, track.release_id)
    }

    pub fn bulk_set_streams(&self, release_id: DbId, streams: i64) -> TrackMutation {
        let mut state = self.lock();
        for track in state.tracks.values_mut().filter(|t| t.release_id == release_id) {
            track.streams = streams;
        }
        TrackMutation::bulk_updated(release_id)
    }

    /// Drop a release behind the engine's back, as a concurrent delete would.
    pub fn drop_release(&self, release_id: DbId) {
        self.lock().releases.remove(&release_id);
    }

    pub fn fail_aggregate_writes(&self) {
        self.lock().fail_aggregate_writes = true;
    }

    pub fn fail_ledger_writes(&self) {
        self.lock().fail_ledger_writes = true;
    }

    // -- inspection -----------------------------------------------------

    pub fn release(&self, release_id: DbId) -> Option<MemRelease> {
        self.lock().releases.get(&release_id).copied()
    }

    pub fn track(&self, track_id: DbId) -> Option<MemTrack> {
        self.lock().tracks.get(&track_id).copied()
    }

    pub fn ledger_rows(&self, track_id: DbId) -> Vec<(AccountingPeriod, LedgerCell)> {
        self.lock()
            .ledger
            .iter()
            .filter(|((id, _), _)| *id == track_id)
            .map(|((_, period), cell)| (*period, *cell))
            .collect()
    }

    pub fn aggregate_writes(&self) -> usize {
        self.lock().aggregate_writes
    }

    pub fn royalty_writes(&self) -> usize {
        self.lock().royalty_writes
    }
}

#[async_trait]
impl SyncStore for MemoryStore {
    async fn list_tracks_of_release(
        &self,
        release_id: DbId,
    ) -> Result<Vec<TrackStreams>, StoreError> {
        Ok(self
            .lock()
            .tracks
            .iter()
            .filter(|(_, t)| t.release_id == release_id)
            .map(|(id, t)| TrackStreams {
                id: *id,
                streams: t.streams,
            })
            .collect())
    }

    async fn update_release_aggregates(
        &self,
        release_id: DbId,
        streams: i64,
        total_royalty: Money,
    ) -> Result<bool, StoreError> {
        let mut state = self.lock();
        if state.fail_aggregate_writes {
            return Err(injected("update_release_aggregates"));
        }
        state.aggregate_writes += 1;
        match state.releases.get_mut(&release_id) {
            Some(release) => {
                release.streams = streams;
                release.total_royalty = total_royalty;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn write_track_royalty(
        &self,
        track_id: DbId,
        royalty: Money,
    ) -> Result<Option<WrittenTrack>, StoreError> {
        let mut state = self.lock();
        state.royalty_writes += 1;
        Ok(state.tracks.get_mut(&track_id).map(|track| {
            track.royalty = royalty;
            WrittenTrack {
                release_id: track.release_id,
                streams: track.streams,
            }
        }))
    }

    async fn resolve_artist_id(&self, track_id: DbId) -> Result<Option<DbId>, StoreError> {
        let state = self.lock();
        Ok(state
            .tracks
            .get(&track_id)
            .and_then(|t| state.releases.get(&t.release_id))
            .map(|r| r.artist_id))
    }

    async fn upsert_ledger_entry(
        &self,
        track_id: DbId,
        period: AccountingPeriod,
        amount: Money,
        artist_id: DbId,
    ) -> Result<(), StoreError> {
        let mut state = self.lock();
        if state.fail_ledger_writes {
            return Err(injected("upsert_ledger_entry"));
        }
        state
            .ledger
            .insert((track_id, period), LedgerCell { amount, artist_id });
        Ok(())
    }
}
