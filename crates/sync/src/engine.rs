//! The royalty synchronisation engine.
//!
//! [`RoyaltySync`] consumes [`TrackMutation`] events and, for each primary
//! event, runs two independent branches:
//!
//! 1. **Track branch** (create/update only): compute the royalty for the
//!    resulting stream count, write it to the track's cache (a derived
//!    write), then upsert the ledger row for the current period.
//! 2. **Aggregate branch** (every primary event): recompute the release's
//!    total streams and total royalty from its full track set.
//!
//! Derived writes produce derived events, which are fed back through the
//! same work queue and stopped by the re-entrancy guard. Every failure is
//! collected into the [`SyncReport`]; nothing is propagated.

use std::collections::VecDeque;

use async_trait::async_trait;
use royalty_core::mutation::{TrackMutation, TrackSnapshot};
use royalty_core::period::AccountingPeriod;
use royalty_core::royalty::RoyaltyCalculator;
use royalty_core::types::DbId;

use crate::aggregate::{self, ReleaseTotals};
use crate::error::SyncError;
use crate::guard::{self, Admission};
use crate::hook::TrackMutationHook;
use crate::ledger::{self, LedgerWrite};
use crate::store::SyncStore;

// ---------------------------------------------------------------------------
// PeriodClock
// ---------------------------------------------------------------------------

/// Source of the accounting period stamped on ledger rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodClock {
    /// The UTC calendar month at execution time.
    System,
    /// Always the given period.
    Fixed(AccountingPeriod),
}

impl PeriodClock {
    pub fn current(self) -> AccountingPeriod {
        match self {
            Self::System => AccountingPeriod::current(),
            Self::Fixed(period) => period,
        }
    }
}

// ---------------------------------------------------------------------------
// SyncReport
// ---------------------------------------------------------------------------

/// Outcome of handling one mutation event.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Events admitted by the guard and recomputed.
    pub recomputes: usize,
    /// Derived events stopped by the guard.
    pub suppressed: usize,
    /// Release totals written by the aggregate branch.
    pub totals: Option<ReleaseTotals>,
    /// Ledger cell written by the track branch.
    pub ledger: Option<LedgerWrite>,
    /// Everything that went wrong, in order.
    pub errors: Vec<SyncError>,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Log every collected error against the event that caused it.
    pub fn log(&self, event: &TrackMutation) {
        for error in &self.errors {
            match error {
                SyncError::NotFound { .. } | SyncError::Computation { .. } => {
                    tracing::warn!(
                        kind = %event.kind,
                        release_id = event.release_id,
                        track_id = ?event.track_id,
                        error = %error,
                        "Royalty sync skipped part of a recompute",
                    );
                }
                SyncError::Persistence { .. } => {
                    tracing::error!(
                        kind = %event.kind,
                        release_id = event.release_id,
                        track_id = ?event.track_id,
                        error = %error,
                        "Royalty sync write failed; aggregates stale until next mutation",
                    );
                }
            }
        }

        if let Some(totals) = self.totals {
            tracing::debug!(
                kind = %event.kind,
                release_id = totals.release_id,
                streams = totals.streams,
                total_royalty = %totals.total_royalty,
                recomputes = self.recomputes,
                suppressed = self.suppressed,
                errors = self.errors.len(),
                "Royalty sync finished",
            );
        }
    }
}

// ---------------------------------------------------------------------------
// RoyaltySync
// ---------------------------------------------------------------------------

/// Keeps release aggregates and the royalty ledger in step with track stream
/// counts.
pub struct RoyaltySync<S> {
    store: S,
    calculator: RoyaltyCalculator,
    clock: PeriodClock,
}

impl<S: SyncStore> RoyaltySync<S> {
    pub fn new(store: S, calculator: RoyaltyCalculator) -> Self {
        Self {
            store,
            calculator,
            clock: PeriodClock::System,
        }
    }

    /// Stamp every ledger row with `period` instead of the current month.
    pub fn with_fixed_period(mut self, period: AccountingPeriod) -> Self {
        self.clock = PeriodClock::Fixed(period);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn calculator(&self) -> &RoyaltyCalculator {
        &self.calculator
    }

    /// Run the pipeline for one event and everything it derives.
    pub async fn process(&self, event: TrackMutation) -> SyncReport {
        let mut report = SyncReport::default();
        let mut pending = VecDeque::from([event]);

        while let Some(event) = pending.pop_front() {
            if guard::admit(&event) == Admission::Terminal {
                report.suppressed += 1;
                continue;
            }
            report.recomputes += 1;

            if let Some(snapshot) = event.snapshot() {
                if let Some(derived) = self.sync_track(snapshot, &mut report).await {
                    pending.push_back(derived);
                }
            }

            self.sync_release(event.release_id, &mut report).await;
        }

        report
    }

    /// Calculator, derived track self-update, ledger upsert.
    ///
    /// Returns the derived event for the cache write, if one was committed.
    async fn sync_track(
        &self,
        snapshot: TrackSnapshot,
        report: &mut SyncReport,
    ) -> Option<TrackMutation> {
        let TrackSnapshot { track_id, streams } = snapshot;
        let royalty = self.calculator.royalty_for(streams);

        let derived = match self.store.write_track_royalty(track_id, royalty).await {
            Ok(Some(written)) => Some(TrackMutation::derived_update(
                track_id,
                written.release_id,
                written.streams,
            )),
            Ok(None) => {
                // Deleted between the primary write and now: nothing to book.
                report.errors.push(SyncError::NotFound {
                    entity: "Track",
                    id: track_id,
                });
                return None;
            }
            Err(e) => {
                report
                    .errors
                    .push(SyncError::persistence("write_track_royalty")(e));
                None
            }
        };

        match ledger::upsert(&self.store, track_id, self.clock.current(), royalty).await {
            Ok(write) => report.ledger = Some(write),
            Err(e) => report.errors.push(e),
        }

        derived
    }

    async fn sync_release(&self, release_id: DbId, report: &mut SyncReport) {
        match aggregate::recalculate(&self.store, &self.calculator, release_id).await {
            Ok(recalculation) => {
                report.totals = Some(recalculation.totals);
                report.errors.extend(recalculation.warnings);
            }
            Err(e) => report.errors.push(e),
        }
    }
}

#[async_trait]
impl<S: SyncStore> TrackMutationHook for RoyaltySync<S> {
    async fn on_track_mutated(&self, event: TrackMutation) -> SyncReport {
        let report = self.process(event.clone()).await;
        report.log(&event);
        report
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use royalty_core::money::Money;

    use super::*;
    use crate::memory::MemoryStore;

    fn march() -> AccountingPeriod {
        AccountingPeriod::new(2024, 3).unwrap()
    }

    fn engine(store: MemoryStore) -> RoyaltySync<MemoryStore> {
        RoyaltySync::new(store, RoyaltyCalculator::default()).with_fixed_period(march())
    }

    #[tokio::test]
    async fn create_books_royalty_release_and_ledger() {
        let sync = engine(MemoryStore::new().with_release(5, 42));
        let event = sync.store().insert_track(5, 100);
        let track_id = event.track_id.unwrap();

        let report = sync.on_track_mutated(event).await;

        assert!(report.is_clean(), "{:?}", report.errors);
        let store = sync.store();
        assert_eq!(store.track(track_id).unwrap().royalty, Money::from_cents(100));
        let release = store.release(5).unwrap();
        assert_eq!(release.streams, 100);
        assert_eq!(release.total_royalty, Money::from_cents(100));
        let rows = store.ledger_rows(track_id);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0.to_string(), "2024-03");
        assert_eq!(rows[0].1.amount.to_string(), "1.00");
        assert_eq!(rows[0].1.artist_id, 42);
    }

    #[tokio::test]
    async fn update_in_same_period_overwrites_ledger_row() {
        let sync = engine(MemoryStore::new().with_release(5, 42));
        let created = sync.store().insert_track(5, 100);
        let track_id = created.track_id.unwrap();
        sync.on_track_mutated(created).await;

        let updated = sync.store().set_streams(track_id, 250);
        let report = sync.on_track_mutated(updated).await;

        assert!(report.is_clean());
        let store = sync.store();
        assert_eq!(store.track(track_id).unwrap().royalty.to_string(), "2.50");
        let release = store.release(5).unwrap();
        assert_eq!(release.streams, 250);
        assert_eq!(release.total_royalty.to_string(), "2.50");
        let rows = store.ledger_rows(track_id);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].1.amount.to_string(), "2.50");
    }

    #[tokio::test]
    async fn update_in_new_period_adds_ledger_row() {
        let store = MemoryStore::new().with_release(5, 42);
        let created = store.insert_track(5, 100);
        let track_id = created.track_id.unwrap();

        let sync = engine(store);
        sync.on_track_mutated(created).await;

        let sync = RoyaltySync::new(sync.store, RoyaltyCalculator::default())
            .with_fixed_period(march().next());
        let updated = sync.store().set_streams(track_id, 180);
        sync.on_track_mutated(updated).await;

        let rows = sync.store().ledger_rows(track_id);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].1.amount.to_string(), "1.00");
        assert_eq!(rows[1].1.amount.to_string(), "1.80");
    }

    #[tokio::test]
    async fn delete_recomputes_release_and_drops_ledger_rows() {
        let sync = engine(MemoryStore::new().with_release(5, 42));
        let big = sync.store().insert_track(5, 250);
        let big_id = big.track_id.unwrap();
        sync.on_track_mutated(big).await;
        let small = sync.store().insert_track(5, 50);
        sync.on_track_mutated(small).await;
        assert_eq!(sync.store().release(5).unwrap().streams, 300);

        let deleted = sync.store().remove_track(big_id);
        let report = sync.on_track_mutated(deleted).await;

        assert!(report.is_clean());
        assert!(report.ledger.is_none());
        let release = sync.store().release(5).unwrap();
        assert_eq!(release.streams, 50);
        assert_eq!(release.total_royalty.to_string(), "0.50");
        assert!(sync.store().ledger_rows(big_id).is_empty());
    }

    #[tokio::test]
    async fn bulk_update_recomputes_release_once() {
        let sync = engine(MemoryStore::new().with_release(7, 42));
        for streams in [10, 20, 30] {
            let event = sync.store().insert_track(7, streams);
            sync.on_track_mutated(event).await;
        }
        let writes_before = sync.store().aggregate_writes();
        let royalty_writes_before = sync.store().royalty_writes();

        let bulk = sync.store().bulk_set_streams(7, 1_000);
        let report = sync.on_track_mutated(bulk).await;

        assert_eq!(report.recomputes, 1);
        assert_eq!(sync.store().aggregate_writes(), writes_before + 1);
        assert_eq!(sync.store().royalty_writes(), royalty_writes_before);
        assert!(report.ledger.is_none());
        let release = sync.store().release(7).unwrap();
        assert_eq!(release.streams, 3_000);
        assert_eq!(release.total_royalty.to_string(), "30.00");
    }

    #[tokio::test]
    async fn derived_write_does_not_recompute_again() {
        let sync = engine(MemoryStore::new().with_release(5, 42));
        let event = sync.store().insert_track(5, 100);

        let report = sync.process(event).await;

        assert_eq!(report.recomputes, 1);
        assert_eq!(report.suppressed, 1);
        assert_eq!(sync.store().aggregate_writes(), 1);
        assert_eq!(sync.store().royalty_writes(), 1);
    }

    #[tokio::test]
    async fn derived_event_alone_is_dropped() {
        let sync = engine(MemoryStore::new().with_release(5, 42));
        sync.store().insert_track(5, 100);

        let report = sync
            .process(TrackMutation::derived_update(1, 5, 100))
            .await;

        assert_eq!(report.recomputes, 0);
        assert_eq!(report.suppressed, 1);
        assert_eq!(sync.store().aggregate_writes(), 0);
        assert_eq!(sync.store().release(5).unwrap().streams, 0);
    }

    #[tokio::test]
    async fn aggregate_failure_still_books_ledger() {
        let sync = engine(MemoryStore::new().with_release(5, 42));
        sync.store().fail_aggregate_writes();
        let event = sync.store().insert_track(5, 100);
        let track_id = event.track_id.unwrap();

        let report = sync.on_track_mutated(event).await;

        assert_eq!(report.errors.len(), 1);
        assert_matches!(report.errors[0], SyncError::Persistence { .. });
        assert!(report.totals.is_none());
        assert_eq!(sync.store().ledger_rows(track_id).len(), 1);
    }

    #[tokio::test]
    async fn ledger_failure_still_updates_release() {
        let sync = engine(MemoryStore::new().with_release(5, 42));
        sync.store().fail_ledger_writes();
        let event = sync.store().insert_track(5, 100);

        let report = sync.on_track_mutated(event).await;

        assert_matches!(
            report.errors.as_slice(),
            [SyncError::Persistence {
                operation: "upsert_ledger_entry",
                ..
            }]
        );
        assert_eq!(sync.store().release(5).unwrap().streams, 100);
    }

    #[tokio::test]
    async fn vanished_release_is_reported_not_raised() {
        let sync = engine(MemoryStore::new().with_release(5, 42));
        let event = sync.store().insert_track(5, 100);
        sync.store().drop_release(5);

        let report = sync.on_track_mutated(event).await;

        assert!(report
            .errors
            .iter()
            .any(|e| matches!(e, SyncError::NotFound { entity: "Release", id: 5 })));
    }

    #[tokio::test]
    async fn negative_streams_clamp_to_zero() {
        let sync = engine(MemoryStore::new().with_release(5, 42));
        let good = sync.store().insert_track(5, 40);
        sync.on_track_mutated(good).await;
        let bad = sync.store().insert_track(5, -5);
        let bad_id = bad.track_id.unwrap();

        let report = sync.on_track_mutated(bad).await;

        assert_matches!(
            report.errors.as_slice(),
            [SyncError::Computation { streams: -5, .. }]
        );
        assert_eq!(sync.store().track(bad_id).unwrap().royalty, Money::ZERO);
        let release = sync.store().release(5).unwrap();
        assert_eq!(release.streams, 40);
        assert_eq!(release.total_royalty.to_string(), "0.40");
    }

    #[tokio::test]
    async fn settled_release_matches_sum_of_tracks() {
        let sync = engine(MemoryStore::new().with_release(5, 42).with_release(6, 43));
        let mut ids = Vec::new();
        for (release, streams) in [(5, 10), (6, 7), (5, 300), (5, 0), (6, 91)] {
            let event = sync.store().insert_track(release, streams);
            ids.push(event.track_id.unwrap());
            sync.on_track_mutated(event).await;
        }
        let event = sync.store().set_streams(ids[0], 55);
        sync.on_track_mutated(event).await;
        let event = sync.store().remove_track(ids[4]);
        sync.on_track_mutated(event).await;

        let calc = RoyaltyCalculator::default();
        for release_id in [5, 6] {
            let tracks = sync.store().list_tracks_of_release(release_id).await.unwrap();
            let expected_streams: i64 = tracks.iter().map(|t| t.streams).sum();
            let expected_royalty: Money = tracks.iter().map(|t| calc.royalty_for(t.streams)).sum();
            let release = sync.store().release(release_id).unwrap();
            assert_eq!(release.streams, expected_streams);
            assert_eq!(release.total_royalty, expected_royalty);
        }
    }
}
