//! Release aggregate recalculation.
//!
//! Always re-derives the totals from the full current track set of the
//! release, never from the event payload, so it is idempotent and safe to
//! run redundantly.

use royalty_core::money::Money;
use royalty_core::royalty::RoyaltyCalculator;
use royalty_core::types::DbId;
use royalty_db::models::track::TrackStreams;

use crate::error::SyncError;
use crate::store::SyncStore;

/// Totals written to a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseTotals {
    pub release_id: DbId,
    pub streams: i64,
    pub total_royalty: Money,
    pub track_count: usize,
}

/// A completed recalculation plus any per-track contributions that had to be
/// clamped.
#[derive(Debug)]
pub struct Recalculation {
    pub totals: ReleaseTotals,
    pub warnings: Vec<SyncError>,
}

/// Sum stream counts and royalties over a release's tracks.
///
/// A negative stream count contributes zero to both sums and yields a
/// [`SyncError::Computation`] warning; the other tracks are still summed.
pub fn sum_tracks(
    calculator: &RoyaltyCalculator,
    release_id: DbId,
    tracks: &[TrackStreams],
) -> Recalculation {
    let mut warnings = Vec::new();
    let mut streams: i64 = 0;
    let mut total_royalty = Money::ZERO;

    for track in tracks {
        if track.streams < 0 {
            warnings.push(SyncError::Computation {
                track_id: track.id,
                streams: track.streams,
            });
        }
        let counted = track.streams.max(0);
        streams = streams.saturating_add(counted);
        total_royalty = total_royalty.saturating_add(calculator.royalty_for(counted));
    }

    Recalculation {
        totals: ReleaseTotals {
            release_id,
            streams,
            total_royalty,
            track_count: tracks.len(),
        },
        warnings,
    }
}

/// Read the release's tracks, sum them, and write both totals in one update.
pub async fn recalculate<S: SyncStore + ?Sized>(
    store: &S,
    calculator: &RoyaltyCalculator,
    release_id: DbId,
) -> Result<Recalculation, SyncError> {
    let tracks = store
        .list_tracks_of_release(release_id)
        .await
        .map_err(SyncError::persistence("list_tracks_of_release"))?;

    let recalculation = sum_tracks(calculator, release_id, &tracks);
    let totals = recalculation.totals;

    let found = store
        .update_release_aggregates(release_id, totals.streams, totals.total_royalty)
        .await
        .map_err(SyncError::persistence("update_release_aggregates"))?;

    if !found {
        return Err(SyncError::NotFound {
            entity: "Release",
            id: release_id,
        });
    }
    Ok(recalculation)
}
