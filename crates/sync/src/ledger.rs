//! Royalty ledger upserts.
//!
//! One row per (track, accounting period). Re-evaluating the same period
//! overwrites the amount; a new period inserts a new row. Rows are only ever
//! removed by the cascade on track deletion.

use royalty_core::money::Money;
use royalty_core::period::AccountingPeriod;
use royalty_core::types::DbId;

use crate::error::SyncError;
use crate::store::SyncStore;

/// A ledger cell as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerWrite {
    pub track_id: DbId,
    pub artist_id: DbId,
    pub period: AccountingPeriod,
    pub amount: Money,
}

/// Resolve the owning artist and upsert `(track_id, period) = amount`.
pub async fn upsert<S: SyncStore + ?Sized>(
    store: &S,
    track_id: DbId,
    period: AccountingPeriod,
    amount: Money,
) -> Result<LedgerWrite, SyncError> {
    let artist_id = store
        .resolve_artist_id(track_id)
        .await
        .map_err(SyncError::persistence("resolve_artist_id"))?
        .ok_or(SyncError::NotFound {
            entity: "Track",
            id: track_id,
        })?;

    store
        .upsert_ledger_entry(track_id, period, amount, artist_id)
        .await
        .map_err(SyncError::persistence("upsert_ledger_entry"))?;

    Ok(LedgerWrite {
        track_id,
        artist_id,
        period,
        amount,
    })
}
