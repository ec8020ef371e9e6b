//! Track mutation events.
//!
//! The persistence boundary constructs one [`TrackMutation`] per committed
//! track write and hands it to the royalty synchronisation engine. Every
//! event carries an explicit [`MutationOrigin`] so the engine can tell
//! caller-initiated writes from its own corrective writes.

use serde::Serialize;

use crate::types::DbId;

/// What happened to the track row(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    Create,
    Update,
    Delete,
    BulkUpdate,
}

impl MutationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::BulkUpdate => "bulk_update",
        }
    }
}

impl std::fmt::Display for MutationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who issued the write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationOrigin {
    /// A caller-initiated write; eligible for recomputation.
    Primary,
    /// A write issued by the synchronisation engine itself; terminal.
    Derived,
}

/// The resulting state of a single created or updated track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrackSnapshot {
    pub track_id: DbId,
    pub streams: i64,
}

/// A committed write against the `tracks` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackMutation {
    pub kind: MutationKind,
    pub origin: MutationOrigin,
    /// Release owning the affected track(s). For bulk updates this is one
    /// distinct release among the rows matched by the filter.
    pub release_id: DbId,
    /// Id of the affected track. `None` for bulk updates.
    pub track_id: Option<DbId>,
    /// Resulting stream count. Only present for create and update.
    pub streams: Option<i64>,
}

impl TrackMutation {
    pub fn created(track_id: DbId, release_id: DbId, streams: i64) -> Self {
        Self {
            kind: MutationKind::Create,
            origin: MutationOrigin::Primary,
            release_id,
            track_id: Some(track_id),
            streams: Some(streams),
        }
    }

    pub fn updated(track_id: DbId, release_id: DbId, streams: i64) -> Self {
        Self {
            kind: MutationKind::Update,
            origin: MutationOrigin::Primary,
            release_id,
            track_id: Some(track_id),
            streams: Some(streams),
        }
    }

    pub fn deleted(track_id: DbId, release_id: DbId) -> Self {
        Self {
            kind: MutationKind::Delete,
            origin: MutationOrigin::Primary,
            release_id,
            track_id: Some(track_id),
            streams: None,
        }
    }

    pub fn bulk_updated(release_id: DbId) -> Self {
        Self {
            kind: MutationKind::BulkUpdate,
            origin: MutationOrigin::Primary,
            release_id,
            track_id: None,
            streams: None,
        }
    }

    /// The update event produced by the engine's own write of the royalty
    /// cache on a track.
    pub fn derived_update(track_id: DbId, release_id: DbId, streams: i64) -> Self {
        Self {
            origin: MutationOrigin::Derived,
            ..Self::updated(track_id, release_id, streams)
        }
    }

    pub fn is_derived(&self) -> bool {
        self.origin == MutationOrigin::Derived
    }

    /// The resulting track row, for create and update events.
    pub fn snapshot(&self) -> Option<TrackSnapshot> {
        match (self.kind, self.track_id, self.streams) {
            (MutationKind::Create | MutationKind::Update, Some(track_id), Some(streams)) => {
                Some(TrackSnapshot { track_id, streams })
            }
            _ => None,
        }
    }
}
