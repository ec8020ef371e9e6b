//! Re-entrancy guard.
//!
//! The engine's own royalty-cache write on a track is itself a track
//! mutation. Admitting it would recompute, write the cache again, and loop
//! forever. Events tagged [`MutationOrigin::Derived`] are therefore terminal:
//! already committed, never resubmitted.

use royalty_core::mutation::{MutationOrigin, TrackMutation};

/// What the engine should do with an incoming event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Caller-initiated: run the recalculation pipeline once.
    Recompute,
    /// Engine-issued: stop here.
    Terminal,
}

pub fn admit(event: &TrackMutation) -> Admission {
    match event.origin {
        MutationOrigin::Primary => Admission::Recompute,
        MutationOrigin::Derived => Admission::Terminal,
    }
}
