//! # Domain events emitted during a siege.
//!
//! The [`EventKind`] enum classifies what happened:
//! - **Duty events**: a guard went on watch or off duty
//! - **Combat events**: alarm raised, guard attacked, dragon damaged
//! - **Terminal events**: exactly one per siege, published by the race resolver
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Events from different guards carry no ordering beyond that.
//!
//! ## Example
//! ```rust
//! use castlewatch::{Event, EventKind, GuardId};
//!
//! let ev = Event::new(EventKind::DragonDamaged).with_hp(2);
//! assert_eq!(ev.kind, EventKind::DragonDamaged);
//! assert_eq!(ev.hp, Some(2));
//!
//! let ev = Event::new(EventKind::GuardAttacks).with_guard(GuardId(1));
//! assert_eq!(ev.guard, Some(GuardId(1)));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::core::GuardId;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of siege events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Duty events ===
    /// Guard was placed on watch.
    ///
    /// Sets:
    /// - `guard`: guard id
    GuardOnWatch,

    /// Guard was placed off duty (reported even if it was never on watch).
    ///
    /// Sets:
    /// - `guard`: guard id
    GuardOffDuty,

    // === Combat events ===
    /// The watchtower spotted the dragon and is sounding the alarm.
    CastleUnderAttack,

    /// A guard reacted to an alarm and strikes the dragon.
    ///
    /// Sets:
    /// - `guard`: guard id
    GuardAttacks,

    /// The dragon lost one point of integrity.
    ///
    /// Sets:
    /// - `hp`: integrity left after the hit
    DragonDamaged,

    // === Terminal events ===
    /// The guards won the race: the dragon died first.
    DragonDefeated,

    /// The dragon won the race: its timer destroyed the castle first.
    CastleDestroyed,
}

impl EventKind {
    /// True for the two outcome events; exactly one of them is published per siege.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, EventKind::DragonDefeated | EventKind::CastleDestroyed)
    }
}

/// Siege event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Guard the event is about, if applicable.
    pub guard: Option<GuardId>,
    /// Dragon integrity after a hit.
    pub hp: Option<i64>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            guard: None,
            hp: None,
        }
    }

    /// Attaches a guard id.
    #[inline]
    pub fn with_guard(mut self, guard: GuardId) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Attaches the dragon's remaining integrity.
    #[inline]
    pub fn with_hp(mut self, hp: i64) -> Self {
        self.hp = Some(hp);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::CastleUnderAttack);
        let b = Event::new(EventKind::CastleUnderAttack);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_only_outcomes_are_terminal() {
        assert!(EventKind::DragonDefeated.is_terminal());
        assert!(EventKind::CastleDestroyed.is_terminal());
        assert!(!EventKind::DragonDamaged.is_terminal());
        assert!(!EventKind::GuardOffDuty.is_terminal());
    }
}
