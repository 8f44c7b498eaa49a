//! # Siege: wires the castle, the dragon and the event log, and runs the race.
//!
//! ## High-level flow
//! ```text
//! run(rng):
//!   feed = Bus.subscribe()                    nothing published from here on is missed
//!   castle.assign_guards(rng)                 one off duty, the rest on watch
//!     └─ Err ─► SubscriberSet::close(), return the error
//!   SubscriberSet::listen(feed)               event log runs until the terminal event
//!   raid.approach(castle)                     alarm fanned out, timer armed
//!
//!   resolve: select! (biased)
//!     ├─ dragon.dead()       ─► Outcome::DragonDefeated
//!     └─ castle.destroyed()  ─► Outcome::CastleDestroyed
//!
//!   castle.stand_down()                       no guard reacts any more
//!   publish terminal event                    exactly one per siege
//!   await listener                            every subscriber queue drained
//! ```
//!
//! ## Rules
//! - The dragon's death is polled first: if both latches fired, the guards win.
//! - The terminal event is the last one the subscribers see; anything published
//!   after it (a late strike still in flight) is not forwarded.
//! - A siege that fails to start leaves no subscriber worker behind.

use std::sync::Arc;

use rand::Rng;
use tracing::{debug, warn};

use crate::config::Config;
use crate::core::builder::SiegeBuilder;
use crate::core::castle::Castle;
use crate::core::dragon::Dragon;
use crate::core::raid::Raid;
use crate::error::SiegeError;
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::SubscriberSet;

/// How a siege ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The guards killed the dragon before its strike.
    DragonDefeated,
    /// The dragon's strike destroyed the castle first.
    CastleDestroyed,
}

impl Outcome {
    fn event_kind(self) -> EventKind {
        match self {
            Outcome::DragonDefeated => EventKind::DragonDefeated,
            Outcome::CastleDestroyed => EventKind::CastleDestroyed,
        }
    }
}

/// One encounter between a castle and a dragon.
pub struct Siege {
    /// Settings the siege was built with.
    pub cfg: Config,
    bus: Bus,
    subs: SubscriberSet,
    castle: Arc<Castle>,
    dragon: Arc<Dragon>,
}

impl Siege {
    /// Starts building a siege from `cfg`.
    pub fn builder(cfg: Config) -> SiegeBuilder {
        SiegeBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: Config,
        bus: Bus,
        subs: SubscriberSet,
        castle: Arc<Castle>,
        dragon: Arc<Dragon>,
    ) -> Self {
        Self {
            cfg,
            bus,
            subs,
            castle,
            dragon,
        }
    }

    /// The defending castle.
    pub fn castle(&self) -> &Arc<Castle> {
        &self.castle
    }

    /// The attacking dragon.
    pub fn dragon(&self) -> &Arc<Dragon> {
        &self.dragon
    }

    /// Runs the siege to its outcome and drains all subscribers.
    ///
    /// On error the subscribers are drained too, before the error is returned.
    pub async fn run<R: Rng>(self, rng: &mut R) -> Result<Outcome, SiegeError> {
        let Siege {
            cfg,
            bus,
            subs,
            castle,
            dragon,
        } = self;

        let feed = bus.subscribe();
        let off = match castle.assign_guards(rng).await {
            Ok(off) => off,
            Err(e) => {
                subs.close().await;
                return Err(e);
            }
        };
        debug!(guard = %off, "duties assigned");
        let listener = subs.listen(feed);

        let raid = Raid::new(dragon.clone(), cfg.raid_delay);
        let _timer = raid.approach(castle.clone()).await;

        let outcome = resolve(&dragon, &castle).await;

        castle.stand_down().await;
        bus.publish(Event::new(outcome.event_kind()));

        if let Err(e) = listener.await {
            warn!(error = %e, "event listener failed");
        }
        Ok(outcome)
    }
}

/// Waits for the first terminal latch. The dragon's death wins a tie.
async fn resolve(dragon: &Dragon, castle: &Castle) -> Outcome {
    tokio::select! {
        biased;
        _ = dragon.dead() => Outcome::DragonDefeated,
        _ = castle.destroyed() => Outcome::CastleDestroyed,
    }
}
