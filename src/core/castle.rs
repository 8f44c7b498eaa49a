//! # Castle: owns the guards and the watchtower.
//!
//! The castle assigns duties once, exposes the watchtower's alarm through the
//! [`Adversary`] seam, and carries the "castle destroyed" terminal latch.
//!
//! ## State machine
//! ```text
//! Unassigned ──assign_guards()──► Assigned ──(dragon dead | destroy())──► Resolved
//! ```
//! No transitions lead back. Resolution itself is observed by the siege runner;
//! the castle only owns the `destroyed` half of the race.
//!
//! ## Rules
//! - Exactly one guard, picked uniformly at random, starts off duty.
//! - Guards are only reachable through the castle.
//! - `reassign` is allowed after assignment; the watchtower reads its roster at
//!   trigger time, so moving guards never desynchronizes the alarm count.

use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use tokio::sync::Mutex;
use tokio_util::sync::WaitForCancellationFuture;

use crate::core::dragon::Danger;
use crate::core::guard::{Duty, Guard, GuardId};
use crate::core::latch::Latch;
use crate::core::watchtower::Watchtower;
use crate::error::SiegeError;
use crate::events::Bus;

/// What a raiding dragon can do to whatever it attacks.
#[async_trait]
pub trait Adversary: Send + Sync + 'static {
    /// Gets spotted: sounds the alarm and waits until it reached every guard on watch.
    ///
    /// Returns the number of alarms received.
    async fn spot(&self, danger: Arc<dyn Danger>) -> usize;

    /// Destroys the target. Returns true only for the call that did it.
    fn destroy(&self) -> bool;

    /// True once destroyed.
    fn is_destroyed(&self) -> bool;
}

/// A castle with its guards and watchtower.
pub struct Castle {
    guards: Vec<Guard>,
    tower: Watchtower,
    destroyed: Latch,
    assigned: Mutex<bool>,
}

impl Castle {
    /// Creates a castle with `n_guards` off-duty guards.
    pub fn new(n_guards: usize, bus: Bus) -> Result<Self, SiegeError> {
        if n_guards == 0 {
            return Err(SiegeError::NoGuards);
        }
        let guards = (0..n_guards)
            .map(|i| Guard::new(GuardId(i), bus.clone()))
            .collect();

        Ok(Self {
            guards,
            tower: Watchtower::new(bus),
            destroyed: Latch::new(),
            assigned: Mutex::new(false),
        })
    }

    /// Assigns initial duties: one random guard off duty, everyone else on watch.
    ///
    /// Returns the id of the off-duty guard. Runs once per castle.
    pub async fn assign_guards<R: Rng>(&self, rng: &mut R) -> Result<GuardId, SiegeError> {
        let mut assigned = self.assigned.lock().await;
        if *assigned {
            return Err(SiegeError::AlreadyAssigned);
        }

        let off = GuardId(rng.random_range(0..self.guards.len()));
        for guard in &self.guards {
            if guard.id() == off {
                guard.retire(&self.tower).await;
                guard.report_off_duty();
            } else {
                guard.stand_watch(&self.tower).await;
            }
        }

        *assigned = true;
        Ok(off)
    }

    /// Moves a guard to another duty after the initial assignment.
    pub async fn reassign(&self, id: GuardId, duty: Duty) -> Result<(), SiegeError> {
        if !*self.assigned.lock().await {
            return Err(SiegeError::NotAssigned);
        }
        let guard = self.guard(id).ok_or(SiegeError::UnknownGuard { id })?;

        match duty {
            Duty::OnWatch => guard.stand_watch(&self.tower).await,
            Duty::OffDuty => {
                guard.off_duty(&self.tower).await;
            }
        }
        Ok(())
    }

    /// Silently revokes every guard's watch.
    pub async fn stand_down(&self) {
        for guard in &self.guards {
            guard.retire(&self.tower).await;
        }
    }

    /// Looks up a guard by id.
    pub fn guard(&self, id: GuardId) -> Option<&Guard> {
        self.guards.get(id.0)
    }

    /// All guards, in id order.
    pub fn guards(&self) -> &[Guard] {
        &self.guards
    }

    /// Sorted ids of guards currently on watch.
    pub async fn on_watch(&self) -> Vec<GuardId> {
        self.tower.on_watch().await
    }

    /// Completes once the castle has been destroyed.
    pub fn destroyed(&self) -> WaitForCancellationFuture<'_> {
        self.destroyed.wait()
    }
}

#[async_trait]
impl Adversary for Castle {
    async fn spot(&self, danger: Arc<dyn Danger>) -> usize {
        self.tower.spot(danger).await
    }

    fn destroy(&self) -> bool {
        self.destroyed.fire()
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed.is_fired()
    }
}
