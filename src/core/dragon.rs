//! # Dragon: the target the guards strike at.
//!
//! The dragon holds a decrementing integrity (`hp`) and a one-shot `dead` latch.
//!
//! ## Rules
//! - `take_damage` decrements by exactly one under a mutex; the `dead` latch is
//!   fired inside the same critical section when `hp` reaches zero.
//! - Damage to a dead dragon is ignored: no decrement, no event. `hp` never goes
//!   below zero, so the positive → zero transition happens exactly once.
//! - `is_alive` is a point-in-time read with no stronger consistency.
//!
//! ```text
//! take_damage():  lock ─► hp <= 0 ? ignore
//!                         hp -= 1 ─► publish DragonDamaged{hp}
//!                         hp == 0 ? dead.fire()
//!                 unlock
//! ```

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio_util::sync::WaitForCancellationFuture;
use tracing::debug;

use crate::core::latch::Latch;
use crate::events::{Bus, Event, EventKind};

/// Something guards can attack.
///
/// Alarms carry a shared `Arc<dyn Danger>`, never ownership of the target.
#[async_trait]
pub trait Danger: Send + Sync + 'static {
    /// Applies one hit.
    async fn take_damage(&self);

    /// True while the target still has integrity left.
    async fn is_alive(&self) -> bool;
}

/// The attacking dragon.
pub struct Dragon {
    hp: Mutex<i64>,
    dead: Latch,
    bus: Bus,
}

impl Dragon {
    /// Creates a dragon with the given starting integrity.
    ///
    /// A dragon created with `hp == 0` is already dead.
    pub fn new(hp: u32, bus: Bus) -> Self {
        let dead = Latch::new();
        if hp == 0 {
            dead.fire();
        }
        Self {
            hp: Mutex::new(i64::from(hp)),
            dead,
            bus,
        }
    }

    /// Current integrity.
    pub async fn hp(&self) -> i64 {
        *self.hp.lock().await
    }

    /// Completes once the dragon has died.
    pub fn dead(&self) -> WaitForCancellationFuture<'_> {
        self.dead.wait()
    }

    /// True once the dragon has died.
    pub fn is_dead(&self) -> bool {
        self.dead.is_fired()
    }
}

#[async_trait]
impl Danger for Dragon {
    async fn take_damage(&self) {
        let mut hp = self.hp.lock().await;
        if *hp <= 0 {
            debug!("hit on a dead dragon ignored");
            return;
        }

        *hp -= 1;
        self.bus
            .publish(Event::new(EventKind::DragonDamaged).with_hp(*hp));

        if *hp == 0 {
            self.dead.fire();
        }
    }

    async fn is_alive(&self) -> bool {
        *self.hp.lock().await > 0
    }
}
