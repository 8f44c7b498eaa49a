//! # Guard: a worker that reacts to alarms while on watch.
//!
//! A guard is either **on watch** (enlisted with the watchtower, reaction loop
//! running) or **off duty** (not enlisted, no loop). Guards start off duty.
//!
//! ## Reaction loop
//! ```text
//! loop {
//!   select! (biased) {
//!     revoke.cancelled()  ─► exit
//!     queue.recv()        ─► None        ─► exit (queue replaced or dropped)
//!                         ─► Some(alarm) ─► acknowledge ─► attack(danger) ─► continue
//!   }
//! }
//! ```
//!
//! ## Rules
//! - At most one reaction loop per guard: going on watch again revokes and joins
//!   the previous loop before spawning a new one.
//! - Every revocation token is used for exactly one loop generation; after it is
//!   cancelled it is replaced by a fresh armed token, so repeated `off_duty`
//!   calls never cancel anything twice.
//! - Revocation never interrupts an attack already in progress.

use std::fmt;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::core::dragon::Danger;
use crate::core::watchtower::{Alarm, Watchtower};
use crate::events::{Bus, Event, EventKind};

/// Identifies a guard within its castle (index in the castle's guard list).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GuardId(pub usize);

impl fmt::Display for GuardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Duty a guard can be assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Duty {
    /// Enlisted with the watchtower and reacting to alarms.
    OnWatch,
    /// Not reacting to alarms.
    OffDuty,
}

/// Mutable duty state, guarded by one mutex.
struct Watch {
    revoke: CancellationToken,
    on_duty: bool,
    patrol: Option<JoinHandle<()>>,
}

impl Watch {
    /// Cancels the current generation and arms a fresh token in its place.
    fn revoke(&mut self) {
        self.revoke.cancel();
        self.revoke = CancellationToken::new();
        self.on_duty = false;
    }
}

/// A castle guard.
pub struct Guard {
    id: GuardId,
    bus: Bus,
    watch: Mutex<Watch>,
}

impl Guard {
    /// Creates an off-duty guard.
    pub fn new(id: GuardId, bus: Bus) -> Self {
        Self {
            id,
            bus,
            watch: Mutex::new(Watch {
                revoke: CancellationToken::new(),
                on_duty: false,
                patrol: None,
            }),
        }
    }

    /// This guard's id.
    pub fn id(&self) -> GuardId {
        self.id
    }

    /// True while a reaction loop generation is live.
    pub async fn is_on_watch(&self) -> bool {
        self.watch.lock().await.on_duty
    }

    /// Puts the guard on watch: enlists with `tower` and spawns the reaction loop.
    ///
    /// Returns once the loop is scheduled; it does not wait for any alarm.
    pub async fn stand_watch(&self, tower: &Watchtower) {
        let mut watch = self.watch.lock().await;
        if watch.on_duty {
            watch.revoke();
        }
        if let Some(prev) = watch.patrol.take() {
            if let Err(e) = prev.await {
                warn!(guard = %self.id, error = %e, "previous reaction loop failed");
            }
        }

        let queue = tower.enlist(self.id).await;
        let token = watch.revoke.clone();
        watch.on_duty = true;
        self.bus
            .publish(Event::new(EventKind::GuardOnWatch).with_guard(self.id));

        watch.patrol = Some(tokio::spawn(patrol(
            self.id,
            queue,
            token,
            self.bus.clone(),
        )));
    }

    /// Takes the guard off duty.
    ///
    /// Safe to call at any time, including on a guard that was never on watch.
    /// Returns true if a running watch was revoked; only then is it reported.
    pub async fn off_duty(&self, tower: &Watchtower) -> bool {
        let revoked = self.retire(tower).await;
        if revoked {
            self.report_off_duty();
        }
        revoked
    }

    pub(crate) fn report_off_duty(&self) {
        self.bus
            .publish(Event::new(EventKind::GuardOffDuty).with_guard(self.id));
    }

    /// Revokes the watch without reporting it.
    pub(crate) async fn retire(&self, tower: &Watchtower) -> bool {
        let mut watch = self.watch.lock().await;
        if !watch.on_duty {
            return false;
        }
        watch.revoke();
        tower.dismiss(self.id).await;
        true
    }

    /// Strikes `danger` once.
    pub async fn attack(&self, danger: &dyn Danger) {
        strike(self.id, &self.bus, danger).await;
    }
}

async fn strike(id: GuardId, bus: &Bus, danger: &dyn Danger) {
    bus.publish(Event::new(EventKind::GuardAttacks).with_guard(id));
    danger.take_damage().await;
}

async fn patrol(
    id: GuardId,
    mut queue: mpsc::Receiver<Alarm>,
    revoke: CancellationToken,
    bus: Bus,
) {
    loop {
        tokio::select! {
            biased;
            _ = revoke.cancelled() => break,
            alarm = queue.recv() => match alarm {
                Some(alarm) => {
                    let danger = alarm.acknowledge();
                    strike(id, &bus, danger.as_ref()).await;
                }
                None => break,
            },
        }
    }
    debug!(guard = %id, "reaction loop exited");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dragon::Dragon;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Takes a while to absorb each hit.
    struct Slow {
        hits: AtomicUsize,
        pause: Duration,
    }

    #[async_trait]
    impl Danger for Slow {
        async fn take_damage(&self) {
            tokio::time::sleep(self.pause).await;
            self.hits.fetch_add(1, Ordering::SeqCst);
        }

        async fn is_alive(&self) -> bool {
            true
        }
    }

    struct Cursed;

    #[async_trait]
    impl Danger for Cursed {
        async fn take_damage(&self) {
            panic!("cursed scales");
        }

        async fn is_alive(&self) -> bool {
            true
        }
    }

    fn setup() -> (Bus, Watchtower, Guard) {
        let bus = Bus::new(64);
        let tower = Watchtower::new(bus.clone());
        let guard = Guard::new(GuardId(0), bus.clone());
        (bus, tower, guard)
    }

    #[tokio::test]
    async fn test_off_duty_before_ever_on_watch_is_noop() {
        let (bus, tower, guard) = setup();
        let mut rx = bus.subscribe();
        assert!(!guard.off_duty(&tower).await);
        assert!(!guard.is_on_watch().await);
        assert!(tower.on_watch().await.is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_double_off_duty_revokes_once() {
        let (bus, tower, guard) = setup();
        let mut rx = bus.subscribe();
        guard.stand_watch(&tower).await;
        assert!(guard.is_on_watch().await);

        assert!(guard.off_duty(&tower).await);
        assert!(!guard.off_duty(&tower).await);
        assert!(tower.on_watch().await.is_empty());

        let reported = std::iter::from_fn(|| rx.try_recv().ok())
            .filter(|e| e.kind == EventKind::GuardOffDuty)
            .count();
        assert_eq!(reported, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_off_duty_mid_spot_is_skipped() {
        let bus = Bus::new(64);
        let tower = Arc::new(Watchtower::new(bus.clone()));
        let first = Guard::new(GuardId(0), bus.clone());
        let second = Guard::new(GuardId(1), bus);
        first.stand_watch(&tower).await;
        second.stand_watch(&tower).await;

        let slow = Arc::new(Slow {
            hits: AtomicUsize::new(0),
            pause: Duration::from_secs(1),
        });
        // both guards are now busy striking
        assert_eq!(tower.spot(slow.clone()).await, 2);

        let pending = {
            let tower = Arc::clone(&tower);
            let slow = slow.clone();
            tokio::spawn(async move { tower.spot(slow).await })
        };
        // the second alarm now sits in guard 0's queue, unacknowledged
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!pending.is_finished());

        assert!(first.off_duty(&tower).await);
        let delivered = tokio::time::timeout(Duration::from_secs(5), pending)
            .await
            .expect("spot hung on a guard that left")
            .expect("join");
        assert_eq!(delivered, 1);
        assert!(slow.hits.load(Ordering::SeqCst) >= 2);

        second.off_duty(&tower).await;
    }

    #[tokio::test]
    async fn test_rejoin_after_reaction_loop_panicked() {
        let (_bus, tower, guard) = setup();
        guard.stand_watch(&tower).await;
        assert_eq!(tower.spot(Arc::new(Cursed)).await, 1);

        guard.stand_watch(&tower).await;
        assert!(guard.is_on_watch().await);
        let slow = Arc::new(Slow {
            hits: AtomicUsize::new(0),
            pause: Duration::ZERO,
        });
        assert_eq!(tower.spot(slow).await, 1);
    }

    #[tokio::test]
    async fn test_on_watch_guard_attacks_on_alarm() {
        let (bus, tower, guard) = setup();
        let dragon = Arc::new(Dragon::new(3, bus));
        guard.stand_watch(&tower).await;

        assert_eq!(tower.spot(dragon.clone()).await, 1);
        assert_eq!(tower.spot(dragon.clone()).await, 1);

        // the second ack guarantees the first strike finished
        guard.off_duty(&tower).await;
        tokio::task::yield_now().await;
        let hp = dragon.hp().await;
        assert!(hp == 1 || hp == 2);
    }

    #[tokio::test]
    async fn test_revoked_guard_no_longer_receives() {
        let (bus, tower, guard) = setup();
        let dragon = Arc::new(Dragon::new(3, bus));
        guard.stand_watch(&tower).await;
        guard.off_duty(&tower).await;

        assert_eq!(tower.spot(dragon.clone()).await, 0);
        assert_eq!(dragon.hp().await, 3);
    }

    #[tokio::test]
    async fn test_stand_watch_twice_keeps_single_loop() {
        let (bus, tower, guard) = setup();
        let mut rx = bus.subscribe();
        let dragon = Arc::new(Dragon::new(10, bus));

        guard.stand_watch(&tower).await;
        guard.stand_watch(&tower).await;
        assert_eq!(tower.on_watch().await, vec![GuardId(0)]);
        assert_eq!(tower.spot(dragon.clone()).await, 1);

        guard.off_duty(&tower).await;
        // joining on re-arm waits for any in-flight strike
        guard.stand_watch(&tower).await;
        guard.off_duty(&tower).await;

        let attacks = std::iter::from_fn(|| rx.try_recv().ok())
            .filter(|e| e.kind == EventKind::GuardAttacks)
            .count();
        assert_eq!(attacks, 1);
        assert_eq!(dragon.hp().await, 9);
    }

    #[tokio::test]
    async fn test_guard_can_return_to_watch_after_off_duty() {
        let (bus, tower, guard) = setup();
        let dragon = Arc::new(Dragon::new(3, bus));

        guard.stand_watch(&tower).await;
        guard.off_duty(&tower).await;
        guard.stand_watch(&tower).await;

        assert!(guard.is_on_watch().await);
        assert_eq!(tower.spot(dragon).await, 1);
    }

    #[tokio::test]
    async fn test_direct_attack_damages() {
        let (bus, _tower, guard) = setup();
        let dragon = Dragon::new(2, bus);
        guard.attack(&dragon).await;
        assert_eq!(dragon.hp().await, 1);
    }
}
