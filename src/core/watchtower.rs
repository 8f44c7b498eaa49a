//! # Watchtower: sounds the alarm to every guard on watch.
//!
//! The watchtower keeps a roster of guards on watch, each with a personal
//! delivery queue. Guards enlist when they go on watch and are dismissed when
//! they go off duty, at any time and without involving the watchtower's caller.
//!
//! ## Fan-out
//! ```text
//! spot(danger)
//!   ├─► publish CastleUnderAttack
//!   ├─► snapshot roster (one read, lock released before sending)
//!   └─► for each enlisted guard, in id order:
//!         send Alarm{danger, ack} ─► wait ack   (blocks until that guard received it)
//! ```
//!
//! ## Rules
//! - The number of alarms sent equals the roster size **at trigger time**; it is
//!   never a count remembered from an earlier moment.
//! - Each alarm goes to exactly one guard; each enlisted guard gets exactly one alarm.
//! - A guard dismissed mid-spot drops its queue once its reaction loop exits, so
//!   the pending send or ack fails and the guard is skipped. `spot` never waits on
//!   a receiver that is gone.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc, oneshot};
use tracing::debug;

use crate::core::dragon::Danger;
use crate::core::guard::GuardId;
use crate::events::{Bus, Event, EventKind};

/// One alarm delivered to one guard.
pub struct Alarm {
    /// What the guard should attack.
    pub danger: Arc<dyn Danger>,
    received: oneshot::Sender<()>,
}

impl Alarm {
    /// Tells the watchtower this alarm reached its guard.
    pub fn acknowledge(self) -> Arc<dyn Danger> {
        let _ = self.received.send(());
        self.danger
    }
}

/// Broadcaster for the castle's alarm feed.
pub struct Watchtower {
    roster: RwLock<BTreeMap<GuardId, mpsc::Sender<Alarm>>>,
    bus: Bus,
}

impl Watchtower {
    /// Creates a watchtower with an empty roster.
    pub fn new(bus: Bus) -> Self {
        Self {
            roster: RwLock::new(BTreeMap::new()),
            bus,
        }
    }

    /// Enlists a guard and returns the receiving end of its alarm queue.
    ///
    /// Re-enlisting replaces the previous queue; its receiver sees the channel closed.
    pub async fn enlist(&self, id: GuardId) -> mpsc::Receiver<Alarm> {
        let (tx, rx) = mpsc::channel(1);
        self.roster.write().await.insert(id, tx);
        rx
    }

    /// Removes a guard from the roster. Returns false if it was not enlisted.
    pub async fn dismiss(&self, id: GuardId) -> bool {
        self.roster.write().await.remove(&id).is_some()
    }

    /// Sorted ids of guards currently on watch.
    pub async fn on_watch(&self) -> Vec<GuardId> {
        self.roster.read().await.keys().copied().collect()
    }

    /// Sounds the alarm: one alarm per guard on watch.
    ///
    /// Returns the number of alarms that were received by a guard.
    pub async fn spot(&self, danger: Arc<dyn Danger>) -> usize {
        self.bus.publish(Event::new(EventKind::CastleUnderAttack));

        let roster: Vec<(GuardId, mpsc::Sender<Alarm>)> = self
            .roster
            .read()
            .await
            .iter()
            .map(|(id, tx)| (*id, tx.clone()))
            .collect();

        let mut delivered = 0;
        for (id, tx) in roster {
            let (ack_tx, ack_rx) = oneshot::channel();
            let alarm = Alarm {
                danger: Arc::clone(&danger),
                received: ack_tx,
            };

            if tx.send(alarm).await.is_err() {
                debug!(guard = %id, "alarm not sent: guard left its post");
                continue;
            }
            match ack_rx.await {
                Ok(()) => delivered += 1,
                Err(_) => debug!(guard = %id, "alarm dropped: guard left its post"),
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Dummy {
        hits: AtomicUsize,
    }

    #[async_trait]
    impl Danger for Dummy {
        async fn take_damage(&self) {
            self.hits.fetch_add(1, Ordering::SeqCst);
        }

        async fn is_alive(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_spot_with_empty_roster_returns_immediately() {
        let tower = Watchtower::new(Bus::new(8));
        let delivered = tower.spot(Arc::new(Dummy::default())).await;
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_each_enlisted_receiver_gets_one_alarm() {
        let tower = Arc::new(Watchtower::new(Bus::new(8)));
        let mut receivers = Vec::new();
        for i in 0..3 {
            receivers.push(tower.enlist(GuardId(i)).await);
        }

        let listeners: Vec<_> = receivers
            .into_iter()
            .map(|mut rx| {
                tokio::spawn(async move {
                    let mut n = 0;
                    while let Some(alarm) = rx.recv().await {
                        alarm.acknowledge();
                        n += 1;
                    }
                    n
                })
            })
            .collect();

        let delivered = tower.spot(Arc::new(Dummy::default())).await;
        assert_eq!(delivered, 3);

        for i in 0..3 {
            tower.dismiss(GuardId(i)).await;
        }
        for l in listeners {
            assert_eq!(l.await.expect("join"), 1);
        }
    }

    #[tokio::test]
    async fn test_dropped_receiver_is_skipped_not_awaited() {
        let tower = Watchtower::new(Bus::new(8));
        let mut kept = tower.enlist(GuardId(0)).await;
        drop(tower.enlist(GuardId(1)).await);

        let answer = tokio::spawn(async move {
            if let Some(alarm) = kept.recv().await {
                alarm.acknowledge();
            }
        });

        let delivered = tower.spot(Arc::new(Dummy::default())).await;
        assert_eq!(delivered, 1);
        answer.await.expect("join");
    }

    #[tokio::test]
    async fn test_dismiss_and_reenlist() {
        let tower = Watchtower::new(Bus::new(8));
        let _a = tower.enlist(GuardId(2)).await;
        let _b = tower.enlist(GuardId(0)).await;
        assert_eq!(tower.on_watch().await, vec![GuardId(0), GuardId(2)]);

        assert!(tower.dismiss(GuardId(2)).await);
        assert!(!tower.dismiss(GuardId(2)).await);
        assert_eq!(tower.on_watch().await, vec![GuardId(0)]);
    }
}
