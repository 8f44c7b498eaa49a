//! # SubscriberSet: the siege's event log fan-out.
//!
//! One set per siege. It follows the siege bus from the moment the siege starts,
//! hands each event to every subscriber's own queue, and stops at the first
//! terminal event (`DragonDefeated` / `CastleDestroyed`).
//!
//! ```text
//! Bus ─► listen(feed) ─► deliver(ev) ─┬─► [queue S1] ─► worker S1 ─► on_event()
//!                                     └─► [queue SN] ─► worker SN ─► on_event()
//!        ... terminal event ─► close(): queues closed, workers drained
//! ```
//!
//! ## Rules
//! - Delivery never waits on a subscriber. A full queue drops the event for that
//!   subscriber only; the drops are counted and reported once at close.
//! - Events published after the terminal one are not delivered.
//! - A panicking subscriber loses that event and keeps receiving the next ones.
//! - `close` returns only after every queued event was handled.

use std::any::Any;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::warn;

use crate::events::Event;

use super::Subscribe;

/// One subscriber's queue, worker and drop counter.
struct Feed {
    name: &'static str,
    queue: mpsc::Sender<Arc<Event>>,
    worker: JoinHandle<()>,
    dropped: u64,
}

/// Fans siege events out to the registered subscribers.
pub(crate) struct SubscriberSet {
    feeds: Vec<Feed>,
}

impl SubscriberSet {
    /// Spawns one worker per subscriber.
    pub(crate) fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        let feeds = subs
            .into_iter()
            .map(|sub| {
                let name = sub.name();
                let (queue, rx) = mpsc::channel(sub.queue_capacity().max(1));
                Feed {
                    name,
                    queue,
                    worker: tokio::spawn(work(sub, rx)),
                    dropped: 0,
                }
            })
            .collect();

        Self { feeds }
    }

    /// Follows `feed` until the siege's terminal event, then closes the set.
    pub(crate) fn listen(mut self, mut feed: broadcast::Receiver<Event>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match feed.recv().await {
                    Ok(ev) => {
                        let terminal = ev.kind.is_terminal();
                        self.deliver(ev);
                        if terminal {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        warn!(skipped = n, "event log lagged behind the siege");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            self.close().await;
        })
    }

    fn deliver(&mut self, ev: Event) {
        let ev = Arc::new(ev);
        for feed in &mut self.feeds {
            if feed.queue.try_send(Arc::clone(&ev)).is_err() {
                feed.dropped += 1;
            }
        }
    }

    /// Closes every queue and waits for the workers to drain them.
    pub(crate) async fn close(self) {
        for Feed {
            name,
            queue,
            worker,
            dropped,
        } in self.feeds
        {
            drop(queue);
            if dropped > 0 {
                warn!(subscriber = name, dropped, "subscriber missed events");
            }
            if let Err(e) = worker.await {
                warn!(subscriber = name, error = %e, "subscriber worker failed");
            }
        }
    }
}

async fn work(sub: Arc<dyn Subscribe>, mut rx: mpsc::Receiver<Arc<Event>>) {
    while let Some(ev) = rx.recv().await {
        let handled = std::panic::AssertUnwindSafe(sub.on_event(&ev))
            .catch_unwind()
            .await;
        if let Err(panic) = handled {
            warn!(
                subscriber = sub.name(),
                kind = ?ev.kind,
                reason = %panic_reason(panic.as_ref()),
                "subscriber panicked"
            );
        }
    }
}

fn panic_reason(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
