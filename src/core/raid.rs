//! # Raid: the dragon's approach and its timed strike.
//!
//! ```text
//! approach(castle)
//!   ├─► castle.spot(danger)         (awaited: every guard on watch got the alarm)
//!   └─► spawn ─► sleep(delay)
//!                 └─► danger alive && castle standing ? castle.destroy()
//! ```
//!
//! The timer is not cancellable. A strike that lands after the dragon died is
//! skipped, and `destroy` is idempotent anyway.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::core::castle::Adversary;
use crate::core::dragon::Danger;

/// Drives one attacker against one castle.
pub struct Raid {
    danger: Arc<dyn Danger>,
    delay: Duration,
}

impl Raid {
    /// Creates a raid that strikes `delay` after being spotted.
    pub fn new(danger: Arc<dyn Danger>, delay: Duration) -> Self {
        Self { danger, delay }
    }

    /// Approaches `castle`: gets spotted, then arms the destructive timer.
    ///
    /// Returns once the alarm has been received by every guard on watch; the
    /// timer keeps running in the returned task.
    pub async fn approach(&self, castle: Arc<dyn Adversary>) -> JoinHandle<()> {
        let alarms = castle.spot(Arc::clone(&self.danger)).await;
        debug!(alarms, "dragon spotted");

        let danger = Arc::clone(&self.danger);
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if !danger.is_alive().await || castle.is_destroyed() {
                debug!("strike skipped: siege already resolved");
                return;
            }
            castle.destroy();
        })
    }
}
