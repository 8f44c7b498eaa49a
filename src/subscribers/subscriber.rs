//! # Event subscriber trait.
//!
//! Provides [`Subscribe`] an extension point for plugging observers (logging,
//! recording, counting) into a siege.
//!
//! Each subscriber gets:
//! - **Dedicated worker task** (runs independently)
//! - **Per-subscriber bounded queue** (capacity via [`Subscribe::queue_capacity`])
//! - **Panic isolation** (panics are caught and logged)
//!
//! ## Architecture
//! ```text
//! SubscriberSet ──► [bounded queue] ──► worker task ──► subscriber.on_event()
//!                                    └─► panic caught → tracing::warn!
//! ```
//!
//! ## Rules
//! - A slow subscriber only affects its own queue.
//! - Queue overflow drops the event **for this subscriber only**.
//! - Events are processed sequentially (FIFO) per subscriber.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use castlewatch::{Event, EventKind, Subscribe};
//!
//! struct Tally;
//!
//! #[async_trait]
//! impl Subscribe for Tally {
//!     async fn on_event(&self, ev: &Event) {
//!         if matches!(ev.kind, EventKind::GuardAttacks) {
//!             // count the hit
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "tally" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Event subscriber for siege observability.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// Called from a dedicated worker task, not in the publisher context.
    async fn on_event(&self, event: &Event);

    /// Returns the subscriber name used in overflow/panic warnings.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the preferred queue capacity for this subscriber.
    ///
    /// The runtime clamps capacity to a minimum of 1.
    ///
    /// Default: 1024.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
