//! # LogWriter — human-readable siege log
//!
//! A minimal subscriber that renders each incoming [`Event`] as one line through
//! `tracing` at `info` level.
//!
//! ## Example output
//! ```text
//! Guard 0 on duty
//! Guard 1 off duty
//! Guard 2 on duty
//! Guard 3 on duty
//! A dragon attacks your castle
//! Guard 2 attacks the dragon
//! Dragon damaged. Hp left: 2
//! ...
//! Your guards defeated the dragon
//! ```

use async_trait::async_trait;
use tracing::info;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Renders the log line for an event.
    pub fn render(e: &Event) -> String {
        let guard = e
            .guard
            .map(|g| g.to_string())
            .unwrap_or_else(|| "?".to_string());

        match e.kind {
            EventKind::GuardOnWatch => format!("Guard {guard} on duty"),
            EventKind::GuardOffDuty => format!("Guard {guard} off duty"),
            EventKind::CastleUnderAttack => "A dragon attacks your castle".to_string(),
            EventKind::GuardAttacks => format!("Guard {guard} attacks the dragon"),
            EventKind::DragonDamaged => match e.hp {
                Some(hp) => format!("Dragon damaged. Hp left: {hp}"),
                None => "Dragon damaged".to_string(),
            },
            EventKind::DragonDefeated => "Your guards defeated the dragon".to_string(),
            EventKind::CastleDestroyed => "The dragon destroyed your castle".to_string(),
        }
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        info!(seq = e.seq, "{}", Self::render(e));
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
