//! # castlewatch
//!
//! **castlewatch** is a small coordination kernel: a castle's guards go on and
//! off watch at runtime, a watchtower fans one alarm out to every guard on
//! watch, and a dragon races its own timer against the guards' strikes.
//!
//! ## Architecture
//! ```text
//!            ┌───────────────────────────────────────────────┐
//!            │ Castle                                        │
//!            │  - Guard 0 .. Guard N-1 (on watch / off duty) │
//!            │  - Watchtower (roster: GuardId → alarm queue) │
//!            │  - destroyed: Latch                           │
//!            └──────┬──────────────────────────▲─────────────┘
//!                   │ spot(dragon)             │ destroy()
//!                   ▼                          │ (after raid_delay)
//!   ┌─────────────────────────────┐     ┌──────┴──────┐
//!   │ one Alarm per guard on watch│     │    Raid     │
//!   └──────┬──────────┬───────────┘     └─────────────┘
//!          ▼          ▼
//!       Guard 0 …  Guard k  ── attack ──► Dragon.take_damage() ─► dead: Latch
//!
//! Siege::run:  select!(biased) { dragon.dead(), castle.destroyed() } → Outcome
//! ```
//!
//! Every component publishes [`Event`]s to a [`Bus`]; a single listener fans them
//! out to [`Subscribe`] implementations such as [`LogWriter`].
//!
//! ## Features
//! | Area              | Description                                              | Key types                          |
//! |-------------------|----------------------------------------------------------|------------------------------------|
//! | **Siege**         | Assign duties, sound the alarm, race the outcome.        | [`Siege`], [`Outcome`]             |
//! | **Castle**        | Guard duties and the watchtower roster.                  | [`Castle`], [`Guard`], [`Watchtower`] |
//! | **Dragon**        | Concurrent damage, one-shot death.                       | [`Dragon`], [`Danger`], [`Latch`]  |
//! | **Subscriber API**| Hook into siege events.                                  | [`Subscribe`], [`LogWriter`]       |
//! | **Errors**        | Typed setup errors.                                      | [`SiegeError`]                     |
//! | **Configuration** | Guard count, dragon integrity, strike delay.             | [`Config`]                         |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use castlewatch::{Config, LogWriter, Outcome, Siege, Subscribe};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
//!     let siege = Siege::builder(Config::default())
//!         .with_subscribers(subs)
//!         .build()?;
//!
//!     let outcome = siege.run(&mut StdRng::seed_from_u64(7)).await?;
//!     assert_eq!(outcome, Outcome::DragonDefeated);
//!     Ok(())
//! }
//! ```
mod config;
mod core;
mod error;
mod events;
mod subscribers;

// ---- Public re-exports ----

pub use config::Config;
pub use crate::core::{
    Adversary, Alarm, Castle, Danger, Dragon, Duty, Guard, GuardId, Latch, Outcome, Raid, Siege,
    SiegeBuilder, Watchtower,
};
pub use error::SiegeError;
pub use events::{Bus, Event, EventKind};
pub use subscribers::{LogWriter, Subscribe};
