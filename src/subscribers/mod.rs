//! # Event subscribers for a siege.
//!
//! This module provides the [`Subscribe`] trait, the siege's fan-out set
//! and built-in implementations for handling events broadcast through the
//! [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Guard / Dragon ── publish(Event) ──► Bus ──► Siege listener ──► SubscriberSet
//!                                                                      │
//!                                                            ┌─────────┼─────────┐
//!                                                            ▼         ▼         ▼
//!                                                        LogWriter  Custom     ...
//! ```

mod embedded;
mod set;
mod subscriber;

pub use embedded::LogWriter;
pub(crate) use set::SubscriberSet;
pub use subscriber::Subscribe;
