//! Siege core: the coordination kernel.
//!
//! Internal modules:
//! - [`latch`]: one-shot, multi-observer terminal notification;
//! - [`dragon`]: the target, with concurrent damage and a `dead` latch;
//! - [`guard`]: workers with a revocable reaction loop;
//! - [`watchtower`]: alarm fan-out over the roster of guards on watch;
//! - [`castle`]: owns guards and watchtower, assigns duties, `destroyed` latch;
//! - [`raid`]: the dragon's approach and timed strike;
//! - [`siege`]: wiring and the termination race.

mod builder;
mod castle;
mod dragon;
mod guard;
mod latch;
mod raid;
mod siege;
mod watchtower;

pub use builder::SiegeBuilder;
pub use castle::{Adversary, Castle};
pub use dragon::{Danger, Dragon};
pub use guard::{Duty, Guard, GuardId};
pub use latch::Latch;
pub use raid::Raid;
pub use siege::{Outcome, Siege};
pub use watchtower::{Alarm, Watchtower};
