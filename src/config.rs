//! # Siege configuration.
//!
//! Provides [`Config`], the construction-time settings of one encounter.
//!
//! Nothing here is loaded from files or the environment; callers build a value
//! (usually starting from [`Config::default`]) and hand it to
//! [`Siege::builder`](crate::Siege::builder).
//!
//! ## Sentinel values
//! - `guards = 0` → rejected, one guard is always sent off duty
//! - `dragon_hp = 0` → rejected, the dragon must start alive
//! - `raid_delay = 0s` → the castle falls as soon as the timer task is scheduled

use std::time::Duration;

use crate::error::SiegeError;

/// Settings for a single siege.
///
/// ## Field semantics
/// - `guards`: number of guards in the castle (one of them is always off duty)
/// - `dragon_hp`: starting integrity of the dragon
/// - `raid_delay`: how long after spotting the dragon destroys the castle
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by Bus)
#[derive(Clone, Debug)]
pub struct Config {
    /// Number of guards in the castle.
    pub guards: usize,

    /// Starting integrity of the dragon.
    pub dragon_hp: u32,

    /// Delay between the alarm and the dragon's destructive strike.
    ///
    /// The strike only lands if the dragon is still alive when the delay
    /// elapses.
    pub raid_delay: Duration,

    /// Capacity of the event bus broadcast channel ring buffer.
    pub bus_capacity: usize,
}

impl Config {
    /// Checks the invariants the rest of the runtime relies on.
    pub fn validate(&self) -> Result<(), SiegeError> {
        if self.guards == 0 {
            return Err(SiegeError::InvalidConfig {
                reason: "guards must be > 0",
            });
        }
        if self.dragon_hp == 0 {
            return Err(SiegeError::InvalidConfig {
                reason: "dragon_hp must be > 0",
            });
        }
        Ok(())
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `guards = 4`
    /// - `dragon_hp = 3`
    /// - `raid_delay = 2s`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            guards: 4,
            dragon_hp: 3,
            raid_delay: Duration::from_secs(2),
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.guards, 4);
        assert_eq!(cfg.dragon_hp, 3);
    }

    #[test]
    fn test_rejects_empty_castle_and_dead_dragon() {
        let cfg = Config {
            guards: 0,
            ..Config::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(SiegeError::InvalidConfig {
                reason: "guards must be > 0"
            })
        );

        let cfg = Config {
            dragon_hp: 0,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_bus_capacity_clamped() {
        let cfg = Config {
            bus_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
