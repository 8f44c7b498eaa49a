use std::sync::Arc;

use crate::{
    config::Config,
    error::SiegeError,
    events::Bus,
    subscribers::{Subscribe, SubscriberSet},
};

use super::{castle::Castle, dragon::Dragon, siege::Siege};

/// Builder for constructing a [`Siege`] with optional subscribers.
pub struct SiegeBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl SiegeBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive siege events (duties, alarm, hits, outcome)
    /// through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Validates the config and builds the siege.
    ///
    /// Must be called inside a tokio runtime: subscriber workers are spawned here.
    pub fn build(self) -> Result<Siege, SiegeError> {
        self.cfg.validate()?;

        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let castle = Arc::new(Castle::new(self.cfg.guards, bus.clone())?);
        let dragon = Arc::new(Dragon::new(self.cfg.dragon_hp, bus.clone()));
        let subs = SubscriberSet::new(self.subscribers);

        Ok(Siege::new_internal(self.cfg, bus, subs, castle, dragon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_rejects_invalid_config() {
        let cfg = Config {
            dragon_hp: 0,
            ..Config::default()
        };
        assert!(matches!(
            SiegeBuilder::new(cfg).build(),
            Err(SiegeError::InvalidConfig { .. })
        ));
    }

    #[tokio::test]
    async fn test_build_uses_config() {
        let cfg = Config {
            guards: 6,
            dragon_hp: 5,
            ..Config::default()
        };
        let siege = SiegeBuilder::new(cfg).build().expect("siege");
        assert_eq!(siege.castle().guards().len(), 6);
        assert_eq!(siege.dragon().hp().await, 5);
    }
}
