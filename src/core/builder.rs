use std::sync::Arc;

use crate::{
    core::GameConfig,
    events::Bus,
    subscribers::{Scoreboard, Subscribe},
};

use super::game::Game;

/// Builder for constructing a [`Game`] with optional subscribers.
pub struct GameBuilder {
    cfg: GameConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl GameBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: GameConfig) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers (narrative, metrics, ...).
    ///
    /// Subscribers receive game events through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Adds a single subscriber.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Builds the game. A [`Scoreboard`] is always attached.
    pub fn build(self) -> Game {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let scoreboard = Arc::new(Scoreboard::new());

        let mut subscribers = self.subscribers;
        subscribers.push(scoreboard.clone());

        Game::new_internal(self.cfg, bus, subscribers, scoreboard)
    }
}
