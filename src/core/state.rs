//! # Game state: counts, phase and the current permit pool.
//!
//! [`GameState`] is owned by the coordinator and mutated only through
//! `&mut self` methods. Players never touch it directly; they hold a
//! [`RoundWatch`] and see each transition as a whole [`RoundContext`].
//!
//! ## Transitions
//! ```text
//! new(N)        round=1  players=N    chairs=N-1  Playing   pool(N-1)
//! stop_music()  round=k  ...                      Stopped   (same pool)
//! start_round() round=k+1 players-1   chairs-1    Playing   pool(chairs-1), old pool retired
//! finish()      game_over=true (terminal broadcast)
//! ```
//!
//! ## Rules
//! - `chairs == players - 1` at every publication
//! - `start_round()` with no chair left is an invariant violation
//! - Every publication replaces the whole context (`watch::Sender::send_replace`)
//! - Bus events go out before the context, so player events always follow them
//! - [`announced_seq`](GameState::announced_seq) is the bus position of the latest `RoundStarted`;
//!   every claim event of earlier rounds precedes it

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::GameError;
use crate::events::{Bus, Event, EventKind};

use super::pool::PermitPool;
use super::round::{Phase, RoundContext, RoundWatch};

/// Shared game state, mutated only by the coordinator.
pub struct GameState {
    players: u32,
    chairs: u32,
    round: u64,
    phase: Phase,
    game_over: bool,
    pool: Arc<PermitPool>,
    tx: watch::Sender<RoundContext>,
    bus: Bus,
    announced: u64,
}

impl GameState {
    /// Creates the state for `players` players (`>= 2`); round 1, music playing.
    pub fn new(players: u32, bus: Bus) -> Result<Self, GameError> {
        if players < 2 {
            return Err(GameError::InvalidPlayerCount { players });
        }
        let chairs = players - 1;
        let pool = Arc::new(PermitPool::new(chairs));
        let (tx, _rx) = watch::channel(RoundContext {
            round: 1,
            phase: Phase::Playing,
            players,
            chairs,
            game_over: false,
            pool: Arc::clone(&pool),
        });

        Ok(Self {
            players,
            chairs,
            round: 1,
            phase: Phase::Playing,
            game_over: false,
            pool,
            tx,
            bus,
            announced: 0,
        })
    }

    /// Returns a new receiver of the published round context.
    pub fn watch(&self) -> RoundWatch {
        self.tx.subscribe()
    }

    /// Announces the first round.
    pub fn announce(&mut self) {
        self.publish_round_started();
    }

    /// Stops the music and wakes every parked player.
    pub fn stop_music(&mut self) {
        self.phase = Phase::Stopped;
        tracing::debug!(round = self.round, "music stopped");
        self.bus
            .publish(Event::new(EventKind::MusicStopped).with_round(self.round));
        self.publish();
    }

    /// Retires the current round: one player and one chair fewer, fresh pool.
    ///
    /// Must only run once every claim of the current round was reported.
    pub fn start_round(&mut self) -> Result<(), GameError> {
        if self.chairs == 0 || self.players < 2 {
            return Err(GameError::invariant(
                self.round,
                format!(
                    "cannot shrink past players={} chairs={}",
                    self.players, self.chairs
                ),
            ));
        }
        if self.game_over {
            return Err(GameError::invariant(self.round, "game already finished"));
        }

        self.players -= 1;
        self.chairs -= 1;
        self.round += 1;
        self.phase = Phase::Playing;

        self.pool.retire();
        self.pool = Arc::new(PermitPool::new(self.chairs));

        tracing::debug!(
            round = self.round,
            players = self.players,
            chairs = self.chairs,
            "round started"
        );
        self.publish_round_started();
        self.publish();
        Ok(())
    }

    /// Terminal broadcast: marks the game over and releases every parked player.
    pub fn finish(&mut self) {
        self.game_over = true;
        self.publish();
        tracing::debug!(round = self.round, "terminal broadcast");
    }

    /// True once no chair is left.
    #[inline]
    pub fn is_over(&self) -> bool {
        self.chairs == 0
    }

    /// Players still in the game.
    #[inline]
    pub fn players(&self) -> u32 {
        self.players
    }

    /// Chairs in the current round.
    #[inline]
    pub fn chairs(&self) -> u32 {
        self.chairs
    }

    /// Current round number.
    #[inline]
    pub fn round(&self) -> u64 {
        self.round
    }

    /// Current music phase.
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Sequence number of the latest `RoundStarted` event (0 before [`announce`](Self::announce)).
    #[inline]
    pub fn announced_seq(&self) -> u64 {
        self.announced
    }

    /// Pool of the current round.
    #[inline]
    pub fn pool(&self) -> &Arc<PermitPool> {
        &self.pool
    }

    fn publish(&self) {
        self.tx.send_replace(RoundContext {
            round: self.round,
            phase: self.phase,
            players: self.players,
            chairs: self.chairs,
            game_over: self.game_over,
            pool: Arc::clone(&self.pool),
        });
    }

    fn publish_round_started(&mut self) {
        let ev = Event::new(EventKind::RoundStarted)
            .with_round(self.round)
            .with_counts(self.players, self.chairs);
        self.announced = ev.seq;
        self.bus.publish(ev);
    }
}
