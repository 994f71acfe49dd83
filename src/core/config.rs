//! # Game configuration.
//!
//! Provides [`GameConfig`] centralized settings for one game.
//!
//! ## Sentinel values
//! - `resolution = 0s` → the coordinator starts the next round right after the claim barrier
//! - `music = 0s` → the music stops immediately (useful in tests)

use std::time::Duration;

use crate::error::GameError;
use crate::policies::JitterPolicy;

/// Configuration for one game.
///
/// ## Field semantics
/// - `players`: number of players at start (`>= 2`; chairs start at `players - 1`)
/// - `music`: how long the music plays each round (before jitter)
/// - `music_jitter`: randomization of `music`
/// - `resolution`: pause after every claim was reported, before the pool shrinks
/// - `claim_timeout`: upper bound on waiting for every alive player's claim report
/// - `grace`: maximum wait for actors to exit once the game is decided
/// - `bus_capacity`: event bus ring buffer size (raised to hold one full round, see
///   [`bus_capacity_clamped`](Self::bus_capacity_clamped))
#[derive(Clone, Debug)]
pub struct GameConfig {
    /// Number of players at start.
    pub players: u32,

    /// Base duration of the "music playing" phase.
    pub music: Duration,

    /// Randomization applied to `music` every round.
    pub music_jitter: JitterPolicy,

    /// Pacing pause between the claim barrier and the next round.
    ///
    /// Purely cosmetic: the next round never starts before every alive
    /// player reported its claim, whatever this value is.
    pub resolution: Duration,

    /// Upper bound on the claim barrier.
    ///
    /// Exceeding it means a player never reported: `GameError::ClaimTimeout`.
    pub claim_timeout: Duration,

    /// Maximum time to wait for actors to exit after the terminal broadcast
    /// (or after a shutdown signal).
    pub grace: Duration,

    /// Capacity of the event bus broadcast channel ring buffer.
    pub bus_capacity: usize,
}

impl GameConfig {
    /// Returns a default configuration for the given number of players.
    pub fn with_players(players: u32) -> Self {
        Self {
            players,
            ..Self::default()
        }
    }

    /// Checks startup parameters.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.players < 2 {
            return Err(GameError::InvalidPlayerCount {
                players: self.players,
            });
        }
        Ok(())
    }

    /// Chairs available in the first round.
    #[inline]
    pub fn initial_chairs(&self) -> u32 {
        self.players.saturating_sub(1)
    }

    /// Returns the jittered music interval for one round.
    #[inline]
    pub fn music_interval(&self) -> Duration {
        self.music_jitter.apply(self.music)
    }

    /// Returns the bus capacity, raised so one round's burst always fits.
    ///
    /// A round publishes `MusicStopped`, one claim event per player and the
    /// next `RoundStarted`; the coordinator waits for the listener between rounds.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        let round_burst = 2 * self.players as usize + 8;
        self.bus_capacity.max(round_burst)
    }
}

impl Default for GameConfig {
    /// Default configuration:
    ///
    /// - `players = 4`
    /// - `music = 2s`, `music_jitter = None`
    /// - `resolution = 2s`
    /// - `claim_timeout = 10s`
    /// - `grace = 5s`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            players: 4,
            music: Duration::from_secs(2),
            music_jitter: JitterPolicy::None,
            resolution: Duration::from_secs(2),
            claim_timeout: Duration::from_secs(10),
            grace: Duration::from_secs(5),
            bus_capacity: 1024,
        }
    }
}
