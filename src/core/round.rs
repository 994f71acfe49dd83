//! # Round context: the snapshot players react to.
//!
//! Everything a player needs to decide what to do is carried by one
//! immutable [`RoundContext`] value. The game state publishes a new value
//! through a `watch` channel on every transition, so a player always reads
//! the phase, the counts and the pool **together**.
//!
//! ```text
//! GameState ── send_replace(RoundContext) ──► watch ──► Player::next_signal()
//!                                                         (round token check)
//!
//! Player ── ClaimReport{player, round, claim} ──► mpsc ──► Coordinator barrier
//! ```

use std::sync::Arc;

use tokio::sync::watch;

use super::pool::PermitPool;

/// Music phase of the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Music is playing; nobody may sit.
    Playing,
    /// Music stopped; players race for the chairs.
    Stopped,
}

/// Immutable snapshot of one round, published atomically.
#[derive(Debug, Clone)]
pub struct RoundContext {
    /// Round number (1-based, monotonically increasing).
    pub round: u64,
    /// Current music phase.
    pub phase: Phase,
    /// Players still in the game.
    pub players: u32,
    /// Chairs available in this round.
    pub chairs: u32,
    /// Set once by the terminal broadcast.
    pub game_over: bool,
    /// The chairs of this round.
    pub pool: Arc<PermitPool>,
}

impl RoundContext {
    /// True when a player whose last contended round is `last_round` must act.
    ///
    /// Either the game is over, or the music of a newer round stopped. A
    /// repeated or older "stopped" context never matches twice.
    #[inline]
    pub fn signals(&self, last_round: u64) -> bool {
        self.game_over || (self.phase == Phase::Stopped && self.round > last_round)
    }
}

/// Read side of the round context channel held by every player.
pub type RoundWatch = watch::Receiver<RoundContext>;

/// Outcome of one claim attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// The player sat down.
    Secured,
    /// No chair left; the player is out.
    Missed,
}

/// Sent by a player to the coordinator once per round it contends in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimReport {
    /// Reporting player.
    pub player: u32,
    /// Round the claim was made in.
    pub round: u64,
    /// What happened.
    pub claim: Claim,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(round: u64, phase: Phase, game_over: bool) -> RoundContext {
        RoundContext {
            round,
            phase,
            players: 3,
            chairs: 2,
            game_over,
            pool: Arc::new(PermitPool::new(2)),
        }
    }

    #[test]
    fn only_a_newer_stop_signals() {
        assert!(ctx(2, Phase::Stopped, false).signals(1));
        assert!(!ctx(2, Phase::Stopped, false).signals(2));
        assert!(!ctx(3, Phase::Playing, false).signals(2));
    }

    #[test]
    fn game_over_always_signals() {
        assert!(ctx(3, Phase::Playing, true).signals(3));
    }
}
