//! Error types used by the game runtime.
//!
//! [`GameError`] covers everything that can end a game early: bad startup
//! parameters, protocol invariant violations, a claim barrier that never
//! completes, actors that refuse to join, shutdown signals, a broken
//! console sink and events that never reached the subscribers. None of them is recoverable; the game has no defined
//! continuation once the one-loser-per-round model is broken.
//!
//! Like the events, errors provide `as_label` / `as_message` helpers for logs.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by the game runtime.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum GameError {
    /// The game needs at least two players (one chair).
    #[error("invalid player count {players}: at least 2 players are required")]
    InvalidPlayerCount {
        /// The rejected player count.
        players: u32,
    },

    /// A protocol invariant was broken (e.g. two losers in one round, a claim
    /// after elimination, a report for a stale round).
    #[error("invariant violated in round {round}: {detail}")]
    Invariant {
        /// Round in which the violation was detected.
        round: u64,
        /// What went wrong.
        detail: String,
    },

    /// Not every alive player reported its claim within the barrier bound.
    #[error("round {round}: {missing} claim report(s) missing after {timeout:?}")]
    ClaimTimeout {
        /// Round whose barrier did not complete.
        round: u64,
        /// The configured barrier bound.
        timeout: Duration,
        /// Number of reports that never arrived.
        missing: u32,
    },

    /// Some actors did not finish within the configured grace period.
    #[error("actors still running after {grace:?}; stuck players: {stuck:?}")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Players that had not reached a terminal state.
        stuck: Vec<u32>,
    },

    /// The game was stopped by a shutdown signal before a winner emerged.
    #[error("game interrupted before a winner was determined")]
    Interrupted,

    /// The console narrative could not be written.
    #[error("status output unavailable: {error}")]
    Output {
        /// The underlying I/O error message.
        error: String,
    },

    /// Events were lost on their way to the subscribers; the narrative is incomplete.
    #[error("{dropped} event(s) never reached the subscribers")]
    EventsDropped {
        /// Number of events lost (skipped by the listener or missed by a subscriber).
        dropped: u64,
    },
}

impl GameError {
    /// Builds an [`GameError::Invariant`] for the given round.
    pub fn invariant(round: u64, detail: impl Into<String>) -> Self {
        GameError::Invariant {
            round,
            detail: detail.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use musical_chairs::GameError;
    ///
    /// let err = GameError::InvalidPlayerCount { players: 1 };
    /// assert_eq!(err.as_label(), "game_invalid_player_count");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            GameError::InvalidPlayerCount { .. } => "game_invalid_player_count",
            GameError::Invariant { .. } => "game_invariant",
            GameError::ClaimTimeout { .. } => "game_claim_timeout",
            GameError::GraceExceeded { .. } => "game_grace_exceeded",
            GameError::Interrupted => "game_interrupted",
            GameError::Output { .. } => "game_output",
            GameError::EventsDropped { .. } => "game_events_dropped",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            GameError::InvalidPlayerCount { players } => format!("players={players}"),
            GameError::Invariant { round, detail } => format!("round={round}: {detail}"),
            GameError::ClaimTimeout {
                round,
                timeout,
                missing,
            } => format!("round={round} missing={missing} after {timeout:?}"),
            GameError::GraceExceeded { grace, stuck } => {
                format!("grace exceeded after {grace:?}; stuck players={stuck:?}")
            }
            GameError::Interrupted => "interrupted".to_string(),
            GameError::Output { error } => format!("output: {error}"),
            GameError::EventsDropped { dropped } => format!("dropped={dropped}"),
        }
    }

    /// True for errors that mean the protocol itself misbehaved.
    pub fn is_protocol_bug(&self) -> bool {
        matches!(
            self,
            GameError::Invariant { .. } | GameError::ClaimTimeout { .. }
        )
    }
}
