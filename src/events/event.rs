//! # Game events emitted by the game state, the players and the runtime.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Round events**: coordinator-driven phase changes (round started, music stopped)
//! - **Player events**: claim outcomes (chair secured, eliminated, won)
//! - **Runtime events**: game termination, shutdown and subscriber health
//!
//! The [`Event`] struct carries the metadata relevant to each kind: player id,
//! round number and the player/chair counts.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use musical_chairs::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::PlayerEliminated)
//!     .with_player(3)
//!     .with_round(2);
//!
//! assert_eq!(ev.kind, EventKind::PlayerEliminated);
//! assert_eq!(ev.player, Some(3));
//! assert_eq!(ev.round, Some(2));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(1);

/// Classification of game events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Round events ===
    /// A round begins with the music playing.
    ///
    /// Sets:
    /// - `round`: round number (1-based)
    /// - `players`: players still in the game
    /// - `chairs`: chairs available this round
    RoundStarted,

    /// The music stopped; players may now claim a chair.
    ///
    /// Sets:
    /// - `round`: round number
    MusicStopped,

    // === Player events ===
    /// A player sat down in time.
    ///
    /// Sets:
    /// - `player`: player id
    /// - `round`: round number
    ChairSecured,

    /// A player found no free chair and left the game.
    ///
    /// Sets:
    /// - `player`: player id
    /// - `round`: round number
    PlayerEliminated,

    /// The last player standing.
    ///
    /// Sets:
    /// - `player`: player id
    /// - `round`: final round number
    PlayerWon,

    // === Runtime events ===
    /// Every actor joined and a winner was determined.
    ///
    /// Sets:
    /// - `player`: winner id
    /// - `round`: final round number
    GameFinished,

    /// The game ended without a winner.
    ///
    /// Sets:
    /// - `reason`: error label/message
    GameAborted,

    /// Shutdown requested (OS signal observed).
    ShutdownRequested,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `reason`: subscriber name and drop reason
    SubscriberOverflow,

    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `reason`: subscriber name and panic info
    SubscriberPanicked,
}

impl EventKind {
    /// True for the last event a game ever publishes.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, EventKind::GameFinished | EventKind::GameAborted)
    }
}

/// Game event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Player id, if applicable.
    pub player: Option<u32>,
    /// Round number, if applicable.
    pub round: Option<u64>,
    /// Players still in the game.
    pub players: Option<u32>,
    /// Chairs available in the round.
    pub chairs: Option<u32>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            player: None,
            round: None,
            players: None,
            chairs: None,
            reason: None,
        }
    }

    /// Attaches a player id.
    #[inline]
    pub fn with_player(mut self, id: u32) -> Self {
        self.player = Some(id);
        self
    }

    /// Attaches a round number.
    #[inline]
    pub fn with_round(mut self, round: u64) -> Self {
        self.round = Some(round);
        self
    }

    /// Attaches the player and chair counts.
    #[inline]
    pub fn with_counts(mut self, players: u32, chairs: u32) -> Self {
        self.players = Some(players);
        self.chairs = Some(chairs);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_reason(format!("subscriber={subscriber} info={info}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let a = Event::new(EventKind::MusicStopped);
        let b = Event::new(EventKind::MusicStopped);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn only_finish_and_abort_are_terminal() {
        assert!(EventKind::GameFinished.is_terminal());
        assert!(EventKind::GameAborted.is_terminal());
        assert!(!EventKind::PlayerWon.is_terminal());
        assert!(!EventKind::ShutdownRequested.is_terminal());
    }
}
