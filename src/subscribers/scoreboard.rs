//! # Player standings tracker with sequence-based ordering.
//!
//! Maintains the observed state of every player, using event sequence
//! numbers to handle out-of-order delivery.
//!
//! ## Architecture
//! ```text
//! Game ──► Bus ──► event listener ──► SubscriberSet ──► Scoreboard::update()
//!                                                              │
//!                                                              ▼
//!                                                 HashMap<u32, PlayerRecord>
//!                                                   (id → {seq, standing})
//! ```
//!
//! ## Rules
//! - Only `ChairSecured` / `PlayerEliminated` / `PlayerWon` touch standings
//! - A player leaves `Contending` at most once; later changes are rejected
//! - Events with `seq <= last_seq` are **rejected** (stale)
//! - Reads (`contenders`, `standing`) are **eventually consistent**

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Observed standing of one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standing {
    /// Still in the game; `rounds` chairs secured so far.
    Contending { rounds: u64 },
    /// Lost the race for a chair in `round`.
    Eliminated { round: u64 },
    /// Last player standing after `round`.
    Winner { round: u64 },
}

#[derive(Debug, Clone)]
struct PlayerRecord {
    last_seq: u64,
    standing: Standing,
}

/// Thread-safe tracker of player standings.
pub struct Scoreboard {
    state: RwLock<HashMap<u32, PlayerRecord>>,
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Scoreboard {
    /// Creates a new empty scoreboard.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(HashMap::new()),
        }
    }

    /// Applies a player event if it is newer than the last one seen for that player.
    ///
    /// ```text
    /// update(PlayerEliminated, seq=100) → Eliminated, last_seq=100
    /// update(ChairSecured, seq=99)      → rejected (stale)
    /// ```
    ///
    /// Returns `true` when the standing changed.
    pub async fn update(&self, ev: &Event) -> bool {
        let Some(id) = ev.player else {
            return false;
        };
        let round = ev.round.unwrap_or_default();

        let next = match ev.kind {
            EventKind::ChairSecured => None,
            EventKind::PlayerEliminated => Some(Standing::Eliminated { round }),
            EventKind::PlayerWon => Some(Standing::Winner { round }),
            _ => return false,
        };

        let mut state = self.state.write().await;
        let entry = state.entry(id).or_insert(PlayerRecord {
            last_seq: 0,
            standing: Standing::Contending { rounds: 0 },
        });

        if ev.seq <= entry.last_seq {
            return false;
        }
        let Standing::Contending { rounds } = entry.standing else {
            return false;
        };

        entry.last_seq = ev.seq;
        entry.standing = next.unwrap_or(Standing::Contending { rounds: rounds + 1 });
        true
    }

    /// Returns the sorted ids of players still contending.
    pub async fn contenders(&self) -> Vec<u32> {
        let state = self.state.read().await;
        let mut ids: Vec<u32> = state
            .iter()
            .filter(|(_, rec)| matches!(rec.standing, Standing::Contending { .. }))
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Returns the standing of a player, if any event about it was seen.
    pub async fn standing(&self, id: u32) -> Option<Standing> {
        self.state.read().await.get(&id).map(|rec| rec.standing)
    }
}

#[async_trait]
impl Subscribe for Scoreboard {
    async fn on_event(&self, ev: &Event) {
        self.update(ev).await;
    }

    fn name(&self) -> &'static str {
        "Scoreboard"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stale_events_are_rejected() {
        let board = Scoreboard::new();
        let stale = Event::new(EventKind::ChairSecured).with_player(1).with_round(1);
        let out = Event::new(EventKind::PlayerEliminated)
            .with_player(1)
            .with_round(1);

        assert!(board.update(&out).await);
        assert!(!board.update(&stale).await);
        assert_eq!(
            board.standing(1).await,
            Some(Standing::Eliminated { round: 1 })
        );
    }

    #[tokio::test]
    async fn older_claims_do_not_overwrite_newer_ones() {
        let board = Scoreboard::new();
        let older = Event::new(EventKind::ChairSecured).with_player(2).with_round(1);
        let newer = Event::new(EventKind::ChairSecured).with_player(2).with_round(2);
        assert!(older.seq < newer.seq);

        assert!(board.update(&newer).await);
        assert!(!board.update(&older).await);
        assert!(!board.update(&newer).await);
        assert_eq!(
            board.standing(2).await,
            Some(Standing::Contending { rounds: 1 })
        );
    }

    #[tokio::test]
    async fn standings_leave_contending_once() {
        let board = Scoreboard::new();
        for round in 1..=2 {
            let ev = Event::new(EventKind::ChairSecured)
                .with_player(4)
                .with_round(round);
            assert!(board.update(&ev).await);
        }
        assert_eq!(board.contenders().await, vec![4]);

        let won = Event::new(EventKind::PlayerWon).with_player(4).with_round(3);
        assert!(board.update(&won).await);
        let late = Event::new(EventKind::PlayerEliminated)
            .with_player(4)
            .with_round(3);
        assert!(!board.update(&late).await);

        assert_eq!(board.standing(4).await, Some(Standing::Winner { round: 3 }));
        assert!(board.contenders().await.is_empty());
    }

    #[tokio::test]
    async fn round_events_are_ignored() {
        let board = Scoreboard::new();
        assert!(!board.update(&Event::new(EventKind::MusicStopped)).await);
        assert_eq!(board.standing(1).await, None);
    }
}
