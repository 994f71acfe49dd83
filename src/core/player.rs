//! # Player: one contender in the game.
//!
//! Each player runs as its own task and is purely reactive: it parks on the
//! round context until the music of a round it has not played yet stops,
//! races for a chair on the pool carried by **that same** context, reports
//! the outcome to the coordinator and either parks again or leaves.
//!
//! ## State machine
//! ```text
//!            try_claim() ok
//!          ┌───────────────┐
//!          ▼               │
//!       ┌───────┐ ─────────┘
//!       │ Alive │ ── try_claim() fails ──► Eliminated
//!       └───────┘ ── game over, 0 chairs ─► Winner
//! ```
//!
//! ## Rules
//! - A player leaves `Alive` at most once (`eliminate` / `crown` enforce it)
//! - The round token (`last_round`) rejects stale and repeated wakeups
//! - Events are published **before** the claim report, so the narrative of a
//!   round is complete before the next round is announced
//! - Cancellation leaves the player `Alive` (withdrawn)

use tokio::{select, sync::mpsc};
use tokio_util::sync::CancellationToken;

use crate::error::GameError;
use crate::events::{Bus, Event, EventKind};

use super::round::{Claim, ClaimReport, RoundContext, RoundWatch};

/// Lifecycle of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// Still racing for chairs.
    Alive,
    /// Missed a chair; terminal.
    Eliminated,
    /// Last player standing; terminal.
    Winner,
}

impl PlayerState {
    /// True for `Eliminated` and `Winner`.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PlayerState::Alive)
    }
}

/// Final account of one player, returned when its task ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerReport {
    /// Player id (1-based).
    pub id: u32,
    /// State the player ended in.
    pub state: PlayerState,
    /// Chairs secured over the game.
    pub secured: u64,
    /// Last round the player took part in.
    pub last_round: u64,
}

/// A player actor.
pub struct Player {
    id: u32,
    state: PlayerState,
    last_round: u64,
    secured: u64,
    rounds: RoundWatch,
    reports: mpsc::Sender<ClaimReport>,
    bus: Bus,
}

impl Player {
    /// Creates a player that watches `rounds` and reports to `reports`.
    pub fn new(id: u32, rounds: RoundWatch, reports: mpsc::Sender<ClaimReport>, bus: Bus) -> Self {
        Self {
            id,
            state: PlayerState::Alive,
            last_round: 0,
            secured: 0,
            rounds,
            reports,
            bus,
        }
    }

    /// Player id.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Current state.
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Runs the player until it is eliminated, wins, or is cancelled.
    ///
    /// ### Exit conditions
    /// - missed a chair → `Eliminated`
    /// - terminal broadcast with no chair left → `Winner`
    /// - `token` cancelled or the game state dropped → stays `Alive`
    pub async fn run(mut self, token: CancellationToken) -> Result<PlayerReport, GameError> {
        while self.state == PlayerState::Alive {
            let ctx = select! {
                ctx = self.next_signal() => match ctx {
                    Some(ctx) => ctx,
                    None => break,
                },
                _ = token.cancelled() => break,
            };
            self.act(ctx).await?;
        }

        tracing::debug!(player = self.id, state = ?self.state, "player done");
        Ok(self.report())
    }

    /// Parks until the context signals this player; `None` once the game state is gone.
    async fn next_signal(&mut self) -> Option<RoundContext> {
        let last = self.last_round;
        self.rounds
            .wait_for(|ctx| ctx.signals(last))
            .await
            .ok()
            .map(|ctx| (*ctx).clone())
    }

    async fn act(&mut self, ctx: RoundContext) -> Result<(), GameError> {
        if ctx.game_over {
            if ctx.chairs != 0 || ctx.players != 1 {
                return Err(GameError::invariant(
                    ctx.round,
                    format!(
                        "player {} still alive at game over with players={} chairs={}",
                        self.id, ctx.players, ctx.chairs
                    ),
                ));
            }
            self.crown(self.last_round)?;
            self.bus.publish(
                Event::new(EventKind::PlayerWon)
                    .with_player(self.id)
                    .with_round(self.last_round),
            );
            return Ok(());
        }

        self.last_round = ctx.round;
        let claim = if ctx.pool.try_claim() {
            Claim::Secured
        } else {
            Claim::Missed
        };
        tracing::debug!(player = self.id, round = ctx.round, ?claim, "claim");

        match claim {
            Claim::Secured => {
                self.secured += 1;
                self.bus.publish(
                    Event::new(EventKind::ChairSecured)
                        .with_player(self.id)
                        .with_round(ctx.round),
                );
            }
            Claim::Missed => {
                self.eliminate(ctx.round)?;
                self.bus.publish(
                    Event::new(EventKind::PlayerEliminated)
                        .with_player(self.id)
                        .with_round(ctx.round),
                );
            }
        }

        let report = ClaimReport {
            player: self.id,
            round: ctx.round,
            claim,
        };
        if self.reports.send(report).await.is_err() {
            tracing::debug!(player = self.id, round = ctx.round, "coordinator gone");
        }
        Ok(())
    }

    /// `Alive → Eliminated`.
    pub fn eliminate(&mut self, round: u64) -> Result<(), GameError> {
        self.transition(round, PlayerState::Eliminated)
    }

    /// `Alive → Winner`.
    pub fn crown(&mut self, round: u64) -> Result<(), GameError> {
        self.transition(round, PlayerState::Winner)
    }

    fn transition(&mut self, round: u64, next: PlayerState) -> Result<(), GameError> {
        if self.state.is_terminal() {
            return Err(GameError::invariant(
                round,
                format!(
                    "player {} cannot become {next:?}: already {:?}",
                    self.id, self.state
                ),
            ));
        }
        self.state = next;
        Ok(())
    }

    fn report(&self) -> PlayerReport {
        PlayerReport {
            id: self.id,
            state: self.state,
            secured: self.secured,
            last_round: self.last_round,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::GameState;
    use std::time::Duration;

    fn player(state: &GameState, id: u32) -> (Player, mpsc::Receiver<ClaimReport>) {
        let (tx, rx) = mpsc::channel(8);
        (Player::new(id, state.watch(), tx, Bus::new(16)), rx)
    }

    #[test]
    fn leaves_alive_only_once() {
        let state = GameState::new(2, Bus::new(1)).unwrap();
        let (mut p, _rx) = player(&state, 1);

        p.eliminate(1).unwrap();
        assert_eq!(p.state(), PlayerState::Eliminated);
        assert!(p.eliminate(1).is_err());
        assert!(p.crown(1).is_err());
        assert_eq!(p.state(), PlayerState::Eliminated);
    }

    #[tokio::test]
    async fn ignores_playing_phase_and_claims_on_stop() {
        let mut state = GameState::new(3, Bus::new(16)).unwrap();
        let (p, mut rx) = player(&state, 7);
        let token = CancellationToken::new();
        let task = tokio::spawn(p.run(token.clone()));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(rx.try_recv().is_err(), "claimed while music was playing");

        state.stop_music();
        let report = rx.recv().await.unwrap();
        assert_eq!(
            report,
            ClaimReport {
                player: 7,
                round: 1,
                claim: Claim::Secured
            }
        );
        assert_eq!(state.pool().claimed(), 1);

        token.cancel();
        let out = task.await.unwrap().unwrap();
        assert_eq!(out.state, PlayerState::Alive);
        assert_eq!(out.secured, 1);
    }

    #[tokio::test]
    async fn does_not_claim_twice_in_one_round() {
        let mut state = GameState::new(3, Bus::new(16)).unwrap();
        let (p, mut rx) = player(&state, 1);
        let token = CancellationToken::new();
        let task = tokio::spawn(p.run(token.clone()));

        state.stop_music();
        assert_eq!(rx.recv().await.unwrap().round, 1);
        // Republish the same stopped round.
        state.stop_music();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(state.pool().claimed(), 1);

        token.cancel();
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn missing_a_chair_eliminates() {
        let mut state = GameState::new(2, Bus::new(16)).unwrap();
        assert!(state.pool().try_claim());
        let (p, mut rx) = player(&state, 2);
        let task = tokio::spawn(p.run(CancellationToken::new()));

        state.stop_music();
        assert_eq!(rx.recv().await.unwrap().claim, Claim::Missed);
        let out = task.await.unwrap().unwrap();
        assert_eq!(out.state, PlayerState::Eliminated);
        assert_eq!(out.last_round, 1);
    }

    #[tokio::test]
    async fn terminal_broadcast_crowns_the_survivor() {
        let mut state = GameState::new(2, Bus::new(16)).unwrap();
        let (p, _rx) = player(&state, 1);
        let task = tokio::spawn(p.run(CancellationToken::new()));

        state.start_round().unwrap();
        state.finish();

        let out = task.await.unwrap().unwrap();
        assert_eq!(out.state, PlayerState::Winner);
    }

    #[tokio::test]
    async fn dropped_state_releases_the_player() {
        let state = GameState::new(3, Bus::new(16)).unwrap();
        let (p, _rx) = player(&state, 1);
        let task = tokio::spawn(p.run(CancellationToken::new()));

        drop(state);
        let out = task.await.unwrap().unwrap();
        assert_eq!(out.state, PlayerState::Alive);
    }
}
