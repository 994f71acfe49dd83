//! # Coordinator: the single driver of the game.
//!
//! Owns the [`GameState`] and advances it round after round:
//!
//! ```text
//! announce()
//! loop while chairs > 0 {
//!   ├─► wait for the event listener           (only with a Backlog attached)
//!   ├─► sleep(music ± jitter)                 (cancellable)
//!   ├─► stop_music()                          → players wake, race
//!   ├─► claim barrier: one ClaimReport per alive player
//!   │     ├─ bounded by claim_timeout         → ClaimTimeout
//!   │     └─ tally must be chairs × Secured + 1 × Missed
//!   ├─► sleep(resolution)                     (cancellable, pacing only)
//!   └─► start_round()                         → pool swapped after the barrier
//! }
//! finish()                                    → terminal broadcast
//! ```
//!
//! ## Rules
//! - The pool is never swapped while a claim of the current round is outstanding
//! - Exactly one `Missed` per round, otherwise the game fails with `Invariant`
//! - A report tagged with another round is a protocol bug (`Invariant`)
//! - With a [`Backlog`], a round never starts before the listener delivered the
//!   previous one, so the bus holds at most one round of events

use std::time::Duration;

use tokio::{select, sync::mpsc, time};
use tokio_util::sync::CancellationToken;

use crate::error::GameError;
use crate::events::Backlog;

use super::config::GameConfig;
use super::round::{Claim, ClaimReport};
use super::state::GameState;

/// One player leaving the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elimination {
    /// Round the player lost.
    pub round: u64,
    /// The eliminated player.
    pub player: u32,
}

/// What the coordinator observed over a complete game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoordinatorReport {
    /// Rounds played.
    pub rounds: u64,
    /// Eliminations in round order.
    pub eliminations: Vec<Elimination>,
}

/// Drives the phase transitions of one game.
pub struct Coordinator {
    state: GameState,
    reports: mpsc::Receiver<ClaimReport>,
    cfg: GameConfig,
    backlog: Option<Backlog>,
}

impl Coordinator {
    /// Creates a coordinator owning `state` and listening on `reports`.
    pub fn new(state: GameState, reports: mpsc::Receiver<ClaimReport>, cfg: GameConfig) -> Self {
        Self {
            state,
            reports,
            cfg,
            backlog: None,
        }
    }

    /// Paces the rounds on the event listener's progress.
    pub fn with_backlog(mut self, backlog: Backlog) -> Self {
        self.backlog = Some(backlog);
        self
    }

    /// Runs rounds until one player is left, then issues the terminal broadcast.
    ///
    /// On error (or cancellation) the state is dropped, which also releases
    /// every parked player.
    pub async fn run(mut self, token: CancellationToken) -> Result<CoordinatorReport, GameError> {
        let mut report = CoordinatorReport::default();
        self.state.announce();

        while !self.state.is_over() {
            self.catch_up(&token).await?;
            self.pause(self.cfg.music_interval(), &token).await?;
            self.state.stop_music();

            let loser = self.collect_claims(&token).await?;
            report.eliminations.push(Elimination {
                round: self.state.round(),
                player: loser,
            });
            report.rounds = self.state.round();

            self.pause(self.cfg.resolution, &token).await?;
            self.state.start_round()?;
        }

        self.state.finish();
        Ok(report)
    }

    /// Cancellable sleep.
    async fn pause(&self, d: Duration, token: &CancellationToken) -> Result<(), GameError> {
        if d.is_zero() {
            return if token.is_cancelled() {
                Err(GameError::Interrupted)
            } else {
                Ok(())
            };
        }
        select! {
            _ = time::sleep(d) => Ok(()),
            _ = token.cancelled() => Err(GameError::Interrupted),
        }
    }

    /// Waits until the listener delivered the current `RoundStarted`, and with
    /// it every event of the previous rounds.
    async fn catch_up(&mut self, token: &CancellationToken) -> Result<(), GameError> {
        let seq = self.state.announced_seq();
        let Some(backlog) = self.backlog.as_mut() else {
            return Ok(());
        };
        select! {
            _ = backlog.drained_through(seq) => Ok(()),
            _ = token.cancelled() => Err(GameError::Interrupted),
        }
    }

    /// Claim barrier: waits for one report per alive player; returns the loser.
    async fn collect_claims(&mut self, token: &CancellationToken) -> Result<u32, GameError> {
        let round = self.state.round();
        let expected = self.state.players();
        let chairs = self.state.chairs();
        let deadline = time::Instant::now() + self.cfg.claim_timeout;

        let mut received = 0u32;
        let mut secured = 0u32;
        let mut losers = Vec::with_capacity(1);

        while received < expected {
            let next = select! {
                r = time::timeout_at(deadline, self.reports.recv()) => r,
                _ = token.cancelled() => return Err(GameError::Interrupted),
            };
            let report = match next {
                Ok(Some(report)) => report,
                Ok(None) => {
                    return Err(GameError::invariant(
                        round,
                        format!("all players left with {} report(s) missing", expected - received),
                    ));
                }
                Err(_elapsed) => {
                    return Err(GameError::ClaimTimeout {
                        round,
                        timeout: self.cfg.claim_timeout,
                        missing: expected - received,
                    });
                }
            };

            if report.round != round {
                return Err(GameError::invariant(
                    round,
                    format!(
                        "player {} reported a claim for round {}",
                        report.player, report.round
                    ),
                ));
            }
            received += 1;
            match report.claim {
                Claim::Secured => secured += 1,
                Claim::Missed => losers.push(report.player),
            }
        }

        match losers.as_slice() {
            [loser] if secured == chairs => {
                tracing::debug!(round, loser, "claim barrier complete");
                Ok(*loser)
            }
            _ => Err(GameError::invariant(
                round,
                format!(
                    "expected {chairs} secured and 1 missed, got {secured} secured and losers {losers:?}"
                ),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Bus, EventKind};

    fn quick(players: u32) -> GameConfig {
        GameConfig {
            players,
            music: Duration::ZERO,
            resolution: Duration::ZERO,
            claim_timeout: Duration::from_millis(200),
            ..GameConfig::default()
        }
    }

    fn report(player: u32, round: u64, claim: Claim) -> ClaimReport {
        ClaimReport {
            player,
            round,
            claim,
        }
    }

    #[tokio::test]
    async fn scripted_reports_drive_the_game_to_the_end() {
        let state = GameState::new(3, Bus::new(64)).unwrap();
        let rx_ctx = state.watch();
        let (tx, rx) = mpsc::channel(16);

        tx.send(report(1, 1, Claim::Secured)).await.unwrap();
        tx.send(report(2, 1, Claim::Missed)).await.unwrap();
        tx.send(report(3, 1, Claim::Secured)).await.unwrap();
        tx.send(report(3, 2, Claim::Missed)).await.unwrap();
        tx.send(report(1, 2, Claim::Secured)).await.unwrap();

        let out = Coordinator::new(state, rx, quick(3))
            .run(CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(out.rounds, 2);
        assert_eq!(
            out.eliminations,
            vec![
                Elimination { round: 1, player: 2 },
                Elimination { round: 2, player: 3 }
            ]
        );
        let last = rx_ctx.borrow();
        assert!(last.game_over);
        assert_eq!((last.players, last.chairs), (1, 0));
    }

    #[tokio::test]
    async fn two_losers_in_a_round_is_fatal() {
        let state = GameState::new(3, Bus::new(64)).unwrap();
        let (tx, rx) = mpsc::channel(16);
        tx.send(report(1, 1, Claim::Missed)).await.unwrap();
        tx.send(report(2, 1, Claim::Missed)).await.unwrap();
        tx.send(report(3, 1, Claim::Secured)).await.unwrap();

        let err = Coordinator::new(state, rx, quick(3))
            .run(CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::Invariant { round: 1, .. }));
    }

    #[tokio::test]
    async fn stale_round_report_is_fatal() {
        let state = GameState::new(2, Bus::new(64)).unwrap();
        let (tx, rx) = mpsc::channel(16);
        tx.send(report(1, 0, Claim::Secured)).await.unwrap();

        let err = Coordinator::new(state, rx, quick(2))
            .run(CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::Invariant { round: 1, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn silent_players_hit_the_claim_timeout() {
        let state = GameState::new(4, Bus::new(64)).unwrap();
        let (tx, rx) = mpsc::channel(16);
        tx.send(report(1, 1, Claim::Secured)).await.unwrap();

        let err = Coordinator::new(state, rx, quick(4))
            .run(CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GameError::ClaimTimeout {
                round: 1,
                missing: 3,
                ..
            }
        ));
        drop(tx);
    }

    #[tokio::test]
    async fn rounds_wait_for_the_listener() {
        let bus = Bus::new(64);
        let mut events = bus.subscribe();
        let state = GameState::new(2, bus).unwrap();
        let (tx, rx) = mpsc::channel(16);
        tx.send(report(1, 1, Claim::Secured)).await.unwrap();
        tx.send(report(2, 1, Claim::Missed)).await.unwrap();
        let (delivered, backlog) = Backlog::channel();

        let run = tokio::spawn(
            Coordinator::new(state, rx, quick(2))
                .with_backlog(backlog)
                .run(CancellationToken::new()),
        );

        let started = events.recv().await.unwrap();
        assert_eq!(started.kind, EventKind::RoundStarted);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(events.try_recv().is_err());
        assert!(!run.is_finished());

        delivered.mark(started.seq);
        let out = run.await.unwrap().unwrap();
        assert_eq!(out.rounds, 1);
        assert_eq!(events.recv().await.unwrap().kind, EventKind::MusicStopped);
    }

    #[tokio::test]
    async fn cancellation_interrupts_the_music() {
        let state = GameState::new(4, Bus::new(64)).unwrap();
        let (_tx, rx) = mpsc::channel(16);
        let token = CancellationToken::new();
        let cfg = GameConfig {
            music: Duration::from_secs(60),
            ..quick(4)
        };

        let run = tokio::spawn(Coordinator::new(state, rx, cfg).run(token.clone()));
        token.cancel();
        assert!(matches!(
            run.await.unwrap(),
            Err(GameError::Interrupted)
        ));
    }
}
