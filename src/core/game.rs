//! # Game: wires the coordinator, the players and the event delivery.
//!
//! The [`Game`] owns the event bus, the subscribers and the configuration.
//! It spawns one player task per participant, drives the coordinator, joins
//! everything within [`GameConfig::grace`] and checks the final outcome.
//!
//! ## High-level architecture
//! ```text
//! Game::run()
//!   ├─► event listener: Bus.subscribe() ─► SubscriberSet::emit(&Event) ─► Delivered::mark
//!   ├─► shutdown watcher: OS signal ─► ShutdownRequested + token.cancel()
//!   ├─► GameState::new(N)
//!   ├─► Player 1..=N  (JoinSet, child tokens, RoundWatch + report sender)
//!   ├─► Coordinator::run()  ── rounds until one player is left ──► finish()
//!   │      (each round waits on the Backlog: the listener is never overrun)
//!   ├─► join players within grace
//!   │      ├─ Ok        → check 1 Winner + N-1 Eliminated
//!   │      └─ Timeout   → GraceExceeded { stuck }
//!   ├─► publish GameFinished | GameAborted
//!   └─► listener drains every subscriber queue, then run() returns
//!          (a lost event or a stuck subscriber fails the game)
//! ```
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use musical_chairs::{Game, GameConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = GameConfig {
//!         music: Duration::from_millis(5),
//!         resolution: Duration::ZERO,
//!         ..GameConfig::with_players(3)
//!     };
//!
//!     let report = Game::builder(cfg).build().run().await?;
//!     assert_eq!(report.eliminations.len(), 2);
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use tokio::{
    sync::{broadcast::error::RecvError, mpsc},
    task::{JoinHandle, JoinSet},
    time,
};
use tokio_util::sync::CancellationToken;

use crate::error::GameError;
use crate::events::{Backlog, Bus, Delivered, Event, EventKind};
use crate::subscribers::{Scoreboard, Subscribe, SubscriberSet};

use super::builder::GameBuilder;
use super::config::GameConfig;
use super::coordinator::{Coordinator, CoordinatorReport, Elimination};
use super::player::{Player, PlayerReport, PlayerState};
use super::shutdown;
use super::state::GameState;

/// Final outcome of a complete game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameReport {
    /// The last player standing.
    pub winner: u32,
    /// Rounds played (`N - 1`).
    pub rounds: u64,
    /// Eliminations in round order.
    pub eliminations: Vec<Elimination>,
    /// Every player's final account, sorted by id.
    pub players: Vec<PlayerReport>,
}

/// One game of musical chairs.
pub struct Game {
    cfg: GameConfig,
    bus: Bus,
    subscribers: Vec<Arc<dyn Subscribe>>,
    scoreboard: Arc<Scoreboard>,
}

impl Game {
    /// Returns a builder for a game with the given configuration.
    pub fn builder(cfg: GameConfig) -> GameBuilder {
        GameBuilder::new(cfg)
    }

    pub(super) fn new_internal(
        cfg: GameConfig,
        bus: Bus,
        subscribers: Vec<Arc<dyn Subscribe>>,
        scoreboard: Arc<Scoreboard>,
    ) -> Self {
        Self {
            cfg,
            bus,
            subscribers,
            scoreboard,
        }
    }

    /// The game's event bus; subscribe before [`run`](Self::run) to observe every event.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Standings as observed from the events.
    pub fn scoreboard(&self) -> Arc<Scoreboard> {
        Arc::clone(&self.scoreboard)
    }

    /// The configuration this game runs with.
    pub fn config(&self) -> &GameConfig {
        &self.cfg
    }

    /// Plays the game to the end.
    ///
    /// Returns once every actor joined and every subscriber processed the
    /// terminal event. A game whose events did not all reach the subscribers
    /// fails with [`GameError::EventsDropped`] even if it produced a winner.
    pub async fn run(self) -> Result<GameReport, GameError> {
        self.cfg.validate()?;

        let token = CancellationToken::new();
        let (delivered, backlog) = Backlog::channel();
        let listener = self.spawn_listener(delivered);
        let watcher = shutdown::spawn_watcher(self.bus.clone(), token.clone());

        let result = self.play(&token, backlog).await;
        watcher.abort();

        match &result {
            Ok(report) => {
                tracing::info!(winner = report.winner, rounds = report.rounds, "game finished");
                self.bus.publish(
                    Event::new(EventKind::GameFinished)
                        .with_player(report.winner)
                        .with_round(report.rounds),
                );
            }
            Err(err) => {
                if err.is_protocol_bug() {
                    tracing::error!(label = err.as_label(), details = %err.as_message(), "game aborted");
                } else {
                    tracing::warn!(label = err.as_label(), details = %err.as_message(), "game aborted");
                }
                self.bus.publish(
                    Event::new(EventKind::GameAborted).with_reason(err.to_string()),
                );
            }
        }

        let delivery = match time::timeout(self.cfg.grace, listener).await {
            Ok(Ok(0)) => Ok(()),
            Ok(Ok(dropped)) => Err(GameError::EventsDropped { dropped }),
            Ok(Err(join)) => Err(GameError::Output {
                error: format!("event listener failed: {join}"),
            }),
            Err(_elapsed) => Err(GameError::Output {
                error: format!("subscribers did not drain within {:?}", self.cfg.grace),
            }),
        };
        if let Err(err) = &delivery {
            tracing::error!(label = err.as_label(), details = %err.as_message(), "event delivery incomplete");
        }

        let report = result?;
        delivery?;
        Ok(report)
    }

    async fn play(
        &self,
        token: &CancellationToken,
        backlog: Backlog,
    ) -> Result<GameReport, GameError> {
        let players = self.cfg.players;
        let state = GameState::new(players, self.bus.clone())?;
        let (tx, rx) = mpsc::channel(players as usize);

        let mut set = JoinSet::new();
        for id in 1..=players {
            let player = Player::new(id, state.watch(), tx.clone(), self.bus.clone());
            set.spawn(player.run(token.child_token()));
        }
        drop(tx);

        let coordinator = Coordinator::new(state, rx, self.cfg.clone()).with_backlog(backlog);
        let outcome = coordinator.run(token.clone()).await;
        if outcome.is_err() {
            token.cancel();
        }

        let joined = self.join_players(&mut set, token).await;
        let coordinator = outcome?;
        self.conclude(coordinator, joined?)
    }

    /// Subscribes to the bus and forwards events to the subscriber set until
    /// the terminal event, then drains every subscriber queue.
    ///
    /// Resolves to the number of events lost on the way.
    fn spawn_listener(&self, delivered: Delivered) -> JoinHandle<u64> {
        let mut rx = self.bus.subscribe();
        let set = SubscriberSet::new(self.subscribers.clone(), self.bus.clone());

        tokio::spawn(async move {
            let mut dropped = 0u64;
            loop {
                match rx.recv().await {
                    Ok(ev) => {
                        dropped += set.emit(&ev).await as u64;
                        delivered.mark(ev.seq);
                        if ev.kind.is_terminal() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::error!(skipped, "event listener lagged");
                        dropped += skipped;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            drop(delivered);
            set.shutdown().await;
            dropped
        })
    }

    /// Waits for every player task within the grace period.
    async fn join_players(
        &self,
        set: &mut JoinSet<Result<PlayerReport, GameError>>,
        token: &CancellationToken,
    ) -> Result<Vec<PlayerReport>, GameError> {
        let grace = self.cfg.grace;
        let mut reports = Vec::with_capacity(self.cfg.players as usize);
        let mut failure: Option<GameError> = None;

        let joined = time::timeout(grace, async {
            while let Some(res) = set.join_next().await {
                let err = match res {
                    Ok(Ok(report)) => {
                        reports.push(report);
                        continue;
                    }
                    Ok(Err(err)) => err,
                    Err(join) => GameError::invariant(0, format!("player task failed: {join}")),
                };
                if failure.is_none() {
                    failure = Some(err);
                }
            }
        })
        .await;

        if joined.is_err() {
            token.cancel();
            set.abort_all();
            let stuck = (1..=self.cfg.players)
                .filter(|id| !reports.iter().any(|r| r.id == *id))
                .collect();
            return Err(GameError::GraceExceeded { grace, stuck });
        }
        match failure {
            Some(err) => Err(err),
            None => {
                reports.sort_unstable_by_key(|r| r.id);
                Ok(reports)
            }
        }
    }

    /// Checks that the game ended with one winner and everyone else eliminated.
    fn conclude(
        &self,
        coordinator: CoordinatorReport,
        players: Vec<PlayerReport>,
    ) -> Result<GameReport, GameError> {
        let round = coordinator.rounds;
        let winners: Vec<u32> = players
            .iter()
            .filter(|p| p.state == PlayerState::Winner)
            .map(|p| p.id)
            .collect();
        let eliminated = players
            .iter()
            .filter(|p| p.state == PlayerState::Eliminated)
            .count();

        let [winner] = winners.as_slice() else {
            return Err(GameError::invariant(
                round,
                format!("expected exactly one winner, got {winners:?}"),
            ));
        };
        if eliminated as u32 != self.cfg.initial_chairs()
            || coordinator.eliminations.len() != eliminated
        {
            return Err(GameError::invariant(
                round,
                format!(
                    "expected {} eliminations, players report {eliminated}, coordinator saw {}",
                    self.cfg.initial_chairs(),
                    coordinator.eliminations.len()
                ),
            ));
        }

        Ok(GameReport {
            winner: *winner,
            rounds: coordinator.rounds,
            eliminations: coordinator.eliminations,
            players,
        })
    }
}
