//! # musical-chairs
//!
//! **musical-chairs** plays the elimination game as a concurrency protocol:
//! N player tasks race for a shrinking pool of chairs (semaphore permits),
//! driven by a single coordinator that alternates between "music playing"
//! and "music stopped" until exactly one player is left.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!                 ┌──────────────────────────────────────────┐
//!                 │  Coordinator (owns GameState)            │
//!                 │  music ─► stop_music ─► claim barrier    │
//!                 │        ─► start_round ─► ... ─► finish   │
//!                 └──────┬─────────────────────────▲─────────┘
//!       watch<RoundContext>                        │ mpsc<ClaimReport>
//!      {round, phase, counts, pool}                │ (one per alive player)
//!        ┌───────────────┼───────────────┐         │
//!        ▼               ▼               ▼         │
//!   ┌──────────┐    ┌──────────┐    ┌──────────┐   │
//!   │ Player 1 │    │ Player 2 │    │ Player N │ ──┘
//!   │try_claim │    │try_claim │    │try_claim │
//!   └────┬─────┘    └────┬─────┘    └────┬─────┘
//!        │ Publishes     │               │
//!        ▼               ▼               ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │                   Bus (broadcast channel)                     │
//! └──────────────────────────────┬────────────────────────────────┘
//!                                ▼
//!                         SubscriberSet
//!                    ┌───────────┼───────────┐
//!                    ▼           ▼           ▼
//!                LogWriter   Scoreboard    custom
//! ```
//!
//! ### Round lifecycle
//! ```text
//! RoundStarted{k, players, chairs}
//!   ├─► music plays (GameConfig::music, jittered)
//!   ├─► MusicStopped{k}: context {round=k, Stopped} published
//!   ├─► every alive player: try_claim() on round k's pool
//!   │       ├─ ok   ─► ChairSecured, report Secured
//!   │       └─ fail ─► PlayerEliminated, report Missed, exit
//!   ├─► coordinator waits for every report (exactly one Missed)
//!   └─► start_round(): players-1, chairs-1, old pool retired, new pool
//! chairs == 0 ─► terminal broadcast ─► PlayerWon ─► GameFinished
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types                              |
//! |-------------------|----------------------------------------------------------|----------------------------------------|
//! | **Game**          | Runs a complete game and checks its outcome.             | [`Game`], [`GameReport`]               |
//! | **Protocol**      | Round context, permit pool, actors.                      | [`GameState`], [`PermitPool`], [`Player`], [`Coordinator`] |
//! | **Subscriber API**| Hook into game events (narrative, standings, custom).    | [`Subscribe`], [`LogWriter`], [`Scoreboard`] |
//! | **Errors**        | Typed errors for invariant violations and runtime issues.| [`GameError`]                          |
//! | **Configuration** | Timing and capacity settings.                            | [`GameConfig`], [`JitterPolicy`]       |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use musical_chairs::{Game, GameConfig, LogWriter, Subscribe};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = GameConfig {
//!         music: Duration::from_millis(10),
//!         resolution: Duration::ZERO,
//!         ..GameConfig::with_players(4)
//!     };
//!     let log = Arc::new(LogWriter::new());
//!
//!     let report = Game::builder(cfg)
//!         .with_subscriber(log.clone() as Arc<dyn Subscribe>)
//!         .build()
//!         .run()
//!         .await?;
//!     log.check()?;
//!
//!     assert_eq!(report.rounds, 3);
//!     Ok(())
//! }
//! ```

mod core;
mod error;
mod events;
mod policies;
mod subscribers;

// ---- Public re-exports ----

pub use crate::core::{
    Claim, ClaimReport, Coordinator, CoordinatorReport, Elimination, Game, GameBuilder,
    GameConfig, GameReport, GameState, PermitPool, Phase, Player, PlayerReport, PlayerState,
    RoundContext, RoundWatch,
};
pub use error::GameError;
pub use events::{Backlog, Bus, Delivered, Event, EventKind};
pub use policies::JitterPolicy;
pub use subscribers::{LogWriter, Scoreboard, Standing, Subscribe, SubscriberSet};
