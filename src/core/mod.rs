//! Game core: the synchronization protocol and its runtime.
//!
//! The only entry point most users need is [`Game`], which wires the
//! coordinator, the players and the event delivery together.
//!
//! Internal modules:
//! - [`pool`]: non-replenishable counting semaphore holding one round's chairs;
//! - [`round`]: the round context published to players, claim reports;
//! - [`state`]: counts, phase and pool; round transitions;
//! - [`player`]: the player actor and its state machine;
//! - [`coordinator`]: the single driver with its claim barrier;
//! - [`game`]: spawns and joins everything, checks the outcome;
//! - [`shutdown`]: OS signal handling.

mod builder;
mod config;
mod coordinator;
mod game;
mod player;
mod pool;
mod round;
mod shutdown;
mod state;

pub use builder::GameBuilder;
pub use config::GameConfig;
pub use coordinator::{Coordinator, CoordinatorReport, Elimination};
pub use game::{Game, GameReport};
pub use player::{Player, PlayerReport, PlayerState};
pub use pool::PermitPool;
pub use round::{Claim, ClaimReport, Phase, RoundContext, RoundWatch};
pub use state::GameState;
