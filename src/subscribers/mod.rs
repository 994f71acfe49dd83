//! # Event subscribers for the game runtime.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and built-in implementations for handling events broadcast through the
//! [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Player ── publish(Event) ──► Bus ──► event listener ──► SubscriberSet
//!                                                               │
//!                                              ┌────────────────┼──────────┐
//!                                              ▼                ▼          ▼
//!                                          LogWriter        Scoreboard   Custom
//!                                       (console narrative) (standings)
//! ```
//!
//! ## Subscriber types
//! - **Passive subscribers** - observe and react to events (narrative, metrics)
//! - **Stateful subscribers** - maintain internal state based on events (Scoreboard)

mod log;
mod scoreboard;
mod set;
mod subscriber;

pub use log::LogWriter;
pub use scoreboard::{Scoreboard, Standing};
pub use set::SubscriberSet;
pub use subscriber::Subscribe;
