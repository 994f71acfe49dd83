//! Game events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by the game state, the player actors
//! and the game runtime.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//! - [`Backlog`], [`Delivered`] listener progress, so producers never outrun the bus
//!
//! ## Quick reference
//! - **Publishers**: `GameState` (round started, music stopped), `Player`
//!   (secured, eliminated, won), `Game` (finished, aborted, shutdown),
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the `Game` event listener, which fans out to `SubscriberSet`.

mod bus;
mod delivery;
mod event;

pub use bus::Bus;
pub use delivery::{Backlog, Delivered};
pub use event::{Event, EventKind};
