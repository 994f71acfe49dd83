//! # Event subscriber trait.
//!
//! Provides [`Subscribe`] an extension point for plugging custom event handlers into the game.
//!
//! Each subscriber gets:
//! - **Dedicated worker task** (runs independently)
//! - **Per-subscriber bounded queue** (capacity via [`Subscribe::queue_capacity`])
//! - **Panic isolation** (panics are caught and reported as `EventKind::SubscriberPanicked`)
//!
//! ## Architecture
//! ```text
//! SubscriberSet ──► [bounded queue] ──► worker task ──► subscriber.on_event()
//!                                    └─► panic caught → EventKind::SubscriberPanicked
//! ```
//!
//! ## Rules
//! - A full queue holds back the event listener; no event is dropped.
//! - A subscriber whose worker is gone misses events; each miss publishes
//!   `EventKind::SubscriberOverflow` and fails the game.
//! - Events are processed sequentially (FIFO) per subscriber.
//! - Subscribers never block the players; the coordinator waits for them
//!   once per round at most.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use musical_chairs::{Event, EventKind, Subscribe};
//!
//! struct Eliminations;
//!
//! #[async_trait]
//! impl Subscribe for Eliminations {
//!     async fn on_event(&self, ev: &Event) {
//!         if matches!(ev.kind, EventKind::PlayerEliminated) {
//!             // count it, export it, etc.
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "eliminations" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Event subscriber for game observability.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
/// - Slow processing paces the game round by round.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// Called from a dedicated worker task, not in the publisher context.
    /// Events are delivered in FIFO order per subscriber.
    async fn on_event(&self, event: &Event);

    /// Returns the subscriber name used in overflow/panic events.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the preferred queue capacity for this subscriber.
    ///
    /// The runtime clamps capacity to a minimum of 1.
    ///
    /// Default: 1024.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
