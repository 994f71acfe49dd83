//! # LogWriter: console narrative of the game
//!
//! A subscriber that renders incoming [`Event`]s as the game's status stream.
//! By default it writes to stdout; any `Write + Send` sink can be plugged in.
//!
//! ## Example output
//! ```text
//! -------------------------------------------
//! round 1: 4 players, 3 chairs
//! -------------------------------------------
//! > the music stopped! players are racing for a chair...
//! player 3 secured a chair
//! player 1 secured a chair
//! player 4 secured a chair
//! player 2 was eliminated
//! ...
//! player 4 is the winner!
//! musical chairs finished after 3 rounds
//! ```
//!
//! A failed write is remembered and surfaced by [`LogWriter::check`]; the
//! narrative is the whole point of the program, so callers treat it as fatal.

use std::io::{self, Write};
use std::sync::{Mutex, OnceLock};

use async_trait::async_trait;

use crate::error::GameError;
use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

const RULE: &str = "-------------------------------------------";

/// Event writer subscriber.
pub struct LogWriter {
    out: Mutex<Box<dyn Write + Send>>,
    failure: OnceLock<String>,
}

impl Default for LogWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl LogWriter {
    /// Construct a [`LogWriter`] printing to stdout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Construct a [`LogWriter`] printing to the given sink.
    #[must_use]
    pub fn with_writer(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
            failure: OnceLock::new(),
        }
    }

    /// Returns the first write failure, if any.
    pub fn check(&self) -> Result<(), GameError> {
        match self.failure.get() {
            Some(error) => Err(GameError::Output {
                error: error.clone(),
            }),
            None => Ok(()),
        }
    }

    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| io::Error::other("status sink poisoned"))?;
        writeln!(out, "{line}")?;
        out.flush()
    }
}

/// Renders the status line for an event; `None` for events that stay silent.
pub(crate) fn render(e: &Event) -> Option<String> {
    let player = e.player.unwrap_or_default();
    let line = match e.kind {
        EventKind::RoundStarted => format!(
            "{RULE}\nround {}: {}, {}\n{RULE}",
            e.round.unwrap_or_default(),
            counted(e.players.unwrap_or_default(), "player"),
            counted(e.chairs.unwrap_or_default(), "chair"),
        ),
        EventKind::MusicStopped => {
            "> the music stopped! players are racing for a chair...".to_string()
        }
        EventKind::ChairSecured => format!("player {player} secured a chair"),
        EventKind::PlayerEliminated => format!("player {player} was eliminated"),
        EventKind::PlayerWon => format!("player {player} is the winner!"),
        EventKind::GameFinished => format!(
            "musical chairs finished after {}",
            counted(e.round.unwrap_or_default(), "round")
        ),
        EventKind::GameAborted => format!(
            "musical chairs aborted: {}",
            e.reason.as_deref().unwrap_or("unknown")
        ),
        EventKind::ShutdownRequested => "[shutdown-requested]".to_string(),
        EventKind::SubscriberOverflow | EventKind::SubscriberPanicked => return None,
    };
    Some(line)
}

fn counted(n: impl Into<u64>, noun: &str) -> String {
    let n = n.into();
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        if self.failure.get().is_some() {
            return;
        }
        let Some(line) = render(e) else {
            return;
        };
        if let Err(err) = self.write_line(&line) {
            tracing::error!(error = %err, "status output failed");
            let _ = self.failure.set(err.to_string());
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
