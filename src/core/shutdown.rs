//! # Shutdown on OS signals.
//!
//! [`spawn_watcher`] starts a task that waits for a termination signal,
//! announces it on the bus and cancels the game token. Players stop at
//! their next suspension point and the coordinator fails with
//! `GameError::Interrupted`.
//!
//! ## Signals
//! - Unix: `SIGINT`, `SIGTERM`, `SIGQUIT`
//! - Elsewhere: Ctrl-C via [`tokio::signal::ctrl_c`]

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::events::{Bus, Event, EventKind};

/// Spawns the signal watcher; abort the handle once the game is decided.
pub fn spawn_watcher(bus: Bus, token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        match wait_for_shutdown_signal().await {
            Ok(()) => {
                tracing::info!("shutdown signal received");
                bus.publish(Event::new(EventKind::ShutdownRequested));
                token.cancel();
            }
            Err(err) => {
                tracing::warn!(error = %err, "signal handlers unavailable");
            }
        }
    })
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = sigint.recv()  => {},
        _ = sigterm.recv() => {},
        _ = sigquit.recv() => {},
    }
    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
