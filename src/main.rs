//! musical-chairs - plays one game and prints its narrative.
//!
//! ```bash
//! musical-chairs        # 4 players
//! musical-chairs 6      # 6 players, 5 chairs
//! RUST_LOG=musical_chairs=debug musical-chairs   # protocol diagnostics on stderr
//! ```

use std::sync::Arc;

use clap::Parser;
use musical_chairs::{Game, GameConfig, JitterPolicy, LogWriter, Subscribe};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Musical chairs: N players race for N-1 chairs until one is left.
#[derive(Parser, Debug)]
#[command(name = "musical-chairs")]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of players (at least 2).
    #[arg(default_value_t = 4, value_parser = clap::value_parser!(u32).range(2..))]
    players: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cfg = GameConfig {
        music_jitter: JitterPolicy::Equal,
        ..GameConfig::with_players(args.players)
    };
    let log = Arc::new(LogWriter::new());

    let game = Game::builder(cfg)
        .with_subscriber(log.clone() as Arc<dyn Subscribe>)
        .build();
    tracing::info!(
        players = game.config().players,
        chairs = game.config().initial_chairs(),
        "starting game"
    );
    let outcome = game.run().await;

    log.check()?;
    outcome?;
    Ok(())
}
