//! Bomber Agent
//!
//! Connects to a game server, joins as a player, and plays until the
//! connection closes. Configured entirely through `BOMBER_*` environment
//! variables.

use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use bomber_agent::network::client;
use bomber_agent::network::session::SessionConfig;
use bomber_agent::VERSION;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = SessionConfig::from_env();

    info!("Bomber Agent v{}", VERSION);
    info!("Server: {}", config.server_url);
    info!("Game: {} / Player: {}", config.game_id, config.player_id);

    client::run(config).await?;

    info!("session ended");
    Ok(())
}
