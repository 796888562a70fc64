//! JSON-lines TCP server for the dog-walk simulation.

use clap::Parser;
use game_server::config::{Cli, Config};
use game_server::logging::init_logging;
use game_server::server;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::load(Cli::parse())?;

    info!(
        addr = %config.socket_addr_string(),
        max_clients = config.max_clients,
        tick_period = ?config.tick_period,
        randomize_spawn_points = config.randomize_spawn_points,
        "starting game-server"
    );

    server::run(config).await
}
