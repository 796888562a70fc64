//! TCP listener and top-level server wiring.
//!
//! This module:
//! - Loads the game config and binds the configured address/port.
//! - Accepts new TCP connections and assigns each a `ClientId`.
//! - Spawns:
//!   - a per-client task to handle I/O,
//!   - a single central application task that owns `Application`,
//!   - the ticker, when a tick period is configured.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use game_core::Application;
use game_protocol::load_game;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, RwLock};
use tracing::{info, warn};

use crate::app_task;
use crate::client;
use crate::config::Config;
use crate::ticker;
use crate::types::{AppRx, AppTx, ClientId, ClientRegistry};

/// Counter for assigning unique `ClientId`s.
static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

fn next_client_id() -> ClientId {
    let id = NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed);
    ClientId(id)
}

/// Load the game and run the TCP server with the given configuration.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let path = config.config_path()?;
    let mut game =
        load_game(path).with_context(|| format!("loading game config {}", path.display()))?;
    game.set_randomize_spawn_points(config.randomize_spawn_points);

    let addr = config.socket_addr_string();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!(%addr, "listening");

    serve(listener, Application::new(game), config.tick_period, config.max_clients).await
}

/// Serve clients on an already bound listener.
///
/// With a `tick_period` the server drives the clock itself and the
/// `tick` command is refused.
pub async fn serve(
    listener: TcpListener,
    mut app: Application,
    tick_period: Option<Duration>,
    max_clients: usize,
) -> anyhow::Result<()> {
    app.set_manual_tick(tick_period.is_none());

    let clients: ClientRegistry = Arc::new(RwLock::new(Default::default()));
    let (app_tx, app_rx): (AppTx, AppRx) = mpsc::unbounded_channel();

    tokio::spawn(app_task::run_app_loop(app_rx, app));

    if let Some(period) = tick_period {
        info!(?period, "automatic ticker enabled");
        tokio::spawn(ticker::run_ticker(period, app_tx.clone()));
    }

    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let current_clients = {
            let guard = clients.read().await;
            guard.len()
        };

        if current_clients >= max_clients {
            warn!(%peer_addr, max_clients, "rejecting connection: max_clients reached");
            // Dropping the stream closes it.
            continue;
        }

        let client_id = next_client_id();
        info!(client = client_id.0, %peer_addr, "accepted connection");

        {
            let mut guard = clients.write().await;
            guard.insert(client_id, peer_addr);
        }

        let clients_clone = clients.clone();
        let app_tx_clone = app_tx.clone();

        tokio::spawn(async move {
            match client::run_client(client_id, stream, app_tx_clone, clients_clone).await {
                Ok(()) => info!(client = client_id.0, "client disconnected"),
                Err(e) => warn!(client = client_id.0, error = %e, "client error"),
            }
        });
    }
}
