//! Shared types for the game TCP server.
//!
//! This module defines:
//! - `ClientId`: a lightweight handle for connected clients
//! - `AppRequest`: messages flowing into the application task
//! - `Outbound`: response slots queued for a client's writer

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use game_core::{AppError, Command, CommandOutput};
use tokio::sync::{mpsc, oneshot, RwLock};

/// Identifier for a connected client, unique for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(pub u64);

pub type CommandResult = Result<CommandOutput, AppError>;

/// Message flowing into the central application task.
#[derive(Debug)]
pub enum AppRequest {
    /// A decoded client command. The result goes back on `reply`.
    Command {
        client_id: ClientId,
        command: Command,
        reply: oneshot::Sender<CommandResult>,
    },

    /// Advance the clock. Sent by the ticker only.
    Tick { elapsed: Duration },
}

/// Channel from clients and the ticker → application task.
pub type AppTx = mpsc::UnboundedSender<AppRequest>;
pub type AppRx = mpsc::UnboundedReceiver<AppRequest>;

/// One response slot, in request order.
#[derive(Debug)]
pub enum Outbound {
    /// Already encoded (the request never reached the application).
    Ready(String),
    /// Waiting on the application task.
    Pending(oneshot::Receiver<CommandResult>),
}

pub type OutboundTx = mpsc::UnboundedSender<Outbound>;
pub type OutboundRx = mpsc::UnboundedReceiver<Outbound>;

/// Connected clients and their peer addresses.
pub type ClientRegistry = Arc<RwLock<HashMap<ClientId, SocketAddr>>>;
