//! game-server
//!
//! Multi-client async TCP server for the dog-walk simulation.

pub mod config;
pub mod logging;
pub mod types;
pub mod server;

// these are internal modules, not re-exported
mod app_task;
mod client;
mod ticker;
