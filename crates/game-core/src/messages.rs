//! Command and result types of the application facade.
//!
//! These are **transport-agnostic**:
//! - [`Command`]: what the facade consumes.
//! - [`CommandOutput`]: what a successful command produces.
//!
//! JSON encoding lives in the `game-protocol` crate; this module is
//! purely logical.

use std::sync::Arc;

use crate::direction::Direction;
use crate::dog::{Dog, DogId};
use crate::geom::{Position, Velocity};
use crate::map::{Map, MapId};
use crate::player::PlayerId;
use crate::token::Token;

/// A request into the application.
///
/// Tokens are carried raw; the facade validates their syntax so a
/// malformed token and an unknown one fail with different kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List `(id, name)` of every loaded map.
    ListMaps,

    /// Full description of one map.
    GetMap { map_id: String },

    /// Create a dog on a map and get a token for it.
    Join(JoinRequest),

    /// Set the direction of the caller's dog.
    Move {
        token: Option<String>,
        direction: String,
    },

    /// Advance the simulation by `time_delta_ms` milliseconds.
    Tick { time_delta_ms: u64 },

    /// Names of the dogs in the caller's session.
    ListPlayers { token: Option<String> },

    /// Positions, velocities and facings in the caller's session.
    GetState { token: Option<String> },

    /// Succeeds iff the token belongs to a player.
    CheckToken { token: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    pub user_name: String,
    pub map_id: String,
}

/// Result of a successful command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    Maps(Vec<MapSummary>),
    Map(Arc<Map>),
    Joined(JoinResult),
    Players(Vec<PlayerEntry>),
    State(Vec<DogState>),
    /// Success without payload.
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapSummary {
    pub id: MapId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinResult {
    pub token: Token,
    pub player_id: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerEntry {
    pub id: DogId,
    pub name: String,
}

impl From<&Dog> for PlayerEntry {
    fn from(dog: &Dog) -> Self {
        PlayerEntry {
            id: dog.id(),
            name: dog.name().to_string(),
        }
    }
}

/// Snapshot of one dog.
#[derive(Debug, Clone, PartialEq)]
pub struct DogState {
    pub id: DogId,
    pub position: Position,
    pub velocity: Velocity,
    pub direction: Direction,
}

impl From<&Dog> for DogState {
    fn from(dog: &Dog) -> Self {
        DogState {
            id: dog.id(),
            position: dog.position(),
            velocity: dog.velocity(),
            direction: dog.direction(),
        }
    }
}
