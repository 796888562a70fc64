//! Error types for the simulation core.
//!
//! [`AppError`] is what the command facade returns. Every variant maps
//! to a stable [`ErrorKind`] whose [`code`](ErrorKind::code) the
//! transport puts on the wire next to the human-readable message.
//!
//! The lower-level errors (`GameError`, `RegistryError`, `TokenError`,
//! `MapError`) are produced by the model types and converted into
//! `AppError` at the facade.

use thiserror::Error;

use crate::dog::DogId;
use crate::map::{MapId, OfficeId};

/// Machine-readable classification of a failed command.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed command envelope.
    BadRequest,
    /// Well-formed envelope, semantically invalid field.
    InvalidArgument,
    /// Empty user name on join.
    InvalidName,
    MapNotFound,
    /// Well-formed token with no matching player.
    UnknownToken,
    /// Missing or syntactically invalid token.
    InvalidToken,
    /// Broken internal invariant. Never caused by client input.
    Internal,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "badRequest",
            ErrorKind::InvalidArgument => "invalidArgument",
            ErrorKind::InvalidName => "invalidName",
            ErrorKind::MapNotFound => "mapNotFound",
            ErrorKind::UnknownToken => "unknownToken",
            ErrorKind::InvalidToken => "invalidToken",
            ErrorKind::Internal => "internalError",
        }
    }
}

/// Failure of a single command.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Invalid name")]
    InvalidName,

    #[error("Map not found")]
    MapNotFound(MapId),

    #[error("Player token has not been found")]
    UnknownToken,

    #[error("Authorization token is invalid: {0}")]
    InvalidToken(#[from] TokenError),

    #[error(transparent)]
    IdCollision(#[from] RegistryError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest(message.into())
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        AppError::InvalidArgument(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::BadRequest(_) => ErrorKind::BadRequest,
            AppError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            AppError::InvalidName => ErrorKind::InvalidName,
            AppError::MapNotFound(_) => ErrorKind::MapNotFound,
            AppError::UnknownToken => ErrorKind::UnknownToken,
            AppError::InvalidToken(_) => ErrorKind::InvalidToken,
            AppError::IdCollision(_) | AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}

impl From<GameError> for AppError {
    fn from(err: GameError) -> Self {
        match err {
            GameError::UnknownMap(id) => AppError::MapNotFound(id),
            GameError::ZeroTick => AppError::invalid_argument("Tick duration must be positive"),
            other => AppError::Internal(other.to_string()),
        }
    }
}

/// Errors from [`Game`](crate::game::Game) bookkeeping.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    #[error("map {0} is not loaded")]
    UnknownMap(MapId),

    #[error("map {0} is already loaded")]
    DuplicateMap(MapId),

    #[error("a session for map {0} already exists")]
    SessionExists(MapId),

    #[error("tick duration must be positive")]
    ZeroTick,
}

/// Errors while assembling a [`Map`](crate::map::Map).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    #[error("office {0} is already placed on this map")]
    DuplicateOffice(OfficeId),
}

/// Player registry invariant violations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("player with id {0} already exists")]
    IdCollision(DogId),
}

/// Token syntax errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is missing")]
    Missing,

    #[error("expected {expected} characters, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("unexpected character {0:?}")]
    InvalidCharacter(char),
}
