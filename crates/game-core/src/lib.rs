//! game-core
//!
//! Pure simulation logic for the dog-walk server:
//! - map model (roads, buildings, offices)
//! - dogs and their road-clamped physics
//! - per-map game sessions and the game clock
//! - players, tokens and the command facade

pub mod geom;
pub mod direction;
pub mod map;
pub mod dog;
pub mod session;
pub mod game;
pub mod player;
pub mod token;
pub mod messages;
pub mod error;
pub mod app;

pub use direction::{Direction, Move};
pub use geom::{Bounds, Offset, Point, Position, Rectangle, Size, Velocity};

pub use map::{Building, Map, MapId, Office, OfficeId, Orientation, Road, ROAD_HALF_WIDTH};
pub use dog::{Dog, DogId, IdGenerator};
pub use session::{GameSession, SpawnPolicy};
pub use game::{Game, DEFAULT_DOG_SPEED};
pub use player::{Player, PlayerId, PlayerRegistry};
pub use token::{Token, TokenStore, TOKEN_LEN};

pub use messages::{
    Command,
    CommandOutput,
    DogState,
    JoinRequest,
    JoinResult,
    MapSummary,
    PlayerEntry,
};

pub use error::{AppError, ErrorKind, GameError, MapError, RegistryError, TokenError};
pub use app::Application;
