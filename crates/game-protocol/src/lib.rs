//! game-protocol
//!
//! JSON on both edges of the dog-walk server.
//!
//! - [`config`]     : game config file → `game_core::Game`
//! - [`json_codec`] : request lines → `Command`, results → response lines
//! - [`wire_types`] : serde shapes shared by the two

pub mod wire_types;
pub mod error;
pub mod config;
pub mod json_codec;

pub use config::{build_game, load_game, parse_game};
pub use error::ConfigError;
pub use json_codec::{
    decode_command,
    encode_command,
    encode_error,
    encode_output,
    encode_response,
};
