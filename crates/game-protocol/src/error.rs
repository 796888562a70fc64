//! Errors raised while loading the game config.

use std::io;
use std::path::PathBuf;

use game_core::{GameError, MapError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("map {map}: road #{index} needs exactly one of x1 or y1")]
    RoadEnd { map: String, index: usize },

    #[error("map {map}: road #{index} has zero length")]
    ZeroLengthRoad { map: String, index: usize },

    #[error("dog speed must be a finite non-negative number, got {speed} ({context})")]
    InvalidSpeed { context: String, speed: f64 },

    #[error("map {map}: {source}")]
    Map {
        map: String,
        #[source]
        source: MapError,
    },

    #[error(transparent)]
    Game(#[from] GameError),
}
