//! Game config loader.
//!
//! Format:
//!
//! ```json
//! {
//!   "defaultDogSpeed": 3.0,
//!   "maps": [{
//!     "id": "map1", "name": "Map 1", "dogSpeed": 4.0,
//!     "roads": [{"x0": 0, "y0": 0, "x1": 40}, {"x0": 40, "y0": 0, "y1": 30}],
//!     "buildings": [{"x": 5, "y": 5, "w": 30, "h": 20}],
//!     "offices": [{"id": "o0", "x": 40, "y": 30, "offsetX": 5, "offsetY": 0}]
//!   }]
//! }
//! ```
//!
//! `defaultDogSpeed` and `dogSpeed` are optional.

use std::fs;
use std::path::Path;

use game_core::{
    Building, Game, Map, MapId, Office, OfficeId, Offset, Point, Rectangle, Road, Size,
};
use tracing::info;

use crate::error::ConfigError;
use crate::wire_types::{GameConfigJson, MapJson, RoadJson};

/// Read and parse the config file at `path`.
pub fn load_game(path: impl AsRef<Path>) -> Result<Game, ConfigError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let game = parse_game(&text)?;
    info!(path = %path.display(), maps = game.maps().len(), "game config loaded");
    Ok(game)
}

/// Build a [`Game`] from config JSON text.
pub fn parse_game(text: &str) -> Result<Game, ConfigError> {
    let config: GameConfigJson = serde_json::from_str(text)?;
    build_game(config)
}

pub fn build_game(config: GameConfigJson) -> Result<Game, ConfigError> {
    let mut game = Game::new();
    if let Some(speed) = config.default_dog_speed {
        check_speed(speed, "defaultDogSpeed")?;
        game.set_default_dog_speed(speed);
    }
    for map in config.maps {
        game.add_map(build_map(map)?)?;
    }
    Ok(game)
}

fn build_map(json: MapJson) -> Result<Map, ConfigError> {
    let mut map = Map::new(MapId::new(json.id.clone()), json.name);

    if let Some(speed) = json.dog_speed {
        check_speed(speed, &format!("map {}", json.id))?;
        map.set_dog_speed(speed);
    }

    for (index, road) in json.roads.iter().enumerate() {
        map.add_road(build_road(road, &json.id, index)?);
    }

    for b in json.buildings {
        map.add_building(Building::new(Rectangle {
            position: Point::new(b.x, b.y),
            size: Size { width: b.w, height: b.h },
        }));
    }

    for o in json.offices {
        let office = Office::new(
            OfficeId(o.id),
            Point::new(o.x, o.y),
            Offset { dx: o.offset_x, dy: o.offset_y },
        );
        map.add_office(office).map_err(|source| ConfigError::Map {
            map: json.id.clone(),
            source,
        })?;
    }

    Ok(map)
}

fn build_road(json: &RoadJson, map: &str, index: usize) -> Result<Road, ConfigError> {
    let start = Point::new(json.x0, json.y0);
    let (road, end) = match (json.x1, json.y1) {
        (Some(x1), None) => (Road::horizontal(start, x1), x1 == json.x0),
        (None, Some(y1)) => (Road::vertical(start, y1), y1 == json.y0),
        _ => {
            return Err(ConfigError::RoadEnd {
                map: map.to_string(),
                index,
            })
        }
    };
    if end {
        return Err(ConfigError::ZeroLengthRoad {
            map: map.to_string(),
            index,
        });
    }
    Ok(road)
}

fn check_speed(speed: f64, context: &str) -> Result<(), ConfigError> {
    if speed.is_finite() && speed >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidSpeed {
            context: context.to_string(),
            speed,
        })
    }
}
