//! JSON shapes shared by the config file and the map commands.
//!
//! Roads are written the way the config file has them: `x0`, `y0` and
//! exactly one of `x1` (horizontal) or `y1` (vertical).

use game_core::{Building, Map, Office, Orientation, Road};
use serde::{Deserialize, Serialize};

/// Top-level config document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfigJson {
    #[serde(default)]
    pub default_dog_speed: Option<f64>,

    pub maps: Vec<MapJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapJson {
    pub id: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dog_speed: Option<f64>,

    #[serde(default)]
    pub roads: Vec<RoadJson>,

    #[serde(default)]
    pub buildings: Vec<BuildingJson>,

    #[serde(default)]
    pub offices: Vec<OfficeJson>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadJson {
    pub x0: i32,
    pub y0: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x1: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y1: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingJson {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeJson {
    pub id: String,
    pub x: i32,
    pub y: i32,
    pub offset_x: i32,
    pub offset_y: i32,
}

/// `{id, name}` entry of the map list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapSummaryJson {
    pub id: String,
    pub name: String,
}

impl From<&Road> for RoadJson {
    fn from(road: &Road) -> Self {
        let start = road.start();
        let end = road.end();
        match road.orientation() {
            Orientation::Horizontal => RoadJson { x0: start.x, y0: start.y, x1: Some(end.x), y1: None },
            Orientation::Vertical => RoadJson { x0: start.x, y0: start.y, x1: None, y1: Some(end.y) },
        }
    }
}

impl From<&Building> for BuildingJson {
    fn from(building: &Building) -> Self {
        let r = building.bounds();
        BuildingJson {
            x: r.position.x,
            y: r.position.y,
            w: r.size.width,
            h: r.size.height,
        }
    }
}

impl From<&Office> for OfficeJson {
    fn from(office: &Office) -> Self {
        OfficeJson {
            id: office.id().0.clone(),
            x: office.position().x,
            y: office.position().y,
            offset_x: office.offset().dx,
            offset_y: office.offset().dy,
        }
    }
}

impl From<&Map> for MapJson {
    fn from(map: &Map) -> Self {
        MapJson {
            id: map.id().as_str().to_string(),
            name: map.name().to_string(),
            dog_speed: map.dog_speed(),
            roads: map.roads().iter().map(RoadJson::from).collect(),
            buildings: map.buildings().iter().map(BuildingJson::from).collect(),
            offices: map.offices().iter().map(OfficeJson::from).collect(),
        }
    }
}
