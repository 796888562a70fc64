//! Static map model: roads, buildings and offices.
//!
//! A [`Map`] is assembled once (by the config loader) and then shared
//! read-only between the [`Game`](crate::game::Game) and its sessions.
//!
//! Roads double as the walkable area: each road segment widened by
//! [`ROAD_HALF_WIDTH`] on the perpendicular axis forms a rectangle dogs
//! are clamped to.

use std::collections::HashSet;
use std::fmt;

use rand::Rng;

use crate::error::MapError;
use crate::geom::{Bounds, Coord, Offset, Point, Position, Rectangle};

/// Half of a road's width, measured from its center line.
pub const ROAD_HALF_WIDTH: f64 = 0.4;

/// Globally unique map identifier, as given in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MapId(pub String);

impl MapId {
    pub fn new(id: impl Into<String>) -> Self {
        MapId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OfficeId(pub String);

impl fmt::Display for OfficeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// An axis-aligned road segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Road {
    orientation: Orientation,
    start: Point,
    end: Point,
}

impl Road {
    /// Road from `start` to `(end_x, start.y)`.
    pub fn horizontal(start: Point, end_x: Coord) -> Self {
        Road {
            orientation: Orientation::Horizontal,
            start,
            end: Point::new(end_x, start.y),
        }
    }

    /// Road from `start` to `(start.x, end_y)`.
    pub fn vertical(start: Point, end_y: Coord) -> Self {
        Road {
            orientation: Orientation::Vertical,
            start,
            end: Point::new(start.x, end_y),
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_horizontal(&self) -> bool {
        self.orientation == Orientation::Horizontal
    }

    pub fn is_vertical(&self) -> bool {
        self.orientation == Orientation::Vertical
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    /// The walkable rectangle: the segment extended by [`ROAD_HALF_WIDTH`]
    /// on every side.
    pub fn bounds(&self) -> Bounds {
        let (x0, x1) = min_max(self.start.x, self.end.x);
        let (y0, y1) = min_max(self.start.y, self.end.y);
        let w = ROAD_HALF_WIDTH;
        Bounds {
            min_x: f64::from(x0) - w,
            max_x: f64::from(x1) + w,
            min_y: f64::from(y0) - w,
            max_y: f64::from(y1) + w,
        }
    }

    /// Point on the center line, `t = 0` at `start` and `t = 1` at `end`.
    pub fn point_at(&self, t: f64) -> Position {
        let start = Position::from(self.start);
        let end = Position::from(self.end);
        Position::new(
            start.x + (end.x - start.x) * t,
            start.y + (end.y - start.y) * t,
        )
    }
}

fn min_max(a: Coord, b: Coord) -> (Coord, Coord) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Union of the bounds of every road whose walkable rectangle contains
/// `pos`. `None` when the position is off-road.
pub fn reachable_bounds(roads: &[Road], pos: Position) -> Option<Bounds> {
    roads
        .iter()
        .map(Road::bounds)
        .filter(|b| b.contains(pos))
        .reduce(Bounds::union)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    bounds: Rectangle,
}

impl Building {
    pub fn new(bounds: Rectangle) -> Self {
        Building { bounds }
    }

    pub fn bounds(&self) -> &Rectangle {
        &self.bounds
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Office {
    id: OfficeId,
    position: Point,
    offset: Offset,
}

impl Office {
    pub fn new(id: OfficeId, position: Point, offset: Offset) -> Self {
        Office {
            id,
            position,
            offset,
        }
    }

    pub fn id(&self) -> &OfficeId {
        &self.id
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }
}

/// A playable map.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    id: MapId,
    name: String,

    /// Per-map speed override; `None` falls back to the game default.
    dog_speed: Option<f64>,

    roads: Vec<Road>,
    buildings: Vec<Building>,
    offices: Vec<Office>,
    office_ids: HashSet<OfficeId>,
}

impl Map {
    pub fn new(id: MapId, name: impl Into<String>) -> Self {
        Map {
            id,
            name: name.into(),
            dog_speed: None,
            roads: Vec::new(),
            buildings: Vec::new(),
            offices: Vec::new(),
            office_ids: HashSet::new(),
        }
    }

    pub fn id(&self) -> &MapId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dog_speed(&self) -> Option<f64> {
        self.dog_speed
    }

    pub fn set_dog_speed(&mut self, speed: f64) {
        self.dog_speed = Some(speed);
    }

    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn offices(&self) -> &[Office] {
        &self.offices
    }

    pub fn add_road(&mut self, road: Road) {
        self.roads.push(road);
    }

    pub fn add_building(&mut self, building: Building) {
        self.buildings.push(building);
    }

    /// Office ids are unique within a map.
    pub fn add_office(&mut self, office: Office) -> Result<(), MapError> {
        if !self.office_ids.insert(office.id.clone()) {
            return Err(MapError::DuplicateOffice(office.id));
        }
        self.offices.push(office);
        Ok(())
    }

    /// Fixed spawn point: the start of the first road, or the origin on
    /// a map without roads.
    pub fn spawn_origin(&self) -> Position {
        self.roads
            .first()
            .map(|r| Position::from(r.start()))
            .unwrap_or_default()
    }

    /// Uniformly chosen point on a uniformly chosen road.
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        if self.roads.is_empty() {
            return Position::default();
        }
        let road = &self.roads[rng.gen_range(0..self.roads.len())];
        road.point_at(rng.gen_range(0.0..=1.0))
    }

    pub fn reachable_bounds(&self, pos: Position) -> Option<Bounds> {
        reachable_bounds(&self.roads, pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cross_map() -> Map {
        let mut map = Map::new(MapId::new("cross"), "Cross");
        map.add_road(Road::horizontal(Point::new(0, 0), 10));
        map.add_road(Road::vertical(Point::new(10, 0), 10));
        map
    }

    #[test]
    fn reversed_road_has_same_bounds() {
        let a = Road::horizontal(Point::new(0, 0), 40).bounds();
        let b = Road::horizontal(Point::new(40, 0), 0).bounds();
        assert_eq!(a, b);
        assert_eq!(a.max_x, 40.4);
        assert_eq!(a.min_y, -0.4);
    }

    #[test]
    fn vertical_road_widens_on_x() {
        let road = Road::vertical(Point::new(3, 10), 2);
        assert_eq!(road.orientation(), Orientation::Vertical);
        assert_eq!(road.end(), Point::new(3, 2));

        let b = road.bounds();
        assert_eq!(b.min_x, 3.0 - ROAD_HALF_WIDTH);
        assert_eq!(b.max_x, 3.0 + ROAD_HALF_WIDTH);
        assert_eq!(b.min_y, 2.0 - ROAD_HALF_WIDTH);
        assert_eq!(b.max_y, 10.0 + ROAD_HALF_WIDTH);
    }

    #[test]
    fn junction_unions_both_roads() {
        let map = cross_map();
        let b = map.reachable_bounds(Position::new(10.0, 0.0)).expect("on road");
        assert_eq!(b.min_x, -0.4);
        assert_eq!(b.max_x, 10.4);
        assert_eq!(b.max_y, 10.4);

        let only_h = map.reachable_bounds(Position::new(2.0, 0.0)).expect("on road");
        assert_eq!(only_h.max_y, 0.4);

        assert!(map.reachable_bounds(Position::new(5.0, 5.0)).is_none());
    }

    #[test]
    fn random_points_stay_on_roads() {
        let map = cross_map();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let p = map.random_point(&mut rng);
            assert!(map.reachable_bounds(p).is_some(), "{:?} off road", p);
        }
    }

    #[test]
    fn duplicate_office_is_rejected() {
        let mut map = cross_map();
        let office = Office::new(OfficeId("o1".into()), Point::new(1, 1), Offset::default());
        map.add_office(office.clone()).expect("first insert");
        assert_eq!(
            map.add_office(office),
            Err(MapError::DuplicateOffice(OfficeId("o1".into())))
        );
        assert_eq!(map.offices().len(), 1);
    }
}
