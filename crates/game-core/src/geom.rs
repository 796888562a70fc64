//! Geometry primitives.
//!
//! Map geometry comes from the config file and is integral (grid
//! coordinates). Dog positions and velocities are continuous.

/// Integral map coordinate.
pub type Coord = i32;

/// Integral map dimension (width, height, offsets).
pub type Dimension = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: Coord,
    pub y: Coord,
}

impl Point {
    pub fn new(x: Coord, y: Coord) -> Self {
        Point { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: Dimension,
    pub height: Dimension,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rectangle {
    pub position: Point,
    pub size: Size,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Offset {
    pub dx: Dimension,
    pub dy: Dimension,
}

/// Continuous position on a map.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }
}

impl From<Point> for Position {
    fn from(p: Point) -> Self {
        Position {
            x: f64::from(p.x),
            y: f64::from(p.y),
        }
    }
}

/// Velocity in map units per second.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

impl Velocity {
    pub const ZERO: Velocity = Velocity { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Velocity { x, y }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// Tolerance used for containment tests, so a dog parked exactly on a
/// clamped edge still counts as being on that road.
const EPSILON: f64 = 1e-9;

/// Axis-aligned bounds with inclusive edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn contains(&self, p: Position) -> bool {
        p.x >= self.min_x - EPSILON
            && p.x <= self.max_x + EPSILON
            && p.y >= self.min_y - EPSILON
            && p.y <= self.max_y + EPSILON
    }

    /// Smallest bounds covering both `self` and `other`.
    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
        }
    }
}
