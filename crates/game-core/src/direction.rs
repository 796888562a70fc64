//! Facing direction and movement requests.

use crate::geom::Velocity;

/// Where a dog is facing.
///
/// A fresh dog faces north. The facing only changes when a move
/// command sets a nonzero velocity; stopping keeps the last heading.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    North,
    South,
    West,
    East,
}

impl Direction {
    /// Short form reported to clients (`"U"`, `"D"`, `"L"`, `"R"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "U",
            Direction::South => "D",
            Direction::West => "L",
            Direction::East => "R",
        }
    }
}

/// A movement request from a client.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Move {
    Left,
    Right,
    Up,
    Down,
    Stand,
}

impl Move {
    /// Parse the wire form: `"L"`, `"R"`, `"U"`, `"D"` or `""` for stand.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "L" => Some(Move::Left),
            "R" => Some(Move::Right),
            "U" => Some(Move::Up),
            "D" => Some(Move::Down),
            "" => Some(Move::Stand),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Move::Left => "L",
            Move::Right => "R",
            Move::Up => "U",
            Move::Down => "D",
            Move::Stand => "",
        }
    }

    /// Velocity for this move at the given speed. The y axis grows
    /// downwards, so `Up` is negative y.
    pub fn velocity(self, speed: f64) -> Velocity {
        match self {
            Move::Left => Velocity::new(-speed, 0.0),
            Move::Right => Velocity::new(speed, 0.0),
            Move::Up => Velocity::new(0.0, -speed),
            Move::Down => Velocity::new(0.0, speed),
            Move::Stand => Velocity::ZERO,
        }
    }

    /// New facing, or `None` when the move keeps the current one.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Move::Left => Some(Direction::West),
            Move::Right => Some(Direction::East),
            Move::Up => Some(Direction::North),
            Move::Down => Some(Direction::South),
            Move::Stand => None,
        }
    }
}
