//! Dogs: the mobile entities players control.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::trace;

use crate::direction::{Direction, Move};
use crate::geom::{Position, Velocity};
use crate::map::{reachable_bounds, Road};

/// Process-wide unique dog identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DogId(pub u64);

impl fmt::Display for DogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out monotonically increasing dog ids.
///
/// Clones share one counter, so every session created from the same
/// `Game` draws from the same sequence and ids are never reused.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    next: Arc<AtomicU64>,
}

impl IdGenerator {
    pub fn new() -> Self {
        IdGenerator::default()
    }

    pub fn next_id(&self) -> DogId {
        DogId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dog {
    id: DogId,
    name: String,
    position: Position,
    velocity: Velocity,
    direction: Direction,
}

impl Dog {
    pub fn new(id: DogId, name: impl Into<String>, position: Position) -> Self {
        Dog {
            id,
            name: name.into(),
            position,
            velocity: Velocity::ZERO,
            direction: Direction::default(),
        }
    }

    pub fn id(&self) -> DogId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_standing(&self) -> bool {
        self.velocity.is_zero()
    }

    /// Apply a move command. `Stand` stops the dog and keeps its facing.
    pub fn set_move(&mut self, mv: Move, speed: f64) {
        self.velocity = mv.velocity(speed);
        if let Some(direction) = mv.direction() {
            self.direction = direction;
        }
    }

    /// Zero the velocity. Facing is kept.
    pub fn stop(&mut self) {
        self.velocity = Velocity::ZERO;
    }

    /// Advance the dog by `dt` along its velocity, clamped to the roads
    /// reachable from its current position.
    ///
    /// Each axis is clamped independently; an axis that hits the edge
    /// loses its velocity component, so the dog stops at the boundary
    /// instead of sliding along it.
    pub fn advance(&mut self, dt: Duration, roads: &[Road]) {
        if self.is_standing() {
            return;
        }

        let secs = dt.as_secs_f64();
        let target = Position::new(
            self.position.x + self.velocity.x * secs,
            self.position.y + self.velocity.y * secs,
        );

        let Some(bounds) = reachable_bounds(roads, self.position) else {
            // Off-road dogs cannot move anywhere.
            trace!(dog = %self.id, "dog is off-road, stopping");
            self.stop();
            return;
        };

        let x = target.x.clamp(bounds.min_x, bounds.max_x);
        if x != target.x {
            self.velocity.x = 0.0;
        }
        let y = target.y.clamp(bounds.min_y, bounds.max_y);
        if y != target.y {
            self.velocity.y = 0.0;
        }

        self.position = Position::new(x, y);
    }
}
