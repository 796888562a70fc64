//! Per-map game session.
//!
//! A `GameSession` is the live roster of dogs on one map. Sessions are
//! created lazily by the [`Game`](crate::game::Game) on the first join
//! to a map and live for the rest of the process.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::debug;

use crate::dog::{Dog, DogId, IdGenerator};
use crate::map::{Map, MapId};

/// Where new dogs appear on the map.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SpawnPolicy {
    /// Start of the map's first road.
    #[default]
    Origin,
    /// Random point on a random road.
    Random,
}

#[derive(Debug)]
pub struct GameSession {
    map: Arc<Map>,
    ids: IdGenerator,

    /// Dogs in join order.
    dogs: Vec<Dog>,

    /// DogId -> index into `dogs`.
    index: HashMap<DogId, usize>,
}

impl GameSession {
    pub fn new(map: Arc<Map>, ids: IdGenerator) -> Self {
        GameSession {
            map,
            ids,
            dogs: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn map_id(&self) -> &MapId {
        self.map.id()
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    /// Create a dog named `name` at a spawn point chosen by `spawn`.
    pub fn add_dog<R: Rng + ?Sized>(&mut self, name: &str, spawn: SpawnPolicy, rng: &mut R) -> &Dog {
        let position = match spawn {
            SpawnPolicy::Origin => self.map.spawn_origin(),
            SpawnPolicy::Random => self.map.random_point(rng),
        };
        let id = self.ids.next_id();
        debug!(map = %self.map.id(), dog = %id, x = position.x, y = position.y, "spawning dog");

        let slot = self.dogs.len();
        self.dogs.push(Dog::new(id, name, position));
        self.index.insert(id, slot);
        &self.dogs[slot]
    }

    pub fn dog(&self, id: DogId) -> Option<&Dog> {
        self.index.get(&id).map(|&i| &self.dogs[i])
    }

    pub fn dog_mut(&mut self, id: DogId) -> Option<&mut Dog> {
        match self.index.get(&id) {
            Some(&i) => self.dogs.get_mut(i),
            None => None,
        }
    }

    /// Take a dog out of the session. Later dogs keep their join order.
    pub fn remove_dog(&mut self, id: DogId) -> Option<Dog> {
        let slot = self.index.remove(&id)?;
        let dog = self.dogs.remove(slot);
        for (i, d) in self.dogs.iter().enumerate().skip(slot) {
            self.index.insert(d.id(), i);
        }
        Some(dog)
    }

    pub fn dogs(&self) -> &[Dog] {
        &self.dogs
    }

    pub fn len(&self) -> usize {
        self.dogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dogs.is_empty()
    }

    /// Move every dog by `dt`. Dogs do not interact, so order is irrelevant.
    pub fn advance(&mut self, dt: Duration) {
        let roads = self.map.roads();
        for dog in &mut self.dogs {
            dog.advance(dt, roads);
        }
    }
}
