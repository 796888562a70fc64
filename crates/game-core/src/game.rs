//! Top-level game state.
//!
//! The `Game`:
//! - Owns the loaded maps (shared read-only with sessions).
//! - Creates one [`GameSession`] per map on demand, keyed by map id.
//! - Owns the dog id generator and the spawn RNG.
//! - Is the only clock: [`Game::tick`] advances every session.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, trace};

use crate::dog::{Dog, DogId, IdGenerator};
use crate::error::GameError;
use crate::map::{Map, MapId};
use crate::session::{GameSession, SpawnPolicy};

/// Speed used when neither the config nor the map specifies one.
pub const DEFAULT_DOG_SPEED: f64 = 1.0;

#[derive(Debug)]
pub struct Game {
    /// Maps in config order.
    maps: Vec<Arc<Map>>,

    /// MapId -> index into `maps`.
    map_index: HashMap<MapId, usize>,

    sessions: HashMap<MapId, GameSession>,

    default_dog_speed: f64,
    randomize_spawn_points: bool,

    ids: IdGenerator,
    rng: StdRng,
}

impl Default for Game {
    fn default() -> Self {
        Game::with_rng(StdRng::from_entropy())
    }
}

impl Game {
    pub fn new() -> Self {
        Game::default()
    }

    /// Game with a deterministic spawn RNG.
    pub fn with_seed(seed: u64) -> Self {
        Game::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Game {
            maps: Vec::new(),
            map_index: HashMap::new(),
            sessions: HashMap::new(),
            default_dog_speed: DEFAULT_DOG_SPEED,
            randomize_spawn_points: false,
            ids: IdGenerator::new(),
            rng,
        }
    }

    // -------------------------------------------------------------------------
    // Maps
    // -------------------------------------------------------------------------

    pub fn add_map(&mut self, map: Map) -> Result<(), GameError> {
        if self.map_index.contains_key(map.id()) {
            return Err(GameError::DuplicateMap(map.id().clone()));
        }
        self.map_index.insert(map.id().clone(), self.maps.len());
        self.maps.push(Arc::new(map));
        Ok(())
    }

    pub fn maps(&self) -> &[Arc<Map>] {
        &self.maps
    }

    pub fn find_map(&self, id: &MapId) -> Option<&Arc<Map>> {
        self.map_index.get(id).map(|&i| &self.maps[i])
    }

    // -------------------------------------------------------------------------
    // Settings
    // -------------------------------------------------------------------------

    pub fn default_dog_speed(&self) -> f64 {
        self.default_dog_speed
    }

    pub fn set_default_dog_speed(&mut self, speed: f64) {
        self.default_dog_speed = speed;
    }

    /// Effective speed on `map`: its own override, else the game default.
    pub fn dog_speed(&self, map: &Map) -> f64 {
        map.dog_speed().unwrap_or(self.default_dog_speed)
    }

    pub fn randomize_spawn_points(&self) -> bool {
        self.randomize_spawn_points
    }

    pub fn set_randomize_spawn_points(&mut self, enabled: bool) {
        self.randomize_spawn_points = enabled;
    }

    fn spawn_policy(&self) -> SpawnPolicy {
        if self.randomize_spawn_points {
            SpawnPolicy::Random
        } else {
            SpawnPolicy::Origin
        }
    }

    // -------------------------------------------------------------------------
    // Sessions
    // -------------------------------------------------------------------------

    pub fn find_session(&self, id: &MapId) -> Option<&GameSession> {
        self.sessions.get(id)
    }

    pub fn find_session_mut(&mut self, id: &MapId) -> Option<&mut GameSession> {
        self.sessions.get_mut(id)
    }

    pub fn sessions(&self) -> impl Iterator<Item = &GameSession> {
        self.sessions.values()
    }

    /// Start a session for a loaded map. At most one session per map.
    pub fn add_session(&mut self, id: &MapId) -> Result<&mut GameSession, GameError> {
        if self.sessions.contains_key(id) {
            return Err(GameError::SessionExists(id.clone()));
        }
        let map = self
            .find_map(id)
            .cloned()
            .ok_or_else(|| GameError::UnknownMap(id.clone()))?;

        info!(map = %id, "starting game session");
        let session = GameSession::new(map, self.ids.clone());
        Ok(self.sessions.entry(id.clone()).or_insert(session))
    }

    /// Create a dog on `map_id`, starting the map's session if needed.
    pub fn add_dog(&mut self, map_id: &MapId, name: &str) -> Result<&Dog, GameError> {
        if !self.sessions.contains_key(map_id) {
            self.add_session(map_id)?;
        }
        let spawn = self.spawn_policy();
        let session = self
            .sessions
            .get_mut(map_id)
            .ok_or_else(|| GameError::UnknownMap(map_id.clone()))?;
        Ok(session.add_dog(name, spawn, &mut self.rng))
    }

    /// Undo an [`add_dog`](Self::add_dog). The session itself stays.
    pub fn remove_dog(&mut self, map_id: &MapId, id: DogId) -> Option<Dog> {
        self.sessions.get_mut(map_id)?.remove_dog(id)
    }

    /// Advance every session by `dt`.
    pub fn tick(&mut self, dt: Duration) -> Result<(), GameError> {
        if dt.is_zero() {
            return Err(GameError::ZeroTick);
        }
        trace!(dt_ms = dt.as_millis() as u64, sessions = self.sessions.len(), "tick");
        for session in self.sessions.values_mut() {
            session.advance(dt);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;
    use crate::map::Road;

    fn game_with(ids: &[&str]) -> Game {
        let mut game = Game::with_seed(3);
        for id in ids {
            let mut map = Map::new(MapId::new(*id), id.to_uppercase());
            map.add_road(Road::horizontal(Point::new(0, 0), 10));
            game.add_map(map).expect("unique map");
        }
        game
    }

    #[test]
    fn duplicate_map_is_rejected() {
        let mut game = game_with(&["a"]);
        let dup = Map::new(MapId::new("a"), "again");
        assert_eq!(game.add_map(dup), Err(GameError::DuplicateMap(MapId::new("a"))));
        assert_eq!(game.maps().len(), 1);
    }

    #[test]
    fn one_session_per_map() {
        let mut game = game_with(&["a"]);
        let id = MapId::new("a");
        game.add_session(&id).expect("first session");
        assert!(matches!(game.add_session(&id), Err(GameError::SessionExists(_))));
        assert!(matches!(
            game.add_session(&MapId::new("nope")),
            Err(GameError::UnknownMap(_))
        ));
    }

    #[test]
    fn dog_ids_are_unique_across_sessions() {
        let mut game = game_with(&["a", "b"]);
        let a = game.add_dog(&MapId::new("a"), "x").expect("a").id();
        let b = game.add_dog(&MapId::new("b"), "x").expect("b").id();
        let c = game.add_dog(&MapId::new("a"), "x").expect("a").id();
        assert!(a < b && b < c);
        assert_eq!(game.find_session(&MapId::new("a")).map(GameSession::len), Some(2));
    }

    #[test]
    fn spawn_toggle_picks_origin_or_random_road_point() {
        let mut game = Game::with_seed(9);
        let mut map = Map::new(MapId::new("yard"), "Yard");
        map.add_road(Road::horizontal(Point::new(5, 5), 25));
        map.add_road(Road::vertical(Point::new(25, 5), 20));
        game.add_map(map).expect("unique map");

        let id = MapId::new("yard");
        let yard = game.find_map(&id).cloned().expect("loaded");
        let origin = yard.spawn_origin();
        assert_eq!((origin.x, origin.y), (5.0, 5.0));

        assert!(!game.randomize_spawn_points());
        for _ in 0..5 {
            assert_eq!(game.add_dog(&id, "fixed").expect("spawn").position(), origin);
        }

        game.set_randomize_spawn_points(true);
        let spawned: Vec<_> = (0..20)
            .map(|_| game.add_dog(&id, "roamer").expect("spawn").position())
            .collect();
        assert!(spawned.iter().all(|p| yard.reachable_bounds(*p).is_some()));
        assert!(spawned.iter().any(|p| *p != origin));
    }

    #[test]
    fn zero_tick_is_rejected() {
        let mut game = game_with(&["a"]);
        assert_eq!(game.tick(Duration::ZERO), Err(GameError::ZeroTick));
    }

    #[test]
    fn map_speed_overrides_default() {
        let mut game = game_with(&[]);
        game.set_default_dog_speed(2.5);
        let mut fast = Map::new(MapId::new("fast"), "Fast");
        fast.set_dog_speed(7.0);
        let slow = Map::new(MapId::new("slow"), "Slow");
        assert_eq!(game.dog_speed(&fast), 7.0);
        assert_eq!(game.dog_speed(&slow), 2.5);
    }
}
