//! Players and the player registry.
//!
//! A [`Player`] binds one dog to the session it lives in. It refers to
//! both by id only; the dog itself stays owned by its
//! [`GameSession`](crate::session::GameSession).

use std::collections::HashMap;
use std::fmt;

use tracing::error;

use crate::dog::{Dog, DogId};
use crate::error::RegistryError;
use crate::map::MapId;

/// Player id. Always equal to the id of the player's dog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u64);

impl From<DogId> for PlayerId {
    fn from(id: DogId) -> Self {
        PlayerId(id.0)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    id: PlayerId,
    dog_id: DogId,
    map_id: MapId,
    name: String,
}

impl Player {
    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn dog_id(&self) -> DogId {
        self.dog_id
    }

    /// Id of the map whose session holds this player's dog.
    pub fn map_id(&self) -> &MapId {
        &self.map_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Owns every player, indexed by id.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    players: Vec<Player>,

    /// PlayerId -> index into `players`.
    index: HashMap<PlayerId, usize>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        PlayerRegistry::default()
    }

    /// Register a player for `dog` living in the session of `map_id`.
    ///
    /// An id collision means the dog id generator handed out a duplicate.
    /// The registry is left untouched and the error is logged.
    pub fn add(&mut self, dog: &Dog, map_id: &MapId) -> Result<&Player, RegistryError> {
        let id = PlayerId::from(dog.id());
        if self.index.contains_key(&id) {
            error!(player = %id, "player id collision, dog id generator is broken");
            return Err(RegistryError::IdCollision(dog.id()));
        }

        let slot = self.players.len();
        self.players.push(Player {
            id,
            dog_id: dog.id(),
            map_id: map_id.clone(),
            name: dog.name().to_string(),
        });
        self.index.insert(id, slot);
        Ok(&self.players[slot])
    }

    pub fn find_by_id(&self, id: PlayerId) -> Option<&Player> {
        self.index.get(&id).map(|&i| &self.players[i])
    }

    /// Like [`find_by_id`](Self::find_by_id) but only if the player is
    /// on `map_id`.
    pub fn find_by_id_and_map(&self, id: PlayerId, map_id: &MapId) -> Option<&Player> {
        self.find_by_id(id).filter(|p| p.map_id() == map_id)
    }

    /// Id of the first player registered under `name`.
    pub fn find_by_name(&self, name: &str) -> Option<PlayerId> {
        self.players.iter().find(|p| p.name == name).map(Player::id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
