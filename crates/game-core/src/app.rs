//! Application facade: the command protocol.
//!
//! `Application` owns the [`Game`], the [`PlayerRegistry`] and the
//! [`TokenStore`] and is the only thing the transport talks to.
//!
//! It holds no locks. Callers must run every command one at a time
//! (the server does so from a single task), which makes each command
//! atomic with respect to every other, ticks included.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::direction::Move;
use crate::error::{AppError, TokenError};
use crate::game::Game;
use crate::map::{Map, MapId};
use crate::messages::{
    Command, CommandOutput, DogState, JoinRequest, JoinResult, MapSummary, PlayerEntry,
};
use crate::player::{Player, PlayerRegistry};
use crate::token::{Token, TokenStore};

#[derive(Debug)]
pub struct Application {
    game: Game,
    players: PlayerRegistry,
    tokens: TokenStore,

    /// Whether clients may drive the clock with `Tick` commands.
    /// Off when the server runs its own ticker.
    manual_tick: bool,
}

impl Application {
    pub fn new(game: Game) -> Self {
        Application::with_tokens(game, TokenStore::new())
    }

    pub fn with_tokens(game: Game, tokens: TokenStore) -> Self {
        Application {
            game,
            players: PlayerRegistry::new(),
            tokens,
            manual_tick: true,
        }
    }

    pub fn set_manual_tick(&mut self, enabled: bool) {
        self.manual_tick = enabled;
    }

    pub fn manual_tick(&self) -> bool {
        self.manual_tick
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn players(&self) -> &PlayerRegistry {
        &self.players
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Run a single command.
    pub fn process(&mut self, command: Command) -> Result<CommandOutput, AppError> {
        match command {
            Command::ListMaps => Ok(CommandOutput::Maps(self.list_maps())),
            Command::GetMap { map_id } => self.get_map(&map_id).map(CommandOutput::Map),
            Command::Join(JoinRequest { user_name, map_id }) => {
                self.join(&user_name, &map_id).map(CommandOutput::Joined)
            }
            Command::Move { token, direction } => self
                .move_player(token.as_deref(), &direction)
                .map(|()| CommandOutput::Done),
            Command::Tick { time_delta_ms } => {
                self.tick(time_delta_ms).map(|()| CommandOutput::Done)
            }
            Command::ListPlayers { token } => {
                self.list_players(token.as_deref()).map(CommandOutput::Players)
            }
            Command::GetState { token } => {
                self.get_state(token.as_deref()).map(CommandOutput::State)
            }
            Command::CheckToken { token } => {
                self.check_token(token.as_deref()).map(|()| CommandOutput::Done)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Maps
    // -------------------------------------------------------------------------

    pub fn list_maps(&self) -> Vec<MapSummary> {
        self.game
            .maps()
            .iter()
            .map(|m| MapSummary {
                id: m.id().clone(),
                name: m.name().to_string(),
            })
            .collect()
    }

    pub fn get_map(&self, map_id: &str) -> Result<Arc<Map>, AppError> {
        let id = MapId::new(map_id);
        self.game
            .find_map(&id)
            .cloned()
            .ok_or(AppError::MapNotFound(id))
    }

    // -------------------------------------------------------------------------
    // Players
    // -------------------------------------------------------------------------

    /// Create a dog named `user_name` on `map_id`, register its player
    /// and issue a token.
    pub fn join(&mut self, user_name: &str, map_id: &str) -> Result<JoinResult, AppError> {
        if user_name.is_empty() {
            return Err(AppError::InvalidName);
        }
        let map_id = MapId::new(map_id);
        if self.game.find_map(&map_id).is_none() {
            return Err(AppError::MapNotFound(map_id));
        }

        let dog = self.game.add_dog(&map_id, user_name)?;
        let dog_id = dog.id();
        let player_id = match self.players.add(dog, &map_id) {
            Ok(player) => player.id(),
            Err(err) => {
                // The dog must not outlive a failed join.
                self.game.remove_dog(&map_id, dog_id);
                return Err(err.into());
            }
        };
        let token = self.tokens.issue(player_id);

        info!(player = %player_id, map = %map_id, name = user_name, "player joined");
        Ok(JoinResult { token, player_id })
    }

    pub fn move_player(&mut self, token: Option<&str>, direction: &str) -> Result<(), AppError> {
        let player = self.authorize(token)?;
        let dog_id = player.dog_id();
        let map_id = player.map_id().clone();

        let mv = Move::parse(direction)
            .ok_or_else(|| AppError::invalid_argument("Failed to parse action"))?;

        let session = self
            .game
            .find_session(&map_id)
            .ok_or_else(|| AppError::Internal(format!("no session for map {}", map_id)))?;
        let speed = self.game.dog_speed(session.map());

        let dog = self
            .game
            .find_session_mut(&map_id)
            .and_then(|s| s.dog_mut(dog_id))
            .ok_or_else(|| AppError::Internal(format!("dog {} is missing", dog_id)))?;
        dog.set_move(mv, speed);

        debug!(dog = %dog_id, direction, "dog moved");
        Ok(())
    }

    pub fn list_players(&self, token: Option<&str>) -> Result<Vec<PlayerEntry>, AppError> {
        let player = self.authorize(token)?;
        let session = self.game.find_session(player.map_id());
        Ok(session
            .map(|s| s.dogs().iter().map(PlayerEntry::from).collect::<Vec<_>>())
            .unwrap_or_default())
    }

    pub fn get_state(&self, token: Option<&str>) -> Result<Vec<DogState>, AppError> {
        let player = self.authorize(token)?;
        let session = self.game.find_session(player.map_id());
        Ok(session
            .map(|s| s.dogs().iter().map(DogState::from).collect::<Vec<_>>())
            .unwrap_or_default())
    }

    pub fn check_token(&self, token: Option<&str>) -> Result<(), AppError> {
        self.authorize(token).map(|_| ())
    }

    // -------------------------------------------------------------------------
    // Time
    // -------------------------------------------------------------------------

    /// Client-driven tick. Only available when no automatic ticker runs.
    pub fn tick(&mut self, time_delta_ms: u64) -> Result<(), AppError> {
        if !self.manual_tick {
            return Err(AppError::bad_request("Invalid endpoint"));
        }
        if time_delta_ms == 0 {
            return Err(AppError::invalid_argument(
                "Failed to parse tick request JSON",
            ));
        }
        self.advance(Duration::from_millis(time_delta_ms))
    }

    /// Advance the game clock by `dt`. Used by both the manual `Tick`
    /// command and the server's ticker.
    pub fn advance(&mut self, dt: Duration) -> Result<(), AppError> {
        self.game.tick(dt)?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    /// Syntax check, then lookup. A missing or malformed token is
    /// `InvalidToken`; a well-formed one nobody holds is `UnknownToken`.
    fn authorize(&self, token: Option<&str>) -> Result<&Player, AppError> {
        let raw = token.ok_or(AppError::InvalidToken(TokenError::Missing))?;
        let token = Token::parse(raw)?;
        self.tokens
            .resolve(&token)
            .and_then(|id| self.players.find_by_id(id))
            .ok_or(AppError::UnknownToken)
    }
}
