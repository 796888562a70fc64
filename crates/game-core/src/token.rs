//! Authorization tokens.
//!
//! A token is 16 random bytes rendered as 32 lowercase hex characters.
//! The [`TokenStore`] keeps the token <-> player mapping; each player
//! holds at most one live token.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::warn;

use crate::error::TokenError;
use crate::player::PlayerId;

/// Length of a token in characters.
pub const TOKEN_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    /// Validate the syntax of a client-supplied token.
    pub fn parse(s: &str) -> Result<Self, TokenError> {
        if s.len() != TOKEN_LEN {
            return Err(TokenError::WrongLength {
                expected: TOKEN_LEN,
                actual: s.chars().count(),
            });
        }
        if let Some(c) = s.chars().find(|c| !matches!(c, '0'..='9' | 'a'..='f')) {
            return Err(TokenError::InvalidCharacter(c));
        }
        Ok(Token(s.to_string()))
    }

    fn from_halves(hi: u64, lo: u64) -> Self {
        Token(format!("{:016x}{:016x}", hi, lo))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Token {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Token::parse(s)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Issues tokens and resolves them back to players.
#[derive(Debug)]
pub struct TokenStore<R = StdRng> {
    rng: R,
    token_to_player: HashMap<Token, PlayerId>,
    player_to_token: HashMap<PlayerId, Token>,
}

impl Default for TokenStore<StdRng> {
    fn default() -> Self {
        TokenStore::with_rng(StdRng::from_entropy())
    }
}

impl TokenStore<StdRng> {
    pub fn new() -> Self {
        TokenStore::default()
    }

    /// Store with a deterministic generator, for tests and replays.
    pub fn with_seed(seed: u64) -> Self {
        TokenStore::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: RngCore> TokenStore<R> {
    pub fn with_rng(rng: R) -> Self {
        TokenStore {
            rng,
            token_to_player: HashMap::new(),
            player_to_token: HashMap::new(),
        }
    }

    /// Issue a fresh token for `player`.
    ///
    /// A token already live for another player is never handed out
    /// again; generation is retried instead. If `player` already held a
    /// token, that one is revoked.
    pub fn issue(&mut self, player: PlayerId) -> Token {
        let token = loop {
            let candidate = Token::from_halves(self.rng.next_u64(), self.rng.next_u64());
            if !self.token_to_player.contains_key(&candidate) {
                break candidate;
            }
            warn!("token collision, regenerating");
        };

        if let Some(old) = self.player_to_token.insert(player, token.clone()) {
            self.token_to_player.remove(&old);
        }
        self.token_to_player.insert(token.clone(), player);
        token
    }

    pub fn resolve(&self, token: &Token) -> Option<PlayerId> {
        self.token_to_player.get(token).copied()
    }

    pub fn token_for(&self, player: PlayerId) -> Option<&Token> {
        self.player_to_token.get(&player)
    }

    /// Forget `token`. Returns the player it belonged to.
    pub fn revoke(&mut self, token: &Token) -> Option<PlayerId> {
        let player = self.token_to_player.remove(token)?;
        self.player_to_token.remove(&player);
        Some(player)
    }

    pub fn len(&self) -> usize {
        self.token_to_player.len()
    }

    pub fn is_empty(&self) -> bool {
        self.token_to_player.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays a fixed list of words, then repeats the last one.
    struct Scripted {
        words: Vec<u64>,
        pos: usize,
    }

    impl RngCore for Scripted {
        fn next_u32(&mut self) -> u32 {
            self.next_u64() as u32
        }

        fn next_u64(&mut self) -> u64 {
            let w = self.words[self.pos.min(self.words.len() - 1)];
            self.pos += 1;
            w
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for chunk in dest.chunks_mut(8) {
                let bytes = self.next_u64().to_le_bytes();
                chunk.copy_from_slice(&bytes[..chunk.len()]);
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    #[test]
    fn issued_tokens_are_32_lowercase_hex() {
        let mut store = TokenStore::with_seed(11);
        for i in 0..50 {
            let token = store.issue(PlayerId(i));
            assert_eq!(token.as_str().len(), TOKEN_LEN);
            assert_eq!(Token::parse(token.as_str()), Ok(token.clone()));
        }
    }

    #[test]
    fn collision_is_retried() {
        // Player 0 gets (1, 2); the next attempt draws (1, 2) again and
        // must retry until (3, 4).
        let rng = Scripted { words: vec![1, 2, 1, 2, 3, 4], pos: 0 };
        let mut store = TokenStore::with_rng(rng);
        let first = store.issue(PlayerId(0));
        let second = store.issue(PlayerId(1));
        assert_eq!(first.as_str(), "00000000000000010000000000000002");
        assert_eq!(second.as_str(), "00000000000000030000000000000004");
        assert_eq!(store.resolve(&first), Some(PlayerId(0)));
        assert_eq!(store.resolve(&second), Some(PlayerId(1)));
    }

    #[test]
    fn reissue_revokes_previous_token() {
        let mut store = TokenStore::with_seed(5);
        let old = store.issue(PlayerId(7));
        let new = store.issue(PlayerId(7));
        assert_ne!(old, new);
        assert_eq!(store.resolve(&old), None);
        assert_eq!(store.resolve(&new), Some(PlayerId(7)));
        assert_eq!(store.len(), 1);

        assert_eq!(store.revoke(&new), Some(PlayerId(7)));
        assert!(store.is_empty());
        assert_eq!(store.token_for(PlayerId(7)), None);
    }

    #[test]
    fn parse_rejects_bad_syntax() {
        assert_eq!(
            Token::parse("abc"),
            Err(TokenError::WrongLength { expected: 32, actual: 3 })
        );
        assert_eq!(
            Token::parse("0123456789ABCDEF0123456789abcdef"),
            Err(TokenError::InvalidCharacter('A'))
        );
        assert_eq!(
            Token::parse("0123456789abcdeg0123456789abcdef"),
            Err(TokenError::InvalidCharacter('g'))
        );
        assert!(Token::parse("0123456789abcdef0123456789abcdef").is_ok());
    }
}
