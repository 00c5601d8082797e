use std::collections::HashSet;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use thiserror::Error;

/// Uppercase letters without the glyphs people confuse when reading a code
/// aloud or off a screen (I, L, O).
pub const DEFAULT_ID_ALPHABET: &str = "ABCDEFGHJKMNPQRSTUVWXYZ";
pub const DEFAULT_ID_LENGTH: usize = 6;
pub const DEFAULT_ROOM_TTL: Duration = Duration::from_secs(60);
pub const DEFAULT_MAX_ID_ATTEMPTS: u32 = 10_000;
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("room id alphabet is empty")]
    EmptyAlphabet,

    #[error("room id alphabet contains '{0}' more than once")]
    DuplicateSymbol(char),

    #[error("room id length must be at least 1")]
    ZeroIdLength,

    #[error("room ttl must be greater than zero")]
    ZeroTtl,

    #[error("room ttl {0:?} is too large")]
    TtlOutOfRange(Duration),

    #[error("room registry must be created inside a tokio runtime")]
    NoRuntime,
}

/// Settings consumed by [`crate::RoomRegistry`].
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// How long a room waits for its pairing before it is dropped.
    pub room_ttl: Duration,
    pub id_alphabet: String,
    pub id_length: usize,
    /// Upper bound on collision retries when drawing a fresh id.
    pub max_id_attempts: u32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            room_ttl: DEFAULT_ROOM_TTL,
            id_alphabet: DEFAULT_ID_ALPHABET.to_owned(),
            id_length: DEFAULT_ID_LENGTH,
            max_id_attempts: DEFAULT_MAX_ID_ATTEMPTS,
        }
    }
}

impl RegistryConfig {
    pub fn with_ttl(mut self, room_ttl: Duration) -> Self {
        self.room_ttl = room_ttl;
        self
    }

    pub fn with_ids(mut self, alphabet: impl Into<String>, length: usize) -> Self {
        self.id_alphabet = alphabet.into();
        self.id_length = length;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id_alphabet.is_empty() {
            return Err(ConfigError::EmptyAlphabet);
        }

        let mut seen = HashSet::new();
        if let Some(symbol) = self.id_alphabet.chars().find(|c| !seen.insert(*c)) {
            return Err(ConfigError::DuplicateSymbol(symbol));
        }

        if self.id_length == 0 {
            return Err(ConfigError::ZeroIdLength);
        }

        if self.room_ttl.is_zero() {
            return Err(ConfigError::ZeroTtl);
        }
        if chrono::TimeDelta::from_std(self.room_ttl).is_err() {
            return Err(ConfigError::TtlOutOfRange(self.room_ttl));
        }

        Ok(())
    }
}

/// Settings for the HTTP/WebSocket front of the relay.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub listen_addr: SocketAddr,
    pub registry: RegistryConfig,
    pub max_body_bytes: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            registry: RegistryConfig::default(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}
