use crate::config::ConfigError;
use rand::Rng;
use rendezvous_core::RoomId;

/// Draws fixed-length room ids from a restricted alphabet.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    alphabet: Vec<char>,
    length: usize,
}

impl IdGenerator {
    pub fn new(alphabet: &str, length: usize) -> Result<Self, ConfigError> {
        if alphabet.is_empty() {
            return Err(ConfigError::EmptyAlphabet);
        }
        if length == 0 {
            return Err(ConfigError::ZeroIdLength);
        }

        Ok(Self {
            alphabet: alphabet.chars().collect(),
            length,
        })
    }

    pub fn generate(&self) -> RoomId {
        let mut rng = rand::thread_rng();
        let id: String = (0..self.length)
            .map(|_| self.alphabet[rng.gen_range(0..self.alphabet.len())])
            .collect();
        RoomId::from(id)
    }

    /// Number of distinct ids this generator can produce, if it fits in a `usize`.
    pub fn capacity(&self) -> Option<usize> {
        let exponent = u32::try_from(self.length).ok()?;
        self.alphabet.len().checked_pow(exponent)
    }
}
