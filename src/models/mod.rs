use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Unique key of a player record.
///
/// Twelve bytes laid out like a document-store object id: big-endian Unix
/// seconds, a per-process random value, then a big-endian counter. On the
/// wire it is always 24 lowercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId([u8; 12]);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a valid player id (expected 24 hex characters)")]
pub struct InvalidPlayerId(pub String);

impl PlayerId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
        static COUNTER: OnceLock<AtomicU32> = OnceLock::new();

        let seconds = chrono::Utc::now().timestamp() as u32;
        let unique = PROCESS_UNIQUE.get_or_init(|| rand::random::<[u8; 5]>());
        let count = COUNTER
            .get_or_init(|| AtomicU32::new(rand::random::<u32>() & 0x00ff_ffff))
            .fetch_add(1, Ordering::Relaxed);

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(unique);
        // Only the low 24 bits of the counter are kept.
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(bytes)
    }

    pub fn parse(value: &str) -> Result<Self, InvalidPlayerId> {
        let invalid = || InvalidPlayerId(value.to_string());

        if value.len() != 24 || !value.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let mut bytes = [0u8; 12];
        for (slot, pair) in bytes.iter_mut().zip(value.as_bytes().chunks(2)) {
            let pair = std::str::from_utf8(pair).map_err(|_| invalid())?;
            *slot = u8::from_str_radix(pair, 16).map_err(|_| invalid())?;
        }
        Ok(Self(bytes))
    }

    /// Seconds since the Unix epoch at which the id was generated.
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for PlayerId {
    type Err = InvalidPlayerId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for PlayerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PlayerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A persisted player record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub region: String,
    pub position: String,
}

/// Request body for create and update.
///
/// Absent fields deserialize to empty strings so that they are reported by
/// [`PlayerPayload::validate`] rather than as a parse failure. Any `id` in the
/// body is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub position: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing required field(s): {}", .missing.join(", "))]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
}

impl PlayerPayload {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing: Vec<&'static str> = [
            ("name", &self.name),
            ("region", &self.region),
            ("position", &self.position),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }

    pub fn into_player(self, id: PlayerId) -> Player {
        Player {
            id,
            name: self.name,
            region: self.region,
            position: self.position,
        }
    }
}

/// Row from the players table
#[derive(Debug, sqlx::FromRow)]
pub struct PlayerRow {
    pub id: String,
    pub name: String,
    pub region: String,
    pub position: String,
}

impl PlayerRow {
    pub fn into_player(self) -> Result<Player, InvalidPlayerId> {
        Ok(Player {
            id: PlayerId::parse(&self.id)?,
            name: self.name,
            region: self.region,
            position: self.position,
        })
    }
}
