use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name used when the player leaves the name field blank.
pub const DEFAULT_PLAYER_NAME: &str = "Player";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlayerRecordError {
    #[error("malformed player record: {0}")]
    Malformed(#[from] serde_json::Error),
}

//
// ─── NAME ──────────────────────────────────────────────────────────────────────
//

/// Trimmed player name; doubles as the persistence key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerName(String);

impl PlayerName {
    /// Normalize raw input; blank input becomes `"Player"`.
    #[must_use]
    pub fn from_input(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self(DEFAULT_PLAYER_NAME.to_owned())
        } else {
            Self(trimmed.to_owned())
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PlayerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

//
// ─── RECORD ────────────────────────────────────────────────────────────────────
//

/// Persisted progress for one player: `{"level":n,"score":m}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub level: u32,
    pub score: u32,
}

#[derive(Deserialize)]
struct StoredRecord {
    #[serde(default)]
    level: Option<u32>,
    #[serde(default)]
    score: Option<u32>,
}

impl PlayerRecord {
    #[must_use]
    pub fn new(level: u32, score: u32) -> Self {
        Self { level, score }
    }

    /// Progress for someone who has never played.
    #[must_use]
    pub fn fresh() -> Self {
        Self { level: 1, score: 0 }
    }

    /// Decode a stored value.
    ///
    /// Missing or zero `level` falls back to 1 and a missing `score` to 0.
    ///
    /// # Errors
    ///
    /// Returns `PlayerRecordError::Malformed` if the value is not a JSON
    /// object with numeric fields.
    pub fn from_json(raw: &str) -> Result<Self, PlayerRecordError> {
        let stored: StoredRecord = serde_json::from_str(raw)?;
        Ok(Self {
            level: stored.level.filter(|level| *level > 0).unwrap_or(1),
            score: stored.score.unwrap_or(0),
        })
    }

    /// Encode for the key-value store.
    ///
    /// # Errors
    ///
    /// Returns `PlayerRecordError::Malformed` if serialization fails.
    pub fn to_json(&self) -> Result<String, PlayerRecordError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Default for PlayerRecord {
    fn default() -> Self {
        Self::fresh()
    }
}
