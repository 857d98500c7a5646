use std::sync::Arc;

use drill_core::model::PlayerRecord;
use storage::repository::{KeyValueStore, StoreEntry};

use crate::error::LeaderboardError;

/// Maximum number of rows shown on the leaderboard.
pub const LEADERBOARD_LIMIT: usize = 50;

/// One ranked leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    /// 1-based position.
    pub rank: usize,
    pub name: String,
    pub score: u32,
    pub last_level: u32,
}

/// Read-only ranking over every stored player record.
#[derive(Clone)]
pub struct LeaderboardService {
    players: Arc<dyn KeyValueStore>,
    limit: usize,
}

impl LeaderboardService {
    #[must_use]
    pub fn new(players: Arc<dyn KeyValueStore>) -> Self {
        Self {
            players,
            limit: LEADERBOARD_LIMIT,
        }
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Recompute the ranking from the store.
    ///
    /// # Errors
    ///
    /// Returns `LeaderboardError::Storage` if entries cannot be enumerated.
    pub async fn top_players(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let entries = self.players.entries().await?;
        Ok(rank_players(entries, self.limit))
    }
}

/// Sort by level reached, then score, both descending, and keep `limit` rows.
///
/// Values that do not decode as a player record are skipped. Exact ties keep
/// store order.
#[must_use]
pub fn rank_players(entries: Vec<StoreEntry>, limit: usize) -> Vec<LeaderboardEntry> {
    let mut players: Vec<(String, PlayerRecord)> = entries
        .into_iter()
        .filter_map(|entry| match PlayerRecord::from_json(&entry.value) {
            Ok(record) => Some((entry.key, record)),
            Err(err) => {
                log::warn!("skipping leaderboard entry {:?}: {err}", entry.key);
                None
            }
        })
        .collect();

    players.sort_by(|(_, a), (_, b)| b.level.cmp(&a.level).then(b.score.cmp(&a.score)));
    players.truncate(limit);

    players
        .into_iter()
        .enumerate()
        .map(|(index, (name, record))| LeaderboardEntry {
            rank: index + 1,
            name,
            score: record.score,
            last_level: record.level,
        })
        .collect()
}
