use std::sync::Arc;

use drill_core::model::LevelTable;
use storage::repository::Storage;

use crate::Clock;
use crate::cues::CuePlayer;
use crate::error::AppServicesError;
use crate::game::GameLoopService;
use crate::leaderboard::LeaderboardService;

/// Assembles app-facing services over one player store.
#[derive(Clone)]
pub struct AppServices {
    game_loop: Arc<GameLoopService>,
    leaderboard: Arc<LeaderboardService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        cues: Arc<dyn CuePlayer>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(&storage, clock, cues)
    }

    /// Wire services over an existing `Storage`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Levels` if the built-in level table is invalid.
    pub fn from_storage(
        storage: &Storage,
        clock: Clock,
        cues: Arc<dyn CuePlayer>,
    ) -> Result<Self, AppServicesError> {
        let levels = Arc::new(LevelTable::standard()?);
        let game_loop = Arc::new(
            GameLoopService::new(clock, levels, Arc::clone(&storage.players)).with_cues(cues),
        );
        let leaderboard = Arc::new(LeaderboardService::new(Arc::clone(&storage.players)));
        Ok(Self {
            game_loop,
            leaderboard,
        })
    }

    #[must_use]
    pub fn game_loop(&self) -> Arc<GameLoopService> {
        Arc::clone(&self.game_loop)
    }

    #[must_use]
    pub fn leaderboard(&self) -> Arc<LeaderboardService> {
        Arc::clone(&self.leaderboard)
    }
}
