use std::sync::Arc;

use services::{GameLoopService, LeaderboardService};

use crate::cues::QueuedCues;

pub trait UiApp: Send + Sync {
    fn game_loop(&self) -> Arc<GameLoopService>;
    fn leaderboard(&self) -> Arc<LeaderboardService>;

    /// Cues queued by the game loop, drained and played by the game view.
    fn cues(&self) -> QueuedCues;
}

#[derive(Clone)]
pub struct AppContext {
    game_loop: Arc<GameLoopService>,
    leaderboard: Arc<LeaderboardService>,
    cues: QueuedCues,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            game_loop: app.game_loop(),
            leaderboard: app.leaderboard(),
            cues: app.cues(),
        }
    }

    #[must_use]
    pub fn game_loop(&self) -> Arc<GameLoopService> {
        Arc::clone(&self.game_loop)
    }

    #[must_use]
    pub fn leaderboard(&self) -> Arc<LeaderboardService> {
        Arc::clone(&self.leaderboard)
    }

    #[must_use]
    pub fn cues(&self) -> QueuedCues {
        self.cues.clone()
    }
}

// Provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
