#![forbid(unsafe_code)]

pub mod app_services;
pub mod cues;
pub mod error;
pub mod game;
pub mod leaderboard;
pub mod timers;

pub use drill_core::Clock;

pub use app_services::AppServices;
pub use cues::{Cue, CuePlayer, SilentCues};
pub use error::{AppServicesError, GameError, LeaderboardError};
pub use game::{
    AnswerCheck, AnswerResult, Feedback, FeedbackTone, GameLoopService, GamePhase, GameProgress,
    GameSession,
};
pub use leaderboard::{LEADERBOARD_LIMIT, LeaderboardEntry, LeaderboardService};
pub use timers::{LevelTimer, TimerHandle, TimerSlot, Timers};
