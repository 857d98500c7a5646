mod progress;
mod session;
mod workflow;

// Public API of the game subsystem.
pub use crate::error::GameError;
pub use progress::GameProgress;
pub use session::{
    AnswerCheck, CORRECT_MESSAGE, FEEDBACK_CLEAR_DELAY_SECS, Feedback, FeedbackTone, GamePhase,
    GameSession, LEVEL_FAILED_MESSAGE, LEVEL_PASSED_MESSAGE, LEVEL_TRANSITION_DELAY_SECS,
};
pub use workflow::{AnswerResult, GameLoopService};
