mod level;
mod player;
mod question;

pub use level::{LevelConfig, LevelConfigError, LevelTable};
pub use player::{DEFAULT_PLAYER_NAME, PlayerName, PlayerRecord, PlayerRecordError};
pub use question::{Question, QuestionSet, generate_unique_questions, parse_answer};
