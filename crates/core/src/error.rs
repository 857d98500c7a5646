use thiserror::Error;

use crate::model::{LevelConfigError, PlayerRecordError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    LevelConfig(#[from] LevelConfigError),
    #[error(transparent)]
    PlayerRecord(#[from] PlayerRecordError),
}
