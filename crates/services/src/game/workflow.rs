use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;

use drill_core::model::{LevelTable, PlayerName, PlayerRecord};
use storage::repository::KeyValueStore;

use super::session::{AnswerCheck, GameSession, LevelEnd, LevelLoad};
use crate::Clock;
use crate::cues::{CuePlayer, SilentCues};
use crate::error::GameError;
use crate::timers::TimerSlot;

/// Result of submitting one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerResult {
    pub check: AnswerCheck,
    /// `Some(passed)` when this answer finished the level.
    pub level_passed: Option<bool>,
}

/// Drives a `GameSession` through levels and persists progress.
#[derive(Clone)]
pub struct GameLoopService {
    clock: Clock,
    levels: Arc<LevelTable>,
    players: Arc<dyn KeyValueStore>,
    cues: Arc<dyn CuePlayer>,
    seed: Option<u64>,
}

impl GameLoopService {
    #[must_use]
    pub fn new(clock: Clock, levels: Arc<LevelTable>, players: Arc<dyn KeyValueStore>) -> Self {
        Self {
            clock,
            levels,
            players,
            cues: Arc::new(SilentCues),
            seed: None,
        }
    }

    #[must_use]
    pub fn with_cues(mut self, cues: Arc<dyn CuePlayer>) -> Self {
        self.cues = cues;
        self
    }

    /// Seed question shuffling for reproducible sessions.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Start (or resume) a game for the typed player name.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Storage` if the store cannot be read, or if the
    /// record cleanup for an already-finished player fails.
    pub async fn start(&self, name_input: &str) -> Result<GameSession, GameError> {
        self.start_at(name_input, self.clock.now()).await
    }

    /// Like `start`, with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// See `start`.
    pub async fn start_at(
        &self,
        name_input: &str,
        now: DateTime<Utc>,
    ) -> Result<GameSession, GameError> {
        let player = PlayerName::from_input(name_input);
        let progress = self.load_progress(&player).await?;
        log::info!(
            "starting game for {player} at level {} (score {})",
            progress.level,
            progress.score
        );

        let mut session = GameSession::new(player, progress, self.new_rng(), now);
        let load = session.load_level(&self.levels, progress.level, now);
        self.after_load(&session, load).await?;
        Ok(session)
    }

    /// Check an answer for the current question.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NotAcceptingAnswers` between levels or after
    /// completion, and `GameError::Storage` if the level-end record cannot be
    /// written.
    pub async fn submit_answer(
        &self,
        session: &mut GameSession,
        raw: &str,
    ) -> Result<AnswerResult, GameError> {
        self.submit_answer_at(session, raw, self.clock.now()).await
    }

    /// Like `submit_answer`, with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// See `submit_answer`.
    pub async fn submit_answer_at(
        &self,
        session: &mut GameSession,
        raw: &str,
        now: DateTime<Utc>,
    ) -> Result<AnswerResult, GameError> {
        let (check, level_end) = session.check_answer(raw, now)?;
        self.cues.play(check.cue);

        let level_passed = match level_end {
            Some(end) => {
                self.persist_level_end(session, end).await?;
                Some(end.passed)
            }
            None => None,
        };

        Ok(AnswerResult {
            check,
            level_passed,
        })
    }

    /// Restart from level 1 with a zero score.
    ///
    /// Stored records of other players are left alone.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Storage` only if the level table is empty and the
    /// completion cleanup fails.
    pub async fn play_again(&self, session: &mut GameSession) -> Result<(), GameError> {
        self.play_again_at(session, self.clock.now()).await
    }

    /// Like `play_again`, with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// See `play_again`.
    pub async fn play_again_at(
        &self,
        session: &mut GameSession,
        now: DateTime<Utc>,
    ) -> Result<(), GameError> {
        log::debug!("{} plays again", session.player());
        session.restart();
        let load = session.load_level(&self.levels, 1, now);
        self.after_load(session, load).await
    }

    /// Fire every scheduled callback that is due.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Storage` if a level transition reaches completion
    /// and the player's record cannot be removed.
    pub async fn run_due(&self, session: &mut GameSession) -> Result<Vec<TimerSlot>, GameError> {
        self.run_due_at(session, self.clock.now()).await
    }

    /// Like `run_due`, treating `now` as the current time.
    ///
    /// # Errors
    ///
    /// See `run_due`.
    pub async fn run_due_at(
        &self,
        session: &mut GameSession,
        now: DateTime<Utc>,
    ) -> Result<Vec<TimerSlot>, GameError> {
        let mut fired = Vec::new();
        while let Some(event) = session.fire_next(&self.levels, now) {
            if let Some(load) = event.load {
                self.after_load(session, load).await?;
            }
            fired.push(event.slot);
        }
        Ok(fired)
    }

    async fn load_progress(&self, player: &PlayerName) -> Result<PlayerRecord, GameError> {
        let Some(raw) = self.players.get(player.as_str()).await? else {
            log::debug!("no stored progress for {player}");
            return Ok(PlayerRecord::fresh());
        };
        match PlayerRecord::from_json(&raw) {
            Ok(record) => Ok(record),
            Err(err) => {
                log::warn!("ignoring stored progress for {player}: {err}");
                Ok(PlayerRecord::fresh())
            }
        }
    }

    async fn persist_level_end(
        &self,
        session: &GameSession,
        end: LevelEnd,
    ) -> Result<(), GameError> {
        let player = session.player();
        if end.passed {
            log::info!("{player} passed; next level {}", end.record.level);
        } else {
            log::info!("{player} failed level {}", end.record.level);
        }
        self.players
            .set(player.as_str(), &end.record.to_json()?)
            .await?;
        Ok(())
    }

    async fn after_load(&self, session: &GameSession, load: LevelLoad) -> Result<(), GameError> {
        match load {
            LevelLoad::Loaded => {
                log::debug!(
                    "{} loaded level {} ({} questions)",
                    session.player(),
                    session.level(),
                    session.questions().len()
                );
            }
            LevelLoad::Completed => {
                log::info!("{} completed every level", session.player());
                self.players.remove(session.player().as_str()).await?;
            }
        }
        Ok(())
    }

    fn new_rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}
