use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;

use drill_core::model::{
    LevelTable, PlayerName, PlayerRecord, Question, QuestionSet, generate_unique_questions,
};

use super::progress::GameProgress;
use crate::cues::Cue;
use crate::error::GameError;
use crate::timers::{LevelTimer, TICK_INTERVAL_SECS, TimerSlot, Timers, next_tick_after};

/// Delay before answer feedback disappears.
pub const FEEDBACK_CLEAR_DELAY_SECS: i64 = 1;
/// Delay between the end of a level and loading the next attempt.
pub const LEVEL_TRANSITION_DELAY_SECS: i64 = 1;

pub const CORRECT_MESSAGE: &str = "Correct!";
pub const LEVEL_PASSED_MESSAGE: &str = "Level completed!";
pub const LEVEL_FAILED_MESSAGE: &str = "You failed the level.";

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Questions are being answered.
    InLevel,
    /// Every answer of the level was right; the next level loads shortly.
    LevelPassed,
    /// At least one mistake; the same level reloads shortly.
    LevelFailed,
    /// The level table is exhausted.
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackTone {
    Positive,
    Negative,
}

/// The transient message shown under the question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub message: String,
    pub tone: FeedbackTone,
}

impl Feedback {
    fn positive(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            tone: FeedbackTone::Positive,
        }
    }

    fn negative(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            tone: FeedbackTone::Negative,
        }
    }
}

/// Result of checking one submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerCheck {
    pub question: Question,
    pub correct: bool,
    pub expected: i64,
    pub cue: Cue,
}

/// What `end_level` decided, with the record that has to be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LevelEnd {
    pub passed: bool,
    pub record: PlayerRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LevelLoad {
    Loaded,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Fired {
    pub slot: TimerSlot,
    pub load: Option<LevelLoad>,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One player's play-through, owned by the caller and passed to every
/// `GameLoopService` operation.
pub struct GameSession {
    player: PlayerName,
    level: u32,
    score: u32,
    questions: QuestionSet,
    index: usize,
    started_at: DateTime<Utc>,
    phase: GamePhase,
    feedback: Option<Feedback>,
    timer: LevelTimer,
    timers: Timers,
    rng: StdRng,
}

impl GameSession {
    /// `started_at` should come from the services layer clock.
    pub(crate) fn new(
        player: PlayerName,
        progress: PlayerRecord,
        rng: StdRng,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            player,
            level: progress.level,
            score: progress.score,
            questions: QuestionSet::default(),
            index: 0,
            started_at,
            phase: GamePhase::InLevel,
            feedback: None,
            timer: LevelTimer::default(),
            timers: Timers::new(),
            rng,
        }
    }

    #[must_use]
    pub fn player(&self) -> &PlayerName {
        &self.player
    }

    /// Level being played, or the level about to load after a pass.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Cumulative score; only an explicit replay resets it.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == GamePhase::Completed
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    #[must_use]
    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    #[must_use]
    pub fn question_index(&self) -> usize {
        self.index
    }

    /// The question awaiting an answer; `None` once the level has ended.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.phase == GamePhase::InLevel {
            self.questions.get(self.index)
        } else {
            None
        }
    }

    #[must_use]
    pub fn timer_display(&self) -> &str {
        self.timer.display()
    }

    #[must_use]
    pub fn timer(&self) -> &LevelTimer {
        &self.timer
    }

    #[must_use]
    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn progress(&self) -> GameProgress {
        GameProgress {
            level: self.level,
            score: self.score,
            answered: self.index,
            total: self.questions.len(),
            remaining: self.questions.len().saturating_sub(self.index),
        }
    }

    /// Load `level` from the table, or flag completion when it does not exist.
    pub(crate) fn load_level(
        &mut self,
        levels: &LevelTable,
        level: u32,
        now: DateTime<Utc>,
    ) -> LevelLoad {
        let Some(config) = levels.get(level) else {
            self.phase = GamePhase::Completed;
            return LevelLoad::Completed;
        };

        self.level = level;
        self.questions = generate_unique_questions(config, &mut self.rng);
        self.index = 0;
        self.feedback = None;
        self.reset_timer();
        self.start_timer(now);
        self.phase = GamePhase::InLevel;
        LevelLoad::Loaded
    }

    /// Score the current question and advance.
    ///
    /// Returns the level outcome when this was the last question.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NotAcceptingAnswers` outside of `GamePhase::InLevel`.
    pub(crate) fn check_answer(
        &mut self,
        raw: &str,
        now: DateTime<Utc>,
    ) -> Result<(AnswerCheck, Option<LevelEnd>), GameError> {
        let Some(question) = self.current_question().copied() else {
            return Err(GameError::NotAcceptingAnswers);
        };

        let correct = question.is_correct(raw);
        let expected = question.answer();
        let cue = if correct {
            self.score = self.score.saturating_add(1);
            self.feedback = Some(Feedback::positive(CORRECT_MESSAGE));
            Cue::Correct
        } else {
            self.feedback = Some(Feedback::negative(format!(
                "Incorrect! The correct answer is {expected}"
            )));
            Cue::Wrong
        };

        self.timers.schedule(
            TimerSlot::ClearFeedback,
            now + Duration::seconds(FEEDBACK_CLEAR_DELAY_SECS),
        );

        self.index += 1;
        let level_end = (self.index >= self.questions.len()).then(|| self.end_level(now));

        Ok((
            AnswerCheck {
                question,
                correct,
                expected,
                cue,
            },
            level_end,
        ))
    }

    fn end_level(&mut self, now: DateTime<Utc>) -> LevelEnd {
        self.stop_timer();

        // Score is cumulative across levels, so after level 1 this only holds
        // when the carried-over points happen to equal the set size.
        let passed = usize::try_from(self.score).is_ok_and(|score| score == self.questions.len());
        if passed {
            self.feedback = Some(Feedback::positive(LEVEL_PASSED_MESSAGE));
            self.level = self.level.saturating_add(1);
            self.phase = GamePhase::LevelPassed;
        } else {
            self.feedback = Some(Feedback::negative(LEVEL_FAILED_MESSAGE));
            self.phase = GamePhase::LevelFailed;
        }

        self.timers.schedule(
            TimerSlot::LevelTransition,
            now + Duration::seconds(LEVEL_TRANSITION_DELAY_SECS),
        );

        LevelEnd {
            passed,
            record: PlayerRecord::new(self.level, self.score),
        }
    }

    /// Back to level 1 with a zero score. The caller loads the level.
    pub(crate) fn restart(&mut self) {
        self.level = 1;
        self.score = 0;
    }

    /// Run the earliest callback due at or before `now`.
    pub(crate) fn fire_next(&mut self, levels: &LevelTable, now: DateTime<Utc>) -> Option<Fired> {
        let (slot, due_at) = self.timers.pop_due(now)?;
        let load = match slot {
            TimerSlot::Tick => {
                self.timer.tick(now);
                if self.timer.is_running() {
                    self.timers
                        .schedule(TimerSlot::Tick, next_tick_after(due_at, now));
                }
                None
            }
            TimerSlot::ClearFeedback => {
                self.feedback = None;
                None
            }
            TimerSlot::LevelTransition => Some(self.load_level(levels, self.level, due_at)),
        };
        Some(Fired { slot, load })
    }

    fn reset_timer(&mut self) {
        self.timers.cancel_slot(TimerSlot::Tick);
        self.timer.reset();
    }

    fn start_timer(&mut self, now: DateTime<Utc>) {
        self.timer.start(now);
        self.timers
            .schedule(TimerSlot::Tick, now + Duration::seconds(TICK_INTERVAL_SECS));
    }

    fn stop_timer(&mut self) {
        self.timers.cancel_slot(TimerSlot::Tick);
        self.timer.stop();
    }
}
