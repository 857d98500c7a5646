use chrono::{DateTime, Utc};

use services::{
    AnswerResult, Feedback, FeedbackTone, GameError, GameLoopService, GameSession, TimerSlot,
};

use crate::views::ViewError;

/// Which screen the play route shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Welcome,
    Game,
    Congrats,
}

/// What the Enter key does on a given screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnterAction {
    Start,
    Submit,
    Ignore,
}

/// Render-ready copy of the session.
///
/// The view renders from this while the session itself is moved out of its
/// signal for an async service call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSnapshot {
    pub screen: Screen,
    pub greeting: String,
    pub level_label: String,
    pub prompt: Option<String>,
    pub score_label: String,
    pub timer_label: String,
    pub progress_label: String,
    pub feedback: Option<Feedback>,
    pub congrats_message: String,
}

/// No snapshot means no game has been started yet.
#[must_use]
pub fn screen_for(snapshot: Option<&GameSnapshot>) -> Screen {
    snapshot.map_or(Screen::Welcome, |snapshot| snapshot.screen)
}

#[must_use]
pub fn enter_action(screen: Screen) -> EnterAction {
    match screen {
        Screen::Welcome => EnterAction::Start,
        Screen::Game => EnterAction::Submit,
        Screen::Congrats => EnterAction::Ignore,
    }
}

#[must_use]
pub fn feedback_class(tone: FeedbackTone) -> &'static str {
    match tone {
        FeedbackTone::Positive => "feedback feedback--positive",
        FeedbackTone::Negative => "feedback feedback--negative",
    }
}

pub struct GameVm {
    session: GameSession,
}

impl GameVm {
    #[must_use]
    pub fn new(session: GameSession) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        let session = &self.session;
        let player = session.player();
        let progress = session.progress();
        GameSnapshot {
            screen: if session.is_complete() {
                Screen::Congrats
            } else {
                Screen::Game
            },
            greeting: format!("Hello, {player}!"),
            level_label: format!("Level {}", session.level()),
            prompt: session.current_question().map(|question| question.prompt()),
            score_label: format!("Score: {}", session.score()),
            timer_label: format!("Time: {}", session.timer_display()),
            progress_label: format!("{} / {}", progress.answered, progress.total),
            feedback: session.feedback().cloned(),
            congrats_message: format!("Congratulations, {player}! You finished every level."),
        }
    }

    /// Whether any scheduled callback is due at `now`.
    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.session
            .timers()
            .next_deadline()
            .is_some_and(|deadline| deadline <= now)
    }

    /// Submit `raw` for the current question.
    ///
    /// Returns `None` when the session is between levels and the answer was
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` for storage failures.
    pub async fn submit(
        &mut self,
        game_loop: &GameLoopService,
        raw: &str,
    ) -> Result<Option<AnswerResult>, ViewError> {
        match game_loop.submit_answer(&mut self.session, raw).await {
            Ok(result) => Ok(Some(result)),
            Err(GameError::NotAcceptingAnswers) => Ok(None),
            Err(err) => {
                log::error!("submitting answer failed: {err}");
                Err(ViewError::Unknown)
            }
        }
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` for storage failures.
    pub async fn run_due(
        &mut self,
        game_loop: &GameLoopService,
    ) -> Result<Vec<TimerSlot>, ViewError> {
        game_loop.run_due(&mut self.session).await.map_err(|err| {
            log::error!("running scheduled callbacks failed: {err}");
            ViewError::Unknown
        })
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` for storage failures.
    pub async fn play_again(&mut self, game_loop: &GameLoopService) -> Result<(), ViewError> {
        game_loop.play_again(&mut self.session).await.map_err(|err| {
            log::error!("restarting game failed: {err}");
            ViewError::Unknown
        })
    }
}

/// # Errors
///
/// Returns `ViewError::Unknown` when stored progress cannot be read.
pub async fn start_game(game_loop: &GameLoopService, name: &str) -> Result<GameVm, ViewError> {
    let session = game_loop.start(name).await.map_err(|err| {
        log::error!("starting game failed: {err}");
        ViewError::Unknown
    })?;
    Ok(GameVm::new(session))
}
