/// Audio cue fired after an answer is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Correct,
    Wrong,
}

impl Cue {
    /// Asset name a front end can map the cue to.
    #[must_use]
    pub fn asset(self) -> &'static str {
        match self {
            Cue::Correct => "correct.mp3",
            Cue::Wrong => "wrong.mp3",
        }
    }
}

/// Fire-and-forget playback seam. Implementations swallow their own failures.
pub trait CuePlayer: Send + Sync {
    fn play(&self, cue: Cue);
}

/// Plays nothing; used when no audio front end is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentCues;

impl CuePlayer for SilentCues {
    fn play(&self, cue: Cue) {
        log::trace!("cue {cue:?} dropped (silent)");
    }
}
