use std::sync::{Arc, Mutex};

use services::{Cue, CuePlayer};

/// Buffers cues from the game loop until the view can play them.
///
/// The game loop runs outside of any rendering scope, so it only records the
/// cue; the view drains the queue after each answer and plays it through the
/// webview.
#[derive(Clone, Default)]
pub struct QueuedCues {
    queue: Arc<Mutex<Vec<Cue>>>,
}

impl QueuedCues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every cue queued so far, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<Cue> {
        match self.queue.lock() {
            Ok(mut queue) => std::mem::take(&mut *queue),
            Err(err) => {
                log::warn!("cue queue poisoned: {err}");
                Vec::new()
            }
        }
    }
}

impl CuePlayer for QueuedCues {
    fn play(&self, cue: Cue) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push(cue);
        }
    }
}

/// Script that plays `cue` and swallows playback failures.
#[must_use]
pub fn cue_script(cue: Cue) -> String {
    format!(
        "new Audio({:?}).play().catch(() => {{}});",
        cue.asset()
    )
}
