//! Cancellable scheduled callbacks and the per-level elapsed timer.
//!
//! Waiting is modelled as a deadline stored in a slot. A slot holds at most
//! one deadline, so scheduling it again replaces whatever was pending.

use chrono::{DateTime, Duration, Utc};

use drill_core::time::format_elapsed;

/// Interval between timer display refreshes.
pub const TICK_INTERVAL_SECS: i64 = 1;

/// The callbacks a game session can have pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerSlot {
    /// Refresh the elapsed-time display.
    Tick,
    /// Clear the answer feedback line.
    ClearFeedback,
    /// Load the next (or same) level after a level ends.
    LevelTransition,
}

impl TimerSlot {
    const ALL: [TimerSlot; 3] = [
        TimerSlot::Tick,
        TimerSlot::ClearFeedback,
        TimerSlot::LevelTransition,
    ];

    fn index(self) -> usize {
        match self {
            TimerSlot::Tick => 0,
            TimerSlot::ClearFeedback => 1,
            TimerSlot::LevelTransition => 2,
        }
    }
}

/// Identifies one particular scheduling of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    slot: TimerSlot,
    generation: u64,
}

impl TimerHandle {
    #[must_use]
    pub fn slot(&self) -> TimerSlot {
        self.slot
    }
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    due_at: DateTime<Utc>,
    generation: u64,
}

/// Deadline table with one entry per `TimerSlot`.
#[derive(Debug, Clone, Default)]
pub struct Timers {
    slots: [Option<Pending>; 3],
    next_generation: u64,
}

impl Timers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `slot` to fire at `due_at`, cancelling any pending deadline for it.
    pub fn schedule(&mut self, slot: TimerSlot, due_at: DateTime<Utc>) -> TimerHandle {
        self.next_generation += 1;
        let generation = self.next_generation;
        self.slots[slot.index()] = Some(Pending { due_at, generation });
        TimerHandle { slot, generation }
    }

    /// Cancel the scheduling identified by `handle`.
    ///
    /// Returns `false` if that scheduling already fired or was replaced.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let entry = &mut self.slots[handle.slot.index()];
        if entry.is_some_and(|pending| pending.generation == handle.generation) {
            *entry = None;
            return true;
        }
        false
    }

    /// Cancel whatever is pending for `slot`.
    pub fn cancel_slot(&mut self, slot: TimerSlot) -> bool {
        self.slots[slot.index()].take().is_some()
    }

    #[must_use]
    pub fn is_pending(&self, slot: TimerSlot) -> bool {
        self.slots[slot.index()].is_some()
    }

    #[must_use]
    pub fn deadline(&self, slot: TimerSlot) -> Option<DateTime<Utc>> {
        self.slots[slot.index()].map(|pending| pending.due_at)
    }

    /// Earliest pending deadline, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.slots.iter().flatten().map(|pending| pending.due_at).min()
    }

    /// Remove and return the earliest slot due at or before `now`.
    ///
    /// Ties go to the slot declared first in `TimerSlot`.
    pub fn pop_due(&mut self, now: DateTime<Utc>) -> Option<(TimerSlot, DateTime<Utc>)> {
        let (slot, due_at) = TimerSlot::ALL
            .iter()
            .filter_map(|slot| self.deadline(*slot).map(|due_at| (*slot, due_at)))
            .filter(|(_, due_at)| *due_at <= now)
            .min_by_key(|(_, due_at)| *due_at)?;
        self.slots[slot.index()] = None;
        Some((slot, due_at))
    }
}

/// Elapsed time shown while a level is being played.
#[derive(Debug, Clone)]
pub struct LevelTimer {
    started_at: Option<DateTime<Utc>>,
    running: bool,
    display: String,
}

impl Default for LevelTimer {
    fn default() -> Self {
        Self {
            started_at: None,
            running: false,
            display: format_elapsed(Duration::zero()),
        }
    }
}

impl LevelTimer {
    /// Zero the display and stop ticking. The caller cancels the tick slot.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Capture the start timestamp; the display updates on subsequent ticks.
    pub fn start(&mut self, now: DateTime<Utc>) {
        self.started_at = Some(now);
        self.running = true;
    }

    /// Stop ticking and keep the last displayed value.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Refresh the display from the captured start time.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        if !self.running {
            return;
        }
        if let Some(started_at) = self.started_at {
            self.display = format_elapsed(now - started_at);
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn display(&self) -> &str {
        &self.display
    }
}

/// First tick deadline strictly after `now`, stepping from `previous`.
pub(crate) fn next_tick_after(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    let step = Duration::seconds(TICK_INTERVAL_SECS);
    let mut next = previous + step;
    if next <= now {
        let behind = (now - previous).num_milliseconds() / step.num_milliseconds();
        next = previous + step * i32::try_from(behind + 1).unwrap_or(i32::MAX);
    }
    next
}
