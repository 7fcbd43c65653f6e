//! Time-based character reveal for assistant replies.
//!
//! Purely cosmetic: the transcript always holds the full text; this tracker
//! only decides how much of it is visible this frame. User turns and wizard
//! turns appear at once.

use std::time::Duration;

use marg_session::Transcript;
use marg_types::Role;

#[derive(Debug, Clone, Copy)]
enum RevealState {
    Done,
    /// Characters revealed so far; fractional so slow frame rates still
    /// accumulate smoothly.
    Revealing(f32),
}

#[derive(Debug, Default)]
pub struct RevealTracker {
    states: Vec<RevealState>,
}

impl RevealTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register turns appended since the last call. With `instant` set
    /// (reduced motion) new turns are fully visible immediately.
    pub fn sync(&mut self, transcript: &Transcript, instant: bool) {
        let turns = transcript.turns();
        for turn in &turns[self.states.len()..] {
            let animate =
                !instant && turn.role() == Role::Assistant && turn.text().is_some();
            self.states.push(if animate {
                RevealState::Revealing(0.0)
            } else {
                RevealState::Done
            });
        }
    }

    /// Advance every in-progress reveal by `dt` at `cps` characters/second.
    pub fn advance(&mut self, dt: Duration, transcript: &Transcript, cps: u32) {
        let step = dt.as_secs_f32() * cps as f32;
        for (state, turn) in self.states.iter_mut().zip(transcript.turns()) {
            if let RevealState::Revealing(count) = state {
                let total = turn.text().map_or(0, |text| text.chars().count());
                let next = *count + step;
                if next >= total as f32 {
                    *state = RevealState::Done;
                } else {
                    *state = RevealState::Revealing(next);
                }
            }
        }
    }

    /// How many characters of turn `index` are visible; `None` means all.
    #[must_use]
    pub fn visible_chars(&self, index: usize) -> Option<usize> {
        match self.states.get(index) {
            Some(RevealState::Revealing(count)) => Some(*count as usize),
            _ => None,
        }
    }
}
