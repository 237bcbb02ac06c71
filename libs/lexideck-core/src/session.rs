//! Stateful study session over an assembled queue.
//!
//! Single-threaded by design: all mutating calls come from one control flow.
//! Session state is never persisted; abandoning a session just drops it.
//! Callers should persist a graded card's state before calling `next()`, so a
//! crash between the two leaves the card ungraded rather than skipped.

use crate::clock::{Clock, SystemClock};
use crate::types::WordWithScheduling;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// 1-based session progress for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
    pub percent: u32,
}

/// Iterator over a study queue snapshot, tracking cursor, reveal state, and
/// per-card timing. Every operation is total: nothing here panics on an empty
/// queue or past completion.
#[derive(Debug)]
pub struct StudySession<C: Clock = SystemClock> {
    cards: Vec<WordWithScheduling>,
    current_index: usize,
    revealed: bool,
    started_at: DateTime<Utc>,
    card_started_at: DateTime<Utc>,
    clock: C,
}

impl StudySession<SystemClock> {
    /// Start a session over the queue's cards. An empty queue is trivially
    /// complete.
    pub fn new(cards: Vec<WordWithScheduling>) -> Self {
        Self::with_clock(cards, SystemClock)
    }
}

impl<C: Clock> StudySession<C> {
    pub fn with_clock(cards: Vec<WordWithScheduling>, clock: C) -> Self {
        let now = clock.now();
        Self {
            cards,
            current_index: 0,
            revealed: false,
            started_at: now,
            card_started_at: now,
            clock,
        }
    }

    /// The card under the cursor, or `None` once the session is complete.
    pub fn current(&self) -> Option<&WordWithScheduling> {
        self.cards.get(self.current_index)
    }

    /// Mark the current card's answer as shown. Idempotent; cleared by
    /// `next()`.
    pub fn reveal(&mut self) {
        self.revealed = true;
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Advance to the next card, resetting the per-card timer and reveal
    /// flag. Past completion this is a no-op.
    pub fn next(&mut self) {
        self.current_index = (self.current_index + 1).min(self.cards.len());
        self.card_started_at = self.clock.now();
        self.revealed = false;
    }

    /// Milliseconds spent on the current card.
    pub fn elapsed_ms(&self) -> i64 {
        (self.clock.now() - self.card_started_at).num_milliseconds()
    }

    /// Milliseconds since the session started.
    pub fn total_elapsed_ms(&self) -> i64 {
        (self.clock.now() - self.started_at).num_milliseconds()
    }

    pub fn progress(&self) -> Progress {
        let total = self.cards.len();
        let current = (self.current_index + 1).min(total);
        let percent = if total > 0 {
            ((current as f64 / total as f64) * 100.0).round() as u32
        } else {
            0
        };
        Progress { current, total, percent }
    }

    /// True once the cursor has moved past the last card; also true for a
    /// session started on an empty queue.
    pub fn is_complete(&self) -> bool {
        self.current_index >= self.cards.len()
    }
}
