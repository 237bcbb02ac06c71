//! SM-2 spaced repetition scheduler.
//!
//! Based on SuperMemo 2 with configurable parameters. All functions here are
//! pure: a grading computes a fresh `SchedulingState` from the previous one,
//! the grade, and a reference timestamp.

use crate::types::{CardStage, Grade, SchedulingState};
use chrono::{DateTime, Duration, Utc};

/// Interval below which a graded card still counts as being learned.
const MATURE_INTERVAL_DAYS: u32 = 7;

/// SM-2 scheduler with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    /// Floor for the easiness factor.
    pub min_ease: f64,
    /// Ease assigned on a card's first non-Again grading.
    pub initial_ease: f64,
    /// Days granted to a new card graded Hard.
    pub hard_interval_days: u32,
    /// Days granted to a new card graded Good.
    pub good_interval_days: u32,
    /// Days granted to a new card graded Easy.
    pub easy_interval_days: u32,
    /// Multiplier applied on top of ease when a mature card is graded Easy.
    pub easy_bonus: f64,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            min_ease: 1.3,
            initial_ease: 2.5,
            hard_interval_days: 1,
            good_interval_days: 1,
            easy_interval_days: 2,
            easy_bonus: 1.3,
        }
    }
}

impl Sm2 {
    /// Compute the scheduling state after grading a card.
    ///
    /// Branch precedence: Again applies to any card, new or mature, and is the
    /// only branch that touches `lapses`. A new card graded Hard/Good/Easy has
    /// its ease reset to `initial_ease` (Hard and Good both receive
    /// `good_interval_days`). Mature cards use the SM-2 ease adjustment, with
    /// Hard and Good sharing the interval formula and Easy adding `easy_bonus`.
    pub fn schedule(&self, state: &SchedulingState, grade: Grade, now: DateTime<Utc>) -> SchedulingState {
        let mut ease = state.ease;
        let mut lapses = state.lapses;

        let interval_days = if grade == Grade::Again {
            lapses += 1;
            ease = (ease - 0.2).max(self.min_ease);
            1
        } else if state.is_new {
            ease = self.initial_ease;
            if grade == Grade::Easy {
                self.easy_interval_days
            } else {
                self.good_interval_days
            }
        } else {
            let q = f64::from(grade.to_value());
            ease += 0.1 - (4.0 - q) * (0.08 + (4.0 - q) * 0.02);
            ease = ease.max(self.min_ease);
            let multiplier = if grade == Grade::Easy {
                ease * self.easy_bonus
            } else {
                ease
            };
            scaled_interval(state.interval_days, multiplier)
        };

        SchedulingState {
            card_id: state.card_id,
            due_at: now + Duration::days(i64::from(interval_days)),
            interval_days,
            ease,
            lapses,
            // No longer new after any grading, including Again.
            is_new: false,
        }
    }

    /// Hypothetical interval each grade would produce, for UI display.
    ///
    /// Uses the card's current ease without applying the adjustment a real
    /// grading would, so Hard and Good report identical values for mature
    /// cards.
    pub fn preview_intervals(&self, state: &SchedulingState) -> PreviewIntervals {
        if state.is_new {
            PreviewIntervals {
                again: 1,
                hard: self.hard_interval_days,
                good: self.good_interval_days,
                easy: self.easy_interval_days,
            }
        } else {
            PreviewIntervals {
                again: 1,
                hard: scaled_interval(state.interval_days, state.ease),
                good: scaled_interval(state.interval_days, state.ease),
                easy: scaled_interval(state.interval_days, state.ease * self.easy_bonus),
            }
        }
    }
}

/// Intervals (in days) each grade would yield, for UI button labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewIntervals {
    pub again: u32,
    pub hard: u32,
    pub good: u32,
    pub easy: u32,
}

impl PreviewIntervals {
    pub fn for_grade(&self, grade: Grade) -> u32 {
        match grade {
            Grade::Again => self.again,
            Grade::Hard => self.hard,
            Grade::Good => self.good,
            Grade::Easy => self.easy,
        }
    }
}

fn scaled_interval(interval_days: u32, multiplier: f64) -> u32 {
    ((f64::from(interval_days) * multiplier).round() as u32).max(1)
}

/// Classify a card's learning stage.
///
/// Clinic takes priority: a card past the leech threshold is a clinic card
/// even if it is still marked new.
pub fn mode_of(state: &SchedulingState, leech_threshold: u32) -> CardStage {
    if state.lapses >= leech_threshold {
        CardStage::Clinic
    } else if state.is_new || state.interval_days < MATURE_INTERVAL_DAYS {
        CardStage::Learning
    } else {
        CardStage::Retention
    }
}

/// Whether a card is eligible for review. Boundary inclusive: a card due at
/// exactly `now` counts as due.
pub fn is_due(state: &SchedulingState, now: DateTime<Utc>) -> bool {
    state.due_at <= now
}
