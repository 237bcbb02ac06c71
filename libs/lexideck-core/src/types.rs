//! Core types for the study engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Quality rating of a recall attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Again,
    Hard,
    Good,
    Easy,
}

impl Grade {
    /// Convert to 4-point numeric value (1-4).
    pub fn to_value(self) -> u8 {
        match self {
            Self::Again => 1,
            Self::Hard => 2,
            Self::Good => 3,
            Self::Easy => 4,
        }
    }

    /// Create from 4-point numeric value.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Again),
            2 => Some(Self::Hard),
            3 => Some(Self::Good),
            4 => Some(Self::Easy),
            _ => None,
        }
    }

    /// All grades in ascending quality order.
    pub fn all() -> [Self; 4] {
        [Self::Again, Self::Hard, Self::Good, Self::Easy]
    }
}

/// Derived learning stage of a card. Recomputed on demand, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStage {
    Learning,
    Retention,
    Clinic,
}

/// Per-card scheduling state maintained by the SM-2 scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingState {
    pub card_id: i64,
    /// Instant the card next becomes eligible for review.
    pub due_at: DateTime<Utc>,
    /// Days until next review, as of the last grading. 0 only before the
    /// first grading.
    pub interval_days: u32,
    /// Easiness factor, floored at the configured minimum.
    pub ease: f64,
    /// Count of Again gradings ever applied.
    pub lapses: u32,
    /// True until the first grading event.
    pub is_new: bool,
}

impl SchedulingState {
    /// Initial state for a card that has never been graded: due immediately.
    pub fn initial(card_id: i64, now: DateTime<Utc>) -> Self {
        Self {
            card_id,
            due_at: now,
            interval_days: 0,
            ease: 2.5,
            lapses: 0,
            is_new: true,
        }
    }
}

/// A vocabulary word imported into a deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub id: i64,
    pub deck_id: i64,
    pub headword: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos: Option<String>,
    pub definition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// A word paired with its scheduling state, as returned by queue fetches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordWithScheduling {
    pub word: Word,
    pub scheduling: SchedulingState,
}

/// The set of decks a study session draws cards from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    All,
    Deck(i64),
    Decks(Vec<i64>),
}

impl Scope {
    /// Whether a deck falls inside this scope.
    pub fn contains(&self, deck_id: i64) -> bool {
        match self {
            Self::All => true,
            Self::Deck(id) => *id == deck_id,
            Self::Decks(ids) => ids.contains(&deck_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn grade_values_round_trip() {
        for grade in Grade::all() {
            assert_eq!(Grade::from_value(grade.to_value()), Some(grade));
        }
    }

    #[test]
    fn grade_rejects_out_of_range_values() {
        assert_eq!(Grade::from_value(0), None);
        assert_eq!(Grade::from_value(5), None);
    }

    #[test]
    fn initial_state_is_new_and_due_immediately() {
        let now = Utc::now();
        let state = SchedulingState::initial(7, now);
        assert_eq!(state.card_id, 7);
        assert_eq!(state.due_at, now);
        assert_eq!(state.interval_days, 0);
        assert_eq!(state.ease, 2.5);
        assert_eq!(state.lapses, 0);
        assert!(state.is_new);
    }

    #[test]
    fn scope_contains() {
        assert!(Scope::All.contains(42));
        assert!(Scope::Deck(1).contains(1));
        assert!(!Scope::Deck(1).contains(2));
        assert!(Scope::Decks(vec![1, 3]).contains(3));
        assert!(!Scope::Decks(vec![1, 3]).contains(2));
    }

    #[test]
    fn scheduling_state_serializes_with_snake_case_fields() {
        let state = SchedulingState::initial(1, Utc::now());
        let value = serde_json::to_value(&state).unwrap();
        let obj = value.as_object().unwrap();
        for key in ["card_id", "due_at", "interval_days", "ease", "lapses", "is_new"] {
            assert!(obj.contains_key(key), "missing field {key}");
        }
        assert_eq!(serde_json::to_value(Grade::Again).unwrap(), "again");
    }
}
