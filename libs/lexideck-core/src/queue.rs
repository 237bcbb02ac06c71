//! Study queue assembly.
//!
//! Composes three independently fetched subsets (due, new, leeches) from a
//! `StudyStore` into one queue. The three fetches run concurrently; a failure
//! of any one fails the whole build.

use crate::error::QueueError;
use crate::store::StudyStore;
use crate::types::{Scope, WordWithScheduling};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Queue composition limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Cap on due cards per session.
    pub due_limit: usize,
    /// Cap on never-graded cards per session.
    pub new_per_day: usize,
    /// Lapse count at which a card becomes a leech. The single source for
    /// both the leech fetch and stage classification.
    pub leech_threshold: u32,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            due_limit: 20,
            new_per_day: 10,
            leech_threshold: 8,
        }
    }
}

/// An assembled study queue. Immutable once built: due cards precede new
/// cards in `cards`; leeches are surfaced separately for clinic review, not
/// mixed into the ordinary flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyQueue {
    pub cards: Vec<WordWithScheduling>,
    pub leeches: Vec<WordWithScheduling>,
}

/// Build a study queue for a scope.
///
/// The due, new, and leech fetches have no data dependency and are dispatched
/// concurrently; the first error aborts the build with a `QueueError` naming
/// the failed subset.
pub async fn build_queue<S: StudyStore>(
    store: &S,
    scope: &Scope,
    config: &QueueConfig,
    now: DateTime<Utc>,
) -> Result<StudyQueue, QueueError> {
    let (due, fresh, leeches) = tokio::try_join!(
        async {
            store
                .fetch_due(scope, config.due_limit, now)
                .await
                .map_err(QueueError::Due)
        },
        async {
            store
                .fetch_new(scope, config.new_per_day)
                .await
                .map_err(QueueError::New)
        },
        async {
            store
                .fetch_leeches(scope, config.leech_threshold)
                .await
                .map_err(QueueError::Leeches)
        },
    )?;

    tracing::debug!(
        due = due.len(),
        new = fresh.len(),
        leeches = leeches.len(),
        "built study queue"
    );

    let mut cards = due;
    cards.extend(fresh);

    Ok(StudyQueue { cards, leeches })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::MemoryStore;
    use crate::types::{SchedulingState, Word};
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn word(id: i64, created_offset_secs: i64) -> Word {
        Word {
            id,
            deck_id: 1,
            headword: format!("word-{id}"),
            pos: None,
            definition: format!("definition {id}"),
            example: None,
            tags: vec![],
            created_at: now() + Duration::seconds(created_offset_secs),
        }
    }

    fn graded(card_id: i64, due_offset_days: i64, lapses: u32) -> SchedulingState {
        SchedulingState {
            card_id,
            due_at: now() + Duration::days(due_offset_days),
            interval_days: 3,
            ease: 2.5,
            lapses,
            is_new: false,
        }
    }

    #[tokio::test]
    async fn due_cards_precede_new_cards() {
        let store = MemoryStore::new();
        store.insert(word(1, 0), graded(1, -2, 0));
        store.insert(word(2, 0), graded(2, -1, 0));
        store.insert_new(word(3, 10), now());
        store.insert_new(word(4, 5), now());

        let queue = build_queue(&store, &Scope::All, &QueueConfig::default(), now())
            .await
            .unwrap();
        let ids: Vec<_> = queue.cards.iter().map(|e| e.word.id).collect();
        assert_eq!(ids, vec![1, 2, 4, 3]);
        assert!(queue.leeches.is_empty());
    }

    #[tokio::test]
    async fn limits_are_applied_per_subset() {
        let store = MemoryStore::new();
        for id in 1..=5 {
            store.insert(word(id, 0), graded(id, -id, 0));
        }
        for id in 6..=10 {
            store.insert_new(word(id, id), now());
        }

        let config = QueueConfig {
            due_limit: 2,
            new_per_day: 3,
            leech_threshold: 8,
        };
        let queue = build_queue(&store, &Scope::All, &config, now()).await.unwrap();
        assert_eq!(queue.cards.len(), 5);
    }

    #[tokio::test]
    async fn leeches_stay_out_of_the_main_queue() {
        let store = MemoryStore::new();
        store.insert(word(1, 0), graded(1, -1, 9));

        let queue = build_queue(&store, &Scope::All, &QueueConfig::default(), now())
            .await
            .unwrap();
        // The leech is still due, so it appears in cards, and is also
        // surfaced in the leech list for clinic attention.
        assert_eq!(queue.leeches.len(), 1);
        assert_eq!(queue.leeches[0].word.id, 1);
    }

    #[tokio::test]
    async fn empty_store_builds_empty_queue() {
        let store = MemoryStore::new();
        let queue = build_queue(&store, &Scope::All, &QueueConfig::default(), now())
            .await
            .unwrap();
        assert!(queue.cards.is_empty());
        assert!(queue.leeches.is_empty());
    }

    /// Store whose new-card fetch always fails, for partial-failure tests.
    struct FailingNewStore(MemoryStore);

    #[async_trait]
    impl StudyStore for FailingNewStore {
        async fn fetch_due(
            &self,
            scope: &Scope,
            limit: usize,
            now: DateTime<Utc>,
        ) -> Result<Vec<WordWithScheduling>, StoreError> {
            self.0.fetch_due(scope, limit, now).await
        }

        async fn fetch_new(
            &self,
            _scope: &Scope,
            _limit: usize,
        ) -> Result<Vec<WordWithScheduling>, StoreError> {
            Err(StoreError::Backend("connection reset".into()))
        }

        async fn fetch_leeches(
            &self,
            scope: &Scope,
            threshold: u32,
        ) -> Result<Vec<WordWithScheduling>, StoreError> {
            self.0.fetch_leeches(scope, threshold).await
        }

        async fn persist_scheduling(&self, state: &SchedulingState) -> Result<(), StoreError> {
            self.0.persist_scheduling(state).await
        }
    }

    #[tokio::test]
    async fn one_failed_fetch_fails_the_whole_build() {
        let inner = MemoryStore::new();
        inner.insert(word(1, 0), graded(1, -1, 0));
        let store = FailingNewStore(inner);

        let err = build_queue(&store, &Scope::All, &QueueConfig::default(), now())
            .await
            .unwrap_err();
        assert!(matches!(err, QueueError::New(StoreError::Backend(_))));
    }
}
