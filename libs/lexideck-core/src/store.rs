//! Storage contract the queue builder depends on, plus an in-memory
//! implementation for tests and embedded use.

use crate::error::StoreError;
use crate::scheduler::is_due;
use crate::types::{Scope, SchedulingState, Word, WordWithScheduling};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::RwLock;

type Result<T> = std::result::Result<T, StoreError>;

/// Read/write contract fulfilled by a storage adapter (SQLite, cloud, ...).
///
/// Ordering is part of the contract: due ascending by due date, new ascending
/// by creation time, leeches descending by lapse count.
#[async_trait]
pub trait StudyStore: Send + Sync {
    /// Graded cards eligible for review at `now`, capped at `limit`.
    async fn fetch_due(
        &self,
        scope: &Scope,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<WordWithScheduling>>;

    /// Cards never graded, capped at `limit`.
    async fn fetch_new(&self, scope: &Scope, limit: usize) -> Result<Vec<WordWithScheduling>>;

    /// Cards whose lapse count has crossed `threshold`.
    async fn fetch_leeches(&self, scope: &Scope, threshold: u32)
        -> Result<Vec<WordWithScheduling>>;

    /// Write back a graded card's scheduling state.
    async fn persist_scheduling(&self, state: &SchedulingState) -> Result<()>;
}

/// In-memory `StudyStore`. Backs tests and doubles as a reference for the
/// ordering contracts a real adapter must uphold.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<Vec<WordWithScheduling>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a word with an explicit scheduling state.
    pub fn insert(&self, word: Word, scheduling: SchedulingState) {
        let mut entries = self.entries.write().expect("store lock");
        entries.push(WordWithScheduling { word, scheduling });
    }

    /// Add a freshly imported word with initial scheduling.
    pub fn insert_new(&self, word: Word, now: DateTime<Utc>) {
        let scheduling = SchedulingState::initial(word.id, now);
        self.insert(word, scheduling);
    }

    pub fn get(&self, card_id: i64) -> Option<WordWithScheduling> {
        let entries = self.entries.read().expect("store lock");
        entries.iter().find(|e| e.word.id == card_id).cloned()
    }

    fn in_scope(&self, scope: &Scope) -> Vec<WordWithScheduling> {
        let entries = self.entries.read().expect("store lock");
        entries
            .iter()
            .filter(|e| scope.contains(e.word.deck_id))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl StudyStore for MemoryStore {
    async fn fetch_due(
        &self,
        scope: &Scope,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<WordWithScheduling>> {
        let mut due: Vec<_> = self
            .in_scope(scope)
            .into_iter()
            .filter(|e| !e.scheduling.is_new && is_due(&e.scheduling, now))
            .collect();
        due.sort_by_key(|e| e.scheduling.due_at);
        due.truncate(limit);
        Ok(due)
    }

    async fn fetch_new(&self, scope: &Scope, limit: usize) -> Result<Vec<WordWithScheduling>> {
        let mut fresh: Vec<_> = self
            .in_scope(scope)
            .into_iter()
            .filter(|e| e.scheduling.is_new)
            .collect();
        fresh.sort_by_key(|e| e.word.created_at);
        fresh.truncate(limit);
        Ok(fresh)
    }

    async fn fetch_leeches(
        &self,
        scope: &Scope,
        threshold: u32,
    ) -> Result<Vec<WordWithScheduling>> {
        let mut leeches: Vec<_> = self
            .in_scope(scope)
            .into_iter()
            .filter(|e| e.scheduling.lapses >= threshold)
            .collect();
        leeches.sort_by(|a, b| b.scheduling.lapses.cmp(&a.scheduling.lapses));
        Ok(leeches)
    }

    async fn persist_scheduling(&self, state: &SchedulingState) -> Result<()> {
        let mut entries = self.entries.write().expect("store lock");
        match entries.iter_mut().find(|e| e.word.id == state.card_id) {
            Some(entry) => {
                entry.scheduling = state.clone();
                Ok(())
            }
            None => Err(StoreError::MissingCard(state.card_id)),
        }
    }
}
