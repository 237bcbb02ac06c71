//! Core study engine shared by the lexideck applications.
//!
//! Provides:
//! - SM-2 spaced repetition scheduler (grading, stage classification, previews)
//! - Study queue builder composing due/new/leech subsets from a storage backend
//! - Stateful study session iterator with progress and timing
//! - Shared types (Word, SchedulingState, Grade, Scope, etc.)

pub mod clock;
pub mod error;
pub mod queue;
pub mod scheduler;
pub mod session;
pub mod store;
pub mod types;

pub use clock::{Clock, SystemClock};
pub use error::{QueueError, StoreError};
pub use queue::{build_queue, QueueConfig, StudyQueue};
pub use scheduler::{is_due, mode_of, PreviewIntervals, Sm2};
pub use session::{Progress, StudySession};
pub use store::{MemoryStore, StudyStore};
pub use types::{CardStage, Grade, Scope, SchedulingState, Word, WordWithScheduling};
