//! Error types for the study engine.

use thiserror::Error;

/// Errors surfaced by a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("no scheduling state for card {0}")]
    MissingCard(i64),
}

/// Failure of a queue build, naming the subset fetch that failed.
///
/// Partial success is not a success: any one failed fetch fails the whole
/// composition.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("failed to fetch due cards")]
    Due(#[source] StoreError),

    #[error("failed to fetch new cards")]
    New(#[source] StoreError),

    #[error("failed to fetch leeches")]
    Leeches(#[source] StoreError),
}
