//! Persistence Seam
//!
//! Shared games live in a store keyed by game id. The store holds the
//! board as an opaque value; all game meaning stays in [`crate::game`].
//!
//! The contract is deliberately narrow: `create` claims a fresh id,
//! `read` fetches whatever is current, `update` replaces an existing
//! entry. There is no delete and no concurrency token; the last writer
//! wins and stale readers are corrected by their next refresh.

use async_trait::async_trait;

use crate::game::board::Board;
use crate::game::ErrorKind;

pub mod file;
pub mod memory;

// Re-export the store implementations
pub use file::FileStore;
pub use memory::MemoryStore;

/// Failures raised by a board store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// `create` named an id that is already taken.
    #[error("Game {0:?} already exists")]
    AlreadyExists(String),

    /// `update` named an id nothing was created under.
    #[error("Game {0:?} does not exist")]
    Missing(String),

    /// The id cannot name a stored document.
    #[error("Invalid game id {0:?}")]
    InvalidId(String),

    /// The underlying medium failed.
    #[error("Storage io: {0}")]
    Io(#[from] std::io::Error),

    /// A stored document could not be decoded.
    #[error("Corrupt stored board: {0}")]
    Corrupt(#[from] serde_json::Error),
}

impl StorageError {
    /// Classify for presentation. Store failures are never the shape of
    /// the command, so none of them earn a usage hint.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidState
    }
}

/// Keyed board persistence used by shared games.
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Store the opening board under a fresh id.
    ///
    /// Fails with [`StorageError::AlreadyExists`] when the id is taken.
    async fn create(&self, id: &str, board: &Board) -> Result<(), StorageError>;

    /// Fetch the current board under `id`, or `None` when absent.
    async fn read(&self, id: &str) -> Result<Option<Board>, StorageError>;

    /// Replace the board under an existing `id`.
    ///
    /// Fails with [`StorageError::Missing`] when nothing was created
    /// there.
    async fn update(&self, id: &str, board: &Board) -> Result<(), StorageError>;
}
