//! In-Memory Store
//!
//! Boards in a map behind an async lock. Nothing survives the process;
//! tests and single-process demos use this one.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{BoardStore, StorageError};
use crate::game::board::Board;

/// Board store backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    games: RwLock<BTreeMap<String, Board>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of games currently held.
    pub async fn len(&self) -> usize {
        self.games.read().await.len()
    }

    /// True when nothing has been created yet.
    pub async fn is_empty(&self) -> bool {
        self.games.read().await.is_empty()
    }
}

#[async_trait]
impl BoardStore for MemoryStore {
    async fn create(&self, id: &str, board: &Board) -> Result<(), StorageError> {
        let mut games = self.games.write().await;
        if games.contains_key(id) {
            return Err(StorageError::AlreadyExists(id.to_string()));
        }
        games.insert(id.to_string(), board.clone());
        Ok(())
    }

    async fn read(&self, id: &str) -> Result<Option<Board>, StorageError> {
        Ok(self.games.read().await.get(id).cloned())
    }

    async fn update(&self, id: &str, board: &Board) -> Result<(), StorageError> {
        match self.games.write().await.get_mut(id) {
            Some(slot) => {
                *slot = board.clone();
                Ok(())
            }
            None => Err(StorageError::Missing(id.to_string())),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
