//! File-Backed Store
//!
//! One JSON document per game id inside a configured directory. Good
//! enough for games shared through a common filesystem. No locking and
//! no retries: the last writer wins, exactly like the rest of the
//! storage model.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::{BoardStore, StorageError};
use crate::game::board::Board;

/// Board store writing one `<id>.json` per game.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    /// Directory the documents live in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Document path for `id`. Ids that could escape the directory or
    /// hide from a listing are refused.
    fn path_of(&self, id: &str) -> Result<PathBuf, StorageError> {
        if id.is_empty() || id.starts_with('.') || id.contains('/') || id.contains('\\') {
            return Err(StorageError::InvalidId(id.to_string()));
        }
        Ok(self.dir.join(format!("{id}.json")))
    }
}

#[async_trait]
impl BoardStore for FileStore {
    async fn create(&self, id: &str, board: &Board) -> Result<(), StorageError> {
        let path = self.path_of(id)?;
        let json = serde_json::to_vec_pretty(board)?;
        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(StorageError::AlreadyExists(id.to_string()));
            }
            Err(err) => return Err(err.into()),
        };
        file.write_all(&json).await?;
        file.flush().await?;
        debug!(game = id, path = %path.display(), "created game document");
        Ok(())
    }

    async fn read(&self, id: &str) -> Result<Option<Board>, StorageError> {
        let path = self.path_of(id)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    async fn update(&self, id: &str, board: &Board) -> Result<(), StorageError> {
        let path = self.path_of(id)?;
        match tokio::fs::metadata(&path).await {
            Ok(_) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::Missing(id.to_string()));
            }
            Err(err) => return Err(err.into()),
        }
        let json = serde_json::to_vec_pretty(board)?;
        tokio::fs::write(&path, json).await?;
        debug!(game = id, "updated game document");
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
