use super::{FileCodec, decode_entities, encode_entities};
use crate::core::Result;
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

#[derive(Debug, Default)]
struct MemoryFiles {
    contents: HashMap<PathBuf, Vec<u8>>,
    loads: HashMap<PathBuf, usize>,
    writes: Vec<PathBuf>,
}

/// Process-local codec keeping each array as encoded JSON bytes keyed by path.
///
/// Useful for tests and tooling that want set semantics without touching
/// disk. Every load and write is recorded so callers can observe how often
/// storage was reached.
#[derive(Debug, Default)]
pub struct InMemoryFileCodec {
    files: Mutex<MemoryFiles>,
}

impl InMemoryFileCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `path` with raw content, as if a previous process had written it.
    pub fn insert_raw(&self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) -> Result<()> {
        let mut files = self.files.lock()?;
        files.contents.insert(path.into(), bytes.into());
        Ok(())
    }

    /// Returns the stored content for `path`, if any write or seed happened.
    pub fn contents(&self, path: impl AsRef<Path>) -> Result<Option<Vec<u8>>> {
        let files = self.files.lock()?;
        Ok(files.contents.get(path.as_ref()).cloned())
    }

    /// Number of loads requested for `path`.
    pub fn load_count(&self, path: impl AsRef<Path>) -> Result<usize> {
        let files = self.files.lock()?;
        Ok(files.loads.get(path.as_ref()).copied().unwrap_or(0))
    }

    /// Paths written so far, in write order.
    pub fn write_log(&self) -> Result<Vec<PathBuf>> {
        let files = self.files.lock()?;
        Ok(files.writes.clone())
    }
}

#[async_trait]
impl FileCodec for InMemoryFileCodec {
    async fn load_or_default<T>(&self, path: &Path) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        let stored = {
            let mut files = self.files.lock()?;
            *files.loads.entry(path.to_path_buf()).or_insert(0) += 1;
            files.contents.get(path).cloned()
        };

        match stored {
            Some(bytes) => decode_entities(path, &bytes),
            None => Ok(Vec::new()),
        }
    }

    async fn write<T>(&self, path: &Path, entities: &[T]) -> Result<()>
    where
        T: Serialize + Sync,
    {
        let bytes = encode_entities(path, entities, false)?;
        let mut files = self.files.lock()?;
        files.contents.insert(path.to_path_buf(), bytes);
        files.writes.push(path.to_path_buf());
        debug!(path = %path.display(), count = entities.len(), "stored entity array in memory");
        Ok(())
    }
}
