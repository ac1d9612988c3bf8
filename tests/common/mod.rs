//! Shared fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use jsonfileset::{FileCodec, FileSetError, JsonFileCodec, Result};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: u32,
    pub name: String,
    pub active: bool,
}

pub fn customer(id: u32, name: &str) -> Customer {
    Customer {
        id,
        name: name.to_string(),
        active: true,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u32,
    pub customer_id: u32,
    pub total_cents: u64,
}

/// Real JSON files underneath, with every call recorded and an optional
/// path whose writes always fail.
#[derive(Default)]
pub struct RecordingCodec {
    inner: JsonFileCodec,
    loads: Mutex<Vec<PathBuf>>,
    writes: Mutex<Vec<PathBuf>>,
    failing_path: Option<PathBuf>,
}

impl RecordingCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_writes_to(path: impl Into<PathBuf>) -> Self {
        Self {
            failing_path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn loads_of(&self, path: &Path) -> usize {
        self.loads
            .lock()
            .unwrap()
            .iter()
            .filter(|loaded| loaded.as_path() == path)
            .count()
    }

    pub fn writes(&self) -> Vec<PathBuf> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl FileCodec for RecordingCodec {
    async fn load_or_default<T>(&self, path: &Path) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        self.loads.lock().unwrap().push(path.to_path_buf());
        self.inner.load_or_default(path).await
    }

    async fn write<T>(&self, path: &Path, entities: &[T]) -> Result<()>
    where
        T: Serialize + Sync,
    {
        self.writes.lock().unwrap().push(path.to_path_buf());
        if self.failing_path.as_deref() == Some(path) {
            return Err(FileSetError::codec(path, "simulated disk full"));
        }
        self.inner.write(path, entities).await
    }
}
