//! Loading and writing entity arrays at a path.
//!
//! A [`FileCodec`] is the only component that touches storage. Entity sets
//! hand it a path and either receive the decoded array or a full array to
//! persist; nothing is ever written incrementally.

use crate::core::{FileSetError, Result};
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::path::Path;

mod json;
mod memory;

pub use json::{JsonCodecOptions, JsonFileCodec};
pub use memory::InMemoryFileCodec;

/// Storage collaborator used by entity sets.
#[async_trait]
pub trait FileCodec: Send + Sync {
    /// Loads the array stored at `path`.
    ///
    /// A path that does not exist, or holds no content, yields an empty
    /// array. Malformed content is a [`FileSetError::Codec`].
    async fn load_or_default<T>(&self, path: &Path) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send;

    /// Replaces whatever is stored at `path` with `entities`.
    ///
    /// Readers never observe a partially written array.
    async fn write<T>(&self, path: &Path, entities: &[T]) -> Result<()>
    where
        T: Serialize + Sync;
}

/// Decodes raw stored bytes, treating blank content and `null` as empty.
pub(crate) fn decode_entities<T: DeserializeOwned>(path: &Path, bytes: &[u8]) -> Result<Vec<T>> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let entities: Option<Vec<T>> = serde_json::from_slice(bytes).map_err(|err| {
        FileSetError::codec(path, format!("Failed to decode entity array: {}", err))
    })?;
    Ok(entities.unwrap_or_default())
}

pub(crate) fn encode_entities<T: Serialize>(
    path: &Path,
    entities: &[T],
    pretty: bool,
) -> Result<Vec<u8>> {
    let encoded = if pretty {
        serde_json::to_vec_pretty(entities)
    } else {
        serde_json::to_vec(entities)
    };
    encoded.map_err(|err| {
        FileSetError::codec(path, format!("Failed to encode entity array: {}", err))
    })
}
