use super::{FileCodec, decode_entities, encode_entities};
use crate::core::{FileSetError, Result};
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Output and directory handling for [`JsonFileCodec`].
#[derive(Debug, Clone)]
pub struct JsonCodecOptions {
    /// Indent written arrays for human inspection
    pub pretty: bool,

    /// Create missing parent directories before writing
    pub create_parent_dirs: bool,
}

impl Default for JsonCodecOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            create_parent_dirs: true,
        }
    }
}

impl JsonCodecOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set pretty printing
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Set parent directory creation
    pub fn create_parent_dirs(mut self, create: bool) -> Self {
        self.create_parent_dirs = create;
        self
    }
}

/// Stores each entity array as a JSON document on the local file system.
///
/// Writes land in a sibling `<name>.tmp` file which is then renamed over the
/// target, so a reader sees either the previous array or the new one.
#[derive(Debug, Clone, Default)]
pub struct JsonFileCodec {
    options: JsonCodecOptions,
}

impl JsonFileCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: JsonCodecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &JsonCodecOptions {
        &self.options
    }
}

#[async_trait]
impl FileCodec for JsonFileCodec {
    async fn load_or_default<T>(&self, path: &Path) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no entity file yet, starting empty");
                return Ok(Vec::new());
            }
            Err(err) => {
                return Err(FileSetError::codec(
                    path,
                    format!("Failed to read file: {}", err),
                ));
            }
        };

        let entities = decode_entities(path, &bytes)?;
        debug!(path = %path.display(), count = entities.len(), "loaded entity array");
        Ok(entities)
    }

    async fn write<T>(&self, path: &Path, entities: &[T]) -> Result<()>
    where
        T: Serialize + Sync,
    {
        let bytes = encode_entities(path, entities, self.options.pretty)?;
        atomic_write(path, &bytes, self.options.create_parent_dirs).await?;
        debug!(path = %path.display(), count = entities.len(), "wrote entity array");
        Ok(())
    }
}

fn temp_path_for(path: &Path) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| FileSetError::codec(path, "Path does not name a file"))?;
    let mut temp_name = OsString::from(file_name);
    temp_name.push(".tmp");
    Ok(path.with_file_name(temp_name))
}

async fn atomic_write(path: &Path, bytes: &[u8], create_parent_dirs: bool) -> Result<()> {
    let tmp = temp_path_for(path)?;

    if create_parent_dirs
        && let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).await.map_err(|err| {
            FileSetError::codec(
                path,
                format!(
                    "Failed to create parent directory '{}': {}",
                    parent.display(),
                    err
                ),
            )
        })?;
    }

    if let Err(err) = fs::write(&tmp, bytes).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(FileSetError::codec(
            path,
            format!("Failed to write temp file '{}': {}", tmp.display(), err),
        ));
    }

    if let Err(err) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(FileSetError::codec(
            path,
            format!(
                "Failed to rename temp file '{}' -> '{}': {}",
                tmp.display(),
                path.display(),
                err
            ),
        ));
    }
    Ok(())
}
