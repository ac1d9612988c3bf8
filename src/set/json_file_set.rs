use super::{EntityRef, FileSet};
use crate::codec::{FileCodec, JsonFileCodec};
use crate::core::{FileSetError, Result};
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

/// Ordered, in-memory collection of one entity type backed by a single file.
///
/// The file is read lazily, the first time any query or mutation needs the
/// entities, and never again for the lifetime of the set. Only that first
/// read can suspend; once loaded every operation works on the in-memory
/// list. Nothing reaches the file until [`FileSet::save`] is called.
///
/// Change tracking is deliberately coarse: a set that has been loaded is
/// treated as changed and rewrites its whole array on save, while a set that
/// was never touched skips the write entirely.
pub struct JsonFileSet<T, C = JsonFileCodec> {
    path: PathBuf,
    codec: Arc<C>,
    entities: Option<Vec<EntityRef<T>>>,
}

impl<T> JsonFileSet<T, JsonFileCodec>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    /// Creates a set stored as a JSON file at `path` with default options.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(path, Arc::new(JsonFileCodec::new()))
    }
}

impl<T, C> JsonFileSet<T, C>
where
    T: Serialize + DeserializeOwned + Send + Sync,
    C: FileCodec,
{
    pub fn new(path: impl Into<PathBuf>, codec: Arc<C>) -> Self {
        Self {
            path: path.into(),
            codec,
            entities: None,
        }
    }

    pub fn codec(&self) -> &Arc<C> {
        &self.codec
    }

    /// Loads the backing file if that has not happened yet.
    pub async fn load(&mut self) -> Result<()> {
        self.ensure_loaded().await.map(|_| ())
    }

    async fn ensure_loaded(&mut self) -> Result<&mut Vec<EntityRef<T>>> {
        let entities = match self.entities.take() {
            Some(entities) => entities,
            None => {
                let loaded: Vec<EntityRef<T>> = self.codec.load_or_default(&self.path).await?;
                debug!(path = %self.path.display(), count = loaded.len(), "file set loaded");
                loaded
            }
        };
        Ok(self.entities.insert(entities))
    }

    /// Returns the entities present when the call was made, in order.
    ///
    /// The iterator owns a snapshot of the handles, so later additions or
    /// removals do not affect it, while field changes made through the
    /// handles are shared with the set.
    pub async fn enumerate(&mut self) -> Result<std::vec::IntoIter<EntityRef<T>>> {
        let entities = self.ensure_loaded().await?;
        Ok(entities.clone().into_iter())
    }

    pub async fn len(&mut self) -> Result<usize> {
        Ok(self.ensure_loaded().await?.len())
    }

    pub async fn is_empty(&mut self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Appends `entity`. Duplicates are allowed.
    pub async fn add(&mut self, entity: impl Into<EntityRef<T>>) -> Result<EntityRef<T>> {
        let entity = entity.into();
        self.ensure_loaded().await?.push(entity.clone());
        Ok(entity)
    }

    pub async fn add_range<I>(&mut self, entities: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<EntityRef<T>>,
    {
        let loaded = self.ensure_loaded().await?;
        loaded.extend(entities.into_iter().map(Into::into));
        Ok(())
    }

    /// Removes the first occurrence of `entity`; absent entities are ignored.
    pub async fn remove(&mut self, entity: EntityRef<T>) -> Result<EntityRef<T>> {
        let loaded = self.ensure_loaded().await?;
        remove_first(loaded, &entity);
        Ok(entity)
    }

    pub async fn remove_range<I>(&mut self, entities: I) -> Result<()>
    where
        I: IntoIterator<Item = EntityRef<T>>,
    {
        let loaded = self.ensure_loaded().await?;
        for entity in entities {
            remove_first(loaded, &entity);
        }
        Ok(())
    }

    /// Records that `entity` changed.
    ///
    /// A handle already in the set needs nothing: its fields are the stored
    /// entity's fields. An unknown handle is appended, as with `add`.
    ///
    /// Any handle worth updating came out of this set, so calling this before
    /// the set has loaded is a caller bug and fails with
    /// [`FileSetError::UsageContractViolation`].
    pub fn update(&mut self, entity: EntityRef<T>) -> Result<EntityRef<T>> {
        let loaded = self.loaded_mut("update")?;
        if !loaded.contains(&entity) {
            loaded.push(entity.clone());
        }
        Ok(entity)
    }

    pub fn update_range<I>(&mut self, entities: I) -> Result<()>
    where
        I: IntoIterator<Item = EntityRef<T>>,
    {
        for entity in entities {
            self.update(entity)?;
        }
        Ok(())
    }

    fn loaded_mut(&mut self, operation: &str) -> Result<&mut Vec<EntityRef<T>>> {
        let path = &self.path;
        self.entities.as_mut().ok_or_else(|| {
            FileSetError::UsageContractViolation(format!(
                "{} called on file set '{}' before its entities were loaded",
                operation,
                path.display()
            ))
        })
    }
}

fn remove_first<T>(entities: &mut Vec<EntityRef<T>>, entity: &EntityRef<T>) {
    if let Some(position) = entities.iter().position(|candidate| candidate == entity) {
        entities.remove(position);
    }
}

#[async_trait]
impl<T, C> FileSet for JsonFileSet<T, C>
where
    T: Serialize + DeserializeOwned + Send + Sync,
    C: FileCodec,
{
    fn path(&self) -> &Path {
        &self.path
    }

    fn is_loaded(&self) -> bool {
        self.entities.is_some()
    }

    async fn save(&self) -> Result<()> {
        let Some(entities) = &self.entities else {
            trace!(path = %self.path.display(), "file set never loaded, skipping save");
            return Ok(());
        };
        if let Some(index) = entities.iter().position(EntityRef::is_poisoned) {
            return Err(FileSetError::LockError(format!(
                "entity {} of '{}' is poisoned",
                index,
                self.path.display()
            )));
        }
        self.codec.write(&self.path, entities.as_slice()).await
    }
}
