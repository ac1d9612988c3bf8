//! Entity sets: typed, lazily loaded collections each backed by one file.

use crate::core::Result;
use async_trait::async_trait;
use std::path::Path;

mod entity;
mod json_file_set;

pub use entity::EntityRef;
pub use json_file_set::JsonFileSet;

/// Type-erased view of an entity set, enough for a context to save it.
///
/// Typed access (enumerate, add, remove, update) lives on the concrete set;
/// this trait lets a context hold sets of different entity types side by
/// side.
#[async_trait]
pub trait FileSet: Send + Sync {
    /// The file backing this set.
    fn path(&self) -> &Path;

    /// Whether the entities have been read from storage.
    fn is_loaded(&self) -> bool;

    /// Writes the full in-memory array if the set was ever loaded.
    async fn save(&self) -> Result<()>;
}
