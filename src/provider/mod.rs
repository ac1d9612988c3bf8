//! Supplying ready-to-use contexts.
//!
//! The core only depends on [`FileContextProvider`]. [`FactoryContextProvider`]
//! is a small reference implementation that resolves set files under one
//! root directory and builds a fresh context per request.

use crate::context::FileContext;
use crate::core::{FileSetError, Result};
use async_trait::async_trait;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Source of contexts for units of work.
///
/// Whether contexts are fresh, cached or pooled is up to the implementation.
#[async_trait]
pub trait FileContextProvider<C: FileContext>: Send + Sync {
    async fn get_file_context(&self) -> Result<C>;
}

/// Where a context keeps its set files
#[derive(Debug, Clone)]
pub struct FileContextOptions {
    /// Directory set file names are resolved against
    pub root_dir: PathBuf,

    /// Create the root directory before handing out a context
    pub create_root: bool,
}

impl FileContextOptions {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            create_root: true,
        }
    }

    /// Set the root directory
    pub fn root_dir(mut self, root_dir: impl Into<PathBuf>) -> Self {
        self.root_dir = root_dir.into();
        self
    }

    /// Set whether the root directory is created on demand
    pub fn create_root(mut self, create: bool) -> Self {
        self.create_root = create;
        self
    }

    /// Path of a set file stored under the root directory.
    pub fn resolve(&self, file_name: impl AsRef<Path>) -> PathBuf {
        self.root_dir.join(file_name)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.root_dir.as_os_str().is_empty() {
            return Err("root_dir must not be empty".to_string());
        }
        Ok(())
    }
}

/// Builds a new context from `factory` on every request.
pub struct FactoryContextProvider<C, F> {
    options: FileContextOptions,
    factory: F,
    _context: PhantomData<fn() -> C>,
}

impl<C, F> FactoryContextProvider<C, F>
where
    C: FileContext,
    F: Fn(&FileContextOptions) -> C + Send + Sync,
{
    pub fn new(options: FileContextOptions, factory: F) -> Self {
        Self {
            options,
            factory,
            _context: PhantomData,
        }
    }

    pub fn options(&self) -> &FileContextOptions {
        &self.options
    }
}

#[async_trait]
impl<C, F> FileContextProvider<C> for FactoryContextProvider<C, F>
where
    C: FileContext,
    F: Fn(&FileContextOptions) -> C + Send + Sync,
{
    async fn get_file_context(&self) -> Result<C> {
        self.options.validate().map_err(FileSetError::Provider)?;

        if self.options.create_root {
            fs::create_dir_all(&self.options.root_dir)
                .await
                .map_err(|err| {
                    FileSetError::Provider(format!(
                        "Failed to create context root '{}': {}",
                        self.options.root_dir.display(),
                        err
                    ))
                })?;
        }

        let context = (self.factory)(&self.options);
        debug!(root = %self.options.root_dir.display(), "file context created");
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::set::{FileSet, JsonFileSet};
    use tempfile::TempDir;

    struct NotesContext {
        notes: JsonFileSet<String>,
    }

    impl FileContext for NotesContext {
        fn file_sets(&self) -> Vec<&dyn FileSet> {
            vec![&self.notes]
        }
    }

    fn notes_provider(
        options: FileContextOptions,
    ) -> FactoryContextProvider<NotesContext, impl Fn(&FileContextOptions) -> NotesContext + Send + Sync>
    {
        FactoryContextProvider::new(options, |options| NotesContext {
            notes: JsonFileSet::open(options.resolve("notes.json")),
        })
    }

    #[test]
    fn test_resolve_joins_root() {
        let options = FileContextOptions::new("/var/data").create_root(false);
        assert_eq!(options.resolve("users.json"), PathBuf::from("/var/data/users.json"));
        assert!(!options.create_root);
    }

    #[test]
    fn test_builder_overrides_root_and_provider_keeps_options() {
        let options = FileContextOptions::new("first").root_dir("second");
        assert_eq!(options.root_dir, PathBuf::from("second"));

        let provider = notes_provider(options);
        assert_eq!(provider.options().resolve("notes.json"), PathBuf::from("second/notes.json"));
        assert!(provider.options().create_root);
    }

    #[test]
    fn test_empty_root_is_invalid() {
        assert!(FileContextOptions::new("").validate().is_err());
        assert!(FileContextOptions::new("data").validate().is_ok());
    }

    #[tokio::test]
    async fn test_creates_root_and_resolves_sets() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("store");
        let provider = notes_provider(FileContextOptions::new(&root));

        let context = provider.get_file_context().await.unwrap();

        assert!(root.is_dir());
        assert_eq!(context.notes.path(), root.join("notes.json"));
        assert!(!context.notes.is_loaded());
    }

    #[tokio::test]
    async fn test_each_request_builds_a_fresh_context() {
        let temp_dir = TempDir::new().unwrap();
        let provider = notes_provider(FileContextOptions::new(temp_dir.path()));

        let mut first = provider.get_file_context().await.unwrap();
        first.notes.add("unsaved".to_string()).await.unwrap();

        let mut second = provider.get_file_context().await.unwrap();
        assert_eq!(second.notes.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_root_creation_failure_is_provider_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"file, not a directory").unwrap();
        let provider = notes_provider(FileContextOptions::new(blocker.join("store")));

        let result = provider.get_file_context().await;
        assert!(matches!(result, Err(FileSetError::Provider(_))));
    }

    #[tokio::test]
    async fn test_invalid_options_are_provider_error() {
        let provider = notes_provider(FileContextOptions::new(""));
        let result = provider.get_file_context().await;
        assert!(matches!(result, Err(FileSetError::Provider(_))));
    }
}
