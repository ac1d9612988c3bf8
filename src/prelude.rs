//! Everything a context definition and its repositories usually need.
//!
//! `FileSet` and `FileContext` are traits, so bringing them into scope is what
//! makes `save`, `path` and `is_loaded` callable on sets and contexts.

pub use crate::codec::{FileCodec, JsonCodecOptions, JsonFileCodec};
pub use crate::context::FileContext;
pub use crate::core::{FileSetError, Result};
pub use crate::provider::{FactoryContextProvider, FileContextOptions, FileContextProvider};
pub use crate::repository::FileContextRepository;
pub use crate::set::{EntityRef, FileSet, JsonFileSet};
