// ============================================================================
// jsonfileset Library
// ============================================================================

//! Typed entity storage without a database.
//!
//! A [`FileContext`] owns a fixed group of [`JsonFileSet`]s, one per entity
//! type. Each set is an ordered, in-memory list backed by a single JSON array
//! file: it is read the first time it is used, mutated in memory, and written
//! back in full when the context (or the set) is saved.
//!
//! ```no_run
//! use jsonfileset::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Customer {
//!     name: String,
//!     active: bool,
//! }
//!
//! struct ShopContext {
//!     customers: JsonFileSet<Customer>,
//! }
//!
//! impl FileContext for ShopContext {
//!     fn file_sets(&self) -> Vec<&dyn FileSet> {
//!         vec![&self.customers]
//!     }
//! }
//!
//! # async fn run() -> jsonfileset::Result<()> {
//! let mut context = ShopContext {
//!     customers: JsonFileSet::open("data/customers.json"),
//! };
//!
//! let ada = context
//!     .customers
//!     .add(Customer { name: "Ada".to_string(), active: false })
//!     .await?;
//! ada.with_mut(|customer| customer.active = true)?;
//!
//! context.save().await?;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod context;
pub mod core;
pub mod prelude;
pub mod provider;
pub mod repository;
pub mod set;

// Re-export main types for convenience
pub use crate::codec::{FileCodec, InMemoryFileCodec, JsonCodecOptions, JsonFileCodec};
pub use crate::context::FileContext;
pub use crate::core::{FileSetError, Result};
pub use crate::provider::{FactoryContextProvider, FileContextOptions, FileContextProvider};
pub use crate::repository::FileContextRepository;
pub use crate::set::{EntityRef, FileSet, JsonFileSet};
