pub mod error;

pub use error::{FileSetError, Result};
