use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileSetError {
    #[error("Codec error for '{}': {message}", .path.display())]
    Codec { path: PathBuf, message: String },

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Usage contract violation: {0}")]
    UsageContractViolation(String),

    #[error("Lock error: {0}")]
    LockError(String),
}

impl FileSetError {
    pub fn codec(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Codec {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FileSetError>;

impl<T> From<std::sync::PoisonError<T>> for FileSetError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::LockError(err.to_string())
    }
}
