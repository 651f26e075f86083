use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoteError {
    #[error("Root directory does not exist: {path}")]
    RootNotFound { path: PathBuf },

    #[error("Root directory is not readable: {path} ({message})")]
    RootUnreadable { path: PathBuf, message: String },

    #[error("Cannot prepare output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LoteError>;

impl LoteError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::RootNotFound { .. } => 2,
            Self::RootUnreadable { .. } => 3,
            _ => 1,
        }
    }
}
