//! Error types for mirrorc
//!
//! Uses `thiserror` for library errors; the binary wraps these in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for mirrorc operations
pub type MirrorResult<T> = Result<T, MirrorError>;

/// Main error type for mirrorc operations
#[derive(Error, Debug)]
pub enum MirrorError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Source or output root does not exist
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Backend rejected a source file. The `Compile Error:` prefix is part
    /// of the surface consumers match on; keep it stable.
    #[error("Compile Error: {message}")]
    Compile { file: PathBuf, message: String },

    /// Invalid configuration file
    #[error("invalid config in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },
}

impl MirrorError {
    /// Source-relative path of the failing file, when this is a compile error.
    pub fn file(&self) -> Option<&PathBuf> {
        match self {
            MirrorError::Compile { file, .. } => Some(file),
            _ => None,
        }
    }
}
