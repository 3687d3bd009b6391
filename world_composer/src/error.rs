//! Error types for world composition

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading, merging or writing world files
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid world structure: {0}")]
    Structure(String),

    #[error("Invalid configuration '{path}': {message}")]
    Config { path: PathBuf, message: String },

    #[error("Seed range starting at {first} with {count} seeds exceeds u32")]
    SeedRange { first: u32, count: u32 },

    #[error("Failed to serialize world: {0}")]
    Serialize(String),

    #[error("Pair {index} failed: {source}")]
    Pair {
        index: u32,
        #[source]
        source: Box<ComposeError>,
    },
}

impl ComposeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn missing_world() -> Self {
        Self::Structure("missing world element".to_string())
    }
}

/// Result type for composition operations
pub type ComposeResult<T> = Result<T, ComposeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure_error_message() {
        let err = ComposeError::missing_world();
        assert_eq!(
            err.to_string(),
            "Invalid world structure: missing world element"
        );
    }

    #[test]
    fn test_pair_error_keeps_source() {
        let err = ComposeError::Pair {
            index: 7,
            source: Box::new(ComposeError::missing_world()),
        };
        let msg = err.to_string();
        assert!(msg.contains("Pair 7"));
        assert!(msg.contains("missing world element"));
    }
}
