//! Error types for gem-recipe

use std::path::PathBuf;

/// Result type for gem-recipe operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur reading, parsing or writing recipes
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The text violates the recipe format contract.
    #[error("malformed recipe: {reason}")]
    MalformedRecipe { reason: String },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("lock acquisition failed for {}", .path.display())]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedRecipe {
            reason: reason.into(),
        }
    }
}
