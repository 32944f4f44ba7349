//! Error types for gem-core

use std::path::PathBuf;

/// Result type for gem-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gem-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The downloaded artifact does not hash to the digest the index advertises.
    #[error("checksum mismatch for {artifact}: index says {expected}, downloaded {actual}")]
    ChecksumMismatch {
        artifact: String,
        expected: String,
        actual: String,
    },

    /// Artifact download failed.
    #[error("download of {url} failed with status {status}")]
    Download { url: String, status: u16 },

    /// This checksum kind cannot be computed.
    #[error("unsupported checksum kind: {kind}")]
    UnsupportedChecksum { kind: String },

    /// No release of the gem is published (in the requested slot).
    #[error("no upstream release of {gem}{}", slot_label(.slot))]
    NoUpstreamRelease { gem: String, slot: Option<String> },

    /// External build or upload step failed.
    #[error("{step} failed: {message}")]
    Build { step: String, message: String },

    /// The artifact is not a readable `.gem` archive.
    #[error("cannot read gemspec of {artifact}: {message}")]
    Gemspec { artifact: String, message: String },

    /// Version-control operation failed
    #[error("git {operation} failed: {source}")]
    Git {
        operation: &'static str,
        #[source]
        source: git2::Error,
    },

    /// The path cannot be committed to a repository working tree.
    #[error("{}: {message}", .path.display())]
    Repository { path: PathBuf, message: String },

    /// Configuration file is invalid
    #[error("invalid configuration {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    // Transparent wrappers for underlying crate errors
    /// Error from gem-index
    #[error(transparent)]
    Index(#[from] gem_index::Error),

    /// Error from gem-distro
    #[error(transparent)]
    Distro(#[from] gem_distro::Error),

    /// Error from gem-recipe
    #[error(transparent)]
    Recipe(#[from] gem_recipe::Error),

    /// HTTP transport error
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn gemspec(artifact: &str, message: impl ToString) -> Self {
        Self::Gemspec {
            artifact: artifact.to_string(),
            message: message.to_string(),
        }
    }

    pub(crate) fn git(operation: &'static str) -> impl FnOnce(git2::Error) -> Self {
        move |source| Self::Git { operation, source }
    }
}

fn slot_label(slot: &Option<String>) -> String {
    slot.as_deref()
        .map(|s| format!(" in slot {s}"))
        .unwrap_or_default()
}
