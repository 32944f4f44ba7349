//! Error types for gem-index

/// Result type for gem-index operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading versions, constraints or the upstream index
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A version string is not a dot-separated list of numbers.
    #[error("invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    /// A requirement uses an operator or combination outside `~>`, `=` and `>=`.
    #[error("unsupported constraint '{constraint}': {reason}")]
    UnsupportedConstraint { constraint: String, reason: String },

    /// No published release satisfies the dependency.
    #[error("cannot resolve gem dependency {dependency}")]
    Unsatisfiable { dependency: String },

    /// The upstream index answered with a non-success status.
    #[error("upstream index request {url} failed with status {status}")]
    Index { url: String, status: u16 },

    /// Transport or decoding failure talking to the upstream index.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl Error {
    pub(crate) fn invalid_version(version: &str, reason: impl Into<String>) -> Self {
        Self::InvalidVersion {
            version: version.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported(constraint: &str, reason: impl Into<String>) -> Self {
        Self::UnsupportedConstraint {
            constraint: constraint.to_string(),
            reason: reason.into(),
        }
    }
}
