//! Error types for gem-distro

use std::time::Duration;

/// Result type for gem-distro operations
pub type Result<T> = std::result::Result<T, Error>;

/// Transient failures of a distribution metadata source.
///
/// A definitive "no such package" is not an error; sources report it as
/// [`SourceAnswer::NotFound`](crate::SourceAnswer::NotFound).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source did not answer within the configured time.
    #[error("{source_name} did not answer for {package} within {timeout:?}")]
    ProbeTimeout {
        source_name: String,
        package: String,
        timeout: Duration,
    },

    /// The repository query tool failed for a reason other than "not found".
    #[error("`{command}` failed: {message}")]
    Command { command: String, message: String },

    /// The repository query tool answered with output we could not read.
    #[error("unexpected output from {command}: missing {field}")]
    UnexpectedOutput { command: String, field: String },

    /// The overlay web API answered with a non-success status.
    #[error("overlay request {url} failed with status {status}")]
    Overlay { url: String, status: u16 },

    /// Transport or decoding failure talking to the overlay.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
