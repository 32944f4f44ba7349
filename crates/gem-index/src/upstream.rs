//! The upstream gem index collaborator.

use async_trait::async_trait;

use crate::Result;
use crate::catalog::VersionSet;
use crate::release::GemRelease;
use crate::version::Version;

/// Read-only access to a gem index.
#[async_trait]
pub trait UpstreamIndex: Send + Sync {
    /// Every released (name, version) pair of the default gem source.
    async fn load_versions(&self) -> Result<VersionSet>;

    /// Metadata and runtime dependencies of one release.
    async fn release(&self, name: &str, version: &Version) -> Result<GemRelease>;
}
