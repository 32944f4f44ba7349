//! Distribution metadata collaborators.

use async_trait::async_trait;

use crate::Result;
use crate::info::SourceAnswer;

/// The official binary repositories, cheap to query and authoritative.
#[async_trait]
pub trait OfficialRepository: Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &str;

    async fn query(&self, package: &str) -> Result<SourceAnswer>;
}

/// The community overlay, consulted only when the official repositories
/// definitively lack a package.
#[async_trait]
pub trait CommunityOverlay: Send + Sync {
    fn name(&self) -> &str;

    async fn query(&self, package: &str) -> Result<SourceAnswer>;
}
