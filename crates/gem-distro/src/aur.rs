//! Community overlay lookups through the AUR RPC interface.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::info::{DistroPackageInfo, Provenance, SourceAnswer, upstream_version};
use crate::source::CommunityOverlay;

/// Default AUR endpoint.
pub const DEFAULT_AUR_URL: &str = "https://aur.archlinux.org";

/// Client for the AUR `/rpc/v5/info` endpoint.
#[derive(Debug, Clone)]
pub struct AurClient {
    client: reqwest::Client,
    base_url: String,
}

impl AurClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for AurClient {
    fn default() -> Self {
        Self::new(DEFAULT_AUR_URL)
    }
}

#[derive(Debug, Deserialize)]
struct InfoResponse {
    resultcount: u32,
    #[serde(default)]
    results: Vec<InfoResult>,
}

#[derive(Debug, Deserialize)]
struct InfoResult {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Version")]
    version: String,
}

#[async_trait]
impl CommunityOverlay for AurClient {
    fn name(&self) -> &str {
        "aur"
    }

    async fn query(&self, package: &str) -> Result<SourceAnswer> {
        let url = format!("{}/rpc/v5/info", self.base_url);
        tracing::debug!(package, url = %url, "querying AUR");

        let response = self
            .client
            .get(&url)
            .query(&[("arg[]", package)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Overlay {
                url,
                status: status.as_u16(),
            });
        }

        let body: InfoResponse = response.json().await?;
        if body.resultcount == 0 {
            return Ok(SourceAnswer::NotFound);
        }

        let Some(result) = body.results.into_iter().find(|r| r.name == package) else {
            return Ok(SourceAnswer::NotFound);
        };

        Ok(SourceAnswer::Found(DistroPackageInfo {
            info_url: format!("{}/packages/{}/", self.base_url, result.name),
            version: upstream_version(&result.version),
            name: result.name,
            provenance: Provenance::CommunityOverlay,
        }))
    }
}
