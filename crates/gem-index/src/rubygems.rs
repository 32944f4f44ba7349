//! HTTP client for rubygems.org (or a compatible mirror).
//!
//! Versions come from the compact index `versions` file; release metadata
//! from the v2 JSON API.

use async_trait::async_trait;
use serde::Deserialize;

use crate::Result;
use crate::catalog::VersionSet;
use crate::constraint::Constraint;
use crate::error::Error;
use crate::release::{Dependency, GemRelease};
use crate::upstream::UpstreamIndex;
use crate::version::Version;

/// Default gem source.
pub const DEFAULT_RUBYGEMS_URL: &str = "https://rubygems.org";

/// [`UpstreamIndex`] backed by the rubygems.org HTTP endpoints.
#[derive(Debug, Clone)]
pub struct RubyGemsIndex {
    client: reqwest::Client,
    base_url: String,
}

impl RubyGemsIndex {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        tracing::debug!(url, "querying gem index");
        let response = self
            .client
            .get(url)
            .header("User-Agent", concat!("gembridge/", env!("CARGO_PKG_VERSION")))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Index {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

impl Default for RubyGemsIndex {
    fn default() -> Self {
        Self::new(DEFAULT_RUBYGEMS_URL)
    }
}

#[async_trait]
impl UpstreamIndex for RubyGemsIndex {
    async fn load_versions(&self) -> Result<VersionSet> {
        let url = format!("{}/versions", self.base_url);
        let body = self.get(&url).await?.text().await?;
        let set = parse_compact_versions(&body);
        tracing::info!(gems = set.gem_count(), releases = set.len(), "loaded gem index");
        Ok(set)
    }

    async fn release(&self, name: &str, version: &Version) -> Result<GemRelease> {
        let url = format!(
            "{}/api/v2/rubygems/{}/versions/{}.json",
            self.base_url, name, version
        );
        let document: ReleaseDocument = self.get(&url).await?.json().await?;
        document.into_release()
    }
}

/// Parse the compact index `versions` file.
///
/// After the `---` separator every line reads `name v1,v2,... checksum`.
/// Later lines append releases; a version written as `-v` is a yank. Platform
/// builds (`1.0-java`) and prereleases are skipped.
pub fn parse_compact_versions(body: &str) -> VersionSet {
    let mut set = VersionSet::new();

    let lines = match body.split_once("\n---\n") {
        Some((_, rest)) => rest,
        None => body.strip_prefix("---\n").unwrap_or(body),
    };

    for line in lines.lines() {
        let mut fields = line.split_whitespace();
        let (Some(name), Some(versions)) = (fields.next(), fields.next()) else {
            continue;
        };

        for raw in versions.split(',') {
            let (yanked, raw) = match raw.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, raw),
            };
            if raw.contains('-') {
                continue;
            }
            let Ok(version) = Version::parse(raw) else {
                continue;
            };
            if yanked {
                set.remove(name, &version);
            } else {
                set.insert(name, version);
            }
        }
    }

    set
}

#[derive(Debug, Deserialize)]
struct ReleaseDocument {
    name: String,
    version: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    info: Option<String>,
    #[serde(default)]
    homepage_uri: Option<String>,
    #[serde(default)]
    licenses: Option<Vec<String>>,
    #[serde(default)]
    sha: Option<String>,
    #[serde(default)]
    dependencies: DependencyGroups,
}

#[derive(Debug, Default, Deserialize)]
struct DependencyGroups {
    #[serde(default)]
    runtime: Vec<DependencyDocument>,
}

#[derive(Debug, Deserialize)]
struct DependencyDocument {
    name: String,
    requirements: String,
}

impl ReleaseDocument {
    fn into_release(self) -> Result<GemRelease> {
        let version = Version::parse(&self.version)?;
        let runtime_dependencies = self
            .dependencies
            .runtime
            .into_iter()
            .map(|d| Ok(Dependency::new(d.name, Constraint::parse_requirements(&d.requirements)?)))
            .collect::<Result<Vec<_>>>()?;

        let summary = self
            .summary
            .filter(|s| !s.trim().is_empty())
            .or(self.info)
            .unwrap_or_default();

        Ok(GemRelease {
            name: self.name,
            version,
            summary: summary.trim().to_string(),
            homepage: self.homepage_uri.filter(|h| !h.is_empty()),
            licenses: self.licenses.unwrap_or_default(),
            runtime_dependencies,
            // source gems report platform "ruby" even when they compile C
            has_extensions: false,
            checksum: self.sha,
        })
    }
}
