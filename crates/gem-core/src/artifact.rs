//! Gem artifact downloads and digests.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use gem_index::{GemRelease, Version};
use gem_recipe::ChecksumKind;
use sha2::{Digest, Sha256, Sha512};

use crate::error::{Error, Result};
use crate::gemspec::GemSpec;

/// Downloads `.gem` files.
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    async fn download(&self, name: &str, version: &Version) -> Result<Vec<u8>>;
}

/// `<base>/downloads/<name>-<version>.gem` over HTTP.
#[derive(Debug, Clone)]
pub struct RubyGemsArtifacts {
    client: reqwest::Client,
    base_url: String,
}

impl RubyGemsArtifacts {
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

#[async_trait]
impl ArtifactFetcher for RubyGemsArtifacts {
    async fn download(&self, name: &str, version: &Version) -> Result<Vec<u8>> {
        let url = format!("{}/downloads/{}", self.base_url, file_name(name, version));
        tracing::debug!(url, "downloading gem");

        let response = self
            .client
            .get(&url)
            .header("User-Agent", concat!("gembridge/", env!("CARGO_PKG_VERSION")))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Download {
                url,
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// A verified gem download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    /// Hex digest in the recipe's checksum kind.
    pub checksum: String,
    /// Specification read from the archive.
    pub spec: GemSpec,
    bytes: Vec<u8>,
}

impl Artifact {
    /// Download the artifact of `release`, check it against the SHA-256 the
    /// index advertises, read its gemspec, and digest it with `kind`.
    pub async fn fetch(
        fetcher: &dyn ArtifactFetcher,
        release: &GemRelease,
        kind: ChecksumKind,
    ) -> Result<Self> {
        let bytes = fetcher.download(&release.name, &release.version).await?;
        let file_name = file_name(&release.name, &release.version);

        if let Some(expected) = &release.checksum {
            let actual = digest(ChecksumKind::Sha256, &bytes)?;
            if !actual.eq_ignore_ascii_case(expected) {
                return Err(Error::ChecksumMismatch {
                    artifact: file_name,
                    expected: expected.clone(),
                    actual,
                });
            }
        }

        let spec = GemSpec::from_gem(&file_name, &bytes)?;
        Ok(Self {
            checksum: digest(kind, &bytes)?,
            spec,
            file_name,
            bytes,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Fill in what only the archive knows about `release`.
    pub fn complete(&self, release: &mut GemRelease) {
        release.has_extensions = self.spec.has_extensions();
    }

    /// Write the artifact next to its recipe; returns the file path.
    pub fn save_into(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        gem_recipe::write_atomic(&path, &self.bytes)?;
        Ok(path)
    }
}

/// `<name>-<version>.gem`
pub fn file_name(name: &str, version: &Version) -> String {
    format!("{name}-{version}.gem")
}

/// Lowercase hex digest of `bytes`.
pub fn digest(kind: ChecksumKind, bytes: &[u8]) -> Result<String> {
    match kind {
        ChecksumKind::Sha256 => Ok(format!("{:x}", Sha256::digest(bytes))),
        ChecksumKind::Sha512 => Ok(format!("{:x}", Sha512::digest(bytes))),
        ChecksumKind::Sha1 => Err(Error::UnsupportedChecksum {
            kind: kind.to_string(),
        }),
    }
}
