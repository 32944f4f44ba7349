//! Building and uploading packages from a recipe directory.

use std::path::Path;

use async_trait::async_trait;
use gem_recipe::Recipe;
use tokio::process::Command;

use crate::error::{Error, Result};

/// Turns an updated recipe directory into a published package.
#[async_trait]
pub trait PackageBuilder: Send + Sync {
    async fn build_and_upload(&self, dir: &Path, recipe: &Recipe) -> Result<()>;
}

/// `makepkg -f`, `makepkg -S`, then the upload tool on the source tarball.
#[derive(Debug, Clone)]
pub struct MakepkgBuilder {
    makepkg: String,
    /// Empty means build only.
    uploader: String,
}

impl MakepkgBuilder {
    pub fn new(makepkg: impl Into<String>, uploader: impl Into<String>) -> Self {
        Self {
            makepkg: makepkg.into(),
            uploader: uploader.into(),
        }
    }

    async fn step(&self, dir: &Path, program: &str, args: &[&str]) -> Result<()> {
        let label = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        tracing::info!(dir = %dir.display(), step = %label, "running build step");

        let output = Command::new(program)
            .args(args)
            .current_dir(dir)
            .output()
            .await
            .map_err(|e| Error::Build {
                step: label.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Build {
                step: label,
                message: format!("{}: {}", output.status, stderr.trim()),
            });
        }
        Ok(())
    }
}

impl Default for MakepkgBuilder {
    fn default() -> Self {
        Self::new("makepkg", "burp")
    }
}

#[async_trait]
impl PackageBuilder for MakepkgBuilder {
    async fn build_and_upload(&self, dir: &Path, recipe: &Recipe) -> Result<()> {
        self.step(dir, &self.makepkg, &["-f"]).await?;
        self.step(dir, &self.makepkg, &["-S", "-f"]).await?;

        if self.uploader.is_empty() {
            return Ok(());
        }
        let tarball = source_tarball(recipe);
        self.step(dir, &self.uploader, &[&tarball]).await
    }
}

/// `<pkgname>-<pkgver>-<pkgrel>.src.tar.gz`
pub fn source_tarball(recipe: &Recipe) -> String {
    format!(
        "{}-{}-{}.src.tar.gz",
        recipe.package_name(),
        recipe.gem_version,
        recipe.release
    )
}
