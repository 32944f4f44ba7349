//! `gembridge.toml` loading.
//!
//! Every field has a default, so an absent or partial file is fine. Lookup
//! order: an explicit path, then `<root>/gembridge.toml`, then the user's
//! config directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use gem_recipe::{ChecksumKind, RecipeTemplate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// File name looked up in the recipes root.
pub const CONFIG_FILENAME: &str = "gembridge.toml";

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Package namespace for gems, e.g. `ruby` for `ruby-rack`.
    pub distro_prefix: String,
    /// Gems shipped with the interpreter package; never packaged separately.
    pub excluded_gems: Vec<String>,
    pub rubygems_url: String,
    pub aur_url: String,
    pub pacman_command: String,
    pub makepkg_command: String,
    /// Upload tool handed the source tarball; empty disables upload.
    pub upload_command: String,
    pub probe_timeout_secs: u64,
    /// Maintainer for new recipes when no git identity is configured.
    pub fallback_maintainer: Option<String>,
    /// `sha256` or `sha512`.
    pub checksum: String,
    /// Non-gem dependencies seeded into new recipes.
    pub native_dependencies: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            distro_prefix: "ruby".to_string(),
            excluded_gems: vec!["rake".to_string(), "rdoc".to_string()],
            rubygems_url: gem_index::DEFAULT_RUBYGEMS_URL.to_string(),
            aur_url: gem_distro::DEFAULT_AUR_URL.to_string(),
            pacman_command: "pacman".to_string(),
            makepkg_command: "makepkg".to_string(),
            upload_command: "burp".to_string(),
            probe_timeout_secs: gem_distro::DEFAULT_PROBE_TIMEOUT.as_secs(),
            fallback_maintainer: None,
            checksum: "sha256".to_string(),
            native_dependencies: vec!["ruby".to_string()],
        }
    }
}

impl Config {
    /// Parse configuration text; `origin` only labels errors.
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self> {
        let config: Config = toml::from_str(text).map_err(|e| Error::Config {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate(origin)?;
        Ok(config)
    }

    /// Load from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&text, path)
    }

    /// Resolve and load the configuration for a run.
    ///
    /// An `explicit` path must exist; the other locations are optional and
    /// defaults apply when none is present.
    pub fn discover(explicit: Option<&Path>, root: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidates = [
            Some(root.join(CONFIG_FILENAME)),
            user_config_path(),
        ];
        for path in candidates.into_iter().flatten() {
            if path.is_file() {
                tracing::debug!(path = %path.display(), "loading configuration");
                return Self::load(&path);
            }
        }

        tracing::debug!("no configuration file, using defaults");
        Ok(Self::default())
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn checksum_kind(&self) -> Result<ChecksumKind> {
        match self.checksum.parse::<ChecksumKind>() {
            Ok(kind @ (ChecksumKind::Sha256 | ChecksumKind::Sha512)) => Ok(kind),
            _ => Err(Error::UnsupportedChecksum {
                kind: self.checksum.clone(),
            }),
        }
    }

    pub fn is_excluded(&self, gem: &str) -> bool {
        self.excluded_gems.iter().any(|g| g == gem)
    }

    /// Settings for recipes created from scratch.
    pub fn recipe_template(&self) -> Result<RecipeTemplate> {
        Ok(RecipeTemplate {
            prefix: self.distro_prefix.clone(),
            native_dependencies: self.native_dependencies.clone(),
            download_url: self.rubygems_url.clone(),
            checksum_kind: self.checksum_kind()?,
        })
    }

    fn validate(&self, origin: &Path) -> Result<()> {
        let invalid = |message: &str| Error::Config {
            path: origin.to_path_buf(),
            message: message.to_string(),
        };
        if self.distro_prefix.is_empty() || self.distro_prefix.contains(['/', ' ']) {
            return Err(invalid("distro_prefix must be a non-empty package name fragment"));
        }
        if self.probe_timeout_secs == 0 {
            return Err(invalid("probe_timeout_secs must be positive"));
        }
        self.checksum_kind().map_err(|e| invalid(&e.to_string()))?;
        Ok(())
    }
}

/// `~/.config/gembridge/config.toml` on Linux.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("gembridge").join("config.toml"))
}
