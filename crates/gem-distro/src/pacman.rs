//! Official repository lookups through `pacman -Si`.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tokio::process::Command;

use crate::error::{Error, Result};
use crate::info::{DistroPackageInfo, Provenance, SourceAnswer, upstream_version};
use crate::source::OfficialRepository;

static FIELD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(Repository|Version|Architecture)\s*:\s*(.*?)\s*$").unwrap());

/// Queries the local sync databases with the pacman command.
#[derive(Debug, Clone)]
pub struct PacmanRepository {
    command: String,
}

impl PacmanRepository {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for PacmanRepository {
    fn default() -> Self {
        Self::new("pacman")
    }
}

#[async_trait]
impl OfficialRepository for PacmanRepository {
    fn name(&self) -> &str {
        "pacman"
    }

    async fn query(&self, package: &str) -> Result<SourceAnswer> {
        let invocation = format!("{} -Si {}", self.command, package);
        let output = Command::new(&self.command)
            .arg("-Si")
            .arg(package)
            .output()
            .await
            .map_err(|e| Error::Command {
                command: invocation.clone(),
                message: e.to_string(),
            })?;

        if output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            return parse_pacman_info(package, &stdout).map(SourceAnswer::Found);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if is_not_found(&stderr) {
            return Ok(SourceAnswer::NotFound);
        }

        Err(Error::Command {
            command: invocation,
            message: format!(
                "exit status {}: {}",
                output.status.code().map_or("signal".to_string(), |c| c.to_string()),
                stderr.trim()
            ),
        })
    }
}

/// `pacman` prints `error: package 'x' was not found` for unknown names.
fn is_not_found(stderr: &str) -> bool {
    stderr.contains("was not found")
}

/// Extract repository, version and architecture from `pacman -Si` output.
///
/// When several repositories carry the package, the first block wins, which
/// is the one pacman itself would install.
pub fn parse_pacman_info(package: &str, output: &str) -> Result<DistroPackageInfo> {
    let first_block = output.split("\n\n").next().unwrap_or(output);

    let mut repository = None;
    let mut version = None;
    let mut architecture = None;
    for caps in FIELD_PATTERN.captures_iter(first_block) {
        let value = caps[2].to_string();
        match &caps[1] {
            "Repository" => repository = Some(value),
            "Version" => version = Some(value),
            _ => architecture = Some(value),
        }
    }

    let missing = |field: &str| Error::UnexpectedOutput {
        command: "pacman -Si".to_string(),
        field: field.to_string(),
    };
    let repository = repository.ok_or_else(|| missing("Repository"))?;
    let version = version.ok_or_else(|| missing("Version"))?;
    let architecture = architecture.ok_or_else(|| missing("Architecture"))?;

    Ok(DistroPackageInfo {
        name: package.to_string(),
        version: upstream_version(&version),
        info_url: format!("https://archlinux.org/packages/{repository}/{architecture}/{package}/"),
        provenance: Provenance::Official {
            repository,
            architecture,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTPUT: &str = "\
Repository      : extra
Name            : ruby-rack
Version         : 3.0.8-1
Description     : A modular Ruby webserver interface
Architecture    : any
URL             : https://github.com/rack/rack

";

    #[test]
    fn test_parse_pacman_info() {
        let info = parse_pacman_info("ruby-rack", OUTPUT).unwrap();
        assert_eq!(info.version, "3.0.8");
        assert_eq!(
            info.provenance,
            Provenance::Official {
                repository: "extra".to_string(),
                architecture: "any".to_string()
            }
        );
        assert_eq!(info.info_url, "https://archlinux.org/packages/extra/any/ruby-rack/");
    }

    #[test]
    fn test_parse_pacman_info_missing_version() {
        let err = parse_pacman_info("x", "Repository : extra\n").unwrap_err();
        assert!(matches!(err, Error::UnexpectedOutput { .. }));
    }

    #[test]
    fn test_not_found_detection() {
        assert!(is_not_found("error: package 'ruby-nope' was not found\n"));
        assert!(!is_not_found("error: could not open file /var/lib/pacman/sync/extra.db"));
    }
}
