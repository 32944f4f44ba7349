//! Cached, time-bounded lookups across the official repositories and the
//! community overlay.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use gem_index::Version;

use crate::error::{Error, Result};
use crate::info::{ProbeOutcome, SourceAnswer};
use crate::source::{CommunityOverlay, OfficialRepository};

/// Default bound on a single source query.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Looks up distribution packages, official repositories first.
///
/// One probe belongs to one synchronization run: every answer is cached by
/// package name and later lookups never reach the sources again.
pub struct DistroPackageProbe {
    official: Box<dyn OfficialRepository>,
    overlay: Box<dyn CommunityOverlay>,
    timeout: Duration,
    cache: Mutex<HashMap<String, ProbeOutcome>>,
}

impl DistroPackageProbe {
    pub fn new(official: Box<dyn OfficialRepository>, overlay: Box<dyn CommunityOverlay>) -> Self {
        Self {
            official,
            overlay,
            timeout: DEFAULT_PROBE_TIMEOUT,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Find `package` in the distribution.
    ///
    /// When `expected` is given (the newest gem release the package should
    /// carry) and the published version differs, a drift warning is logged
    /// once. That is advice for the other repository's maintainer, not a
    /// failure.
    pub async fn lookup(&self, package: &str, expected: Option<&Version>) -> ProbeOutcome {
        if let Some(hit) = self.cached(package) {
            return hit;
        }

        let outcome = self.query(package).await;

        match &outcome {
            ProbeOutcome::Present(info) => {
                if let Some(expected) = expected
                    && Version::parse(&info.version).ok().as_ref() != Some(expected)
                {
                    tracing::warn!(
                        package,
                        distro = %info.version,
                        gem = %expected,
                        url = %info.info_url,
                        "package is out-of-date; visit the package page and flag it"
                    );
                }
            }
            ProbeOutcome::Absent { inconclusive: false } => {
                tracing::warn!(package, "package does not exist; please create one");
            }
            ProbeOutcome::Absent { inconclusive: true } => {}
        }

        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(package.to_string(), outcome.clone());
        outcome
    }

    /// Number of distinct package names answered so far.
    pub fn cached_count(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn cached(&self, package: &str) -> Option<ProbeOutcome> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(package)
            .cloned()
    }

    async fn query(&self, package: &str) -> ProbeOutcome {
        let official = self
            .bounded(self.official.name(), package, self.official.query(package))
            .await;
        match official {
            Ok(SourceAnswer::Found(info)) => return ProbeOutcome::Present(info),
            Ok(SourceAnswer::NotFound) => {}
            Err(e) => {
                // Only a definitive "not found" may fall through to the overlay.
                tracing::warn!(package, error = %e, "official repository lookup inconclusive");
                return ProbeOutcome::Absent { inconclusive: true };
            }
        }

        match self
            .bounded(self.overlay.name(), package, self.overlay.query(package))
            .await
        {
            Ok(SourceAnswer::Found(info)) => ProbeOutcome::Present(info),
            Ok(SourceAnswer::NotFound) => ProbeOutcome::Absent {
                inconclusive: false,
            },
            Err(e) => {
                tracing::warn!(package, error = %e, "community overlay lookup inconclusive");
                ProbeOutcome::Absent { inconclusive: true }
            }
        }
    }

    async fn bounded<F>(&self, source_name: &str, package: &str, query: F) -> Result<SourceAnswer>
    where
        F: Future<Output = Result<SourceAnswer>>,
    {
        match tokio::time::timeout(self.timeout, query).await {
            Ok(answer) => answer,
            Err(_) => Err(Error::ProbeTimeout {
                source_name: source_name.to_string(),
                package: package.to_string(),
                timeout: self.timeout,
            }),
        }
    }
}

impl std::fmt::Debug for DistroPackageProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistroPackageProbe")
            .field("official", &self.official.name())
            .field("overlay", &self.overlay.name())
            .field("timeout", &self.timeout)
            .field("cached", &self.cached_count())
            .finish()
    }
}
