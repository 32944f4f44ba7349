//! DistroPackageProbe ordering, caching and timeout behaviour

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use gem_distro::{
    CommunityOverlay, DistroPackageInfo, DistroPackageProbe, Error, OfficialRepository,
    ProbeOutcome, Provenance, Result, SourceAnswer,
};
use gem_index::Version;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[derive(Debug, Clone, Copy)]
enum Behaviour {
    Answer,
    Fail,
    Hang,
}

struct Source {
    packages: HashMap<String, String>,
    behaviour: Behaviour,
    calls: Arc<AtomicUsize>,
}

impl Source {
    fn new(packages: &[(&str, &str)], behaviour: Behaviour) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = Self {
            packages: packages
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
            behaviour,
            calls: calls.clone(),
        };
        (source, calls)
    }

    async fn answer(&self, package: &str, provenance: Provenance) -> Result<SourceAnswer> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behaviour {
            Behaviour::Fail => Err(Error::Command {
                command: "pacman -Si".to_string(),
                message: "database locked".to_string(),
            }),
            Behaviour::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(SourceAnswer::NotFound)
            }
            Behaviour::Answer => Ok(match self.packages.get(package) {
                Some(version) => SourceAnswer::Found(DistroPackageInfo {
                    name: package.to_string(),
                    version: version.clone(),
                    provenance,
                    info_url: format!("https://example.invalid/{package}"),
                }),
                None => SourceAnswer::NotFound,
            }),
        }
    }
}

struct Official(Source);
struct Overlay(Source);

#[async_trait]
impl OfficialRepository for Official {
    fn name(&self) -> &str {
        "official"
    }

    async fn query(&self, package: &str) -> Result<SourceAnswer> {
        let provenance = Provenance::Official {
            repository: "extra".to_string(),
            architecture: "any".to_string(),
        };
        self.0.answer(package, provenance).await
    }
}

#[async_trait]
impl CommunityOverlay for Overlay {
    fn name(&self) -> &str {
        "overlay"
    }

    async fn query(&self, package: &str) -> Result<SourceAnswer> {
        self.0.answer(package, Provenance::CommunityOverlay).await
    }
}

fn sources(
    official: &[(&str, &str)],
    official_behaviour: Behaviour,
    overlay: &[(&str, &str)],
) -> (DistroPackageProbe, Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let (official, official_calls) = Source::new(official, official_behaviour);
    let (overlay, overlay_calls) = Source::new(overlay, Behaviour::Answer);
    let probe = DistroPackageProbe::new(Box::new(Official(official)), Box::new(Overlay(overlay)))
        .with_timeout(Duration::from_secs(5));
    (probe, official_calls, overlay_calls)
}

fn official() -> Provenance {
    Provenance::Official {
        repository: "extra".to_string(),
        architecture: "any".to_string(),
    }
}

fn present(name: &str, version: &str, provenance: Provenance) -> ProbeOutcome {
    ProbeOutcome::Present(DistroPackageInfo {
        name: name.to_string(),
        version: version.to_string(),
        provenance,
        info_url: format!("https://example.invalid/{name}"),
    })
}

#[rstest]
#[case::official_hit_skips_overlay(
    &[("ruby-bar", "2.2")],
    Behaviour::Answer,
    &[("ruby-bar", "2.1.5")],
    present("ruby-bar", "2.2", official()),
    0
)]
#[case::overlay_after_definitive_miss(
    &[],
    Behaviour::Answer,
    &[("ruby-bar", "2.2")],
    present("ruby-bar", "2.2", Provenance::CommunityOverlay),
    1
)]
#[case::absent_from_both(&[], Behaviour::Answer, &[], ProbeOutcome::Absent { inconclusive: false }, 1)]
#[case::official_failure_is_not_a_miss(
    &[],
    Behaviour::Fail,
    &[("ruby-bar", "2.2")],
    ProbeOutcome::Absent { inconclusive: true },
    0
)]
#[case::official_timeout_is_not_a_miss(
    &[],
    Behaviour::Hang,
    &[("ruby-bar", "2.2")],
    ProbeOutcome::Absent { inconclusive: true },
    0
)]
#[tokio::test(start_paused = true)]
async fn test_lookup_outcome(
    #[case] official_packages: &[(&str, &str)],
    #[case] official_behaviour: Behaviour,
    #[case] overlay_packages: &[(&str, &str)],
    #[case] expected: ProbeOutcome,
    #[case] overlay_queries: usize,
) {
    let (distro, official_calls, overlay_calls) =
        sources(official_packages, official_behaviour, overlay_packages);

    let outcome = distro.lookup("ruby-bar", None).await;

    assert_eq!(outcome, expected);
    assert_eq!(official_calls.load(Ordering::SeqCst), 1);
    assert_eq!(overlay_calls.load(Ordering::SeqCst), overlay_queries);
}

#[tokio::test]
async fn test_repeated_lookups_hit_cache() {
    let (probe, official, overlay) = sources(&[("ruby-a", "1.0")], Behaviour::Answer, &[]);
    let expected = Version::parse("1.0").unwrap();

    for _ in 0..3 {
        assert!(probe.lookup("ruby-a", Some(&expected)).await.is_present());
        assert!(!probe.lookup("ruby-b", None).await.is_present());
    }

    assert_eq!(official.load(Ordering::SeqCst), 2);
    assert_eq!(overlay.load(Ordering::SeqCst), 1);
    assert_eq!(probe.cached_count(), 2);
}

#[tokio::test]
async fn test_version_drift_is_advisory() {
    let (probe, _, _) = sources(&[("ruby-a", "1.0")], Behaviour::Answer, &[]);
    let newer = Version::parse("1.1").unwrap();

    let outcome = probe.lookup("ruby-a", Some(&newer)).await;

    assert!(outcome.is_present());
}
