//! Slot resolution against realistic catalogs

use gem_index::{Constraint, Dependency, Error, SlotResolver, Version, VersionSet, slot_suffix};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

fn v(s: &str) -> Version {
    Version::parse(s).unwrap()
}

fn catalog(entries: &[(&str, &str)]) -> VersionSet {
    entries.iter().map(|(n, ver)| (*n, v(ver))).collect()
}

#[test]
fn test_pessimistic_patch_constraint_selects_older_family() {
    // bar ~> 2.1.0 with bar 2.1, 2.1.5, 2.2 published
    let set = catalog(&[("bar", "2.1"), ("bar", "2.1.5"), ("bar", "2.2")]);
    let resolver = SlotResolver::new(&set, "ruby");

    let dep = Dependency::new("bar", Constraint::parse("~> 2.1.0").unwrap());
    let resolved = resolver.resolve(&dep).unwrap();

    assert_eq!(resolved.chosen_version, v("2.1.5"));
    assert_eq!(resolved.slot.as_deref(), Some("2.1"));
    assert_eq!(resolved.distro_name, "ruby-bar-2.1");
    assert_eq!(resolved.original, dep);
}

#[test]
fn test_raised_floor_within_window_takes_slot_from_window() {
    // baz ~> 1.2, >= 1.2.3 with 1.2.2, 1.2.3, 1.4 and 2.0 published
    let set = catalog(&[("baz", "1.2.2"), ("baz", "1.2.3"), ("baz", "1.4"), ("baz", "2.0")]);
    let resolver = SlotResolver::new(&set, "ruby");

    let dep = Dependency::new("baz", Constraint::parse_requirements("~> 1.2, >= 1.2.3").unwrap());
    let resolved = resolver.resolve(&dep).unwrap();

    assert_eq!(resolved.chosen_version, v("1.4"));
    assert_eq!(resolved.distro_name, "ruby-baz-1");
}

#[test]
fn test_raised_floor_above_every_release_is_unsatisfiable() {
    let set = catalog(&[("baz", "1.2.2"), ("baz", "2.0")]);
    let resolver = SlotResolver::new(&set, "ruby");

    let dep = Dependency::new("baz", Constraint::parse_requirements("~> 1.2, >= 1.2.3").unwrap());

    assert!(matches!(resolver.resolve(&dep), Err(Error::Unsatisfiable { .. })));
}

#[test]
fn test_pessimistic_minor_constraint_tracks_latest() {
    // ~> 2.1 admits 2.2, so the plain package suffices
    let set = catalog(&[("bar", "2.1"), ("bar", "2.1.5"), ("bar", "2.2")]);
    let resolver = SlotResolver::new(&set, "ruby");

    let resolved = resolver
        .resolve(&Dependency::new("bar", Constraint::parse("~> 2.1").unwrap()))
        .unwrap();

    assert_eq!(resolved.chosen_version, v("2.2"));
    assert_eq!(resolved.slot, None);
    assert_eq!(resolved.distro_name, "ruby-bar");
}

#[test]
fn test_exact_constraint_on_old_release() {
    let set = catalog(&[("rack", "1.6.4"), ("rack", "1.6.5"), ("rack", "2.0.1")]);
    let resolver = SlotResolver::new(&set, "ruby");

    let resolved = resolver
        .resolve(&Dependency::new("rack", Constraint::parse("= 1.6.4").unwrap()))
        .unwrap();

    assert_eq!(resolved.chosen_version, v("1.6.4"));
    assert_eq!(resolved.slot.as_deref(), Some("1.6.4"));
    assert_eq!(resolved.distro_name, "ruby-rack-1.6.4");
}

#[test]
fn test_major_family_slot() {
    let set = catalog(&[("rack", "1.6.5"), ("rack", "2.0.1"), ("rack", "3.0.0")]);
    let resolver = SlotResolver::new(&set, "ruby");

    let resolved = resolver
        .resolve(&Dependency::new("rack", Constraint::parse("~> 2.0").unwrap()))
        .unwrap();

    assert_eq!(resolved.slot.as_deref(), Some("2"));
    assert_eq!(resolved.distro_name, "ruby-rack-2");
}

#[test]
fn test_unsatisfiable_constraint() {
    let set = catalog(&[("bar", "1.0"), ("bar", "1.1")]);
    let resolver = SlotResolver::new(&set, "ruby");

    let err = resolver
        .resolve(&Dependency::new("bar", Constraint::parse("~> 2.0").unwrap()))
        .unwrap_err();

    match err {
        Error::Unsatisfiable { dependency } => assert!(dependency.contains("bar")),
        other => panic!("unexpected error: {other}"),
    }
}

#[rstest]
#[case("2.1", "2.2", "2.1")]
#[case("2.1.0", "2.2.0", "2.1")]
#[case("1", "1.0.1", "1")]
#[case("0.9.12", "0.10.0", "0.9")]
#[case("4.2.11.3", "5.0.0", "4")]
fn test_slot_suffix_cases(#[case] chosen: &str, #[case] next: &str, #[case] expected: &str) {
    assert_eq!(slot_suffix(&v(chosen), &v(next)), expected);
}

fn version_strategy() -> impl Strategy<Value = Version> {
    prop::collection::vec(0u64..6, 1..4).prop_map(|segments| Version::from_segments(segments).unwrap())
}

proptest! {
    #[test]
    fn any_constraint_always_picks_latest_without_slot(
        versions in prop::collection::vec(version_strategy(), 1..12)
    ) {
        let set: VersionSet = versions.into_iter().map(|ver| ("gem", ver)).collect();
        let resolver = SlotResolver::new(&set, "ruby");

        let resolved = resolver.resolve(&Dependency::any("gem")).unwrap();
        prop_assert_eq!(Some(&resolved.chosen_version), set.latest("gem"));
        prop_assert_eq!(resolved.slot, None);
        prop_assert_eq!(resolved.distro_name, "ruby-gem");
    }

    #[test]
    fn chosen_release_matches_its_slot_family(
        versions in prop::collection::vec(version_strategy(), 2..12),
        pick in 0usize..12
    ) {
        let set: VersionSet = versions.into_iter().map(|ver| ("gem", ver)).collect();
        let all = set.versions("gem");
        let target = all[pick % all.len()].clone();
        let resolver = SlotResolver::new(&set, "ruby");

        let resolved = resolver
            .resolve(&Dependency::new("gem", Constraint::Exact(target.clone())))
            .unwrap();
        prop_assert_eq!(&resolved.chosen_version, &target);

        if let Some(slot) = resolved.slot {
            // the slot is a literal prefix of the chosen version
            prop_assert!(target.to_string().starts_with(&slot));
        }
    }
}
