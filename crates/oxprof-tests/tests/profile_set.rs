//! Profile Set Tests
//!
//! Selection from the scan cache by header patterns, de-duplication,
//! default detection and the count based refresh of the scan cache.

use std::sync::Arc;

use oxprof_core::{
    CancelToken, Error, LoadOptions, Profile, ProfileClass, ProfileSet, Signature, SignatureKind,
    StandardRole, TextKind,
};
use oxprof_tests::{ProfileBuilder, ProfileDir, init_logging};

fn descriptions(set: &ProfileSet) -> Vec<String> {
    set.iter().map(|p| p.get_text(TextKind::Description)).collect()
}

/// Display RGB, display CMYK, printer CMYK and an RGB working space
fn mixed_dir() -> ProfileDir {
    let dir = ProfileDir::new().unwrap();
    dir.add(
        "display.icc",
        &ProfileBuilder::display_rgb().description("Alpha display").build(),
    )
    .unwrap();
    dir.add(
        "display_cmyk.icc",
        &ProfileBuilder::new(Signature::DISPLAY_CLASS, Signature::CMYK_DATA)
            .description("Beta soft proof")
            .build(),
    )
    .unwrap();
    dir.add(
        "press/coated.icc",
        &ProfileBuilder::new(Signature::OUTPUT_CLASS, Signature::CMYK_DATA)
            .description("Coated press")
            .build(),
    )
    .unwrap();
    dir.add(
        "work.icc",
        &ProfileBuilder::new(Signature::COLOR_SPACE_CLASS, Signature::RGB_DATA)
            .description("Work space")
            .build(),
    )
    .unwrap();
    dir
}

#[test]
fn class_and_color_space_pattern_selects_one() {
    init_logging();

    let dir = mixed_dir();
    let cache = dir.cache();

    let mut pattern = Profile::from_signature(Signature::DISPLAY_CLASS, SignatureKind::Class);
    pattern.set_signature(Signature::RGB_DATA, SignatureKind::ColorSpace);

    let set = ProfileSet::create(&cache, &[pattern], false).unwrap();
    assert_eq!(set.count(), 1);
    assert_eq!(descriptions(&set), ["Alpha display"]);
}

#[test]
fn empty_pattern_list_selects_everything_sorted() {
    let dir = mixed_dir();
    let cache = dir.cache();

    let set = ProfileSet::create(&cache, &[], false).unwrap();
    assert_eq!(
        descriptions(&set),
        ["Alpha display", "Beta soft proof", "Coated press", "Work space"]
    );
}

#[test]
fn color_space_only_pattern() {
    let dir = mixed_dir();
    let cache = dir.cache();

    let pattern = Profile::from_signature(Signature::CMYK_DATA, SignatureKind::ColorSpace);
    let set = ProfileSet::create(&cache, &[pattern], false).unwrap();
    assert_eq!(descriptions(&set), ["Beta soft proof", "Coated press"]);
}

#[test]
fn file_name_pattern_matches_substring() {
    let dir = mixed_dir();
    let cache = dir.cache();

    let set = ProfileSet::create(&cache, &[Profile::file_name_pattern("press")], false).unwrap();
    assert_eq!(descriptions(&set), ["Coated press"]);
}

#[test]
fn duplicates_are_skipped_unless_allowed() {
    let data = ProfileBuilder::display_rgb().description("Twin").build();
    let dir = ProfileDir::new().unwrap();
    dir.add("twin_a.icc", &data).unwrap();
    dir.add("twin_b.icm", &data).unwrap();
    let cache = dir.cache();

    assert_eq!(ProfileSet::create(&cache, &[], false).unwrap().count(), 1);
    assert_eq!(ProfileSet::create(&cache, &[], true).unwrap().count(), 2);
}

#[test]
fn standard_class_marks_the_configured_default() {
    init_logging();

    let dir = mixed_dir().with_role(StandardRole::EditingRgb, "work.icc");
    let cache = dir.cache();

    let (set, current) = ProfileSet::for_standard_class(&cache, ProfileClass::EditingRgb).unwrap();
    assert_eq!(descriptions(&set), ["Alpha display", "Work space"]);
    assert_eq!(current, Some(1));

    let (cmyk, current) = ProfileSet::for_standard_class(&cache, ProfileClass::EditingCmyk).unwrap();
    assert_eq!(descriptions(&cmyk), ["Beta soft proof", "Coated press"]);
    assert_eq!(current, None);
}

#[test]
fn scan_cache_rebuilds_when_file_count_changes() {
    init_logging();

    let dir = mixed_dir();
    let cache = dir.cache();
    assert_eq!(cache.profiles().unwrap().len(), 4);

    dir.add("late.icc", &ProfileBuilder::display_rgb().description("Late").build())
        .unwrap();
    let profiles = cache.profiles().unwrap();
    assert_eq!(profiles.len(), 5);
    assert!(profiles.iter().any(|p| p.get_text(TextKind::Description) == "Late"));
}

#[test]
fn scan_cache_misses_in_place_replacement() {
    let dir = mixed_dir();
    let cache = dir.cache();
    cache.refresh().unwrap();

    dir.add("work.icc", &ProfileBuilder::display_rgb().description("Replaced").build())
        .unwrap();
    let texts: Vec<String> = cache
        .profiles()
        .unwrap()
        .iter()
        .map(|p| p.get_text(TextKind::Description))
        .collect();
    assert!(texts.contains(&"Work space".to_string()));
    assert!(!texts.contains(&"Replaced".to_string()));

    cache.clear();
    let texts: Vec<String> = cache
        .profiles()
        .unwrap()
        .iter()
        .map(|p| p.get_text(TextKind::Description))
        .collect();
    assert!(texts.contains(&"Replaced".to_string()));
}

#[test]
fn unreadable_files_are_skipped() {
    let dir = mixed_dir();
    dir.add("junk.icc", b"not a profile").unwrap();
    let cache = dir.cache();

    assert_eq!(cache.profiles().unwrap().len(), 4);
}

#[test]
fn cancelled_scan_keeps_the_old_cache() {
    let dir = mixed_dir();
    let cache = dir.cache();
    cache.refresh().unwrap();

    dir.add("extra.icc", &ProfileBuilder::display_rgb().description("Extra").build())
        .unwrap();
    let token = CancelToken::new();
    token.cancel();
    assert!(matches!(cache.refresh_with(&token), Err(Error::Cancelled)));

    cache.refresh().unwrap();
    assert_eq!(cache.profiles().unwrap().len(), 5);
}

#[test]
fn members_are_shared_with_the_cache() {
    let dir = mixed_dir();
    let cache = dir.cache();

    let set = ProfileSet::create(&cache, &[], false).unwrap();
    let cached = cache.profiles().unwrap();
    for (member, cached) in set.iter().zip(&cached) {
        assert!(Arc::ptr_eq(member, cached));
    }
}

#[test]
fn install_refuses_duplicates() {
    init_logging();

    let dir = mixed_dir();
    let cache = dir.cache();

    let fresh = Profile::from_memory(
        &ProfileBuilder::display_rgb().description("Fresh").build(),
        LoadOptions::default(),
    )
    .unwrap();
    let path = fresh.install(&cache, None).unwrap();
    assert_eq!(path, dir.user_path().join("Fresh.icc"));
    assert!(path.exists());

    assert!(matches!(fresh.install(&cache, None), Err(Error::AlreadyInstalled(_))));

    let clash = Profile::from_memory(
        &ProfileBuilder::display_rgb().description("Work space").build(),
        LoadOptions::default(),
    )
    .unwrap();
    assert!(matches!(
        clash.install(&cache, Some(&dir.user_path())),
        Err(Error::AlreadyInstalled(_))
    ));
}
