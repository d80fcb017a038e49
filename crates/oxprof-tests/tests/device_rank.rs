//! Device Rank Tests
//!
//! Profiles carrying device descriptions are ordered against a device,
//! with automatically generated profiles pushed down.

use oxprof_core::device::{compare, profile_rank};
use oxprof_core::{
    DeviceDescriptor, LoadOptions, Profile, ProfileSet, RankEntry, RankMap, TextKind,
};
use oxprof_tests::fixtures::device_profile;
use oxprof_tests::{ProfileBuilder, ProfileDir, init_logging};

fn acme_device() -> DeviceDescriptor {
    DeviceDescriptor::from_pairs([("manufacturer", "Acme"), ("model", "X1"), ("serial", "123")])
        .with_rank_map(RankMap::default_map())
}

/// Profiles for several Acme and foreign devices
fn device_dir() -> ProfileDir {
    let dir = ProfileDir::new().unwrap();
    let profiles: [(&str, &str, &[(&str, &str)]); 7] = [
        ("a.icc", "A generic", &[]),
        ("b.icc", "B other vendor", &[("manufacturer", "Other"), ("model", "Z")]),
        ("c.icc", "C acme y2", &[("manufacturer", "Acme"), ("model", "Y2")]),
        ("d.icc", "D acme x1", &[("manufacturer", "Acme"), ("model", "X1")]),
        (
            "e.icc",
            "E acme x1 auto",
            &[
                ("manufacturer", "Acme"),
                ("model", "X1"),
                ("OPENICC_automatic_generated", "1"),
            ],
        ),
        (
            "f.icc",
            "F acme x1 auto serial",
            &[
                ("manufacturer", "Acme"),
                ("model", "X1"),
                ("serial", "123"),
                ("OYRANOS_automatic_generated", "1"),
            ],
        ),
        (
            "g.icc",
            "G acme x1 serial",
            &[("manufacturer", "Acme"), ("model", "X1"), ("serial", "123")],
        ),
    ];
    for (file, description, pairs) in profiles {
        let data = if pairs.is_empty() {
            ProfileBuilder::display_rgb().description(description).build()
        } else {
            device_profile(description, pairs)
        };
        dir.add(file, &data).unwrap();
    }
    dir
}

#[test]
fn exact_device_match_ranks_first() {
    init_logging();

    let dir = device_dir();
    let cache = dir.cache();
    let mut set = ProfileSet::create(&cache, &[], false).unwrap();
    assert_eq!(set.count(), 7);

    let ranks = set.device_rank(&acme_device());
    let order: Vec<String> = set.iter().map(|p| p.get_text(TextKind::Description)).collect();

    assert_eq!(
        order,
        [
            "G acme x1 serial",
            "D acme x1",
            "E acme x1 auto",
            "F acme x1 auto serial",
            "A generic",
            "C acme y2",
            "B other vendor",
        ]
    );
    assert_eq!(ranks, [16, 6, 4, 3, 0, -4, -6]);
}

#[test]
fn device_pattern_keeps_positive_ranks() {
    let dir = device_dir();
    let cache = dir.cache();

    let pattern = Profile::device_pattern(acme_device());
    let set = ProfileSet::create(&cache, &[pattern], false).unwrap();
    let selected: Vec<String> = set.iter().map(|p| p.get_text(TextKind::Description)).collect();

    assert_eq!(
        selected,
        ["D acme x1", "E acme x1 auto", "F acme x1 auto serial", "G acme x1 serial"]
    );
}

#[test]
fn automatic_penalty() {
    let pattern = acme_device();

    let mut measured = DeviceDescriptor::from_pairs([("manufacturer", "Acme"), ("model", "X1")]);
    assert_eq!(profile_rank(&measured, &pattern), 6);

    measured.set("OYRANOS_automatic_generated", "1");
    assert_eq!(profile_rank(&measured, &pattern), 4);

    measured.set("serial", "123");
    assert_eq!(profile_rank(&measured, &pattern), 16 - 13);

    // "0" is not automatic
    measured.set("OYRANOS_automatic_generated", "0");
    assert_eq!(profile_rank(&measured, &pattern), 16);
}

#[test]
fn device_rank_map_wins_over_pattern_map() {
    let device = DeviceDescriptor::from_pairs([("model", "X1")])
        .with_rank_map(RankMap::new(vec![RankEntry::new("model", 100, -100, 0)]));
    let pattern = acme_device();
    assert_eq!(compare(&device, &pattern), 100);

    let plain = DeviceDescriptor::from_pairs([("model", "X1"), ("manufacturer", "Acme")]);
    let unweighted = DeviceDescriptor::from_pairs([("model", "X1"), ("manufacturer", "Acme")]);
    assert_eq!(compare(&plain, &unweighted), 2);
}

#[test]
fn device_from_description_tags() {
    let data = ProfileBuilder::display_rgb()
        .description("Monitor")
        .manufacturer_desc("Acme")
        .model_desc("X1")
        .build();
    let profile = Profile::from_memory(&data, LoadOptions::default()).unwrap();

    let device = profile.device_get();
    assert_eq!(device.get("manufacturer"), Some("Acme"));
    assert_eq!(device.get("model"), Some("X1"));
    assert_eq!(device.get("serial"), None);
}

#[test]
fn meta_wins_over_description_tags() {
    let data = ProfileBuilder::display_rgb()
        .description("Monitor")
        .model_desc("From dmdd")
        .meta(&[("model", "From meta"), ("EDID_serial", "S-42")])
        .build();
    let profile = Profile::from_memory(&data, LoadOptions::default()).unwrap();

    let device = profile.device_get();
    assert_eq!(device.get("model"), Some("From meta"));
    assert_eq!(device.get("EDID_serial"), Some("S-42"));
    assert_eq!(device.get("serial"), Some("S-42"));
}

#[test]
fn prefixed_pattern_keys_answer_for_device_keys() {
    let pattern = DeviceDescriptor::from_pairs([("EDID_manufacturer", "Acme"), ("EDID_model", "X1")]);
    let device = DeviceDescriptor::from_pairs([("manufacturer", "Acme"), ("model", "X1")])
        .with_rank_map(RankMap::default_map());
    assert_eq!(compare(&device, &pattern), 6);
}
