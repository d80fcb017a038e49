//! Round Trip Tests
//!
//! `get_mem` must return the input unchanged for unmodified profiles and
//! keep untouched tags in place after a partial rewrite.

use oxprof_core::icc::read_tag_table;
use oxprof_core::{LoadOptions, Profile, ProfileTag, Signature, TagStatus};
use oxprof_tests::{ProfileBuilder, init_logging};

fn load(data: &[u8]) -> Profile {
    Profile::from_memory(data, LoadOptions::default()).unwrap()
}

#[test]
fn unmodified_profiles_round_trip() {
    init_logging();

    let fixtures = [
        ProfileBuilder::display_rgb().description("Display").build(),
        ProfileBuilder::display_rgb()
            .version(2)
            .description("Legacy")
            .copyright("Public domain")
            .white_point()
            .build(),
        ProfileBuilder::new(Signature::OUTPUT_CLASS, Signature::CMYK_DATA)
            .description("Press")
            .raw_tag(Signature::from_bytes(*b"zzzz"), b"zzzz\0\0\0\0opaque data".to_vec())
            .trailing(64)
            .build(),
    ];

    for data in &fixtures {
        let profile = load(data);
        // parse the tags before serializing
        assert!(profile.tag_count() > 1);
        assert_eq!(&profile.get_mem(), data);
        assert_eq!(profile.get_size(), data.len());
    }
}

#[test]
fn replacing_one_tag_keeps_the_others() {
    init_logging();

    let data = ProfileBuilder::display_rgb()
        .description("Before")
        .copyright("Kept")
        .white_point()
        .build();
    let original = read_tag_table(&data).unwrap();

    let mut profile = load(&data);
    let count = profile.tag_count();
    let tag = ProfileTag::create_from_text("After", Signature::TYPE_TEXT, Signature::DESC).unwrap();
    profile.tag_move_in(tag, Some(1)).unwrap();
    assert_eq!(profile.tag_count(), count);

    let mem = profile.get_mem();
    let table = read_tag_table(&mem).unwrap();
    assert_eq!(table.len(), original.len());
    assert_eq!(
        table.iter().map(|e| e.signature).collect::<Vec<_>>(),
        original.iter().map(|e| e.signature).collect::<Vec<_>>()
    );

    for (old, new) in original.iter().zip(&table) {
        if old.signature == Signature::DESC {
            assert!(new.offset as usize >= original.iter().map(|e| (e.offset + e.size) as usize).max().unwrap());
            continue;
        }
        assert_eq!(old, new);
        let range = old.offset as usize..(old.offset + old.size) as usize;
        assert_eq!(data[range.clone()], mem[range]);
    }

    let reparsed = load(&mem);
    let desc = reparsed.get_tag_by_id(Signature::DESC).unwrap();
    assert_eq!(desc.get_text(None, None), ["After"]);
}

#[test]
fn header_fields_survive_rewrite() {
    let data = ProfileBuilder::new(Signature::INPUT_CLASS, Signature::LAB_DATA)
        .description("Scanner")
        .build();
    let mut profile = load(&data);
    profile.add_tag_text(Signature::COPYRIGHT, "added").unwrap();

    let mem = profile.get_mem();
    assert_eq!(mem[4..84], data[4..84]);
    assert_eq!(mem.len() % 4, 0);
    assert!(mem.len() > data.len());
}

#[test]
fn corrupted_tags_are_listed_and_dropped_on_rewrite() {
    init_logging();

    let mut data = ProfileBuilder::display_rgb()
        .description("Broken")
        .copyright("c")
        .build();
    // copyright entry points past the end
    let size = data.len() as u32;
    data[132 + 12 + 4..132 + 12 + 8].copy_from_slice(&size.to_be_bytes());

    let mut profile = load(&data);
    let cprt = profile.get_tag_by_id(Signature::COPYRIGHT).unwrap();
    assert_eq!(cprt.status(), TagStatus::Corrupted);
    assert_eq!(profile.get_mem(), data);

    profile.add_tag_text(Signature::DESC, "Repaired").unwrap();
    let reparsed = load(&profile.get_mem());
    assert!(reparsed.get_tag_by_id(Signature::COPYRIGHT).is_none());
    assert!(reparsed.get_tag_by_id(Signature::DESC).is_some());
}

#[test]
fn tag_usage_stays_unique() {
    let data = ProfileBuilder::display_rgb().description("One").copyright("c").build();
    let mut profile = load(&data);
    let count = profile.tag_count();

    for text in ["Two", "Three", "Four"] {
        profile.add_tag_text(Signature::DESC, text).unwrap();
    }

    assert_eq!(profile.tag_count(), count);
    let descs = (0..profile.tag_count())
        .filter_map(|i| profile.get_tag_by_pos(i))
        .filter(|t| t.usage() == Signature::DESC)
        .count();
    assert_eq!(descs, 1);
}

#[test]
fn tag_from_another_profile_is_appended() {
    init_logging();

    let donor = load(
        &ProfileBuilder::display_rgb()
            .description("A")
            .copyright("short")
            .build(),
    );
    let long = "B".repeat(200);
    let data = ProfileBuilder::display_rgb()
        .description(&long)
        .copyright("mine")
        .build();
    let mut profile = load(&data);

    // the donor's copyright offset falls inside this profile's description
    let cprt = (*donor.get_tag_by_id(Signature::COPYRIGHT).unwrap()).clone();
    let donor_offset = cprt.get_offset().unwrap() as usize;
    let desc_entry = read_tag_table(&data)
        .unwrap()
        .into_iter()
        .find(|e| e.signature == Signature::DESC)
        .unwrap();
    assert!(donor_offset < (desc_entry.offset + desc_entry.size) as usize);

    profile.tag_move_in(cprt, None).unwrap();
    let mem = profile.get_mem();

    let mut table = read_tag_table(&mem).unwrap();
    table.sort_by_key(|e| e.offset);
    for pair in table.windows(2) {
        assert!(pair[0].offset + pair[0].size <= pair[1].offset);
    }
    let desc = table.iter().find(|e| e.signature == Signature::DESC).unwrap();
    assert_eq!(desc, &desc_entry);

    let reparsed = load(&mem);
    let desc = reparsed.get_tag_by_id(Signature::DESC).unwrap();
    assert_eq!(desc.get_text(None, None), [long.as_str()]);
    let cprt = reparsed.get_tag_by_id(Signature::COPYRIGHT).unwrap();
    assert_eq!(cprt.get_text(None, None), ["short"]);
}
