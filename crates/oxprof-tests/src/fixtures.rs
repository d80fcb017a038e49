//! Profile fixtures
//!
//! Builds small but valid ICC byte streams in code so every test states
//! exactly which header fields and tags it relies on.

use oxprof_core::icc::{TagEntry, align4, table_end, write_tag_table};
use oxprof_core::{CodecRegistry, Signature, TagValue};

/// Builder for synthetic ICC profiles
#[derive(Debug, Clone)]
pub struct ProfileBuilder {
    version: u8,
    class: Signature,
    color_space: Signature,
    tags: Vec<(Signature, Vec<u8>)>,
    profile_id: Option<[u8; 16]>,
    trailing: usize,
}

impl ProfileBuilder {
    /// Version 4 profile of `class` in `color_space`
    pub fn new(class: Signature, color_space: Signature) -> Self {
        Self {
            version: 4,
            class,
            color_space,
            tags: Vec::new(),
            profile_id: None,
            trailing: 0,
        }
    }

    /// RGB display profile
    pub fn display_rgb() -> Self {
        Self::new(Signature::DISPLAY_CLASS, Signature::RGB_DATA)
    }

    /// ICC major version (2 or 4)
    pub fn version(mut self, major: u8) -> Self {
        self.version = major;
        self
    }

    fn encode(&self, tag_type: Signature, values: &[TagValue]) -> Vec<u8> {
        CodecRegistry::global()
            .encode(tag_type, values, self.version)
            .expect("fixture tag encodes")
    }

    /// Text tag in the type the version expects
    fn text_tag(mut self, usage: Signature, text: &str) -> Self {
        let tag_type = if self.version >= 4 {
            Signature::TYPE_MLUC
        } else {
            Signature::TYPE_DESC
        };
        let block = self.encode(tag_type, &[TagValue::localized(Some("en_US".into()), text)]);
        self.tags.push((usage, block));
        self
    }

    pub fn description(self, text: &str) -> Self {
        self.text_tag(Signature::DESC, text)
    }

    /// `dmnd` device manufacturer description
    pub fn manufacturer_desc(self, text: &str) -> Self {
        self.text_tag(Signature::DMND, text)
    }

    /// `dmdd` device model description
    pub fn model_desc(self, text: &str) -> Self {
        self.text_tag(Signature::DMDD, text)
    }

    /// Localized description variants (`mluc`)
    pub fn localized_description(mut self, variants: &[(&str, &str)]) -> Self {
        let values: Vec<TagValue> = variants
            .iter()
            .map(|(locale, text)| TagValue::localized(Some(locale.to_string()), *text))
            .collect();
        let block = self.encode(Signature::TYPE_MLUC, &values);
        self.tags.push((Signature::DESC, block));
        self
    }

    pub fn copyright(mut self, text: &str) -> Self {
        let block = self.encode(Signature::TYPE_TEXT, &[TagValue::text(text)]);
        self.tags.push((Signature::COPYRIGHT, block));
        self
    }

    /// `meta` dictionary with device keys
    pub fn meta(mut self, pairs: &[(&str, &str)]) -> Self {
        let values: Vec<TagValue> = pairs.iter().map(|(k, v)| TagValue::entry(*k, *v)).collect();
        let block = self.encode(Signature::TYPE_DICT, &values);
        self.tags.push((Signature::META, block));
        self
    }

    /// Media white point
    pub fn white_point(mut self) -> Self {
        let block = self.encode(Signature::TYPE_XYZ, &[TagValue::entry("XYZ", "0.9642 1.0 0.8249")]);
        self.tags.push((Signature::MEDIA_WHITE, block));
        self
    }

    /// `psid` tag listing the given member hashes
    pub fn sequence(mut self, members: &[[u8; 16]]) -> Self {
        let block = psid_block(members);
        self.tags.push((Signature::PSID, block));
        self
    }

    /// Any tag block as is
    pub fn raw_tag(mut self, usage: Signature, block: Vec<u8>) -> Self {
        self.tags.push((usage, block));
        self
    }

    /// Embed a profile ID in the header
    pub fn profile_id(mut self, id: [u8; 16]) -> Self {
        self.profile_id = Some(id);
        self
    }

    /// Zero bytes after the last tag (not counted in the tag table)
    pub fn trailing(mut self, bytes: usize) -> Self {
        self.trailing = bytes;
        self
    }

    /// Serialize header, tag table and tag data
    pub fn build(&self) -> Vec<u8> {
        let mut offset = table_end(self.tags.len());
        let mut entries = Vec::with_capacity(self.tags.len());
        for (usage, block) in &self.tags {
            entries.push(TagEntry {
                signature: *usage,
                offset: offset as u32,
                size: block.len() as u32,
            });
            offset = align4(offset + block.len());
        }
        let size = offset + self.trailing;

        let mut data = vec![0u8; size];
        data[0..4].copy_from_slice(&(size as u32).to_be_bytes());
        data[4..8].copy_from_slice(b"oxpf");
        data[8..12].copy_from_slice(&[self.version, if self.version >= 4 { 0x30 } else { 0x10 }, 0, 0]);
        data[12..16].copy_from_slice(&self.class.to_bytes());
        data[16..20].copy_from_slice(&self.color_space.to_bytes());
        data[20..24].copy_from_slice(b"XYZ ");
        // 2024-05-01 12:00:00
        for (i, v) in [2024u16, 5, 1, 12, 0, 0].iter().enumerate() {
            data[24 + i * 2..26 + i * 2].copy_from_slice(&v.to_be_bytes());
        }
        data[36..40].copy_from_slice(b"acsp");
        // D50 illuminant
        data[68..80].copy_from_slice(&[0, 0, 0xF6, 0xD6, 0, 1, 0, 0, 0, 0, 0xD3, 0x2D]);
        if let Some(id) = self.profile_id {
            data[84..100].copy_from_slice(&id);
        }

        write_tag_table(&mut data, &entries);
        for (entry, (_, block)) in entries.iter().zip(&self.tags) {
            let start = entry.offset as usize;
            data[start..start + block.len()].copy_from_slice(block);
        }
        data
    }
}

/// Profile sequence identifier with one `mluc` description per member
pub fn psid_block(members: &[[u8; 16]]) -> Vec<u8> {
    let desc = CodecRegistry::global()
        .encode(
            Signature::TYPE_MLUC,
            &[TagValue::localized(Some("en_US".into()), "member")],
            4,
        )
        .expect("mluc encodes");

    let mut block = b"psid\0\0\0\0".to_vec();
    block.extend_from_slice(&(members.len() as u32).to_be_bytes());
    let mut offset = 12 + members.len() * 8;
    for _ in members {
        let size = 16 + desc.len();
        block.extend_from_slice(&(offset as u32).to_be_bytes());
        block.extend_from_slice(&(size as u32).to_be_bytes());
        offset += size;
    }
    for id in members {
        block.extend_from_slice(id);
        block.extend_from_slice(&desc);
    }
    block
}

/// Display profile tagged for a device
pub fn device_profile(description: &str, pairs: &[(&str, &str)]) -> Vec<u8> {
    ProfileBuilder::display_rgb()
        .description(description)
        .meta(pairs)
        .build()
}
