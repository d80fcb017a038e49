//! ICC Tag Table
//!
//! Reading and writing of the tag table that follows the header.
//!
//! # Structure
//!
//! An ICC profile consists of:
//! 1. A 128-byte header
//! 2. A tag count followed by 12-byte entries {signature, offset, size}
//! 3. Tag data (may overlap/share data)

use super::error::IccError;
use super::header::{HEADER_WITH_COUNT, MIN_PROFILE_SIZE};
use super::types::{Signature, read_u32, write_u32};

/// Size of one tag table entry
pub const TAG_ENTRY_SIZE: usize = 12;

/// Tag table entry (as stored in profile)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagEntry {
    /// Tag usage signature
    pub signature: Signature,
    /// Offset from start of profile
    pub offset: u32,
    /// Size of tag data
    pub size: u32,
}

impl TagEntry {
    /// Whether the tag data lies inside a profile of `profile_size` bytes
    pub fn in_bounds(&self, profile_size: usize) -> bool {
        self.offset as usize + self.size as usize <= profile_size
    }

    pub fn check_bounds(&self, profile_size: usize) -> Result<(), IccError> {
        if self.in_bounds(profile_size) {
            Ok(())
        } else {
            Err(IccError::TagOutOfBounds {
                tag: self.signature.0,
                offset: self.offset,
                size: self.size,
                profile_size,
            })
        }
    }
}

/// Get the number of tags in the profile
pub fn tag_count(data: &[u8]) -> Result<usize, IccError> {
    read_u32(data, MIN_PROFILE_SIZE)
        .map(|c| c as usize)
        .ok_or(IccError::TooSmall {
            expected: HEADER_WITH_COUNT,
            actual: data.len(),
        })
}

/// Parse the tag table
///
/// Entries are returned in table order; their data ranges are not
/// checked here so callers can decide how to treat broken entries.
pub fn read_tag_table(data: &[u8]) -> Result<Vec<TagEntry>, IccError> {
    let count = tag_count(data)?;
    let required_size = HEADER_WITH_COUNT + count * TAG_ENTRY_SIZE;

    if data.len() < required_size {
        return Err(IccError::TooSmall {
            expected: required_size,
            actual: data.len(),
        });
    }

    let entries = (0..count)
        .map(|i| {
            let offset = HEADER_WITH_COUNT + i * TAG_ENTRY_SIZE;
            TagEntry {
                signature: Signature(read_u32(data, offset).unwrap_or(0)),
                offset: read_u32(data, offset + 4).unwrap_or(0),
                size: read_u32(data, offset + 8).unwrap_or(0),
            }
        })
        .collect();

    Ok(entries)
}

/// Byte length of header plus a table of `count` entries
pub const fn table_end(count: usize) -> usize {
    HEADER_WITH_COUNT + count * TAG_ENTRY_SIZE
}

/// Write the count and entries into `out`, which already holds the header
pub fn write_tag_table(out: &mut Vec<u8>, entries: &[TagEntry]) {
    write_u32(out, MIN_PROFILE_SIZE, entries.len() as u32);
    for (i, entry) in entries.iter().enumerate() {
        let offset = HEADER_WITH_COUNT + i * TAG_ENTRY_SIZE;
        write_u32(out, offset, entry.signature.0);
        write_u32(out, offset + 4, entry.offset);
        write_u32(out, offset + 8, entry.size);
    }
}

/// Round `len` up to the next 4 byte boundary
pub const fn align4(len: usize) -> usize {
    (len + 3) & !3
}
