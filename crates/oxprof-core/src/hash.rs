//! Profile content hash
//!
//! Profiles are identified by the MD5 digest defined in ICC.1:2022
//! Section 7.2.18: the digest of the whole profile with the flags,
//! rendering intent and profile ID header fields set to zero.

use md5::{Digest, Md5};

use crate::icc::MIN_PROFILE_SIZE;
use crate::icc::header::{FLAGS_OFFSET, INTENT_OFFSET, PROFILE_ID_OFFSET};

/// 128 bit content hash
pub type ProfileHash = [u8; 16];

/// Where a profile hash comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashSource {
    /// Embedded profile ID when non-zero, computed otherwise
    #[default]
    Header,
    /// Always compute from the bytes
    Compute,
}

/// Compute the profile ID of `data`
pub fn compute_md5(data: &[u8]) -> ProfileHash {
    let mut hasher = Md5::new();
    if data.len() < MIN_PROFILE_SIZE {
        hasher.update(data);
    } else {
        let mut header = [0u8; MIN_PROFILE_SIZE];
        header.copy_from_slice(&data[..MIN_PROFILE_SIZE]);
        header[FLAGS_OFFSET..FLAGS_OFFSET + 4].fill(0);
        header[INTENT_OFFSET..INTENT_OFFSET + 4].fill(0);
        header[PROFILE_ID_OFFSET..PROFILE_ID_OFFSET + 16].fill(0);
        hasher.update(header);
        hasher.update(&data[MIN_PROFILE_SIZE..]);
    }
    hasher.finalize().into()
}

/// Embedded profile ID, `None` when absent or all zero
pub fn header_id(data: &[u8]) -> Option<ProfileHash> {
    let id: ProfileHash = data
        .get(PROFILE_ID_OFFSET..PROFILE_ID_OFFSET + 16)?
        .try_into()
        .ok()?;
    (id != [0; 16]).then_some(id)
}

/// Hash of `data` according to `source`
pub fn profile_hash(data: &[u8], source: HashSource) -> ProfileHash {
    match source {
        HashSource::Header => header_id(data).unwrap_or_else(|| compute_md5(data)),
        HashSource::Compute => compute_md5(data),
    }
}

/// Lower-case hex, four 32 bit words
pub fn to_hex(hash: &[u8]) -> String {
    hash.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Parse 32 hex digits
pub fn from_hex(text: &str) -> Option<ProfileHash> {
    if text.len() != 32 || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let mut out = [0u8; 16];
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&text[i * 2..i * 2 + 2], 16).ok()?;
    }
    Some(out)
}
