//! Profile Sequence Identifier Tag Type
//!
//! Device links record which profiles they were built from. Each entry
//! holds the 16 byte profile ID of one member followed by an embedded
//! `mluc` description. See ICC.1:2022 Section 10.20.

use crate::error::Result;
use crate::hash::to_hex;
use crate::icc::{IccError, Signature, read_u32};

use super::TagValue;
use super::codec::TagCodec;
use super::text::MlucCodec;

/// Key of the hash value of each sequence member
pub const MD5_KEY: &str = "md5id";

/// Key of the description values of each sequence member
pub const DESCRIPTION_KEY: &str = "description";

/// `psid` codec (decode only)
pub struct PsidCodec;

impl TagCodec for PsidCodec {
    fn tag_type(&self) -> Signature {
        Signature::TYPE_PSID
    }

    fn decode(&self, block: &[u8]) -> Result<Vec<TagValue>> {
        let count = read_u32(block, 8)
            .ok_or_else(|| IccError::CorruptedData("psid tag too small".into()))?
            as usize;

        let mut values = Vec::new();
        for i in 0..count {
            let (Some(offset), Some(size)) =
                (read_u32(block, 12 + i * 8), read_u32(block, 16 + i * 8))
            else {
                log::warn!("psid position table truncated at entry {}", i);
                break;
            };
            let Some(entry) = block.get(offset as usize..(offset as usize + size as usize))
            else {
                log::warn!("psid entry {} out of bounds", i);
                continue;
            };
            let Some(md5) = entry.get(..16) else {
                continue;
            };

            values.push(TagValue::entry(MD5_KEY, to_hex(md5)));

            if let Some(desc) = entry.get(16..) {
                if desc.starts_with(&Signature::TYPE_MLUC.to_bytes()) {
                    for value in MlucCodec.decode(desc).unwrap_or_default() {
                        values.push(TagValue {
                            key: Some(DESCRIPTION_KEY.to_string()),
                            ..value
                        });
                    }
                }
            }
        }

        Ok(values)
    }
}

/// Hash of sequence member `pos` from decoded psid values
pub fn member_hash(values: &[TagValue], pos: usize) -> Option<&str> {
    values
        .iter()
        .filter(|v| v.key.as_deref() == Some(MD5_KEY))
        .nth(pos)
        .map(|v| v.text.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn psid_block(ids: &[[u8; 16]]) -> Vec<u8> {
        let desc = MlucCodec
            .encode(&[TagValue::localized(Some("en_US".into()), "member")], 4)
            .unwrap();
        let mut block = b"psid\0\0\0\0".to_vec();
        block.extend_from_slice(&(ids.len() as u32).to_be_bytes());
        let mut offset = 12 + ids.len() * 8;
        for _ in ids {
            let size = 16 + desc.len();
            block.extend_from_slice(&(offset as u32).to_be_bytes());
            block.extend_from_slice(&(size as u32).to_be_bytes());
            offset += size;
        }
        for id in ids {
            block.extend_from_slice(id);
            block.extend_from_slice(&desc);
        }
        block
    }

    #[test]
    fn test_decode_members() {
        let block = psid_block(&[[0x11; 16], [0xab; 16]]);
        let values = PsidCodec.decode(&block).unwrap();

        assert_eq!(member_hash(&values, 0), Some("11111111111111111111111111111111"));
        assert_eq!(member_hash(&values, 1), Some("abababababababababababababababab"));
        assert_eq!(member_hash(&values, 2), None);

        let desc = values
            .iter()
            .find(|v| v.key.as_deref() == Some(DESCRIPTION_KEY))
            .unwrap();
        assert_eq!(desc.text, "member");
        assert_eq!(desc.locale.as_deref(), Some("en_US"));
    }

    #[test]
    fn test_out_of_bounds_entry() {
        let mut block = psid_block(&[[1; 16]]);
        block.truncate(30);
        assert!(PsidCodec.decode(&block).unwrap().is_empty());
    }
}
