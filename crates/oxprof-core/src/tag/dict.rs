//! Dictionary Tag Type
//!
//! `dict` stores key/value pairs as UTF-16BE strings. Profiles use it in
//! the `meta` tag to embed the device they were made for
//! (manufacturer, model, serial, ...). See ICC.1:2022 Section 10.7.
//!
//! Layout after the 8 byte type header: count, entry size (16, 24 or
//! 32), then `count` entries of {name offset, name size, value offset,
//! value size} with optional localized display name/value positions.
//! Offsets are relative to the start of the tag.

use crate::error::Result;
use crate::icc::{IccError, Signature, read_u32};

use super::TagValue;
use super::codec::{TagCodec, block_header, decode_utf16be, encode_utf16be, pad4};

/// `dict` codec
pub struct DictCodec;

impl TagCodec for DictCodec {
    fn tag_type(&self) -> Signature {
        Signature::TYPE_DICT
    }

    fn decode(&self, block: &[u8]) -> Result<Vec<TagValue>> {
        let (Some(count), Some(entry_size)) = (read_u32(block, 8), read_u32(block, 12)) else {
            return Err(IccError::CorruptedData("dict tag too small".into()).into());
        };
        let (count, entry_size) = (count as usize, entry_size as usize);

        if !matches!(entry_size, 16 | 24 | 32) {
            return Err(IccError::CorruptedData(format!("dict entry size {}", entry_size)).into());
        }

        let mut values = Vec::with_capacity(count.min(64));
        for i in 0..count {
            let entry = 16 + i * entry_size;
            let Some(fields) = block.get(entry..entry + 16) else {
                log::warn!("dict tag truncated after {} of {} entries", i, count);
                break;
            };
            let field = |n: usize| read_u32(fields, n * 4).unwrap_or(0) as usize;

            let Some(key) = string_at(block, field(0), field(1)) else {
                continue;
            };
            let value = string_at(block, field(2), field(3)).unwrap_or_default();
            values.push(TagValue::entry(key, value));
        }

        Ok(values)
    }

    fn encode(&self, values: &[TagValue], _version: u8) -> Result<Vec<u8>> {
        let mut block = block_header(Signature::TYPE_DICT);
        block.extend_from_slice(&(values.len() as u32).to_be_bytes());
        block.extend_from_slice(&16u32.to_be_bytes());

        let table = block.len();
        block.resize(table + values.len() * 16, 0);

        for (i, value) in values.iter().enumerate() {
            let key = encode_utf16be(value.key.as_deref().unwrap_or(""));
            let text = encode_utf16be(&value.text);
            let mut positions = [0u32; 4];

            for (slot, data) in [(0, &key), (2, &text)] {
                pad4(&mut block);
                // a present but empty string still gets a non-zero offset
                positions[slot] = block.len() as u32;
                positions[slot + 1] = data.len() as u32;
                block.extend_from_slice(data);
            }

            let entry = table + i * 16;
            for (n, pos) in positions.iter().enumerate() {
                block[entry + n * 4..entry + n * 4 + 4].copy_from_slice(&pos.to_be_bytes());
            }
        }

        pad4(&mut block);
        Ok(block)
    }
}

/// UTF-16BE string at `offset`; a zero offset marks an absent string
fn string_at(block: &[u8], offset: usize, size: usize) -> Option<String> {
    if offset == 0 {
        return None;
    }
    decode_utf16be(block.get(offset..offset + size)?)
}
