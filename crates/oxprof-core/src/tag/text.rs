//! Text Tag Types
//!
//! ICC profiles can contain text in several formats:
//! - text: Simple ASCII text
//! - desc: Profile description (v2 format)
//! - mluc: Multi-localized Unicode (v4 format)
//!
//! See ICC.1:2022 Sections 10.24 (text), 10.14 (desc), 10.15 (mluc)

use crate::error::Result;
use crate::icc::{IccError, Signature, read_u32};

use super::TagValue;
use super::codec::{TagCodec, block_header, decode_utf16be, encode_utf16be, pad4};

/// Bytes of the fixed part of a desc block after the ASCII text
const DESC_TRAILER: usize = 4 + 4 + 2 + 1 + 67;

/// Locale written for mluc records without one
const DEFAULT_LOCALE: (&str, &str) = ("en", "US");

fn corrupted(msg: &str) -> crate::error::Error {
    IccError::CorruptedData(msg.to_string()).into()
}

/// Plain ASCII `text` type
pub struct TextCodec;

impl TagCodec for TextCodec {
    fn tag_type(&self) -> Signature {
        Signature::TYPE_TEXT
    }

    fn decode(&self, block: &[u8]) -> Result<Vec<TagValue>> {
        let data = block.get(8..).ok_or_else(|| corrupted("text tag too small"))?;
        let raw: Vec<u8> = data.iter().take_while(|&&b| b != 0).copied().collect();
        let text = normalize_newlines(&String::from_utf8_lossy(&raw));
        Ok(vec![TagValue::text(text)])
    }

    fn encode(&self, values: &[TagValue], _version: u8) -> Result<Vec<u8>> {
        let text = values
            .iter()
            .map(|v| v.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let mut block = block_header(Signature::TYPE_TEXT);
        block.extend_from_slice(text.as_bytes());
        block.push(0);
        pad4(&mut block);
        Ok(block)
    }
}

/// `\r\n` keeps one line break, a lone `\r` becomes one
fn normalize_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                out.push(' ');
            } else {
                out.push('\n');
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// v2 `desc` textDescriptionType
pub struct DescCodec;

impl TagCodec for DescCodec {
    fn tag_type(&self) -> Signature {
        Signature::TYPE_DESC
    }

    fn decode(&self, block: &[u8]) -> Result<Vec<TagValue>> {
        // ASCII description count (includes null)
        let count =
            read_u32(block, 8).ok_or_else(|| corrupted("description tag too small"))? as usize;

        let ascii = block
            .get(12..12 + count)
            .ok_or_else(|| corrupted("description ASCII data truncated"))?;
        let text: String = ascii
            .iter()
            .take_while(|&&b| b != 0)
            .map(|&b| b as char)
            .collect();

        // Unicode and ScriptCode variants are rarely used and often broken
        Ok(vec![TagValue::text(text)])
    }

    fn encode(&self, values: &[TagValue], _version: u8) -> Result<Vec<u8>> {
        let text = values.first().map(|v| v.text.as_str()).unwrap_or("");
        let ascii: Vec<u8> = text.chars().map(|c| if c.is_ascii() { c as u8 } else { b'?' }).collect();

        let mut block = block_header(Signature::TYPE_DESC);
        block.extend_from_slice(&(ascii.len() as u32 + 1).to_be_bytes());
        block.extend_from_slice(&ascii);
        block.push(0);
        block.resize(block.len() + DESC_TRAILER, 0);
        pad4(&mut block);
        Ok(block)
    }
}

/// v4 `mluc` multiLocalizedUnicodeType
pub struct MlucCodec;

impl TagCodec for MlucCodec {
    fn tag_type(&self) -> Signature {
        Signature::TYPE_MLUC
    }

    fn decode(&self, block: &[u8]) -> Result<Vec<TagValue>> {
        let record_count =
            read_u32(block, 8).ok_or_else(|| corrupted("mluc tag too small"))? as usize;
        let record_size =
            read_u32(block, 12).ok_or_else(|| corrupted("mluc tag too small"))? as usize;

        if record_count > 0 && record_size < 12 {
            return Err(corrupted("mluc record size too small"));
        }

        let mut values = Vec::with_capacity(record_count.min(64));
        for i in 0..record_count {
            let record_offset = 16 + i * record_size;
            let Some(record) = block.get(record_offset..record_offset + 12) else {
                break;
            };

            let locale = locale_from_codes(&record[0..2], &record[2..4]);
            let len = read_u32(record, 4).unwrap_or(0) as usize;
            let offset = read_u32(record, 8).unwrap_or(0) as usize;

            // The offset is relative to the start of the tag
            let Some(utf16) = block.get(offset..offset + len) else {
                log::warn!("mluc record {} points outside the tag", i);
                continue;
            };
            if let Some(text) = decode_utf16be(utf16) {
                values.push(TagValue::localized(locale, text));
            }
        }

        Ok(values)
    }

    fn encode(&self, values: &[TagValue], _version: u8) -> Result<Vec<u8>> {
        let mut block = block_header(Signature::TYPE_MLUC);
        block.extend_from_slice(&(values.len() as u32).to_be_bytes());
        block.extend_from_slice(&12u32.to_be_bytes());

        let strings: Vec<Vec<u8>> = values.iter().map(|v| encode_utf16be(&v.text)).collect();
        let mut string_offset = 16 + values.len() * 12;

        for (value, utf16) in values.iter().zip(&strings) {
            let (lang, country) = split_locale(value.locale.as_deref());
            block.extend_from_slice(&codes(lang));
            block.extend_from_slice(&codes(country));
            block.extend_from_slice(&(utf16.len() as u32).to_be_bytes());
            block.extend_from_slice(&(string_offset as u32).to_be_bytes());
            string_offset += utf16.len();
        }
        for utf16 in &strings {
            block.extend_from_slice(utf16);
        }
        pad4(&mut block);
        Ok(block)
    }
}

/// `"en_GB"` style locale from two 2-byte codes, `None` if both are empty
fn locale_from_codes(lang: &[u8], country: &[u8]) -> Option<String> {
    let lang: String = lang.iter().filter(|b| **b != 0).map(|&b| b as char).collect();
    let country: String = country.iter().filter(|b| **b != 0).map(|&b| b as char).collect();
    match (lang.is_empty(), country.is_empty()) {
        (true, true) => None,
        (false, true) => Some(lang),
        _ => Some(format!("{}_{}", lang, country)),
    }
}

fn split_locale(locale: Option<&str>) -> (&str, &str) {
    match locale {
        Some(l) => l.split_once('_').unwrap_or((l, "")),
        None => DEFAULT_LOCALE,
    }
}

fn codes(code: &str) -> [u8; 2] {
    let b = code.as_bytes();
    [b.first().copied().unwrap_or(0), b.get(1).copied().unwrap_or(0)]
}
