//! Numeric Tag Types
//!
//! Small fixed-layout types decoded into text values:
//! - XYZ: colorants, white point (ICC.1:2022 10.31)
//! - curv: gamma or lookup table TRC (10.6)
//! - sig: a single signature (10.23)

use crate::error::Result;
use crate::icc::{IccError, Signature, XyzNumber, read_u16, read_u32};

use super::TagValue;
use super::codec::{TagCodec, block_header};

fn corrupted(msg: &str) -> crate::error::Error {
    IccError::CorruptedData(msg.to_string()).into()
}

/// `XYZ ` codec; one value per XYZNumber, formatted as "X Y Z"
pub struct XyzCodec;

impl TagCodec for XyzCodec {
    fn tag_type(&self) -> Signature {
        Signature::TYPE_XYZ
    }

    fn decode(&self, block: &[u8]) -> Result<Vec<TagValue>> {
        let data = block.get(8..).unwrap_or_default();
        // Each XYZNumber is 12 bytes (3 x s15Fixed16)
        let values: Vec<TagValue> = data
            .chunks_exact(12)
            .filter_map(XyzNumber::from_bytes)
            .map(|xyz| {
                let [x, y, z] = xyz.to_f64();
                TagValue::entry("XYZ", format!("{:.4} {:.4} {:.4}", x, y, z))
            })
            .collect();

        if values.is_empty() {
            return Err(corrupted("XYZ tag has no values"));
        }
        Ok(values)
    }

    fn encode(&self, values: &[TagValue], _version: u8) -> Result<Vec<u8>> {
        let mut block = block_header(Signature::TYPE_XYZ);
        for value in values {
            let parts: Vec<f64> = value
                .text
                .split_whitespace()
                .map(|p| p.parse::<f64>())
                .collect::<std::result::Result<_, _>>()
                .map_err(|_| corrupted("XYZ value is not numeric"))?;
            let [x, y, z] = parts[..] else {
                return Err(corrupted("XYZ value needs three numbers"));
            };
            block.extend_from_slice(&XyzNumber::from_f64(x, y, z).to_be_bytes());
        }
        Ok(block)
    }
}

/// `curv` codec (decode only)
pub struct CurveCodec;

impl TagCodec for CurveCodec {
    fn tag_type(&self) -> Signature {
        Signature::TYPE_CURVE
    }

    fn decode(&self, block: &[u8]) -> Result<Vec<TagValue>> {
        let count = read_u32(block, 8).ok_or_else(|| corrupted("curve tag too small"))? as usize;

        match count {
            0 => Ok(vec![TagValue::entry("gamma", "1.0")]),
            1 => {
                // Single gamma value as u8Fixed8
                let raw = read_u16(block, 12).ok_or_else(|| corrupted("curve gamma value missing"))?;
                Ok(vec![TagValue::entry("gamma", format!("{:.2}", raw as f64 / 256.0))])
            }
            _ => {
                let required_len = 12 + count * 2;
                if block.len() < required_len {
                    return Err(corrupted("curve table truncated"));
                }
                Ok(vec![TagValue::entry("table", count.to_string())])
            }
        }
    }
}

/// `sig ` codec (decode only)
pub struct SigCodec;

impl TagCodec for SigCodec {
    fn tag_type(&self) -> Signature {
        Signature::TYPE_SIG
    }

    fn decode(&self, block: &[u8]) -> Result<Vec<TagValue>> {
        let sig = Signature::read(block, 8).ok_or_else(|| corrupted("sig tag too small"))?;
        Ok(vec![TagValue::text(sig.to_string())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_xyz_tag() {
        // D50 white point
        let mut block = b"XYZ \0\0\0\0".to_vec();
        block.extend_from_slice(&[
            0x00, 0x00, 0xF6, 0xD6, // X = 0.9642 (approximately)
            0x00, 0x01, 0x00, 0x00, // Y = 1.0
            0x00, 0x00, 0xD3, 0x2D, // Z = 0.8249 (approximately)
        ]);
        let values = XyzCodec.decode(&block).unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].text, "0.9642 1.0000 0.8249");
    }

    #[test]
    fn test_xyz_encode() {
        let block = XyzCodec
            .encode(&[TagValue::entry("XYZ", "0.9642 1.0 0.8249")], 4)
            .unwrap();
        assert_eq!(block.len(), 20);
        assert_eq!(&block[12..16], &[0x00, 0x01, 0x00, 0x00]);
        assert!(XyzCodec.encode(&[TagValue::text("1 2")], 4).is_err());
    }

    #[test]
    fn test_parse_xyz_too_small() {
        assert!(XyzCodec.decode(b"XYZ \0\0\0\0\0\0").is_err());
    }

    #[test]
    fn test_curve_gamma() {
        let block = [b'c', b'u', b'r', b'v', 0, 0, 0, 0, 0, 0, 0, 1, 0x02, 0x33];
        let values = CurveCodec.decode(&block).unwrap();
        assert_eq!(values[0].key.as_deref(), Some("gamma"));
        assert_eq!(values[0].text, "2.20");
    }

    #[test]
    fn test_sig() {
        let values = SigCodec.decode(b"sig \0\0\0\0CRT ").unwrap();
        assert_eq!(values[0].text, "CRT");
    }
}
