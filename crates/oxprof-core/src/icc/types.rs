//! ICC Basic Types
//!
//! Signatures and fixed point numbers as laid out in ICC.1:2022.

use std::fmt;

use serde::{Deserialize, Serialize};

/// ICC signature (4-byte big-endian code)
///
/// Used for tag usages, tag types, color spaces, device classes and
/// every other 4-character code of the format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Signature(pub u32);

impl Signature {
    /// Create from 4 ASCII characters
    pub const fn from_bytes(b: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(b))
    }

    /// Big-endian bytes of the code
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// Zero means "not set"
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Read a signature at `offset`, `None` if out of range
    pub fn read(data: &[u8], offset: usize) -> Option<Self> {
        read_u32(data, offset).map(Self)
    }

    // Tag usages
    pub const HEAD: Self = Self::from_bytes(*b"head");
    pub const DESC: Self = Self::from_bytes(*b"desc");
    pub const COPYRIGHT: Self = Self::from_bytes(*b"cprt");
    pub const DMDD: Self = Self::from_bytes(*b"dmdd");
    pub const DMND: Self = Self::from_bytes(*b"dmnd");
    pub const META: Self = Self::from_bytes(*b"meta");
    pub const PSID: Self = Self::from_bytes(*b"psid");
    pub const SCRD: Self = Self::from_bytes(*b"scrd");
    pub const VIEW_COND_DESC: Self = Self::from_bytes(*b"vued");
    pub const MEDIA_WHITE: Self = Self::from_bytes(*b"wtpt");
    pub const RED_COLORANT: Self = Self::from_bytes(*b"rXYZ");
    pub const GREEN_COLORANT: Self = Self::from_bytes(*b"gXYZ");
    pub const BLUE_COLORANT: Self = Self::from_bytes(*b"bXYZ");
    pub const RED_TRC: Self = Self::from_bytes(*b"rTRC");
    pub const GREEN_TRC: Self = Self::from_bytes(*b"gTRC");
    pub const BLUE_TRC: Self = Self::from_bytes(*b"bTRC");
    pub const TECH: Self = Self::from_bytes(*b"tech");

    // Tag types
    pub const TYPE_TEXT: Self = Self::from_bytes(*b"text");
    pub const TYPE_DESC: Self = Self::from_bytes(*b"desc");
    pub const TYPE_MLUC: Self = Self::from_bytes(*b"mluc");
    pub const TYPE_DICT: Self = Self::from_bytes(*b"dict");
    pub const TYPE_PSID: Self = Self::from_bytes(*b"psid");
    pub const TYPE_XYZ: Self = Self::from_bytes(*b"XYZ ");
    pub const TYPE_CURVE: Self = Self::from_bytes(*b"curv");
    pub const TYPE_SIG: Self = Self::from_bytes(*b"sig ");

    // Color spaces
    pub const XYZ_DATA: Self = Self::from_bytes(*b"XYZ ");
    pub const LAB_DATA: Self = Self::from_bytes(*b"Lab ");
    pub const RGB_DATA: Self = Self::from_bytes(*b"RGB ");
    pub const GRAY_DATA: Self = Self::from_bytes(*b"GRAY");
    pub const CMYK_DATA: Self = Self::from_bytes(*b"CMYK");
    pub const CMY_DATA: Self = Self::from_bytes(*b"CMY ");

    // Device classes
    pub const INPUT_CLASS: Self = Self::from_bytes(*b"scnr");
    pub const DISPLAY_CLASS: Self = Self::from_bytes(*b"mntr");
    pub const OUTPUT_CLASS: Self = Self::from_bytes(*b"prtr");
    pub const LINK_CLASS: Self = Self::from_bytes(*b"link");
    pub const COLOR_SPACE_CLASS: Self = Self::from_bytes(*b"spac");
    pub const ABSTRACT_CLASS: Self = Self::from_bytes(*b"abst");
    pub const NAMED_COLOR_CLASS: Self = Self::from_bytes(*b"nmcl");

    /// Profile file magic 'acsp'
    pub const MAGIC: Self = Self::from_bytes(*b"acsp");
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.to_bytes();
        if bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            let text = String::from_utf8_lossy(&bytes);
            f.write_str(text.trim_end())
        } else {
            write!(f, "0x{:08X}", self.0)
        }
    }
}

impl From<u32> for Signature {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Read a big-endian u16 at `offset`
pub fn read_u16(data: &[u8], offset: usize) -> Option<u16> {
    let b = data.get(offset..offset + 2)?;
    Some(u16::from_be_bytes([b[0], b[1]]))
}

/// Read a big-endian u32 at `offset`
pub fn read_u32(data: &[u8], offset: usize) -> Option<u32> {
    let b = data.get(offset..offset + 4)?;
    Some(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

/// Write a big-endian u16 at `offset`, growing `data` as needed
pub fn write_u16(data: &mut Vec<u8>, offset: usize, value: u16) {
    if data.len() < offset + 2 {
        data.resize(offset + 2, 0);
    }
    data[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
}

/// Write a big-endian u32 at `offset`, growing `data` as needed
pub fn write_u32(data: &mut Vec<u8>, offset: usize, value: u32) {
    if data.len() < offset + 4 {
        data.resize(offset + 4, 0);
    }
    data[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

/// s15Fixed16Number - 16.16 fixed point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct S15Fixed16(pub i32);

impl S15Fixed16 {
    /// Create from f64 value
    pub fn from_f64(val: f64) -> Self {
        Self((val * 65536.0).round() as i32)
    }

    /// Convert to f64
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 65536.0
    }

    /// Parse from big-endian bytes
    pub fn from_be_bytes(bytes: [u8; 4]) -> Self {
        Self(i32::from_be_bytes(bytes))
    }
}

/// XYZNumber - ICC XYZ value (3 x s15Fixed16)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct XyzNumber {
    pub x: S15Fixed16,
    pub y: S15Fixed16,
    pub z: S15Fixed16,
}

impl XyzNumber {
    /// Parse from 12 bytes (big-endian)
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let b = bytes.get(..12)?;
        Some(Self {
            x: S15Fixed16::from_be_bytes([b[0], b[1], b[2], b[3]]),
            y: S15Fixed16::from_be_bytes([b[4], b[5], b[6], b[7]]),
            z: S15Fixed16::from_be_bytes([b[8], b[9], b[10], b[11]]),
        })
    }

    pub fn from_f64(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: S15Fixed16::from_f64(x),
            y: S15Fixed16::from_f64(y),
            z: S15Fixed16::from_f64(z),
        }
    }

    pub fn to_be_bytes(self) -> [u8; 12] {
        let mut out = [0u8; 12];
        out[0..4].copy_from_slice(&self.x.0.to_be_bytes());
        out[4..8].copy_from_slice(&self.y.0.to_be_bytes());
        out[8..12].copy_from_slice(&self.z.0.to_be_bytes());
        out
    }

    pub fn to_f64(self) -> [f64; 3] {
        [self.x.to_f64(), self.y.to_f64(), self.z.to_f64()]
    }
}
