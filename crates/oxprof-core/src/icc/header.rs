//! ICC Profile Header
//!
//! The ICC profile header is exactly 128 bytes and holds big-endian
//! fields at fixed offsets. See ICC.1:2022 Section 7.2.
//!
//! Fields are addressed through [`SignatureKind`] so a profile can read
//! and write single values without decoding the whole header.

use super::error::IccError;
use super::types::{Signature, read_u16, read_u32, write_u16, write_u32};

/// Minimum valid profile size (header only)
pub const MIN_PROFILE_SIZE: usize = 128;

/// Header plus the tag count field
pub const HEADER_WITH_COUNT: usize = MIN_PROFILE_SIZE + 4;

/// Offset of the profile flags field
pub const FLAGS_OFFSET: usize = 44;

/// Offset of the rendering intent field
pub const INTENT_OFFSET: usize = 64;

/// Offset of the 16 byte profile ID (MD5)
pub const PROFILE_ID_OFFSET: usize = 84;

/// Header fields addressable as a signature value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureKind {
    /// Data color space
    ColorSpace,
    /// Profile connection space
    Pcs,
    /// Stored profile size
    Size,
    /// Preferred CMM
    Cmm,
    /// Version word
    Version,
    /// Device class ('mntr', 'prtr', ...)
    Class,
    /// File magic 'acsp'
    Magic,
    /// Primary platform
    Platform,
    /// Header flags
    Options,
    /// Device attributes, high word
    Attributes,
    /// Device attributes, low word
    Attributes2,
    /// Device manufacturer
    Manufacturer,
    /// Device model
    Model,
    /// Rendering intent
    Intent,
    /// Profile creator
    Creator,
    DateTimeYear,
    DateTimeMonth,
    DateTimeDay,
    DateTimeHours,
    DateTimeMinutes,
    DateTimeSeconds,
    /// PCS illuminant X
    IlluminantX,
    /// PCS illuminant Y
    IlluminantY,
    /// PCS illuminant Z
    IlluminantZ,
}

impl SignatureKind {
    /// Every kind, in header order of evaluation
    pub const ALL: [SignatureKind; 24] = [
        Self::ColorSpace,
        Self::Pcs,
        Self::Size,
        Self::Cmm,
        Self::Version,
        Self::Class,
        Self::Magic,
        Self::Platform,
        Self::Options,
        Self::Attributes,
        Self::Attributes2,
        Self::Manufacturer,
        Self::Model,
        Self::Intent,
        Self::Creator,
        Self::DateTimeYear,
        Self::DateTimeMonth,
        Self::DateTimeDay,
        Self::DateTimeHours,
        Self::DateTimeMinutes,
        Self::DateTimeSeconds,
        Self::IlluminantX,
        Self::IlluminantY,
        Self::IlluminantZ,
    ];

    /// Byte offset and width of the field
    pub const fn field(self) -> (usize, usize) {
        match self {
            Self::Size => (0, 4),
            Self::Cmm => (4, 4),
            Self::Version => (8, 4),
            Self::Class => (12, 4),
            Self::ColorSpace => (16, 4),
            Self::Pcs => (20, 4),
            Self::DateTimeYear => (24, 2),
            Self::DateTimeMonth => (26, 2),
            Self::DateTimeDay => (28, 2),
            Self::DateTimeHours => (30, 2),
            Self::DateTimeMinutes => (32, 2),
            Self::DateTimeSeconds => (34, 2),
            Self::Magic => (36, 4),
            Self::Platform => (40, 4),
            Self::Options => (FLAGS_OFFSET, 4),
            Self::Manufacturer => (48, 4),
            Self::Model => (52, 4),
            Self::Attributes => (56, 4),
            Self::Attributes2 => (60, 4),
            Self::Intent => (INTENT_OFFSET, 4),
            Self::IlluminantX => (68, 4),
            Self::IlluminantY => (72, 4),
            Self::IlluminantZ => (76, 4),
            Self::Creator => (80, 4),
        }
    }
}

/// Read one header field; 0 when the header is too short
pub fn read_field(header: &[u8], kind: SignatureKind) -> Signature {
    let (offset, width) = kind.field();
    let value = if width == 2 {
        read_u16(header, offset).map(u32::from)
    } else {
        read_u32(header, offset)
    };
    Signature(value.unwrap_or(0))
}

/// Write one header field, growing the header to 128 bytes if needed
pub fn write_field(header: &mut Vec<u8>, kind: SignatureKind, value: Signature) {
    if header.len() < MIN_PROFILE_SIZE {
        header.resize(MIN_PROFILE_SIZE, 0);
    }
    let (offset, width) = kind.field();
    if width == 2 {
        write_u16(header, offset, value.0 as u16);
    } else {
        write_u32(header, offset, value.0);
    }
}

/// Check magic and size of a complete profile
pub fn validate(data: &[u8]) -> Result<(), IccError> {
    if data.len() < MIN_PROFILE_SIZE {
        return Err(IccError::TooSmall {
            expected: MIN_PROFILE_SIZE,
            actual: data.len(),
        });
    }

    let magic = read_field(data, SignatureKind::Magic);
    if magic != Signature::MAGIC {
        return Err(IccError::InvalidSignature(magic.0));
    }

    let size = read_field(data, SignatureKind::Size).0;
    if size as usize > data.len() {
        return Err(IccError::SizeMismatch {
            header_size: size,
            actual_size: data.len(),
        });
    }

    Ok(())
}

/// ICC Profile Version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProfileVersion {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl ProfileVersion {
    /// Decode from the version header field
    pub fn from_field(sig: Signature) -> Self {
        let b = sig.to_bytes();
        Self {
            major: b[0],
            minor: b[1] >> 4,
            patch: b[1] & 0x0F,
        }
    }

    /// Encode into the version header field
    pub fn to_field(self) -> Signature {
        Signature::from_bytes([self.major, (self.minor << 4) | (self.patch & 0x0F), 0, 0])
    }

    /// Check if version is at least the specified version
    pub fn at_least(&self, major: u8, minor: u8) -> bool {
        self.major > major || (self.major == major && self.minor >= minor)
    }
}

/// Number of channels of a color space signature, 0 if unknown
pub fn channel_count(color_space: Signature) -> usize {
    match &color_space.to_bytes() {
        b"GRAY" => 1,
        b"XYZ " | b"Lab " | b"Luv " | b"YCbr" | b"Yxy " | b"RGB " | b"HSV " | b"HLS "
        | b"CMY " => 3,
        b"CMYK" => 4,
        [n, b'C', b'L', b'R'] => match n {
            b'2'..=b'9' => (n - b'0') as usize,
            b'A'..=b'F' => (n - b'A') as usize + 10,
            _ => 0,
        },
        _ => 0,
    }
}

/// Channel names of a color space signature
pub fn channel_names(color_space: Signature) -> Vec<String> {
    let fixed: &[&str] = match &color_space.to_bytes() {
        b"GRAY" => &["Gray"],
        b"XYZ " => &["X", "Y", "Z"],
        b"Lab " => &["L", "a", "b"],
        b"Luv " => &["L", "u", "v"],
        b"YCbr" => &["Y", "Cb", "Cr"],
        b"Yxy " => &["Y", "x", "y"],
        b"RGB " => &["Red", "Green", "Blue"],
        b"HSV " => &["Hue", "Saturation", "Value"],
        b"HLS " => &["Hue", "Lightness", "Saturation"],
        b"CMY " => &["Cyan", "Magenta", "Yellow"],
        b"CMYK" => &["Cyan", "Magenta", "Yellow", "Black"],
        _ => &[],
    };
    if !fixed.is_empty() {
        return fixed.iter().map(|s| s.to_string()).collect();
    }
    (1..=channel_count(color_space))
        .map(|i| format!("{}. color", i))
        .collect()
}
