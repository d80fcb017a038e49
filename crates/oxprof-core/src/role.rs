//! Standard profile roles
//!
//! Well known profile purposes resolved through [`crate::Settings`]
//! instead of an explicit file name. Role ids are stable numbers so a
//! profile obtained through a role can be identified by that number.

/// First id of the role range (not a role itself)
pub const ROLE_RANGE_START: u32 = 100;

/// One past the last role id
pub const ROLE_RANGE_END: u32 = 121;

/// Slots in the per-role cache
pub const ROLE_COUNT: usize = (ROLE_RANGE_END - ROLE_RANGE_START) as usize;

/// Well known profile purpose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum StandardRole {
    EditingXyz = 101,
    EditingLab = 102,
    EditingRgb = 103,
    EditingCmyk = 104,
    EditingGray = 105,
    AssumedXyz = 110,
    AssumedLab = 111,
    AssumedRgb = 112,
    /// Static assumption for untagged web content
    AssumedWeb = 113,
    AssumedCmyk = 114,
    AssumedGray = 115,
    Proof = 120,
}

impl StandardRole {
    pub const ALL: [StandardRole; 12] = [
        Self::EditingXyz,
        Self::EditingLab,
        Self::EditingRgb,
        Self::EditingCmyk,
        Self::EditingGray,
        Self::AssumedXyz,
        Self::AssumedLab,
        Self::AssumedRgb,
        Self::AssumedWeb,
        Self::AssumedCmyk,
        Self::AssumedGray,
        Self::Proof,
    ];

    /// Numeric role id
    pub const fn id(self) -> u32 {
        self as u32
    }

    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|r| r.id() == id)
    }

    /// Slot in the role cache
    pub const fn index(self) -> usize {
        (self.id() - ROLE_RANGE_START) as usize
    }

    /// Settings key
    pub const fn key(self) -> &'static str {
        match self {
            Self::EditingXyz => "editing_xyz",
            Self::EditingLab => "editing_lab",
            Self::EditingRgb => "editing_rgb",
            Self::EditingCmyk => "editing_cmyk",
            Self::EditingGray => "editing_gray",
            Self::AssumedXyz => "assumed_xyz",
            Self::AssumedLab => "assumed_lab",
            Self::AssumedRgb => "assumed_rgb",
            Self::AssumedWeb => "assumed_web",
            Self::AssumedCmyk => "assumed_cmyk",
            Self::AssumedGray => "assumed_gray",
            Self::Proof => "proof",
        }
    }

    /// File name used when nothing is configured
    pub const fn default_file(self) -> &'static str {
        match self {
            Self::EditingRgb | Self::AssumedRgb | Self::AssumedWeb => "sRGB.icc",
            Self::EditingCmyk | Self::AssumedCmyk | Self::Proof => "ISOcoated_v2_bas.ICC",
            Self::EditingXyz | Self::AssumedXyz => "LCMSXYZI.ICM",
            Self::EditingLab | Self::AssumedLab => "LCMSLABI.ICM",
            Self::EditingGray | Self::AssumedGray => "Gray-CIE_L.icc",
        }
    }
}

/// Alternative file names tried when `file_name` cannot be loaded
pub fn aliases(file_name: &str) -> &'static [&'static str] {
    match file_name {
        "XYZ.icc" => &["LCMSXYZI.ICM"],
        "Lab.icc" => &["LCMSLABI.ICM"],
        "LStar-RGB.icc" => &["eciRGB_v2.icc"],
        "sRGB.icc" => &["sRGB.icm"],
        "ISOcoated_v2_bas.ICC" => &["ISOcoated_v2_eci.icc", "Fogra27L.icm"],
        _ => &[],
    }
}
