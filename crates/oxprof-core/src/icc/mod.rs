//! ICC Byte Layout
//!
//! Fixed-layout pieces of the ICC format: the 128-byte header, the tag
//! table and the big-endian signature and number types.
//!
//! # Structure
//!
//! An ICC profile consists of:
//! 1. A 128-byte header
//! 2. A tag table listing all tags
//! 3. Tag data, each block starting with its 4-byte type signature
//!
//! Decoding of individual tag types lives in [`crate::tag`].

pub mod header;

mod error;
mod parser;
mod types;

pub use error::IccError;
pub use header::{MIN_PROFILE_SIZE, ProfileVersion, SignatureKind};
pub use parser::{TagEntry, align4, read_tag_table, table_end, tag_count, write_tag_table};
pub use types::{S15Fixed16, Signature, XyzNumber, read_u16, read_u32, write_u32};
