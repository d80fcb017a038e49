//! # oxprof - ICC profile identity, serialization and ranking
//!
//! Loads ICC profiles into content addressed [`Profile`] objects, edits
//! and re-serializes their tags, caches them by file, hash and standard
//! role, and orders profile lists against a device description.
//!
//! ## Overview
//!
//! - [`RefContainer`]: ordered list of shared handles under every aggregate
//! - [`ProfileTag`]: one tag with its raw block and decoded values
//! - [`Profile`]: bytes, tag list, hash and file origin
//! - [`ProfileCache`]: role, file and scan caches plus [`Settings`]
//! - [`ProfileSet`]: filtered and ranked profile lists
//! - [`device`]: device descriptors and rank maps
//!
//! ## Quick Start
//!
//! ```no_run
//! use oxprof_core::{ProfileCache, ProfileClass, ProfileSet, Settings, TextKind};
//!
//! let cache = ProfileCache::new(Settings::from_env()?);
//! let (set, current) = ProfileSet::for_standard_class(&cache, ProfileClass::EditingRgb)?;
//! for (i, profile) in set.iter().enumerate() {
//!     let marker = if Some(i) == current { "*" } else { " " };
//!     println!("{} {}", marker, profile.get_text(TextKind::Description));
//! }
//! # Ok::<(), oxprof_core::Error>(())
//! ```

pub mod cache;
pub mod config;
pub mod container;
pub mod device;
pub mod error;
pub mod hash;
pub mod icc;
pub mod profile;
pub mod profiles;
pub mod role;
pub mod tag;

pub use cache::{CancelToken, ProfileCache};
pub use config::Settings;
pub use container::{ParentKind, RefContainer};
pub use device::{DeviceDescriptor, RankEntry, RankMap};
pub use error::{Error, Result};
pub use hash::{HashSource, ProfileHash};
pub use icc::{IccError, Signature, SignatureKind};
pub use profile::{LoadOptions, Profile, TextKind};
pub use profiles::{ProfileClass, ProfileSet};
pub use role::StandardRole;
pub use tag::{CodecRegistry, ProfileTag, TagCodec, TagStatus, TagValue};

/// Version of oxprof
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
