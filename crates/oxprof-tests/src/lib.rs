//! # oxprof-tests
//!
//! Integration testing support for oxprof.
//!
//! This crate provides:
//! - In-code ICC profile fixtures (no binary files in the repository)
//! - Scratch profile directories with a matching [`ProfileCache`]
//! - Seeded random rank assignments for ordering properties
//!
//! ## Test Categories
//!
//! 1. **Round trip**: byte exact `get_mem`, partial rewrites
//! 2. **Identity**: hashes, ids, equality
//! 3. **Rank sort**: grouping and within-rank order
//! 4. **Profile sets**: pattern selection, de-duplication, cache refresh
//! 5. **Device rank**: embedded device descriptions against a device
//! 6. **Standard roles**: role lookup, role cache, fallbacks
//!
//! [`ProfileCache`]: oxprof_core::ProfileCache

pub mod corpus;
pub mod fixtures;
pub mod patterns;

pub use corpus::ProfileDir;
pub use fixtures::ProfileBuilder;

/// Install a test logger once
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
