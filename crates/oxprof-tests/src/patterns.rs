//! Rank pattern generation
//!
//! Seeded rank assignments for ordering properties. A narrow value range
//! produces many ties, which is what the within-rank order checks need.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Rank assignment shapes
#[derive(Debug, Clone, Copy)]
pub enum RankPattern {
    /// Uniform in `-range..=range`
    Random { seed: u64, range: i32 },
    /// Every member ranked equal
    Flat(i32),
    /// Strictly increasing, the reverse of the sorted order
    Ascending,
}

/// Ranks for `count` members
pub fn generate_ranks(pattern: RankPattern, count: usize) -> Vec<i32> {
    match pattern {
        RankPattern::Random { seed, range } => {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            (0..count).map(|_| rng.gen_range(-range..=range)).collect()
        }
        RankPattern::Flat(rank) => vec![rank; count],
        RankPattern::Ascending => (0..count as i32).collect(),
    }
}

/// Seeds used by property style tests
pub const SEEDS: [u64; 8] = [1, 2, 3, 5, 8, 13, 21, 42];
