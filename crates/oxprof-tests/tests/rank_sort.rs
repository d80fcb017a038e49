//! Rank Sort Tests
//!
//! `sort_by_rank` must group members by descending rank and keep the
//! previous order inside every group.

use oxprof_core::{ParentKind, RefContainer};
use oxprof_tests::patterns::{RankPattern, SEEDS, generate_ranks};

fn indexed(count: usize) -> RefContainer<usize> {
    let mut list = RefContainer::new(ParentKind::Detached);
    for i in 0..count {
        list.push(i).unwrap();
    }
    list
}

fn order(list: &RefContainer<usize>) -> Vec<usize> {
    list.iter().map(|i| **i).collect()
}

/// Sort `ranks` and check the result against a stable reference sort
fn check(ranks: Vec<i32>) {
    let mut list = indexed(ranks.len());
    let mut sorted_ranks = ranks.clone();
    list.sort_by_rank(&mut sorted_ranks);

    let mut expected: Vec<usize> = (0..ranks.len()).collect();
    expected.sort_by_key(|&i| std::cmp::Reverse(ranks[i]));

    assert_eq!(order(&list), expected, "ranks {:?}", ranks);
    assert!(sorted_ranks.windows(2).all(|w| w[0] >= w[1]));
    for (member, rank) in order(&list).iter().zip(&sorted_ranks) {
        assert_eq!(ranks[*member], *rank);
    }
}

#[test]
fn random_ranks_sort_stably() {
    for seed in SEEDS {
        for count in [1, 2, 7, 31, 100] {
            check(generate_ranks(RankPattern::Random { seed, range: 3 }, count));
            check(generate_ranks(RankPattern::Random { seed, range: 1000 }, count));
        }
    }
}

#[test]
fn flat_ranks_keep_order() {
    let ranks = generate_ranks(RankPattern::Flat(-2), 12);
    let mut list = indexed(12);
    let mut sorted = ranks.clone();
    list.sort_by_rank(&mut sorted);

    assert_eq!(order(&list), (0..12).collect::<Vec<_>>());
    assert_eq!(sorted, ranks);
}

#[test]
fn ascending_ranks_reverse() {
    let ranks = generate_ranks(RankPattern::Ascending, 9);
    let mut list = indexed(9);
    let mut sorted = ranks.clone();
    list.sort_by_rank(&mut sorted);

    assert_eq!(order(&list), (0..9).rev().collect::<Vec<_>>());
    assert_eq!(sorted, (0..9).rev().collect::<Vec<i32>>());
}

#[test]
fn missing_ranks_count_as_zero() {
    let mut list = indexed(4);
    let mut ranks = [-1, 5];
    list.sort_by_rank(&mut ranks);

    // members 2 and 3 have no rank
    assert_eq!(order(&list), vec![1, 2, 3, 0]);
    assert_eq!(ranks, [5, 0]);
}

#[test]
fn empty_list_is_untouched() {
    let mut list = indexed(0);
    let mut ranks: [i32; 0] = [];
    list.sort_by_rank(&mut ranks);
    assert!(list.is_empty());
}
