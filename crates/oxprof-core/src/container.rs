//! Reference counted ordered container
//!
//! [`RefContainer`] is the ordered list underneath every aggregate in this
//! crate: the tag list of a profile, the decoded values of a tag and the
//! members of a profile set. Slots hold [`Arc`] handles; `get_ref` hands
//! out a new reference, dropping the container releases every handle.
//!
//! # Ordering
//!
//! Indices are stable between mutations. `move_in`, `take_at` and
//! `release_at` shift the following members. `sort_by_rank` reorders by
//! repeated maximum selection so members of equal rank keep their
//! original relative order.

use std::sync::Arc;

use crate::error::{Error, Result};

/// Aggregate kind owning a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentKind {
    /// Tag list of a profile
    Profile,
    /// Decoded values of a tag
    ProfileTag,
    /// Members of a profile set
    ProfileSet,
    /// Free standing list
    Detached,
}

impl ParentKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::ProfileTag => "profile tag",
            Self::ProfileSet => "profile set",
            Self::Detached => "detached",
        }
    }
}

/// Minimum capacity after the first growth
const MIN_GROWTH: usize = 10;

/// Ordered sequence of reference counted handles
#[derive(Debug)]
pub struct RefContainer<T> {
    items: Vec<Option<Arc<T>>>,
    parent: ParentKind,
    name: Option<String>,
}

impl<T> Clone for RefContainer<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            parent: self.parent,
            name: self.name.clone(),
        }
    }
}

impl<T> RefContainer<T> {
    /// Create an empty container owned by `parent`
    pub fn new(parent: ParentKind) -> Self {
        Self {
            items: Vec::new(),
            parent,
            name: None,
        }
    }

    /// Kind of the owning aggregate
    pub fn parent(&self) -> ParentKind {
        self.parent
    }

    /// Assert the container belongs to `expected`
    ///
    /// A mismatch is a programming error: debug builds panic, release
    /// builds report [`Error::TypeMismatch`].
    pub fn check_parent(&self, expected: ParentKind) -> Result<()> {
        debug_assert_eq!(self.parent, expected, "container owned by wrong kind");
        if self.parent == expected {
            Ok(())
        } else {
            Err(Error::TypeMismatch {
                expected: expected.name(),
                found: self.parent.name(),
            })
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Number of slots
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Insert `handle` at `pos`, appending when `pos` is `None` or out of range
    pub fn move_in(&mut self, handle: Arc<T>, pos: Option<usize>) -> Result<()> {
        self.grow()?;
        match pos {
            Some(pos) if pos < self.items.len() => self.items.insert(pos, Some(handle)),
            _ => self.items.push(Some(handle)),
        }
        Ok(())
    }

    /// Wrap `value` and insert it
    pub fn push(&mut self, value: T) -> Result<()> {
        self.move_in(Arc::new(value), None)
    }

    /// New reference to the handle at `pos`
    pub fn get_ref(&self, pos: usize) -> Option<Arc<T>> {
        self.items.get(pos).and_then(|slot| slot.clone())
    }

    /// Borrow the value at `pos`
    pub fn get(&self, pos: usize) -> Option<&T> {
        self.items.get(pos).and_then(|slot| slot.as_deref())
    }

    /// Move the handle at `pos` out of the container
    pub fn take_at(&mut self, pos: usize) -> Option<Arc<T>> {
        if pos < self.items.len() {
            self.items.remove(pos)
        } else {
            None
        }
    }

    /// Release the handle at `pos`; no-op when out of range
    pub fn release_at(&mut self, pos: usize) {
        drop(self.take_at(pos));
    }

    /// Release every handle
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Iterate over the occupied slots
    pub fn iter(&self) -> impl Iterator<Item = &Arc<T>> + '_ {
        self.items.iter().flatten()
    }

    /// Keep only members for which `keep` returns true
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.items
            .retain(|slot| slot.as_deref().is_some_and(|value| keep(value)));
    }

    /// Reorder by descending rank
    ///
    /// The largest rank is found, every member carrying it is moved to the
    /// output in its current order, and the search repeats on what is
    /// left. `ranks` is rewritten to stay aligned with the new order.
    /// Missing ranks count as 0.
    pub fn sort_by_rank(&mut self, ranks: &mut [i32]) {
        let n = self.items.len();
        let mut remaining: Vec<Option<(Option<Arc<T>>, i32)>> = self
            .items
            .drain(..)
            .enumerate()
            .map(|(i, slot)| Some((slot, ranks.get(i).copied().unwrap_or(0))))
            .collect();

        let mut sorted = Vec::with_capacity(n);
        let mut sorted_ranks = Vec::with_capacity(n);

        while let Some(max) = remaining.iter().flatten().map(|(_, rank)| *rank).max() {
            for entry in remaining.iter_mut() {
                if entry.as_ref().is_some_and(|(_, rank)| *rank == max) {
                    if let Some((slot, rank)) = entry.take() {
                        sorted.push(slot);
                        sorted_ranks.push(rank);
                    }
                }
            }
        }

        self.items = sorted;
        for (dst, rank) in ranks.iter_mut().zip(sorted_ranks) {
            *dst = rank;
        }
    }

    /// Grow capacity by about 1.5x, at least to 10 slots
    fn grow(&mut self) -> Result<()> {
        let len = self.items.len();
        if len < self.items.capacity() {
            return Ok(());
        }
        let target = (len + len / 2).max(MIN_GROWTH);
        self.items
            .try_reserve_exact(target - len)
            .map_err(|_| Error::AllocationFailed)
    }
}

impl<T: Clone> RefContainer<T> {
    /// Deep copy: every member is cloned into a fresh handle
    pub fn deep_copy(&self) -> Self {
        Self {
            items: self
                .items
                .iter()
                .map(|slot| slot.as_deref().map(|v| Arc::new(v.clone())))
                .collect(),
            parent: self.parent,
            name: self.name.clone(),
        }
    }
}
