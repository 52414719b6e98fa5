//! Bounded top-K tracking over a stream of items.
//!
//! A [`TopK`] keeps the `capacity` most-preferred items offered to it under a
//! [`Ranking`]. Internally it is a min-heap keyed on preference, so the root is
//! always the item that would be evicted next and every offer costs
//! `O(log K)` regardless of how many items have streamed past.

use crate::models::FileRecord;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fmt;
use std::marker::PhantomData;
use std::time::SystemTime;

/// Default number of items retained by each file list.
pub const DEFAULT_CAPACITY: usize = 10;

/// Ordering used by a [`TopK`]: items with a greater key are preferred.
pub trait Ranking<T> {
    type Key: Ord + Clone;

    fn key(item: &T) -> Self::Key;
}

/// Largest files first.
#[derive(Debug, Clone, Copy, Default)]
pub struct LargestFirst;

/// Oldest modification time first.
#[derive(Debug, Clone, Copy, Default)]
pub struct OldestFirst;

/// Newest modification time first.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewestFirst;

impl Ranking<FileRecord> for LargestFirst {
    type Key = u64;

    fn key(item: &FileRecord) -> u64 {
        item.size
    }
}

impl Ranking<FileRecord> for OldestFirst {
    type Key = Reverse<SystemTime>;

    fn key(item: &FileRecord) -> Reverse<SystemTime> {
        Reverse(item.last_modified)
    }
}

impl Ranking<FileRecord> for NewestFirst {
    type Key = SystemTime;

    fn key(item: &FileRecord) -> SystemTime {
        item.last_modified
    }
}

/// Heap slot; ordering is "more preferred is greater".
struct Slot<K, T> {
    key: K,
    seq: u64,
    item: T,
}

impl<K: Ord, T> Ord for Slot<K, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Equal keys: the earlier offer wins.
        self.key
            .cmp(&other.key)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<K: Ord, T> PartialOrd for Slot<K, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord, T> PartialEq for Slot<K, T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K: Ord, T> Eq for Slot<K, T> {}

/// Fixed-capacity container retaining the K most-preferred items seen so far.
pub struct TopK<T, R: Ranking<T>> {
    capacity: usize,
    next_seq: u64,
    heap: BinaryHeap<Reverse<Slot<R::Key, T>>>,
    _ranking: PhantomData<R>,
}

impl<T, R: Ranking<T>> TopK<T, R> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            next_seq: 0,
            heap: BinaryHeap::with_capacity(capacity.saturating_add(1)),
            _ranking: PhantomData,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Offer an item, evicting the least-preferred one if capacity is exceeded.
    pub fn offer(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }

        let slot = Slot {
            key: R::key(&item),
            seq: self.next_seq,
            item,
        };
        self.next_seq += 1;

        if self.heap.len() >= self.capacity
            && let Some(Reverse(weakest)) = self.heap.peek()
            && slot <= *weakest
        {
            return;
        }

        self.heap.push(Reverse(slot));
        if self.heap.len() > self.capacity {
            self.heap.pop();
        }
    }

    /// Items ordered most-preferred first, borrowing from the tracker.
    #[must_use]
    pub fn sorted(&self) -> Vec<&T> {
        let mut slots: Vec<&Slot<R::Key, T>> = self.heap.iter().map(|r| &r.0).collect();
        slots.sort_by(|a, b| b.cmp(a));
        slots.into_iter().map(|slot| &slot.item).collect()
    }

    /// Consume the tracker, returning items most-preferred first.
    #[must_use]
    pub fn into_sorted_vec(self) -> Vec<T> {
        // BinaryHeap::into_sorted_vec is ascending; under Reverse that is
        // most-preferred first.
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse(slot)| slot.item)
            .collect()
    }

    /// Fold another tracker into this one by re-offering its items.
    pub fn merge(&mut self, other: Self) {
        for item in other.into_sorted_vec() {
            self.offer(item);
        }
    }
}

impl<T, R: Ranking<T>> Default for TopK<T, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, R: Ranking<T>> Clone for TopK<T, R> {
    fn clone(&self) -> Self {
        let heap = self
            .heap
            .iter()
            .map(|Reverse(slot)| {
                Reverse(Slot {
                    key: slot.key.clone(),
                    seq: slot.seq,
                    item: slot.item.clone(),
                })
            })
            .collect();

        Self {
            capacity: self.capacity,
            next_seq: self.next_seq,
            heap,
            _ranking: PhantomData,
        }
    }
}

impl<T: fmt::Debug, R: Ranking<T>> fmt::Debug for TopK<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TopK")
            .field("capacity", &self.capacity)
            .field("items", &self.sorted())
            .finish()
    }
}
