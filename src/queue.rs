//! Weight-ordered queue used while building the Huffman tree.
//!
//! `BinaryHeap` is not stable for equal keys, so entries live in a sorted
//! `VecDeque` instead. A new entry goes after every entry of equal or lower
//! weight, which makes ties pop in arrival order.

use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<T> {
    pub weight: u64,
    pub item: T,
}

#[derive(Debug, Clone)]
pub struct PriorityQueue<T> {
    entries: VecDeque<Entry<T>>,
}

impl<T> PriorityQueue<T> {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, weight: u64, item: T) {
        let at = self.entries.partition_point(|e| e.weight <= weight);
        self.entries.insert(at, Entry { weight, item });
    }

    /// Remove the lowest-weight entry, or `None` once the queue is drained.
    pub fn pop_min(&mut self) -> Option<Entry<T>> {
        self.entries.pop_front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
