//! Bounded deque for banner history
//!
//! Fixed-capacity deque that evicts the oldest item once full.

use std::collections::VecDeque;

/// A bounded deque with FIFO eviction
#[derive(Clone, Debug)]
pub struct BoundedDeque<T> {
    cap: usize,
    buf: VecDeque<T>,
}

impl<T> BoundedDeque<T> {
    /// `cap == 0` turns every push into a no-op
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            buf: VecDeque::with_capacity(cap.min(256)),
        }
    }

    /// Push a value, returning the evicted oldest one when at capacity
    pub fn push(&mut self, value: T) -> Option<T> {
        if self.cap == 0 {
            return None;
        }
        let evicted = if self.buf.len() == self.cap {
            self.buf.pop_front()
        } else {
            None
        };
        self.buf.push_back(value);
        evicted
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.buf.iter()
    }

    /// Keep only the items matching `keep`; returns how many were removed
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) -> usize {
        let before = self.buf.len();
        self.buf.retain(|item| keep(item));
        before - self.buf.len()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Most recent item
    pub fn last(&self) -> Option<&T> {
        self.buf.back()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

impl<T> Default for BoundedDeque<T> {
    fn default() -> Self {
        Self::new(crate::constants::BANNER_HISTORY_CAPACITY)
    }
}
