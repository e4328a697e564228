//! # Pile Module
//!
//! A thread-safe, unordered hand-off buffer between two pipeline stages.
//!
//! A pile makes no ordering promise between puts and takes; the final
//! result is re-ordered by hue at the last stage, so traversal order is
//! irrelevant. Consumers poll with [`ConcurrentPile::take`] or park on
//! [`ConcurrentPile::take_timeout`], which is backed by a condition
//! variable so idle stages never spin.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};
use std::time::Duration;

/// An unordered, thread-safe bag of work items shared between one
/// producer stage and one consumer stage.
///
/// All operations are mutually exclusive with respect to each other on
/// the same pile, and none blocks the caller indefinitely.
pub struct ConcurrentPile<T> {
    items: Mutex<VecDeque<T>>,
    available: Condvar,
}

impl<T> ConcurrentPile<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
        }
    }

    /// Add an item. Always succeeds; wakes one waiting consumer.
    pub fn put(&self, item: T) {
        let mut items = self.items.lock().expect("pile lock poisoned");
        items.push_back(item);
        self.available.notify_one();
    }

    /// Remove and return an item if one is available, without blocking.
    pub fn take(&self) -> Option<T> {
        let mut items = self.items.lock().expect("pile lock poisoned");
        items.pop_front()
    }

    /// Remove and return an item, waiting up to `timeout` for one to
    /// arrive. Returns `None` on timeout or spurious wake with an empty
    /// pile; callers re-check their termination condition and retry.
    pub fn take_timeout(&self, timeout: Duration) -> Option<T> {
        let mut items = self.items.lock().expect("pile lock poisoned");
        if let Some(item) = items.pop_front() {
            return Some(item);
        }

        let (mut items, _result) = self
            .available
            .wait_timeout(items, timeout)
            .expect("pile lock poisoned");
        items.pop_front()
    }

    /// Number of items currently in the pile.
    pub fn len(&self) -> usize {
        self.items.lock().expect("pile lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wake every consumer blocked in [`ConcurrentPile::take_timeout`].
    ///
    /// Used when the pipeline's termination predicate flips true, so
    /// stages notice immediately instead of waiting out their timeout.
    pub fn wake_all(&self) {
        self.available.notify_all();
    }
}

impl<T: Clone> ConcurrentPile<T> {
    /// Point-in-time copy of the pile contents. Diagnostics only; stage
    /// logic must go through `take`.
    pub fn snapshot(&self) -> Vec<T> {
        let items = self.items.lock().expect("pile lock poisoned");
        items.iter().cloned().collect()
    }
}

impl<T> Default for ConcurrentPile<T> {
    fn default() -> Self {
        Self::new()
    }
}
