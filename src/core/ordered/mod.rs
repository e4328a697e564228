//! # Ordered Module
//!
//! The pipeline's final sink: a thread-safe, totally ordered collection
//! keyed by `(hue, path)`.
//!
//! The path tie-break is load-bearing. Keying by hue alone would collapse
//! two images with an identical hue into one entry, leaving the
//! completion count permanently short and every stage spinning; with the
//! compound key a hue tie inserts two entries and the pipeline always
//! terminates.

use crate::core::pipeline::WorkItem;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Ordering key: hue first (total order over f64), then path.
#[derive(Debug, Clone, PartialEq)]
struct HueKey {
    hue: f64,
    path: PathBuf,
}

impl Eq for HueKey {}

impl Ord for HueKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.hue
            .total_cmp(&other.hue)
            .then_with(|| self.path.cmp(&other.path))
    }
}

impl PartialOrd for HueKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Thread-safe, duplicate-free-by-key, hue-ordered result collection.
pub struct OrderedResultSet {
    items: Mutex<BTreeMap<HueKey, WorkItem>>,
}

impl OrderedResultSet {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(BTreeMap::new()),
        }
    }

    /// Insert an item keyed by `(sort_hue, path)`.
    ///
    /// Idempotent: an identical key leaves the set unchanged. Two
    /// distinct images can never collide because the path is part of
    /// the key.
    pub fn insert(&self, item: WorkItem) {
        let key = HueKey {
            hue: item.sort_hue(),
            path: item.path.clone(),
        };
        let mut items = self.items.lock().expect("result set lock poisoned");
        items.entry(key).or_insert(item);
    }

    pub fn len(&self) -> usize {
        self.items.lock().expect("result set lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Point-in-time copy in ascending `(hue, path)` order. Valid at any
    /// time, including mid-run, when it holds the completed prefix of
    /// the final result.
    pub fn snapshot_ordered(&self) -> Vec<WorkItem> {
        let items = self.items.lock().expect("result set lock poisoned");
        items.values().cloned().collect()
    }
}

impl Default for OrderedResultSet {
    fn default() -> Self {
        Self::new()
    }
}
