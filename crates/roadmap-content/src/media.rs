//! Media index
//!
//! Secondary index from `(roadmap, node label)` to the most recent non-empty
//! media set seen under any mode. Lookups are O(1) instead of scanning every
//! cache key for the node.

use crate::types::{MediaKey, MediaSet};
use dashmap::DashMap;

/// Most recent non-empty media per node
#[derive(Debug, Default)]
pub struct MediaIndex {
    inner: DashMap<MediaKey, MediaSet>,
}

impl MediaIndex {
    /// Create empty index
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record media for a node; empty sets never replace a known one
    ///
    /// Returns whether the index changed.
    pub fn record(&self, key: MediaKey, media: &MediaSet) -> bool {
        if media.is_empty() {
            return false;
        }
        self.inner.insert(key, media.clone());
        true
    }

    /// Media to hint for a node, if any
    #[must_use]
    pub fn lookup(&self, key: &MediaKey) -> Option<MediaSet> {
        self.inner.get(key).map(|entry| entry.value().clone())
    }

    /// Number of nodes with media
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// True when no media was recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
