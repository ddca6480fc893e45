//! Ordered, deduplicating aggregation of retrieved passages.
//!
//! Passages accumulate across retrieval rounds in first-seen order and are
//! never re-sorted, so citation numbers in the model's prose stay stable
//! from round to round. A passage retrieved again later (same `source_id`,
//! or same text when no ID is available) is skipped, keeping its
//! first-seen similarity score.

use std::collections::HashSet;

use crate::store::RetrievedPassage;

/// Insertion-ordered set of passages, keyed by [`RetrievedPassage::dedup_key`].
#[derive(Debug, Default)]
pub struct SourceList {
    passages: Vec<RetrievedPassage>,
    seen: HashSet<String>,
}

impl SourceList {
    /// Creates an empty source list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a retrieval batch, skipping passages already present.
    ///
    /// Returns how many passages were newly inserted. Batch order is
    /// preserved as-is; equal-similarity ties keep store order.
    pub fn merge(&mut self, batch: &[RetrievedPassage]) -> usize {
        let mut inserted = 0;
        for passage in batch {
            let key = passage.dedup_key();
            if self.seen.contains(key) {
                continue;
            }
            self.seen.insert(key.to_string());
            self.passages.push(passage.clone());
            inserted += 1;
        }
        inserted
    }

    /// Number of distinct passages collected so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.passages.len()
    }

    /// Returns `true` if no passages have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// Consumes the list, yielding passages in first-seen order.
    #[must_use]
    pub fn into_passages(self) -> Vec<RetrievedPassage> {
        self.passages
    }
}
