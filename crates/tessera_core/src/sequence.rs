//! Out-of-order Completion Tracking
//!
//! GPU queues do not necessarily retire submissions in the order they were
//! issued. [`SequenceTracker`] records individual completions and derives the
//! contiguous watermark: the highest sequence `s` such that every sequence
//! `<= s` has completed.
//!
//! The tracker is a plain value; the device wraps it in its own lock.

use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct SequenceTracker {
    /// Every sequence `<= completed_till` is complete.
    completed_till: i64,
    /// Completed sequences above `completed_till`, waiting for the gap below
    /// them to close.
    pending: BTreeSet<i64>,
}

impl SequenceTracker {
    /// Creates a tracker where everything up to and including `base` is
    /// already complete.
    #[must_use]
    pub fn new(base: i64) -> Self {
        Self {
            completed_till: base,
            pending: BTreeSet::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn completed_till(&self) -> i64 {
        self.completed_till
    }

    /// Number of completions recorded above the watermark.
    #[inline]
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Records the completion of `seq`.
    ///
    /// Returns `false` if `seq` was already known to be complete.
    pub fn complete(&mut self, seq: i64) -> bool {
        if seq <= self.completed_till || !self.pending.insert(seq) {
            return false;
        }
        self.drain_contiguous();
        true
    }

    /// Marks everything up to `seq` as complete in bulk.
    pub fn advance_to(&mut self, seq: i64) {
        if seq <= self.completed_till {
            return;
        }
        self.completed_till = seq;
        self.pending = self.pending.split_off(&seq.saturating_add(1));
        self.drain_contiguous();
    }

    #[must_use]
    pub fn has_completed(&self, seq: i64) -> bool {
        seq <= self.completed_till || self.pending.contains(&seq)
    }

    fn drain_contiguous(&mut self) {
        while let Some(&first) = self.pending.first() {
            if self.completed_till.checked_add(1) != Some(first) {
                break;
            }
            self.pending.pop_first();
            self.completed_till = first;
        }
    }
}

impl Default for SequenceTracker {
    fn default() -> Self {
        Self::new(0)
    }
}
