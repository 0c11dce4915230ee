//! Bounded cache of the best explorable labels.
//!
//! The open list is not a real global priority queue: it is a bounded
//! vector of `(label, score)` references sorted by descending score.
//! Keeping it bounded caps the memory the open list can take; labels
//! evicted from the cache stay alive in the arena (they still take part
//! in domination checks) and are recovered by a full slab scan when the
//! cache drains. The score is duplicated in the entry so that sorting
//! never touches the arena.

use crate::solver::arena::ClockArena;
use crate::solver::label::{Label, LabelId};

#[derive(Debug, Clone, Copy)]
struct LabelRef {
    label: LabelId,
    score: f32,
}

pub(crate) struct BestLabels {
    entries: Vec<LabelRef>,
    cap: usize,
    /// Scores must exceed this to enter; raised when the cache evicts.
    min_admitted: f32,
}

impl BestLabels {
    pub fn new(cap: usize) -> Self {
        debug_assert!(cap > 0);
        Self {
            entries: Vec::with_capacity(cap),
            cap,
            min_admitted: Label::MIN_SCORE,
        }
    }

    /// Insert when the score clears the admission threshold, evicting the
    /// worst entry if the cache is full.
    pub fn try_insert(&mut self, label: LabelId, score: f32) {
        if score <= self.min_admitted {
            return;
        }
        if self.entries.len() == self.cap {
            if let Some(evicted) = self.entries.pop() {
                self.min_admitted = evicted.score;
            }
            if score <= self.min_admitted {
                return;
            }
        }
        let position = self.entries.partition_point(|entry| entry.score >= score);
        self.entries.insert(position, LabelRef { label, score });
    }

    /// Drop a label from the cache if present (it may have been evicted).
    pub fn remove(&mut self, label: LabelId) {
        if let Some(position) = self.entries.iter().position(|entry| entry.label == label) {
            self.entries.remove(position);
        }
    }

    /// Best explorable label, refilling the cache from the arena when it
    /// has drained. Returns `None` only when no explorable label is left
    /// anywhere.
    pub fn pop_front(&mut self, labels: &ClockArena<Label>) -> Option<LabelId> {
        if self.entries.is_empty() {
            tracing::debug!("best-labels cache drained, rescanning the label slab");
            self.min_admitted = Label::MIN_SCORE;
            for (index, label) in labels.iter_live() {
                // explored slots sit below MIN_SCORE and are skipped by
                // the admission threshold
                self.try_insert(index as LabelId, label.score);
            }
            if self.entries.is_empty() {
                return None;
            }
        }
        Some(self.entries.remove(0).label)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
