//! Ordered, gap-free window of materialized entries.
//!
//! # Invariants
//! - For adjacent entries, `value[i + 1] == value[i] + 1`
//! - Entries enter only at an edge and leave only in contiguous runs
//!
//! Backed by a `VecDeque` so edge insertion and range removal are O(amount)
//! without aliasing sub-ranges.

use crate::model::Entry;
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Edge of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Lowest value, index 0.
    Head,
    /// Highest value, index `len - 1`.
    Tail,
}

/// Snapshot of the window's extent, used for threshold decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferEdges {
    /// Number of entries.
    pub len: usize,
    /// Lowest contained value.
    pub first: u64,
    /// Highest contained value.
    pub last: u64,
}

/// The materialized window of the number sequence.
#[derive(Debug, Clone, Default)]
pub struct WindowBuffer {
    entries: VecDeque<Entry>,
}

impl WindowBuffer {
    /// Create an empty window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the window holds nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry with the lowest value.
    pub fn first(&self) -> Option<&Entry> {
        self.entries.front()
    }

    /// Entry with the highest value.
    pub fn last(&self) -> Option<&Entry> {
        self.entries.back()
    }

    /// Entry at `index`.
    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Iterate entries in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Index of `value`, if it is inside the window. O(1).
    pub fn index_of(&self, value: u64) -> Option<usize> {
        let first = self.first()?.value();
        let offset = usize::try_from(value.checked_sub(first)?).ok()?;
        (offset < self.len()).then_some(offset)
    }

    /// Extent snapshot, or `None` when empty.
    pub fn edges(&self) -> Option<BufferEdges> {
        Some(BufferEdges {
            len: self.len(),
            first: self.first()?.value(),
            last: self.last()?.value(),
        })
    }

    /// Insert up to `max_count` entries at `edge`.
    ///
    /// `slots` must be in ascending value order. Insertion stops at the first
    /// `None` slot (the domain-boundary sentinel). The run taken is rejected
    /// whole if it is not contiguous with the existing edge, so a stale batch
    /// can never punch a gap into the window.
    ///
    /// Returns how many entries were inserted.
    pub fn insert_batch<I>(&mut self, slots: I, edge: Edge, max_count: usize) -> usize
    where
        I: IntoIterator<Item = Option<Entry>>,
    {
        let run: Vec<Entry> = slots.into_iter().map_while(|slot| slot).take(max_count).collect();

        if run.is_empty() {
            return 0;
        }
        if !Self::is_contiguous(&run) {
            warn!(edge = ?edge, "Rejecting non-contiguous batch");
            return 0;
        }
        if !self.fits_at(&run, edge) {
            warn!(
                edge = ?edge,
                batch_first = run[0].value(),
                batch_last = run[run.len() - 1].value(),
                window = ?self.edges(),
                "Rejecting batch that does not adjoin the window edge"
            );
            return 0;
        }

        let inserted = run.len();
        match edge {
            Edge::Tail => self.entries.extend(run),
            Edge::Head => {
                for entry in run.into_iter().rev() {
                    self.entries.push_front(entry);
                }
            }
        }
        debug!(edge = ?edge, inserted, len = self.len(), "Inserted batch");
        inserted
    }

    /// Remove `amount` entries starting at `start_index`.
    ///
    /// Silently does nothing (returns `false`) when the range is not fully
    /// inside the window; that indicates a threshold bug upstream and is
    /// logged, not raised.
    pub fn evict(&mut self, start_index: usize, amount: usize) -> bool {
        let in_bounds = start_index
            .checked_add(amount)
            .is_some_and(|end| end <= self.len());
        if !in_bounds {
            warn!(start_index, amount, len = self.len(), "Ignoring out-of-range eviction");
            return false;
        }

        self.entries.drain(start_index..start_index + amount);
        debug!(start_index, amount, len = self.len(), "Evicted entries");
        true
    }

    /// Whether every adjacent pair in `run` differs by exactly one.
    fn is_contiguous(run: &[Entry]) -> bool {
        run.windows(2)
            .all(|pair| pair[0].value().checked_add(1) == Some(pair[1].value()))
    }

    /// Whether `run` adjoins the window at `edge`. Anything fits an empty window.
    fn fits_at(&self, run: &[Entry], edge: Edge) -> bool {
        let (Some(first), Some(last)) = (self.first(), self.last()) else {
            return true;
        };
        match edge {
            Edge::Tail => last.value().checked_add(1) == Some(run[0].value()),
            Edge::Head => run[run.len() - 1].value().checked_add(1) == Some(first.value()),
        }
    }
}
