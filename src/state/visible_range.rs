//! Range of window indices currently visible.

/// Indices of the first and last fully visible cells.
///
/// Indices are into the `WindowBuffer`, not values.
///
/// # Invariants
/// - `first <= last`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibleRange {
    first: usize,
    last: usize,
}

impl VisibleRange {
    /// Create a visible range.
    ///
    /// # Panics
    /// In debug builds, panics if `first > last`.
    pub fn new(first: usize, last: usize) -> Self {
        debug_assert!(first <= last, "VisibleRange first ({}) > last ({})", first, last);
        Self { first, last }
    }

    /// Index of the first visible cell.
    pub fn first(&self) -> usize {
        self.first
    }

    /// Index of the last visible cell (inclusive).
    pub fn last(&self) -> usize {
        self.last
    }

    /// Number of visible cells.
    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }

    /// Always false: a range covers at least one cell.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Same cells after `count` entries were inserted at the head.
    pub fn shifted_forward(&self, count: usize) -> Self {
        Self::new(
            self.first.saturating_add(count),
            self.last.saturating_add(count),
        )
    }

    /// Same cells after `count` entries were removed from the head.
    pub fn shifted_back(&self, count: usize) -> Self {
        Self::new(self.first.saturating_sub(count), self.last.saturating_sub(count))
    }

    /// Clamp into a window of `len` entries. `None` for an empty window.
    pub fn clamped_to(&self, len: usize) -> Option<Self> {
        let max = len.checked_sub(1)?;
        Some(Self::new(self.first.min(max), self.last.min(max)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_is_inclusive() {
        assert_eq!(VisibleRange::new(5, 9).len(), 5);
        assert_eq!(VisibleRange::new(3, 3).len(), 1);
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn new_panics_when_first_after_last() {
        VisibleRange::new(10, 5);
    }

    #[test]
    fn shifted_forward_moves_both_ends() {
        assert_eq!(VisibleRange::new(2, 5).shifted_forward(10), VisibleRange::new(12, 15));
    }

    #[test]
    fn shifted_back_saturates_at_zero() {
        assert_eq!(VisibleRange::new(2, 5).shifted_back(3), VisibleRange::new(0, 2));
        assert_eq!(VisibleRange::new(2, 5).shifted_back(100), VisibleRange::new(0, 0));
    }

    #[test]
    fn clamped_to_limits_indices() {
        assert_eq!(VisibleRange::new(5, 20).clamped_to(10), Some(VisibleRange::new(5, 9)));
        assert_eq!(VisibleRange::new(15, 20).clamped_to(10), Some(VisibleRange::new(9, 9)));
        assert_eq!(VisibleRange::new(0, 3).clamped_to(0), None);
    }
}
