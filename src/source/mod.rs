//! Entry sources.
//!
//! The only source of entries is the background [`Generator`]. This module
//! holds the request/result types it exchanges with the interactive context:
//! - [`GenerationRequest`]: what to compute (clamped at construction)
//! - [`Batch`]: what was computed, always in ascending value order

use crate::model::Entry;

pub mod generator;

pub use generator::Generator;

/// Lowest value that can ever be generated.
pub const MIN_VALUE: u64 = 0;

/// Smallest number of entries a request may ask for.
pub const MIN_COUNT: u32 = 1;

/// Direction in which a generation job walks the number line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `start, start + 1, ...` - appended at the tail of the window.
    Ascending,
    /// `start, start - 1, ...` - prepended at the head of the window.
    Descending,
}

/// Parameters of one generation job.
///
/// # Invariants
/// - `count >= MIN_COUNT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationRequest {
    start: u64,
    count: u32,
    direction: Direction,
}

impl GenerationRequest {
    /// Create a request for `count` entries starting at `start`.
    ///
    /// A zero count is raised to [`MIN_COUNT`].
    pub fn new(start: u64, count: u32, direction: Direction) -> Self {
        Self {
            start,
            count: count.max(MIN_COUNT),
            direction,
        }
    }

    /// Create a request from signed, possibly malformed input.
    ///
    /// Negative starts clamp to [`MIN_VALUE`]; non-positive counts clamp to
    /// [`MIN_COUNT`]; counts beyond `u32::MAX` saturate. Malformed input is
    /// never rejected.
    pub fn clamped(start: i64, count: i64, direction: Direction) -> Self {
        let start = u64::try_from(start).unwrap_or(MIN_VALUE);
        let count = u32::try_from(count.max(i64::from(MIN_COUNT))).unwrap_or(u32::MAX);
        Self::new(start, count, direction)
    }

    /// First value the job will produce.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Maximum number of entries the job will produce.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Walk direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }
}

/// Result of one generation job.
///
/// `entries` is always strictly ascending with step 1, whatever the
/// requested direction. `boundary_reached` is the sentinel: the job stopped
/// before producing `count` entries because the next value would have left
/// the `u64` domain (below 0 when descending, past `u64::MAX` when
/// ascending). It means "no more entries this way", not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    request: GenerationRequest,
    entries: Vec<Entry>,
    boundary_reached: bool,
}

impl Batch {
    /// Assemble a batch. `entries` must already be ascending.
    pub(crate) fn new(request: GenerationRequest, entries: Vec<Entry>, boundary_reached: bool) -> Self {
        debug_assert!(
            entries.windows(2).all(|w| w[1].value() == w[0].value() + 1),
            "batch entries must be ascending and contiguous"
        );
        Self {
            request,
            entries,
            boundary_reached,
        }
    }

    /// The request that produced this batch.
    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }

    /// Produced entries in ascending order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of produced entries (the sentinel is not counted).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entry was produced.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether generation stopped early at the domain boundary.
    pub fn boundary_reached(&self) -> bool {
        self.boundary_reached
    }

    /// Consume the batch as insertion slots: every entry as `Some`, then a
    /// single trailing `None` if the boundary sentinel is set.
    pub fn into_slots(self) -> impl Iterator<Item = Option<Entry>> {
        let sentinel = self.boundary_reached.then_some(None);
        self.entries.into_iter().map(Some).chain(sentinel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped_raises_negative_start_to_zero() {
        let req = GenerationRequest::clamped(-42, 5, Direction::Ascending);
        assert_eq!(req.start(), 0);
        assert_eq!(req.count(), 5);
    }

    #[test]
    fn clamped_raises_non_positive_count_to_one() {
        assert_eq!(GenerationRequest::clamped(10, 0, Direction::Ascending).count(), 1);
        assert_eq!(GenerationRequest::clamped(10, -3, Direction::Descending).count(), 1);
    }

    #[test]
    fn clamped_saturates_huge_count() {
        let req = GenerationRequest::clamped(0, i64::MAX, Direction::Ascending);
        assert_eq!(req.count(), u32::MAX);
    }

    #[test]
    fn new_raises_zero_count() {
        assert_eq!(GenerationRequest::new(3, 0, Direction::Ascending).count(), MIN_COUNT);
    }

    #[test]
    fn into_slots_appends_sentinel_only_when_boundary_reached() {
        let req = GenerationRequest::new(1, 5, Direction::Descending);
        let entries = vec![Entry::compute(0), Entry::compute(1)];

        let with_sentinel: Vec<_> = Batch::new(req, entries.clone(), true).into_slots().collect();
        assert_eq!(with_sentinel.len(), 3);
        assert!(with_sentinel[2].is_none());

        let without: Vec<_> = Batch::new(req, entries, false).into_slots().collect();
        assert_eq!(without.len(), 2);
        assert!(without.iter().all(Option::is_some));
    }
}
