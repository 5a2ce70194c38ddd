use crate::error::{KirinukiError, KirinukiResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Half-open byte range `[start, end)` over a string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct OffsetRange {
    pub start: usize,
    pub end: usize,
}

impl OffsetRange {
    /// Create a range whose bounds are already known to be ordered
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "OffsetRange start {start} > end {end}");
        Self { start, end }
    }

    /// Create a range, rejecting `start > end`
    pub fn try_new(start: usize, end: usize) -> KirinukiResult<Self> {
        if start > end {
            return Err(KirinukiError::invalid_range(start, end));
        }
        Ok(Self { start, end })
    }

    /// Zero-width range at `offset`
    pub fn empty(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// `start <= offset < end`
    pub fn contains_offset(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    pub fn contains_range(&self, other: &OffsetRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// True when the ranges share at least one character, or when an empty
    /// range sits strictly inside the other one.
    pub fn intersects(&self, other: &OffsetRange) -> bool {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start < end {
            return true;
        }
        if self.is_empty() {
            return other.start < self.start && self.start < other.end;
        }
        if other.is_empty() {
            return self.start < other.start && other.start < self.end;
        }
        false
    }

    /// Overlapping or adjacent (sharing a boundary)
    pub fn touches(&self, other: &OffsetRange) -> bool {
        self.start.max(other.start) <= self.end.min(other.end)
    }

    pub fn intersection(&self, other: &OffsetRange) -> Option<OffsetRange> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start <= end).then(|| OffsetRange::new(start, end))
    }

    /// Smallest range covering both
    pub fn join(&self, other: &OffsetRange) -> OffsetRange {
        OffsetRange::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Shift both bounds by `delta`, saturating at zero
    pub fn delta(&self, delta: i64) -> OffsetRange {
        let shift = |v: usize| (v as i64 + delta).max(0) as usize;
        OffsetRange::new(shift(self.start), shift(self.end))
    }

    /// Clamp both bounds into `[0, len]`
    pub fn clamp_to(&self, len: usize) -> OffsetRange {
        OffsetRange::new(self.start.min(len), self.end.min(len))
    }

    /// Slice `text` by this range
    pub fn substring<'t>(&self, text: &'t str) -> &'t str {
        &text[self.start..self.end]
    }
}

impl From<std::ops::Range<usize>> for OffsetRange {
    fn from(range: std::ops::Range<usize>) -> Self {
        OffsetRange::new(range.start, range.end.max(range.start))
    }
}

impl fmt::Display for OffsetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Largest char boundary of `text` that is `<= offset`, after clamping to `text.len()`
pub fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_try_new_rejects_inverted_bounds() {
        assert!(OffsetRange::try_new(5, 5).is_ok());
        assert!(matches!(
            OffsetRange::try_new(6, 5),
            Err(KirinukiError::InvalidRange { start: 6, end: 5 })
        ));
    }

    #[rstest]
    #[case::overlap((0, 5), (3, 8), true)]
    #[case::adjacent((0, 5), (5, 8), false)]
    #[case::disjoint((0, 2), (4, 8), false)]
    #[case::cursor_inside((0, 5), (2, 2), true)]
    #[case::cursor_at_edge((0, 5), (5, 5), false)]
    #[case::nested((0, 10), (2, 3), true)]
    fn test_intersects(
        #[case] a: (usize, usize),
        #[case] b: (usize, usize),
        #[case] expected: bool,
    ) {
        let a = OffsetRange::new(a.0, a.1);
        let b = OffsetRange::new(b.0, b.1);
        assert_eq!(a.intersects(&b), expected);
        assert_eq!(b.intersects(&a), expected);
    }

    #[rstest]
    #[case::overlap((0, 5), (3, 8), true)]
    #[case::adjacent((0, 5), (5, 8), true)]
    #[case::disjoint((0, 2), (4, 8), false)]
    #[case::cursor_at_edge((0, 5), (5, 5), true)]
    fn test_touches(#[case] a: (usize, usize), #[case] b: (usize, usize), #[case] expected: bool) {
        let a = OffsetRange::new(a.0, a.1);
        let b = OffsetRange::new(b.0, b.1);
        assert_eq!(a.touches(&b), expected);
    }

    #[test]
    fn test_intersection_and_join() {
        let a = OffsetRange::new(2, 6);
        let b = OffsetRange::new(4, 9);
        assert_eq!(a.intersection(&b), Some(OffsetRange::new(4, 6)));
        assert_eq!(a.join(&b), OffsetRange::new(2, 9));
        assert_eq!(
            OffsetRange::new(0, 1).intersection(&OffsetRange::new(3, 4)),
            None
        );
    }

    #[test]
    fn test_delta_saturates_at_zero() {
        assert_eq!(OffsetRange::new(3, 7).delta(-5), OffsetRange::new(0, 2));
        assert_eq!(OffsetRange::new(3, 7).delta(2), OffsetRange::new(5, 9));
    }

    #[test]
    fn test_floor_char_boundary_inside_multibyte() {
        let text = "a…b";
        // '…' occupies bytes 1..4
        assert_eq!(floor_char_boundary(text, 2), 1);
        assert_eq!(floor_char_boundary(text, 4), 4);
        assert_eq!(floor_char_boundary(text, 100), text.len());
    }
}
