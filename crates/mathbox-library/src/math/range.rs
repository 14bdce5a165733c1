use std::fmt::{self, Debug, Formatter};
use std::ops::Range;

use az::SaturatingAs;

/// A range of characters in the source string a formula was built from.
///
/// Ranges are purely informational and flow from atoms into frames so that
/// callers can map rendered output back to their input. A range with equal
/// start and end is detached and does not point anywhere.
#[derive(Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SourceRange {
    start: u32,
    end: u32,
}

impl SourceRange {
    /// Create a range from a start offset and a length.
    pub fn new(start: usize, len: usize) -> Self {
        Self::from_bounds(start, start.saturating_add(len))
    }

    /// Create a range from its bounds. An end before the start is clamped.
    pub fn from_bounds(start: usize, end: usize) -> Self {
        let start: u32 = start.saturating_as();
        let end: u32 = end.saturating_as();
        Self { start, end: end.max(start) }
    }

    /// The detached range.
    pub const fn detached() -> Self {
        Self { start: 0, end: 0 }
    }

    /// Whether the range covers no characters.
    pub fn is_detached(self) -> bool {
        self.start == self.end
    }

    /// The first character in the range.
    pub fn start(self) -> usize {
        self.start as usize
    }

    /// One past the last character in the range.
    pub fn end(self) -> usize {
        self.end as usize
    }

    /// The number of characters covered.
    pub fn len(self) -> usize {
        (self.end - self.start) as usize
    }

    /// Whether the range is empty.
    pub fn is_empty(self) -> bool {
        self.is_detached()
    }

    /// The smallest range covering both. Detached ranges are ignored.
    pub fn union(self, other: Self) -> Self {
        if self.is_detached() {
            return other;
        }
        if other.is_detached() {
            return self;
        }
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Convert to a standard range.
    pub fn to_range(self) -> Range<usize> {
        self.start()..self.end()
    }
}

impl Debug for SourceRange {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl From<Range<usize>> for SourceRange {
    fn from(range: Range<usize>) -> Self {
        Self::from_bounds(range.start, range.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_union_skips_detached() {
        let a = SourceRange::new(2, 3);
        let b = SourceRange::from(7..9);
        assert_eq!(a.union(b).to_range(), 2..9);
        assert_eq!(a.union(SourceRange::detached()), a);
        assert_eq!(SourceRange::detached().union(b), b);
    }

    #[test]
    fn test_range_clamps_inconsistent_bounds() {
        let range = SourceRange::from_bounds(5, 3);
        assert!(range.is_detached());
        assert_eq!(range.start(), 5);
        assert_eq!(SourceRange::new(usize::MAX, 4).start(), u32::MAX as usize);
    }
}
