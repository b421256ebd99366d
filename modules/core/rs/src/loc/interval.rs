use std::fmt::{Debug, Display};
use std::ops::Range;

use derive_getters::Dissolve;
use eyre::{eyre, Report, Result};
use impl_tools::autoimpl;

use crate::num::PrimInt;

/// Interval is a half-open genomic region [start, end).
/// Empty intervals (start == end) and intervals with negative length are not representable.
/// Intervals are plain values: every "modifying" operation returns a new interval.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Dissolve)]
pub struct Interval<Idx: PrimInt> {
    start: Idx,
    end: Idx,
}

/// Trait for types that can be generally viewed as half-open genomic intervals [start, end).
#[autoimpl(for <T: trait + ?Sized> &T, Box<T>)]
#[allow(clippy::len_without_is_empty)]
pub trait IntervalOp {
    type Idx: PrimInt;

    /// Start position of the interval-like object.
    fn start(&self) -> Self::Idx;

    /// End position of the interval-like object.
    fn end(&self) -> Self::Idx;

    /// Length of the interval-like object.
    fn len(&self) -> Self::Idx {
        self.end() - self.start()
    }

    /// Check if the interval-like object contains a given position.
    fn contains(&self, pos: Self::Idx) -> bool {
        self.start() <= pos && pos < self.end()
    }

    /// Check if the interval-like object intersects with another interval-like object.
    /// The condition is strict and doesn't allow touching intervals.
    fn intersects(&self, other: &Self) -> bool {
        self.start() < other.end() && other.start() < self.end()
    }

    /// Check if the interval-like object touches another interval-like object.
    fn touches(&self, other: &Self) -> bool {
        self.start() == other.end() || self.end() == other.start()
    }

    /// Turn the interval-like object into a basic half-open genomic interval.
    fn as_interval(&self) -> Interval<Self::Idx> {
        Interval {
            start: self.start(),
            end: self.end(),
        }
    }
}

impl<T: PrimInt> IntervalOp for Interval<T> {
    type Idx = T;

    #[inline(always)]
    fn start(&self) -> Self::Idx {
        self.start
    }
    #[inline(always)]
    fn end(&self) -> Self::Idx {
        self.end
    }
}

impl<Idx: PrimInt> Interval<Idx> {
    pub fn new(start: Idx, end: Idx) -> Result<Self> {
        if start < end {
            Ok(Self { start, end })
        } else {
            Err(eyre!("Invalid interval: start ({start:?}) >= end ({end:?})"))
        }
    }

    /// Single base interval [pos, pos + 1).
    pub fn nucleotide(pos: Idx) -> Self {
        Self {
            start: pos,
            end: pos + Idx::one(),
        }
    }

    /// Smallest interval containing both intervals, even if they are disjoint.
    pub fn envelope(&self, other: &Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }
}

impl<Idx: PrimInt + Display> Display for Interval<Idx> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

impl<Idx: PrimInt> TryFrom<(Idx, Idx)> for Interval<Idx> {
    type Error = Report;

    fn try_from(value: (Idx, Idx)) -> Result<Self, Self::Error> {
        Self::new(value.0, value.1)
    }
}

impl<Idx: PrimInt> TryFrom<Range<Idx>> for Interval<Idx> {
    type Error = Report;

    fn try_from(value: Range<Idx>) -> Result<Self, Self::Error> {
        Self::new(value.start, value.end)
    }
}

impl<Idx: PrimInt> From<Interval<Idx>> for Range<Idx> {
    fn from(interval: Interval<Idx>) -> Self {
        interval.start..interval.end
    }
}

impl<Idx: PrimInt> PartialEq<(Idx, Idx)> for Interval<Idx> {
    fn eq(&self, other: &(Idx, Idx)) -> bool {
        self.start == other.0 && self.end == other.1
    }
}

impl<Idx: PrimInt> PartialEq<Range<Idx>> for Interval<Idx> {
    fn eq(&self, other: &Range<Idx>) -> bool {
        self.start == other.start && self.end == other.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construct() {
        assert_eq!(Interval::new(0, 10).unwrap(), (0, 10));
        assert!(Interval::new(1, 0).is_err());
        assert!(Interval::new(0, 0).is_err());
        assert_eq!(Interval::nucleotide(199u64), 199..200);
    }

    #[test]
    fn test_contains_and_len() {
        let interval = Interval::new(1, 10).unwrap();
        assert_eq!(interval.len(), 9);
        assert!(!interval.contains(0));
        assert!(interval.contains(1));
        assert!(interval.contains(9));
        assert!(!interval.contains(10));
    }

    #[test]
    fn test_intersects_and_touches() {
        let interval = Interval::new(1, 10).unwrap();
        assert!(!interval.intersects(&Interval::new(0, 1).unwrap()));
        assert!(interval.intersects(&Interval::new(0, 2).unwrap()));
        assert!(interval.intersects(&Interval::new(9, 10).unwrap()));
        assert!(!interval.intersects(&Interval::new(10, 11).unwrap()));

        assert!(interval.touches(&Interval::new(0, 1).unwrap()));
        assert!(interval.touches(&Interval::new(10, 11).unwrap()));
        assert!(!interval.touches(&Interval::new(5, 9).unwrap()));
    }

    #[test]
    fn test_intersection() {
        let interval = Interval::new(1, 10).unwrap();
        assert_eq!(interval.intersection(&Interval::new(0, 1).unwrap()), None);
        assert_eq!(
            interval.intersection(&Interval::new(9, 11).unwrap()),
            Some(Interval::new(9, 10).unwrap())
        );
        assert_eq!(interval.intersection(&Interval::new(20, 30).unwrap()), None);
    }

    #[test]
    fn test_envelope() {
        let interval = Interval::new(1, 10).unwrap();
        assert_eq!(interval.envelope(&Interval::new(20, 30).unwrap()), (1, 30));
        assert_eq!(interval.envelope(&Interval::new(3, 5).unwrap()), (1, 10));
        // The source interval is untouched
        assert_eq!(interval, (1, 10));
    }
}
