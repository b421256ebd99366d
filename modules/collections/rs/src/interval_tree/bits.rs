//! Interval tree based on the BITS algorithm.
//! Reference: https://doi.org/10.1093/bioinformatics/bts652

use derive_getters::Dissolve;
use derive_more::From;
use itertools::Itertools;

use readthru_core_rs::{
    loc::{Interval, IntervalOp},
    num::PrimInt,
};

use super::tree::{Builder, ITree};

#[derive(Debug, Clone, From, Dissolve)]
pub struct BitsBuilder<Idx: PrimInt, Data> {
    records: Vec<(Interval<Idx>, Data)>,
}

impl<Idx: PrimInt, Data> Default for BitsBuilder<Idx, Data> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<Idx: PrimInt, Data> Builder for BitsBuilder<Idx, Data> {
    type Target = Bits<Idx, Data>;

    fn add(mut self, interval: Interval<Idx>, data: Data) -> Self {
        self.records.push((interval, data));
        self
    }

    fn extend(mut self, records: impl IntoIterator<Item = (Interval<Idx>, Data)>) -> Self {
        self.records.extend(records);
        self
    }

    fn build(self) -> Self::Target {
        Bits::new(self.records)
    }
}

/// Immutable interval tree: intervals are kept as parallel arrays sorted by start.
#[derive(Debug, Clone, PartialEq, Eq, Dissolve)]
pub struct Bits<Idx: PrimInt, Data> {
    data: Vec<Data>,
    intervals: Vec<Interval<Idx>>,
    // Longest stored interval, bounds how far back a query has to look
    max_len: Idx,
}

impl<Idx: PrimInt, Data> Default for Bits<Idx, Data> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            intervals: Vec::new(),
            max_len: Idx::zero(),
        }
    }
}

impl<Idx: PrimInt, Data> Bits<Idx, Data> {
    pub fn new(iter: impl IntoIterator<Item = (Interval<Idx>, Data)>) -> Self {
        let iter = iter.into_iter();

        let explen = iter.size_hint().0;
        let mut intervals = Vec::with_capacity(explen);
        let mut data = Vec::with_capacity(explen);
        let mut max_len = Idx::zero();

        for (interval, idata) in iter.sorted_by_key(|(it, _)| it.start()) {
            max_len = max_len.max(interval.len());
            intervals.push(interval);
            data.push(idata);
        }

        Self {
            data,
            intervals,
            max_len,
        }
    }

    pub fn builder() -> BitsBuilder<Idx, Data> {
        BitsBuilder::default()
    }

    #[inline]
    fn lower_bound(&self, start: Idx) -> usize {
        // Nothing that starts before `start - max_len` can reach the query
        let boundary = start.saturating_sub(self.max_len);
        self.intervals.partition_point(|it| it.start() < boundary)
    }

    /// Iterator over entries overlapping the given interval, in the order of their start.
    pub fn query(&self, query: Interval<Idx>) -> Iter<'_, Idx, Data> {
        Iter {
            query,
            cursor: self.lower_bound(query.start()),
            bits: self,
        }
    }
}

pub struct Iter<'tree, Idx: PrimInt, Data> {
    query: Interval<Idx>,
    // Might lag behind the next overlapping interval, but never runs ahead of it
    cursor: usize,
    bits: &'tree Bits<Idx, Data>,
}

impl<'tree, Idx: PrimInt, Data> Iterator for Iter<'tree, Idx, Data> {
    type Item = (Interval<Idx>, &'tree Data);

    fn next(&mut self) -> Option<Self::Item> {
        let intervals = &self.bits.intervals;
        while self.cursor < intervals.len() {
            let current = intervals[self.cursor];
            if current.start() >= self.query.end() {
                break;
            }
            self.cursor += 1;
            if current.end() > self.query.start() {
                return Some((current, &self.bits.data[self.cursor - 1]));
            }
        }
        self.cursor = intervals.len();
        None
    }
}

impl<Idx: PrimInt, Data> ITree for Bits<Idx, Data> {
    type Idx = Idx;
    type Data = Data;

    fn len(&self) -> usize {
        self.intervals.len()
    }

    fn records(&self) -> impl Iterator<Item = (Interval<Idx>, &Data)> {
        self.intervals.iter().copied().zip(self.data.iter())
    }

    fn overlapping(&self, query: Interval<Idx>) -> impl Iterator<Item = (Interval<Idx>, &Data)> {
        self.query(query)
    }
}
