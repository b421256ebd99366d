use std::collections::BTreeSet;

use derive_getters::Dissolve;

use readthru_core_rs::loc::{Interval, IntervalOp};
use readthru_core_rs::num::PrimInt;

/// Stepped view of a query interval. The query is split into maximal sub-intervals, each tagged
/// with the sorted set of values whose intervals cover it. Adjacent steps never share the same
/// set. Buffers are reused between queries.
#[derive(Clone, PartialEq, Eq, Debug, Dissolve)]
pub struct Steps<Idx: PrimInt, T: Copy + Ord> {
    cache: BTreeSet<Idx>,
    hits: Vec<(Interval<Idx>, T)>,
    // N + 1 boundaries for N steps
    boundaries: Vec<Idx>,
    annotation: Vec<Vec<T>>,
    steps: usize,
}

impl<Idx: PrimInt, T: Copy + Ord> Default for Steps<Idx, T> {
    fn default() -> Self {
        Self {
            cache: BTreeSet::new(),
            hits: Vec::new(),
            boundaries: Vec::new(),
            annotation: Vec::new(),
            steps: 0,
        }
    }
}

impl<Idx: PrimInt, T: Copy + Ord> Steps<Idx, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decompose the query with respect to the given hits. Hits don't have to overlap the query,
    /// non-overlapping ones are ignored.
    pub fn build(
        &mut self,
        query: Interval<Idx>,
        hits: impl IntoIterator<Item = (Interval<Idx>, T)>,
    ) -> &mut Self {
        self.clear();

        self.cache.insert(query.start());
        self.cache.insert(query.end());
        for (it, value) in hits {
            let Some(clipped) = it.intersection(&query) else {
                continue;
            };
            self.cache.insert(clipped.start());
            self.cache.insert(clipped.end());
            self.hits.push((clipped, value));
        }
        self.boundaries.extend(self.cache.iter().copied());

        let total = self.boundaries.len() - 1;
        if self.annotation.len() < total {
            self.annotation.resize_with(total, Vec::new);
        }

        for (it, value) in self.hits.iter() {
            let st = self.boundaries.partition_point(|x| *x < it.start());
            let en = self.boundaries.partition_point(|x| *x < it.end());
            for step in self.annotation[st..en].iter_mut() {
                step.push(*value);
            }
        }
        for step in self.annotation[..total].iter_mut() {
            step.sort_unstable();
            step.dedup();
        }

        // Merge adjacent steps with identical sets
        let mut last = 0;
        for ind in 1..total {
            if self.annotation[ind] == self.annotation[last] {
                continue;
            }
            last += 1;
            self.annotation.swap(last, ind);
            self.boundaries[last] = self.boundaries[ind];
        }
        self.boundaries[last + 1] = self.boundaries[total];
        self.boundaries.truncate(last + 2);
        self.steps = last + 1;

        self
    }

    /// Steps of the last query, left to right. Empty before the first `build`.
    pub fn iter(&self) -> impl Iterator<Item = (Interval<Idx>, &[T])> {
        self.boundaries
            .windows(2)
            .zip(self.annotation.iter())
            .take(self.steps)
            .filter_map(|(window, anno)| {
                Interval::new(window[0], window[1])
                    .ok()
                    .map(|it| (it, anno.as_slice()))
            })
    }

    pub fn len(&self) -> usize {
        self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps == 0
    }

    pub fn clear(&mut self) {
        self.cache.clear();
        self.hits.clear();
        self.boundaries.clear();
        for anno in self.annotation.iter_mut() {
            anno.clear();
        }
        self.steps = 0;
    }
}
