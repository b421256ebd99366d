use ahash::AHashMap;
use derive_getters::{Dissolve, Getters};

use crate::annotation::FeatureIndex;
use crate::classify::{Outcome, Reason, Tier};
use crate::result::{Row, Summary};

#[derive(Clone, PartialEq, Debug, Default, Getters, Dissolve)]
pub struct Tally {
    base: f64,
    readthrough: f64,
    /// Tail lengths of readthrough hits in arrival order
    tails: Vec<u64>,
}

/// Weighted run-wide totals.
#[derive(Clone, PartialEq, Debug, Default, Getters, Dissolve)]
pub struct Diagnostics {
    rejected: [f64; Reason::ALL.len()],
    templates: f64,
    base_hits: f64,
    readthrough_hits: f64,
}

impl Diagnostics {
    pub fn rejections(&self, reason: Reason) -> f64 {
        self.rejected[reason.index()]
    }

    /// Named totals: one per rejection reason followed by the run totals.
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        let mut entries: Vec<_> = Reason::ALL
            .iter()
            .map(|x| (x.name(), self.rejections(*x)))
            .collect();
        entries.push(("TOTAL_TEMPLATES", self.templates));
        entries.push(("TOTAL_BASE_HITS", self.base_hits));
        entries.push(("TOTAL_READTHROUGH_HITS", self.readthrough_hits));
        entries
    }

    fn merge(&mut self, other: &Diagnostics) {
        for (mine, theirs) in self.rejected.iter_mut().zip(other.rejected.iter()) {
            *mine += theirs;
        }
        self.templates += other.templates;
        self.base_hits += other.base_hits;
        self.readthrough_hits += other.readthrough_hits;
    }
}

/// Accumulates classification outcomes. Counters are owned by a single worker and merged.
#[derive(Clone, PartialEq, Debug, Default, Dissolve)]
pub struct Counter {
    tallies: AHashMap<usize, Tally>,
    diagnostics: Diagnostics,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fold(&mut self, outcome: &Outcome, weight: f64) {
        self.diagnostics.templates += weight;
        match outcome {
            Outcome::Rejected(reason) => {
                self.diagnostics.rejected[reason.index()] += weight;
            }
            Outcome::Accepted(hit) => {
                let tally = self.tallies.entry(*hit.feature()).or_default();
                tally.base += weight;
                self.diagnostics.base_hits += weight;

                if *hit.tier() == Tier::Readthrough {
                    tally.readthrough += weight;
                    tally.tails.push(*hit.tail_length());
                    self.diagnostics.readthrough_hits += weight;
                }
            }
        }
    }

    /// Component-wise sum. Tail lists of `other` are appended after the ones of `self`.
    pub fn merge(&mut self, other: Counter) {
        self.diagnostics.merge(&other.diagnostics);
        for (feature, theirs) in other.tallies {
            let mine = self.tallies.entry(feature).or_default();
            mine.base += theirs.base;
            mine.readthrough += theirs.readthrough;
            mine.tails.extend(theirs.tails);
        }
    }

    pub fn tally(&self, feature: usize) -> Option<&Tally> {
        self.tallies.get(&feature)
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn finalize(mut self, index: &FeatureIndex) -> Summary {
        let mut rows = Vec::with_capacity(self.tallies.len());
        let mut tails = Vec::with_capacity(self.tallies.len());
        for (ind, feature) in index.features().iter().enumerate() {
            let Some(tally) = self.tallies.remove(&ind) else {
                continue;
            };
            rows.push(Row::new(feature.name().clone(), tally.base, tally.readthrough));
            tails.push((feature.name().clone(), tally.tails));
        }
        Summary::new(rows, tails, self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Hit;

    fn base(feature: usize) -> Outcome {
        Hit::new(feature, Tier::Base, 20, 0).into()
    }

    fn readthrough(feature: usize, tail: u64) -> Outcome {
        Hit::new(feature, Tier::Readthrough, 20, tail).into()
    }

    #[test]
    fn test_fold() {
        let mut counter = Counter::new();
        counter.fold(&base(0), 1.0);
        counter.fold(&readthrough(0, 15), 0.5);
        counter.fold(&readthrough(1, 7), 1.0);
        counter.fold(&Reason::NoName.into(), 1.0);
        counter.fold(&Reason::MultiMap.into(), 0.25);

        let tally = counter.tally(0).unwrap();
        assert_eq!(*tally.base(), 1.5);
        assert_eq!(*tally.readthrough(), 0.5);
        assert_eq!(tally.tails(), &vec![15]);

        let diagnostics = counter.diagnostics();
        assert_eq!(diagnostics.rejections(Reason::NoName), 1.0);
        assert_eq!(diagnostics.rejections(Reason::MultiMap), 0.25);
        assert_eq!(*diagnostics.templates(), 3.75);
        assert_eq!(*diagnostics.base_hits(), 2.5);
        assert_eq!(*diagnostics.readthrough_hits(), 1.5);
    }

    #[test]
    fn test_merge_keeps_tail_order() {
        let mut left = Counter::new();
        left.fold(&readthrough(0, 1), 1.0);
        left.fold(&readthrough(0, 2), 1.0);

        let mut right = Counter::new();
        right.fold(&readthrough(0, 3), 1.0);
        right.fold(&base(2), 1.0);
        right.fold(&Reason::Orphan.into(), 1.0);

        left.merge(right);
        assert_eq!(left.tally(0).unwrap().tails(), &vec![1, 2, 3]);
        assert_eq!(*left.tally(2).unwrap().base(), 1.0);
        assert_eq!(*left.diagnostics().templates(), 5.0);
        assert_eq!(left.diagnostics().rejections(Reason::Orphan), 1.0);
    }

    #[test]
    fn test_diagnostics_entries() {
        let mut counter = Counter::new();
        counter.fold(&Reason::DownstreamMatch.into(), 1.0);
        let entries = counter.diagnostics().entries();
        assert_eq!(entries.len(), 11);
        assert_eq!(entries[7], ("DOWNSTREAM_MATCH", 1.0));
        assert_eq!(entries[8], ("TOTAL_TEMPLATES", 1.0));
    }
}
