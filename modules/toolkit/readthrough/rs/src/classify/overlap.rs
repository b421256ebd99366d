use readthru_collections_rs::overlap::Steps;
use readthru_core_rs::alignment::Segment;
use readthru_core_rs::loc::{Interval, IntervalOp};

use super::outcome::Reason;
use crate::annotation::FeatureIndex;
use crate::config::Ambiguity;

/// The single feature overlapped by a pair of mates and the matched bases each mate shares
/// with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub feature: usize,
    pub bases: [u64; 2],
}

/// Reusable buffers for the feature overlap extraction.
#[derive(Debug, Default)]
pub struct Overlaps {
    steps: Steps<u64, usize>,
    features: Vec<usize>,
}

impl Overlaps {
    /// Walk the match operations of both mates. `Ok(None)` means nothing was overlapped.
    pub fn candidate(
        &mut self,
        index: &FeatureIndex,
        mates: [&Segment; 2],
        ambiguity: Ambiguity,
    ) -> Result<Option<Candidate>, Reason> {
        let mut candidate = None;
        let mut bases = [0u64; 2];
        let mut touched = [false; 2];

        for (ind, mate) in mates.iter().enumerate() {
            for (op, start, end) in mate.blocks() {
                if !op.kind.is_match() {
                    continue;
                }
                let Ok(query) = Interval::new(start, end) else {
                    continue;
                };

                self.features.clear();
                let mut covered = 0;
                for (step, features) in index.steps(mate.contig(), query, &mut self.steps).iter() {
                    if features.is_empty() {
                        continue;
                    }
                    covered += step.len();
                    for feature in features {
                        if !self.features.contains(feature) {
                            self.features.push(*feature);
                        }
                    }
                }

                let feature = match self.features.as_slice() {
                    [] => continue,
                    [feature] => *feature,
                    _ => return Err(Reason::MultiName),
                };
                match candidate {
                    Some(existing) if existing != feature => return Err(Reason::MultiName),
                    _ => candidate = Some(feature),
                }
                bases[ind] += covered;
                touched[ind] = true;
            }
        }

        let Some(feature) = candidate else {
            return Ok(None);
        };
        if ambiguity == Ambiguity::Consensus && !(touched[0] && touched[1]) {
            return Err(Reason::MultiName);
        }
        Ok(Some(Candidate { feature, bases }))
    }
}
