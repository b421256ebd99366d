use derive_more::Constructor;

use readthru_core_rs::alignment::{Placement, Segment, Template};

use super::outcome::{Call, Hit, Outcome, Reason, Tier};
use super::overlap::Overlaps;
use super::tail;
use crate::annotation::FeatureIndex;
use crate::config::{Config, Multimapping, ZeroTail};

/// Per-thread buffers reused between templates.
#[derive(Debug, Default)]
pub struct Scratch {
    overlaps: Overlaps,
}

/// Assigns templates to features. Classification is a pure function of the template, the
/// index and the config.
#[derive(Debug, Clone, Copy, Constructor)]
pub struct Classifier<'a> {
    index: &'a FeatureIndex,
    config: &'a Config,
}

fn passes_checks(segment: &Segment) -> bool {
    let flags = segment.flags();
    flags.is_aligned() && flags.is_properly_paired() && !flags.is_duplicate() && !flags.is_qc_fail()
}

impl Classifier<'_> {
    /// One call per placement, in placement order.
    pub fn classify(&self, template: &Template) -> Vec<Call> {
        self.classify_with(template, &mut Scratch::default())
    }

    pub fn classify_with(&self, template: &Template, scratch: &mut Scratch) -> Vec<Call> {
        let placements = template.placements();
        let total = placements.len();

        let weight = match (total > 1, self.config.multimapping()) {
            (false, _) | (true, Multimapping::CountAll) => 1.0,
            (true, Multimapping::CountFractional) => 1.0 / total as f64,
            (true, Multimapping::CountNone) => {
                let weight = 1.0 / total as f64;
                return placements
                    .iter()
                    .map(|_| Call::new(Reason::MultiMap.into(), weight))
                    .collect();
            }
        };

        placements
            .iter()
            .map(|placement| Call::new(self.classify_placement(placement, scratch), weight))
            .collect()
    }

    pub fn classify_placement(&self, placement: &Placement, scratch: &mut Scratch) -> Outcome {
        let mates = match placement {
            Placement::Orphan(_) => return Reason::Orphan.into(),
            Placement::Paired(first, second) => [first, second],
        };

        if !mates.iter().all(|x| passes_checks(x)) || mates[0].contig() != mates[1].contig() {
            return Reason::FailChecks.into();
        }
        let spans = match (mates[0].span(), mates[1].span()) {
            (Some(first), Some(second)) => [first, second],
            _ => return Reason::FailChecks.into(),
        };

        let candidate =
            match scratch
                .overlaps
                .candidate(self.index, mates, *self.config.ambiguity())
            {
                Ok(Some(candidate)) => candidate,
                Ok(None) => return Reason::NoName.into(),
                Err(reason) => return reason.into(),
            };
        let Some(geometry) = self
            .index
            .feature(candidate.feature)
            .and_then(|x| x.geometry().as_ref())
        else {
            return Reason::NoName.into();
        };

        let base_match_length = candidate.bases[0].max(candidate.bases[1]);
        if base_match_length < *self.config.anchor() {
            return Reason::InsuffMatch.into();
        }

        if spans.iter().any(|x| tail::extends_upstream(x, geometry)) {
            return Reason::UpstreamMatch.into();
        }

        let edge = geometry.three_prime_edge();
        let tail_length = mates
            .iter()
            .filter_map(|x| tail::tail_length(x, *geometry.strand(), edge))
            .max();

        let (tier, tail_length) = match (tail_length, self.config.zero_tail()) {
            (None, _) | (Some(0), ZeroTail::Base) => (Tier::Base, 0),
            (Some(0), ZeroTail::Reject) => return Reason::DownstreamMatch.into(),
            (Some(length), _) => (Tier::Readthrough, length),
        };
        Hit::new(candidate.feature, tier, base_match_length, tail_length).into()
    }
}
