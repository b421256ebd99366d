use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;

use readthru_core_rs::alignment::{Placement, Segment};

/// A decoded record together with the coordinates it reports for its mate.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Dissolve, Constructor)]
pub struct Mate {
    segment: Segment,
    reference_id: Option<usize>,
    start: Option<u64>,
    mate_reference_id: Option<usize>,
    mate_start: Option<u64>,
}

impl Mate {
    /// Both records point at each other: positions and strand/mapping flags agree reciprocally.
    fn is_mate_of(&self, other: &Mate) -> bool {
        let (lflags, rflags) = (self.segment.flags(), other.segment.flags());
        self.mate_reference_id == other.reference_id
            && self.mate_start == other.start
            && lflags.is_mate_reverse() == rflags.is_reverse()
            && lflags.is_mate_aligned() == rflags.is_aligned()
            && other.mate_reference_id == self.reference_id
            && other.mate_start == self.start
            && rflags.is_mate_reverse() == lflags.is_reverse()
            && rflags.is_mate_aligned() == lflags.is_aligned()
    }
}

/// Pair all records of one query name into placements. Records without a reciprocal mate,
/// including single-end records, become orphans. Paired placements keep the order of their
/// first mates, orphans follow in input order.
pub fn pair_mates(records: Vec<Mate>) -> Vec<Placement> {
    let (mut lmates, mut rmates): (Vec<Mate>, Vec<Mate>) = records.into_iter().partition(|x| {
        let flags = x.segment.flags();
        !flags.is_paired() || flags.is_first_segment() || !flags.is_last_segment()
    });

    let mut placements = Vec::with_capacity(lmates.len());
    let mut orphans = Vec::new();

    let mut lind = 0;
    while lind < lmates.len() {
        let left = &lmates[lind];
        let rind = match left.segment.flags().is_paired() {
            true => rmates.iter().position(|right| left.is_mate_of(right)),
            false => None,
        };

        match rind {
            Some(rind) => {
                let left = lmates.remove(lind);
                let right = rmates.remove(rind);
                placements.push(Placement::Paired(left.segment, right.segment));
            }
            None => lind += 1,
        }
    }

    orphans.extend(lmates.into_iter().chain(rmates).map(|x| x.segment));
    placements.extend(orphans.into_iter().map(Placement::Orphan));
    placements
}
