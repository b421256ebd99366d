use derive_getters::{Dissolve, Getters};
use derive_more::{Constructor, From, Into};

use crate::loc::{Interval, Orientation};

use super::cigar::{Cigar, Op};

/// SAM flag bit field of an alignment record.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Default, From, Into)]
pub struct Flags(u16);

impl Flags {
    pub const PAIRED: u16 = 0x1;
    pub const PROPER_PAIR: u16 = 0x2;
    pub const UNMAPPED: u16 = 0x4;
    pub const MATE_UNMAPPED: u16 = 0x8;
    pub const REVERSE: u16 = 0x10;
    pub const MATE_REVERSE: u16 = 0x20;
    pub const FIRST_SEGMENT: u16 = 0x40;
    pub const LAST_SEGMENT: u16 = 0x80;
    pub const SECONDARY: u16 = 0x100;
    pub const QC_FAIL: u16 = 0x200;
    pub const DUPLICATE: u16 = 0x400;
    pub const SUPPLEMENTARY: u16 = 0x800;

    #[inline(always)]
    fn has(&self, bit: u16) -> bool {
        self.0 & bit != 0
    }

    pub fn bits(&self) -> u16 {
        self.0
    }
    pub fn is_aligned(&self) -> bool {
        !self.has(Self::UNMAPPED)
    }
    pub fn is_paired(&self) -> bool {
        self.has(Self::PAIRED)
    }
    pub fn is_properly_paired(&self) -> bool {
        self.has(Self::PAIRED) && self.has(Self::PROPER_PAIR)
    }
    pub fn is_mate_aligned(&self) -> bool {
        !self.has(Self::MATE_UNMAPPED)
    }
    pub fn is_reverse(&self) -> bool {
        self.has(Self::REVERSE)
    }
    pub fn is_mate_reverse(&self) -> bool {
        self.has(Self::MATE_REVERSE)
    }
    pub fn is_first_segment(&self) -> bool {
        self.has(Self::FIRST_SEGMENT)
    }
    pub fn is_last_segment(&self) -> bool {
        self.has(Self::LAST_SEGMENT)
    }
    pub fn is_secondary(&self) -> bool {
        self.has(Self::SECONDARY)
    }
    pub fn is_qc_fail(&self) -> bool {
        self.has(Self::QC_FAIL)
    }
    pub fn is_duplicate(&self) -> bool {
        self.has(Self::DUPLICATE)
    }
    pub fn is_supplementary(&self) -> bool {
        self.has(Self::SUPPLEMENTARY)
    }
}

/// One aligned read: where it starts on the reference and how it is laid out there.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Getters, Dissolve, Constructor)]
pub struct Segment {
    name: String,
    contig: String,
    /// 0-based leftmost reference position
    start: u64,
    cigar: Cigar,
    orientation: Orientation,
    flags: Flags,
}

impl Segment {
    /// Reference interval covered by the alignment, `None` for records without reference bases.
    pub fn span(&self) -> Option<Interval<u64>> {
        let end = self.start.checked_add(self.cigar.reference_len())?;
        Interval::new(self.start, end).ok()
    }

    /// Reference intervals of every reference-consuming operation, left to right.
    pub fn blocks(&self) -> impl Iterator<Item = (&Op, u64, u64)> {
        let mut pos = self.start;
        self.cigar
            .iter()
            .filter(|op| op.kind.consumes_reference())
            .map(move |op| {
                let start = pos;
                pos = pos.saturating_add(op.len);
                (op, start, pos)
            })
    }
}
