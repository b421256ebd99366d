use std::fmt::{Display, Write};
use std::str::FromStr;

use derive_more::{Constructor, Deref, From, Into, IntoIterator};
use eyre::{bail, ensure, eyre, Report, Result};

/// CIGAR operation kinds, in SAM order.
#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Kind {
    /// Alignment match, either a sequence match or a mismatch (M)
    Match,
    /// Insertion to the reference (I)
    Insertion,
    /// Deletion from the reference (D)
    Deletion,
    /// Skipped region from the reference, usually an intron (N)
    Skip,
    /// Soft clipping, clipped bases are present in the read sequence (S)
    SoftClip,
    /// Hard clipping, clipped bases are absent from the read sequence (H)
    HardClip,
    /// Silent deletion from the padded reference (P)
    Pad,
    /// Sequence match (=)
    SequenceMatch,
    /// Sequence mismatch (X)
    SequenceMismatch,
}

impl Kind {
    /// Operations that align read bases against reference bases.
    pub fn is_match(&self) -> bool {
        matches!(
            self,
            Kind::Match | Kind::SequenceMatch | Kind::SequenceMismatch
        )
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Kind::Skip)
    }

    pub fn consumes_reference(&self) -> bool {
        matches!(
            self,
            Kind::Match | Kind::Deletion | Kind::Skip | Kind::SequenceMatch | Kind::SequenceMismatch
        )
    }

    pub fn symbol(&self) -> char {
        match self {
            Kind::Match => 'M',
            Kind::Insertion => 'I',
            Kind::Deletion => 'D',
            Kind::Skip => 'N',
            Kind::SoftClip => 'S',
            Kind::HardClip => 'H',
            Kind::Pad => 'P',
            Kind::SequenceMatch => '=',
            Kind::SequenceMismatch => 'X',
        }
    }
}

impl TryFrom<char> for Kind {
    type Error = Report;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'M' => Ok(Kind::Match),
            'I' => Ok(Kind::Insertion),
            'D' => Ok(Kind::Deletion),
            'N' => Ok(Kind::Skip),
            'S' => Ok(Kind::SoftClip),
            'H' => Ok(Kind::HardClip),
            'P' => Ok(Kind::Pad),
            '=' => Ok(Kind::SequenceMatch),
            'X' => Ok(Kind::SequenceMismatch),
            _ => Err(eyre!("Unknown CIGAR operation: {value:?}")),
        }
    }
}

/// A single CIGAR operation: kind and length.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Constructor)]
pub struct Op {
    pub kind: Kind,
    pub len: u64,
}

impl Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.len, self.kind.symbol())
    }
}

/// Ordered sequence of CIGAR operations.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Default, Deref, From, Into, IntoIterator)]
pub struct Cigar(Vec<Op>);

impl Cigar {
    /// Number of reference bases covered by the alignment.
    pub fn reference_len(&self) -> u64 {
        self.0
            .iter()
            .filter(|op| op.kind.consumes_reference())
            .fold(0u64, |total, op| total.saturating_add(op.len))
    }
}

impl<'a> IntoIterator for &'a Cigar {
    type Item = &'a Op;
    type IntoIter = std::slice::Iter<'a, Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Op> for Cigar {
    fn from_iter<T: IntoIterator<Item = Op>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromStr for Cigar {
    type Err = Report;

    fn from_str(s: &str) -> Result<Self> {
        let mut ops = Vec::new();
        let mut len: Option<u64> = None;
        for c in s.chars() {
            if let Some(digit) = c.to_digit(10) {
                len = len
                    .unwrap_or(0)
                    .checked_mul(10)
                    .and_then(|l| l.checked_add(digit as u64));
                ensure!(len.is_some(), "CIGAR operation length overflows in {s:?}");
                continue;
            }
            let Some(l) = len.take() else {
                bail!("CIGAR operation {c:?} without length in {s:?}");
            };
            ensure!(l > 0, "Zero-length CIGAR operation in {s:?}");
            ops.push(Op::new(Kind::try_from(c)?, l));
        }
        ensure!(len.is_none(), "Dangling length at the end of CIGAR {s:?}");
        Ok(Self(ops))
    }
}

impl Display for Cigar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return f.write_char('*');
        }
        for op in &self.0 {
            write!(f, "{op}")?;
        }
        Ok(())
    }
}
