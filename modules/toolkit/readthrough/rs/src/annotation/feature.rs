use derive_getters::{Dissolve, Getters};

use readthru_core_rs::loc::{Interval, IntervalOp, Locus, Strand};

/// Derived shape of a feature, computed once from its stranded exons.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters, Dissolve)]
pub struct Geometry {
    contig: String,
    strand: Strand,
    /// Smallest interval covering every stranded exon
    bounding: Interval<u64>,
    /// The most 3' exon relative to the strand
    terminal_exon: Interval<u64>,
    /// The last transcribed base of the terminal exon
    terminal_nucleotide: Interval<u64>,
}

impl Geometry {
    pub fn new(
        contig: String,
        strand: Strand,
        bounding: Interval<u64>,
        terminal_exon: Interval<u64>,
    ) -> Self {
        let terminal_nucleotide = match strand {
            Strand::Forward => Interval::nucleotide(terminal_exon.end() - 1),
            Strand::Reverse => Interval::nucleotide(terminal_exon.start()),
        };
        Self {
            contig,
            strand,
            bounding,
            terminal_exon,
            terminal_nucleotide,
        }
    }

    /// Reference position where transcription of the feature ends. Anything past it in the
    /// direction of transcription is downstream.
    pub fn three_prime_edge(&self) -> u64 {
        match self.strand {
            Strand::Forward => self.terminal_nucleotide.end(),
            Strand::Reverse => self.terminal_nucleotide.start(),
        }
    }
}

/// Annotated gene model. Features without geometry participate in overlap detection only.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Dissolve)]
pub struct Feature {
    name: String,
    exons: Vec<Locus<String, u64>>,
    geometry: Option<Geometry>,
}

impl Feature {
    pub(crate) fn new(
        name: String,
        exons: Vec<Locus<String, u64>>,
        geometry: Option<Geometry>,
    ) -> Self {
        Self {
            name,
            exons,
            geometry,
        }
    }

    pub fn strand(&self) -> Option<Strand> {
        self.geometry.as_ref().map(|x| x.strand)
    }

    pub fn is_eligible(&self) -> bool {
        self.geometry.is_some()
    }
}
