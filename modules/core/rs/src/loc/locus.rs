use std::fmt::Display;

use derive_getters::Dissolve;
use derive_more::Constructor;
use impl_tools::autoimpl;

use crate::num::PrimInt;

use super::contig::Contig;
use super::interval::{Interval, IntervalOp};
use super::orientation::Orientation;

/// A locus is a region on a contig with a given orientation.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Dissolve, Constructor)]
pub struct Locus<Ctg: Contig, Idx: PrimInt> {
    pub contig: Ctg,
    pub interval: Interval<Idx>,
    pub orientation: Orientation,
}

/// Types that can be viewed as a genomic locus.
#[autoimpl(for <T: trait + ?Sized> &T, Box<T>)]
pub trait AsLocus {
    type Contig: Contig;
    type Idx: PrimInt;

    fn contig(&self) -> &Self::Contig;

    fn interval(&self) -> Interval<Self::Idx>;

    fn orientation(&self) -> Orientation;

    fn as_locus(&self) -> Locus<Self::Contig, Self::Idx> {
        Locus {
            contig: self.contig().clone(),
            interval: self.interval(),
            orientation: self.orientation(),
        }
    }
}

impl<Ctg: Contig, Idx: PrimInt> AsLocus for Locus<Ctg, Idx> {
    type Contig = Ctg;
    type Idx = Idx;

    fn contig(&self) -> &Self::Contig {
        &self.contig
    }
    fn interval(&self) -> Interval<Idx> {
        self.interval
    }
    fn orientation(&self) -> Orientation {
        self.orientation
    }
}

impl<Ctg: Contig + Display, Idx: PrimInt + Display> Display for Locus<Ctg, Idx> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}-{}[{}]",
            self.contig,
            self.interval.start(),
            self.interval.end(),
            self.orientation
        )
    }
}
