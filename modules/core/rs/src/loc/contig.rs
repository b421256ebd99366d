use std::fmt::Debug;
use std::hash::Hash;

/// Contig refers to an assembly sequence (chromosome, scaffold). Usually a string name taken from
/// the annotation or the alignment header.
pub trait Contig:
    Hash + PartialEq + Eq + PartialOrd + Ord + Clone + Default + Debug + Send + Sync
{
}

impl<T> Contig for T where
    T: Hash + PartialEq + Eq + PartialOrd + Ord + Clone + Default + Debug + Send + Sync
{
}
