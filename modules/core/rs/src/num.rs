use std::fmt::Debug;

/// Primitive integers used as genomic coordinates.
pub trait PrimInt: ::num::PrimInt + Debug + Default + Send + Sync {}
impl<T: ::num::PrimInt + Debug + Default + Send + Sync> PrimInt for T {}
