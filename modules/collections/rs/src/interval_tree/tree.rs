use readthru_core_rs::{loc::Interval, num::PrimInt};

/// Incremental construction of an interval tree. Trees are immutable once built.
pub trait Builder {
    type Target: ITree;

    /// Add an interval and its corresponding element to the tree.
    fn add(
        self,
        interval: Interval<<Self::Target as ITree>::Idx>,
        element: <Self::Target as ITree>::Data,
    ) -> Self;

    /// Extend the tree from an iterator of intervals and their corresponding elements.
    fn extend(
        self,
        data: impl IntoIterator<
            Item = (
                Interval<<Self::Target as ITree>::Idx>,
                <Self::Target as ITree>::Data,
            ),
        >,
    ) -> Self;

    fn build(self) -> Self::Target;
}

/// Interval tree answering "which stored intervals overlap the query" questions.
pub trait ITree {
    type Idx: PrimInt;
    type Data;

    /// Number of stored intervals.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All (interval, data) pairs stored in the tree, in an implementation-defined order.
    fn records(&self) -> impl Iterator<Item = (Interval<Self::Idx>, &Self::Data)>;

    /// All entries whose intervals intersect the query. Touching intervals don't intersect.
    fn overlapping(
        &self,
        query: Interval<Self::Idx>,
    ) -> impl Iterator<Item = (Interval<Self::Idx>, &Self::Data)>;
}
