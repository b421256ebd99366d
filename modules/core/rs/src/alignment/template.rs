use std::iter;

use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;

use super::segment::Segment;

/// A single reported location of a template: both mates, or a lone mate.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum Placement {
    Paired(Segment, Segment),
    Orphan(Segment),
}

impl Placement {
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        let (first, second) = match self {
            Placement::Paired(a, b) => (a, Some(b)),
            Placement::Orphan(a) => (a, None),
        };
        iter::once(first).chain(second)
    }

    pub fn is_orphan(&self) -> bool {
        matches!(self, Placement::Orphan(_))
    }
}

/// All placements reported for one query name.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Getters, Dissolve, Constructor)]
pub struct Template {
    name: String,
    placements: Vec<Placement>,
}

impl Template {
    pub fn is_multimapped(&self) -> bool {
        self.placements.len() > 1
    }
}
