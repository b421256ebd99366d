use std::fmt::Display;

use eyre::{eyre, Report};

use super::orientation::Orientation;

/// Strand of a stranded genomic object.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[repr(i8)]
pub enum Strand {
    #[default]
    Forward = 1,
    Reverse = -1,
}

impl Strand {
    pub fn flipped(&self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Self::Forward => '+',
            Self::Reverse => '-',
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl TryFrom<Orientation> for Strand {
    type Error = Report;

    fn try_from(value: Orientation) -> Result<Self, Self::Error> {
        value
            .strand()
            .ok_or_else(|| eyre!("Dual orientation can't be converted to a strand"))
    }
}
