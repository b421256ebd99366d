use std::fmt::Display;
use std::str::FromStr;

use eyre::{eyre, Report, Result};

use super::strand::Strand;

/// Orientation of a genomic object. Features without strand information are `Dual`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(i8)]
pub enum Orientation {
    Forward = 1,
    Reverse = -1,
    #[default]
    Dual = 0,
}

impl Orientation {
    /// Opposite orientation. Dual orientation stays the same.
    pub fn flipped(&self) -> Self {
        match self {
            Orientation::Forward => Orientation::Reverse,
            Orientation::Reverse => Orientation::Forward,
            Orientation::Dual => Orientation::Dual,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Orientation::Forward => '+',
            Orientation::Reverse => '-',
            Orientation::Dual => '.',
        }
    }

    /// Strand of the object, if it is stranded at all.
    pub fn strand(&self) -> Option<Strand> {
        match self {
            Orientation::Forward => Some(Strand::Forward),
            Orientation::Reverse => Some(Strand::Reverse),
            Orientation::Dual => None,
        }
    }
}

impl Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Orientation {
    type Err = Report;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "+" => Ok(Orientation::Forward),
            "-" => Ok(Orientation::Reverse),
            "." | "=" => Ok(Orientation::Dual),
            _ => Err(eyre!("Unknown orientation symbol: {s:?}")),
        }
    }
}

impl From<Strand> for Orientation {
    fn from(value: Strand) -> Self {
        match value {
            Strand::Forward => Orientation::Forward,
            Strand::Reverse => Orientation::Reverse,
        }
    }
}
