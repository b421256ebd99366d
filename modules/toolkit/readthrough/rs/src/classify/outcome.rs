use std::fmt::Display;

use derive_getters::{Dissolve, Getters};
use derive_more::{Constructor, From};

/// Why a placement was not counted. Codes are stable and written to the fails stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Reason {
    MultiMap = 1,
    Orphan = 2,
    FailChecks = 3,
    NoName = 4,
    MultiName = 5,
    InsuffMatch = 6,
    UpstreamMatch = 7,
    DownstreamMatch = 8,
}

impl Reason {
    pub const ALL: [Reason; 8] = [
        Reason::MultiMap,
        Reason::Orphan,
        Reason::FailChecks,
        Reason::NoName,
        Reason::MultiName,
        Reason::InsuffMatch,
        Reason::UpstreamMatch,
        Reason::DownstreamMatch,
    ];

    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn name(&self) -> &'static str {
        match self {
            Reason::MultiMap => "MULTI_MAP",
            Reason::Orphan => "ORPHAN",
            Reason::FailChecks => "FAIL_CHECKS",
            Reason::NoName => "NO_NAME",
            Reason::MultiName => "MULTI_NAME",
            Reason::InsuffMatch => "INSUFF_MATCH",
            Reason::UpstreamMatch => "UPSTREAM_MATCH",
            Reason::DownstreamMatch => "DOWNSTREAM_MATCH",
        }
    }

    /// Position of the reason in [`Reason::ALL`].
    pub fn index(&self) -> usize {
        self.code() as usize - 1
    }
}

impl Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for Reason {
    type Error = eyre::Report;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Reason::ALL
            .iter()
            .find(|x| x.code() == value)
            .copied()
            .ok_or_else(|| eyre::eyre!("Unknown rejection code: {value}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Base,
    Readthrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Getters, Dissolve, Constructor)]
pub struct Hit {
    /// Index of the feature in the annotation
    feature: usize,
    tier: Tier,
    base_match_length: u64,
    /// Zero for base hits
    tail_length: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, From)]
pub enum Outcome {
    Rejected(Reason),
    Accepted(Hit),
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted(_))
    }
}

/// Outcome of a single placement with the weight it carries into the counts.
#[derive(Debug, Clone, Copy, PartialEq, Getters, Dissolve, Constructor)]
pub struct Call {
    outcome: Outcome,
    weight: f64,
}
