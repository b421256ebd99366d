use std::fmt::Display;
use std::str::FromStr;

use derive_getters::{Dissolve, Getters};
use eyre::{bail, ensure, Report, Result};

/// How templates with more than one placement are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Multimapping {
    /// Every placement is counted with weight 1.
    CountAll,
    /// Multimappers are rejected as a whole, the template is only visible in diagnostics.
    #[default]
    CountNone,
    /// Every placement is counted with weight 1 / number of placements.
    CountFractional,
}

impl FromStr for Multimapping {
    type Err = Report;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "count_all" => Ok(Self::CountAll),
            "count_none" => Ok(Self::CountNone),
            "count_fractional" => Ok(Self::CountFractional),
            _ => bail!(
                "Unknown multimapping mode: {s:?}. Expected one of count_all, count_none, count_fractional"
            ),
        }
    }
}

impl Display for Multimapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::CountAll => "count_all",
            Self::CountNone => "count_none",
            Self::CountFractional => "count_fractional",
        };
        f.write_str(name)
    }
}

/// When a placement overlapping several features is considered ambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Ambiguity {
    /// Both mates must overlap exactly the same single feature, and no match operation may
    /// overlap more than one feature.
    #[default]
    Consensus,
    /// Only the union of both mates must be a single feature. A mate that overlaps nothing
    /// doesn't make the placement ambiguous.
    Union,
}

impl FromStr for Ambiguity {
    type Err = Report;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "union" => Ok(Self::Union),
            "consensus" => Ok(Self::Consensus),
            _ => bail!("Unknown ambiguity policy: {s:?}. Expected one of union, consensus"),
        }
    }
}

/// What happens to a placement that runs past the 3' end but has no measurable tail, e.g. a
/// spliced mate whose overhang is entirely intronic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ZeroTail {
    /// Reject with DOWNSTREAM_MATCH.
    #[default]
    Reject,
    /// Accept as a plain base hit.
    Base,
}

impl FromStr for ZeroTail {
    type Err = Report;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "reject" => Ok(Self::Reject),
            "base" => Ok(Self::Base),
            _ => bail!("Unknown zero tail policy: {s:?}. Expected one of reject, base"),
        }
    }
}

/// What happens to features whose exons don't define a consistent geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GeometryPolicy {
    /// Keep the feature in the overlap index but never count it.
    #[default]
    Exclude,
    /// Refuse to build the index.
    Fatal,
}

impl FromStr for GeometryPolicy {
    type Err = Report;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "exclude" => Ok(Self::Exclude),
            "fatal" => Ok(Self::Fatal),
            _ => bail!("Unknown geometry policy: {s:?}. Expected one of exclude, fatal"),
        }
    }
}

/// Classification settings shared by all workers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters, Dissolve)]
pub struct Config {
    anchor: u64,
    multimapping: Multimapping,
    ambiguity: Ambiguity,
    zero_tail: ZeroTail,
}

impl Config {
    pub const DEFAULT_ANCHOR: u64 = 10;

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            anchor: Self::DEFAULT_ANCHOR,
            multimapping: Multimapping::default(),
            ambiguity: Ambiguity::default(),
            zero_tail: ZeroTail::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    anchor: Option<u64>,
    multimapping: Option<Multimapping>,
    ambiguity: Option<Ambiguity>,
    zero_tail: Option<ZeroTail>,
}

impl ConfigBuilder {
    /// Minimum number of matched bases a mate must share with the feature.
    pub fn with_anchor(mut self, anchor: u64) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn with_multimapping(mut self, multimapping: Multimapping) -> Self {
        self.multimapping = Some(multimapping);
        self
    }

    pub fn with_ambiguity(mut self, ambiguity: Ambiguity) -> Self {
        self.ambiguity = Some(ambiguity);
        self
    }

    pub fn with_zero_tail(mut self, zero_tail: ZeroTail) -> Self {
        self.zero_tail = Some(zero_tail);
        self
    }

    pub fn build(self) -> Result<Config> {
        let anchor = self.anchor.unwrap_or(Config::DEFAULT_ANCHOR);
        ensure!(anchor > 0, "Feature anchor must be a positive number, got {anchor}");

        Ok(Config {
            anchor,
            multimapping: self.multimapping.unwrap_or_default(),
            ambiguity: self.ambiguity.unwrap_or_default(),
            zero_tail: self.zero_tail.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multimapping() -> Result<()> {
        for mode in [
            Multimapping::CountAll,
            Multimapping::CountNone,
            Multimapping::CountFractional,
        ] {
            assert_eq!(mode.to_string().parse::<Multimapping>()?, mode);
        }

        let err = "count_some".parse::<Multimapping>().unwrap_err();
        assert!(err.to_string().contains("count_some"));
        Ok(())
    }

    #[test]
    fn test_parse_policies() -> Result<()> {
        assert_eq!("consensus".parse::<Ambiguity>()?, Ambiguity::Consensus);
        assert_eq!("union".parse::<Ambiguity>()?, Ambiguity::Union);
        assert_eq!("base".parse::<ZeroTail>()?, ZeroTail::Base);
        assert_eq!("fatal".parse::<GeometryPolicy>()?, GeometryPolicy::Fatal);
        assert!("strict".parse::<Ambiguity>().is_err());
        assert!("".parse::<ZeroTail>().is_err());
        Ok(())
    }

    #[test]
    fn test_builder() -> Result<()> {
        assert_eq!(Config::builder().build()?, Config::default());

        let config = Config::builder()
            .with_anchor(25)
            .with_multimapping(Multimapping::CountFractional)
            .with_zero_tail(ZeroTail::Base)
            .build()?;
        assert_eq!(*config.anchor(), 25);
        assert_eq!(*config.multimapping(), Multimapping::CountFractional);
        assert_eq!(*config.ambiguity(), Ambiguity::Consensus);
        assert_eq!(*config.zero_tail(), ZeroTail::Base);

        let config = Config::builder().with_ambiguity(Ambiguity::Union).build()?;
        assert_eq!(*config.ambiguity(), Ambiguity::Union);

        let err = Config::builder().with_anchor(0).build().unwrap_err();
        assert!(err.to_string().contains("anchor"));
        Ok(())
    }
}
