use ahash::AHashMap;
use eyre::{bail, Result};
use itertools::Itertools;

use readthru_collections_rs::interval_tree::{Bits, BitsBuilder, Builder};
use readthru_core_rs::loc::{Interval, IntervalOp, Locus, Strand};

use super::feature::{Feature, Geometry};
use super::index::FeatureIndex;
use crate::config::GeometryPolicy;

/// Running geometry of a single feature while its exons are being folded.
#[derive(Debug, Clone, Default)]
struct Draft {
    exons: Vec<Locus<String, u64>>,
    contig: Option<String>,
    strand: Option<Strand>,
    bounding: Option<Interval<u64>>,
    terminal: Option<Interval<u64>>,
    // Reason why the feature can't have geometry
    defect: Option<&'static str>,
}

impl Draft {
    fn add(&mut self, exon: Locus<String, u64>) {
        match &self.contig {
            None => self.contig = Some(exon.contig.clone()),
            Some(contig) if *contig != exon.contig => {
                self.defect = Some("exons are located on several contigs")
            }
            Some(_) => {}
        }

        if let Some(strand) = exon.orientation.strand() {
            match self.strand {
                None => self.strand = Some(strand),
                Some(existing) if existing != strand => {
                    self.defect = Some("exons disagree in strand")
                }
                Some(_) => {}
            }

            let interval = exon.interval;
            self.bounding = Some(match self.bounding {
                Some(bounding) => bounding.envelope(&interval),
                None => interval,
            });

            // Ties go to the last exon seen
            let is_downstream = |current: &Interval<u64>| match strand {
                Strand::Forward => interval.end() >= current.end(),
                Strand::Reverse => interval.start() <= current.start(),
            };
            if self.terminal.as_ref().is_none_or(is_downstream) {
                self.terminal = Some(interval);
            }
        }

        self.exons.push(exon);
    }

    fn finish(self, name: String) -> (Feature, Option<&'static str>) {
        let geometry = match (self.defect, self.contig, self.strand, self.bounding, self.terminal) {
            (None, Some(contig), Some(strand), Some(bounding), Some(terminal)) => {
                Ok(Geometry::new(contig, strand, bounding, terminal))
            }
            (Some(defect), ..) => Err(defect),
            _ => Err("only unstranded exons"),
        };
        match geometry {
            Ok(geometry) => (Feature::new(name, self.exons, Some(geometry)), None),
            Err(defect) => (Feature::new(name, self.exons, None), Some(defect)),
        }
    }
}

/// Accumulates exon records and builds the [`FeatureIndex`].
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    feature_type: String,
    policy: GeometryPolicy,
    names: Vec<String>,
    lookup: AHashMap<String, usize>,
    drafts: Vec<Draft>,
    trees: AHashMap<String, BitsBuilder<u64, usize>>,
    skipped: usize,
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self {
            feature_type: Self::DEFAULT_FEATURE_TYPE.to_string(),
            policy: GeometryPolicy::default(),
            names: Vec::new(),
            lookup: AHashMap::new(),
            drafts: Vec::new(),
            trees: AHashMap::new(),
            skipped: 0,
        }
    }
}

impl IndexBuilder {
    pub const DEFAULT_FEATURE_TYPE: &'static str = "exon";

    /// Only records of this kind participate in the index.
    pub fn set_feature_type(mut self, feature_type: impl Into<String>) -> Self {
        self.feature_type = feature_type.into();
        self
    }

    pub fn set_geometry_policy(mut self, policy: GeometryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn add_record(&mut self, name: &str, kind: &str, locus: Locus<String, u64>) -> &mut Self {
        if kind != self.feature_type {
            self.skipped += 1;
            return self;
        }

        let ind = match self.lookup.get(name) {
            Some(ind) => *ind,
            None => {
                let ind = self.names.len();
                self.names.push(name.to_string());
                self.lookup.insert(name.to_string(), ind);
                self.drafts.push(Draft::default());
                ind
            }
        };

        let tree = self.trees.remove(&locus.contig).unwrap_or_default();
        self.trees
            .insert(locus.contig.clone(), tree.add(locus.interval, ind));
        self.drafts[ind].add(locus);
        self
    }

    pub fn add_records<'a>(
        mut self,
        records: impl IntoIterator<Item = (&'a str, &'a str, Locus<String, u64>)>,
    ) -> Self {
        for (name, kind, locus) in records {
            self.add_record(name, kind, locus);
        }
        self
    }

    pub fn build(self) -> Result<FeatureIndex> {
        let mut features = Vec::with_capacity(self.drafts.len());
        let mut excluded = Vec::new();
        for (name, draft) in self.names.into_iter().zip(self.drafts) {
            let (feature, defect) = draft.finish(name);
            if let Some(defect) = defect {
                if self.policy == GeometryPolicy::Fatal {
                    bail!(
                        "Feature {} has no consistent geometry: {defect}",
                        feature.name()
                    );
                }
                excluded.push(feature.name().clone());
            }
            features.push(feature);
        }

        let eligible = features.len() - excluded.len();
        if eligible == 0 {
            bail!(
                "None of the {} annotated features has a consistent geometry (feature type: {})",
                features.len(),
                self.feature_type
            );
        }
        if !excluded.is_empty() {
            log::warn!(
                "Features without consistent geometry (N={}) are excluded from counting: {}",
                excluded.len(),
                excluded.iter().join(", ")
            );
        }

        let trees: AHashMap<String, Bits<u64, usize>> = self
            .trees
            .into_iter()
            .map(|(contig, tree)| (contig, tree.build()))
            .collect();
        log::info!(
            "Feature index: {} features ({} eligible) on {} contigs, {} records of other types skipped",
            features.len(),
            eligible,
            trees.len(),
            self.skipped
        );

        Ok(FeatureIndex::new(features, trees))
    }
}
