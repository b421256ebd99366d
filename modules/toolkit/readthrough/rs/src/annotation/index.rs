use ahash::AHashMap;

use readthru_collections_rs::interval_tree::Bits;
use readthru_collections_rs::overlap::Steps;
use readthru_core_rs::loc::Interval;

use super::builder::IndexBuilder;
use super::feature::Feature;

/// Immutable, unstranded overlap index over feature exons. Tree values are feature indices.
#[derive(Debug, Clone)]
pub struct FeatureIndex {
    features: Vec<Feature>,
    trees: AHashMap<String, Bits<u64, usize>>,
}

impl FeatureIndex {
    pub(crate) fn new(features: Vec<Feature>, trees: AHashMap<String, Bits<u64, usize>>) -> Self {
        Self { features, trees }
    }

    pub fn builder() -> IndexBuilder {
        IndexBuilder::default()
    }

    /// Features in annotation order, i.e. the order of their first exon.
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn feature(&self, ind: usize) -> Option<&Feature> {
        self.features.get(ind)
    }

    /// Exons overlapping the query together with their feature index.
    pub fn overlapping<'a>(
        &'a self,
        contig: &str,
        query: Interval<u64>,
    ) -> impl Iterator<Item = (Interval<u64>, usize)> + 'a {
        self.trees
            .get(contig)
            .into_iter()
            .flat_map(move |tree| tree.query(query).map(|(it, ind)| (it, *ind)))
    }

    /// Stepped decomposition of the query by the sets of overlapping features.
    pub fn steps<'s>(
        &self,
        contig: &str,
        query: Interval<u64>,
        steps: &'s mut Steps<u64, usize>,
    ) -> &'s Steps<u64, usize> {
        steps.build(query, self.overlapping(contig, query))
    }
}
