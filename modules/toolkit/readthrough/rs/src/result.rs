use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;

use crate::counter::Diagnostics;

#[derive(Clone, PartialEq, Debug, Default, Constructor, Dissolve, Getters)]
pub struct Row {
    name: String,
    base: f64,
    readthrough: f64,
}

/// Final counts of a run. Rows and tails are listed in annotation order and only for features
/// that received at least one base hit.
#[derive(Clone, PartialEq, Debug, Default, Constructor, Dissolve, Getters)]
pub struct Summary {
    rows: Vec<Row>,
    tails: Vec<(String, Vec<u64>)>,
    diagnostics: Diagnostics,
}
