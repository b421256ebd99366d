pub use builder::IndexBuilder;
pub use feature::{Feature, Geometry};
pub use index::FeatureIndex;

mod builder;
mod feature;
mod index;
