pub mod interval_tree;
pub mod overlap;
