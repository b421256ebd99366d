pub use contig::Contig;
pub use interval::{Interval, IntervalOp};
pub use locus::{AsLocus, Locus};
pub use orientation::Orientation;
pub use strand::Strand;

mod contig;
mod interval;
mod locus;
mod orientation;
mod strand;
