pub use cigar::{Cigar, Kind, Op};
pub use segment::{Flags, Segment};
pub use template::{Placement, Template};

mod cigar;
mod segment;
mod template;
