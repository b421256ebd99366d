pub mod bam;
pub mod compression;
pub mod gtf;
mod traits;

pub use traits::ReadRecord;
