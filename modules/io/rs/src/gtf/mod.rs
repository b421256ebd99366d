pub use reader::Reader;
pub use record::Record;

mod reader;
mod record;
