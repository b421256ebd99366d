pub use pairing::{pair_mates, Mate};
pub use reader::{open, TemplateReader};

mod pairing;
mod reader;
