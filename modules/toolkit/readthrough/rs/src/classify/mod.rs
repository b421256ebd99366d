pub use classifier::{Classifier, Scratch};
pub use outcome::{Call, Hit, Outcome, Reason, Tier};

mod classifier;
mod outcome;
mod overlap;
mod tail;
