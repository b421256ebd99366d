pub use bits::{Bits, BitsBuilder, Iter};
pub use tree::{Builder, ITree};

mod bits;
mod tree;
