mod segment;
mod tree;

pub use segment::{Field, Repeat, Segment};
pub use tree::MessageTree;
