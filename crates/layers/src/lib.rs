pub mod jitter;
pub mod labels;
pub mod markers;
pub mod spiral;

pub use jitter::*;
pub use labels::*;
pub use markers::*;
pub use spiral::*;
