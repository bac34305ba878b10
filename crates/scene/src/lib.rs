pub mod item;
pub mod picking;
pub mod query;
pub mod viewport;
pub mod world;

pub use item::*;
pub use viewport::*;
pub use world::*;
