pub mod loader;
pub mod model;

pub use loader::*;
pub use model::*;
