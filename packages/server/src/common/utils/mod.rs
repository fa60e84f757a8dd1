pub mod content_hash;
pub mod validation;

pub use content_hash::*;
pub use validation::*;
