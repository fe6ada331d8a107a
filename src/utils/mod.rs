pub mod paths;
pub mod validation;

pub use paths::*;
pub use validation::*;
