pub mod correlation;
pub mod habit;
pub mod mood;

pub use correlation::*;
pub use habit::*;
pub use mood::*;
