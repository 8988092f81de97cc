pub mod habit;
pub mod log;
pub mod stats;
