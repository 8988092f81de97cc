pub mod correlation_engine;
pub mod mood_engine;
pub mod suggestion;
