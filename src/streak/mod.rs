pub mod analyzer;
pub mod normalizer;

pub use analyzer::{analyze, StreakVerdict};
pub use normalizer::{normalize, TeamForm};
