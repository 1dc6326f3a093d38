pub mod difficulty;
pub mod plan;
pub mod prefetch;
