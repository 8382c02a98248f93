//! Core scoring services: the task lifecycle and both scoring strategies.

pub mod benchmark;
pub mod heuristic;
pub mod task;

pub use benchmark::BenchmarkStrategy;
pub use heuristic::HeuristicStrategy;
pub use task::BountyTask;
