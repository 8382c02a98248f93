//! Domain layer for the bounty scoring system.
//!
//! Pure business logic: models, the error taxonomy, and the ports that
//! infrastructure adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{ScoreError, ScoreResult};
