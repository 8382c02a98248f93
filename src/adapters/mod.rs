//! Infrastructure adapters for external systems.

pub mod hub;
pub mod process;
pub mod progress;
pub mod results;

pub use hub::HubFetcher;
pub use process::TokioProcessRunner;
pub use progress::{MemorySink, ProgressEvent, TracingSink};
