pub mod config;
pub mod error;
pub mod model;
pub mod observability;
pub mod preprocessing;
pub mod server;
pub mod storage;

// Re-export common types
pub use error::{ApiError, InferenceError};
