// Library interface for the Evals CLI
// The binary is a thin shell over these modules; tests use them directly

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod status;
pub mod utils;

// Re-export commonly used types
pub use api::EvalsClient;
pub use error::{EvalsError, Result};
pub use metrics::{MetricQuery, MetricsPage};
