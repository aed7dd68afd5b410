//! Application-level configuration.
//!
//! - [`ExecutionParams`] — gateway call control (timeouts, retries)

pub mod execution_params;

pub use execution_params::ExecutionParams;
