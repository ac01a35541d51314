//! Shared foundations for the netpipe workspace.
//!
//! Record models, the pipeline error type, canonical UTC timestamp parsing
//! and run configuration. The stages themselves live in `netpipe-data`.

pub mod error;
pub mod models;
pub mod settings;
pub mod timestamp;

pub use error::{PipelineError, Result};
