//! Pipeline stages for netpipe.
//!
//! Responsible for reading the three input sources, running quality control,
//! performing the device + time-window join, computing per-device analytics
//! and writing the output tables. Stages are plain functions; each consumes
//! the previous stage's output and shares no mutable state.

pub mod analytics;
pub mod quality;
pub mod reader;
pub mod report;
pub mod transform;

pub use netpipe_core as core;
