//! Internal telemetry for the comment engine.
//!
//! Metrics stay in process; no external metrics system is assumed.

pub mod health;
pub mod metrics;
pub mod tracing_setup;

pub use health::*;
pub use metrics::*;
pub use tracing_setup::*;
