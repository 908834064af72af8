//! Simulation telemetry: per-phase metrics and a shared sink.

pub mod handle;
pub mod run_metric;

pub use handle::TelemetryHandle;
pub use run_metric::{PhaseName, PhaseStats, RunMetric};
