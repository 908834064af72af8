//! QUBO graph coloring: instance store, hyperparameter sweeps and driver.
//!
//! The domain (encoding, validation, simulation) lives in `qubo-core`; this
//! crate adds everything that touches the filesystem or spans many runs.

pub mod config;
pub mod data;
pub mod results;
pub mod sweep;

// Re-export key types
pub use config::{load_sweep_config, ColorBound, SweepConfig, CONFIG_ENV_VAR};
pub use data::{GraphGenerator, GraphInstance, GraphInstanceStore};
pub use results::{SeriesRecord, SweepResults};
pub use sweep::{plan_jobs, run_sweep, SweepAxis, SweepJob, SweepReport};

pub use qubo_core;
