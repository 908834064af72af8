//! QUBO Core Domain
//!
//! Graph coloring as Quadratic Unconstrained Binary Optimization.
//! This crate contains ONLY domain logic - no file formats, no CLI.
//!
//! Architecture: Ports & Adapters
//! - The solver is a port ([`QuboSolver`]); [`SimulatedAnnealingSolver`] is the in-process adapter
//! - Penalty weights come from an injectable [`PenaltyPolicy`]
//! - Encoding and validation are pure and deterministic

pub mod annealing;
pub mod errors;
pub mod graph;
pub mod layout;
pub mod penalty;
pub mod qubo;
pub mod simulation;
pub mod solver;
pub mod telemetry;
pub mod validator;

// Re-export main types
pub use annealing::SimulatedAnnealingSolver;
pub use errors::*;
pub use graph::Graph;
pub use layout::VariableLayout;
pub use penalty::{FixedPenalty, PenaltyPolicy, PenaltyWeights, SizeScaledPenalty};
pub use qubo::{encode, QuboMatrix};
pub use simulation::{QuboSimulation, SimulationOutcome};
pub use solver::{ConvergenceConfig, Device, NumericPrecision, QuboSolver, SolverOutput};
pub use telemetry::{PhaseName, RunMetric, TelemetryHandle};
pub use validator::{Coloring, ConstraintViolation, Evaluation, SolutionValidator};
