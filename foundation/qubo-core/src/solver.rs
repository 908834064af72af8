//! Solver port.
//!
//! The QUBO solver is an external collaborator: it consumes a matrix and a
//! convergence configuration and returns parallel sequences of candidate
//! costs and binary vectors plus the wall-clock solve time. Nothing here
//! assumes the candidates are feasible, distinct, or that the search
//! converged.

use crate::errors::*;
use crate::qubo::QuboMatrix;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Floating point tag forwarded to the solver backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumericPrecision {
    /// single precision real
    #[serde(rename = "S")]
    Single,
    /// double precision real
    #[serde(rename = "D")]
    Double,
    /// single precision complex
    #[serde(rename = "C")]
    ComplexSingle,
    /// double precision complex
    #[serde(rename = "Z")]
    ComplexDouble,
}

impl fmt::Display for NumericPrecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            NumericPrecision::Single => "S",
            NumericPrecision::Double => "D",
            NumericPrecision::ComplexSingle => "C",
            NumericPrecision::ComplexDouble => "Z",
        };
        f.write_str(tag)
    }
}

/// Execution target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Device {
    Cpu,
    Gpu,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Gpu => write!(f, "gpu"),
        }
    }
}

fn default_max_bond_dimension() -> usize { 8 }
fn default_max_iterations() -> usize { 30 }
fn default_true() -> bool { true }
fn default_transverse_field_ratio() -> f64 { 1e9 }
fn default_precision() -> NumericPrecision { NumericPrecision::Double }
fn default_optimization_level() -> u8 { 3 }
fn default_device() -> Device { Device::Cpu }

/// Convergence parameters handed to the solver with each matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceConfig {
    /// Caps the solver's internal resolution
    #[serde(default = "default_max_bond_dimension")]
    pub max_bond_dimension: usize,

    /// Hard iteration cap
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Adaptive resolution growth
    #[serde(default = "default_true")]
    pub enable_expansion: bool,

    /// Exploration vs. exploitation balance
    #[serde(default = "default_transverse_field_ratio")]
    pub transverse_field_ratio: f64,

    #[serde(default = "default_precision")]
    pub numeric_precision: NumericPrecision,

    /// Effort tier
    #[serde(default = "default_optimization_level")]
    pub optimization_level: u8,

    #[serde(default = "default_device")]
    pub device: Device,
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            max_bond_dimension: default_max_bond_dimension(),
            max_iterations: default_max_iterations(),
            enable_expansion: true,
            transverse_field_ratio: default_transverse_field_ratio(),
            numeric_precision: default_precision(),
            optimization_level: default_optimization_level(),
            device: default_device(),
        }
    }
}

impl ConvergenceConfig {
    /// Copy with the two swept hyperparameters replaced.
    pub fn with_hyperparameters(&self, max_bond_dimension: usize, transverse_field_ratio: f64) -> Self {
        Self {
            max_bond_dimension,
            transverse_field_ratio,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_bond_dimension == 0 {
            return Err(QuboError::ConfigError(
                "max_bond_dimension must be > 0".to_string(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(QuboError::ConfigError(
                "max_iterations must be > 0".to_string(),
            ));
        }
        if !(self.transverse_field_ratio.is_finite() && self.transverse_field_ratio > 0.0) {
            return Err(QuboError::ConfigError(format!(
                "transverse_field_ratio must be positive and finite, got {}",
                self.transverse_field_ratio
            )));
        }
        Ok(())
    }
}

/// Candidate set returned by a solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverOutput {
    pub costs: Vec<f64>,
    pub solutions: Vec<Vec<u8>>,
    /// Wall-clock seconds as measured by the solver
    pub time_to_solution: f64,
}

impl SolverOutput {
    /// Index and cost of the cheapest candidate.
    ///
    /// Ties go to the first occurrence; NaN costs never win. An empty
    /// candidate set is a contract violation by the solver and is reported as
    /// [`QuboError::SolverEmptyResult`].
    pub fn best_candidate(&self, solver: &str) -> Result<(usize, f64)> {
        if self.costs.len() != self.solutions.len() {
            return Err(QuboError::SolverContractViolation(format!(
                "{} costs for {} solutions",
                self.costs.len(),
                self.solutions.len()
            )));
        }

        let mut best: Option<(usize, f64)> = None;
        for (idx, &cost) in self.costs.iter().enumerate() {
            if cost.is_nan() {
                continue;
            }
            match best {
                Some((_, best_cost)) if cost >= best_cost => {}
                _ => best = Some((idx, cost)),
            }
        }

        best.ok_or_else(|| QuboError::SolverEmptyResult {
            solver: solver.to_string(),
        })
    }
}

/// A QUBO minimizer.
///
/// Implementations block until they finish; the caller imposes no timeout.
pub trait QuboSolver {
    fn name(&self) -> &str;

    fn solve(&mut self, matrix: &QuboMatrix, config: &ConvergenceConfig) -> Result<SolverOutput>;
}

impl<S: QuboSolver + ?Sized> QuboSolver for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(&mut self, matrix: &QuboMatrix, config: &ConvergenceConfig) -> Result<SolverOutput> {
        (**self).solve(matrix, config)
    }
}
