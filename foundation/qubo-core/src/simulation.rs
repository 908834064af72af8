//! Simulation Orchestrator
//!
//! One run = derive penalty weights from the node count, encode, hand the
//! matrix to the solver, pick the cheapest candidate and validate it in
//! non-strict mode. Runs are synchronous and share no state besides the
//! optional telemetry sink.

use crate::errors::*;
use crate::graph::Graph;
use crate::penalty::{PenaltyPolicy, PenaltyWeights, SizeScaledPenalty};
use crate::qubo::encode;
use crate::solver::{ConvergenceConfig, QuboSolver};
use crate::telemetry::{PhaseName, RunMetric, TelemetryHandle};
use crate::validator::{Coloring, ConstraintViolation, Evaluation, SolutionValidator};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Result of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    /// Cost of the selected (cheapest) candidate
    pub cost: f64,
    /// `sum(y)` of the selected candidate, reported even when infeasible
    pub chromatic_number: usize,
    /// Solve time reported by the solver, in seconds
    pub time_to_solution: f64,
    pub feasible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_violation: Option<ConstraintViolation>,
    pub weights: PenaltyWeights,
    pub candidate_index: usize,
    pub candidate_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coloring: Option<Coloring>,
    pub matrix_fingerprint: String,
}

impl SimulationOutcome {
    /// `(cost, chromatic_number, time_to_solution)`
    pub fn as_tuple(&self) -> (f64, usize, f64) {
        (self.cost, self.chromatic_number, self.time_to_solution)
    }
}

pub struct QuboSimulation<S, P = SizeScaledPenalty> {
    solver: S,
    policy: P,
    convergence: ConvergenceConfig,
    telemetry: Option<Arc<TelemetryHandle>>,
}

impl<S: QuboSolver> QuboSimulation<S, SizeScaledPenalty> {
    pub fn new(solver: S) -> Self {
        Self {
            solver,
            policy: SizeScaledPenalty,
            convergence: ConvergenceConfig::default(),
            telemetry: None,
        }
    }
}

impl<S: QuboSolver, P: PenaltyPolicy> QuboSimulation<S, P> {
    /// Replace the penalty policy.
    pub fn with_policy<Q: PenaltyPolicy>(self, policy: Q) -> QuboSimulation<S, Q> {
        QuboSimulation {
            solver: self.solver,
            policy,
            convergence: self.convergence,
            telemetry: self.telemetry,
        }
    }

    /// Base convergence parameters; bond dimension and field ratio are
    /// overridden per run.
    pub fn with_convergence(mut self, convergence: ConvergenceConfig) -> Self {
        self.convergence = convergence;
        self
    }

    pub fn with_telemetry(mut self, telemetry: Arc<TelemetryHandle>) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    pub fn convergence(&self) -> &ConvergenceConfig {
        &self.convergence
    }

    fn record(&self, metric: impl FnOnce(&str) -> RunMetric) {
        if let Some(t) = &self.telemetry {
            t.record(metric(t.run_id()));
        }
    }

    /// Run one `(graph, c, hyperparameters)` tuple end to end.
    ///
    /// # Errors
    /// [`QuboError::SolverEmptyResult`] when the solver returns no candidate,
    /// [`QuboError::ShapeMismatch`] when the chosen candidate has the wrong
    /// length, and any error the solver itself reports.
    pub fn run_simulation(
        &mut self,
        graph: &Graph,
        num_colors: usize,
        max_bond_dimension: usize,
        transverse_field_ratio: f64,
    ) -> Result<SimulationOutcome> {
        let n = graph.num_vertices();
        let weights = self.policy.weights(n);

        let encode_start = Instant::now();
        let matrix = encode(graph, num_colors, &weights);
        let fingerprint = matrix.fingerprint();
        let encode_ms = encode_start.elapsed().as_secs_f64() * 1000.0;
        self.record(|run| {
            RunMetric::new(run, PhaseName::Encode, "qubo_matrix", 0, 0, encode_ms).with_parameters(
                serde_json::json!({
                    "n": n,
                    "c": num_colors,
                    "edges": graph.num_edges(),
                    "variables": matrix.dim(),
                    "lambda1": weights.lambda1,
                    "lambda2": weights.lambda2,
                    "lambda3": weights.lambda3,
                    "fingerprint": fingerprint,
                }),
            )
        });

        let config = self
            .convergence
            .with_hyperparameters(max_bond_dimension, transverse_field_ratio);
        log::info!(
            "[SIMULATION] Solving QUBO: n={} c={} vars={} bond_dim={} tfr={:e} via {}",
            n,
            num_colors,
            matrix.dim(),
            max_bond_dimension,
            transverse_field_ratio,
            self.solver.name()
        );

        let solve_start = Instant::now();
        let output = self.solver.solve(&matrix, &config)?;
        let solve_ms = solve_start.elapsed().as_secs_f64() * 1000.0;
        self.record(|run| {
            RunMetric::new(run, PhaseName::Solve, self.solver.name(), 0, 0, solve_ms)
                .with_parameters(serde_json::to_value(&config).unwrap_or_default())
                .with_notes(format!(
                    "{} candidates, reported time_to_solution={:.6}s",
                    output.costs.len(),
                    output.time_to_solution
                ))
        });

        let (candidate_index, cost) = output.best_candidate(self.solver.name())?;
        let candidate_count = output.costs.len();
        self.record(|run| {
            RunMetric::new(run, PhaseName::Select, "min_cost_candidate", 0, 0, 0.0).with_parameters(
                serde_json::json!({
                    "index": candidate_index,
                    "cost": cost,
                    "candidates": candidate_count,
                }),
            )
        });
        log::info!(
            "[SIMULATION] Best candidate #{} of {} with cost {}",
            candidate_index,
            candidate_count,
            cost
        );

        let validate_start = Instant::now();
        let solution = output.solutions[candidate_index].clone();
        let validator = SolutionValidator::new(graph, num_colors, solution)?;
        let Evaluation {
            first_violation,
            chromatic_number,
            coloring,
        } = validator.evaluate();
        let validate_ms = validate_start.elapsed().as_secs_f64() * 1000.0;
        self.record(|run| {
            let violations = usize::from(first_violation.is_some());
            let metric = RunMetric::new(
                run,
                PhaseName::Validate,
                "strict=false",
                chromatic_number,
                violations,
                validate_ms,
            );
            match &first_violation {
                Some(v) => metric.with_notes(v.to_string()),
                None => metric,
            }
        });

        log::info!(
            "[SIMULATION] Solution found in {:.4} s, chromatic number {} ({})",
            output.time_to_solution,
            chromatic_number,
            if first_violation.is_none() { "feasible" } else { "infeasible" }
        );

        Ok(SimulationOutcome {
            cost,
            chromatic_number,
            time_to_solution: output.time_to_solution,
            feasible: first_violation.is_none(),
            first_violation,
            weights,
            candidate_index,
            candidate_count,
            coloring,
            matrix_fingerprint: fingerprint,
        })
    }
}
