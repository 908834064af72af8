//! End-to-end runs through the annealing adapter.

use qubo_core::{
    ConvergenceConfig, Graph, QuboSimulation, SimulatedAnnealingSolver, TelemetryHandle,
};
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn path_graph_two_colors() {
    let graph = Graph::new(3, &[(0, 1), (1, 2)]).unwrap();
    let mut sim = QuboSimulation::new(SimulatedAnnealingSolver::new(2024));

    let outcome = sim.run_simulation(&graph, 2, 8, 1e9).unwrap();
    assert!(outcome.feasible, "violation: {:?}", outcome.first_violation);
    assert_eq!(outcome.chromatic_number, 2);
    assert_eq!(outcome.candidate_count, 8);

    let coloring = outcome.coloring.unwrap();
    assert_ne!(coloring.colors[0], coloring.colors[1]);
    assert_ne!(coloring.colors[1], coloring.colors[2]);
}

#[test]
fn path_graph_single_color_is_infeasible() {
    let graph = Graph::new(3, &[(0, 1), (1, 2)]).unwrap();
    let mut sim = QuboSimulation::new(SimulatedAnnealingSolver::new(9));

    let outcome = sim.run_simulation(&graph, 1, 4, 1e9).unwrap();
    assert!(!outcome.feasible);
    assert!(outcome.coloring.is_none());
    assert!(outcome.chromatic_number <= 1);
}

#[test]
fn empty_graph_uses_one_color() {
    let graph = Graph::empty(3).unwrap();
    let mut sim = QuboSimulation::new(SimulatedAnnealingSolver::new(5));

    let outcome = sim.run_simulation(&graph, 2, 8, 1e9).unwrap();
    assert!(outcome.feasible);
    assert_eq!(outcome.chromatic_number, 1);
}

#[test]
fn runs_are_reproducible() {
    let graph = Graph::new(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]).unwrap();
    let config = ConvergenceConfig {
        max_iterations: 20,
        ..ConvergenceConfig::default()
    };

    let run = || {
        let mut sim = QuboSimulation::new(SimulatedAnnealingSolver::new(77))
            .with_convergence(config.clone());
        sim.run_simulation(&graph, 4, 4, 1e6).unwrap()
    };
    let a = run();
    let b = run();
    assert_eq!(a.cost, b.cost);
    assert_eq!(a.chromatic_number, b.chromatic_number);
    assert_eq!(a.candidate_index, b.candidate_index);
    assert_eq!(a.matrix_fingerprint, b.matrix_fingerprint);
}

#[test]
fn telemetry_streams_jsonl() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("telemetry").join("metrics.jsonl");

    let telemetry = Arc::new(TelemetryHandle::with_jsonl(&path).unwrap());
    let graph = Graph::path(4).unwrap();
    let mut sim = QuboSimulation::new(SimulatedAnnealingSolver::new(3)).with_telemetry(telemetry.clone());
    sim.run_simulation(&graph, 2, 2, 1e9).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 4);
    assert_eq!(telemetry.len(), 4);
    for line in contents.lines() {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["run_id"], telemetry.run_id());
    }
}
