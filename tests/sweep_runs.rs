//! Small sweeps over a scratch instance store.

use qubo_coloring::{
    run_sweep, ColorBound, GraphInstanceStore, SweepAxis, SweepConfig, SweepJob, SweepResults,
};
use qubo_core::{
    ConvergenceConfig, QuboMatrix, QuboSolver, Result, SimulatedAnnealingSolver, SolverOutput,
    TelemetryHandle,
};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn small_config(root: &Path) -> SweepConfig {
    SweepConfig {
        graph_dir: root.join("graphs"),
        instances_per_bound: 1,
        generation_n_range: [3, 4],
        n_values: vec![3, 4],
        max_bond_dimensions: vec![2, 4],
        transverse_field_ratios: vec![1e9],
        // n=3 -> c=4 is never generated (c only reaches n), so it gets skipped
        color_bound: ColorBound::HalfPlusTwo,
        output_path: root.join("plots").join("results.json"),
        convergence: ConvergenceConfig {
            max_iterations: 10,
            ..ConvergenceConfig::default()
        },
        ..SweepConfig::default()
    }
}

fn populated_store(config: &SweepConfig) -> GraphInstanceStore {
    let mut store =
        GraphInstanceStore::open(&config.graph_dir, config.edge_probability, config.seed).unwrap();
    store
        .generate_and_store(
            config.generation_n_range(),
            config.generation_c_range(),
            config.instances_per_bound,
        )
        .unwrap();
    store
}

#[test]
fn sweep_records_results_and_skips_missing() {
    let dir = TempDir::new().unwrap();
    let config = small_config(dir.path());
    let store = populated_store(&config);

    let report = run_sweep(&config, &store, SimulatedAnnealingSolver::new, None).unwrap();
    assert_eq!(report.completed, 2);
    assert_eq!(report.resumed, 0);
    assert_eq!(report.skipped, vec![(3, 4), (3, 4)]);

    let saved = SweepResults::load_or_default(&config.output_path).unwrap();
    assert_eq!(saved, report.results);
    assert_eq!(saved.max_bond_dimension.len(), 2);
    assert!(saved.transverse_field_ratio.is_empty());
    for series in saved.max_bond_dimension.values() {
        assert_eq!(series.n_values, vec![4]);
        assert_eq!(series.color_bounds, vec![4]);
        assert_eq!(series.instances, vec![0]);
        assert!(series.chromatic_numbers[0] <= 4);
    }
}

#[test]
fn sweep_resumes_from_saved_results() {
    let dir = TempDir::new().unwrap();
    let config = small_config(dir.path());
    let store = populated_store(&config);

    let first = run_sweep(&config, &store, SimulatedAnnealingSolver::new, None).unwrap();
    let second = run_sweep(&config, &store, SimulatedAnnealingSolver::new, None).unwrap();

    assert_eq!(second.completed, 0);
    assert_eq!(second.resumed, 2);
    assert_eq!(second.results, first.results);
    assert_eq!(second.results.total_runs(), 2);
}

#[test]
fn resume_reruns_other_instance_or_color_bound() {
    let dir = TempDir::new().unwrap();
    let config = SweepConfig {
        instances_per_bound: 2,
        ..small_config(dir.path())
    };
    let store = populated_store(&config);
    run_sweep(&config, &store, SimulatedAnnealingSolver::new, None).unwrap();

    let other_instance = SweepConfig {
        instance_index: 1,
        ..config.clone()
    };
    let report = run_sweep(&other_instance, &store, SimulatedAnnealingSolver::new, None).unwrap();
    assert_eq!(report.resumed, 0);
    assert_eq!(report.completed, 2);
    for series in report.results.max_bond_dimension.values() {
        assert_eq!(series.n_values, vec![4, 4]);
        assert_eq!(series.instances, vec![0, 1]);
    }

    // c=3 exists for both n=3 and n=4
    let other_bound = SweepConfig {
        color_bound: ColorBound::Fixed { colors: 3 },
        ..config.clone()
    };
    let report = run_sweep(&other_bound, &store, SimulatedAnnealingSolver::new, None).unwrap();
    assert_eq!(report.resumed, 0);
    assert_eq!(report.completed, 4);
    assert!(report.skipped.is_empty());
    assert_eq!(report.results.max_bond_dimension["2"].color_bounds, vec![4, 4, 3, 3]);

    // identical inputs resume everything
    let again = run_sweep(&other_bound, &store, SimulatedAnnealingSolver::new, None).unwrap();
    assert_eq!(again.completed, 0);
    assert_eq!(again.resumed, 4);
}

#[test]
fn parallel_matches_sequential() {
    let dir = TempDir::new().unwrap();
    let sequential = small_config(&dir.path().join("seq"));
    let parallel = SweepConfig {
        parallel: true,
        ..small_config(&dir.path().join("par"))
    };

    let seq = run_sweep(
        &sequential,
        &populated_store(&sequential),
        SimulatedAnnealingSolver::new,
        None,
    )
    .unwrap();
    let par = run_sweep(
        &parallel,
        &populated_store(&parallel),
        SimulatedAnnealingSolver::new,
        None,
    )
    .unwrap();

    assert_eq!(seq.completed, par.completed);
    for (key, series) in &seq.results.max_bond_dimension {
        let other = &par.results.max_bond_dimension[key];
        assert_eq!(series.n_values, other.n_values);
        assert_eq!(series.chromatic_numbers, other.chromatic_numbers);
        assert_eq!(series.costs, other.costs);
    }
}

#[test]
fn field_ratio_axis_and_telemetry() {
    let dir = TempDir::new().unwrap();
    let config = SweepConfig {
        n_values: vec![4],
        max_bond_dimensions: vec![2],
        transverse_field_ratios: vec![1e9, 1e5],
        sweep_transverse_field_ratio: true,
        ..small_config(dir.path())
    };
    let store = populated_store(&config);
    let telemetry = Arc::new(TelemetryHandle::new());

    let report = run_sweep(
        &config,
        &store,
        SimulatedAnnealingSolver::new,
        Some(Arc::clone(&telemetry)),
    )
    .unwrap();

    assert_eq!(report.completed, 3);
    assert_eq!(report.results.max_bond_dimension["2"].len(), 1);
    assert_eq!(report.results.transverse_field_ratio["1e9"].len(), 1);
    assert_eq!(report.results.transverse_field_ratio["1e5"].len(), 1);
    // encode, solve, select, validate per run
    assert_eq!(telemetry.len(), 12);
}

struct SilentSolver;

impl QuboSolver for SilentSolver {
    fn name(&self) -> &str {
        "silent"
    }

    fn solve(&mut self, _matrix: &QuboMatrix, _config: &ConvergenceConfig) -> Result<SolverOutput> {
        Ok(SolverOutput {
            costs: vec![],
            solutions: vec![],
            time_to_solution: 0.0,
        })
    }
}

#[test]
fn empty_solver_result_aborts_sweep() {
    let dir = TempDir::new().unwrap();
    let config = small_config(dir.path());
    let store = populated_store(&config);

    let err = run_sweep(&config, &store, |_| SilentSolver, None).unwrap_err();
    let root = err.root_cause().to_string();
    assert!(root.contains("silent"), "unexpected error: {}", err);
}

/// Annealer that returns nothing when handed one particular seed.
struct FlakySolver {
    inner: SimulatedAnnealingSolver,
    fail: bool,
}

impl QuboSolver for FlakySolver {
    fn name(&self) -> &str {
        if self.fail {
            "flaky"
        } else {
            self.inner.name()
        }
    }

    fn solve(&mut self, matrix: &QuboMatrix, config: &ConvergenceConfig) -> Result<SolverOutput> {
        if self.fail {
            return SilentSolver.solve(matrix, config);
        }
        self.inner.solve(matrix, config)
    }
}

#[test]
fn parallel_failure_keeps_finished_results() {
    let dir = TempDir::new().unwrap();
    let config = SweepConfig {
        parallel: true,
        ..small_config(dir.path())
    };
    let store = populated_store(&config);

    let failing = SweepJob {
        axis: SweepAxis::MaxBondDimension,
        n: 4,
        c: 4,
        max_bond_dimension: 4,
        transverse_field_ratio: 1e9,
    };
    let bad_seed = failing.seed(config.seed);
    let factory = move |seed: u64| FlakySolver {
        inner: SimulatedAnnealingSolver::new(seed),
        fail: seed == bad_seed,
    };

    let err = run_sweep(&config, &store, factory, None).unwrap_err();
    assert!(err.root_cause().to_string().contains("flaky"), "unexpected error: {}", err);

    let saved = SweepResults::load_or_default(&config.output_path).unwrap();
    assert_eq!(saved.max_bond_dimension["2"].n_values, vec![4]);
    assert!(!saved.max_bond_dimension.contains_key("4"));
}
