//! Hyperparameter sweep driver.
//!
//! Varies `max_bond_dimension` at the first field ratio (and, when enabled,
//! `transverse_field_ratio` at the first bond dimension) across the
//! configured node counts. Every combination is independent; solver seeds are
//! derived from the combination itself so results do not depend on execution
//! order.

use crate::config::SweepConfig;
use crate::data::GraphInstanceStore;
use crate::results::{bond_key, ratio_key, SeriesRecord, SweepResults};
use anyhow::{Context, Result};
use qubo_core::{QuboError, QuboSimulation, QuboSolver, SimulationOutcome, TelemetryHandle};
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepAxis {
    MaxBondDimension,
    TransverseFieldRatio,
}

/// One `(axis, n, hyperparameters)` combination.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepJob {
    pub axis: SweepAxis,
    pub n: usize,
    pub c: usize,
    pub max_bond_dimension: usize,
    pub transverse_field_ratio: f64,
}

impl SweepJob {
    /// Series key within the job's axis.
    pub fn key(&self) -> String {
        match self.axis {
            SweepAxis::MaxBondDimension => bond_key(self.max_bond_dimension),
            SweepAxis::TransverseFieldRatio => ratio_key(self.transverse_field_ratio),
        }
    }

    /// Solver seed for this combination.
    pub fn seed(&self, base_seed: u64) -> u64 {
        let mut hasher = Sha256::new();
        hasher.update(base_seed.to_le_bytes());
        hasher.update((self.n as u64).to_le_bytes());
        hasher.update((self.c as u64).to_le_bytes());
        hasher.update((self.max_bond_dimension as u64).to_le_bytes());
        hasher.update(self.transverse_field_ratio.to_bits().to_le_bytes());
        let digest = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(bytes)
    }
}

/// Expand the configuration into jobs, in series order.
///
/// # Errors
/// [`QuboError::ConfigError`] when the configuration does not validate.
pub fn plan_jobs(config: &SweepConfig) -> qubo_core::Result<Vec<SweepJob>> {
    config.validate()?;
    let (Some(&first_ratio), Some(&first_bond)) = (
        config.transverse_field_ratios.first(),
        config.max_bond_dimensions.first(),
    ) else {
        return Err(QuboError::ConfigError(
            "sweep needs at least one bond dimension and one field ratio".to_string(),
        ));
    };

    let mut jobs = Vec::new();
    for &bond in &config.max_bond_dimensions {
        for &n in &config.n_values {
            jobs.push(SweepJob {
                axis: SweepAxis::MaxBondDimension,
                n,
                c: config.color_bound.resolve(n),
                max_bond_dimension: bond,
                transverse_field_ratio: first_ratio,
            });
        }
    }

    if config.sweep_transverse_field_ratio {
        for &ratio in &config.transverse_field_ratios {
            for &n in &config.n_values {
                jobs.push(SweepJob {
                    axis: SweepAxis::TransverseFieldRatio,
                    n,
                    c: config.color_bound.resolve(n),
                    max_bond_dimension: first_bond,
                    transverse_field_ratio: ratio,
                });
            }
        }
    }
    Ok(jobs)
}

/// Summary of a finished sweep.
#[derive(Debug, Clone)]
pub struct SweepReport {
    pub results: SweepResults,
    pub completed: usize,
    /// Jobs already present in the results file
    pub resumed: usize,
    /// `(n, c)` pairs whose instance was missing
    pub skipped: Vec<(usize, usize)>,
}

fn series_for<'r>(results: &'r SweepResults, job: &SweepJob) -> Option<&'r SeriesRecord> {
    match job.axis {
        SweepAxis::MaxBondDimension => results.max_bond_dimension.get(&job.key()),
        SweepAxis::TransverseFieldRatio => results.transverse_field_ratio.get(&job.key()),
    }
}

/// True only when `(n, c, instance)` was already solved for this series.
fn already_recorded(results: &SweepResults, job: &SweepJob, instance: usize) -> bool {
    match series_for(results, job) {
        Some(series) if series.contains(job.n, job.c, instance) => true,
        Some(series) if series.contains_n(job.n) => {
            log::warn!(
                "[SWEEP] {:?}={} already holds n={} for another color bound or instance; \
                 recording n={} c={} instance={} alongside it",
                job.axis,
                job.key(),
                job.n,
                job.n,
                job.c,
                instance
            );
            false
        }
        _ => false,
    }
}

fn record(results: &mut SweepResults, job: &SweepJob, instance: usize, outcome: &SimulationOutcome) {
    let series = match job.axis {
        SweepAxis::MaxBondDimension => results.max_bond_dimension.entry(job.key()).or_default(),
        SweepAxis::TransverseFieldRatio => results.transverse_field_ratio.entry(job.key()).or_default(),
    };
    series.push(job.n, job.c, instance, outcome);
}

/// Run one job. `Ok(None)` means the instance was missing and the job skipped.
fn run_job<S, F>(
    job: &SweepJob,
    config: &SweepConfig,
    store: &GraphInstanceStore,
    solver_factory: &F,
    telemetry: Option<&Arc<TelemetryHandle>>,
) -> qubo_core::Result<Option<SimulationOutcome>>
where
    S: QuboSolver,
    F: Fn(u64) -> S,
{
    let instance = match store.load(job.n, job.c, config.instance_index) {
        Ok(instance) => instance,
        Err(e) if e.is_recoverable() => {
            log::warn!(
                "[SWEEP] Graph instance for n={}, c={} not found. Skipping.",
                job.n,
                job.c
            );
            return Ok(None);
        }
        Err(e) => return Err(e),
    };
    let graph = instance.to_graph()?;

    let solver = solver_factory(job.seed(config.seed));
    let mut simulation = QuboSimulation::new(solver).with_convergence(config.convergence.clone());
    if let Some(t) = telemetry {
        simulation = simulation.with_telemetry(Arc::clone(t));
    }

    let outcome = simulation.run_simulation(
        &graph,
        instance.c,
        job.max_bond_dimension,
        job.transverse_field_ratio,
    )?;
    log::info!(
        "[SWEEP] {:?}={} n={} c={} -> cost={} chromatic={}",
        job.axis,
        job.key(),
        job.n,
        job.c,
        outcome.cost,
        outcome.chromatic_number
    );
    Ok(Some(outcome))
}

/// Run every planned job, resuming from `config.output_path` when it exists.
///
/// Sequential mode saves after each completed job; parallel mode runs the
/// remaining jobs on the rayon pool and saves once, in plan order.
pub fn run_sweep<S, F>(
    config: &SweepConfig,
    store: &GraphInstanceStore,
    solver_factory: F,
    telemetry: Option<Arc<TelemetryHandle>>,
) -> Result<SweepReport>
where
    S: QuboSolver,
    F: Fn(u64) -> S + Sync,
{
    let jobs = plan_jobs(config)?;
    let mut results = SweepResults::load_or_default(&config.output_path)
        .with_context(|| format!("reading results from {:?}", config.output_path))?;

    let instance = config.instance_index;
    let (done, pending): (Vec<SweepJob>, Vec<SweepJob>) = jobs
        .into_iter()
        .partition(|job| already_recorded(&results, job, instance));
    let resumed = done.len();
    if resumed > 0 {
        log::info!("[SWEEP] Resuming: {} combinations already recorded", resumed);
    }

    let mut completed = 0;
    let mut skipped = Vec::new();

    if config.parallel {
        let outcomes: Vec<qubo_core::Result<Option<SimulationOutcome>>> = pending
            .par_iter()
            .map(|job| run_job(job, config, store, &solver_factory, telemetry.as_ref()))
            .collect();

        let mut first_error = None;
        for (job, outcome) in pending.iter().zip(outcomes) {
            match outcome {
                Ok(Some(outcome)) => {
                    record(&mut results, job, instance, &outcome);
                    completed += 1;
                }
                Ok(None) => skipped.push((job.n, job.c)),
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some((job.clone(), e));
                    }
                }
            }
        }
        results
            .save(&config.output_path)
            .with_context(|| format!("saving results to {:?}", config.output_path))?;
        if let Some((job, e)) = first_error {
            return Err(e).with_context(|| format!("sweep job failed: {:?}", job));
        }
    } else {
        for job in &pending {
            let outcome = run_job(job, config, store, &solver_factory, telemetry.as_ref())
                .with_context(|| format!("sweep job failed: {:?}", job))?;
            match outcome {
                Some(outcome) => {
                    record(&mut results, job, instance, &outcome);
                    completed += 1;
                    results
                        .save(&config.output_path)
                        .with_context(|| format!("saving results to {:?}", config.output_path))?;
                }
                None => skipped.push((job.n, job.c)),
            }
        }
    }

    log::info!(
        "[SWEEP] Results saved to {:?} ({} new, {} skipped)",
        config.output_path,
        completed,
        skipped.len()
    );

    Ok(SweepReport {
        results,
        completed,
        resumed,
        skipped,
    })
}
