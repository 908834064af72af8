//! In-process simulated annealing QUBO solver.
//!
//! Stands in for the tensor-network backend so the pipeline can run end to
//! end on CPU. Convergence parameters are mapped as follows:
//!
//! - `max_bond_dimension`: number of independent replicas (one candidate each)
//! - `max_iterations * (optimization_level + 1)`: sweeps per replica
//! - `transverse_field_ratio`: ratio between first and last temperature of a geometric ladder
//! - `enable_expansion`: greedy single-flip descent after annealing
//!
//! Replicas are seeded from the solver seed, so output is reproducible.

use crate::errors::*;
use crate::qubo::QuboMatrix;
use crate::solver::{ConvergenceConfig, Device, QuboSolver, SolverOutput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

/// Upper bound on the temperature ratio; beyond this the cold end is effectively zero.
const MAX_TEMPERATURE_RATIO: f64 = 1e12;

#[derive(Debug, Clone)]
pub struct SimulatedAnnealingSolver {
    seed: u64,
}

impl SimulatedAnnealingSolver {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn sweeps(config: &ConvergenceConfig) -> usize {
        config.max_iterations * (config.optimization_level as usize + 1)
    }

    /// Geometric ladder from `t_max` down to `t_max / ratio`.
    fn temperature_ladder(matrix: &QuboMatrix, ratio: f64, sweeps: usize) -> Vec<f64> {
        let dim = matrix.dim();
        let t_max = (0..dim)
            .map(|u| matrix.get(u, u).abs())
            .fold(0.0_f64, f64::max)
            .max(1.0);
        let ratio = ratio.clamp(1.0, MAX_TEMPERATURE_RATIO);
        let t_min = t_max / ratio;

        if sweeps <= 1 {
            return vec![t_min; sweeps];
        }
        (0..sweeps)
            .map(|s| t_max * (t_min / t_max).powf(s as f64 / (sweeps - 1) as f64))
            .collect()
    }

    fn anneal_replica(
        matrix: &QuboMatrix,
        temperatures: &[f64],
        rng: &mut StdRng,
        descend: bool,
    ) -> Vec<u8> {
        let dim = matrix.dim();
        let mut state: Vec<u8> = (0..dim).map(|_| u8::from(rng.gen_bool(0.5))).collect();
        let mut energy = matrix.energy(&state);
        let mut best_state = state.clone();
        let mut best_energy = energy;

        for &t in temperatures {
            for u in 0..dim {
                let delta = matrix.energy_delta(&state, u);
                if delta <= 0.0 || rng.gen::<f64>() < (-delta / t).exp() {
                    state[u] ^= 1;
                    energy += delta;
                    if energy < best_energy {
                        best_energy = energy;
                        best_state.copy_from_slice(&state);
                    }
                }
            }
        }

        if descend {
            greedy_descent(matrix, &mut best_state);
        }
        best_state
    }
}

impl Default for SimulatedAnnealingSolver {
    fn default() -> Self {
        Self::new(0x5EED_C0DE)
    }
}

/// Flip any bit that lowers the energy until none does.
///
/// Every accepted flip strictly lowers the energy of a finite state space,
/// so the loop ends at a single-flip local minimum.
fn greedy_descent(matrix: &QuboMatrix, state: &mut [u8]) {
    let dim = matrix.dim();
    loop {
        let mut improved = false;
        for u in 0..dim {
            if matrix.energy_delta(state, u) < 0.0 {
                state[u] ^= 1;
                improved = true;
            }
        }
        if !improved {
            break;
        }
    }
}

impl QuboSolver for SimulatedAnnealingSolver {
    fn name(&self) -> &str {
        "simulated-annealing"
    }

    fn solve(&mut self, matrix: &QuboMatrix, config: &ConvergenceConfig) -> Result<SolverOutput> {
        config.validate()?;
        if config.device != Device::Cpu {
            return Err(QuboError::SolverError(format!(
                "device '{}' is not supported by the annealing solver",
                config.device
            )));
        }

        let start = Instant::now();
        let replicas = config.max_bond_dimension;
        let sweeps = Self::sweeps(config);
        let temperatures = Self::temperature_ladder(matrix, config.transverse_field_ratio, sweeps);

        log::info!(
            "[ANNEALER] vars={} replicas={} sweeps={} precision={} expansion={}",
            matrix.dim(),
            replicas,
            sweeps,
            config.numeric_precision,
            config.enable_expansion
        );

        let mut costs = Vec::with_capacity(replicas);
        let mut solutions = Vec::with_capacity(replicas);
        for replica in 0..replicas {
            let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(replica as u64).rotate_left(17));
            let state = Self::anneal_replica(matrix, &temperatures, &mut rng, config.enable_expansion);
            costs.push(matrix.energy(&state));
            solutions.push(state);
        }

        let time_to_solution = start.elapsed().as_secs_f64();
        log::info!("[ANNEALER] Solution found in {:.4} s", time_to_solution);

        Ok(SolverOutput {
            costs,
            solutions,
            time_to_solution,
        })
    }
}
