//! Erdős–Rényi `G(n, p)` graph generation.

use qubo_core::{QuboError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct GraphGenerator {
    edge_probability: f64,
    rng: StdRng,
}

impl GraphGenerator {
    pub fn new(edge_probability: f64, seed: u64) -> Result<Self> {
        if !(0.0..=1.0).contains(&edge_probability) {
            return Err(QuboError::ConfigError(format!(
                "edge probability must be in [0, 1], got {}",
                edge_probability
            )));
        }
        Ok(Self {
            edge_probability,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn edge_probability(&self) -> f64 {
        self.edge_probability
    }

    /// Each of the `C(n, 2)` pairs is an edge independently with probability `p`.
    pub fn erdos_renyi(&mut self, n: usize) -> Vec<(usize, usize)> {
        let mut edges = Vec::new();
        for u in 0..n {
            for v in (u + 1)..n {
                if self.rng.gen_bool(self.edge_probability) {
                    edges.push((u, v));
                }
            }
        }
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extreme_probabilities() {
        let mut empty = GraphGenerator::new(0.0, 1).unwrap();
        assert!(empty.erdos_renyi(6).is_empty());

        let mut full = GraphGenerator::new(1.0, 1).unwrap();
        assert_eq!(full.erdos_renyi(6).len(), 15);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let mut a = GraphGenerator::new(0.5, 99).unwrap();
        let mut b = GraphGenerator::new(0.5, 99).unwrap();
        assert_eq!(a.erdos_renyi(12), b.erdos_renyi(12));
    }

    #[test]
    fn test_rejects_bad_probability() {
        assert!(GraphGenerator::new(1.5, 0).is_err());
        assert!(GraphGenerator::new(-0.1, 0).is_err());
    }
}
