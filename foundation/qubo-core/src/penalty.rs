//! Penalty weights and the policies that derive them from problem size.

use serde::{Deserialize, Serialize};

/// Strength of the three soft-constraint families.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltyWeights {
    /// `y[k] >= x[i][k]`
    pub lambda1: f64,
    /// exactly one color per node
    pub lambda2: f64,
    /// adjacent nodes differ
    pub lambda3: f64,
}

impl PenaltyWeights {
    pub fn new(lambda1: f64, lambda2: f64, lambda3: f64) -> Self {
        Self {
            lambda1,
            lambda2,
            lambda3,
        }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// `(0.5n, n, 0.5n)`
    pub fn size_scaled(num_nodes: usize) -> Self {
        let n = num_nodes as f64;
        Self::new(0.5 * n, n, 0.5 * n)
    }
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self::new(2.0, 2.0, 2.0)
    }
}

/// Maps a node count to the penalty weights used for one encoding.
pub trait PenaltyPolicy {
    fn weights(&self, num_nodes: usize) -> PenaltyWeights;
}

/// Default policy: [`PenaltyWeights::size_scaled`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SizeScaledPenalty;

impl PenaltyPolicy for SizeScaledPenalty {
    fn weights(&self, num_nodes: usize) -> PenaltyWeights {
        PenaltyWeights::size_scaled(num_nodes)
    }
}

/// Same weights regardless of size.
#[derive(Debug, Clone, Copy)]
pub struct FixedPenalty(pub PenaltyWeights);

impl PenaltyPolicy for FixedPenalty {
    fn weights(&self, _num_nodes: usize) -> PenaltyWeights {
        self.0
    }
}

impl<F> PenaltyPolicy for F
where
    F: Fn(usize) -> PenaltyWeights,
{
    fn weights(&self, num_nodes: usize) -> PenaltyWeights {
        self(num_nodes)
    }
}
