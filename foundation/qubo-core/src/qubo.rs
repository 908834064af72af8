//! QUBO encoding of graph coloring.
//!
//! The matrix is built from four additive contributions over the variable
//! layout in [`crate::layout`]:
//!
//! 1. objective: `+1` on every `y[k]` diagonal (fewer colors is cheaper)
//! 2. consistency (`lambda1`): `+lambda1` on `x[i][k]`, `-lambda1` on the pair `(x[i][k], y[k])`
//! 3. one color per node (`lambda2`): `-lambda2` on `x[i][k]`, `+lambda2` on `(x[i][k], x[i][k'])`
//! 4. adjacency (`lambda3`): `+lambda3` on `(x[i][k], x[j][k])` for every edge `(i, j)`
//!
//! Every off-diagonal term is written to both `Q[u][v]` and `Q[v][u]`.
//! All constraints are soft; weights are never clipped or checked.

use crate::graph::Graph;
use crate::layout::VariableLayout;
use crate::penalty::PenaltyWeights;
use ndarray::Array2;
use sha2::{Digest, Sha256};

/// Symmetric QUBO matrix together with the layout it was encoded for.
#[derive(Debug, Clone, PartialEq)]
pub struct QuboMatrix {
    layout: VariableLayout,
    q: Array2<f64>,
}

impl QuboMatrix {
    pub fn layout(&self) -> VariableLayout {
        self.layout
    }

    /// Number of binary variables (matrix side length).
    pub fn dim(&self) -> usize {
        self.q.nrows()
    }

    pub fn get(&self, u: usize, v: usize) -> f64 {
        self.q[[u, v]]
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.q
    }

    /// Row-major copy, for solvers that take nested vectors.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.q.rows().into_iter().map(|row| row.to_vec()).collect()
    }

    /// Exact (bitwise) symmetry check.
    pub fn is_symmetric(&self) -> bool {
        let n = self.dim();
        for u in 0..n {
            for v in (u + 1)..n {
                if self.q[[u, v]].to_bits() != self.q[[v, u]].to_bits() {
                    return false;
                }
            }
        }
        true
    }

    /// Cost `sum_u sum_v s_u * s_v * Q[u][v]` of a binary assignment.
    pub fn energy(&self, state: &[u8]) -> f64 {
        debug_assert_eq!(state.len(), self.dim());
        let active: Vec<usize> = state
            .iter()
            .enumerate()
            .filter(|(_, &s)| s != 0)
            .map(|(u, _)| u)
            .collect();

        let mut total = 0.0;
        for &u in &active {
            for &v in &active {
                total += self.q[[u, v]];
            }
        }
        total
    }

    /// Change in [`energy`](Self::energy) caused by flipping bit `u`.
    pub fn energy_delta(&self, state: &[u8], u: usize) -> f64 {
        let mut coupling = self.q[[u, u]];
        for (v, &s) in state.iter().enumerate() {
            if v != u && s != 0 {
                coupling += self.q[[u, v]] + self.q[[v, u]];
            }
        }
        if state[u] != 0 {
            -coupling
        } else {
            coupling
        }
    }

    /// SHA-256 over the shape and the raw bits of every entry.
    ///
    /// Two encodings have the same fingerprint iff they are bit-identical.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update((self.layout.num_nodes as u64).to_le_bytes());
        hasher.update((self.layout.num_colors as u64).to_le_bytes());
        for value in self.q.iter() {
            hasher.update(value.to_bits().to_le_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

/// Encode graph coloring with at most `num_colors` colors as a QUBO matrix.
///
/// Deterministic: identical inputs yield bit-identical matrices.
pub fn encode(graph: &Graph, num_colors: usize, weights: &PenaltyWeights) -> QuboMatrix {
    let n = graph.num_vertices();
    let c = num_colors;
    let layout = VariableLayout::new(n, c);
    let dim = layout.num_variables();
    let mut q = Array2::<f64>::zeros((dim, dim));

    log::debug!(
        "[QUBO-ENCODER] n={} c={} edges={} vars={} lambda=({}, {}, {})",
        n,
        c,
        graph.num_edges(),
        dim,
        weights.lambda1,
        weights.lambda2,
        weights.lambda3
    );

    // Objective: minimize the number of colors in use
    for k in 0..c {
        let yk = layout.y_index(k);
        q[[yk, yk]] += 1.0;
    }

    // y[k] must dominate x[i][k]
    for i in 0..n {
        for k in 0..c {
            let x = layout.x_index(i, k);
            let yk = layout.y_index(k);
            q[[x, x]] += weights.lambda1;
            q[[x, yk]] -= weights.lambda1;
            q[[yk, x]] -= weights.lambda1;
        }
    }

    // Exactly one color per node
    for i in 0..n {
        for k in 0..c {
            let x = layout.x_index(i, k);
            q[[x, x]] -= weights.lambda2;
            for k_prime in (k + 1)..c {
                let x_prime = layout.x_index(i, k_prime);
                q[[x, x_prime]] += weights.lambda2;
                q[[x_prime, x]] += weights.lambda2;
            }
        }
    }

    // Adjacent nodes must not share a color
    for &(i, j) in graph.edges() {
        for k in 0..c {
            let xi = layout.x_index(i, k);
            let xj = layout.x_index(j, k);
            q[[xi, xj]] += weights.lambda3;
            q[[xj, xi]] += weights.lambda3;
        }
    }

    QuboMatrix { layout, q }
}
