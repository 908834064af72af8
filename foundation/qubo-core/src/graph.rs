//! Undirected simple graph used as encoder and validator input.

use crate::errors::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Immutable undirected graph.
///
/// Edges are stored normalized as `(min, max)`, sorted and without
/// duplicates, so two graphs built from the same unordered edge set compare
/// equal and encode to the same matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    num_vertices: usize,
    edges: Vec<(usize, usize)>,
}

impl Graph {
    /// Build a graph, rejecting out-of-range endpoints and self-loops.
    ///
    /// Repeated edges (in either orientation) are collapsed into one.
    pub fn new(num_vertices: usize, edges: &[(usize, usize)]) -> Result<Self> {
        if num_vertices == 0 {
            return Err(QuboError::InvalidGraph(
                "graph must have at least one vertex".to_string(),
            ));
        }

        let mut normalized = BTreeSet::new();
        for &(u, v) in edges {
            if u >= num_vertices || v >= num_vertices {
                return Err(QuboError::InvalidGraph(format!(
                    "edge ({}, {}) out of range for {} vertices",
                    u, v, num_vertices
                )));
            }
            if u == v {
                return Err(QuboError::InvalidGraph(format!("self-loop at vertex {}", u)));
            }
            normalized.insert((u.min(v), u.max(v)));
        }

        Ok(Self {
            num_vertices,
            edges: normalized.into_iter().collect(),
        })
    }

    /// Graph with no edges.
    pub fn empty(num_vertices: usize) -> Result<Self> {
        Self::new(num_vertices, &[])
    }

    /// Path `0 - 1 - ... - (n-1)`.
    pub fn path(num_vertices: usize) -> Result<Self> {
        let edges: Vec<(usize, usize)> = (1..num_vertices).map(|v| (v - 1, v)).collect();
        Self::new(num_vertices, &edges)
    }

    /// Complete graph on `n` vertices.
    pub fn complete(num_vertices: usize) -> Result<Self> {
        let mut edges = Vec::new();
        for u in 0..num_vertices {
            for v in (u + 1)..num_vertices {
                edges.push((u, v));
            }
        }
        Self::new(num_vertices, &edges)
    }

    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.edges.binary_search(&(u.min(v), u.max(v))).is_ok()
    }

    /// Neighbors of `v` in ascending order.
    pub fn neighbors(&self, v: usize) -> Vec<usize> {
        let mut out: Vec<usize> = self
            .edges
            .iter()
            .filter_map(|&(a, b)| {
                if a == v {
                    Some(b)
                } else if b == v {
                    Some(a)
                } else {
                    None
                }
            })
            .collect();
        out.sort_unstable();
        out
    }

    /// Edge density `|E| / C(n, 2)`.
    pub fn density(&self) -> f64 {
        let n = self.num_vertices as f64;
        let max_edges = n * (n - 1.0) / 2.0;
        if max_edges == 0.0 {
            0.0
        } else {
            self.edges.len() as f64 / max_edges
        }
    }
}
