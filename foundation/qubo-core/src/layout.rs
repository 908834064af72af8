//! Index layout of the `n*c + c` binary decision variables.
//!
//! `x[i][k]` ("node i has color k") occupies `i*c + k`; `y[k]` ("color k is
//! used") occupies `n*c + k`.

use serde::{Deserialize, Serialize};
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableLayout {
    pub num_nodes: usize,
    pub num_colors: usize,
}

impl VariableLayout {
    pub fn new(num_nodes: usize, num_colors: usize) -> Self {
        Self {
            num_nodes,
            num_colors,
        }
    }

    #[inline]
    pub fn x_index(&self, node: usize, color: usize) -> usize {
        debug_assert!(node < self.num_nodes && color < self.num_colors);
        node * self.num_colors + color
    }

    #[inline]
    pub fn y_index(&self, color: usize) -> usize {
        debug_assert!(color < self.num_colors);
        self.num_nodes * self.num_colors + color
    }

    /// Total variable count `n*c + c`.
    #[inline]
    pub fn num_variables(&self) -> usize {
        self.num_nodes * self.num_colors + self.num_colors
    }

    pub fn x_range(&self) -> Range<usize> {
        0..self.num_nodes * self.num_colors
    }

    pub fn y_range(&self) -> Range<usize> {
        self.num_nodes * self.num_colors..self.num_variables()
    }

    pub fn x_segment<'a, T>(&self, values: &'a [T]) -> &'a [T] {
        &values[self.x_range()]
    }

    pub fn y_segment<'a, T>(&self, values: &'a [T]) -> &'a [T] {
        &values[self.y_range()]
    }
}
