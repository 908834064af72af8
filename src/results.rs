//! Sweep results container, persisted as pretty JSON and resumable.

use qubo_core::{Result, SimulationOutcome};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One series of a sweep (one fixed hyperparameter value, varying `n`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesRecord {
    #[serde(default)]
    pub n_values: Vec<usize>,
    /// Color bound each entry was solved with
    #[serde(default)]
    pub color_bounds: Vec<usize>,
    /// Store instance index each entry was solved on
    #[serde(default)]
    pub instances: Vec<usize>,
    pub chromatic_numbers: Vec<usize>,
    pub costs: Vec<f64>,
    #[serde(default)]
    pub times: Vec<f64>,
    #[serde(default)]
    pub feasible: Vec<bool>,
}

impl SeriesRecord {
    pub fn push(&mut self, n: usize, c: usize, instance: usize, outcome: &SimulationOutcome) {
        self.n_values.push(n);
        self.color_bounds.push(c);
        self.instances.push(instance);
        self.chromatic_numbers.push(outcome.chromatic_number);
        self.costs.push(outcome.cost);
        self.times.push(outcome.time_to_solution);
        self.feasible.push(outcome.feasible);
    }

    /// Whether an entry for exactly `(n, c, instance)` is present.
    ///
    /// Entries without a recorded color bound or instance never match.
    pub fn contains(&self, n: usize, c: usize, instance: usize) -> bool {
        (0..self.n_values.len()).any(|i| {
            self.n_values[i] == n
                && self.color_bounds.get(i) == Some(&c)
                && self.instances.get(i) == Some(&instance)
        })
    }

    /// Whether any entry exists for `n`, whatever its color bound or instance.
    pub fn contains_n(&self, n: usize) -> bool {
        self.n_values.contains(&n)
    }

    pub fn len(&self) -> usize {
        self.chromatic_numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chromatic_numbers.is_empty()
    }
}

/// Results keyed by the swept hyperparameter value (as a string).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepResults {
    #[serde(default)]
    pub max_bond_dimension: BTreeMap<String, SeriesRecord>,
    #[serde(default)]
    pub transverse_field_ratio: BTreeMap<String, SeriesRecord>,
}

/// Key for a bond dimension series.
pub fn bond_key(max_bond_dimension: usize) -> String {
    max_bond_dimension.to_string()
}

/// Key for a field ratio series, e.g. `1e9`.
pub fn ratio_key(transverse_field_ratio: f64) -> String {
    format!("{:e}", transverse_field_ratio)
}

impl SweepResults {
    /// Read existing results, or start empty when the file does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn total_runs(&self) -> usize {
        self.max_bond_dimension
            .values()
            .chain(self.transverse_field_ratio.values())
            .map(SeriesRecord::len)
            .sum()
    }
}
