//! Sweep Configuration
//!
//! Loads and validates sweep settings from TOML.
//! Path selection: CLI argument, then `QUBO_SWEEP_CONFIG`, then built-in defaults.

use qubo_core::{ConvergenceConfig, QuboError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV_VAR: &str = "QUBO_SWEEP_CONFIG";

fn default_graph_dir() -> PathBuf { PathBuf::from("graph_instances") }
fn default_edge_probability() -> f64 { 0.5 }
fn default_instances() -> usize { 20 }
fn default_n_range() -> [usize; 2] { [4, 50] }
fn default_n_values() -> Vec<usize> { vec![8] }
fn default_bond_dimensions() -> Vec<usize> { vec![8] }
fn default_field_ratios() -> Vec<f64> { vec![1e9] }
fn default_output_path() -> PathBuf { PathBuf::from("plots/results.json") }
fn default_seed() -> u64 { 0x5EED }

/// Color bound `c` used for a graph with `n` nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum ColorBound {
    /// `ceil(n / 2) + 2`
    HalfPlusTwo,
    /// `c = n`
    NodeCount,
    Fixed { colors: usize },
}

impl ColorBound {
    pub fn resolve(&self, n: usize) -> usize {
        match self {
            ColorBound::HalfPlusTwo => (n + 1) / 2 + 2,
            ColorBound::NodeCount => n,
            ColorBound::Fixed { colors } => *colors,
        }
    }
}

impl Default for ColorBound {
    fn default() -> Self {
        ColorBound::HalfPlusTwo
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Root of the instance store
    #[serde(default = "default_graph_dir")]
    pub graph_dir: PathBuf,

    /// Erdős–Rényi edge probability
    #[serde(default = "default_edge_probability")]
    pub edge_probability: f64,

    #[serde(default = "default_instances")]
    pub instances_per_bound: usize,

    /// Inclusive node-count range for `generate`
    #[serde(default = "default_n_range")]
    pub generation_n_range: [usize; 2],

    /// Inclusive color-bound range for `generate` (default `2..=n`)
    #[serde(default)]
    pub generation_c_range: Option<[usize; 2]>,

    #[serde(default = "default_n_values")]
    pub n_values: Vec<usize>,

    #[serde(default = "default_bond_dimensions")]
    pub max_bond_dimensions: Vec<usize>,

    #[serde(default = "default_field_ratios")]
    pub transverse_field_ratios: Vec<f64>,

    /// Also sweep the field ratio at the first bond dimension
    #[serde(default)]
    pub sweep_transverse_field_ratio: bool,

    #[serde(default)]
    pub instance_index: usize,

    #[serde(default)]
    pub color_bound: ColorBound,

    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Base seed for generation and solver replicas
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Run sweep combinations on the rayon pool
    #[serde(default)]
    pub parallel: bool,

    #[serde(default)]
    pub convergence: ConvergenceConfig,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            graph_dir: default_graph_dir(),
            edge_probability: default_edge_probability(),
            instances_per_bound: default_instances(),
            generation_n_range: default_n_range(),
            generation_c_range: None,
            n_values: default_n_values(),
            max_bond_dimensions: default_bond_dimensions(),
            transverse_field_ratios: default_field_ratios(),
            sweep_transverse_field_ratio: false,
            instance_index: 0,
            color_bound: ColorBound::default(),
            output_path: default_output_path(),
            seed: default_seed(),
            parallel: false,
            convergence: ConvergenceConfig::default(),
        }
    }
}

impl SweepConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.edge_probability) {
            return Err(QuboError::ConfigError(format!(
                "edge_probability {} must be in [0, 1]",
                self.edge_probability
            )));
        }

        let [n_lo, n_hi] = self.generation_n_range;
        if n_lo == 0 || n_lo > n_hi {
            return Err(QuboError::ConfigError(format!(
                "generation_n_range [{}, {}] must be non-empty and start at >= 1",
                n_lo, n_hi
            )));
        }
        if let Some([c_lo, c_hi]) = self.generation_c_range {
            if c_lo == 0 || c_lo > c_hi {
                return Err(QuboError::ConfigError(format!(
                    "generation_c_range [{}, {}] must be non-empty and start at >= 1",
                    c_lo, c_hi
                )));
            }
        }

        if self.n_values.is_empty() || self.n_values.contains(&0) {
            return Err(QuboError::ConfigError(
                "n_values must be non-empty and positive".to_string(),
            ));
        }
        if self.max_bond_dimensions.is_empty() {
            return Err(QuboError::ConfigError(
                "max_bond_dimensions cannot be empty".to_string(),
            ));
        }
        if self.transverse_field_ratios.is_empty() {
            return Err(QuboError::ConfigError(
                "transverse_field_ratios cannot be empty".to_string(),
            ));
        }
        if let ColorBound::Fixed { colors: 0 } = self.color_bound {
            return Err(QuboError::ConfigError(
                "fixed color bound must be > 0".to_string(),
            ));
        }

        for &bond in &self.max_bond_dimensions {
            for &ratio in &self.transverse_field_ratios {
                self.convergence.with_hyperparameters(bond, ratio).validate()?;
            }
        }
        Ok(())
    }

    /// Load sweep configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            QuboError::ConfigError(format!("Failed to read sweep config from {:?}: {}", path, e))
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: SweepConfig = toml::from_str(contents)
            .map_err(|e| QuboError::ConfigError(format!("Failed to parse sweep config TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn generation_n_range(&self) -> std::ops::RangeInclusive<usize> {
        self.generation_n_range[0]..=self.generation_n_range[1]
    }

    pub fn generation_c_range(&self) -> Option<std::ops::RangeInclusive<usize>> {
        self.generation_c_range.map(|[lo, hi]| lo..=hi)
    }
}

/// Resolve the sweep configuration.
///
/// Priority:
/// 1. CLI argument (--config)
/// 2. Environment variable (QUBO_SWEEP_CONFIG)
/// 3. Built-in defaults
pub fn load_sweep_config(cli_path: Option<&Path>) -> Result<SweepConfig> {
    let env_path = std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from);
    match cli_path.map(Path::to_path_buf).or(env_path) {
        Some(path) => {
            log::info!("[CONFIG] Loading sweep config from {:?}", path);
            SweepConfig::from_file(&path)
        }
        None => {
            log::info!("[CONFIG] No sweep config given, using defaults");
            let config = SweepConfig::default();
            config.validate()?;
            Ok(config)
        }
    }
}
