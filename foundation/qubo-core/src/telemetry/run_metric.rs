//! Runtime Telemetry Metrics
//!
//! Captures per-phase timing and outcome data for each simulation run.
//! Metrics are streamed to JSONL for post-run analysis.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Simulation phase identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseName {
    Encode,
    Solve,
    Select,
    Validate,
}

impl fmt::Display for PhaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseName::Encode => write!(f, "ENCODE"),
            PhaseName::Solve => write!(f, "SOLVE"),
            PhaseName::Select => write!(f, "SELECT"),
            PhaseName::Validate => write!(f, "VALID"),
        }
    }
}

/// Single telemetry metric for a phase step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetric {
    /// ISO8601 timestamp
    pub timestamp: String,

    /// Run this metric belongs to
    pub run_id: String,

    pub phase: PhaseName,

    /// Step description (e.g., "qubo_matrix", "min_cost_candidate")
    pub step: String,

    /// Chromatic number known at this step (0 before validation)
    pub chromatic_number: usize,

    /// Constraint violations known at this step
    pub violations: usize,

    /// Step duration in milliseconds
    pub duration_ms: f64,

    /// Phase-specific parameters (JSON object)
    pub parameters: serde_json::Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl RunMetric {
    /// Create new metric with current timestamp
    pub fn new(
        run_id: impl Into<String>,
        phase: PhaseName,
        step: impl Into<String>,
        chromatic_number: usize,
        violations: usize,
        duration_ms: f64,
    ) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            run_id: run_id.into(),
            phase,
            step: step.into(),
            chromatic_number,
            violations,
            duration_ms,
            parameters: serde_json::Value::Null,
            notes: None,
        }
    }

    pub fn with_parameters(mut self, params: serde_json::Value) -> Self {
        self.parameters = params;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Format for terminal display
    pub fn format_terminal(&self) -> String {
        format!(
            "[{}] {} | colors={} violations={} | {:.2}ms",
            self.phase, self.step, self.chromatic_number, self.violations, self.duration_ms
        )
    }
}

/// Aggregate of the metrics recorded for one phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseStats {
    pub phase: PhaseName,
    pub total_time_ms: f64,
    pub step_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_serialization() {
        let metric = RunMetric::new("run-1", PhaseName::Solve, "tn_solve", 0, 0, 12.5)
            .with_parameters(serde_json::json!({"max_bond_dimension": 8}))
            .with_notes("8 candidates");

        let json = serde_json::to_string(&metric).expect("Failed to serialize");
        assert!(json.contains("\"phase\":\"solve\""));
        let back: RunMetric = serde_json::from_str(&json).expect("Failed to deserialize");
        assert_eq!(back.phase, PhaseName::Solve);
        assert_eq!(back.notes.as_deref(), Some("8 candidates"));
    }

    #[test]
    fn test_format_terminal() {
        let metric = RunMetric::new("r", PhaseName::Validate, "strict=false", 3, 1, 0.25);
        assert_eq!(
            metric.format_terminal(),
            "[VALID] strict=false | colors=3 violations=1 | 0.25ms"
        );
    }
}
