//! Shared telemetry sink.
//!
//! Keeps every recorded metric in memory and, when opened with a path,
//! appends each one as a JSON line.

use super::run_metric::{PhaseName, PhaseStats, RunMetric};
use crate::errors::*;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;

pub struct TelemetryHandle {
    run_id: String,
    metrics: Mutex<Vec<RunMetric>>,
    writer: Option<Mutex<BufWriter<File>>>,
}

impl TelemetryHandle {
    /// In-memory only.
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            metrics: Mutex::new(Vec::new()),
            writer: None,
        }
    }

    /// In-memory plus JSONL stream appended at `path`.
    pub fn with_jsonl<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Some(Mutex::new(BufWriter::new(file))),
            ..Self::new()
        })
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Record a metric. Stream failures are logged, never propagated.
    pub fn record(&self, metric: RunMetric) {
        log::debug!("{}", metric.format_terminal());

        if let Some(writer) = &self.writer {
            if let Ok(mut writer) = writer.lock() {
                let written = serde_json::to_string(&metric)
                    .map_err(QuboError::from)
                    .and_then(|line| {
                        writeln!(writer, "{}", line)?;
                        writer.flush()?;
                        Ok(())
                    });
                if let Err(err) = written {
                    log::warn!("[TELEMETRY] write failed: {}", err);
                }
            }
        }

        if let Ok(mut metrics) = self.metrics.lock() {
            metrics.push(metric);
        }
    }

    pub fn snapshot(&self) -> Vec<RunMetric> {
        self.metrics.lock().map(|m| m.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.metrics.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Totals per phase, in first-seen order.
    pub fn phase_stats(&self) -> Vec<PhaseStats> {
        let mut stats: Vec<PhaseStats> = Vec::new();
        for metric in self.snapshot() {
            match stats.iter_mut().find(|s| s.phase == metric.phase) {
                Some(entry) => {
                    entry.total_time_ms += metric.duration_ms;
                    entry.step_count += 1;
                }
                None => stats.push(PhaseStats {
                    phase: metric.phase,
                    total_time_ms: metric.duration_ms,
                    step_count: 1,
                }),
            }
        }
        stats
    }

    pub fn metrics_for(&self, phase: PhaseName) -> Vec<RunMetric> {
        self.snapshot()
            .into_iter()
            .filter(|m| m.phase == phase)
            .collect()
    }
}

impl Default for TelemetryHandle {
    fn default() -> Self {
        Self::new()
    }
}
