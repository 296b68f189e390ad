//! Benchmark reporting.
//!
//! Collects per-entry outcomes and renders them as the familiar
//! `Benchmark (param) Mode Cnt Score Error Units` table, or as JSON.

use super::benchmark::{Mode, ParamValue};
use super::stats::Statistics;
use serde::Serialize;

/// A completed benchmark entry.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    /// `Suite.method`.
    pub benchmark: String,
    /// Parameter value this entry ran with.
    pub param: Option<ParamValue>,
    /// Score mode.
    pub mode: Mode,
    /// Score statistics over all recorded iterations.
    pub stats: Statistics,
    /// Score unit, e.g. `ns/op`.
    pub unit: String,
}

/// Outcome of one benchmark entry.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The entry was measured.
    Completed(RunResult),
    /// The fixture could not be built.
    Failed {
        /// `Suite.method`.
        benchmark: String,
        /// Parameter value whose phase failed.
        param: Option<ParamValue>,
        /// Diagnostic.
        reason: String,
    },
}

impl Outcome {
    /// `Suite.method` of this entry.
    #[must_use]
    pub fn benchmark(&self) -> &str {
        match self {
            Self::Completed(result) => &result.benchmark,
            Self::Failed { benchmark, .. } => benchmark,
        }
    }

    /// Parameter value of this entry.
    #[must_use]
    pub fn param(&self) -> Option<&ParamValue> {
        match self {
            Self::Completed(result) => result.param.as_ref(),
            Self::Failed { param, .. } => param.as_ref(),
        }
    }
}

/// Accumulates outcomes and produces reports.
#[derive(Debug, Serialize)]
pub struct Report {
    /// RFC 3339 creation time.
    pub timestamp: String,
    /// Outcomes in run order.
    pub outcomes: Vec<Outcome>,
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}

impl Report {
    /// Create an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            outcomes: Vec::new(),
        }
    }

    /// Record an outcome.
    pub fn add(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }

    /// Completed entries.
    pub fn results(&self) -> impl Iterator<Item = &RunResult> {
        self.outcomes.iter().filter_map(|o| match o {
            Outcome::Completed(result) => Some(result),
            Outcome::Failed { .. } => None,
        })
    }

    /// Failed entries.
    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::Failed { .. }))
    }

    /// Whether any entry failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    /// Find the completed entry for a benchmark and parameter value.
    #[must_use]
    pub fn result(&self, benchmark: &str, param: Option<usize>) -> Option<&RunResult> {
        self.results().find(|r| {
            r.benchmark == benchmark && r.param.as_ref().map(|p| p.value) == param
        })
    }

    /// Render the results table followed by any failures.
    #[must_use]
    pub fn render_table(&self) -> String {
        let mut param_names: Vec<&str> = Vec::new();
        for outcome in &self.outcomes {
            if let Some(p) = outcome.param() {
                if !param_names.contains(&p.name.as_str()) {
                    param_names.push(&p.name);
                }
            }
        }

        let mut rows: Vec<Vec<String>> = Vec::new();
        for result in self.results() {
            let mut row = vec![result.benchmark.clone()];
            for name in &param_names {
                row.push(match &result.param {
                    Some(p) if p.name == *name => p.value.to_string(),
                    _ => String::new(),
                });
            }
            row.push(result.mode.label().to_string());
            row.push(result.stats.n.to_string());
            row.push(format!("{:.3}", result.stats.mean));
            if result.stats.error.is_nan() {
                row.push(String::new());
                row.push(String::new());
            } else {
                row.push("±".to_string());
                row.push(format!("{:.3}", result.stats.error));
            }
            row.push(result.unit.clone());
            rows.push(row);
        }

        let mut header = vec!["Benchmark".to_string()];
        header.extend(param_names.iter().map(|n| format!("({n})")));
        header.extend(
            ["Mode", "Cnt", "Score", "", "Error", "Units"]
                .iter()
                .map(|s| (*s).to_string()),
        );

        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let mut out = String::new();
        if !rows.is_empty() {
            out.push_str(&format_row(&header, &widths));
            for row in &rows {
                out.push_str(&format_row(row, &widths));
            }
        }

        let failures: Vec<&Outcome> = self.failures().collect();
        if !failures.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str("Failed benchmarks:\n");
            for failure in failures {
                if let Outcome::Failed {
                    benchmark,
                    param,
                    reason,
                } = failure
                {
                    match param {
                        Some(p) => out.push_str(&format!("  {benchmark} ({p}): {reason}\n")),
                        None => out.push_str(&format!("  {benchmark}: {reason}\n")),
                    }
                }
            }
        }

        out
    }

    /// Serialize the report to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// First column left-aligned, the rest right-aligned, two spaces between.
fn format_row(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i == 0 {
            line.push_str(&format!("{cell:<width$}"));
        } else if cell == "±" || (cell.is_empty() && *width == 1) {
            line.push_str(&format!(" {cell:>width$}"));
        } else {
            line.push_str(&format!("  {cell:>width$}"));
        }
    }
    line.truncate(line.trim_end().len());
    line.push('\n');
    line
}
