//! Flat tables built from session results.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::ExportError;
use crate::multi::{MultiRunConfig, MultiRunResult, RunResult};

/// A header row plus string cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.headers.len());
        self.rows.push(row);
    }

    /// Values of column `name`, if present.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.headers.iter().position(|h| h == name)?;
        Some(self.rows.iter().map(|r| r[idx].as_str()).collect())
    }

    /// Writes the table as CSV.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        let mut out = csv::Writer::from_writer(writer);
        out.write_record(&self.headers)?;
        for row in &self.rows {
            out.write_record(row)?;
        }
        out.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Writes the table as a CSV file, replacing any existing file.
    pub fn write_csv(&self, path: &Path) -> Result<(), ExportError> {
        let file = File::create(path).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.to_writer(file)
    }
}

/// Per-step trace of one run.
///
/// Columns: `iteration, temperature, x1, x2, x3, f, delta`.
pub fn trace_table(run: &RunResult) -> Table {
    let mut table = Table::new(["iteration", "temperature", "x1", "x2", "x3", "f", "delta"]);
    for entry in &run.trace {
        table.push_row(vec![
            entry.iteration.to_string(),
            entry.temperature.to_string(),
            entry.x[0].to_string(),
            entry.x[1].to_string(),
            entry.x[2].to_string(),
            entry.value.to_string(),
            entry.delta.to_string(),
        ]);
    }
    table
}

/// One row per run, sorted by final value ascending.
///
/// Columns: `run, x1, x2, x3, f`. The sort is stable, so equal values keep
/// run order.
pub fn summary_table(result: &MultiRunResult) -> Table {
    let mut runs: Vec<&RunResult> = result.runs.iter().collect();
    runs.sort_by(|a, b| a.value.total_cmp(&b.value));

    let mut table = Table::new(["run", "x1", "x2", "x3", "f"]);
    for run in runs {
        table.push_row(vec![
            run.run.to_string(),
            run.x[0].to_string(),
            run.x[1].to_string(),
            run.x[2].to_string(),
            run.value.to_string(),
        ]);
    }
    table
}

/// Session parameters as `parameter, value` pairs.
pub fn params_table(config: &MultiRunConfig) -> Table {
    let sa = &config.sa;
    let mut table = Table::new(["parameter", "value"]);
    let mut push = |name: &str, value: String| table.push_row(vec![name.to_string(), value]);

    push("runs", config.runs.to_string());
    push("seed", config.seed.to_string());
    push("bounds_low", config.bounds.0.to_string());
    push("bounds_high", config.bounds.1.to_string());
    push("initial_temperature", sa.initial_temperature.to_string());
    push("min_temperature", sa.min_temperature.to_string());
    push("alpha", sa.alpha.to_string());
    push("attempts_per_temperature", sa.attempts_per_temperature.to_string());
    push("step_scale", sa.step_scale.to_string());
    push("max_iterations", sa.max_iterations.to_string());
    push("progress_interval", sa.effective_progress_interval().to_string());
    push("log_interval", sa.effective_log_interval().to_string());
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sa::TraceEntry;

    fn run(run: usize, value: f64, steps: usize) -> RunResult {
        let trace = (0..steps)
            .map(|i| TraceEntry {
                iteration: i,
                temperature: 10.0 / (i + 1) as f64,
                x: [i as f64, 0.5, -0.25],
                value: value + (steps - i) as f64,
                delta: -1.0,
            })
            .collect();
        RunResult {
            run,
            x0: [0.0; 3],
            x: [run as f64, 0.0, 1.5],
            value,
            trace,
        }
    }

    fn result() -> MultiRunResult {
        MultiRunResult::from_runs(vec![run(1, 3.0, 2), run(2, 1.0, 3), run(3, 2.0, 1)], false)
            .unwrap()
    }

    #[test]
    fn test_trace_table_columns_and_rows() {
        let table = trace_table(&run(1, 0.0, 3));
        assert_eq!(
            table.headers,
            vec!["iteration", "temperature", "x1", "x2", "x3", "f", "delta"]
        );
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[1][0], "1");
        assert_eq!(table.rows[1][1], "5");
        assert_eq!(table.rows[2][3], "0.5");
    }

    #[test]
    fn test_summary_sorted_by_value() {
        let table = summary_table(&result());
        assert_eq!(table.column("run").unwrap(), vec!["2", "3", "1"]);
        assert_eq!(table.column("f").unwrap(), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_summary_ties_keep_run_order() {
        let tied = MultiRunResult::from_runs(vec![run(1, 1.0, 1), run(2, 1.0, 1)], false).unwrap();
        assert_eq!(summary_table(&tied).column("run").unwrap(), vec!["1", "2"]);
    }

    #[test]
    fn test_params_table_lists_everything() {
        let config = MultiRunConfig::default();
        let table = params_table(&config);
        let names = table.column("parameter").unwrap();
        assert!(names.contains(&"alpha"));
        assert!(names.contains(&"seed"));
        assert_eq!(table.rows.len(), 12);
        let idx = names.iter().position(|&n| n == "max_iterations").unwrap();
        assert_eq!(table.rows[idx][1], "20000");
    }

    #[test]
    fn test_csv_output() {
        let mut buf = Vec::new();
        summary_table(&result()).to_writer(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("run,x1,x2,x3,f"));
        assert_eq!(lines.next(), Some("2,2,0,1.5,1"));
    }

    #[test]
    fn test_write_csv_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("t.csv");
        let err = summary_table(&result()).write_csv(&path).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }
}
