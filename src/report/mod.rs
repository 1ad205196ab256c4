//! Export of session results.
//!
//! Pure transformations of an already computed [`MultiRunResult`] into
//! flat tables (CSV) and, with the `plot` feature, a convergence chart
//! (PNG). Export borrows the result, so a failed export leaves it intact.
//!
//! # Artifacts
//!
//! - [`BEST_TRACE_FILE`]: per-step trace of the best run
//! - [`SUMMARY_FILE`]: one row per run, sorted by final value
//! - [`PARAMS_FILE`]: the session parameters
//! - [`PLOT_FILE`]: objective value vs. iteration for the best run

#[cfg(feature = "plot")]
mod plot;
mod table;

#[cfg(feature = "plot")]
pub use plot::{plot_convergence, render_convergence};
pub use table::{params_table, summary_table, trace_table, Table};

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ExportError;
use crate::multi::{MultiRunConfig, MultiRunResult};

pub const BEST_TRACE_FILE: &str = "sa_best_trace.csv";
pub const SUMMARY_FILE: &str = "sa_summary.csv";
pub const PARAMS_FILE: &str = "sa_params.csv";
pub const PLOT_FILE: &str = "sa_convergence.png";

/// Paths of the files written by [`export_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub best_trace: PathBuf,
    pub summary: PathBuf,
    pub params: PathBuf,
    /// `None` when built without the `plot` feature.
    pub plot: Option<PathBuf>,
}

/// Writes every artifact into `out_dir`, creating it if needed.
pub fn export_all(
    result: &MultiRunResult,
    config: &MultiRunConfig,
    out_dir: &Path,
) -> Result<ExportPaths, ExportError> {
    fs::create_dir_all(out_dir).map_err(|source| ExportError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let best = result.best();
    let paths = ExportPaths {
        best_trace: out_dir.join(BEST_TRACE_FILE),
        summary: out_dir.join(SUMMARY_FILE),
        params: out_dir.join(PARAMS_FILE),
        plot: cfg!(feature = "plot").then(|| out_dir.join(PLOT_FILE)),
    };

    trace_table(best).write_csv(&paths.best_trace)?;
    summary_table(result).write_csv(&paths.summary)?;
    params_table(config).write_csv(&paths.params)?;

    #[cfg(feature = "plot")]
    if let Some(ref path) = paths.plot {
        plot_convergence(&best.trace, path)?;
    }

    tracing::debug!(dir = %out_dir.display(), best_run = best.run, "results exported");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multi::MultiRunner;
    use crate::objective::Variant1;
    use crate::sa::{SaConfig, Silent};

    fn session() -> (MultiRunConfig, MultiRunResult) {
        let config = MultiRunConfig::default()
            .with_runs(3)
            .with_seed(2025)
            .with_sa(SaConfig::default().with_max_iterations(400));
        let result = MultiRunner::run(&Variant1, &config, &mut Silent).unwrap();
        (config, result)
    }

    #[test]
    fn test_export_all_writes_files() {
        let (config, result) = session();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("results");

        let paths = export_all(&result, &config, &out).unwrap();

        let trace_csv = fs::read_to_string(&paths.best_trace).unwrap();
        // header plus one line per step of the best run
        assert_eq!(trace_csv.lines().count(), 1 + result.best().trace.len());
        assert!(trace_csv.starts_with("iteration,temperature,x1,x2,x3,f,delta"));

        let summary_csv = fs::read_to_string(&paths.summary).unwrap();
        let first_row = summary_csv.lines().nth(1).unwrap();
        assert!(first_row.starts_with(&format!("{},", result.best().run)));

        assert!(paths.params.exists());
        assert_eq!(paths.plot.is_some(), cfg!(feature = "plot"));
        if let Some(plot) = &paths.plot {
            assert!(plot.exists());
        }
    }

    #[test]
    fn test_export_failure_keeps_result() {
        let (config, result) = session();
        let dir = tempfile::tempdir().unwrap();
        // a regular file where the output directory should go
        let blocker = dir.path().join("taken");
        fs::write(&blocker, b"x").unwrap();

        let err = export_all(&result, &config, &blocker).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
        assert_eq!(result.runs.len(), 3);
        assert_eq!(result.best().value, result.runs[result.best_index].value);
    }
}
