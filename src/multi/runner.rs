//! Multi-run orchestration.
//!
//! [`MultiRunner`] runs the annealing engine once per run with an
//! independent seed and starting point, then picks the best run. Progress
//! from each run is mapped onto one session-wide counter.

use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::config::MultiRunConfig;
use crate::error::{AnnealError, AnnealResult, NotifyError};
use crate::objective::{Objective, Point};
use crate::random::{create_rng, run_seed};
use crate::sa::{discard, Notifier, SaRunner, TraceEntry};

/// Result of one run inside a session.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunResult {
    /// 1-based run index.
    pub run: usize,
    /// Starting point drawn from the master generator.
    pub x0: Point,
    /// Final state.
    pub x: Point,
    /// Objective value of the final state.
    pub value: f64,
    /// Full per-step trace.
    pub trace: Vec<TraceEntry>,
}

/// All completed runs of a session plus the best one.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiRunResult {
    /// Completed runs in run order.
    pub runs: Vec<RunResult>,

    /// Index into `runs` of the run with the lowest final value.
    pub best_index: usize,

    /// Whether the session was cancelled before all runs completed.
    pub cancelled: bool,
}

impl MultiRunResult {
    /// Builds a result, or `None` if `runs` is empty.
    pub fn from_runs(runs: Vec<RunResult>, cancelled: bool) -> Option<Self> {
        let best_index = select_best(&runs)?;
        Some(Self {
            runs,
            best_index,
            cancelled,
        })
    }

    /// The run with the lowest final value (first one on ties).
    pub fn best(&self) -> &RunResult {
        &self.runs[self.best_index]
    }
}

/// Index of the run with the lowest final value; ties go to the earliest.
pub fn select_best(runs: &[RunResult]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, run) in runs.iter().enumerate() {
        match best {
            Some(b) if runs[b].value <= run.value => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Maps step `local_iter` of run `run` (1-based) onto the session counter.
///
/// ```
/// use u_anneal::multi::translate_progress;
///
/// assert_eq!(translate_progress(1, 100, 1), 1);
/// assert_eq!(translate_progress(40, 100, 3), 240);
/// ```
pub fn translate_progress(local_iter: usize, local_max: usize, run: usize) -> usize {
    run.saturating_sub(1) * local_max + local_iter
}

/// Forwards one run's notifications to the session notifier.
struct RunNotifier<'a, N: ?Sized> {
    inner: &'a mut N,
    run: usize,
    total: usize,
}

impl<N: Notifier + ?Sized> Notifier for RunNotifier<'_, N> {
    fn progress(&mut self, current: usize, local_total: usize) -> Result<(), NotifyError> {
        self.inner.progress(
            translate_progress(current, local_total, self.run),
            self.total,
        )
    }

    fn log(&mut self, message: &str) -> Result<(), NotifyError> {
        self.inner.log(&format!("[run {}] {message}", self.run))
    }
}

/// Executes a multi-run session.
pub struct MultiRunner;

impl MultiRunner {
    /// Runs every configured run in order.
    pub fn run<O, N>(
        objective: &O,
        config: &MultiRunConfig,
        notifier: &mut N,
    ) -> AnnealResult<MultiRunResult>
    where
        O: Objective + ?Sized,
        N: Notifier + ?Sized,
    {
        Self::run_with_cancel(objective, config, notifier, None)
    }

    /// Runs the session with an optional cancellation token.
    ///
    /// The flag is checked before each run, never inside one. A cancelled
    /// session returns the runs completed so far with `cancelled` set, or
    /// [`AnnealError::Cancelled`] if none completed.
    ///
    /// # Errors
    ///
    /// [`AnnealError::Config`] before any run if `config` is invalid, and
    /// [`AnnealError::Run`] if the objective fails inside a run; the session
    /// stops there.
    pub fn run_with_cancel<O, N>(
        objective: &O,
        config: &MultiRunConfig,
        notifier: &mut N,
        cancel: Option<Arc<AtomicBool>>,
    ) -> AnnealResult<MultiRunResult>
    where
        O: Objective + ?Sized,
        N: Notifier + ?Sized,
    {
        config.validate()?;

        let mut master = create_rng(config.seed);
        let total = config.total_planned_iterations();
        let mut runs = Vec::with_capacity(config.runs);
        let mut cancelled = false;

        for run in 1..=config.runs {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            let x0 = sample_start(&mut master, config.bounds);
            let mut forward = RunNotifier {
                inner: &mut *notifier,
                run,
                total,
            };
            let result = execute_run(objective, config, run, x0, &mut forward)?;
            discard(notifier.log(&format!("run {run} finished: f={:.6}", result.value)));
            runs.push(result);
        }

        let result = MultiRunResult::from_runs(runs, cancelled).ok_or(AnnealError::Cancelled)?;
        tracing::info!(
            runs = result.runs.len(),
            best_run = result.best().run,
            best_value = result.best().value,
            cancelled,
            "annealing session finished"
        );
        Ok(result)
    }

    /// Runs all runs concurrently on the rayon pool.
    ///
    /// Starting points are drawn up front in run order and every run owns
    /// its seed, so the result equals that of [`MultiRunner::run`]. No
    /// per-step notifications are produced.
    #[cfg(feature = "parallel")]
    pub fn run_parallel<O>(objective: &O, config: &MultiRunConfig) -> AnnealResult<MultiRunResult>
    where
        O: Objective + ?Sized,
    {
        use crate::sa::Silent;
        use rayon::prelude::*;

        config.validate()?;

        let mut master = create_rng(config.seed);
        let starts: Vec<Point> = (0..config.runs)
            .map(|_| sample_start(&mut master, config.bounds))
            .collect();

        let runs = starts
            .into_par_iter()
            .enumerate()
            .map(|(i, x0)| execute_run(objective, config, i + 1, x0, &mut Silent))
            .collect::<AnnealResult<Vec<_>>>()?;

        MultiRunResult::from_runs(runs, false).ok_or(AnnealError::Cancelled)
    }
}

/// Draws a starting point with three uniform draws in `[low, high)`.
fn sample_start<R: Rng>(rng: &mut R, (low, high): (f64, f64)) -> Point {
    [
        rng.random_range(low..high),
        rng.random_range(low..high),
        rng.random_range(low..high),
    ]
}

fn execute_run<O, N>(
    objective: &O,
    config: &MultiRunConfig,
    run: usize,
    x0: Point,
    notifier: &mut N,
) -> AnnealResult<RunResult>
where
    O: Objective + ?Sized,
    N: Notifier + ?Sized,
{
    let seed = run_seed(config.seed, run);
    tracing::debug!(run, seed, ?x0, "starting annealing run");

    let mut rng = create_rng(seed);
    let outcome = SaRunner::run(objective, x0, &config.sa, &mut rng, notifier).map_err(|e| {
        match e {
            AnnealError::Objective(source) => AnnealError::Run { run, source },
            other => other,
        }
    })?;

    Ok(RunResult {
        run,
        x0,
        x: outcome.x,
        value: outcome.value,
        trace: outcome.trace,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainError;
    use crate::objective::{FnObjective, Variant1};
    use crate::sa::{FnNotifier, SaConfig, Silent};

    fn quick_config(runs: usize, seed: u64) -> MultiRunConfig {
        MultiRunConfig::default()
            .with_runs(runs)
            .with_seed(seed)
            .with_sa(
                SaConfig::default()
                    .with_initial_temperature(5.0)
                    .with_min_temperature(0.01)
                    .with_alpha(0.8)
                    .with_attempts_per_temperature(40)
                    .with_max_iterations(1_000),
            )
    }

    fn run_result(run: usize, value: f64) -> RunResult {
        RunResult {
            run,
            x0: [0.0; 3],
            x: [0.0; 3],
            value,
            trace: Vec::new(),
        }
    }

    #[test]
    fn test_translate_progress() {
        assert_eq!(translate_progress(1, 500, 1), 1);
        assert_eq!(translate_progress(500, 500, 1), 500);
        assert_eq!(translate_progress(1, 500, 2), 501);
        assert_eq!(translate_progress(500, 500, 4), 2000);
    }

    #[test]
    fn test_select_best_distinct() {
        let runs = vec![run_result(1, 3.0), run_result(2, -1.0), run_result(3, 0.5)];
        assert_eq!(select_best(&runs), Some(1));
    }

    #[test]
    fn test_select_best_tie_goes_to_first() {
        let runs = vec![run_result(1, 2.0), run_result(2, 1.0), run_result(3, 1.0)];
        assert_eq!(select_best(&runs), Some(1));
    }

    #[test]
    fn test_select_best_empty() {
        assert_eq!(select_best(&[]), None);
        assert!(MultiRunResult::from_runs(Vec::new(), true).is_none());
    }

    #[test]
    fn test_multi_best_is_global_minimum() {
        let config = quick_config(5, 11);
        let result = MultiRunner::run(&Variant1, &config, &mut Silent).unwrap();

        assert_eq!(result.runs.len(), 5);
        assert!(!result.cancelled);
        let min = result
            .runs
            .iter()
            .map(|r| r.value)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(result.best().value, min);
        for (i, run) in result.runs.iter().enumerate() {
            assert_eq!(run.run, i + 1);
        }
    }

    #[test]
    fn test_multi_single_run_is_best() {
        let config = quick_config(1, 3);
        let result = MultiRunner::run(&Variant1, &config, &mut Silent).unwrap();
        assert_eq!(result.runs.len(), 1);
        assert_eq!(result.best_index, 0);
        assert_eq!(result.best(), &result.runs[0]);
    }

    #[test]
    fn test_multi_reproducible_sessions() {
        let config = quick_config(2, 2025);
        let first = MultiRunner::run(&Variant1, &config, &mut Silent).unwrap();
        let second = MultiRunner::run(&Variant1, &config, &mut Silent).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_multi_runs_use_independent_seeds() {
        let config = quick_config(3, 99);
        let result = MultiRunner::run(&Variant1, &config, &mut Silent).unwrap();

        // Run 2 replayed in isolation with seed + 2 matches the session.
        let run2 = &result.runs[1];
        let mut rng = create_rng(run_seed(99, 2));
        let alone = SaRunner::run(&Variant1, run2.x0, &config.sa, &mut rng, &mut Silent).unwrap();
        assert_eq!(alone.trace, run2.trace);
        assert_ne!(result.runs[0].x0, result.runs[1].x0);
    }

    #[test]
    fn test_multi_starts_within_bounds() {
        let config = quick_config(8, 5).with_bounds(-0.25, 0.75);
        let result = MultiRunner::run(&Variant1, &config, &mut Silent).unwrap();
        for run in &result.runs {
            assert!(run.x0.iter().all(|&v| (-0.25..0.75).contains(&v)));
            assert_eq!(run.trace[0].iteration, 0);
        }
    }

    #[test]
    fn test_multi_global_progress_monotonic() {
        let config = quick_config(3, 17);
        let mut seen = Vec::new();
        {
            let mut notifier = FnNotifier::new(
                |c, t| {
                    seen.push((c, t));
                    Ok(())
                },
                |_: &str| Ok(()),
            );
            MultiRunner::run(&Variant1, &config, &mut notifier).unwrap();
        }

        let total = config.total_planned_iterations();
        assert!(!seen.is_empty());
        assert!(seen.iter().all(|&(_, t)| t == total));
        for pair in seen.windows(2) {
            assert!(pair[0].0 <= pair[1].0, "{pair:?}");
        }
        assert_eq!(seen.last().map(|&(c, _)| c), Some(total));
    }

    #[test]
    fn test_multi_log_lines_prefixed() {
        let config = quick_config(2, 1);
        let mut lines: Vec<String> = Vec::new();
        {
            let mut notifier = FnNotifier::new(
                |_, _| Ok(()),
                |m: &str| {
                    lines.push(m.to_string());
                    Ok(())
                },
            );
            MultiRunner::run(&Variant1, &config, &mut notifier).unwrap();
        }
        assert!(lines.iter().any(|l| l.starts_with("[run 1] iteration")));
        assert!(lines.iter().any(|l| l.starts_with("[run 2] iteration")));
        assert!(lines.iter().any(|l| l.starts_with("run 2 finished: f=")));
    }

    #[test]
    fn test_multi_invalid_config_rejected() {
        let config = quick_config(2, 1).with_bounds(1.0, 0.0);
        let err = MultiRunner::run(&Variant1, &config, &mut Silent).unwrap_err();
        assert!(matches!(err, AnnealError::Config(_)));
    }

    #[test]
    fn test_multi_domain_error_aborts_session() {
        struct Cliff;
        impl Objective for Cliff {
            fn evaluate(&self, x: &Point) -> Result<f64, DomainError> {
                if x.iter().any(|v| v.abs() > 3.0) {
                    Err(DomainError::new(*x, "off the cliff"))
                } else {
                    Ok(0.0)
                }
            }
        }
        let mut config = quick_config(3, 4);
        config.sa = config.sa.clone().with_step_scale(5.0);
        let err = MultiRunner::run(&Cliff, &config, &mut Silent).unwrap_err();
        assert!(matches!(err, AnnealError::Run { run: 1, .. }), "{err:?}");
    }

    #[test]
    fn test_multi_cancel_before_start() {
        let config = quick_config(3, 4);
        let flag = Arc::new(AtomicBool::new(true));
        let err = MultiRunner::run_with_cancel(&Variant1, &config, &mut Silent, Some(flag))
            .unwrap_err();
        assert!(matches!(err, AnnealError::Cancelled));
    }

    #[test]
    fn test_multi_cancel_between_runs() {
        let config = quick_config(4, 4);
        let flag = Arc::new(AtomicBool::new(false));
        let trigger = Arc::clone(&flag);
        let mut notifier = FnNotifier::new(
            |_, _| Ok(()),
            move |m: &str| {
                if m.starts_with("run 2 finished") {
                    trigger.store(true, Ordering::Relaxed);
                }
                Ok(())
            },
        );
        let result =
            MultiRunner::run_with_cancel(&Variant1, &config, &mut notifier, Some(flag)).unwrap();
        assert!(result.cancelled);
        assert_eq!(result.runs.len(), 2);
    }

    #[test]
    fn test_multi_constant_objective_picks_first_run() {
        let flat = FnObjective::new(|_: &Point| 0.0);
        let result = MultiRunner::run(&flat, &quick_config(4, 8), &mut Silent).unwrap();
        assert_eq!(result.best().run, 1);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let config = quick_config(4, 31);
        let sequential = MultiRunner::run(&Variant1, &config, &mut Silent).unwrap();
        let parallel = MultiRunner::run_parallel(&Variant1, &config).unwrap();
        assert_eq!(sequential, parallel);
    }
}
