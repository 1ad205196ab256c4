//! SA execution loop.

use rand::Rng;
use rand_distr::StandardNormal;

use super::config::SaConfig;
use super::notify::{discard, Notifier};
use super::types::{SaOutcome, TraceEntry};
use crate::error::AnnealResult;
use crate::objective::{Objective, Point};

/// Executes one Simulated Annealing trajectory.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA from `x0`, drawing all randomness from `rng`.
    ///
    /// Each step perturbs every coordinate by independent `N(0, step_scale)`
    /// noise and applies the Metropolis criterion. The trace holds one
    /// entry per attempted step.
    ///
    /// Progress is reported as `(step, planned)` where `planned` is
    /// [`SaConfig::planned_iterations`]: at step 1, at every multiple of the
    /// progress interval, and at the final step. Notifier failures are
    /// ignored.
    ///
    /// # Errors
    ///
    /// [`AnnealError::Config`](crate::error::AnnealError::Config) before
    /// anything is evaluated if `config` is invalid, and
    /// [`AnnealError::Objective`](crate::error::AnnealError::Objective) as
    /// soon as the objective is undefined at the start point or a candidate.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_anneal::objective::Variant1;
    /// use u_anneal::random::create_rng;
    /// use u_anneal::sa::{SaConfig, SaRunner, Silent};
    ///
    /// let config = SaConfig::default().with_max_iterations(2_000);
    /// let mut rng = create_rng(42);
    /// let outcome = SaRunner::run(&Variant1, [0.0; 3], &config, &mut rng, &mut Silent).unwrap();
    /// assert_eq!(outcome.trace.len(), outcome.iterations);
    /// ```
    pub fn run<O, R, N>(
        objective: &O,
        x0: Point,
        config: &SaConfig,
        rng: &mut R,
        notifier: &mut N,
    ) -> AnnealResult<SaOutcome>
    where
        O: Objective + ?Sized,
        R: Rng,
        N: Notifier + ?Sized,
    {
        config.validate()?;

        let planned = config.planned_iterations();
        let progress_interval = config.effective_progress_interval();
        let log_interval = config.effective_log_interval();

        let mut current = x0;
        let mut current_value = objective.evaluate(&current)?;

        let mut temperature = config.initial_temperature;
        let mut iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut trace = Vec::with_capacity(planned);

        'cooling: while temperature > config.min_temperature && iterations < config.max_iterations
        {
            for _ in 0..config.attempts_per_temperature {
                let candidate = perturb(&current, config.step_scale, rng);
                let candidate_value = objective.evaluate(&candidate)?;
                let delta = candidate_value - current_value;

                // Metropolis acceptance criterion
                let accept = if delta <= 0.0 {
                    if delta < 0.0 {
                        improving_moves += 1;
                    }
                    true
                } else {
                    rng.random::<f64>() < (-delta / temperature).exp()
                };

                if accept {
                    current = candidate;
                    current_value = candidate_value;
                    accepted_moves += 1;
                }

                trace.push(TraceEntry {
                    iteration: iterations,
                    temperature,
                    x: current,
                    value: current_value,
                    delta,
                });
                iterations += 1;

                if iterations == 1
                    || iterations == planned
                    || iterations.is_multiple_of(progress_interval)
                {
                    discard(notifier.progress(iterations, planned));
                }
                if iterations.is_multiple_of(log_interval) {
                    discard(notifier.log(&format!(
                        "iteration {iterations}, T={temperature:.6}, f={current_value:.6}"
                    )));
                }

                if iterations >= config.max_iterations {
                    break 'cooling;
                }
            }

            temperature *= config.alpha;
        }

        tracing::debug!(
            iterations,
            accepted_moves,
            value = current_value,
            "annealing run finished"
        );

        Ok(SaOutcome {
            x: current,
            value: current_value,
            trace,
            iterations,
            final_temperature: temperature,
            accepted_moves,
            improving_moves,
        })
    }
}

/// Adds independent `N(0, scale)` noise to every coordinate.
fn perturb<R: Rng>(x: &Point, scale: f64, rng: &mut R) -> Point {
    let mut out = *x;
    for v in out.iter_mut() {
        let z: f64 = rng.sample(StandardNormal);
        *v += scale * z;
    }
    out
}
