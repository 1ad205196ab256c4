//! SA configuration and schedule arithmetic.

use crate::error::ConfigError;

/// Configuration for one annealing trajectory.
///
/// Cooling is geometric: after every sweep of
/// [`attempts_per_temperature`](Self::attempts_per_temperature) steps the
/// temperature is multiplied by [`alpha`](Self::alpha). The search stops
/// when the temperature is no longer above
/// [`min_temperature`](Self::min_temperature) or after
/// [`max_iterations`](Self::max_iterations) steps, whichever comes first.
///
/// # Examples
///
/// ```
/// use u_anneal::sa::SaConfig;
///
/// let config = SaConfig::default()
///     .with_initial_temperature(100.0)
///     .with_min_temperature(0.001)
///     .with_alpha(0.95)
///     .with_attempts_per_temperature(200)
///     .with_step_scale(0.5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SaConfig {
    /// Initial temperature `T0`. Higher values allow more exploration.
    pub initial_temperature: f64,

    /// Minimum temperature. The search stops once `T <= min_temperature`.
    pub min_temperature: f64,

    /// Geometric cooling factor in (0, 1). Higher = slower cooling.
    pub alpha: f64,

    /// Candidate steps attempted at each temperature level.
    pub attempts_per_temperature: usize,

    /// Standard deviation of the per-coordinate Gaussian perturbation.
    pub step_scale: f64,

    /// Hard cap on attempted steps.
    pub max_iterations: usize,

    /// Steps between progress notifications.
    /// `None` = `max(1, max_iterations / 1000)`.
    pub progress_interval: Option<usize>,

    /// Steps between log notifications.
    /// `None` = `max(1, max_iterations / 200)`.
    pub log_interval: Option<usize>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 50.0,
            min_temperature: 1e-5,
            alpha: 0.92,
            attempts_per_temperature: 300,
            step_scale: 0.25,
            max_iterations: 20_000,
            progress_interval: None,
            log_interval: None,
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_attempts_per_temperature(mut self, n: usize) -> Self {
        self.attempts_per_temperature = n;
        self
    }

    pub fn with_step_scale(mut self, scale: f64) -> Self {
        self.step_scale = scale;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_progress_interval(mut self, n: usize) -> Self {
        self.progress_interval = Some(n);
        self
    }

    pub fn with_log_interval(mut self, n: usize) -> Self {
        self.log_interval = Some(n);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("initial_temperature", self.initial_temperature)?;
        positive("min_temperature", self.min_temperature)?;
        if self.min_temperature >= self.initial_temperature {
            return Err(ConfigError::TemperatureOrder {
                initial: self.initial_temperature,
                min: self.min_temperature,
            });
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(ConfigError::Alpha(self.alpha));
        }
        if self.attempts_per_temperature == 0 {
            return Err(ConfigError::Zero {
                field: "attempts_per_temperature",
            });
        }
        positive("step_scale", self.step_scale)?;
        if self.max_iterations == 0 {
            return Err(ConfigError::Zero {
                field: "max_iterations",
            });
        }
        if self.progress_interval == Some(0) {
            return Err(ConfigError::Zero {
                field: "progress_interval",
            });
        }
        if self.log_interval == Some(0) {
            return Err(ConfigError::Zero {
                field: "log_interval",
            });
        }
        Ok(())
    }

    /// Progress interval with the default applied.
    pub fn effective_progress_interval(&self) -> usize {
        self.progress_interval
            .unwrap_or(self.max_iterations / 1000)
            .max(1)
    }

    /// Log interval with the default applied.
    pub fn effective_log_interval(&self) -> usize {
        self.log_interval.unwrap_or(self.max_iterations / 200).max(1)
    }

    /// Number of temperature levels the search will visit.
    ///
    /// Equals `ceil(ln(Tmin / T0) / ln(alpha))` capped by the iteration
    /// budget, but is computed by replaying the cooling sequence so that it
    /// agrees exactly with the runner's floating-point comparisons.
    pub fn planned_levels(&self) -> usize {
        let attempts = self.attempts_per_temperature.max(1);
        let max_levels = self.max_iterations.div_ceil(attempts);
        let mut temperature = self.initial_temperature;
        let mut levels = 0;
        while temperature > self.min_temperature && levels < max_levels {
            levels += 1;
            temperature *= self.alpha;
        }
        levels
    }

    /// Exact number of steps a run with this configuration attempts.
    ///
    /// The schedule does not depend on the random stream, so this is known
    /// before the run starts.
    pub fn planned_iterations(&self) -> usize {
        self.planned_levels()
            .saturating_mul(self.attempts_per_temperature)
            .min(self.max_iterations)
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}
