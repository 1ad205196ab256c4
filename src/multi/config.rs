//! Multi-run configuration.

use crate::error::ConfigError;
use crate::sa::SaConfig;

/// Configuration for a session of independent annealing runs.
///
/// ```
/// use u_anneal::multi::MultiRunConfig;
/// use u_anneal::sa::SaConfig;
///
/// let config = MultiRunConfig::default()
///     .with_runs(4)
///     .with_seed(7)
///     .with_bounds(-2.0, 2.0)
///     .with_sa(SaConfig::default().with_max_iterations(5_000));
/// assert!(config.validate().is_ok());
/// assert_eq!(config.total_planned_iterations(), 4 * 5_000);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MultiRunConfig {
    /// Number of independent runs.
    pub runs: usize,

    /// Master seed. Run `k` uses seed `seed + k`.
    pub seed: u64,

    /// `(low, high)` range for uniform initial coordinates.
    pub bounds: (f64, f64),

    /// Engine parameters shared by every run.
    pub sa: SaConfig,
}

impl Default for MultiRunConfig {
    fn default() -> Self {
        Self {
            runs: 6,
            seed: 2025,
            bounds: (-1.5, 2.0),
            sa: SaConfig::default(),
        }
    }
}

impl MultiRunConfig {
    pub fn with_runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_bounds(mut self, low: f64, high: f64) -> Self {
        self.bounds = (low, high);
        self
    }

    pub fn with_sa(mut self, sa: SaConfig) -> Self {
        self.sa = sa;
        self
    }

    /// Validates the session and the shared engine parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.runs == 0 {
            return Err(ConfigError::Zero { field: "runs" });
        }
        let (low, high) = self.bounds;
        if !(low.is_finite() && high.is_finite() && low < high && (high - low).is_finite()) {
            return Err(ConfigError::Bounds { low, high });
        }
        self.sa.validate()
    }

    /// Steps attempted by the whole session if it is not cancelled.
    pub fn total_planned_iterations(&self) -> usize {
        self.runs.saturating_mul(self.sa.planned_iterations())
    }
}
