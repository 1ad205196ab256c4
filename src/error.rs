//! Error types.
//!
//! Search failures ([`AnnealError`]) and export failures ([`ExportError`])
//! are kept apart: exporting borrows an already computed result, so a
//! failed export never takes the numeric result down with it.

use std::path::PathBuf;

use thiserror::Error;

use crate::objective::Point;

/// A parameter set that must be rejected before any run starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A real-valued parameter that must be strictly positive (and finite).
    #[error("{field} must be positive, got {value}")]
    NotPositive {
        /// Parameter name.
        field: &'static str,
        /// Offending value.
        value: f64,
    },

    /// A count that must be at least one.
    #[error("{field} must be at least 1")]
    Zero {
        /// Parameter name.
        field: &'static str,
    },

    /// `min_temperature` is not below `initial_temperature`.
    #[error("min_temperature ({min}) must be less than initial_temperature ({initial})")]
    TemperatureOrder {
        /// Initial temperature.
        initial: f64,
        /// Minimum temperature.
        min: f64,
    },

    /// Cooling factor outside the open interval (0, 1).
    #[error("alpha must be in (0, 1), got {0}")]
    Alpha(f64),

    /// Sampling bounds with `low >= high` or non-finite ends.
    #[error("bounds must satisfy low < high, got ({low}, {high})")]
    Bounds {
        /// Lower bound.
        low: f64,
        /// Upper bound.
        high: f64,
    },
}

/// The objective is undefined at a point.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("objective undefined at {x:?}: {reason}")]
pub struct DomainError {
    /// The point that was evaluated.
    pub x: Point,
    /// What went wrong.
    pub reason: String,
}

impl DomainError {
    pub fn new(x: Point, reason: impl Into<String>) -> Self {
        Self {
            x,
            reason: reason.into(),
        }
    }
}

/// A progress or log sink failed to accept a notification.
///
/// Never escapes the engine: notifications are best-effort.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("notification sink failed: {0}")]
pub struct NotifyError(pub String);

impl NotifyError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Failure of an annealing run or a multi-run session.
#[derive(Debug, Error)]
pub enum AnnealError {
    /// Rejected parameters; nothing was computed.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The objective failed during a single engine invocation.
    #[error(transparent)]
    Objective(#[from] DomainError),

    /// The objective failed inside run `run` of a multi-run session.
    #[error("run {run} aborted: {source}")]
    Run {
        /// 1-based run index.
        run: usize,
        /// Underlying domain error.
        #[source]
        source: DomainError,
    },

    /// The session was cancelled before a single run completed.
    #[error("cancelled before any run completed")]
    Cancelled,

    /// The worker thread could not be started.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// The worker thread panicked.
    #[error("worker thread panicked")]
    WorkerPanicked,
}

/// Failure to produce a tabular or plot artifact.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Filesystem error.
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        /// Target path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// CSV serialization error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// PNG encoding error.
    #[cfg(feature = "plot")]
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// The bundled chart font could not be parsed.
    #[cfg(feature = "plot")]
    #[error("invalid chart font: {0}")]
    Font(#[from] ab_glyph::InvalidFont),

    /// Nothing to plot.
    #[error("trace is empty, nothing to plot")]
    EmptyTrace,
}

/// Result alias for search operations.
pub type AnnealResult<T> = Result<T, AnnealError>;
