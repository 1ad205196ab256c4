//! Simulated annealing with multi-run aggregation.
//!
//! Minimizes a 3-variable objective by Simulated Annealing and aggregates
//! several independent runs:
//!
//! - **Objective** ([`objective`]): pure evaluation of the function being
//!   minimized, with explicit domain errors.
//! - **Annealing engine** ([`sa`]): one search trajectory with Gaussian
//!   proposals, geometric cooling, Metropolis acceptance and a full
//!   per-step trace. Progress and log notifications are best-effort.
//! - **Multi-run orchestrator** ([`multi`]): N runs with independent
//!   seeds and starting points, one session-wide progress counter, and
//!   argmin selection of the best run.
//! - **Session** ([`session`]): runs the orchestrator on a worker thread
//!   and streams events over a channel, with cancellation between runs.
//! - **Report** ([`report`]): CSV tables and a PNG convergence chart.
//!
//! # Example
//!
//! ```
//! use u_anneal::multi::{MultiRunConfig, MultiRunner};
//! use u_anneal::objective::Variant1;
//! use u_anneal::sa::{SaConfig, Silent};
//!
//! let config = MultiRunConfig::default()
//!     .with_runs(2)
//!     .with_sa(SaConfig::default().with_max_iterations(1_000));
//! let result = MultiRunner::run(&Variant1, &config, &mut Silent).unwrap();
//! assert!(result.best().value <= result.runs[0].value);
//! ```

pub mod error;
pub mod multi;
pub mod objective;
pub mod random;
pub mod report;
pub mod sa;
pub mod session;

pub use error::{AnnealError, ConfigError, DomainError, ExportError, NotifyError};
