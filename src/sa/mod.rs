//! Simulated Annealing (SA).
//!
//! A single-solution trajectory metaheuristic inspired by the physical
//! annealing process. Accepts worsening moves with a probability that
//! decreases over time (temperature), allowing the search to escape
//! local optima.
//!
//! The engine works on 3-dimensional real points with Gaussian step
//! proposals and geometric cooling, and records a full per-step trace for
//! convergence analysis.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast Computing Machines"

mod config;
mod notify;
mod runner;
mod types;

pub use config::SaConfig;
pub use notify::{FnNotifier, Notifier, Silent};
pub(crate) use notify::discard;
pub use runner::SaRunner;
pub use types::{SaOutcome, TraceEntry};
