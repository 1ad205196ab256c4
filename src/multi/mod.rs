//! Multi-run orchestration.
//!
//! Runs the annealing engine several times from independent random
//! starting points and seeds, and reports the best run. Every run is
//! reproducible from the master seed alone, regardless of run order.
//!
//! # Key Types
//!
//! - [`MultiRunConfig`]: run count, seed, sampling bounds, engine parameters
//! - [`MultiRunner`]: executes a session
//! - [`MultiRunResult`]: completed runs plus the best one

mod config;
mod runner;

pub use config::MultiRunConfig;
pub use runner::{select_best, translate_progress, MultiRunResult, MultiRunner, RunResult};
