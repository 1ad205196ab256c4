//! Trace and outcome types.

use crate::objective::Point;

/// One attempted step of an annealing run.
///
/// Records the state *after* the accept/reject decision together with the
/// delta of the candidate that was proposed.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraceEntry {
    /// 0-based index of the step within its run.
    pub iteration: usize,
    /// Temperature of the level the step was attempted at.
    pub temperature: f64,
    /// Current state after the decision.
    pub x: Point,
    /// Objective value at `x`.
    pub value: f64,
    /// Candidate value minus the value before the step.
    pub delta: f64,
}

/// Result of a single annealing run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaOutcome {
    /// Final state.
    pub x: Point,

    /// Objective value of the final state.
    pub value: f64,

    /// One entry per attempted step, in order.
    pub trace: Vec<TraceEntry>,

    /// Number of attempted steps (`trace.len()`).
    pub iterations: usize,

    /// Temperature when the loop stopped: the current level if the cap was
    /// hit, otherwise the first level below `min_temperature`.
    pub final_temperature: f64,

    /// Accepted candidates, including improvements and ties.
    pub accepted_moves: usize,

    /// Candidates with a strictly lower value.
    pub improving_moves: usize,
}

impl SaOutcome {
    /// Fraction of attempted steps that were accepted.
    pub fn acceptance_ratio(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.accepted_moves as f64 / self.iterations as f64
        }
    }
}
