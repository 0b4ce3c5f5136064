pub mod highs;

pub use highs::HighsSolver;

use std::collections::HashMap;
use std::fmt;

use crate::error::Result;
use crate::model::AllocationModel;

/// Terminal state reported by a MIP backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    /// The wall-clock budget expired before a proven optimum
    TimeLimit,
    Undefined,
}

impl SolveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unbounded => "unbounded",
            SolveStatus::TimeLimit => "time limit reached",
            SolveStatus::Undefined => "undefined",
        }
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options forwarded to the backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolveOptions {
    /// Wall-clock budget in seconds; None blocks until the solver returns.
    pub time_budget: Option<f64>,
}

/// Raw backend answer, before any plan-level validation.
#[derive(Debug, Clone)]
pub struct Solution {
    pub status: SolveStatus,
    pub objective: f64,
    /// Solved value per variable id, rounded to the nearest integer.
    /// Empty unless the status is optimal.
    pub values: HashMap<String, i64>,
}

/// Common interface for MIP backends.
pub trait Solver {
    /// Maximize the model's objective over its constraint polyhedron.
    fn solve(&self, model: &AllocationModel, options: &SolveOptions) -> Result<Solution>;

    /// Backend name for logging
    fn name(&self) -> &str;
}
