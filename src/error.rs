use thiserror::Error;

use crate::solver::SolveStatus;

/// Result type for allocation operations
pub type Result<T> = std::result::Result<T, AllocationError>;

/// Errors raised by the allocation pipeline
#[derive(Error, Debug)]
pub enum AllocationError {
    /// Empty tract set or an all-zero normalization denominator
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// A tract record lacks a required field
    #[error("tract {tract} is missing required field {field}")]
    MissingAttribute { tract: String, field: &'static str },

    /// The quota, bound and adjacency constraints admit no assignment
    #[error("no feasible allocation exists (solver status: {0})")]
    Infeasible(SolveStatus),

    /// The solver terminated without a proven optimum
    #[error("solver terminated without a proven optimum (status: {0})")]
    NonOptimal(SolveStatus),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
