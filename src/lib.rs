//! # storeplan
//!
//! Equity-aware supermarket placement across the census tracts of a county.
//!
//! The crate turns tract-level demand data (population, SNAP-household
//! counts, median family income) plus a tract adjacency relation into a
//! bounded integer program: an exact quota of new supermarkets, a per-tract
//! cap, a combined-count cap on every adjacent pair, and an objective that
//! rewards low-income and population coverage while penalizing tracts whose
//! income deviates from the county mean. The model is handed to a
//! general-purpose MIP backend; correctness rests on the formulation, not on
//! a bespoke search.
//!
//! ## Example
//!
//! ```no_run
//! use storeplan::{
//!     Adjacency, AllocationOptimizer, HighsSolver, OptimizationConfig, Tract,
//! };
//!
//! fn main() -> storeplan::Result<()> {
//!     let tracts = vec![
//!         Tract::new("010100", 3633, 190, Some(51_708.0)),
//!         Tract::new("010200", 1745, 331, None),
//!     ];
//!     let adjacency = Adjacency::from_edges([("010100", "010200")]);
//!     let config = OptimizationConfig {
//!         quota: 4,
//!         ..Default::default()
//!     };
//!
//!     let optimizer = AllocationOptimizer::new(HighsSolver::new());
//!     let plan = optimizer.allocate(&tracts, &adjacency, &config)?;
//!     assert_eq!(plan.total(), 4);
//!     Ok(())
//! }
//! ```

pub mod adjacency;
pub mod baseline;
pub mod demand;
pub mod error;
pub mod evaluate;
pub mod io;
pub mod model;
pub mod optimizer;
pub mod solver;
pub mod types;

pub use adjacency::Adjacency;
pub use baseline::{proportional_allocation, random_allocation};
pub use demand::DemandModel;
pub use error::{AllocationError, Result};
pub use evaluate::CoverageWeights;
pub use model::AllocationModel;
pub use optimizer::AllocationOptimizer;
pub use solver::{HighsSolver, SolveOptions, SolveStatus, Solver};
pub use types::{AllocationPlan, OptimizationConfig, Tract};
