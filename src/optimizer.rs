use std::collections::BTreeMap;

use log::{debug, info};

use crate::adjacency::Adjacency;
use crate::demand::DemandModel;
use crate::error::{AllocationError, Result};
use crate::model::{stores_var, AllocationModel};
use crate::solver::{SolveOptions, SolveStatus, Solver};
use crate::types::{AllocationPlan, OptimizationConfig, Tract};

/// Builds the allocation integer program and turns a backend's answer into
/// an [`AllocationPlan`].
///
/// One-shot batch use: each call owns its model instance, nothing is shared
/// between runs.
pub struct AllocationOptimizer<S: Solver> {
    solver: S,
    options: SolveOptions,
}

impl<S: Solver> AllocationOptimizer<S> {
    pub fn new(solver: S) -> Self {
        Self {
            solver,
            options: SolveOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SolveOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the model for the given inputs without solving it.
    pub fn build_model(
        tracts: &[Tract],
        adjacency: &Adjacency,
        config: &OptimizationConfig,
    ) -> Result<AllocationModel> {
        config.validate()?;
        let demand = DemandModel::build(tracts)?;
        let model = AllocationModel::build(tracts, adjacency, &demand, config);
        info!(
            "built allocation model: {} variables, {} rows ({} adjacency caps)",
            model.num_cols(),
            model.num_rows(),
            model.num_adjacency_rows(),
        );
        Ok(model)
    }

    /// Solves a previously built model and reads the plan back out of it.
    ///
    /// A non-optimal status never yields a plan: infeasibility raises
    /// [`AllocationError::Infeasible`], everything else (time limit,
    /// unbounded, undefined) raises [`AllocationError::NonOptimal`].
    pub fn solve_model(&self, model: &AllocationModel, tracts: &[Tract]) -> Result<AllocationPlan> {
        let solution = self.solver.solve(model, &self.options)?;
        match solution.status {
            SolveStatus::Optimal => {}
            SolveStatus::Infeasible => {
                return Err(AllocationError::Infeasible(solution.status));
            }
            status => return Err(AllocationError::NonOptimal(status)),
        }
        info!(
            "{} proved optimality, objective {:.6}",
            self.solver.name(),
            solution.objective
        );

        let mut counts = BTreeMap::new();
        for tract in tracts {
            let value = solution
                .values
                .get(&stores_var(&tract.geoid))
                .copied()
                .unwrap_or(0);
            debug!("tract {}: {} supermarkets", tract.geoid, value);
            counts.insert(tract.geoid.clone(), value.max(0) as u32);
        }
        Ok(AllocationPlan::from_counts(counts))
    }

    /// Full run: build the model for the inputs, solve, return the plan.
    pub fn allocate(
        &self,
        tracts: &[Tract],
        adjacency: &Adjacency,
        config: &OptimizationConfig,
    ) -> Result<AllocationPlan> {
        let model = Self::build_model(tracts, adjacency, config)?;
        self.solve_model(&model, tracts)
    }
}
