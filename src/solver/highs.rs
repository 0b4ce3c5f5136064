use std::collections::HashMap;

use ::highs::{ColProblem, HighsModelStatus, Sense};
use log::debug;

use super::{Solution, SolveOptions, SolveStatus, Solver};
use crate::error::Result;
use crate::model::AllocationModel;

/// HiGHS solver implementation
pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        HighsSolver
    }

    fn convert_status(model_status: HighsModelStatus) -> SolveStatus {
        match model_status {
            HighsModelStatus::Optimal => SolveStatus::Optimal,
            HighsModelStatus::Infeasible => SolveStatus::Infeasible,
            HighsModelStatus::UnboundedOrInfeasible => SolveStatus::Unbounded,
            HighsModelStatus::Unbounded => SolveStatus::Unbounded,
            HighsModelStatus::ReachedTimeLimit => SolveStatus::TimeLimit,
            _ => SolveStatus::Undefined,
        }
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver for HighsSolver {
    fn solve(&self, model: &AllocationModel, options: &SolveOptions) -> Result<Solution> {
        let mut problem = ColProblem::new();

        // Constraint rows first, so columns can reference them.
        let n_rows = model.a.shape.nrows;
        let mut rows = Vec::with_capacity(n_rows);
        for row_idx in 0..n_rows {
            let rhs = model.b.get(row_idx).copied().unwrap_or(0) as f64;
            rows.push(problem.add_row(..=rhs));
        }

        // Regroup the coordinate-format matrix by column.
        let n_cols = model.a.shape.ncols;
        let mut col_data: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n_cols];
        for i in 0..model.a.rows.len() {
            let row = model.a.rows[i] as usize;
            let col = model.a.cols[i] as usize;
            let val = model.a.vals[i] as f64;
            if col < n_cols && row < n_rows {
                col_data[col].push((row, val));
            }
        }

        for (col_idx, var) in model.variables.iter().enumerate() {
            let obj_coeff = model.objective.get(&var.id).copied().unwrap_or(0.0);
            let (lower, upper) = var.bound;
            let row_factors: Vec<_> = col_data[col_idx]
                .iter()
                .map(|(row_idx, val)| (rows[*row_idx], *val))
                .collect();
            problem.add_integer_column(obj_coeff, lower as f64..=upper as f64, &row_factors);
        }

        let mut highs_model = problem.optimise(Sense::Maximise);
        highs_model.set_option("presolve", "off");
        if let Some(budget) = options.time_budget {
            highs_model.set_option("time_limit", budget);
        }
        let solved = highs_model.solve();

        let status = Self::convert_status(solved.status());
        debug!("HiGHS finished with status {status}");

        let (objective, values) = if status == SolveStatus::Optimal {
            let solution_values = solved.get_solution();
            let columns = solution_values.columns();
            let mut values = HashMap::with_capacity(model.variables.len());
            for (col_idx, var) in model.variables.iter().enumerate() {
                let value = columns.get(col_idx).copied().unwrap_or(0.0);
                // Integer variables can come back as e.g. 3.9999999996.
                values.insert(var.id.clone(), value.round() as i64);
            }
            // Sum in the fixed variable order so the objective is
            // bit-for-bit reproducible across solves.
            let objective: f64 = model
                .variables
                .iter()
                .filter_map(|var| {
                    let val = values.get(&var.id)?;
                    model.objective.get(&var.id).map(|c| c * *val as f64)
                })
                .sum();
            (objective, values)
        } else {
            (0.0, HashMap::new())
        };

        Ok(Solution {
            status,
            objective,
            values,
        })
    }

    fn name(&self) -> &str {
        "HiGHS"
    }
}
