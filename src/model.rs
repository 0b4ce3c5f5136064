use std::collections::{BTreeSet, HashMap};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::adjacency::Adjacency;
use crate::demand::DemandModel;
use crate::error::Result;
use crate::types::{OptimizationConfig, Tract};

/// Variable bounds (lower, upper)
pub type Bound = (i32, i32);

/// A decision variable with inclusive integer bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    pub id: String,
    pub bound: Bound,
}

/// Matrix dimensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shape {
    pub nrows: usize,
    pub ncols: usize,
}

/// Sparse constraint matrix in coordinate format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegerSparseMatrix {
    pub rows: Vec<i32>,
    pub cols: Vec<i32>,
    pub vals: Vec<i32>,
    pub shape: Shape,
}

/// The fully-built allocation integer program: `A x <= b` over bounded
/// integer variables, with named rows and a by-variable objective to
/// maximize.
///
/// Per tract there are two columns: `stores_<geoid>` (integer in
/// `[0, max_per_tract]`) and `open_<geoid>` (binary). Rows are, in order:
/// one linking row per tract, the two rows of the exact-quota equality,
/// then one row per canonical adjacent pair.
#[derive(Debug, Clone)]
pub struct AllocationModel {
    pub a: IntegerSparseMatrix,
    pub b: Vec<i32>,
    pub row_names: Vec<String>,
    pub variables: Vec<Variable>,
    pub objective: HashMap<String, f64>,
}

/// Column id of the integer store-count variable for a tract.
pub fn stores_var(geoid: &str) -> String {
    format!("stores_{geoid}")
}

/// Column id of the binary "tract has any supermarket" indicator.
pub fn open_var(geoid: &str) -> String {
    format!("open_{geoid}")
}

impl AllocationModel {
    /// Builds the integer program for the given tract set.
    ///
    /// The linking rows force `open = 1` whenever a tract receives at least
    /// one supermarket. The reverse direction is deliberately left slack:
    /// `open = 1` with zero stores is feasible, only non-optimal through the
    /// income penalty.
    pub fn build(
        tracts: &[Tract],
        adjacency: &Adjacency,
        demand: &DemandModel,
        config: &OptimizationConfig,
    ) -> Self {
        let n = tracts.len();
        let max_per_tract = config.max_per_tract as i32;

        let mut variables = Vec::with_capacity(2 * n);
        let mut objective = HashMap::with_capacity(2 * n);
        // Columns 0..n are store counts; n..2n are open indicators.
        for tract in tracts {
            variables.push(Variable {
                id: stores_var(&tract.geoid),
                bound: (0, max_per_tract),
            });
            objective.insert(stores_var(&tract.geoid), demand.reward(tract, config));
        }
        for tract in tracts {
            variables.push(Variable {
                id: open_var(&tract.geoid),
                bound: (0, 1),
            });
            let penalty = demand.income_penalty(tract);
            if penalty != 0.0 {
                objective.insert(open_var(&tract.geoid), -penalty);
            }
        }

        fn entry(matrix: &mut (Vec<i32>, Vec<i32>, Vec<i32>), row: usize, col: usize, val: i32) {
            matrix.0.push(row as i32);
            matrix.1.push(col as i32);
            matrix.2.push(val);
        }

        let mut coo = (Vec::new(), Vec::new(), Vec::new());
        let mut b = Vec::new();
        let mut row_names = Vec::new();

        // Linking: stores - max_per_tract * open <= 0
        for (i, tract) in tracts.iter().enumerate() {
            let row = b.len();
            entry(&mut coo, row, i, 1);
            entry(&mut coo, row, n + i, -max_per_tract);
            b.push(0);
            row_names.push(format!("link_{}", tract.geoid));
        }

        // Exact quota, as the LE pair sum <= quota and -sum <= -quota.
        let quota = config.quota as i32;
        let row = b.len();
        for i in 0..n {
            entry(&mut coo, row, i, 1);
        }
        b.push(quota);
        row_names.push("quota_ub".to_string());
        let row = b.len();
        for i in 0..n {
            entry(&mut coo, row, i, -1);
        }
        b.push(-quota);
        row_names.push("quota_lb".to_string());

        // Adjacency caps over canonical unordered pairs within the tract set.
        let index: HashMap<&str, usize> = tracts
            .iter()
            .enumerate()
            .map(|(i, t)| (t.geoid.as_str(), i))
            .collect();
        let scope: BTreeSet<&str> = tracts.iter().map(|t| t.geoid.as_str()).collect();
        for (a_id, b_id) in adjacency.pairs_within(&scope) {
            let row = b.len();
            entry(&mut coo, row, index[a_id.as_str()], 1);
            entry(&mut coo, row, index[b_id.as_str()], 1);
            b.push(config.adjacency_limit as i32);
            row_names.push(format!("adj_{a_id}_{b_id}"));
        }

        let shape = Shape {
            nrows: b.len(),
            ncols: variables.len(),
        };
        let (rows, cols, vals) = coo;
        Self {
            a: IntegerSparseMatrix {
                rows,
                cols,
                vals,
                shape,
            },
            b,
            row_names,
            variables,
            objective,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.a.shape.nrows
    }

    pub fn num_cols(&self) -> usize {
        self.a.shape.ncols
    }

    /// Number of adjacency-cap rows in the model.
    pub fn num_adjacency_rows(&self) -> usize {
        self.row_names
            .iter()
            .filter(|name| name.starts_with("adj_"))
            .count()
    }

    /// Renders the model in CPLEX LP text format for debugging and
    /// reproducibility.
    pub fn to_lp_format(&self) -> String {
        let mut out = String::new();
        out.push_str("\\ storeplan allocation model\n");
        out.push_str("Maximize\n obj:");
        let mut first = true;
        for var in &self.variables {
            let coeff = self.objective.get(&var.id).copied().unwrap_or(0.0);
            if coeff == 0.0 {
                continue;
            }
            append_term(&mut out, coeff, &var.id, first);
            first = false;
        }
        if first {
            out.push_str(" 0");
        }
        out.push('\n');

        out.push_str("Subject To\n");
        let mut row_terms: Vec<Vec<(usize, i32)>> = vec![Vec::new(); self.num_rows()];
        for i in 0..self.a.rows.len() {
            let row = self.a.rows[i] as usize;
            let col = self.a.cols[i] as usize;
            row_terms[row].push((col, self.a.vals[i]));
        }
        for (row, terms) in row_terms.iter().enumerate() {
            let _ = write!(out, " {}:", self.row_names[row]);
            let mut first = true;
            for &(col, val) in terms {
                append_term(&mut out, val as f64, &self.variables[col].id, first);
                first = false;
            }
            let _ = writeln!(out, " <= {}", self.b[row]);
        }

        out.push_str("Bounds\n");
        for var in &self.variables {
            let _ = writeln!(out, " {} <= {} <= {}", var.bound.0, var.id, var.bound.1);
        }

        out.push_str("Generals\n");
        for var in &self.variables {
            let _ = writeln!(out, " {}", var.id);
        }
        out.push_str("End\n");
        out
    }

    pub fn write_lp(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_lp_format())?;
        Ok(())
    }
}

fn append_term(out: &mut String, coeff: f64, id: &str, first: bool) {
    let sign = if coeff < 0.0 { "-" } else if first { "" } else { "+ " };
    let magnitude = coeff.abs();
    if magnitude == 1.0 {
        let _ = write!(out, " {sign}{id}");
    } else {
        let _ = write!(out, " {sign}{magnitude} {id}");
    }
}
