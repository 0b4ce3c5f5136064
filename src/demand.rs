use crate::error::{AllocationError, Result};
use crate::types::{OptimizationConfig, Tract};

/// Normalization terms derived from raw tract attributes, used to build the
/// objective coefficients.
#[derive(Debug, Clone)]
pub struct DemandModel {
    pub max_population: u32,
    pub max_snap: u32,
    /// Mean of median family income over tracts that report one
    pub mean_income: f64,
}

impl DemandModel {
    /// Pure function of the tract set. Tracts without a reported income are
    /// excluded from the mean but still participate in allocation.
    pub fn build(tracts: &[Tract]) -> Result<Self> {
        if tracts.is_empty() {
            return Err(AllocationError::DegenerateInput(
                "tract set is empty".into(),
            ));
        }
        let max_population = tracts.iter().map(|t| t.population).max().unwrap_or(0);
        if max_population == 0 {
            return Err(AllocationError::DegenerateInput(
                "every tract has zero population".into(),
            ));
        }
        let max_snap = tracts.iter().map(|t| t.snap_households).max().unwrap_or(0);
        if max_snap == 0 {
            return Err(AllocationError::DegenerateInput(
                "every tract has zero SNAP households".into(),
            ));
        }

        let incomes: Vec<f64> = tracts
            .iter()
            .filter_map(|t| t.median_family_income)
            .filter(|v| v.is_finite())
            .collect();
        // With no reported incomes every penalty coefficient is zero, so the
        // mean's value is irrelevant.
        let mean_income = if incomes.is_empty() {
            0.0
        } else {
            incomes.iter().sum::<f64>() / incomes.len() as f64
        };

        Ok(Self {
            max_population,
            max_snap,
            mean_income,
        })
    }

    /// Objective reward for placing one supermarket in `tract`.
    pub fn reward(&self, tract: &Tract, config: &OptimizationConfig) -> f64 {
        config.alpha * (tract.snap_households as f64 / self.max_snap as f64)
            + config.beta * (tract.population as f64 / self.max_population as f64)
    }

    /// Squared deviation of the tract's income from the county mean, applied
    /// once per tract that receives any supermarket. Zero when the tract has
    /// no reported income.
    pub fn income_penalty(&self, tract: &Tract) -> f64 {
        match tract.median_family_income {
            Some(income) if income.is_finite() => (income - self.mean_income).powi(2),
            _ => 0.0,
        }
    }
}
