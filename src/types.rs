use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{AllocationError, Result};

/// A census tract, the unit of allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tract {
    /// Stable tract identifier (GEOID without the state-FIPS prefix)
    pub geoid: String,
    pub population: u32,
    /// Number of households receiving SNAP benefits
    pub snap_households: u32,
    /// None for tracts with no reported income
    pub median_family_income: Option<f64>,
}

impl Tract {
    pub fn new(
        geoid: impl Into<String>,
        population: u32,
        snap_households: u32,
        median_family_income: Option<f64>,
    ) -> Self {
        Self {
            geoid: geoid.into(),
            population,
            snap_households,
            median_family_income,
        }
    }
}

/// Per-tract supermarket counts, the terminal output of a solve.
///
/// Counts are non-negative and sum exactly to the configured quota.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocationPlan {
    counts: BTreeMap<String, u32>,
}

impl AllocationPlan {
    pub fn from_counts(counts: BTreeMap<String, u32>) -> Self {
        Self { counts }
    }

    /// Assigned count for a tract; zero for tracts outside the plan.
    pub fn count(&self, geoid: &str) -> u32 {
        self.counts.get(geoid).copied().unwrap_or(0)
    }

    /// Total number of supermarkets assigned across all tracts.
    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    /// Number of tracts that received at least one supermarket.
    pub fn tracts_served(&self) -> usize {
        self.counts.values().filter(|&&c| c > 0).count()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates entries in ascending geoid order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, u32)> {
        self.counts.iter().map(|(k, &v)| (k, v))
    }
}

/// Parameters for one optimization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationConfig {
    /// Total supermarkets to place across all tracts
    pub quota: u32,
    /// Per-tract cap on assigned supermarkets
    pub max_per_tract: u32,
    /// Maximum combined count across any adjacent tract pair
    pub adjacency_limit: u32,
    /// Weight of the low-income-household coverage term
    pub alpha: f64,
    /// Weight of the population coverage term
    pub beta: f64,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            quota: 100,
            max_per_tract: 4,
            adjacency_limit: 6,
            alpha: 0.7,
            beta: 0.3,
        }
    }
}

impl OptimizationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.quota == 0 {
            return Err(AllocationError::DegenerateInput(
                "quota must be positive".into(),
            ));
        }
        if self.max_per_tract == 0 {
            return Err(AllocationError::DegenerateInput(
                "max_per_tract must be positive".into(),
            ));
        }
        if self.adjacency_limit == 0 {
            return Err(AllocationError::DegenerateInput(
                "adjacency_limit must be positive".into(),
            ));
        }
        if self.alpha < 0.0 || self.beta < 0.0 {
            return Err(AllocationError::DegenerateInput(
                "objective weights must be non-negative".into(),
            ));
        }
        Ok(())
    }
}
