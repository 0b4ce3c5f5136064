//! Read-only coverage and balance metrics over an allocation plan.

use crate::types::{AllocationPlan, Tract};

/// Weights for the combined coverage metric.
#[derive(Debug, Clone, Copy)]
pub struct CoverageWeights {
    pub low_income: f64,
    pub population: f64,
    pub geographic: f64,
}

impl CoverageWeights {
    /// Three-term preset over low-income / population / geographic coverage.
    pub const THREE_TERM: Self = Self {
        low_income: 0.4,
        population: 0.4,
        geographic: 0.2,
    };

    /// Two-term preset that ignores geographic coverage.
    pub const TWO_TERM: Self = Self {
        low_income: 0.5,
        population: 0.5,
        geographic: 0.0,
    };
}

/// Percentage of tracts with at least one supermarket.
pub fn geographic_coverage(tracts: &[Tract], plan: &AllocationPlan) -> f64 {
    if tracts.is_empty() {
        return 0.0;
    }
    let served = tracts.iter().filter(|t| plan.count(&t.geoid) > 0).count();
    served as f64 / tracts.len() as f64 * 100.0
}

/// Percentage of the total population living in served tracts.
pub fn population_coverage(tracts: &[Tract], plan: &AllocationPlan) -> f64 {
    ratio_coverage(tracts, plan, |t| t.population as f64)
}

/// Percentage of SNAP households living in served tracts.
pub fn low_income_coverage(tracts: &[Tract], plan: &AllocationPlan) -> f64 {
    ratio_coverage(tracts, plan, |t| t.snap_households as f64)
}

fn ratio_coverage(tracts: &[Tract], plan: &AllocationPlan, weight: impl Fn(&Tract) -> f64) -> f64 {
    let total: f64 = tracts.iter().map(&weight).sum();
    if total == 0.0 {
        return 0.0;
    }
    let served: f64 = tracts
        .iter()
        .filter(|t| plan.count(&t.geoid) > 0)
        .map(&weight)
        .sum();
    served / total * 100.0
}

/// Weighted combination of the three coverage metrics.
pub fn combined_coverage(tracts: &[Tract], plan: &AllocationPlan, weights: CoverageWeights) -> f64 {
    weights.low_income * low_income_coverage(tracts, plan)
        + weights.population * population_coverage(tracts, plan)
        + weights.geographic * geographic_coverage(tracts, plan)
}

/// Variance of median family income across the served tracts, skipping
/// tracts without a reported income. `None` when no tract was served (or
/// none of the served tracts reports an income).
pub fn income_balance(tracts: &[Tract], plan: &AllocationPlan) -> Option<f64> {
    let incomes: Vec<f64> = tracts
        .iter()
        .filter(|t| plan.count(&t.geoid) > 0)
        .filter_map(|t| t.median_family_income)
        .filter(|v| v.is_finite())
        .collect();
    if incomes.is_empty() {
        return None;
    }
    let mean = incomes.iter().sum::<f64>() / incomes.len() as f64;
    let variance = incomes.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / incomes.len() as f64;
    Some(variance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn fixture() -> (Vec<Tract>, AllocationPlan) {
        let tracts = vec![
            Tract::new("100", 100, 10, Some(40_000.0)),
            Tract::new("200", 300, 30, Some(60_000.0)),
            Tract::new("300", 600, 60, None),
        ];
        let plan = AllocationPlan::from_counts(BTreeMap::from([
            ("100".to_string(), 1),
            ("200".to_string(), 0),
            ("300".to_string(), 2),
        ]));
        (tracts, plan)
    }

    #[test]
    fn test_geographic_coverage_given_fixture_should_count_served_tracts() {
        let (tracts, plan) = fixture();
        let coverage = geographic_coverage(&tracts, &plan);
        assert!((coverage - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_population_coverage_given_fixture_should_weight_by_population() {
        let (tracts, plan) = fixture();
        assert!((population_coverage(&tracts, &plan) - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_low_income_coverage_given_fixture_should_weight_by_snap() {
        let (tracts, plan) = fixture();
        assert!((low_income_coverage(&tracts, &plan) - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_combined_coverage_given_two_term_preset_should_ignore_geographic() {
        let (tracts, plan) = fixture();
        let combined = combined_coverage(&tracts, &plan, CoverageWeights::TWO_TERM);
        assert!((combined - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_combined_coverage_given_three_term_preset_should_include_geographic() {
        let (tracts, plan) = fixture();
        let combined = combined_coverage(&tracts, &plan, CoverageWeights::THREE_TERM);
        let expected = 0.4 * 70.0 + 0.4 * 70.0 + 0.2 * (200.0 / 3.0);
        assert!((combined - expected).abs() < 1e-9);
    }

    #[test]
    fn test_income_balance_given_empty_plan_should_return_none() {
        let (tracts, _) = fixture();
        let empty = AllocationPlan::default();
        assert_eq!(income_balance(&tracts, &empty), None);
    }

    #[test]
    fn test_income_balance_given_served_tracts_should_skip_missing_income() {
        let (tracts, plan) = fixture();
        // Only tract 100 is both served and reporting, so variance is zero.
        assert_eq!(income_balance(&tracts, &plan), Some(0.0));
    }

    #[test]
    fn test_income_balance_given_two_reporting_tracts_should_compute_variance() {
        let tracts = vec![
            Tract::new("100", 100, 10, Some(40_000.0)),
            Tract::new("200", 300, 30, Some(60_000.0)),
        ];
        let plan = AllocationPlan::from_counts(BTreeMap::from([
            ("100".to_string(), 1),
            ("200".to_string(), 1),
        ]));
        assert_eq!(income_balance(&tracts, &plan), Some(100_000_000.0));
    }
}
