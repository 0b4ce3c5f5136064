//! Reference allocators used as comparison points for the optimizer.
//!
//! Neither performs any optimization; both uphold the plan invariant of
//! non-negative integer counts summing exactly to the quota.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use rand_distr::{Dirichlet, Distribution};

use crate::error::{AllocationError, Result};
use crate::types::{AllocationPlan, Tract};

/// Draws one symmetric Dirichlet(1) sample over the tracts, scales it by the
/// quota, rounds, then corrects the rounding drift by incrementing or
/// decrementing randomly chosen tracts (without replacement per pass) until
/// the total matches exactly. Deterministic for a fixed `seed`.
pub fn random_allocation(tracts: &[Tract], quota: u32, seed: u64) -> Result<AllocationPlan> {
    if tracts.is_empty() {
        return Err(AllocationError::DegenerateInput(
            "tract set is empty".into(),
        ));
    }
    let mut rng = StdRng::seed_from_u64(seed);

    let weights: Vec<f64> = if tracts.len() == 1 {
        vec![1.0]
    } else {
        let dirichlet = Dirichlet::new_with_size(1.0, tracts.len())
            .map_err(|e| AllocationError::DegenerateInput(e.to_string()))?;
        dirichlet.sample(&mut rng)
    };

    let mut counts: Vec<i64> = weights
        .iter()
        .map(|w| (w * quota as f64).round() as i64)
        .collect();

    let mut drift = quota as i64 - counts.iter().sum::<i64>();
    while drift > 0 {
        let batch = (drift as usize).min(counts.len());
        for i in index::sample(&mut rng, counts.len(), batch) {
            counts[i] += 1;
        }
        drift -= batch as i64;
    }
    while drift < 0 {
        // Only tracts with a positive count may lose one.
        let positive: Vec<usize> = counts
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .map(|(i, _)| i)
            .collect();
        let batch = ((-drift) as usize).min(positive.len());
        for i in index::sample(&mut rng, positive.len(), batch) {
            counts[positive[i]] -= 1;
        }
        drift += batch as i64;
    }

    Ok(to_plan(tracts, &counts))
}

/// Allocates by population share: scale each tract's share of the total
/// population by the quota, round, then correct the drift deterministically
/// by adding to the highest-share tracts or subtracting from the
/// lowest-share tracts, in share order.
pub fn proportional_allocation(tracts: &[Tract], quota: u32) -> Result<AllocationPlan> {
    if tracts.is_empty() {
        return Err(AllocationError::DegenerateInput(
            "tract set is empty".into(),
        ));
    }
    let total_population: u64 = tracts.iter().map(|t| t.population as u64).sum();
    if total_population == 0 {
        return Err(AllocationError::DegenerateInput(
            "total population is zero".into(),
        ));
    }

    let shares: Vec<f64> = tracts
        .iter()
        .map(|t| t.population as f64 / total_population as f64)
        .collect();
    let mut counts: Vec<i64> = shares
        .iter()
        .map(|s| (s * quota as f64).round() as i64)
        .collect();

    // Tract order by descending share, geoid as a deterministic tie-break.
    let mut by_share: Vec<usize> = (0..tracts.len()).collect();
    by_share.sort_by(|&a, &b| {
        shares[b]
            .partial_cmp(&shares[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| tracts[a].geoid.cmp(&tracts[b].geoid))
    });

    let mut drift = quota as i64 - counts.iter().sum::<i64>();
    while drift > 0 {
        for &i in &by_share {
            if drift == 0 {
                break;
            }
            counts[i] += 1;
            drift -= 1;
        }
    }
    while drift < 0 {
        for &i in by_share.iter().rev() {
            if drift == 0 {
                break;
            }
            if counts[i] > 0 {
                counts[i] -= 1;
                drift += 1;
            }
        }
    }

    Ok(to_plan(tracts, &counts))
}

fn to_plan(tracts: &[Tract], counts: &[i64]) -> AllocationPlan {
    let entries: BTreeMap<String, u32> = tracts
        .iter()
        .zip(counts)
        .map(|(t, &c)| (t.geoid.clone(), c.max(0) as u32))
        .collect();
    AllocationPlan::from_counts(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracts(n: usize) -> Vec<Tract> {
        (0..n)
            .map(|i| Tract::new(format!("{:03}", i), 100 + (i as u32) * 37, 10, None))
            .collect()
    }

    #[test]
    fn test_random_allocation_given_indivisible_quota_should_sum_exactly() {
        let tracts = tracts(31);
        let plan = random_allocation(&tracts, 100, 0).unwrap();
        assert_eq!(plan.total(), 100);
    }

    #[test]
    fn test_random_allocation_given_same_seed_should_be_deterministic() {
        let tracts = tracts(31);
        let first = random_allocation(&tracts, 100, 42).unwrap();
        let second = random_allocation(&tracts, 100, 42).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_random_allocation_given_different_seeds_should_differ() {
        let tracts = tracts(31);
        let first = random_allocation(&tracts, 100, 1).unwrap();
        let second = random_allocation(&tracts, 100, 2).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_random_allocation_given_small_quota_should_stay_non_negative() {
        let tracts = tracts(31);
        let plan = random_allocation(&tracts, 2, 7).unwrap();
        assert_eq!(plan.total(), 2);
        assert!(plan.iter().all(|(_, c)| c <= 2));
    }

    #[test]
    fn test_random_allocation_given_single_tract_should_assign_full_quota() {
        let tracts = tracts(1);
        let plan = random_allocation(&tracts, 5, 0).unwrap();
        assert_eq!(plan.count("000"), 5);
    }

    #[test]
    fn test_random_allocation_given_empty_tract_set_should_return_error() {
        assert!(random_allocation(&[], 10, 0).is_err());
    }

    #[test]
    fn test_proportional_allocation_given_indivisible_quota_should_sum_exactly() {
        let tracts = tracts(31);
        let plan = proportional_allocation(&tracts, 100).unwrap();
        assert_eq!(plan.total(), 100);
    }

    #[test]
    fn test_proportional_allocation_should_favor_populous_tracts() {
        let tracts = vec![
            Tract::new("100", 900, 10, None),
            Tract::new("200", 100, 10, None),
        ];
        let plan = proportional_allocation(&tracts, 10).unwrap();
        assert_eq!(plan.count("100"), 9);
        assert_eq!(plan.count("200"), 1);
    }

    #[test]
    fn test_proportional_allocation_should_be_deterministic() {
        let tracts = tracts(31);
        let first = proportional_allocation(&tracts, 97).unwrap();
        let second = proportional_allocation(&tracts, 97).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_proportional_allocation_given_zero_population_should_return_error() {
        let tracts = vec![Tract::new("100", 0, 10, None)];
        assert!(proportional_allocation(&tracts, 10).is_err());
    }
}
