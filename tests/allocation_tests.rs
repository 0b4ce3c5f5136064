//! End-to-end allocation runs against the real HiGHS backend.

use storeplan::{
    Adjacency, AllocationError, AllocationOptimizer, HighsSolver, OptimizationConfig, SolveOptions,
    Solver, Tract,
};

fn optimizer() -> AllocationOptimizer<HighsSolver> {
    AllocationOptimizer::new(HighsSolver::new())
}

#[test]
fn spreads_quota_across_all_tracts_when_capped_at_one() {
    let tracts = vec![
        Tract::new("1", 100, 10, None),
        Tract::new("2", 200, 20, None),
        Tract::new("3", 300, 30, None),
        Tract::new("4", 400, 40, None),
        Tract::new("5", 500, 50, None),
    ];
    let config = OptimizationConfig {
        quota: 5,
        max_per_tract: 1,
        adjacency_limit: 6,
        alpha: 1.0,
        beta: 0.0,
    };
    let plan = optimizer()
        .allocate(&tracts, &Adjacency::default(), &config)
        .unwrap();
    assert_eq!(plan.total(), 5);
    for tract in &tracts {
        assert_eq!(plan.count(&tract.geoid), 1);
    }
}

#[test]
fn respects_adjacency_cap_on_feasible_split() {
    let tracts = vec![Tract::new("1", 100, 10, None), Tract::new("2", 100, 50, None)];
    let adjacency = Adjacency::from_edges([("1", "2")]);
    let config = OptimizationConfig {
        quota: 6,
        max_per_tract: 4,
        adjacency_limit: 6,
        alpha: 0.7,
        beta: 0.3,
    };
    let plan = optimizer().allocate(&tracts, &adjacency, &config).unwrap();
    assert_eq!(plan.total(), 6);
    assert!(plan.count("1") <= 4);
    assert!(plan.count("2") <= 4);
    assert!(plan.count("1") + plan.count("2") <= 6);
}

#[test]
fn reports_infeasible_when_adjacency_cap_blocks_quota() {
    let tracts = vec![Tract::new("1", 100, 10, None), Tract::new("2", 100, 50, None)];
    let adjacency = Adjacency::from_edges([("1", "2")]);
    let config = OptimizationConfig {
        quota: 6,
        max_per_tract: 4,
        adjacency_limit: 5,
        alpha: 0.7,
        beta: 0.3,
    };
    let result = optimizer().allocate(&tracts, &adjacency, &config);
    assert!(matches!(result, Err(AllocationError::Infeasible(_))));
}

#[test]
fn enforces_one_directional_adjacency_record() {
    // The edge is recorded in one direction only; symmetric closure must
    // still produce the cap, making the quota unreachable.
    let tracts = vec![Tract::new("2", 100, 50, None), Tract::new("1", 100, 10, None)];
    let adjacency = Adjacency::from_edges([("2", "1")]);
    let config = OptimizationConfig {
        quota: 8,
        max_per_tract: 4,
        adjacency_limit: 7,
        alpha: 0.7,
        beta: 0.3,
    };
    let result = optimizer().allocate(&tracts, &adjacency, &config);
    assert!(matches!(result, Err(AllocationError::Infeasible(_))));
}

#[test]
fn reports_infeasible_when_quota_exceeds_capacity() {
    let tracts = vec![
        Tract::new("1", 100, 10, None),
        Tract::new("2", 200, 20, None),
        Tract::new("3", 300, 30, None),
    ];
    let config = OptimizationConfig {
        quota: 7,
        max_per_tract: 2,
        adjacency_limit: 6,
        alpha: 0.7,
        beta: 0.3,
    };
    let result = optimizer().allocate(&tracts, &Adjacency::default(), &config);
    assert!(matches!(result, Err(AllocationError::Infeasible(_))));
}

#[test]
fn avoids_income_outlier_tract() {
    // Equal demand everywhere; the variance penalty should leave the
    // income-outlier tract unserved when the quota forces a choice.
    let tracts = vec![
        Tract::new("mean_a", 100, 10, Some(50_000.0)),
        Tract::new("outlier", 100, 10, Some(200_000.0)),
        Tract::new("mean_b", 100, 10, Some(50_000.0)),
    ];
    let config = OptimizationConfig {
        quota: 2,
        max_per_tract: 1,
        adjacency_limit: 6,
        alpha: 0.7,
        beta: 0.3,
    };
    let plan = optimizer()
        .allocate(&tracts, &Adjacency::default(), &config)
        .unwrap();
    assert_eq!(plan.count("outlier"), 0);
    assert_eq!(plan.count("mean_a"), 1);
    assert_eq!(plan.count("mean_b"), 1);
}

#[test]
fn resolving_identical_inputs_yields_same_objective() {
    let tracts = vec![
        Tract::new("1", 120, 15, Some(40_000.0)),
        Tract::new("2", 340, 52, Some(31_000.0)),
        Tract::new("3", 560, 8, Some(72_000.0)),
        Tract::new("4", 220, 33, None),
    ];
    let adjacency = Adjacency::from_edges([("1", "2"), ("3", "4")]);
    let config = OptimizationConfig {
        quota: 9,
        max_per_tract: 4,
        adjacency_limit: 6,
        alpha: 0.7,
        beta: 0.3,
    };
    let model =
        AllocationOptimizer::<HighsSolver>::build_model(&tracts, &adjacency, &config).unwrap();

    let solver = HighsSolver::new();
    let options = SolveOptions::default();
    let first = solver.solve(&model, &options).unwrap();
    let second = solver.solve(&model, &options).unwrap();
    assert!((first.objective - second.objective).abs() < 1e-9);
}

#[test]
fn plan_respects_bounds_and_quota_on_larger_instance() {
    let tracts: Vec<Tract> = (0..31)
        .map(|i| {
            Tract::new(
                format!("{:03}", i),
                500 + i * 83,
                20 + (i * 13) % 90,
                Some(30_000.0 + (i as f64) * 2_500.0),
            )
        })
        .collect();
    // Chain adjacency over consecutive tracts.
    let edges: Vec<(String, String)> = (0..30)
        .map(|i| (format!("{:03}", i), format!("{:03}", i + 1)))
        .collect();
    let adjacency = Adjacency::from_edges(edges);
    let config = OptimizationConfig {
        quota: 40,
        max_per_tract: 4,
        adjacency_limit: 6,
        alpha: 0.7,
        beta: 0.3,
    };
    let plan = optimizer().allocate(&tracts, &adjacency, &config).unwrap();
    assert_eq!(plan.total(), 40);
    for tract in &tracts {
        assert!(plan.count(&tract.geoid) <= 4);
    }
    for i in 0..30 {
        let a = plan.count(&format!("{:03}", i));
        let b = plan.count(&format!("{:03}", i + 1));
        assert!(a + b <= 6, "adjacent pair {i} over the cap");
    }
}
