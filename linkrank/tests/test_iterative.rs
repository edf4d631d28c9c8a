/*
 * SPDX-FileCopyrightText: 2026 The linkrank authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use linkrank::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Builds a random graph on nodes 0..n in which each arc (without loops) is
/// present with probability p.
fn random_graph(n: usize, p: f64, seed: u64) -> LinkGraph<usize> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut links = Vec::with_capacity(n);
    for x in 0..n {
        let succ: Vec<usize> = (0..n).filter(|&y| y != x && rng.random_bool(p)).collect();
        links.push((x, succ));
    }
    LinkGraph::from_links(links).unwrap()
}

/// Returns the ℓ∞ distance (maximum absolute difference) between two vectors.
fn l_inf_distance(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

/// Returns the maximum violation of the PageRank equation by `rank`.
fn residual(g: &LinkGraph<usize>, d: f64, rank: &[f64]) -> f64 {
    let n = g.num_nodes() as f64;
    let dangling: f64 = (0..g.num_nodes())
        .filter(|&q| g.is_dangling(q))
        .map(|q| rank[q])
        .sum();
    let mut expected = vec![(1.0 - d) / n + d * dangling / n; g.num_nodes()];
    for (q, succ) in g.iter() {
        for &p in succ {
            expected[p] += d * rank[q] / succ.len() as f64;
        }
    }
    l_inf_distance(&expected, rank)
}

#[test]
fn test_two_nodes() -> Result<(), RankError> {
    let g = LinkGraph::from_links([("a", vec!["b"]), ("b", vec!["a"])])?;
    let mut ir = IterativeRank::new(&g);
    ir.run(&RankConfig::default())?;
    let ranks = ir.rank_map();
    assert!((ranks[&"a"] - 0.5).abs() < 1E-12);
    assert!((ranks[&"b"] - 0.5).abs() < 1E-12);
    Ok(())
}

#[test]
fn test_single_node() -> Result<(), RankError> {
    let g = LinkGraph::from_links([("a", Vec::<&str>::new())])?;
    let mut ir = IterativeRank::new(&g);
    ir.run(&RankConfig::default())?;
    assert_eq!(ir.rank().len(), 1);
    assert!((ir.rank()[0] - 1.0).abs() < 1E-12);
    Ok(())
}

#[test]
fn test_isolated_nodes() -> Result<(), RankError> {
    for n in 1..10 {
        let g = LinkGraph::from_links((0..n).map(|x| (x, vec![])))?;
        let mut ir = IterativeRank::new(&g);
        ir.run(&RankConfig::default())?;
        for &r in ir.rank() {
            assert!((r - 1.0 / n as f64).abs() < 1E-12);
        }
    }
    Ok(())
}

/// The scenario of a small corpus: a → b, b → a, b → c, c → a.
#[test]
fn test_three_pages() -> Result<(), RankError> {
    let g = LinkGraph::from_links([("a", vec!["b"]), ("b", vec!["a", "c"]), ("c", vec!["a"])])?;
    let mut ir = IterativeRank::new(&g);
    ir.run(&RankConfig::default())?;

    assert!(ir.iterations() <= 100);
    assert!(ir.max_delta() <= 0.001);
    assert!(ir.rank().iter().all(|&r| r > 0.0));
    assert!((ir.rank().iter().sum::<f64>() - 1.0).abs() < 1E-6);

    let ranks = ir.rank_map();
    assert!(ranks[&"a"] > ranks[&"b"]);
    assert!(ranks[&"b"] > ranks[&"c"]);
    assert!((ranks[&"a"] - 0.3973).abs() < 0.002);
    assert!((ranks[&"b"] - 0.3879).abs() < 0.002);
    assert!((ranks[&"c"] - 0.2148).abs() < 0.002);
    Ok(())
}

/// The result is the round preceding the one that met the tolerance.
#[test]
fn test_previous_round_returned() -> Result<(), RankError> {
    let g = LinkGraph::from_links([("a", vec!["b"]), ("b", vec!["a", "c"]), ("c", vec!["a"])])?;
    let config = RankConfig::default();
    let mut ir = IterativeRank::new(&g);
    ir.run(&config)?;
    let iterations = ir.iterations();
    assert!(iterations >= 2);
    let ranks = ir.rank_map();
    assert!((ranks[&"a"] - 0.39754).abs() < 1E-5);
    assert!((ranks[&"b"] - 0.38717).abs() < 1E-5);
    assert!((ranks[&"c"] - 0.21529).abs() < 1E-5);

    // Stopping one round earlier exposes the same vector
    let mut truncated = IterativeRank::new(&g);
    assert!(matches!(
        truncated.run(&config.max_iter(Some(iterations - 1))),
        Err(RankError::NotConverged { .. })
    ));
    assert_eq!(truncated.rank(), ir.rank());

    // One more round from the result reproduces the last delta
    let mut next = IterativeRank::new(&g);
    next.initial(Some(ir.rank()));
    next.run(&config)?;
    assert_eq!(next.iterations(), 1);
    assert_eq!(next.max_delta(), ir.max_delta());
    assert_eq!(next.rank(), ir.rank());
    Ok(())
}

/// a → b with b dangling: the stationary distribution is 1 / (2 + d) on a.
#[test]
fn test_closed_form_dangling() -> Result<(), RankError> {
    let g = LinkGraph::from_links([("a", vec!["b"]), ("b", vec![])])?;
    for d in [0.1, 0.5, 0.85, 0.99, 1.0] {
        let mut ir = IterativeRank::new(&g);
        ir.run(&RankConfig::default().damping_factor(d).tolerance(1E-14))?;
        let ranks = ir.rank_map();
        let expected = 1.0 / (2.0 + d);
        assert!(
            (ranks[&"a"] - expected).abs() < 1E-9,
            "d={d}: {} != {expected}",
            ranks[&"a"]
        );
        assert!((ranks[&"b"] - (1.0 - expected)).abs() < 1E-9);
    }
    Ok(())
}

#[test]
fn test_sum() -> Result<(), RankError> {
    for seed in 0..10 {
        for &n in &[2, 10, 50] {
            for &p in &[0.0, 0.05, 0.2, 0.7] {
                let g = random_graph(n, p, seed);
                for &d in &[0.1, 0.5, 0.85, 0.99] {
                    let mut ir = IterativeRank::new(&g);
                    ir.run(&RankConfig::default().damping_factor(d))?;
                    let sum = ir.rank().iter().sum::<f64>();
                    assert!(
                        (sum - 1.0).abs() < 1E-6,
                        "n={n} p={p} d={d} seed={seed}: sum={sum}"
                    );
                    assert!(ir.rank().iter().all(|&r| r > 0.0));
                }
            }
        }
    }
    Ok(())
}

#[test]
fn test_fixed_point() -> Result<(), RankError> {
    for seed in 0..5 {
        let g = random_graph(30, 0.1, seed);
        for &d in &[0.5, 0.85] {
            let mut ir = IterativeRank::new(&g);
            ir.run(&RankConfig::default().damping_factor(d).tolerance(1E-13))?;
            assert!(residual(&g, d, ir.rank()) < 1E-10);
        }
    }
    Ok(())
}

#[test]
fn test_stationary_for_transition_model() -> Result<(), RankError> {
    let g = random_graph(20, 0.15, 42);
    let d = 0.85;
    let mut ir = IterativeRank::new(&g);
    ir.run(&RankConfig::default().damping_factor(d).tolerance(1E-13))?;

    // x T = x, where T is the matrix of the transition model
    let model = TransitionModel::new(&g, d)?;
    let n = g.num_nodes();
    let mut row = vec![0.0; n];
    let mut product = vec![0.0; n];
    for (q, &x) in ir.rank().iter().enumerate() {
        model.distribution_of(q, &mut row);
        for (p, &t) in row.iter().enumerate() {
            product[p] += x * t;
        }
    }
    assert!(l_inf_distance(&product, ir.rank()) < 1E-10);
    Ok(())
}

#[test]
fn test_no_inlinks() -> Result<(), RankError> {
    // Nobody links to "source"
    let g = LinkGraph::from_links([
        ("source", vec!["a"]),
        ("a", vec!["b"]),
        ("b", vec!["a"]),
    ])?;
    for d in [0.5, 0.85, 0.99] {
        let mut ir = IterativeRank::new(&g);
        ir.run(&RankConfig::default().damping_factor(d).tolerance(1E-12))?;
        let r = ir.rank_map()[&"source"];
        assert!(r > 0.0);
        // No dangling nodes, so the rank is exactly the teleportation term
        assert!((r - (1.0 - d) / 3.0).abs() < 1E-9);
    }
    Ok(())
}

#[test]
fn test_dangling_redistribution() -> Result<(), RankError> {
    let g = random_graph(25, 0.2, 7);
    let d = 0.85;
    for node in [0, 5, 24] {
        let h = g.without_links(&node)?;
        assert!(h.is_dangling(h.index_of(&node).unwrap()));

        let mut ir = IterativeRank::new(&h);
        ir.run(&RankConfig::default().damping_factor(d).tolerance(1E-13))?;
        assert!((ir.rank().iter().sum::<f64>() - 1.0).abs() < 1E-9);
        // The equation spreads dangling rank uniformly
        assert!(residual(&h, d, ir.rank()) < 1E-10);
    }
    Ok(())
}

#[test]
fn test_idempotence() -> Result<(), RankError> {
    let g = LinkGraph::from_links([("a", vec!["b"]), ("b", vec!["a", "c"]), ("c", vec!["a"])])?;
    let config = RankConfig::default();
    let mut ir = IterativeRank::new(&g);
    ir.run(&config)?;
    let converged = ir.rank().to_vec();

    let mut again = IterativeRank::new(&g);
    again.initial(Some(&converged[..]));
    again.run(&config)?;
    assert_eq!(again.iterations(), 1);
    assert!(again.max_delta() <= config.tolerance);
    // The converged round is returned unchanged
    assert_eq!(again.rank(), &converged[..]);

    for seed in 0..5 {
        let g = random_graph(40, 0.1, seed);
        let mut ir = IterativeRank::new(&g);
        ir.run(&RankConfig::default().tolerance(1E-10))?;
        let converged = ir.rank().to_vec();
        let mut again = IterativeRank::new(&g);
        again.initial(Some(&converged[..]));
        again.run(&config)?;
        assert_eq!(again.iterations(), 1);
        assert!(l_inf_distance(again.rank(), &converged) <= config.tolerance);
    }
    Ok(())
}

#[test]
fn test_not_converged() -> Result<(), RankError> {
    // Without damping, a mass concentrated on a cycle rotates forever
    let g = LinkGraph::from_links([("a", vec!["b"]), ("b", vec!["c"]), ("c", vec!["a"])])?;
    let initial = [1.0, 0.0, 0.0];
    let mut ir = IterativeRank::new(&g);
    ir.initial(Some(&initial[..]));
    let result = ir.run(&RankConfig::default().damping_factor(1.0).max_iter(Some(50)));
    assert_eq!(
        result,
        Err(RankError::NotConverged {
            iterations: 50,
            max_delta: 1.0
        })
    );
    // The last round is still available
    assert_eq!(ir.iterations(), 50);
    let mut partial = ir.rank().to_vec();
    partial.sort_by(f64::total_cmp);
    assert_eq!(partial, vec![0.0, 0.0, 1.0]);

    // With damping it converges
    ir.run(&RankConfig::default().tolerance(1E-9).max_iter(Some(1000)))?;
    for &r in ir.rank() {
        assert!((r - 1.0 / 3.0).abs() < 1E-6);
    }
    Ok(())
}

#[test]
fn test_max_iter_not_reached() -> Result<(), RankError> {
    let g = LinkGraph::from_links([("a", vec!["b"]), ("b", vec!["a", "c"]), ("c", vec!["a"])])?;
    let mut ir = IterativeRank::new(&g);
    ir.run(&RankConfig::default())?;
    let iterations = ir.iterations();

    // A budget of exactly the needed rounds is enough
    ir.run(&RankConfig::default().max_iter(Some(iterations)))?;
    assert_eq!(ir.iterations(), iterations);
    assert!(matches!(
        ir.run(&RankConfig::default().max_iter(Some(iterations - 1))),
        Err(RankError::NotConverged { .. })
    ));
    Ok(())
}

#[test]
fn test_l1_criterion() -> Result<(), RankError> {
    use dsi_progress_logger::no_logging;
    let g = random_graph(50, 0.1, 3);
    let mut ir = IterativeRank::new(&g);
    ir.run_until(
        0.85,
        preds::L1Norm::try_from(1E-9).unwrap(),
        preds::MaxIter::from(1000),
        no_logging![],
    )?;
    assert!(ir.l1_delta() <= 1E-9);
    assert!(ir.max_delta() <= ir.l1_delta());
    Ok(())
}

#[test]
fn test_invalid_config() -> Result<(), RankError> {
    let g = LinkGraph::from_links([("a", vec!["b"]), ("b", vec!["a"])])?;
    let mut ir = IterativeRank::new(&g);
    assert_eq!(
        ir.run(&RankConfig::default().damping_factor(0.0)),
        Err(RankError::Config(ConfigError::InvalidDamping(0.0)))
    );
    assert_eq!(
        ir.run(&RankConfig::default().tolerance(0.0)),
        Err(RankError::Config(ConfigError::InvalidTolerance(0.0)))
    );
    assert_eq!(ir.iterations(), 0);
    Ok(())
}
