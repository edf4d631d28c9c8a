/*
 * SPDX-FileCopyrightText: 2026 The linkrank authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! PageRank by sampling a random walk.

use super::RankError;
use super::config::RankConfig;
use super::transition::TransitionModel;
use crate::graphs::link_graph::LinkGraph;
use dsi_progress_logger::{ProgressLog, no_logging};
use rand::Rng;
use std::collections::HashMap;
use std::hash::Hash;

/// Estimates PageRank by following the random surfer.
///
/// The walk starts from a node chosen uniformly at random and lasts
/// [`sample_count`](RankConfig::sample_count) steps; at each step the
/// current node is counted as visited (the first step counts the starting
/// node) and the next node is drawn from the
/// [transition model](TransitionModel). The rank of a node is its number of
/// visits divided by the number of steps, so ranks sum to one by
/// construction. The estimate is unbiased, and its variance decreases as
/// the number of steps grows.
///
/// The source of randomness is passed to [`run`](Self::run): with a seeded
/// generator the walk, and thus the result, is reproducible.
///
/// # Examples
///
/// ```
/// use linkrank::graphs::link_graph::LinkGraph;
/// use linkrank::rank::config::RankConfig;
/// use linkrank::rank::sampling::SampledRank;
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
///
/// let g = LinkGraph::from_links([("a", vec!["b"]), ("b", vec!["a", "c"]), ("c", vec!["a"])])?;
///
/// let mut sr = SampledRank::new(&g);
/// sr.run(&RankConfig::default(), &mut SmallRng::seed_from_u64(0))?;
///
/// assert_eq!(sr.visits().iter().sum::<u64>(), 10_000);
/// assert!((sr.rank().iter().sum::<f64>() - 1.0).abs() < 1E-12);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct SampledRank<'a, N: Eq + Hash> {
    graph: &'a LinkGraph<N>,
    visits: Box<[u64]>,
    rank: Box<[f64]>,
    steps: usize,
}

impl<'a, N: Eq + Hash> SampledRank<'a, N> {
    /// Creates a new sampling computation on `graph`.
    pub fn new(graph: &'a LinkGraph<N>) -> Self {
        let n = graph.num_nodes();
        Self {
            graph,
            visits: vec![0; n].into_boxed_slice(),
            rank: vec![0.0; n].into_boxed_slice(),
            steps: 0,
        }
    }

    /// Returns the rank vector, indexed by node index.
    pub fn rank(&self) -> &[f64] {
        &self.rank
    }

    /// Returns the number of visits of each node during the last run.
    pub fn visits(&self) -> &[u64] {
        &self.visits
    }

    /// Returns the number of steps of the last run.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Returns the rank of each node, keyed by node identifier.
    pub fn rank_map(&self) -> HashMap<&'a N, f64> {
        super::rank_map(self.graph, &self.rank)
    }

    /// Runs the walk using the given configuration and source of randomness.
    pub fn run<R: Rng>(&mut self, config: &RankConfig, rng: &mut R) -> Result<(), RankError> {
        self.run_with_logging(config, rng, no_logging![])
    }

    /// Runs the walk using the given configuration and source of randomness,
    /// logging the progress on `pl` (one update per step).
    ///
    /// # Errors
    ///
    /// Returns [`RankError::Config`] if the configuration is invalid; in
    /// this case, the graph is not touched.
    pub fn run_with_logging<R: Rng>(
        &mut self,
        config: &RankConfig,
        rng: &mut R,
        pl: &mut impl ProgressLog,
    ) -> Result<(), RankError> {
        config.validate()?;
        let model = TransitionModel::new(self.graph, config.damping_factor)?;

        self.visits.fill(0);
        self.rank.fill(0.0);
        self.steps = 0;

        let n = self.graph.num_nodes();
        if n == 0 {
            return Ok(());
        }

        let sample_count = config.sample_count;
        log::info!("Damping factor: {}", config.damping_factor);
        log::info!("Samples: {}", sample_count);

        pl.item_name("step");
        pl.expected_updates(Some(sample_count));
        pl.start("Sampling PageRank...");

        let mut current = rng.random_range(0..n);
        for step in 0..sample_count {
            self.visits[current] += 1;
            // The last visit needs no successor
            if step + 1 < sample_count {
                current = model.next(current, rng);
            }
            pl.light_update();
        }

        pl.done();

        let total = sample_count as f64;
        for (r, &v) in self.rank.iter_mut().zip(self.visits.iter()) {
            *r = v as f64 / total;
        }
        self.steps = sample_count;

        log::info!(
            "Visited {} of {} nodes",
            self.visits.iter().filter(|&&v| v != 0).count(),
            n
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::config::ConfigError;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_single_node() -> Result<(), RankError> {
        let g = LinkGraph::from_links([("only", Vec::<&str>::new())])?;
        let mut sr = SampledRank::new(&g);
        sr.run(
            &RankConfig::default().sample_count(17),
            &mut SmallRng::seed_from_u64(0),
        )?;
        assert_eq!(sr.visits(), &[17]);
        assert_eq!(sr.rank(), &[1.0]);
        assert_eq!(sr.steps(), 17);
        Ok(())
    }

    #[test]
    fn test_one_sample() -> Result<(), RankError> {
        let g = LinkGraph::from_links([(0, vec![1]), (1, vec![0]), (2, vec![])])?;
        let mut sr = SampledRank::new(&g);
        sr.run(
            &RankConfig::default().sample_count(1),
            &mut SmallRng::seed_from_u64(1),
        )?;
        assert_eq!(sr.visits().iter().sum::<u64>(), 1);
        assert_eq!(sr.rank().iter().filter(|&&r| r == 1.0).count(), 1);
        Ok(())
    }

    #[test]
    fn test_invalid_config() -> Result<(), RankError> {
        let g = LinkGraph::from_links([(0, vec![1]), (1, vec![0])])?;
        let mut sr = SampledRank::new(&g);
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(
            sr.run(&RankConfig::default().sample_count(0), &mut rng),
            Err(RankError::Config(ConfigError::InvalidSampleCount(0)))
        );
        assert_eq!(
            sr.run(&RankConfig::default().damping_factor(2.0), &mut rng),
            Err(RankError::Config(ConfigError::InvalidDamping(2.0)))
        );
        assert_eq!(sr.steps(), 0);
        Ok(())
    }
}
