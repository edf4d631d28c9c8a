/*
 * SPDX-FileCopyrightText: 2026 The linkrank authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! PageRank by synchronous fixed-point iteration.
//!
//! If we denote with *P* the row-normalized adjacency matrix of the graph
//! (with zero rows for dangling nodes), with **d** the characteristic vector
//! of dangling nodes, with *n* the number of nodes, and with α the damping
//! factor, PageRank is the unique stochastic solution of
//!
//! > **x** = **x** ( α *P*  +  α **d**ᵀ **1** / *n*  +  (1 − α) **1**ᵀ **1** / *n* ),
//!
//! that is, dangling nodes distribute their rank uniformly over all nodes
//! (the _weakly preferential_ formulation with a uniform preference
//! vector). Node by node, the right-hand side reads
//!
//! > *xₚ*′ = (1 − α) / *n*  +  α ∑_(*q* → *p*) *x_q* / *d*⁺(*q*)  +  α ∑_(*q* dangling) *x_q* / *n*,
//!
//! where *d*⁺(*q*) is the outdegree of *q*.
//!
//! # The Jacobi method
//!
//! [`IterativeRank`] starts from the uniform distribution (or from a
//! [user-provided one](IterativeRank::initial)) and applies the update
//! above to _all_ nodes using only the values of the previous round; the
//! new round replaces the old one as a whole. The rank of dangling nodes is
//! summed once per round, so each round costs time linear in the size of
//! the graph. Since the update preserves the sum of the vector, the result
//! is stochastic up to rounding; all sums are compensated.
//!
//! # Stopping criteria
//!
//! After each round, the [`run_until`](IterativeRank::run_until) method
//! evaluates two [predicates](Predicate) on a [`PredParams`](preds::PredParams)
//! structure containing the number of rounds and the ℓ∞ and ℓ₁ norms of the
//! difference between the last two rounds. If the first predicate holds the
//! computation has converged, and the result is the round _preceding_ the
//! one just computed (the two differ by the reported deltas). Otherwise the
//! new round is adopted, and if the second predicate holds the iteration
//! budget is exhausted and the computation fails with
//! [`RankError::NotConverged`], leaving the last round available through
//! [`rank`](IterativeRank::rank).
//!
//! The [`run`](IterativeRank::run) method uses [`MaxDelta`](preds::MaxDelta)
//! with the [tolerance](RankConfig::tolerance) of the configuration as
//! convergence criterion, and [`MaxIter`](preds::MaxIter) with its
//! [bound](RankConfig::max_iter), if any, as budget.

pub mod preds {
    //! Predicates implementing stopping conditions.
    //!
    //! The implementation of [`IterativeRank`](super::IterativeRank) uses a
    //! [predicate](Predicate) to decide convergence and another one to
    //! bound the number of iterations. This module provides a few such
    //! predicates: they evaluate to true if the computation should be
    //! stopped.
    //!
    //! You can combine the predicates using the `and` and `or` methods
    //! provided by the [`Predicate`] trait.
    //!
    //! # Examples
    //! ```
    //! # fn main() -> Result<(), Box<dyn std::error::Error>> {
    //! use predicates::prelude::*;
    //! use linkrank::rank::iterative::preds::{L1Norm, MaxDelta};
    //!
    //! let mut predicate = MaxDelta::try_from(1E-4)?.boxed();
    //! predicate = predicate.and(L1Norm::try_from(1E-3)?).boxed();
    //! #     Ok(())
    //! # }
    //! ```

    use anyhow::ensure;
    use predicates::{Predicate, reflection::PredicateReflection};
    use std::fmt::Display;

    #[doc(hidden)]
    /// This structure is passed to stopping predicates to provide the
    /// information that is needed to evaluate them.
    #[derive(Debug)]
    pub struct PredParams {
        /// The number of completed rounds.
        pub iteration: usize,
        /// The maximum absolute change of a node in the last round.
        pub max_delta: f64,
        /// The sum of the absolute changes of all nodes in the last round.
        pub l1_delta: f64,
    }

    /// Stops after at most the provided number of iterations.
    #[derive(Debug, Clone)]
    pub struct MaxIter {
        max_iter: usize,
    }

    impl MaxIter {
        pub const DEFAULT_MAX_ITER: usize = usize::MAX;
    }

    impl From<usize> for MaxIter {
        fn from(max_iter: usize) -> Self {
            MaxIter { max_iter }
        }
    }

    impl From<Option<usize>> for MaxIter {
        fn from(max_iter: Option<usize>) -> Self {
            max_iter.map(Self::from).unwrap_or_default()
        }
    }

    impl Default for MaxIter {
        fn default() -> Self {
            Self::from(Self::DEFAULT_MAX_ITER)
        }
    }

    impl Display for MaxIter {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_fmt(format_args!("(max iter: {})", self.max_iter))
        }
    }

    impl PredicateReflection for MaxIter {}

    impl Predicate<PredParams> for MaxIter {
        fn eval(&self, pred_params: &PredParams) -> bool {
            pred_params.iteration >= self.max_iter
        }
    }

    /// Stops when no node changed by more than a given threshold in the
    /// last round.
    #[derive(Debug, Clone)]
    pub struct MaxDelta {
        threshold: f64,
    }

    impl MaxDelta {
        pub const DEFAULT_THRESHOLD: f64 = 1E-3;
    }

    impl TryFrom<f64> for MaxDelta {
        type Error = anyhow::Error;
        fn try_from(threshold: f64) -> anyhow::Result<Self> {
            ensure!(!threshold.is_nan());
            ensure!(threshold > 0.0, "The threshold must be positive");
            Ok(MaxDelta { threshold })
        }
    }

    impl Default for MaxDelta {
        fn default() -> Self {
            MaxDelta {
                threshold: Self::DEFAULT_THRESHOLD,
            }
        }
    }

    impl Display for MaxDelta {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_fmt(format_args!("(max delta: {})", self.threshold))
        }
    }

    impl PredicateReflection for MaxDelta {}

    impl Predicate<PredParams> for MaxDelta {
        fn eval(&self, pred_params: &PredParams) -> bool {
            pred_params.max_delta <= self.threshold
        }
    }

    /// Stops when the ℓ₁ norm of the difference between the last two
    /// rounds falls below a given threshold.
    #[derive(Debug, Clone)]
    pub struct L1Norm {
        threshold: f64,
    }

    impl L1Norm {
        pub const DEFAULT_THRESHOLD: f64 = 1E-6;
    }

    impl TryFrom<f64> for L1Norm {
        type Error = anyhow::Error;
        fn try_from(threshold: f64) -> anyhow::Result<Self> {
            ensure!(!threshold.is_nan());
            ensure!(threshold > 0.0, "The threshold must be positive");
            Ok(L1Norm { threshold })
        }
    }

    impl Default for L1Norm {
        fn default() -> Self {
            L1Norm {
                threshold: Self::DEFAULT_THRESHOLD,
            }
        }
    }

    impl Display for L1Norm {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_fmt(format_args!("(norm: {})", self.threshold))
        }
    }

    impl PredicateReflection for L1Norm {}

    impl Predicate<PredParams> for L1Norm {
        fn eval(&self, pred_params: &PredParams) -> bool {
            pred_params.l1_delta <= self.threshold
        }
    }
}

use super::RankError;
use super::config::{ConfigError, RankConfig, check_damping};
use crate::graphs::link_graph::LinkGraph;
use dsi_progress_logger::{ProgressLog, no_logging};
use kahan::KahanSum;
use predicates::Predicate;
use std::collections::HashMap;
use std::hash::Hash;

/// Computes PageRank using a synchronous (Jacobi) iteration.
///
/// The struct is configured via setters and then executed via
/// [`run`](Self::run). After completion the rank vector is available via the
/// [`rank`](Self::rank) method. See the [module documentation](self) for the
/// details of the recurrence.
///
/// # Examples
///
/// ```
/// use linkrank::graphs::link_graph::LinkGraph;
/// use linkrank::rank::config::RankConfig;
/// use linkrank::rank::iterative::IterativeRank;
///
/// let g = LinkGraph::from_links([("a", vec!["b"]), ("b", vec!["a", "c"]), ("c", vec!["a"])])?;
///
/// let mut ir = IterativeRank::new(&g);
/// ir.run(&RankConfig::default())?;
///
/// assert_eq!(ir.rank().len(), 3);
/// assert!(ir.max_delta() <= RankConfig::DEFAULT_TOLERANCE);
/// assert!((ir.rank().iter().sum::<f64>() - 1.0).abs() < 1E-9);
/// assert!(ir.rank_map()[&"a"] > ir.rank_map()[&"c"]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct IterativeRank<'a, N: Eq + Hash> {
    graph: &'a LinkGraph<N>,
    initial: Option<&'a [f64]>,
    /// For each node, its predecessors; computed on the first run.
    transpose: Option<Box<[Box<[usize]>]>>,
    /// For each node, the inverse of its outdegree, or zero if it is dangling.
    inv_outdegrees: Box<[f64]>,
    max_delta: f64,
    l1_delta: f64,

    rank: Box<[f64]>,
    iteration: usize,
}

impl<N: Eq + Hash> std::fmt::Debug for IterativeRank<'_, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IterativeRank")
            .field("max_delta", &self.max_delta)
            .field("l1_delta", &self.l1_delta)
            .field("iteration", &self.iteration)
            .finish_non_exhaustive()
    }
}

impl<'a, N: Eq + Hash> IterativeRank<'a, N> {
    /// Creates a new iterative computation on `graph`.
    pub fn new(graph: &'a LinkGraph<N>) -> Self {
        let n = graph.num_nodes();
        let inv_outdegrees = (0..n)
            .map(|i| match graph.outdegree(i) {
                0 => 0.0,
                d => 1.0 / d as f64,
            })
            .collect();
        Self {
            graph,
            initial: None,
            transpose: None,
            inv_outdegrees,
            max_delta: f64::INFINITY,
            l1_delta: f64::INFINITY,
            rank: vec![0.0; n].into_boxed_slice(),
            iteration: 0,
        }
    }

    /// Sets the distribution the iteration starts from.
    ///
    /// Pass `None` to revert to the uniform distribution (1/*n*). The length
    /// of the vector is checked when the computation starts.
    pub fn initial(&mut self, initial: Option<&'a [f64]>) -> &mut Self {
        self.initial = initial;
        self
    }

    /// Returns the rank vector, indexed by node index.
    ///
    /// After a successful [`run`](Self::run), this contains the computed
    /// PageRank values, that is, the round whose successor met the stopping
    /// criterion; after a [`RankError::NotConverged`] failure, the values of
    /// the last round.
    pub fn rank(&self) -> &[f64] {
        &self.rank
    }

    /// Returns the rank of each node, keyed by node identifier.
    pub fn rank_map(&self) -> HashMap<&'a N, f64> {
        super::rank_map(self.graph, &self.rank)
    }

    /// Returns the number of rounds performed by the last run.
    pub fn iterations(&self) -> usize {
        self.iteration
    }

    /// Returns the maximum absolute change of a node in the last round.
    pub fn max_delta(&self) -> f64 {
        self.max_delta
    }

    /// Returns the ℓ₁ norm of the change in the last round.
    pub fn l1_delta(&self) -> f64 {
        self.l1_delta
    }

    /// Runs the computation using the given configuration.
    pub fn run(&mut self, config: &RankConfig) -> Result<(), RankError> {
        self.run_with_logging(config, no_logging![])
    }

    /// Runs the computation using the given configuration, logging progress
    /// on `pl` (one update per round).
    pub fn run_with_logging(
        &mut self,
        config: &RankConfig,
        pl: &mut impl ProgressLog,
    ) -> Result<(), RankError> {
        config.validate()?;
        let converged = preds::MaxDelta::try_from(config.tolerance)
            .map_err(|_| ConfigError::InvalidTolerance(config.tolerance))?;
        let budget = preds::MaxIter::from(config.max_iter);
        self.run_until(config.damping_factor, converged, budget, pl)
    }

    /// Runs the computation until `converged` holds, failing if `budget`
    /// holds first.
    ///
    /// Both predicates are evaluated after each round, `converged` first.
    ///
    /// # Errors
    ///
    /// - [`RankError::Config`] if the damping factor is not in (0 . . 1] or
    ///   the [initial distribution](Self::initial) has the wrong length;
    /// - [`RankError::NotConverged`] if the budget was exhausted.
    pub fn run_until(
        &mut self,
        damping_factor: f64,
        converged: impl Predicate<preds::PredParams>,
        budget: impl Predicate<preds::PredParams>,
        pl: &mut impl ProgressLog,
    ) -> Result<(), RankError> {
        check_damping(damping_factor)?;
        let n = self.graph.num_nodes();
        if let Some(v) = self.initial {
            if v.len() != n {
                return Err(ConfigError::InitialLength {
                    expected: n,
                    got: v.len(),
                }
                .into());
            }
        }

        self.iteration = 0;
        self.max_delta = f64::INFINITY;
        self.l1_delta = f64::INFINITY;

        if n == 0 {
            self.max_delta = 0.0;
            self.l1_delta = 0.0;
            return Ok(());
        }

        log::info!("Damping factor: {}", damping_factor);
        log::info!(
            "Initial distribution: {}",
            if self.initial.is_some() {
                "custom"
            } else {
                "uniform"
            }
        );
        log::info!("Stopping criterion: {}", converged);
        log::info!("Iteration budget: {}", budget);

        let inv_n = 1.0 / n as f64;
        match self.initial {
            Some(v) => self.rank.copy_from_slice(v),
            None => self.rank.fill(inv_n),
        }

        let graph = self.graph;
        let transpose = self.transpose.get_or_insert_with(|| {
            let mut pred = vec![vec![]; n];
            for (q, succ) in graph.iter() {
                for &p in succ {
                    pred[p].push(q);
                }
            }
            pred.into_iter().map(Vec::into_boxed_slice).collect()
        });

        log::info!("{} dangling nodes", graph.num_dangling());
        let mut dangling_rank = KahanSum::<f64>::new();
        for (i, &r) in self.rank.iter().enumerate() {
            if self.inv_outdegrees[i] == 0.0 {
                dangling_rank += r;
            }
        }
        let mut dangling_rank = dangling_rank.sum();

        pl.item_name("iteration");
        pl.expected_updates(None);
        pl.start(format!("Computing PageRank (damping factor={damping_factor})..."));

        let teleport = (1.0 - damping_factor) * inv_n;
        let mut next = vec![0.0; n].into_boxed_slice();

        let result = loop {
            let mut next_dangling = KahanSum::<f64>::new();
            let mut l1_delta = KahanSum::<f64>::new();
            let mut max_delta = 0.0_f64;

            for (p, pred) in transpose.iter().enumerate() {
                let mut sigma = KahanSum::<f64>::new();
                for &q in pred.iter() {
                    sigma += self.rank[q] * self.inv_outdegrees[q];
                }
                sigma += dangling_rank * inv_n;

                let new_rank = teleport + damping_factor * sigma.sum();

                if self.inv_outdegrees[p] == 0.0 {
                    next_dangling += new_rank;
                }
                let delta = (new_rank - self.rank[p]).abs();
                l1_delta += delta;
                max_delta = max_delta.max(delta);

                next[p] = new_rank;
            }

            self.iteration += 1;
            self.max_delta = max_delta;
            self.l1_delta = l1_delta.sum();

            log::debug!(
                "Iteration {}: max delta = {}, l1 delta = {}",
                self.iteration,
                self.max_delta,
                self.l1_delta
            );

            pl.update_and_display();

            let params = preds::PredParams {
                iteration: self.iteration,
                max_delta: self.max_delta,
                l1_delta: self.l1_delta,
            };
            // On convergence the previous round is kept
            if converged.eval(&params) {
                break Ok(());
            }

            // The new round replaces the previous one as a whole
            std::mem::swap(&mut self.rank, &mut next);
            dangling_rank = next_dangling.sum();

            if budget.eval(&params) {
                break Err(RankError::NotConverged {
                    iterations: self.iteration,
                    max_delta: self.max_delta,
                });
            }
        };

        pl.done();

        match &result {
            Ok(()) => log::info!(
                "Converged after {} iteration(s), max delta = {}",
                self.iteration,
                self.max_delta
            ),
            Err(e) => log::warn!("{}", e),
        }

        result
    }
}
