/*
 * SPDX-FileCopyrightText: 2026 The linkrank authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Estimators of the stationary distribution of the random surfer.
//!
//! The random surfer sits on a node of a [`LinkGraph`]; with probability
//! _d_ (the _damping factor_) it follows one of the out-links of the node,
//! chosen uniformly, and with probability 1 − _d_ it jumps to a node chosen
//! uniformly in the whole graph. A dangling node, that is, a node with no
//! out-links, behaves as if it linked to every node: from there the surfer
//! always jumps uniformly. The [`TransitionModel`](transition::TransitionModel)
//! describes a single step of this process.
//!
//! The PageRank of a node is the long-run probability of finding the surfer
//! there, and it is approximated in two independent ways:
//!
//! - [`SampledRank`](sampling::SampledRank) follows the surfer for a given
//!   number of steps and counts visits;
//! - [`IterativeRank`](iterative::IterativeRank) iterates the PageRank
//!   recurrence until it reaches a fixed point within a given tolerance.
//!
//! Both estimators are configured by a [`RankConfig`](config::RankConfig)
//! passed to each run, borrow the graph immutably, and own the rank vector
//! they compute, so independent runs on the same graph may happen in
//! parallel.

pub mod config;
pub mod iterative;
pub mod sampling;
pub mod transition;

use crate::graphs::link_graph::{GraphError, LinkGraph};
use config::ConfigError;
use std::collections::HashMap;
use std::hash::Hash;
use thiserror::Error;

/// Errors returned by the ranking algorithms.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RankError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// The iterative estimator exhausted its iteration budget before the
    /// change of every node fell within the tolerance. The partial result
    /// is still available.
    #[error("No convergence after {iterations} iteration(s) (maximum change {max_delta})")]
    NotConverged { iterations: usize, max_delta: f64 },
}

/// Pairs each node identifier with its entry in a rank vector.
pub(crate) fn rank_map<'a, N: Eq + Hash>(
    graph: &'a LinkGraph<N>,
    rank: &[f64],
) -> HashMap<&'a N, f64> {
    graph.nodes().zip(rank.iter().copied()).collect()
}
