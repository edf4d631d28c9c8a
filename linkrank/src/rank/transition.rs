/*
 * SPDX-FileCopyrightText: 2026 The linkrank authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! One step of the random surfer.

use super::config::{ConfigError, check_damping};
use crate::graphs::link_graph::{GraphError, LinkGraph};
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use std::fmt::Debug;
use std::hash::Hash;

/// The transition probabilities of the random surfer on a [`LinkGraph`].
///
/// If the current node has a set *L* of out-links, each node of the graph
/// is reached with probability (1 − *d*) / *n*, plus *d* / |*L*| if it belongs
/// to *L*. If the current node is dangling, the next node is chosen
/// uniformly among all *n* nodes: a dangling node behaves as if it linked to
/// every node, so no probability mass is ever lost.
///
/// # Examples
///
/// ```
/// use linkrank::graphs::link_graph::LinkGraph;
/// use linkrank::rank::transition::TransitionModel;
///
/// let g = LinkGraph::from_links([("a", vec!["b"]), ("b", vec![])])?;
/// let model = TransitionModel::new(&g, 0.85)?;
///
/// let dist = model.distribution(&"a")?;
/// assert!((dist[0] - 0.075).abs() < 1E-12);
/// assert!((dist[1] - 0.925).abs() < 1E-12);
///
/// // Dangling nodes jump uniformly
/// assert_eq!(&*model.distribution(&"b")?, &[0.5, 0.5]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TransitionModel<'a, N: Eq + Hash> {
    graph: &'a LinkGraph<N>,
    damping_factor: f64,
}

impl<'a, N: Eq + Hash> TransitionModel<'a, N> {
    /// Creates the transition model of `graph` with the given damping
    /// factor.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDamping`] if `damping_factor` is not in
    /// (0 . . 1].
    pub fn new(graph: &'a LinkGraph<N>, damping_factor: f64) -> Result<Self, ConfigError> {
        check_damping(damping_factor)?;
        Ok(Self {
            graph,
            damping_factor,
        })
    }

    /// Returns the underlying graph.
    pub fn graph(&self) -> &'a LinkGraph<N> {
        self.graph
    }

    /// Returns the damping factor.
    pub fn damping_factor(&self) -> f64 {
        self.damping_factor
    }

    /// Returns the probability of moving from the node of index `from` to
    /// the node of index `to`.
    pub fn probability(&self, from: usize, to: usize) -> f64 {
        let inv_n = 1.0 / self.graph.num_nodes() as f64;
        let outdegree = self.graph.outdegree(from);
        if outdegree == 0 {
            return inv_n;
        }
        let teleport = (1.0 - self.damping_factor) * inv_n;
        if self.graph.successors(from).binary_search(&to).is_ok() {
            teleport + self.damping_factor / outdegree as f64
        } else {
            teleport
        }
    }

    /// Writes in `dist` the distribution of the node following the node of
    /// index `from`.
    ///
    /// # Panics
    ///
    /// Panics if the length of `dist` is not the number of nodes.
    pub fn distribution_of(&self, from: usize, dist: &mut [f64]) {
        let n = self.graph.num_nodes();
        assert_eq!(
            dist.len(),
            n,
            "Distribution length ({}) does not match the number of nodes ({n})",
            dist.len()
        );
        let inv_n = 1.0 / n as f64;
        let succ = self.graph.successors(from);
        if succ.is_empty() {
            dist.fill(inv_n);
        } else {
            dist.fill((1.0 - self.damping_factor) * inv_n);
            let follow = self.damping_factor / succ.len() as f64;
            for &j in succ {
                dist[j] += follow;
            }
        }
    }

    /// Draws the index of the node following the node of index `from`.
    pub fn next<R: Rng + ?Sized>(&self, from: usize, rng: &mut R) -> usize {
        let mut dist = vec![0.0; self.graph.num_nodes()];
        self.distribution_of(from, &mut dist);
        match WeightedIndex::new(&dist) {
            Ok(index) => index.sample(rng),
            // Every distribution has positive entries since d > 0
            Err(e) => unreachable!("Invalid transition distribution: {e}"),
        }
    }
}

impl<N: Eq + Hash + Clone + Debug> TransitionModel<'_, N> {
    /// Returns the distribution of the node following `node`, indexed by node
    /// index.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] if `node` is not in the graph.
    pub fn distribution(&self, node: &N) -> Result<Box<[f64]>, GraphError> {
        let from = self.graph.try_index_of(node)?;
        let mut dist = vec![0.0; self.graph.num_nodes()].into_boxed_slice();
        self.distribution_of(from, &mut dist);
        Ok(dist)
    }
}
