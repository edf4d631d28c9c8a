/*
 * SPDX-FileCopyrightText: 2026 The linkrank authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;

/// Errors signaling a violation of the integrity of a [`LinkGraph`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A node was looked up that is not part of the graph.
    #[error("Unknown node {0}")]
    UnknownNode(String),
    /// A link points to a node that is not part of the graph.
    #[error("Node {from} links to unknown node {target}")]
    UnknownTarget { from: String, target: String },
}

/// An immutable directed graph of hyperlinked pages.
///
/// Each node is identified by a value of type `N` (e.g., a document name)
/// and has a set of out-links towards other nodes of the graph. Internally,
/// nodes are interned to dense indices `0..n` following the order in which
/// they first appear as sources during construction, and successor lists
/// are sorted and without duplicates. If you need reproducible indices
/// (and thus reproducible seeded walks), build the graph from an ordered
/// source, such as a slice or a [`BTreeMap`](std::collections::BTreeMap).
///
/// Self-links are dropped during construction, and every link must point to
/// a node that appears as a source: a node with an empty set of out-links
/// is _dangling_.
///
/// # Examples
///
/// ```
/// use linkrank::graphs::link_graph::LinkGraph;
///
/// let g = LinkGraph::from_links([
///     ("a", vec!["b"]),
///     ("b", vec!["a", "c"]),
///     ("c", vec![]),
/// ])?;
///
/// assert_eq!(g.num_nodes(), 3);
/// assert_eq!(g.num_arcs(), 3);
/// assert!(g.is_dangling(g.index_of(&"c").unwrap()));
/// # Ok::<(), linkrank::graphs::link_graph::GraphError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkGraph<N: Eq + Hash> {
    /// The node identifiers, in index order.
    nodes: Vec<N>,
    /// The inverse of `nodes`.
    index: HashMap<N, usize>,
    /// For each node, its sorted list of successors.
    succ: Vec<Box<[usize]>>,
    /// The number of arcs in the graph.
    number_of_arcs: u64,
}

impl<N: Eq + Hash> Default for LinkGraph<N> {
    fn default() -> Self {
        Self {
            nodes: vec![],
            index: HashMap::new(),
            succ: vec![],
            number_of_arcs: 0,
        }
    }
}

impl<N: Eq + Hash + Clone + Debug> LinkGraph<N> {
    /// Creates a graph from an [`IntoIterator`] of pairs made of a node and
    /// the nodes it links to.
    ///
    /// A node appearing more than once as a source gets the union of its
    /// out-links; duplicate links and self-links are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownTarget`] if a link points to a node that
    /// never appears as a source.
    pub fn from_links<I, L>(links: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (N, L)>,
        L: IntoIterator<Item = N>,
    {
        Self::build(links, false)
    }

    /// Creates a graph as [`from_links`](Self::from_links), but silently
    /// drops links towards nodes that never appear as a source.
    ///
    /// This is the behavior needed when the links have been extracted from
    /// documents that may reference pages outside the collection.
    pub fn from_links_lossy<I, L>(links: I) -> Self
    where
        I: IntoIterator<Item = (N, L)>,
        L: IntoIterator<Item = N>,
    {
        match Self::build(links, true) {
            Ok(graph) => graph,
            Err(_) => unreachable!("lossy construction never fails"),
        }
    }

    fn build<I, L>(links: I, lossy: bool) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (N, L)>,
        L: IntoIterator<Item = N>,
    {
        let mut nodes = Vec::new();
        let mut index = HashMap::new();
        let mut pending: Vec<Vec<N>> = Vec::new();

        // First pass: intern sources, so that forward references resolve.
        for (source, targets) in links {
            let i = *index.entry(source.clone()).or_insert_with(|| {
                nodes.push(source);
                pending.push(vec![]);
                nodes.len() - 1
            });
            pending[i].extend(targets);
        }

        // Second pass: resolve targets.
        let mut succ = Vec::with_capacity(nodes.len());
        let mut number_of_arcs = 0;
        let mut dropped = 0_usize;
        for (i, targets) in pending.into_iter().enumerate() {
            let mut s = Vec::with_capacity(targets.len());
            for target in targets {
                match index.get(&target) {
                    Some(&j) if j != i => s.push(j),
                    Some(_) => {}
                    None if lossy => dropped += 1,
                    None => {
                        return Err(GraphError::UnknownTarget {
                            from: format!("{:?}", nodes[i]),
                            target: format!("{:?}", target),
                        });
                    }
                }
            }
            s.sort_unstable();
            s.dedup();
            number_of_arcs += s.len() as u64;
            succ.push(s.into_boxed_slice());
        }

        if dropped != 0 {
            log::debug!("Dropped {} links towards unknown nodes", dropped);
        }

        Ok(Self {
            nodes,
            index,
            succ,
            number_of_arcs,
        })
    }

    /// Returns a copy of this graph in which `node` has no out-links.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] if `node` is not in the graph.
    pub fn without_links(&self, node: &N) -> Result<Self, GraphError> {
        let i = self.try_index_of(node)?;
        let mut graph = self.clone();
        graph.number_of_arcs -= graph.succ[i].len() as u64;
        graph.succ[i] = Box::default();
        Ok(graph)
    }

    /// Returns the index of `node`, or [`GraphError::UnknownNode`] if the
    /// node is not in the graph.
    pub fn try_index_of(&self, node: &N) -> Result<usize, GraphError> {
        self.index_of(node)
            .ok_or_else(|| GraphError::UnknownNode(format!("{:?}", node)))
    }

    /// Returns an iterator over the identifiers of the nodes `node` links to.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] if `node` is not in the graph.
    pub fn links(&self, node: &N) -> Result<impl Iterator<Item = &N> + '_, GraphError> {
        let i = self.try_index_of(node)?;
        Ok(self.succ[i].iter().map(|&j| &self.nodes[j]))
    }
}

impl<N: Eq + Hash> LinkGraph<N> {
    /// Returns the number of nodes.
    #[inline(always)]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of arcs.
    #[inline(always)]
    pub fn num_arcs(&self) -> u64 {
        self.number_of_arcs
    }

    /// Returns whether the graph has no nodes.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the identifier of the node with the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not smaller than the number of nodes.
    #[inline(always)]
    pub fn node(&self, index: usize) -> &N {
        &self.nodes[index]
    }

    /// Returns the index of `node`, if it belongs to the graph.
    #[inline(always)]
    pub fn index_of(&self, node: &N) -> Option<usize> {
        self.index.get(node).copied()
    }

    /// Returns the identifiers of all nodes, in index order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &N> + '_ {
        self.nodes.iter()
    }

    /// Returns the sorted successors of the node with the given index.
    #[inline(always)]
    pub fn successors(&self, index: usize) -> &[usize] {
        &self.succ[index]
    }

    /// Returns the number of out-links of the node with the given index.
    #[inline(always)]
    pub fn outdegree(&self, index: usize) -> usize {
        self.succ[index].len()
    }

    /// Returns whether the node with the given index has no out-links.
    #[inline(always)]
    pub fn is_dangling(&self, index: usize) -> bool {
        self.succ[index].is_empty()
    }

    /// Returns the number of dangling nodes.
    pub fn num_dangling(&self) -> usize {
        self.succ.iter().filter(|s| s.is_empty()).count()
    }

    /// Returns an iterator over pairs made of a node index and its
    /// successors.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (usize, &[usize])> + '_ {
        self.succ.iter().enumerate().map(|(i, s)| (i, &**s))
    }
}
