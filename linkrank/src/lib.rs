/*
 * SPDX-FileCopyrightText: 2026 The linkrank authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]
#![deny(unstable_features)]
#![deny(trivial_casts)]
#![deny(unconditional_recursion)]
#![deny(clippy::empty_loop)]
#![deny(unreachable_code)]
#![deny(unreachable_pub)]
#![deny(unreachable_patterns)]
#![deny(unused_macro_rules)]
#![deny(unused_doc_comments)]

pub mod graphs;
pub mod rank;

/// Prelude module to import everything from this crate.
pub mod prelude {
    pub use crate::graphs::link_graph::{GraphError, LinkGraph};
    pub use crate::rank::config::{ConfigError, RankConfig};
    pub use crate::rank::iterative::{IterativeRank, preds};
    pub use crate::rank::sampling::SampledRank;
    pub use crate::rank::transition::TransitionModel;
    pub use crate::rank::RankError;
}
