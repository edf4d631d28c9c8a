/*
 * SPDX-FileCopyrightText: 2026 The linkrank authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Graph representations consumed by the ranking algorithms.

pub mod link_graph;

pub mod prelude {
    pub use super::link_graph::*;
}
