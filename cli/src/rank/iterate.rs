/*
 * SPDX-FileCopyrightText: 2026 The linkrank authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{RankArgs, iteration_section, load_corpus};
use crate::GlobalArgs;
use anyhow::Result;
use clap::Parser;
use dsi_progress_logger::{ProgressLog, progress_logger};
use linkrank::prelude::*;

#[derive(Parser, Debug)]
#[command(
    name = "iterate",
    about = "Compute PageRank by synchronous iteration.",
    long_about = None
)]
pub struct CliArgs {
    #[clap(flatten)]
    pub rank: RankArgs,

    #[arg(short, long, default_value_t = RankConfig::DEFAULT_TOLERANCE)]
    /// Stop when no rank changes by more than this amount in a round.
    pub tolerance: f64,

    #[arg(long)]
    /// Maximum number of iterations (default: unbounded).
    pub max_iter: Option<usize>,
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    let config = RankConfig::default()
        .damping_factor(args.rank.damping_factor)
        .tolerance(args.tolerance)
        .max_iter(args.max_iter);
    config.validate()?;

    let mut pl = progress_logger![];
    if let Some(log_interval) = global_args.log_interval {
        pl.log_interval(log_interval);
    }

    let graph = load_corpus(&args.rank.corpus)?;
    let section = iteration_section(&graph, &config, &mut pl)?;
    args.rank.output.store(&[section])
}
