/*
 * SPDX-FileCopyrightText: 2026 The linkrank authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{RankArgs, iteration_section, load_corpus, sampling_section};
use crate::GlobalArgs;
use anyhow::Result;
use clap::Parser;
use dsi_progress_logger::{ProgressLog, progress_logger};
use linkrank::prelude::*;

#[derive(Parser, Debug)]
#[command(
    name = "all",
    about = "Estimate PageRank both by sampling and by iteration.",
    long_about = None
)]
pub struct CliArgs {
    #[clap(flatten)]
    pub rank: RankArgs,

    #[arg(short = 'n', long, default_value_t = RankConfig::DEFAULT_SAMPLES)]
    /// The number of pages visited by the surfer.
    pub samples: usize,

    #[arg(long)]
    /// The seed of the pseudorandom number generator (default: random).
    pub seed: Option<u64>,

    #[arg(short, long, default_value_t = RankConfig::DEFAULT_TOLERANCE)]
    /// Stop iterating when no rank changes by more than this amount in a
    /// round.
    pub tolerance: f64,

    #[arg(long)]
    /// Maximum number of iterations (default: unbounded).
    pub max_iter: Option<usize>,
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    let config = RankConfig {
        damping_factor: args.rank.damping_factor,
        sample_count: args.samples,
        tolerance: args.tolerance,
        max_iter: args.max_iter,
    };
    config.validate()?;

    let mut pl = progress_logger![];
    if let Some(log_interval) = global_args.log_interval {
        pl.log_interval(log_interval);
    }

    let graph = load_corpus(&args.rank.corpus)?;
    let sampled = sampling_section(&graph, &config, args.seed, &mut pl)?;
    let iterated = iteration_section(&graph, &config, &mut pl)?;
    args.rank.output.store(&[sampled, iterated])
}
