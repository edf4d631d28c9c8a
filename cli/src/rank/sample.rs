/*
 * SPDX-FileCopyrightText: 2026 The linkrank authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{RankArgs, load_corpus, sampling_section};
use crate::GlobalArgs;
use anyhow::Result;
use clap::Parser;
use dsi_progress_logger::{ProgressLog, progress_logger};
use linkrank::prelude::*;

#[derive(Parser, Debug)]
#[command(
    name = "sample",
    about = "Estimate PageRank by sampling a random surfer.",
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
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    let config = RankConfig::default()
        .damping_factor(args.rank.damping_factor)
        .sample_count(args.samples);
    config.validate()?;

    let mut pl = progress_logger![];
    if let Some(log_interval) = global_args.log_interval {
        pl.log_interval(log_interval);
    }

    let graph = load_corpus(&args.rank.corpus)?;
    let section = sampling_section(&graph, &config, args.seed, &mut pl)?;
    args.rank.output.store(&[section])
}
