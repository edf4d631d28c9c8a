/*
 * SPDX-FileCopyrightText: 2026 The linkrank authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::{Context, Result, ensure};
use clap::Args;
use dsi_progress_logger::ProgressLog;
use linkrank::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub mod all;
pub mod iterate;
pub mod sample;

/// Arguments shared by all ranking commands.
#[derive(Args, Debug)]
pub struct RankArgs {
    /// The directory containing the HTML pages to rank.
    pub corpus: PathBuf,

    #[arg(short, long, default_value_t = RankConfig::DEFAULT_DAMPING)]
    /// The damping factor, that is, the probability of following a link
    /// (must be in the interval (0 . . 1]).
    pub damping_factor: f64,

    #[clap(flatten)]
    pub output: OutputArgs,
}

/// Arguments controlling how ranks are reported.
#[derive(Args, Debug)]
pub struct OutputArgs {
    #[arg(long, value_enum, default_value_t = RankFormat::Text)]
    /// The output format.
    pub fmt: RankFormat,

    #[arg(long, default_value_t = 4)]
    /// Decimal digits of the printed ranks.
    pub precision: usize,

    #[arg(short, long)]
    /// Where to write the results (default: standard output).
    pub output: Option<PathBuf>,
}

/// How ranks are reported.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RankFormat {
    /// A section per estimator, with a line per page sorted by page name.
    #[default]
    Text,
    /// A JSON object with a key per estimator, mapping page names to ranks.
    Json,
}

/// The results of one estimator.
#[derive(Debug)]
pub struct Section<'a> {
    /// The key of the section in JSON output.
    pub key: &'static str,
    /// The header of the section in text output.
    pub header: String,
    /// The ranks, by page.
    pub ranks: HashMap<&'a String, f64>,
}

impl Section<'_> {
    fn sorted(&self) -> BTreeMap<&str, f64> {
        self.ranks.iter().map(|(&k, &v)| (k.as_str(), v)).collect()
    }
}

impl RankFormat {
    /// Writes the given sections to `writer`, rounding ranks to `precision`
    /// decimal digits.
    pub fn write(
        &self,
        mut writer: impl Write,
        sections: &[Section],
        precision: usize,
    ) -> Result<()> {
        match self {
            RankFormat::Text => {
                for section in sections {
                    writeln!(writer, "{}", section.header)?;
                    for (page, rank) in section.sorted() {
                        writeln!(writer, "  {page}: {rank:.precision$}")?;
                    }
                }
            }
            RankFormat::Json => {
                let scale = 10f64.powi(precision.min(f64::DIGITS as usize) as i32);
                let mut object = serde_json::Map::new();
                for section in sections {
                    let ranks = section
                        .sorted()
                        .into_iter()
                        .map(|(page, rank)| {
                            (page.to_owned(), serde_json::json!((rank * scale).round() / scale))
                        })
                        .collect::<serde_json::Map<_, _>>();
                    object.insert(section.key.to_owned(), ranks.into());
                }
                serde_json::to_writer_pretty(&mut writer, &object)?;
                writeln!(writer)?;
            }
        }
        writer.flush()?;
        Ok(())
    }
}

impl OutputArgs {
    /// Writes the given sections to the output file, or to standard output.
    pub fn store(&self, sections: &[Section]) -> Result<()> {
        match &self.output {
            None => self
                .fmt
                .write(std::io::stdout().lock(), sections, self.precision),
            Some(path) => {
                create_parent_dir(path)?;
                let file = std::fs::File::create(path)
                    .with_context(|| format!("Could not create {}", path.display()))?;
                log::info!("Storing results at {}", path.display());
                self.fmt
                    .write(BufWriter::new(file), sections, self.precision)
                    .with_context(|| format!("Could not write results to {}", path.display()))
            }
        }
    }
}

/// Creates all parent directories of the given file path.
fn create_parent_dir(file_path: impl AsRef<Path>) -> Result<()> {
    if let Some(parent_dir) = file_path.as_ref().parent() {
        if !parent_dir.as_os_str().is_empty() {
            std::fs::create_dir_all(parent_dir).with_context(|| {
                format!("Failed to create the directory {:?}", parent_dir.display())
            })?;
        }
    }
    Ok(())
}

/// Crawls the corpus, failing if it contains no pages.
pub fn load_corpus(corpus: &Path) -> Result<LinkGraph<String>> {
    let graph = crate::crawl::crawl(corpus)?;
    ensure!(
        !graph.is_empty(),
        "No .html pages found in {}",
        corpus.display()
    );
    Ok(graph)
}

/// Samples PageRank, returning the section reporting the result.
pub fn sampling_section<'a>(
    graph: &'a LinkGraph<String>,
    config: &RankConfig,
    seed: Option<u64>,
    pl: &mut impl ProgressLog,
) -> Result<Section<'a>> {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    let mut rng = match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };
    let mut sr = SampledRank::new(graph);
    sr.run_with_logging(config, &mut rng, pl)?;
    Ok(Section {
        key: "sampling",
        header: format!(
            "PageRank Results from Sampling (n = {})",
            config.sample_count
        ),
        ranks: sr.rank_map(),
    })
}

/// Iterates PageRank, returning the section reporting the result.
pub fn iteration_section<'a>(
    graph: &'a LinkGraph<String>,
    config: &RankConfig,
    pl: &mut impl ProgressLog,
) -> Result<Section<'a>> {
    let mut ir = IterativeRank::new(graph);
    ir.run_with_logging(config, pl)
        .context("Could not compute PageRank by iteration")?;
    log::info!(
        "Completed after {} iteration(s), max delta = {}",
        ir.iterations(),
        ir.max_delta()
    );
    Ok(Section {
        key: "iteration",
        header: "PageRank Results from Iteration".to_owned(),
        ranks: ir.rank_map(),
    })
}
