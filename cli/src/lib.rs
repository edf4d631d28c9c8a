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

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::time::{Duration, SystemTime};

pub mod crawl;
pub mod rank;

/// Parses a duration from a string.
///
/// The string is a sequence of numbers, each followed by one of the
/// suffixes `s` (seconds), `m` (minutes), `h` (hours), or `d` (days); a
/// trailing number without suffix is interpreted as milliseconds.
///
/// Example: `1d2h3m4s567` is 1 day, 2 hours, 3 minutes, 4 seconds, and 567
/// milliseconds.
pub fn parse_duration(value: &str) -> Result<Duration> {
    let value: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    if value.is_empty() {
        bail!("Empty duration string, if you want every 0 milliseconds use `0`.");
    }
    let mut duration = Duration::ZERO;
    let mut rest = value.as_str();
    while !rest.is_empty() {
        let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        if digits == 0 {
            bail!("Missing number in duration {:?}", value);
        }
        let amount = rest[..digits].parse::<u64>()?;
        rest = &rest[digits..];
        let Some(suffix) = rest.chars().next() else {
            duration = duration
                .checked_add(Duration::from_millis(amount))
                .ok_or_else(|| anyhow::anyhow!("Duration {:?} is too long", value))?;
            break;
        };
        let unit = match suffix {
            's' => 1,
            'm' => 60,
            'h' => 60 * 60,
            'd' => 60 * 60 * 24,
            _ => bail!("Invalid duration suffix: {}", suffix),
        };
        let Some(secs) = amount.checked_mul(unit) else {
            bail!("Duration {:?} is too long", value);
        };
        duration = duration
            .checked_add(Duration::from_secs(secs))
            .ok_or_else(|| anyhow::anyhow!("Duration {:?} is too long", value))?;
        rest = &rest[suffix.len_utf8()..];
    }
    Ok(duration)
}

/// Initializes the `env_logger` logger with a format including a timestamp
/// and the time elapsed since initialization.
///
/// The default level is `info`; use the `RUST_LOG` environment variable to
/// change it.
pub fn init_env_logger() -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    let start = std::time::Instant::now();
    builder.format(move |buf, record| {
        let Ok(ts) = jiff::Timestamp::try_from(SystemTime::now()) else {
            return Err(std::io::Error::other("Failed to get timestamp"));
        };
        let style = buf.default_level_style(record.level());
        writeln!(
            buf,
            "{} {:.3}s {style}{}{style:#} {} - {}",
            ts.strftime("%F %T%.3f"),
            start.elapsed().as_secs_f64(),
            record.level(),
            record.target(),
            record.args()
        )
    });
    builder.try_init()?;
    Ok(())
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    #[arg(long, value_parser = parse_duration, global = true, display_order = 1000)]
    /// How often to log progress. Default is 10s. You can use the suffixes "s"
    /// for seconds, "m" for minutes, "h" for hours, and "d" for days. If no
    /// suffix is provided it is assumed to be in milliseconds.
    pub log_interval: Option<Duration>,
}

#[derive(Subcommand, Debug)]
pub enum SubCommands {
    #[clap(name = "sample", visible_alias = "s")]
    Sample(rank::sample::CliArgs),
    #[clap(name = "iterate", visible_alias = "i")]
    Iterate(rank::iterate::CliArgs),
    #[clap(name = "all")]
    All(rank::all::CliArgs),
}

#[derive(Parser, Debug)]
#[command(name = "linkrank", version)]
/// Ranks a directory of HTML pages by PageRank, estimated by sampling a
/// random walk and by iterating the PageRank recurrence.
///
/// Environment (noteworthy environment variables used):
///
/// RUST_LOG: configuration for env_logger, pass `debug` to see the progress of
/// each iteration. You can also use `RUST_LOG=linkrank=debug` to see only the
/// logs of the ranking algorithms.
pub struct Cli {
    #[command(subcommand)]
    pub command: SubCommands,
    #[clap(flatten)]
    pub args: GlobalArgs,
}

/// The entry point of the command-line interface.
pub fn cli_main<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let start = std::time::Instant::now();
    let cli = Cli::parse_from(args);
    match cli.command {
        SubCommands::Sample(args) => {
            rank::sample::main(cli.args, args)?;
        }
        SubCommands::Iterate(args) => {
            rank::iterate::main(cli.args, args)?;
        }
        SubCommands::All(args) => {
            rank::all::main(cli.args, args)?;
        }
    }

    log::info!(
        "The command took {}",
        pretty_print_elapsed(start.elapsed().as_secs_f64())
    );

    Ok(())
}

/// Pretty-prints seconds in a human-readable format.
fn pretty_print_elapsed(elapsed: f64) -> String {
    let minutes = (elapsed / 60.0) as u64;
    match minutes {
        0 => format!("{:.3} seconds", elapsed),
        1 => format!("1 minute {:.3} seconds", elapsed % 60.0),
        _ => format!("{} minutes {:.3} seconds", minutes, elapsed % 60.0),
    }
}
