//! Command-line interface definitions.
//!
//! Global options can also come from environment variables; everything else
//! is read from the YAML config file.

use crate::models::Country;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Scrape every publisher for today's news
/// statewatch scrape
///
/// # One publisher, explicit window
/// statewatch scrape --country NG --source "The Punch" \
///     --start 2023-10-05T00:00:00+01:00 --end 2023-10-05T23:59:59+01:00
///
/// # What the 12:30 scheduler firing runs
/// statewatch --config statewatch.yaml job scrape
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a config.yaml file
    #[arg(short, long, env = "STATEWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Store directory, overriding the config file
    #[arg(short, long, env = "STATEWATCH_STORE_DIR")]
    pub store_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Scrape publishers and store the accepted posts
    Scrape(ScrapeArgs),
    /// Summarize approved posts into activities
    Summarize {
        /// Posts per batch; defaults to the configured batch size
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Run a scheduled job for the current instant
    #[command(subcommand)]
    Job(Job),
    /// List the bundled publishers and their stored sources
    Sources {
        #[arg(long)]
        country: Option<Country>,
    },
}

#[derive(Args, Debug, PartialEq, Default)]
pub struct ScrapeArgs {
    /// Publisher name; requires --country
    #[arg(long, requires = "country")]
    pub source: Option<String>,

    /// Two-letter code or name of the country to scrape
    #[arg(long)]
    pub country: Option<Country>,

    /// Window start (RFC 3339); defaults to local midnight
    #[arg(long)]
    pub start: Option<DateTime<Utc>>,

    /// Window end (RFC 3339); defaults to the end of the local day
    #[arg(long)]
    pub end: Option<DateTime<Utc>>,

    /// Search term, overriding the configured one
    #[arg(long)]
    pub term: Option<String>,

    /// 1-based results page
    #[arg(long)]
    pub page: Option<u32>,
}

#[derive(Subcommand, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Job {
    /// Scrape everything published since local midnight
    Scrape,
    /// Summarize one batch of approved posts
    Summarize,
}
