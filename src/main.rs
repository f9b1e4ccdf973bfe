//! # statewatch
//!
//! Command-line front end for the scraping and summarizing pipelines.
//!
//! ## Usage
//!
//! ```sh
//! statewatch --config statewatch.yaml scrape
//! statewatch summarize --limit 50
//! statewatch job scrape
//! statewatch sources --country KE
//! ```

use chrono::Utc;
use clap::Parser;
use statewatch::api::model_with_backoff;
use statewatch::cli::{Cli, Command, Job, ScrapeArgs};
use statewatch::config::Config;
use statewatch::error::ScrapeError;
use statewatch::fetch::{WebClient, render};
use statewatch::jobs::{scheduled_scrape, scheduled_summarize};
use statewatch::models::Country;
use statewatch::orchestrator::{AdapterOutcome, SearchTerms, scrape_all, scrape_source};
use statewatch::scrapers::{Registry, ScrapeRequest};
use statewatch::store::{DocumentStore, Store};
use statewatch::window::WindowTimes;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("statewatch starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(dir) = args.store_dir {
        config.store_dir = dir;
    }

    let store = DocumentStore::open(&config.store_dir).await?;
    render::install(config.render.clone());
    let fetcher = WebClient::new(config.request_timeout(), &config.user_agent)?;
    let registry = Registry::default();

    let result = run(args.command, &config, &fetcher, &store, &registry).await;
    render::shutdown().await;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    result
}

async fn run(
    command: Command,
    config: &Config,
    fetcher: &WebClient,
    store: &DocumentStore,
    registry: &Registry,
) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Scrape(args) => scrape(args, config, fetcher, store, registry).await,
        Command::Summarize { limit } => {
            let model = model_with_backoff(config.model.clone())?;
            let batch = limit.unwrap_or(config.activity_batch_size);
            let activities = scheduled_summarize(&model, store, batch).await?;
            info!(count = activities.len(), "Summarize complete");
            Ok(())
        }
        Command::Job(Job::Scrape) => {
            let outcomes = scheduled_scrape(
                fetcher,
                store,
                registry,
                &config.search_terms,
                config.job_timezone,
                Utc::now(),
            )
            .await?;
            report(&outcomes);
            Ok(())
        }
        Command::Job(Job::Summarize) => {
            let model = model_with_backoff(config.model.clone())?;
            let activities = scheduled_summarize(&model, store, config.activity_batch_size).await?;
            info!(count = activities.len(), "Summarize job complete");
            Ok(())
        }
        Command::Sources { country } => list_sources(store, registry, country).await,
    }
}

async fn scrape(
    args: ScrapeArgs,
    config: &Config,
    fetcher: &WebClient,
    store: &DocumentStore,
    registry: &Registry,
) -> Result<(), Box<dyn Error>> {
    let window = WindowTimes {
        start: args.start,
        end: args.end,
    };

    // Single publisher.
    if let (Some(name), Some(country)) = (args.source.as_deref(), args.country) {
        let adapter = registry
            .find(country, name)
            .ok_or_else(|| ScrapeError::UnknownSource(format!("{country}/{name}")))?;
        let term = args
            .term
            .as_deref()
            .or_else(|| config.search_terms.term_for(adapter))
            .ok_or_else(|| ScrapeError::MissingSearchTerm(adapter.key.to_string()))?;
        let request = ScrapeRequest::new(term)
            .with_window(window)
            .with_page(args.page);
        let posts = scrape_source(fetcher, store, registry, &adapter.key, &request).await?;
        info!(source = %adapter.key, inserted = posts.len(), "Scrape complete");
        return Ok(());
    }

    let selected = match args.country {
        Some(country) => Registry::new(registry.for_country(country).cloned().collect()),
        None => Registry::new(registry.iter().cloned().collect()),
    };
    let terms = match args.term {
        Some(term) => SearchTerms {
            by_country: Country::ALL.into_iter().map(|c| (c, term.clone())).collect(),
            by_source: Default::default(),
        },
        None => config.search_terms.clone(),
    };
    let outcomes = scrape_all(fetcher, store, &selected, &terms, window).await?;
    report(&outcomes);
    Ok(())
}

fn report(outcomes: &[AdapterOutcome]) {
    for outcome in outcomes {
        match &outcome.result {
            Ok(posts) => info!(source = %outcome.key, inserted = posts.len(), "Adapter finished"),
            Err(e) => error!(source = %outcome.key, error = %e, "Adapter failed"),
        }
    }
}

async fn list_sources(
    store: &DocumentStore,
    registry: &Registry,
    country: Option<Country>,
) -> Result<(), Box<dyn Error>> {
    for adapter in registry.iter() {
        if country.is_some_and(|c| c != adapter.key.country) {
            continue;
        }
        let stored = store
            .find_source(adapter.key.publisher, adapter.key.country)
            .await?;
        let state = match stored {
            Some(source) => format!("stored as {}", source.id),
            None => "not yet scraped".to_string(),
        };
        println!("{:<28} {:<40} {}", adapter.key.to_string(), adapter.base_url, state);
    }
    Ok(())
}
