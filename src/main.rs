mod archiver;
mod cli;
mod config;
mod error;
mod extract;
mod fetcher;
mod models;
mod parser;
mod pipeline;
mod presenter;
mod reviews;
mod search;
#[cfg(test)]
mod test_log;

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, error, info};

use crate::cli::Cli;
use crate::config::ScraperConfig;
use crate::fetcher::Fetcher;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);
    let config = cli.scraper_config();

    let ok = guarded(|| {
        if cli.interactive {
            run_interactive(&cli, &config).map(|()| true)
        } else {
            run_once(&cli, &config)
        }
    });
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

/// Run `work`, turning errors and panics into a logged failure. The finished
/// banner is logged whatever happens.
fn guarded(work: impl FnOnce() -> Result<bool>) -> bool {
    let ok = match panic::catch_unwind(AssertUnwindSafe(work)) {
        Ok(Ok(ok)) => ok,
        Ok(Err(e)) => {
            error!("A critical error occurred in main execution: {e:?}");
            false
        }
        Err(payload) => {
            error!(
                "A critical error occurred in main execution: {}",
                presenter::panic_message(payload.as_ref())
            );
            false
        }
    };
    info!("--- Scraper finished ---");
    ok
}

fn init_logging(debug: bool) {
    let level = if debug { LevelFilter::Debug } else { LevelFilter::Info };
    let mut clog = colog::default_builder();
    clog.filter(None, LevelFilter::Warn);
    clog.filter(Some(env!("CARGO_CRATE_NAME")), level);
    clog.parse_default_env();
    clog.target(env_logger::Target::Stdout);
    clog.init();
}

fn run_once(cli: &Cli, config: &ScraperConfig) -> Result<bool> {
    info!("--- Starting Goodreads Scraper for: {} ---", cli.book);
    info!(
        "--- Using blocking requests (max {} reviews, JSON output only) ---",
        config.max_reviews
    );

    let fetcher = Fetcher::new(config).context("failed to build HTTP client")?;
    let outcome = pipeline::run(&fetcher, config, &cli.book, !cli.no_save);

    let mut stdout = io::stdout().lock();
    presenter::render(&outcome, config, &mut stdout).context("failed to write report")?;
    Ok(outcome.is_success())
}

fn run_interactive(cli: &Cli, config: &ScraperConfig) -> Result<()> {
    info!("--- Interactive Goodreads Scraper (max {} reviews) ---", config.max_reviews);

    let fetcher = Fetcher::new(config).context("failed to build HTTP client")?;
    let stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();
    presenter::interactive(&fetcher, config, !cli.no_save, stdin, &mut stdout)
}
