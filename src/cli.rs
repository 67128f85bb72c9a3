use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::{DEFAULT_BOOK_NAME, ScraperConfig};

/// Scrape basic book data and a few reviews from Goodreads.
#[derive(Parser, Debug)]
#[command(name = "goodreads_book_scraper", version, about, long_about = None)]
pub struct Cli {
    /// Name of the book to search for
    #[arg(short, long, default_value = DEFAULT_BOOK_NAME)]
    pub book: String,

    /// Prompt for titles on stdin instead of scraping once
    #[arg(short, long)]
    pub interactive: bool,

    /// Directory for the JSON output
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Maximum number of reviews to keep
    #[arg(long)]
    pub max_reviews: Option<usize>,

    /// Pause before each request, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Print the record without writing a file
    #[arg(long)]
    pub no_save: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

impl Cli {
    pub fn scraper_config(&self) -> ScraperConfig {
        let mut config = ScraperConfig::default();
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(max) = self.max_reviews {
            config.max_reviews = max;
        }
        if let Some(ms) = self.delay_ms {
            config.polite_delay = Duration::from_millis(ms);
        }
        config
    }
}
