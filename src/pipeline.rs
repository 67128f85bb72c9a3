use std::path::PathBuf;

use chrono::{DateTime, Local};
use log::{error, info};

use crate::archiver;
use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::fetcher::PageSource;
use crate::models::BookRecord;
use crate::parser;
use crate::search;

#[derive(Debug)]
pub enum Outcome {
    /// Nothing to search for.
    EmptyInput,
    /// Search failed or turned up no book link.
    NoUrl { query: String, error: ScrapeError },
    /// Found a URL, but the book page could not be fetched or parsed.
    ScrapeFailed { url: String, error: ScrapeError },
    Scraped(Box<Scraped>),
}

#[derive(Debug)]
pub struct Scraped {
    pub record: BookRecord,
    pub save: SaveStatus,
    pub fetched_at: DateTime<Local>,
}

#[derive(Debug)]
pub enum SaveStatus {
    Saved(PathBuf),
    Skipped,
    Failed(ScrapeError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Scraped(_))
    }
}

/// Search, scrape, save. Every failure is classified into an `Outcome`;
/// a failed save still returns the record.
pub fn run(source: &impl PageSource, config: &ScraperConfig, query: &str, save: bool) -> Outcome {
    let query = query.trim();
    if query.is_empty() {
        return Outcome::EmptyInput;
    }

    let url = match search::resolve_book_url(source, config, query) {
        Ok(url) => url,
        Err(e) => {
            if e.is_network() {
                error!("Search request failed for '{query}': {e}");
            } else {
                error!("Could not find a valid book URL for '{query}': {e}");
            }
            return Outcome::NoUrl {
                query: query.to_string(),
                error: e,
            };
        }
    };

    info!("Scraping book data from: {url}");
    let record = match source
        .fetch_html(&url)
        .and_then(|html| parser::parse_book(&url, &html, config))
    {
        Ok(record) => record,
        Err(e) => {
            error!("Failed to scrape data for book URL {url}: {e:?}");
            return Outcome::ScrapeFailed { url, error: e };
        }
    };

    let save = if save {
        match archiver::save_record(Some(&record), &archiver::filename_base(query), config) {
            Ok(Some(path)) => SaveStatus::Saved(path),
            Ok(None) => SaveStatus::Skipped,
            Err(e) => {
                error!("Failed to save data to JSON file: {e}");
                SaveStatus::Failed(e)
            }
        }
    } else {
        SaveStatus::Skipped
    };

    Outcome::Scraped(Box::new(Scraped {
        record,
        save,
        fetched_at: Local::now(),
    }))
}
