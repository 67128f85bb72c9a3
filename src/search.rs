use std::sync::LazyLock;

use log::{info, warn};
use scraper::{Html, Selector};

use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::extract::css;
use crate::fetcher::PageSource;

static BOOK_TITLE_LINK: LazyLock<Selector> = LazyLock::new(|| css("a.bookTitle"));

/// Search the catalog for `query` and return the detail-page URL of the first hit.
pub fn resolve_book_url(
    source: &impl PageSource,
    config: &ScraperConfig,
    query: &str,
) -> Result<String, ScrapeError> {
    let url = config.search_url(query);
    info!("Searching for: '{query}' at {url}");

    let html = source.fetch_html(&url)?;
    let url = first_book_url(&html, config, query)?;
    info!("Found book link: {url}");
    Ok(url)
}

/// First `a.bookTitle` in document order, checked against the detail path and
/// stripped of its query string. No ranking between candidates.
pub fn first_book_url(html: &str, config: &ScraperConfig, query: &str) -> Result<String, ScrapeError> {
    let not_found = |reason: String| ScrapeError::NotFound {
        query: query.to_string(),
        reason,
    };

    let doc = Html::parse_document(html);
    let Some(href) = doc
        .select(&BOOK_TITLE_LINK)
        .next()
        .and_then(|a| a.value().attr("href"))
        .filter(|href| !href.is_empty())
    else {
        warn!("Could not find book title link for query: '{query}'");
        return Err(not_found("no book title link on the results page".into()));
    };

    if !href.starts_with(&config.book_path_prefix) {
        warn!("Found link, but not a book path: {href}");
        return Err(not_found(format!("first result is not a book page: {href}")));
    }

    let path = href.split('?').next().unwrap_or(href);
    Ok(config.absolute_url(path))
}
