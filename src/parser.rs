use std::sync::LazyLock;

use log::info;
use scraper::{ElementRef, Html, Selector};

use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::extract::{
    collapse_double_spaces, css, field, first, non_empty, spaced_text, strip_broken_br, text,
};
use crate::models::{BookRecord, or_na};
use crate::reviews::sample_reviews;

static TITLE: LazyLock<Selector> =
    LazyLock::new(|| css(r#"h1.Text.Text__title1[data-testid="bookTitle"]"#));
static AUTHOR: LazyLock<Selector> = LazyLock::new(|| css("span.ContributorLink__name"));
static RATING: LazyLock<Selector> = LazyLock::new(|| css("div.RatingStatistics__rating"));
static REVIEW_COUNT: LazyLock<Selector> =
    LazyLock::new(|| css(r#"span[data-testid="reviewsCount"]"#));
static DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| css("div.BookPageMetadataSection__description"));
static FORMATTED: LazyLock<Selector> = LazyLock::new(|| css("span.Formatted"));
static GENRES: LazyLock<Selector> = LazyLock::new(|| css("div.BookPageMetadataSection__genres"));
static GENRE_BUTTON: LazyLock<Selector> =
    LazyLock::new(|| css("span.BookPageMetadataSection__genreButton"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| css("a"));
static GENRE_LABEL: LazyLock<Selector> = LazyLock::new(|| css("span.Button__labelItem"));

/// Extract a full record from a book page. Individual fields degrade to
/// "N/A"; only a page with nothing to parse is an error.
pub fn parse_book(url: &str, html: &str, config: &ScraperConfig) -> Result<BookRecord, ScrapeError> {
    if html.trim().is_empty() {
        return Err(ScrapeError::Parse {
            url: url.to_string(),
            reason: "empty document".into(),
        });
    }

    let doc = Html::parse_document(html);
    let root = doc.root_element();
    if root.text().all(|t| t.trim().is_empty()) {
        return Err(ScrapeError::Parse {
            url: url.to_string(),
            reason: "document has no text content".into(),
        });
    }

    let record = BookRecord {
        url: url.to_string(),
        title: field(root, "title", &TITLE, |e| non_empty(text(e))),
        author: field(root, "author", &AUTHOR, |e| non_empty(text(e))),
        rating: field(root, "rating", &RATING, |e| parse_rating(&text(e))),
        review_count: field(root, "review_count", &REVIEW_COUNT, |e| parse_review_count(&text(e))),
        description: parse_description(root),
        genres: parse_genres(root),
        reviews: sample_reviews(&doc, config.max_reviews),
    };

    log_summary(&record, config.max_reviews);
    Ok(record)
}

fn parse_rating(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|r| r.is_finite())
}

/// "12,345 reviews" -> 12345.
fn parse_review_count(s: &str) -> Option<u64> {
    let digits = s.split_whitespace().next()?.replace(',', "");
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn parse_description(root: ElementRef<'_>) -> Option<String> {
    let container = first(root, &DESCRIPTION)?;
    let span = first(container, &FORMATTED)?;
    Some(strip_broken_br(&collapse_double_spaces(&spaced_text(span))))
}

fn parse_genres(root: ElementRef<'_>) -> Vec<String> {
    let Some(container) = first(root, &GENRES) else {
        return Vec::new();
    };
    container
        .select(&GENRE_BUTTON)
        .filter_map(|item| first(item, &ANCHOR))
        .filter_map(|link| first(link, &GENRE_LABEL))
        .map(text)
        .filter(|g| !g.is_empty())
        .collect()
}

fn log_summary(record: &BookRecord, max_reviews: usize) {
    info!("Extracted Title: {}", or_na(&record.title));
    info!("Extracted Author: {}", or_na(&record.author));
    info!("Extracted Rating: {}", or_na(&record.rating));
    info!("Extracted Review Count: {}", or_na(&record.review_count));
    info!("Extracted {} Genres: {:?}", record.genres.len(), record.genres);
    info!("Extracted {} Reviews (max {max_reviews})", record.reviews.len());
}
