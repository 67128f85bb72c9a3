use std::any::Any;
use std::io::{BufRead, Write};
use std::panic::{self, AssertUnwindSafe};

use anyhow::Result;
use log::{error, warn};

use crate::config::{DEFAULT_BOOK_NAME, ScraperConfig};
use crate::fetcher::PageSource;
use crate::models::{BookRecord, or_na};
use crate::pipeline::{self, Outcome, SaveStatus, Scraped};

const QUIT_WORDS: [&str; 3] = [":q", "quit", "exit"];

/// Write a human-readable report of one pipeline run.
pub fn render(outcome: &Outcome, config: &ScraperConfig, out: &mut impl Write) -> Result<()> {
    match outcome {
        Outcome::EmptyInput => writeln!(out, "Please enter a book title.")?,
        Outcome::NoUrl { query, error } => {
            writeln!(
                out,
                "Could not find a valid {} URL for the book: '{query}'. Please check the title or try a different one.",
                config.source_tag
            )?;
            writeln!(out, "  ({error})")?;
        }
        Outcome::ScrapeFailed { url, error } => {
            writeln!(
                out,
                "Failed to scrape data for the book URL: {url}. The page structure might have changed, or the content might be loaded dynamically."
            )?;
            writeln!(out, "  ({error})")?;
        }
        Outcome::Scraped(scraped) => render_scraped(scraped, config, out)?,
    }
    Ok(())
}

fn render_scraped(scraped: &Scraped, config: &ScraperConfig, out: &mut impl Write) -> Result<()> {
    render_record(&scraped.record, config.max_reviews, out)?;
    writeln!(out)?;
    match &scraped.save {
        SaveStatus::Saved(path) => writeln!(out, "Data also saved to {}", path.display())?,
        SaveStatus::Skipped => {}
        SaveStatus::Failed(e) => writeln!(out, "Could not save data to JSON file: {e}")?,
    }
    writeln!(out, "Fetched at {}", scraped.fetched_at.to_rfc3339())?;
    Ok(())
}

pub fn render_record(record: &BookRecord, max_reviews: usize, out: &mut impl Write) -> Result<()> {
    writeln!(out, "== Book Details: {} ==", record.title_or_na())?;
    writeln!(out, "{}", record.url)?;

    section(out, "Author", &or_na(&record.author))?;
    section(out, "Rating", &format!("{} / 5", or_na(&record.rating)))?;
    let count = record
        .review_count
        .map(group_thousands)
        .unwrap_or_else(|| or_na::<u64>(&None));
    section(out, "Review Count", &count)?;
    let genres = if record.genres.is_empty() {
        or_na::<String>(&None)
    } else {
        record.genres.join(", ")
    };
    section(out, "Genres", &genres)?;
    section(out, "Description", &or_na(&record.description).replace('\n', "\n\n"))?;

    writeln!(out, "\n-- Recent Reviews (Up to {max_reviews}) --")?;
    if record.reviews.is_empty() {
        writeln!(out, "No reviews were found or scraped for this book.")?;
    }
    for (i, review) in record.reviews.iter().enumerate() {
        writeln!(out, "\n[Review {} by {}]", i + 1, review.reviewer_name)?;
        writeln!(out, "{}", review.review_text)?;
    }
    Ok(())
}

fn section(out: &mut impl Write, heading: &str, body: &str) -> Result<()> {
    writeln!(out, "\n-- {heading} --")?;
    writeln!(out, "{body}")?;
    Ok(())
}

/// 1234567 -> "1,234,567"
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Prompt for titles until EOF or a quit word. Each title runs the whole
/// pipeline; failures, including panics, are reported inline and the loop
/// carries on.
pub fn interactive(
    source: &impl PageSource,
    config: &ScraperConfig,
    save: bool,
    mut input: impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let mut buf = Vec::new();
    loop {
        write!(out, "\nEnter Book Title (e.g. {DEFAULT_BOOK_NAME}, or :q to quit): ")?;
        out.flush()?;

        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            writeln!(out)?;
            break;
        }
        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(e) => {
                warn!("Skipping unreadable input line: {e}");
                writeln!(out, "Could not read input: {e}")?;
                continue;
            }
        };
        if QUIT_WORDS.contains(&line.trim()) {
            break;
        }

        let query = line.trim();
        if !query.is_empty() {
            writeln!(out, "Searching for '{query}' and scraping data...")?;
        }
        match panic::catch_unwind(AssertUnwindSafe(|| pipeline::run(source, config, query, save))) {
            Ok(outcome) => render(&outcome, config, out)?,
            Err(payload) => {
                let msg = panic_message(payload.as_ref());
                error!("Unexpected failure while scraping '{query}': {msg}");
                writeln!(out, "An unexpected error occurred: {msg}")?;
            }
        }
    }
    Ok(())
}

pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;
    use crate::models::ReviewSample;
    use crate::search::tests::{RESULTS_PAGE, StaticPages};
    use std::io::Cursor;
    use std::time::Duration;

    fn record() -> BookRecord {
        BookRecord {
            url: "https://www.goodreads.com/book/show/68428".into(),
            title: Some("The Final Empire".into()),
            author: Some("Brandon Sanderson".into()),
            rating: Some(4.47),
            review_count: Some(56789),
            description: Some("Ash fell.\nMists came.".into()),
            genres: vec!["Fantasy".into(), "Fiction".into()],
            reviews: vec![ReviewSample {
                reviewer_name: "Vin".into(),
                review_text: "Loved it.".into(),
            }],
        }
    }

    fn rendered(record: &BookRecord) -> String {
        let mut out = Vec::new();
        render_record(record, 3, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(56789), "56,789");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn renders_every_section() {
        let text = rendered(&record());
        assert!(text.contains("== Book Details: The Final Empire =="));
        assert!(text.contains("-- Author --\nBrandon Sanderson"));
        assert!(text.contains("4.47 / 5"));
        assert!(text.contains("56,789"));
        assert!(text.contains("Fantasy, Fiction"));
        assert!(text.contains("Ash fell.\n\nMists came."));
        assert!(text.contains("-- Recent Reviews (Up to 3) --"));
        assert!(text.contains("[Review 1 by Vin]\nLoved it."));
    }

    #[test]
    fn renders_sentinels_for_a_sparse_record() {
        let sparse = BookRecord {
            title: None,
            author: None,
            rating: None,
            review_count: None,
            description: None,
            genres: vec![],
            reviews: vec![],
            ..record()
        };
        let text = rendered(&sparse);
        assert!(text.contains("== Book Details: N/A =="));
        assert!(text.contains("N/A / 5"));
        assert!(text.contains("-- Genres --\nN/A"));
        assert!(text.contains("No reviews were found or scraped for this book."));
    }

    #[test]
    fn failures_get_actionable_messages() {
        let config = ScraperConfig::default();
        let mut out = Vec::new();
        let outcome = Outcome::NoUrl {
            query: "zzqxv".into(),
            error: ScrapeError::NotFound {
                query: "zzqxv".into(),
                reason: "no book title link on the results page".into(),
            },
        };
        render(&outcome, &config, &mut out).unwrap();
        render(&Outcome::EmptyInput, &config, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Could not find a valid goodreads URL for the book: 'zzqxv'"));
        assert!(text.contains("Please enter a book title."));
    }

    #[test]
    fn interactive_loop_handles_blank_lines_and_quits() {
        let config = ScraperConfig {
            polite_delay: Duration::ZERO,
            ..ScraperConfig::default()
        };
        let pages = StaticPages::default().with(config.search_url("nothing here"), "<html><body>No results</body></html>");
        let input = Cursor::new("\nnothing here\n:q\nnever reached\n");
        let mut out = Vec::new();

        interactive(&pages, &config, false, input, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Please enter a book title."));
        assert!(text.contains("Could not find a valid goodreads URL for the book: 'nothing here'"));
        assert_eq!(pages.requested.borrow().len(), 1);
    }

    #[test]
    fn interactive_loop_survives_invalid_utf8() {
        let config = ScraperConfig {
            polite_delay: Duration::ZERO,
            ..ScraperConfig::default()
        };
        let pages = StaticPages::default();
        let input = Cursor::new(&b"caf\xe9\nsecond\n:q\n"[..]);
        let mut out = Vec::new();

        interactive(&pages, &config, false, input, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Could not read input"));
        assert!(text.contains("Enter Book Title (e.g. The Final Empire, or :q to quit)"));
        assert_eq!(*pages.requested.borrow(), [config.search_url("second")]);
    }

    #[test]
    fn interactive_loop_ends_at_eof() {
        let config = ScraperConfig {
            polite_delay: Duration::ZERO,
            ..ScraperConfig::default()
        };
        let pages = StaticPages::default().with(config.search_url("x"), RESULTS_PAGE);
        let mut out = Vec::new();
        interactive(&pages, &config, false, Cursor::new("x\n"), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Failed to scrape data for the book URL"));
    }

    #[test]
    fn panic_payloads_become_messages() {
        assert_eq!(panic_message(&"boom"), "boom");
        assert_eq!(panic_message(&String::from("bang")), "bang");
        assert_eq!(panic_message(&42_u8), "unknown panic");
    }
}
