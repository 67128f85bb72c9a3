use std::sync::LazyLock;

use log::{info, warn};
use scraper::{ElementRef, Html, Selector};

use crate::extract::{collapse_double_spaces, css, first, spaced_text, strip_broken_br, text};
use crate::models::{REVIEW_TEXT_EMPTY, REVIEW_TEXT_NOT_FOUND, ReviewSample, UNKNOWN_REVIEWER};

static REVIEW_CARD: LazyLock<Selector> = LazyLock::new(|| css("article.ReviewCard"));
static REVIEWER_NAME: LazyLock<Selector> = LazyLock::new(|| css("div.ReviewerProfile__name"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| css("a"));
static REVIEW_SECTION: LazyLock<Selector> = LazyLock::new(|| css("section.ReviewText__content"));
static FORMATTED: LazyLock<Selector> = LazyLock::new(|| css("span.Formatted"));

/// The first `max` review cards of a book page, in document order.
pub fn sample_reviews(doc: &Html, max: usize) -> Vec<ReviewSample> {
    let cards: Vec<ElementRef<'_>> = doc.select(&REVIEW_CARD).collect();
    if cards.is_empty() {
        warn!("No review cards found ('article.ReviewCard'). Might be JS-loaded.");
        return Vec::new();
    }
    info!("Found {} potential review cards in HTML.", cards.len());

    let mut reviews = Vec::with_capacity(max.min(cards.len()));
    for card in cards {
        if reviews.len() >= max {
            info!("Reached review limit ({max}). Stopping review parsing.");
            break;
        }
        reviews.push(parse_card(card));
    }
    reviews
}

fn parse_card(card: ElementRef<'_>) -> ReviewSample {
    let reviewer_name = first(card, &REVIEWER_NAME)
        .and_then(|profile| first(profile, &ANCHOR))
        .map(text)
        .unwrap_or_else(|| UNKNOWN_REVIEWER.to_string());

    ReviewSample {
        reviewer_name,
        review_text: review_text(card),
    }
}

fn review_text(card: ElementRef<'_>) -> String {
    let Some(section) = first(card, &REVIEW_SECTION) else {
        return REVIEW_TEXT_NOT_FOUND.to_string();
    };
    let raw = match first(section, &FORMATTED) {
        Some(span) => spaced_text(span),
        None => spaced_text(section),
    };
    let cleaned = strip_broken_br(&collapse_double_spaces(&raw));
    if cleaned.is_empty() {
        REVIEW_TEXT_EMPTY.to_string()
    } else {
        cleaned
    }
}
