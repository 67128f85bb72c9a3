//! Small helpers shared by the field extractors: locate-or-miss lookups and
//! the text cleanup the book page needs.

use log::debug;
use scraper::{ElementRef, Selector};

/// Stray text the site renders where a `<br>` was mangled upstream.
pub const BROKEN_BR_ARTIFACT: &str = r#"["br"]>"#;

/// Parse a selector literal. Only called with constants from this crate.
pub fn css(selector: &str) -> Selector {
    Selector::parse(selector).unwrap_or_else(|e| panic!("bad selector {selector:?}: {e}"))
}

pub fn first<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope.select(selector).next()
}

/// Find the first element matching `selector` under `scope` and convert it.
/// A missing element or a failed conversion both yield `None`, which the
/// record stores as the "N/A" sentinel; other fields are unaffected.
pub fn field<T>(
    scope: ElementRef<'_>,
    name: &str,
    selector: &Selector,
    convert: impl FnOnce(ElementRef<'_>) -> Option<T>,
) -> Option<T> {
    let Some(el) = first(scope, selector) else {
        debug!("{name}: no element matched, using N/A");
        return None;
    };
    let value = convert(el);
    if value.is_none() {
        debug!("{name}: element found but value unusable, using N/A");
    }
    value
}

/// All text under `el`, concatenated and trimmed.
pub fn text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// All text under `el` with a space between text nodes, so `a<b>b</b>` reads
/// as `a b` instead of `ab`. Trimmed.
pub fn spaced_text(el: ElementRef<'_>) -> String {
    el.text().collect::<Vec<_>>().join(" ").trim().to_string()
}

/// Single pass of `"  "` -> `" "`, the same as the page has always needed.
pub fn collapse_double_spaces(s: &str) -> String {
    s.replace("  ", " ")
}

// Workaround for an upstream rendering bug; drop once the site stops emitting it.
pub fn strip_broken_br(s: &str) -> String {
    s.replace(BROKEN_BR_ARTIFACT, "")
}

pub fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}
