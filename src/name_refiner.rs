use once_cell::sync::Lazy;
use regex::Regex;

// @module: Search query derivation from release-style file names

/// Character separating the words of a release name
pub const SEPARATOR: char = '.';

// Shortest prefix followed by `.YYYY.`
static YEAR_BOUNDARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.+?)\.[0-9]{4}\.").expect("year boundary pattern is valid")
});

/// Attempt to turn a release name into a searchable movie title.
///
/// `Movie.Title.2020.1080p.BluRay.x264` becomes `Movie Title`. The title is
/// the text before the first year delimited by separators on both sides; in it
/// the last separator of every run becomes a space and the earlier ones are
/// kept (`A...B` gives `A.. B`).
///
/// Returns `None` when there is no year boundary, in which case the caller
/// keeps the unrefined name.
pub fn refine_name(source: &str) -> Option<String> {
    let prefix = YEAR_BOUNDARY.captures(source)?.get(1)?.as_str();

    let mut refined = String::with_capacity(prefix.len());
    let mut chars = prefix.chars().peekable();
    while let Some(c) = chars.next() {
        if c != SEPARATOR {
            refined.push(c);
        } else if chars.peek() == Some(&SEPARATOR) {
            refined.push(SEPARATOR);
        } else {
            refined.push(' ');
        }
    }

    Some(refined)
}

/// Escape a query for the search URL.
///
/// Only `&` is percent-encoded, then spaces become `+`. Anything else is
/// passed through untouched.
pub fn escape_query(query: &str) -> String {
    query.replace('&', "%26").replace(' ', "+")
}
