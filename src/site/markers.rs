use crate::errors::AppError;

// @module: Marker strings of the site markup and anchor extraction helpers

/// Opening line of a search result block
pub const RESULT_START: &str = "<div class=\"media-body\">";
/// Container tags counted to find the end of a result block
pub const CONTAINER_OPEN: &str = "<div";
pub const CONTAINER_CLOSE: &str = "</div";

pub const TITLE_PREFIX: &str = "<h3 class=\"media-heading\" itemprop=\"name\">";
pub const TITLE_SUFFIX: &str = "</h3>";
pub const LINK_PREFIX: &str = "<a href=\"";
pub const LINK_SUFFIX: &str = "\">";
pub const YEAR_PREFIX: &str = "<span class=\"movinfo-section\">";
pub const YEAR_SUFFIX: &str = "<small>year</small>";

/// Start of a subtitle row; the row content begins after the next `>`
pub const ROW_START: &str = "<tr data-id=\"";
pub const ROW_END: &str = "</tr>";
/// End of the subtitle table
pub const TABLE_CLOSE: &str = "</tbody>";

pub const LANGUAGE_PREFIX: &str = "<span class=\"sub-lang\">";
pub const LANGUAGE_SUFFIX: &str = "</span>";
pub const RATING_PREFIX: &str = "<td class=\"rating-cell\">";
pub const RATING_SUFFIX: &str = "</span>";

/// Text strictly between the first `prefix` and the `suffix` following it
pub fn between<'a>(fragment: &'a str, prefix: &str, suffix: &str) -> Result<&'a str, AppError> {
    let rest = after(fragment, prefix)?;
    let end = rest
        .find(suffix)
        .ok_or_else(|| missing_marker(suffix))?;
    Ok(&rest[..end])
}

/// Text following the first occurrence of `prefix`
pub fn after<'a>(fragment: &'a str, prefix: &str) -> Result<&'a str, AppError> {
    let start = fragment
        .find(prefix)
        .ok_or_else(|| missing_marker(prefix))?;
    Ok(&fragment[start + prefix.len()..])
}

/// Number of occurrences of `needle` in `line`
pub fn count(line: &str, needle: &str) -> i64 {
    line.matches(needle).count() as i64
}

pub fn missing_marker(marker: &str) -> AppError {
    AppError::Parse(format!("marker '{}' not found", marker))
}
