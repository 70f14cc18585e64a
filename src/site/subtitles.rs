use log::{debug, trace};
use std::cmp::Ordering;

use crate::errors::AppError;
use crate::site::markers::{self, between};
use crate::site::{LineSource, SiteClient};

/// One subtitle offering of a movie page, kept as the raw row markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleRow {
    fragment: String,
}

impl SubtitleRow {
    pub fn new(fragment: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
        }
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn language(&self) -> Result<&str, AppError> {
        between(&self.fragment, markers::LANGUAGE_PREFIX, markers::LANGUAGE_SUFFIX)
    }

    /// Rating shown in the rating cell, possibly negative
    pub fn rating(&self) -> Result<i32, AppError> {
        let cell = between(&self.fragment, markers::RATING_PREFIX, markers::RATING_SUFFIX)?;
        let text = match cell.rfind('>') {
            Some(pos) => &cell[pos + 1..],
            None => cell,
        }
        .trim();

        text.parse::<i32>()
            .map_err(|e| AppError::Parse(format!("invalid rating '{}': {}", text, e)))
    }

    /// Absolute address of the subtitle archive
    ///
    /// The row links to the subtitle page (`/subtitles/...`); the archive lives
    /// at `/subtitle/....zip`.
    pub fn archive_link(&self, base_url: &str) -> Result<String, AppError> {
        let path = between(&self.fragment, markers::LINK_PREFIX, markers::LINK_SUFFIX)?;
        Ok(format!("{}{}.zip", base_url, path.replace("/subtitles/", "/subtitle/")))
    }
}

/// Gather the subtitle table of a movie page into one string
///
/// Collection starts at the first line holding a row marker and runs to the
/// end of the page. Returns `None` when the table closes, or the page ends,
/// before any row was seen.
pub async fn collect_rows<S: LineSource + ?Sized>(source: &mut S) -> Result<Option<String>, AppError> {
    let mut buffer = String::new();
    let mut started = false;

    while let Some(line) = source.next_line().await? {
        if started || line.contains(markers::ROW_START) {
            started = true;
            buffer.push_str(&line);
        } else if line.contains(markers::TABLE_CLOSE) {
            break;
        }
    }

    Ok(started.then_some(buffer))
}

/// Iterator over the rows of a collected subtitle table, left to right
pub struct RowIter<'a> {
    rest: &'a str,
}

impl<'a> RowIter<'a> {
    pub fn new(table: &'a str) -> Self {
        Self { rest: table }
    }
}

impl Iterator for RowIter<'_> {
    type Item = Result<SubtitleRow, AppError>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest;
        let start = rest.find(markers::ROW_START)?;
        let after_marker = &rest[start + markers::ROW_START.len()..];

        let Some(open_end) = after_marker.find('>') else {
            self.rest = "";
            return Some(Err(markers::missing_marker(">")));
        };
        let content = &after_marker[open_end + 1..];

        let Some(end) = content.find(markers::ROW_END) else {
            self.rest = "";
            return Some(Err(markers::missing_marker(markers::ROW_END)));
        };
        let row_end = end + markers::ROW_END.len();

        self.rest = &content[row_end..];
        Some(Ok(SubtitleRow::new(&content[..row_end])))
    }
}

/// Pick the archive link for `language` from rows sorted by language
///
/// The first row in the language with a non-negative rating wins. Rows are
/// grouped by language in lexical order, so the first row sorting after the
/// target language ends the search.
pub fn select_from_rows<I>(rows: I, language: &str, base_url: &str) -> Result<Option<String>, AppError>
where
    I: IntoIterator<Item = Result<SubtitleRow, AppError>>,
{
    for row in rows {
        let row = row?;
        let row_language = row.language()?;

        match row_language.cmp(language) {
            Ordering::Equal => {
                let rating = row.rating()?;
                trace!("{} subtitle with rating {}", row_language, rating);
                if rating >= 0 {
                    return row.archive_link(base_url).map(Some);
                }
            }
            Ordering::Greater => {
                debug!("Reached '{}' rows without a usable '{}' subtitle", row_language, language);
                return Ok(None);
            }
            Ordering::Less => {}
        }
    }

    Ok(None)
}

/// Finds the subtitle to download on a movie page
pub struct SubtitleSelector<'a> {
    client: &'a SiteClient,
}

impl<'a> SubtitleSelector<'a> {
    pub fn new(client: &'a SiteClient) -> Self {
        Self { client }
    }

    /// Archive link of the best subtitle in `language`, if the page has one
    pub async fn select_subtitle_link(&self, detail_link: &str, language: &str) -> Result<Option<String>, AppError> {
        let mut lines = self.client.open_lines(detail_link).await?;
        select_from_source(&mut lines, language, self.client.base_url()).await
    }
}

/// Collect the rows of a page and apply the selection policy
pub async fn select_from_source<S: LineSource + ?Sized>(
    source: &mut S,
    language: &str,
    base_url: &str,
) -> Result<Option<String>, AppError> {
    let Some(table) = collect_rows(source).await? else {
        debug!("No subtitle rows on the page");
        return Ok(None);
    };

    select_from_rows(RowIter::new(&table), language, base_url)
}
