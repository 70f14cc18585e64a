use log::debug;

use crate::errors::AppError;
use crate::name_refiner::escape_query;
use crate::site::markers::{self, between};
use crate::site::{LineSource, SiteClient};

/// One movie match of a search, kept as the raw markup fragment
///
/// Fields are pulled out on demand with the marker helpers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    fragment: String,
}

impl SearchResult {
    pub fn new(fragment: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
        }
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Movie title, with `&amp;` turned back into `&`
    pub fn title(&self) -> Result<String, AppError> {
        let title = between(&self.fragment, markers::TITLE_PREFIX, markers::TITLE_SUFFIX)?;
        Ok(title.replace("&amp;", "&"))
    }

    /// Release year: the last movie-info section before the year label
    pub fn year(&self) -> Result<i32, AppError> {
        let end = self
            .fragment
            .find(markers::YEAR_SUFFIX)
            .ok_or_else(|| markers::missing_marker(markers::YEAR_SUFFIX))?;
        let head = &self.fragment[..end];
        let start = head
            .rfind(markers::YEAR_PREFIX)
            .ok_or_else(|| markers::missing_marker(markers::YEAR_PREFIX))?;
        let text = head[start + markers::YEAR_PREFIX.len()..].trim();

        text.parse::<i32>()
            .map_err(|e| AppError::Parse(format!("invalid year '{}': {}", text, e)))
    }

    /// Absolute address of the movie page
    pub fn detail_link(&self, base_url: &str) -> Result<String, AppError> {
        let path = between(&self.fragment, markers::LINK_PREFIX, markers::LINK_SUFFIX)?;
        Ok(format!("{}{}", base_url, path))
    }
}

/// Split a search page into result blocks, in document order
///
/// A block opens on the line holding the start marker. From there every line
/// is appended and the container depth adjusted by the number of opening and
/// closing tags on it; the block is complete when the depth is back to zero.
pub async fn scan_results<S: LineSource + ?Sized>(source: &mut S) -> Result<Vec<SearchResult>, AppError> {
    let mut results = Vec::new();
    let mut current = String::new();
    let mut depth: i64 = 0;
    let mut in_result = false;

    while let Some(line) = source.next_line().await? {
        if line.contains(markers::RESULT_START) {
            in_result = true;
            depth = 0;
            current.clear();
        }

        if !in_result {
            continue;
        }

        current.push_str(&line);
        depth += markers::count(&line, markers::CONTAINER_OPEN);
        depth -= markers::count(&line, markers::CONTAINER_CLOSE);

        if depth < 0 {
            return Err(AppError::Parse(format!(
                "unbalanced result markup (depth {}) in line: {}",
                depth, line
            )));
        }

        if depth == 0 {
            results.push(SearchResult::new(std::mem::take(&mut current)));
            in_result = false;
        }
    }

    Ok(results)
}

/// Runs searches against the site
pub struct ResultScanner<'a> {
    client: &'a SiteClient,
}

impl<'a> ResultScanner<'a> {
    pub fn new(client: &'a SiteClient) -> Self {
        Self { client }
    }

    /// Search the site for a movie name
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, AppError> {
        let url = self.client.search_url(&escape_query(query));
        let mut lines = self.client.open_lines(&url).await?;
        let results = scan_results(&mut lines).await?;
        debug!("Search for '{}' returned {} result(s)", query, results.len());
        Ok(results)
    }
}
