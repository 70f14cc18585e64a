/*!
 * Subtitle site scraping.
 *
 * Pages are never parsed into a tree. They are read line by line and cut apart
 * with fixed marker strings:
 * - `search`: result blocks of the search page and their fields
 * - `subtitles`: subtitle rows of a movie page and the language/rating policy
 * - `markers`: the marker strings and the substring helpers built on them
 */

pub mod markers;
pub mod search;
pub mod subtitles;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;

use crate::app_config::SiteConfig;
use crate::errors::AppError;

pub use search::{ResultScanner, SearchResult};
pub use subtitles::{SubtitleRow, SubtitleSelector};

/// Source of page lines, consumed one at a time
///
/// Lines are returned without their terminator. Scanners stop pulling as soon
/// as they have what they need, and dropping the source releases the
/// underlying connection.
#[async_trait]
pub trait LineSource: Send {
    /// Next line, or `None` at end of input
    async fn next_line(&mut self) -> Result<Option<String>, AppError>;
}

/// HTTP client bound to the site base URL
pub struct SiteClient {
    /// Base URL of the site, without trailing slash
    base_url: String,
    /// HTTP client for making requests
    client: Client,
}

impl SiteClient {
    /// Create a new client from the site configuration
    pub fn new(config: &SiteConfig) -> Result<Self, AppError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder
            .build()
            .map_err(|e| AppError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Address of the search page for a query
    pub fn search_url(&self, escaped_query: &str) -> String {
        format!("{}/search?q={}", self.base_url, escaped_query)
    }

    /// Issue a GET and fail on any non-success status
    pub async fn get(&self, url: &str) -> Result<reqwest::Response, AppError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Network(format!("{} responded with {}", url, status)));
        }
        Ok(response)
    }

    /// Open a page for line-by-line reading
    pub async fn open_lines(&self, url: &str) -> Result<HttpLines, AppError> {
        let response = self.get(url).await?;
        Ok(HttpLines::new(response))
    }
}

/// Lines of an HTTP response body, decoded as UTF-8 chunk by chunk
pub struct HttpLines {
    response: reqwest::Response,
    buffer: Vec<u8>,
    /// Prefix of `buffer` already known to hold no line break
    scanned: usize,
    finished: bool,
}

impl HttpLines {
    pub fn new(response: reqwest::Response) -> Self {
        Self {
            response,
            buffer: Vec::new(),
            scanned: 0,
            finished: false,
        }
    }
}

#[async_trait]
impl LineSource for HttpLines {
    async fn next_line(&mut self) -> Result<Option<String>, AppError> {
        loop {
            if let Some(offset) = self.buffer[self.scanned..].iter().position(|&b| b == b'\n') {
                let pos = self.scanned + offset;
                self.scanned = 0;
                let mut line: Vec<u8> = self.buffer.drain(..=pos).collect();
                line.pop();
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
                return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
            }

            if self.finished {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                self.scanned = 0;
                let rest = std::mem::take(&mut self.buffer);
                return Ok(Some(String::from_utf8_lossy(&rest).into_owned()));
            }

            self.scanned = self.buffer.len();
            match self.response.chunk().await? {
                Some(chunk) => self.buffer.extend_from_slice(&chunk),
                None => self.finished = true,
            }
        }
    }
}
