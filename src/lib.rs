/*!
 * # yifysub - subtitle downloader
 *
 * A Rust library and tool that finds and downloads the subtitle of a video
 * file from a YIFY subtitle site.
 *
 * ## Features
 *
 * - Derive a search query from a release-style file name
 * - Scan search results and subtitle tables without an HTML parser
 * - Pick the best rated subtitle in the requested language
 * - Extract the subtitle from the downloaded zip archive
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `name_refiner`: File name to search query
 * - `site`: Page scanning and subtitle selection:
 *   - `site::search`: Search result blocks and their fields
 *   - `site::subtitles`: Subtitle rows and the language/rating policy
 *   - `site::markers`: Marker strings and anchor extraction
 * - `archive`: Archive download and extraction
 * - `file_utils`: Path derivation
 * - `language_utils`: Language label handling
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod archive;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod name_refiner;
pub mod site;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, Prompter, RunOptions, StdinPrompter};
pub use errors::AppError;
pub use name_refiner::{escape_query, refine_name};
pub use site::{ResultScanner, SearchResult, SiteClient, SubtitleRow, SubtitleSelector};
