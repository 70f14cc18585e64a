use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

// @module: File and path utilities

// Everything before the trailing `.ext`
static WITHOUT_EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.*)\.\w+$").expect("extension pattern is valid"));

// File name without directories and without the trailing `.ext`
static MOVIE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:.*[\\/])?(.*)\.\w+$").expect("movie name pattern is valid"));

/// Names derived from the video path given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoPaths {
    /// Raw file-derived title, e.g. `Some.Movie.2019.1080p`
    pub movie_name: String,
    /// Where the extracted subtitle is written
    pub subtitle_path: PathBuf,
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    /// Derive the movie name and the `.srt` destination from a video path.
    ///
    /// The video file does not need to exist. A path without an extension is
    /// used whole as the movie name and gets `.srt` appended.
    pub fn derive_video_paths(full_path: &str) -> VideoPaths {
        let movie_name = MOVIE_NAME
            .captures(full_path)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());
        let stem = WITHOUT_EXTENSION
            .captures(full_path)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());

        match (movie_name, stem) {
            (Some(movie_name), Some(stem)) => VideoPaths {
                movie_name,
                subtitle_path: PathBuf::from(format!("{}.srt", stem)),
            },
            _ => VideoPaths {
                movie_name: full_path.to_string(),
                subtitle_path: PathBuf::from(format!("{}.srt", full_path)),
            },
        }
    }

    /// Final path segment of a URL, used to name the temporary archive
    pub fn url_file_name(link: &str) -> Option<String> {
        let url = url::Url::parse(link).ok()?;
        let segment = url.path_segments()?.next_back()?;
        if segment.is_empty() {
            None
        } else {
            Some(segment.to_string())
        }
    }
}
