use log::{debug, info, warn};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::app_config::Config;
use crate::archive::ArchiveFetcher;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::name_refiner::refine_name;
use crate::site::{ResultScanner, SearchResult, SiteClient, SubtitleSelector};

// @module: Application controller driving one subtitle download

/// Operator channel for the interactive steps
///
/// Everything sent here reaches the operator whatever the log level.
pub trait Prompter {
    /// Show one line of text to the operator
    fn show(&mut self, text: &str) -> Result<(), AppError>;

    /// Show `message` and read one line; `None` at end of input
    fn prompt(&mut self, message: &str) -> Result<Option<String>, AppError>;
}

/// Prompter reading from stdin and writing prompts to stdout
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn show(&mut self, text: &str) -> Result<(), AppError> {
        writeln!(std::io::stdout(), "{}", text)?;
        Ok(())
    }

    fn prompt(&mut self, message: &str) -> Result<Option<String>, AppError> {
        let mut stdout = std::io::stdout();
        write!(stdout, "{}", message)?;
        stdout.flush()?;

        let mut line = String::new();
        let read = std::io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Options of a single run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Never prompt; take the first of several results, give up on none
    pub batch: bool,
    /// Show the download progress bar
    pub show_progress: bool,
}

/// Main application controller
pub struct Controller {
    // @field: Site client shared by every stage
    client: SiteClient,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        config.validate()?;
        let client = SiteClient::new(&config.site)?;
        Ok(Self { client })
    }

    /// Find and download the subtitle of `video_path` in `language`
    ///
    /// Returns the path of the written subtitle file.
    pub async fn run(
        &self,
        video_path: &str,
        language: &str,
        options: &RunOptions,
        prompter: &mut dyn Prompter,
    ) -> Result<PathBuf, AppError> {
        let paths = FileManager::derive_video_paths(video_path);
        debug!("Movie name: {}", paths.movie_name);
        debug!("Language: {}", language);
        debug!("Subtitle file: {:?}", paths.subtitle_path);

        info!("File name: {}", paths.movie_name);

        let mut movie_name = refine_name(&paths.movie_name).unwrap_or(paths.movie_name);
        info!("Searching for '{}'", movie_name);

        let scanner = ResultScanner::new(&self.client);
        let mut results = scanner.search(&movie_name).await?;

        while results.is_empty() {
            if options.batch {
                return Err(AppError::NotFound(format!("Could not find movie: {}", movie_name)));
            }
            prompter.show(&format!("Could not find movie: {}", movie_name))?;

            movie_name = match prompter.prompt("Provide another name: ")? {
                Some(name) if !name.trim().is_empty() => name.trim().to_string(),
                _ => return Err(AppError::NotFound("No movie name given".to_string())),
            };
            results = scanner.search(&movie_name).await?;
        }

        let chosen = self.choose_result(&results, options, prompter)?;
        let movie_link = chosen.detail_link(self.client.base_url())?;
        debug!("Movie link: {}", movie_link);

        info!("Looking for {} subtitles...", language.to_lowercase());
        let selector = SubtitleSelector::new(&self.client);
        let subtitle_link = selector
            .select_subtitle_link(&movie_link, language)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No {} subtitles found", language.to_lowercase())))?;
        debug!("Subtitle link: {}", subtitle_link);

        if FileManager::file_exists(&paths.subtitle_path) {
            warn!("Overwriting existing subtitle file {:?}", paths.subtitle_path);
        }

        info!("Downloading...");
        ArchiveFetcher::new(&self.client)
            .with_progress(options.show_progress)
            .fetch(&subtitle_link, &paths.subtitle_path)
            .await?;

        info!("Saved subtitle to {:?}", paths.subtitle_path);
        Ok(paths.subtitle_path)
    }

    /// Pick one result, asking the operator when there are several
    fn choose_result<'r>(
        &self,
        results: &'r [SearchResult],
        options: &RunOptions,
        prompter: &mut dyn Prompter,
    ) -> Result<&'r SearchResult, AppError> {
        let Some(first) = results.first() else {
            return Err(AppError::NotFound("No search results".to_string()));
        };

        if results.len() == 1 {
            return Ok(first);
        }

        if options.batch {
            warn!("{} results match the movie name, taking the first one", results.len());
            return Ok(first);
        }

        prompter.show("Multiple results match the movie name:")?;
        for (i, result) in results.iter().enumerate() {
            prompter.show(&format!("{}. {}, {}", i + 1, result.title()?, result.year()?))?;
        }

        let answer = prompter
            .prompt("Download: ")?
            .ok_or_else(|| AppError::Usage("No result chosen".to_string()))?;

        let choice: usize = answer
            .trim()
            .parse()
            .map_err(|_| AppError::Usage(format!("Not a result number: {}", answer.trim())))?;

        if choice == 0 || choice > results.len() {
            return Err(AppError::Usage(format!(
                "Result number must be between 1 and {}",
                results.len()
            )));
        }

        Ok(&results[choice - 1])
    }
}
