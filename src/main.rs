// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, error, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use yifysub::app_config::{self, Config};
use yifysub::language_utils::resolve_language;
use yifysub::{AppError, Controller, RunOptions, StdinPrompter};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for yifysub
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// yifysub - download the subtitle of a video file
///
/// Searches the subtitle site for the movie named by the video file, picks the
/// best rated subtitle in the requested language and saves it next to the video.
#[derive(Parser, Debug)]
#[command(name = "yifysub")]
#[command(version)]
#[command(about = "Subtitle downloader for YIFY subtitle sites")]
#[command(long_about = "yifysub derives a movie name from a video file name, searches the subtitle site
and saves the best rated subtitle in the requested language as <video>.srt.

EXAMPLES:
    yifysub -m Some.Movie.2019.1080p.mkv            # English subtitles
    yifysub -l french -m Some.Movie.2019.1080p.mkv  # French subtitles
    yifysub -l fr -m movie.mkv                      # ISO codes work too
    yifysub --batch -m movie.mkv                    # Never prompt
    yifysub completions bash > yifysub.bash         # Generate bash completions

The video file doesn't need to exist, only its name is used.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// The path to the video file to download subtitles for
    #[arg(short = 'm', long = "movie", value_name = "PATH")]
    movie_path: Option<String>,

    /// Language of the subtitles (defaults to English)
    #[arg(short, long)]
    language: Option<String>,

    /// Display debugging information
    #[arg(long)]
    debug: bool,

    /// Never prompt: take the first of several results, give up when none match
    #[arg(long)]
    batch: bool,

    /// Suppress everything but errors
    #[arg(long)]
    no_output: bool,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the subtitle site base URL
    #[arg(long, env = "YIFYSUB_SITE_URL")]
    site_url: Option<String>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI color for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌", "1;31"),
            Level::Warn => ("🚧", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍", "1;36"),
            Level::Trace => ("📋", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, color) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // The logger admits everything; the effective level is set through max_level
    if CustomLogger::init(LevelFilter::Trace).is_err() {
        eprintln!("Failed to initialize logger");
    }
    log::set_max_level(LevelFilter::Info);

    let cli = match CommandLineOptions::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };

    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "yifysub", &mut std::io::stdout());
        return;
    }

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<AppError>() {
            Some(app_error) => {
                error!("{}", app_error);
                if let Some(hint) = app_error.hint() {
                    error!(" * {}", hint);
                }
            }
            None => error!("{:#}", e),
        }
        std::process::exit(1);
    }
}

async fn run(options: CommandLineOptions) -> Result<()> {
    let mut config = match &options.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    if let Some(site_url) = &options.site_url {
        config.site.base_url = site_url.trim_end_matches('/').to_string();
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    } else if options.debug {
        config.log_level = app_config::LogLevel::Debug;
    } else if options.no_output {
        config.log_level = app_config::LogLevel::Error;
    }
    log::set_max_level(level_filter(&config.log_level));

    let movie_path = options
        .movie_path
        .clone()
        .ok_or_else(|| AppError::Usage("the video path (-m <PATH>) is required".to_string()))?;

    let language = resolve_language(options.language.as_deref().unwrap_or(&config.language))?;

    debug!("Arguments: {}", std::env::args().skip(1).collect::<Vec<_>>().join(" "));
    debug!("Site: {}", config.site.base_url);

    let run_options = RunOptions {
        batch: options.batch,
        show_progress: !options.no_output,
    };

    let controller = Controller::with_config(config)?;
    controller
        .run(&movie_path, &language, &run_options, &mut StdinPrompter)
        .await?;

    Ok(())
}
