/*!
 * Full download workflow tests against a local HTTP stub
 */

use anyhow::Result;
use std::fs;
use yifysub::app_config::Config;
use yifysub::errors::AppError;
use yifysub::language_utils::resolve_language;
use yifysub::{Controller, RunOptions};

use crate::common::http_stub::{self, StubServer};
use crate::common::pages::{movie_page, result_block, search_page, subtitle_row};
use crate::common::{self, zip_bytes, ScriptedPrompter, SAMPLE_SRT};

fn controller_for(server: &StubServer) -> Result<Controller> {
    common::init_test_logging();
    let mut config = Config::default();
    config.site.base_url = server.base_url.clone();
    Ok(Controller::with_config(config)?)
}

fn interactive() -> RunOptions {
    RunOptions {
        batch: false,
        show_progress: false,
    }
}

/// Routes for a movie page with one English subtitle and its archive
fn movie_routes(imdb: &str, slug: &str) -> Vec<(String, Vec<u8>)> {
    vec![
        (
            format!("/movie-imdb/{}", imdb),
            movie_page(&[subtitle_row("English", 4, &format!("/subtitles/{}", slug))]).into_bytes(),
        ),
        (
            format!("/subtitle/{}.zip", slug),
            zip_bytes(&[("subtitle.srt", SAMPLE_SRT)]),
        ),
    ]
}

#[tokio::test]
async fn test_run_withSingleResult_shouldDownloadWithoutPrompting() -> Result<()> {
    let mut routes = movie_routes("tt7000001", "some-movie-english-yify-e2e-single");
    routes.push((
        "/search?q=Some+Movie".to_string(),
        search_page(&[result_block("Some Movie", 2019, "/movie-imdb/tt7000001")]).into_bytes(),
    ));
    let server = http_stub::start(routes).await?;
    let controller = controller_for(&server)?;

    let temp_dir = common::create_temp_dir()?;
    let video = temp_dir.path().join("Some.Movie.2019.1080p.mkv");
    let language = resolve_language("english")?;
    let mut prompter = ScriptedPrompter::default();

    let written = controller
        .run(video.to_str().unwrap(), &language, &interactive(), &mut prompter)
        .await?;

    assert_eq!(written, temp_dir.path().join("Some.Movie.2019.1080p.srt"));
    assert_eq!(fs::read(&written)?, SAMPLE_SRT);
    assert!(prompter.prompts.is_empty());
    assert_eq!(server.requests()[0], "/search?q=Some+Movie");
    Ok(())
}

#[tokio::test]
async fn test_run_withSeveralResults_shouldDownloadChosenOne() -> Result<()> {
    let mut routes = movie_routes("tt7000003", "other-movie-english-yify-e2e-choice");
    routes.push((
        "/search?q=Other+Movie".to_string(),
        search_page(&[
            result_block("Other Movie", 1990, "/movie-imdb/tt7000002"),
            result_block("Other Movie", 2015, "/movie-imdb/tt7000003"),
        ])
        .into_bytes(),
    ));
    let server = http_stub::start(routes).await?;
    let controller = controller_for(&server)?;

    let temp_dir = common::create_temp_dir()?;
    let video = temp_dir.path().join("Other.Movie.2015.720p.mp4");
    let mut prompter = ScriptedPrompter::new(vec![Some("2")]);

    let written = controller
        .run(video.to_str().unwrap(), "English", &interactive(), &mut prompter)
        .await?;

    assert_eq!(fs::read(&written)?, SAMPLE_SRT);
    assert_eq!(prompter.prompts, vec!["Download: "]);
    assert_eq!(
        prompter.shown,
        vec![
            "Multiple results match the movie name:",
            "1. Other Movie, 1990",
            "2. Other Movie, 2015",
        ]
    );
    assert!(server.requests().contains(&"/movie-imdb/tt7000003".to_string()));
    assert!(!server.requests().contains(&"/movie-imdb/tt7000002".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_run_withOutOfRangeChoice_shouldFailWithUsageError() -> Result<()> {
    let server = http_stub::start(vec![(
        "/search?q=Twin".to_string(),
        search_page(&[
            result_block("Twin", 2001, "/movie-imdb/tt1"),
            result_block("Twin", 2002, "/movie-imdb/tt2"),
        ])
        .into_bytes(),
    )])
    .await?;
    let controller = controller_for(&server)?;
    let mut prompter = ScriptedPrompter::new(vec![Some("3")]);

    let result = controller.run("Twin.avi", "English", &interactive(), &mut prompter).await;

    assert!(matches!(result, Err(AppError::Usage(_))));
    Ok(())
}

fn twin_search_routes() -> Vec<(String, Vec<u8>)> {
    vec![(
        "/search?q=Twin".to_string(),
        search_page(&[
            result_block("Twin", 2001, "/movie-imdb/tt1"),
            result_block("Twin", 2002, "/movie-imdb/tt2"),
        ])
        .into_bytes(),
    )]
}

#[tokio::test]
async fn test_run_withNonNumericChoice_shouldFailWithUsageError() -> Result<()> {
    let server = http_stub::start(twin_search_routes()).await?;
    let controller = controller_for(&server)?;
    let mut prompter = ScriptedPrompter::new(vec![Some("first")]);

    let result = controller.run("Twin.avi", "English", &interactive(), &mut prompter).await;

    assert!(matches!(result, Err(AppError::Usage(_))));
    assert_eq!(server.requests(), vec!["/search?q=Twin"]);
    Ok(())
}

#[tokio::test]
async fn test_run_withEndOfInputAtChoice_shouldFailWithUsageError() -> Result<()> {
    let server = http_stub::start(twin_search_routes()).await?;
    let controller = controller_for(&server)?;
    let mut prompter = ScriptedPrompter::new(vec![None]);

    let result = controller.run("Twin.avi", "English", &interactive(), &mut prompter).await;

    assert!(matches!(result, Err(AppError::Usage(_))));
    assert_eq!(prompter.prompts, vec!["Download: "]);
    Ok(())
}

#[tokio::test]
async fn test_run_withSeveralResultsAtErrorLogLevel_shouldStillShowChoices() -> Result<()> {
    let server = http_stub::start(twin_search_routes()).await?;
    let controller = controller_for(&server)?;
    let mut prompter = ScriptedPrompter::new(vec![Some("9")]);

    let previous = log::max_level();
    log::set_max_level(log::LevelFilter::Error);
    let result = controller.run("Twin.avi", "English", &interactive(), &mut prompter).await;
    log::set_max_level(previous);

    assert!(matches!(result, Err(AppError::Usage(_))));
    assert_eq!(prompter.shown[1..], ["1. Twin, 2001", "2. Twin, 2002"]);
    Ok(())
}

#[tokio::test]
async fn test_run_inBatchModeWithSeveralResults_shouldTakeFirst() -> Result<()> {
    let mut routes = movie_routes("tt7000006", "first-pick-english-yify-e2e-batch");
    routes.push((
        "/search?q=First+Pick".to_string(),
        search_page(&[
            result_block("First Pick", 2005, "/movie-imdb/tt7000006"),
            result_block("First Pick", 2018, "/movie-imdb/tt7000007"),
        ])
        .into_bytes(),
    ));
    let server = http_stub::start(routes).await?;
    let controller = controller_for(&server)?;

    let temp_dir = common::create_temp_dir()?;
    let video = temp_dir.path().join("First.Pick.2005.DVDRip.avi");
    let mut prompter = ScriptedPrompter::default();
    let options = RunOptions {
        batch: true,
        show_progress: false,
    };

    let written = controller.run(video.to_str().unwrap(), "English", &options, &mut prompter).await?;

    assert_eq!(written, temp_dir.path().join("First.Pick.2005.DVDRip.srt"));
    assert_eq!(fs::read(&written)?, SAMPLE_SRT);
    assert!(prompter.prompts.is_empty());
    assert!(prompter.shown.is_empty());
    assert!(server.requests().contains(&"/movie-imdb/tt7000006".to_string()));
    assert!(!server.requests().contains(&"/movie-imdb/tt7000007".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_run_withNoResults_shouldRetryWithOperatorQuery() -> Result<()> {
    let mut routes = movie_routes("tt7000004", "real-title-english-yify-e2e-retry");
    routes.push(("/search?q=Wrong+Name".to_string(), search_page(&[]).into_bytes()));
    routes.push((
        "/search?q=Real+Title".to_string(),
        search_page(&[result_block("Real Title", 2010, "/movie-imdb/tt7000004")]).into_bytes(),
    ));
    let server = http_stub::start(routes).await?;
    let controller = controller_for(&server)?;

    let temp_dir = common::create_temp_dir()?;
    let video = temp_dir.path().join("Wrong.Name.2010.x264.mkv");
    let mut prompter = ScriptedPrompter::new(vec![Some("Real Title")]);

    let written = controller
        .run(video.to_str().unwrap(), "English", &interactive(), &mut prompter)
        .await?;

    assert_eq!(fs::read(&written)?, SAMPLE_SRT);
    assert_eq!(prompter.prompts, vec!["Provide another name: "]);
    assert_eq!(prompter.shown, vec!["Could not find movie: Wrong Name"]);
    Ok(())
}

#[tokio::test]
async fn test_run_withNoResultsAndEndOfInput_shouldFailWithNotFound() -> Result<()> {
    let server = http_stub::start(vec![("/search?q=Nothing".to_string(), search_page(&[]).into_bytes())]).await?;
    let controller = controller_for(&server)?;
    let mut prompter = ScriptedPrompter::new(vec![None]);

    let result = controller.run("Nothing.mkv", "English", &interactive(), &mut prompter).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn test_run_inBatchModeWithNoResults_shouldNotPrompt() -> Result<()> {
    let server = http_stub::start(vec![("/search?q=Nothing".to_string(), search_page(&[]).into_bytes())]).await?;
    let controller = controller_for(&server)?;
    let mut prompter = ScriptedPrompter::default();
    let options = RunOptions {
        batch: true,
        show_progress: false,
    };

    let result = controller.run("Nothing.mkv", "English", &options, &mut prompter).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert!(prompter.prompts.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_run_withoutSubtitleInLanguage_shouldFailWithNotFound() -> Result<()> {
    let mut routes = movie_routes("tt7000005", "lonely-movie-english-yify-e2e-lang");
    routes.push((
        "/search?q=Lonely+Movie".to_string(),
        search_page(&[result_block("Lonely Movie", 2012, "/movie-imdb/tt7000005")]).into_bytes(),
    ));
    let server = http_stub::start(routes).await?;
    let controller = controller_for(&server)?;

    let temp_dir = common::create_temp_dir()?;
    let video = temp_dir.path().join("Lonely.Movie.2012.720p.mkv");
    let mut prompter = ScriptedPrompter::default();

    let result = controller
        .run(video.to_str().unwrap(), "Finnish", &interactive(), &mut prompter)
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert!(!temp_dir.path().join("Lonely.Movie.2012.720p.srt").exists());
    Ok(())
}
