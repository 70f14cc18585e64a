use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::site::SiteClient;

// @module: Subtitle archive download and extraction

/// Downloads a subtitle archive and writes its single entry to disk
pub struct ArchiveFetcher<'a> {
    client: &'a SiteClient,
    show_progress: bool,
}

impl<'a> ArchiveFetcher<'a> {
    pub fn new(client: &'a SiteClient) -> Self {
        Self {
            client,
            show_progress: true,
        }
    }

    /// Enable or disable the download progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Download `archive_link` and extract its subtitle to `destination`
    pub async fn fetch(&self, archive_link: &str, destination: &Path) -> Result<(), AppError> {
        let archive_name = FileManager::url_file_name(archive_link)
            .ok_or_else(|| AppError::Io(format!("No file name in archive link: {}", archive_link)))?;
        let archive_path = std::env::temp_dir().join(archive_name);

        let bytes = self.download(archive_link).await?;
        debug!("Downloaded {} bytes to {:?}", bytes.len(), archive_path);

        install_archive(&bytes, archive_path, destination.to_path_buf()).await
    }

    async fn download(&self, archive_link: &str) -> Result<Vec<u8>, AppError> {
        let mut response = self.client.get(archive_link).await?;

        let progress = match (self.show_progress, response.content_length()) {
            (true, Some(total)) => {
                let bar = ProgressBar::new(total);
                bar.set_style(
                    ProgressStyle::default_bar()
                        .template("{spinner:.green} [{bar:30.cyan/blue}] {bytes}/{total_bytes}")
                        .map_err(|e| AppError::Io(format!("Invalid progress template: {}", e)))?
                        .progress_chars("=> "),
                );
                bar
            }
            _ => ProgressBar::hidden(),
        };

        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            bytes.extend_from_slice(&chunk);
            progress.set_position(bytes.len() as u64);
        }
        progress.finish_and_clear();

        Ok(bytes)
    }
}

/// Write archive bytes to `archive_path`, extract its entry, remove the archive
pub async fn install_archive(bytes: &[u8], archive_path: PathBuf, destination: PathBuf) -> Result<(), AppError> {
    tokio::fs::write(&archive_path, bytes).await?;

    let extract_path = archive_path.clone();
    tokio::task::spawn_blocking(move || extract_single_entry(&extract_path, &destination)).await??;

    tokio::fs::remove_file(&archive_path).await?;
    Ok(())
}

/// Copy the only entry of a zip archive byte for byte to `destination`
pub fn extract_single_entry(archive_path: &Path, destination: &Path) -> Result<(), AppError> {
    let file = File::open(archive_path)
        .map_err(|e| AppError::Io(format!("Failed to open archive {:?}: {}", archive_path, e)))?;
    let mut archive = zip::ZipArchive::new(file)?;

    match archive.len() {
        0 => return Err(AppError::Io(format!("Archive {:?} has no entries", archive_path))),
        1 => {}
        n => {
            return Err(AppError::Io(format!(
                "Archive {:?} has {} entries, expected a single subtitle",
                archive_path, n
            )));
        }
    }

    let mut entry = archive.by_index(0)?;
    if entry.is_dir() {
        return Err(AppError::Io(format!("Archive entry '{}' is a directory", entry.name())));
    }
    debug!("Extracting '{}' to {:?}", entry.name(), destination);

    let output = File::create(destination)
        .map_err(|e| AppError::Io(format!("Failed to create {:?}: {}", destination, e)))?;
    let mut writer = BufWriter::new(output);
    std::io::copy(&mut entry, &mut writer)?;
    writer.flush()?;

    Ok(())
}
