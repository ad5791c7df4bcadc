//! Output and temp directory management.
//!
//! Generated images and previews land in the output directory. Transform
//! sources are copied or downloaded into the temp directory under a unique
//! name before upload, and removed right after.

use crate::media::{self, DEFAULT_IMAGE_EXTENSION, DEFAULT_IMAGE_MIME_TYPE};
use gemini_image_mcp_common::config::Config;
use gemini_image_mcp_common::error::Error;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A source image copied into the temp directory.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedFile {
    /// Location of the temp copy
    pub path: PathBuf,
    /// Guessed MIME type
    pub mime_type: String,
}

impl StagedFile {
    /// Remove the temp copy. Failures are logged, never returned.
    pub async fn discard(self) {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => debug!(path = %self.path.display(), "Removed staged file"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove staged file"),
        }
    }
}

/// Reads and writes files under the configured directories.
#[derive(Debug, Clone)]
pub struct FileStaging {
    output_dir: PathBuf,
    temp_dir: PathBuf,
    working_dir: PathBuf,
    http: reqwest::Client,
}

impl FileStaging {
    pub fn new(config: &Config) -> Self {
        Self::with_http(config, reqwest::Client::new())
    }

    /// Create staging with a provided HTTP client for source downloads.
    pub fn with_http(config: &Config, http: reqwest::Client) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            temp_dir: config.temp_dir.clone(),
            working_dir: config.working_dir.clone(),
            http,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// Create the output and temp directories if they are missing.
    pub async fn ensure_directories(&self) -> Result<(), Error> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        tokio::fs::create_dir_all(&self.temp_dir).await?;
        debug!(
            output_dir = %self.output_dir.display(),
            temp_dir = %self.temp_dir.display(),
            "Directories ready"
        );
        Ok(())
    }

    /// Write image bytes to `file_name` in the output directory, replacing
    /// any existing file. Returns the absolute path.
    pub async fn save_artifact(&self, data: &[u8], file_name: &str) -> Result<PathBuf, Error> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = std::path::absolute(self.output_dir.join(file_name))?;
        tokio::fs::write(&path, data).await?;
        info!(path = %path.display(), size = data.len(), "Saved image");
        Ok(path)
    }

    /// Write a preview document next to `image_path` as `<stem>.html`.
    pub async fn save_preview(&self, html: &str, image_path: &Path) -> Result<PathBuf, Error> {
        let path = preview_path_for(image_path);
        tokio::fs::write(&path, html).await?;
        debug!(path = %path.display(), "Saved preview");
        Ok(path)
    }

    /// Copy or download a source image into the temp directory.
    ///
    /// `http://` and `https://` locations are downloaded. Anything else is a
    /// local path, tried as given and then relative to the working directory.
    pub async fn materialize_source(&self, location: &str) -> Result<StagedFile, Error> {
        tokio::fs::create_dir_all(&self.temp_dir).await?;

        if is_remote(location) {
            self.download(location).await
        } else {
            self.copy_local(location).await
        }
    }

    async fn download(&self, url: &str) -> Result<StagedFile, Error> {
        debug!(url, "Downloading source image");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::api(url, 0, format!("Download failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::api(url, status.as_u16(), body));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or_default().trim().to_ascii_lowercase())
            .filter(|v| v.starts_with("image/"));

        let url_extension = response
            .url()
            .path_segments()
            .and_then(|mut segments| segments.next_back().map(str::to_string))
            .and_then(|last| {
                Path::new(&last)
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
                    .map(str::to_string)
            });

        let data = response
            .bytes()
            .await
            .map_err(|e| Error::api(url, status.as_u16(), format!("Failed to read body: {}", e)))?;

        let extension = url_extension.clone().unwrap_or_else(|| {
            content_type
                .as_deref()
                .map(media::extension_for_mime_type)
                .unwrap_or(DEFAULT_IMAGE_EXTENSION)
                .to_string()
        });
        let mime_type = url_extension
            .as_deref()
            .and_then(media::mime_type_for_extension)
            .map(str::to_string)
            .or(content_type)
            .unwrap_or_else(|| DEFAULT_IMAGE_MIME_TYPE.to_string());

        let path = self.temp_path(&extension);
        tokio::fs::write(&path, &data).await?;
        info!(url, path = %path.display(), size = data.len(), "Downloaded source image");

        Ok(StagedFile { path, mime_type })
    }

    async fn copy_local(&self, location: &str) -> Result<StagedFile, Error> {
        let source = self
            .resolve_local(location)
            .ok_or_else(|| Error::source_not_found(location))?;

        let extension = source
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
            .unwrap_or(DEFAULT_IMAGE_EXTENSION)
            .to_string();
        let mime_type = media::mime_type_for_path(&source)
            .unwrap_or(DEFAULT_IMAGE_MIME_TYPE)
            .to_string();

        let path = self.temp_path(&extension);
        let size = tokio::fs::copy(&source, &path).await?;
        info!(source = %source.display(), path = %path.display(), size, "Staged local source image");

        Ok(StagedFile { path, mime_type })
    }

    fn resolve_local(&self, location: &str) -> Option<PathBuf> {
        let as_given = PathBuf::from(location);
        if as_given.is_file() {
            return Some(as_given);
        }
        let relative = self.working_dir.join(location);
        relative.is_file().then_some(relative)
    }

    fn temp_path(&self, extension: &str) -> PathBuf {
        self.temp_dir
            .join(format!("{}.{}", uuid::Uuid::new_v4(), extension))
    }
}

/// Where the preview for `image_path` is written.
pub fn preview_path_for(image_path: &Path) -> PathBuf {
    image_path.with_extension("html")
}

fn is_remote(location: &str) -> bool {
    let lower = location.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
