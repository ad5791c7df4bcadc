//! Configuration module for loading environment variables and settings.
//!
//! The configuration is read once at startup and handed to every component
//! by value. Nothing below `main` reads the process environment.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Default Gemini model used for image generation and transformation.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp-image-generation";

/// Default base URL of the Generative Language API.
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Output directory used in remote (container) mode.
pub const REMOTE_OUTPUT_DIR: &str = "/app/output";

/// Temporary directory used in remote (container) mode.
pub const REMOTE_TEMP_DIR: &str = "/app/temp";

/// Default HTTP port for network transports.
pub const DEFAULT_PORT: u16 = 8080;

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Gemini API key (required)
    pub api_key: String,
    /// Model identifier used for generation
    pub model: String,
    /// Base URL of the Generative Language API
    pub api_base_url: String,
    /// Remote execution mode: no browser, fixed container paths
    pub remote_mode: bool,
    /// Directory receiving generated images and previews
    pub output_dir: PathBuf,
    /// Directory receiving staged source images before upload
    pub temp_dir: PathBuf,
    /// Working directory captured at startup, used to resolve relative paths
    pub working_dir: PathBuf,
    /// HTTP server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables and .env file.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingEnvVar` if GEMINI_API_KEY is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let working_dir = std::env::current_dir()
            .map_err(|e| ConfigError::invalid_value("working directory", e.to_string()))?;

        Self::from_lookup(working_dir, |name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// `working_dir` anchors the local-mode directory defaults and any
    /// relative directory overrides.
    pub fn from_lookup<F>(working_dir: PathBuf, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GEMINI_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::missing_env_var("GEMINI_API_KEY"))?;

        let model = lookup("GEMINI_MODEL")
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let api_base_url = lookup("GEMINI_API_BASE_URL")
            .filter(|u| !u.trim().is_empty())
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let remote_mode = match lookup("REMOTE_MODE") {
            Some(value) => parse_flag("REMOTE_MODE", &value)?,
            None => false,
        };

        let (default_output, default_temp) = if remote_mode {
            (PathBuf::from(REMOTE_OUTPUT_DIR), PathBuf::from(REMOTE_TEMP_DIR))
        } else {
            (working_dir.join("output"), working_dir.join("temp"))
        };

        let output_dir = lookup("OUTPUT_DIR")
            .filter(|d| !d.trim().is_empty())
            .map(|d| resolve_dir(&working_dir, &d))
            .unwrap_or(default_output);

        let temp_dir = lookup("TEMP_DIR")
            .filter(|d| !d.trim().is_empty())
            .map(|d| resolve_dir(&working_dir, &d))
            .unwrap_or(default_temp);

        let port = match lookup("PORT") {
            Some(p) => p
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid_value("PORT", format!("'{}' is not a valid port", p)))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            api_key,
            model,
            api_base_url,
            remote_mode,
            output_dir,
            temp_dir,
            working_dir,
            port,
        })
    }

    /// Get the streamed generateContent endpoint for the configured model.
    pub fn stream_generate_endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.api_base_url, self.model
        )
    }

    /// Get the Files API upload endpoint.
    pub fn upload_endpoint(&self) -> String {
        format!("{}/upload/v1beta/files", self.api_base_url)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base_url", &self.api_base_url)
            .field("remote_mode", &self.remote_mode)
            .field("output_dir", &self.output_dir)
            .field("temp_dir", &self.temp_dir)
            .field("working_dir", &self.working_dir)
            .field("port", &self.port)
            .finish()
    }
}

/// Parse a boolean environment flag.
fn parse_flag(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::invalid_value(
            name,
            format!("'{}' is not a boolean (use true/false)", other),
        )),
    }
}

fn resolve_dir(working_dir: &Path, dir: &str) -> PathBuf {
    let path = Path::new(dir.trim());
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        working_dir.join(path)
    }
}
