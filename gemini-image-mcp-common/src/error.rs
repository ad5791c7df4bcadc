//! Error types for the common library.
//!
//! This module provides a unified error hierarchy using `thiserror` for consistent
//! error handling across the image server.
//!
//! # Error Categories
//!
//! - `ConfigError`: Missing or invalid configuration (fatal at startup)
//! - `Error::SourceImageNotFound`: Transform source cannot be resolved
//! - `Error::UploadFailed`: Files API did not yield a usable reference
//! - `Error::NoImageReturned`: Response stream finished without an image
//! - `Error::GenerationFailed` / `Error::TransformFailed`: Wrapped upstream failures
//! - `Error::UnknownTool`: Invocation of a tool that is not registered
//! - `Error::Api`: Gemini API errors (includes endpoint and status)
//! - `Error::MalformedResponse`: Undecodable response payloads
//! - `Error::Validation`: Input validation failures
//! - `Error::Io`: File system operations

use thiserror::Error;

/// Unified error type for the image server.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration errors (missing env vars, invalid values)
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The transform source was neither a URL nor a resolvable local path
    #[error("Source image not found: {0}")]
    SourceImageNotFound(String),

    /// Uploading the source image to the Files API failed
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// The response stream completed without any inline image data
    #[error("No image data found in the response stream")]
    NoImageReturned,

    /// Image generation failed upstream
    #[error("Image generation failed: {0}")]
    GenerationFailed(String),

    /// Image transformation failed upstream
    #[error("Image transformation failed: {0}")]
    TransformFailed(String),

    /// The requested tool is not registered
    #[error("Tool not found: {0}")]
    UnknownTool(String),

    /// API errors with endpoint and HTTP status context
    ///
    /// Includes the API endpoint that failed, HTTP status code, and error message
    /// for debugging and user feedback.
    #[error("API error for {endpoint} (HTTP {status_code}): {message}")]
    Api {
        /// The API endpoint that was called
        endpoint: String,
        /// HTTP status code returned by the API (0 when no response was received)
        status_code: u16,
        /// Error message from the API or describing the failure
        message: String,
    },

    /// A response payload could not be decoded
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// File system I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new API error with endpoint, status code, and message.
    ///
    /// # Example
    ///
    /// ```
    /// use gemini_image_mcp_common::error::Error;
    ///
    /// let err = Error::api(
    ///     "https://generativelanguage.googleapis.com/v1beta/models/m:streamGenerateContent",
    ///     500,
    ///     "Internal server error"
    /// );
    /// assert!(err.to_string().contains("generativelanguage.googleapis.com"));
    /// assert!(err.to_string().contains("500"));
    /// ```
    pub fn api(endpoint: impl Into<String>, status_code: u16, message: impl Into<String>) -> Self {
        Error::Api {
            endpoint: endpoint.into(),
            status_code,
            message: message.into(),
        }
    }

    /// Create a new validation error.
    ///
    /// # Example
    ///
    /// ```
    /// use gemini_image_mcp_common::error::Error;
    ///
    /// let err = Error::validation("prompt cannot be empty");
    /// assert!(err.to_string().contains("prompt cannot be empty"));
    /// ```
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Create a new source-not-found error for the given location.
    pub fn source_not_found(location: impl Into<String>) -> Self {
        Error::SourceImageNotFound(location.into())
    }

    /// Create a new upload failure.
    pub fn upload_failed(message: impl Into<String>) -> Self {
        Error::UploadFailed(message.into())
    }

    /// Create a new malformed response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedResponse(message.into())
    }

    /// Whether this error already names a specific failure kind that callers
    /// should see unchanged.
    pub fn is_classified(&self) -> bool {
        matches!(
            self,
            Error::Config(_)
                | Error::SourceImageNotFound(_)
                | Error::UploadFailed(_)
                | Error::NoImageReturned
                | Error::GenerationFailed(_)
                | Error::TransformFailed(_)
                | Error::UnknownTool(_)
                | Error::Validation(_)
        )
    }

    /// Wrap an unclassified error with `wrap`, keeping its message.
    ///
    /// Classified errors are returned as-is.
    ///
    /// # Example
    ///
    /// ```
    /// use gemini_image_mcp_common::error::Error;
    ///
    /// let err = Error::api("https://example.com", 503, "unavailable")
    ///     .wrap_upstream(Error::GenerationFailed);
    /// assert!(matches!(err, Error::GenerationFailed(ref m) if m.contains("503")));
    ///
    /// let err = Error::NoImageReturned.wrap_upstream(Error::GenerationFailed);
    /// assert!(matches!(err, Error::NoImageReturned));
    /// ```
    pub fn wrap_upstream(self, wrap: impl FnOnce(String) -> Error) -> Error {
        if self.is_classified() {
            self
        } else {
            wrap(self.to_string())
        }
    }
}

/// Configuration errors.
///
/// These errors occur when loading or validating configuration from
/// environment variables or configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set
    #[error("Required environment variable {0} is not set")]
    MissingEnvVar(String),

    /// An environment variable has an invalid value
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl ConfigError {
    /// Create a new missing environment variable error.
    pub fn missing_env_var(name: impl Into<String>) -> Self {
        ConfigError::MissingEnvVar(name.into())
    }

    /// Create a new invalid value error.
    pub fn invalid_value(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue(name.into(), reason.into())
    }
}

/// Result type alias using the unified Error type.
pub type Result<T> = std::result::Result<T, Error>;
