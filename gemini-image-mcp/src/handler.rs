//! Image generation and transformation handler.
//!
//! This module provides the `ImageHandler` struct and the parameter types for
//! the `generate_image` and `transform_image` operations. Both stream a
//! Gemini response, save the first returned image to the output directory,
//! write an HTML preview next to it and open the preview locally.

use crate::browser::BrowserLauncher;
use crate::decoder::{DecodedResponse, ResponseDecoder};
use crate::genai::GenAiClient;
use crate::media;
use crate::preview;
use crate::staging::FileStaging;
use crate::types::{Content, GenerateContentRequest, Part};
use gemini_image_mcp_common::config::Config;
use gemini_image_mcp_common::error::Error;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, instrument};

/// Default output name for generated images.
pub const DEFAULT_GENERATE_OUTPUT_NAME: &str = "generated_image";

/// Default output name for transformed images.
pub const DEFAULT_TRANSFORM_OUTPUT_NAME: &str = "transformed_image";

/// MIME type of the empty image seeded into the model turn of a transform.
const SEED_IMAGE_MIME_TYPE: &str = "image/png";

/// Text-to-image generation parameters.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct GenerateImageParams {
    /// Text prompt describing the image to generate.
    pub prompt: String,

    /// Base name of the saved file. The extension is added from the
    /// returned image type unless already present.
    #[serde(default = "default_generate_output_name")]
    pub output_name: String,
}

fn default_generate_output_name() -> String {
    DEFAULT_GENERATE_OUTPUT_NAME.to_string()
}

/// Image transformation parameters.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct TransformImageParams {
    /// Source image: an `http(s)://` URL or a local file path.
    pub image_source: String,

    /// Instructions describing how to change the image.
    pub prompt: String,

    /// Base name of the saved file.
    #[serde(default = "default_transform_output_name")]
    pub output_name: String,
}

fn default_transform_output_name() -> String {
    DEFAULT_TRANSFORM_OUTPUT_NAME.to_string()
}

/// Validation error details for tool parameters.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn validate_prompt(prompt: &str, errors: &mut Vec<ValidationError>) {
    if prompt.trim().is_empty() {
        errors.push(ValidationError {
            field: "prompt".to_string(),
            message: "Prompt cannot be empty".to_string(),
        });
    }
}

fn validate_output_name(name: &str, errors: &mut Vec<ValidationError>) {
    let trimmed = name.trim();
    let message = if trimmed.is_empty() {
        Some("Output name cannot be empty")
    } else if trimmed == "." || trimmed == ".." {
        Some("Output name cannot be '.' or '..'")
    } else if trimmed.ends_with('.') {
        Some("Output name cannot end with '.'")
    } else if trimmed.contains(['/', '\\']) {
        Some("Output name must be a file name without path separators")
    } else {
        None
    };

    if let Some(message) = message {
        errors.push(ValidationError {
            field: "output_name".to_string(),
            message: message.to_string(),
        });
    }
}

fn into_validation_error(errors: Vec<ValidationError>) -> Error {
    let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    Error::validation(messages.join("; "))
}

impl GenerateImageParams {
    /// Validate the parameters.
    ///
    /// # Returns
    /// - `Ok(())` if all parameters are valid
    /// - `Err(Vec<ValidationError>)` with all validation errors
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        validate_prompt(&self.prompt, &mut errors);
        validate_output_name(&self.output_name, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl TransformImageParams {
    /// Validate the parameters.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.image_source.trim().is_empty() {
            errors.push(ValidationError {
                field: "image_source".to_string(),
                message: "Image source cannot be empty".to_string(),
            });
        }
        validate_prompt(&self.prompt, &mut errors);
        validate_output_name(&self.output_name, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Outcome of a successful generate or transform call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageResult {
    /// Absolute path of the saved image
    pub image_path: PathBuf,
    /// Path of the HTML preview
    pub preview_path: PathBuf,
    /// MIME type declared for the image
    pub mime_type: String,
    /// Text returned alongside the image (possibly empty)
    pub text: String,
}

impl ImageResult {
    /// Human-readable one-paragraph summary.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Image saved to: {}\nPreview: {}",
            self.image_path.display(),
            self.preview_path.display()
        );
        if !self.text.trim().is_empty() {
            summary.push_str("\n\n");
            summary.push_str(self.text.trim());
        }
        summary
    }
}

/// Image handler for generation and transformation.
#[derive(Debug, Clone)]
pub struct ImageHandler {
    /// Server configuration
    pub config: Config,
    /// Gemini API client
    pub genai: GenAiClient,
    /// Output and temp file access
    pub staging: FileStaging,
    /// Preview opener
    pub browser: BrowserLauncher,
}

impl ImageHandler {
    /// Create a new ImageHandler and make sure its directories exist.
    ///
    /// # Errors
    /// Returns an error if the output or temp directory cannot be created.
    #[instrument(level = "debug", name = "image_handler_new", skip_all)]
    pub async fn new(config: Config) -> Result<Self, Error> {
        debug!("Initializing ImageHandler");
        let handler = Self::from_config(config);
        handler.staging.ensure_directories().await?;
        Ok(handler)
    }

    /// Build the handler without touching the filesystem.
    pub fn from_config(config: Config) -> Self {
        let http = reqwest::Client::new();
        let genai = GenAiClient::with_http(&config, http.clone());
        let staging = FileStaging::with_http(&config, http);
        let browser = BrowserLauncher::from_config(&config);
        Self::with_deps(config, genai, staging, browser)
    }

    /// Create a new ImageHandler with provided dependencies.
    pub fn with_deps(
        config: Config,
        genai: GenAiClient,
        staging: FileStaging,
        browser: BrowserLauncher,
    ) -> Self {
        Self {
            config,
            genai,
            staging,
            browser,
        }
    }

    /// Generate an image from a text prompt.
    ///
    /// # Returns
    /// * `Ok(ImageResult)` - Saved image and preview paths plus any text
    /// * `Err(Error)` - Validation failure, [`Error::NoImageReturned`], or
    ///   [`Error::GenerationFailed`] wrapping any other failure
    #[instrument(level = "info", name = "generate_image", skip(self, params), fields(output_name = %params.output_name))]
    pub async fn generate_image(&self, params: GenerateImageParams) -> Result<ImageResult, Error> {
        params.validate().map_err(into_validation_error)?;

        self.run_generate(&params)
            .await
            .map_err(|e| e.wrap_upstream(Error::GenerationFailed))
    }

    async fn run_generate(&self, params: &GenerateImageParams) -> Result<ImageResult, Error> {
        debug!(prompt = %params.prompt, "Generating image");

        let request = GenerateContentRequest::image_and_text(vec![Content::user(vec![
            Part::text(params.prompt.clone()),
        ])]);

        let decoded = self.stream(&request).await?;
        self.finish(decoded, &params.output_name).await
    }

    /// Transform an existing image according to a prompt.
    ///
    /// The source is staged into the temp directory and uploaded to the
    /// Files API. The staged copy is removed after the upload attempt
    /// whatever its outcome.
    #[instrument(level = "info", name = "transform_image", skip(self, params), fields(output_name = %params.output_name))]
    pub async fn transform_image(&self, params: TransformImageParams) -> Result<ImageResult, Error> {
        params.validate().map_err(into_validation_error)?;

        self.run_transform(&params)
            .await
            .map_err(|e| e.wrap_upstream(Error::TransformFailed))
    }

    async fn run_transform(&self, params: &TransformImageParams) -> Result<ImageResult, Error> {
        debug!(prompt = %params.prompt, source = %params.image_source, "Transforming image");

        let staged = self.staging.materialize_source(params.image_source.trim()).await?;
        let uploaded = self.genai.upload_file(&staged.path, &staged.mime_type).await;
        staged.discard().await;
        let uploaded = uploaded?;

        let request = GenerateContentRequest::image_and_text(vec![
            Content::user(vec![
                Part::file(uploaded.mime_type, uploaded.uri),
                Part::text(params.prompt.clone()),
            ]),
            Content::model(vec![Part::empty_inline_image(SEED_IMAGE_MIME_TYPE)]),
        ]);

        let decoded = self.stream(&request).await?;
        self.finish(decoded, &params.output_name).await
    }

    async fn stream(&self, request: &GenerateContentRequest) -> Result<DecodedResponse, Error> {
        info!(endpoint = %self.genai.stream_endpoint(), "Calling Gemini");
        let mut stream = self.genai.stream_generate_content(request).await?;
        ResponseDecoder::new().decode(&mut stream).await
    }

    /// Save the decoded image, write its preview and open it.
    async fn finish(&self, decoded: DecodedResponse, output_name: &str) -> Result<ImageResult, Error> {
        let image = decoded.image.ok_or(Error::NoImageReturned)?;

        let file_name = media::output_file_name(output_name, &image.mime_type);
        let image_path = self.staging.save_artifact(&image.data, &file_name).await?;

        let html = preview::render(&image_path);
        let preview_path = self.staging.save_preview(&html, &image_path).await?;
        self.browser.open(&preview_path).await;

        info!(path = %image_path.display(), mime_type = %image.mime_type, "Image ready");

        Ok(ImageResult {
            image_path,
            preview_path,
            mime_type: image.mime_type,
            text: decoded.text,
        })
    }
}
