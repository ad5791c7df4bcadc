//! Gemini Generative Language API client.
//!
//! Two calls are needed: a streamed `generateContent` and the resumable
//! Files API upload used to hand a source image to the model.

use crate::sse::SseBuffer;
use crate::types::{GenerateContentRequest, GenerateContentResponse, UploadFileResponse};
use futures_util::stream::BoxStream;
use futures_util::{Stream, StreamExt};
use gemini_image_mcp_common::config::Config;
use gemini_image_mcp_common::error::Error;
use std::collections::VecDeque;
use std::path::Path;
use tracing::{debug, info, warn};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Response header naming the resumable upload session URL.
const UPLOAD_URL_HEADER: &str = "x-goog-upload-url";

/// A file stored by the Files API.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    /// Resource name, e.g. `files/abc123`
    pub name: Option<String>,
    /// URI to reference in a `fileData` part
    pub uri: String,
    /// MIME type recorded for the file
    pub mime_type: String,
}

/// Client for the Gemini REST API.
#[derive(Clone)]
pub struct GenAiClient {
    http: reqwest::Client,
    api_key: String,
    stream_endpoint: String,
    upload_endpoint: String,
}

impl GenAiClient {
    /// Create a client for the configured model and base URL.
    pub fn new(config: &Config) -> Self {
        Self::with_http(config, reqwest::Client::new())
    }

    /// Create a client with a provided HTTP client.
    pub fn with_http(config: &Config, http: reqwest::Client) -> Self {
        Self {
            http,
            api_key: config.api_key.clone(),
            stream_endpoint: config.stream_generate_endpoint(),
            upload_endpoint: config.upload_endpoint(),
        }
    }

    /// Streamed generation endpoint this client calls.
    pub fn stream_endpoint(&self) -> &str {
        &self.stream_endpoint
    }

    /// Start a streamed `generateContent` call.
    ///
    /// Returns once response headers arrive; frames are read lazily from the
    /// returned stream.
    pub async fn stream_generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentStream, Error> {
        let endpoint = &self.stream_endpoint;
        debug!(endpoint = %endpoint, turns = request.contents.len(), "Calling streamGenerateContent");

        let response = self
            .http
            .post(endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| Error::api(endpoint, 0, format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::api(endpoint, status.as_u16(), body));
        }

        let body = response.bytes_stream().map(|chunk| chunk.map(|b| b.to_vec()));
        Ok(GenerateContentStream::from_byte_stream(endpoint.clone(), body))
    }

    /// Upload a local file with the resumable Files API protocol.
    ///
    /// Every failure after the file has been read is reported as
    /// [`Error::UploadFailed`].
    pub async fn upload_file(&self, path: &Path, mime_type: &str) -> Result<UploadedFile, Error> {
        let bytes = tokio::fs::read(path).await?;
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        debug!(path = %path.display(), size = bytes.len(), mime_type, "Starting resumable upload");

        let start = self
            .http
            .post(&self.upload_endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", bytes.len().to_string())
            .header("X-Goog-Upload-Header-Content-Type", mime_type)
            .json(&serde_json::json!({ "file": { "display_name": display_name } }))
            .send()
            .await
            .map_err(|e| Error::upload_failed(format!("Upload start request failed: {}", e)))?;

        let status = start.status();
        if !status.is_success() {
            let body = start.text().await.unwrap_or_default();
            return Err(Error::upload_failed(format!(
                "Upload start returned HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        let session_url = start
            .headers()
            .get(UPLOAD_URL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| Error::upload_failed("Upload start response has no upload URL"))?;

        let finalize = self
            .http
            .post(&session_url)
            .header(API_KEY_HEADER, &self.api_key)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(bytes)
            .send()
            .await
            .map_err(|e| Error::upload_failed(format!("Upload request failed: {}", e)))?;

        let status = finalize.status();
        if !status.is_success() {
            let body = finalize.text().await.unwrap_or_default();
            return Err(Error::upload_failed(format!(
                "Upload returned HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        let parsed: UploadFileResponse = finalize
            .json()
            .await
            .map_err(|e| Error::upload_failed(format!("Failed to parse upload response: {}", e)))?;

        let file = parsed
            .file
            .ok_or_else(|| Error::upload_failed("Upload response has no file"))?;
        let uri = file
            .uri
            .filter(|u| !u.is_empty())
            .ok_or_else(|| Error::upload_failed("Upload response has no file URI"))?;

        info!(uri = %uri, "Uploaded source image");

        Ok(UploadedFile {
            name: file.name,
            uri,
            mime_type: file
                .mime_type
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| mime_type.to_string()),
        })
    }
}

/// Frames of a streamed `generateContent` response.
pub struct GenerateContentStream {
    endpoint: String,
    body: BoxStream<'static, reqwest::Result<Vec<u8>>>,
    frames: SseBuffer,
    pending: VecDeque<String>,
    finished: bool,
}

impl GenerateContentStream {
    /// Wrap a raw SSE byte stream.
    pub fn from_byte_stream<S>(endpoint: impl Into<String>, body: S) -> Self
    where
        S: Stream<Item = reqwest::Result<Vec<u8>>> + Send + 'static,
    {
        Self {
            endpoint: endpoint.into(),
            body: body.boxed(),
            frames: SseBuffer::new(),
            pending: VecDeque::new(),
            finished: false,
        }
    }

    /// Next parsed frame, or `None` once the body is exhausted.
    ///
    /// Event payloads that are not valid JSON are skipped. A failed body
    /// read ends the stream with an [`Error::Api`].
    pub async fn next_chunk(&mut self) -> Option<Result<GenerateContentResponse, Error>> {
        loop {
            while let Some(payload) = self.pending.pop_front() {
                match serde_json::from_str::<GenerateContentResponse>(&payload) {
                    Ok(chunk) => return Some(Ok(chunk)),
                    Err(e) => warn!(error = %e, "Skipping malformed stream frame"),
                }
            }

            if self.finished {
                return None;
            }

            match self.body.next().await {
                Some(Ok(bytes)) => self.pending.extend(self.frames.push(&bytes)),
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(Error::api(
                        &self.endpoint,
                        0,
                        format!("Failed to read response stream: {}", e),
                    )));
                }
                None => {
                    self.finished = true;
                    self.pending.extend(self.frames.finish());
                }
            }
        }
    }
}

impl std::fmt::Debug for GenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenAiClient")
            .field("stream_endpoint", &self.stream_endpoint)
            .field("upload_endpoint", &self.upload_endpoint)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for GenerateContentStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerateContentStream")
            .field("endpoint", &self.endpoint)
            .field("pending", &self.pending.len())
            .field("finished", &self.finished)
            .finish()
    }
}
