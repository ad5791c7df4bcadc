//! Gemini API request/response types.
//!
//! Request types serialize to the camelCase JSON of the Generative Language
//! API. Response types are deliberately lenient: every field is optional so
//! that a frame missing its candidate, content or parts still deserializes
//! and can be skipped by the decoder instead of failing the stream.

use serde::{Deserialize, Serialize};

/// Conversation role for user turns.
pub const ROLE_USER: &str = "user";

/// Conversation role for model turns.
pub const ROLE_MODEL: &str = "model";

// =============================================================================
// Request Types
// =============================================================================

/// Request body for `streamGenerateContent`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Ordered conversation turns
    pub contents: Vec<Content>,
    /// Response shape configuration
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// Build a request asking for image and text output.
    pub fn image_and_text(contents: Vec<Content>) -> Self {
        Self {
            contents,
            generation_config: GenerationConfig::image_and_text(),
        }
    }
}

/// One conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Role (user or model)
    pub role: String,
    /// Ordered content parts
    pub parts: Vec<Part>,
}

impl Content {
    /// A user turn.
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: ROLE_USER.to_string(),
            parts,
        }
    }

    /// A model turn.
    pub fn model(parts: Vec<Part>) -> Self {
        Self {
            role: ROLE_MODEL.to_string(),
            parts,
        }
    }
}

/// Request content part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    /// Plain text
    Text { text: String },
    /// Inline binary data, base64 encoded
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
    /// Reference to a file previously uploaded through the Files API
    FileData {
        #[serde(rename = "fileData")]
        file_data: FileData,
    },
}

impl Part {
    /// A text part.
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    /// A reference to an uploaded file.
    pub fn file(mime_type: impl Into<String>, file_uri: impl Into<String>) -> Self {
        Part::FileData {
            file_data: FileData {
                mime_type: mime_type.into(),
                file_uri: file_uri.into(),
            },
        }
    }

    /// An inline image part with no bytes.
    ///
    /// Seeded into a model turn so the service answers with an image.
    pub fn empty_inline_image(mime_type: impl Into<String>) -> Self {
        Part::InlineData {
            inline_data: Blob {
                mime_type: mime_type.into(),
                data: String::new(),
            },
        }
    }
}

/// Inline binary payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    /// MIME type
    pub mime_type: String,
    /// Base64-encoded data
    pub data: String,
}

/// Uploaded file reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    /// MIME type of the uploaded file
    pub mime_type: String,
    /// URI returned by the Files API
    pub file_uri: String,
}

/// Generation configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Requested output modalities
    pub response_modalities: Vec<String>,
    /// MIME type of the text portion of the response
    pub response_mime_type: String,
}

impl GenerationConfig {
    /// Request both image and text output with plain-text text parts.
    pub fn image_and_text() -> Self {
        Self {
            response_modalities: vec!["image".to_string(), "text".to_string()],
            response_mime_type: "text/plain".to_string(),
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// One frame of a streamed `generateContent` response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Response candidates
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
}

impl GenerateContentResponse {
    /// Parts of the first candidate, or `None` if the frame lacks a
    /// candidate, content or parts.
    pub fn into_first_parts(self) -> Option<Vec<ResponsePart>> {
        self.candidates?.into_iter().next()?.content?.parts
    }
}

/// Response candidate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Candidate content
    #[serde(default)]
    pub content: Option<CandidateContent>,
    /// Why generation stopped, on the final frame
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Candidate content.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
    /// Role of the producer (normally "model")
    #[serde(default)]
    pub role: Option<String>,
    /// Content parts
    #[serde(default)]
    pub parts: Option<Vec<ResponsePart>>,
}

/// Response part: text, inline data, or something this server ignores.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    /// Text content
    #[serde(default)]
    pub text: Option<String>,
    /// Inline binary content
    #[serde(default)]
    pub inline_data: Option<InlineData>,
}

/// Inline data in a response part.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// Declared MIME type
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Base64-encoded data
    #[serde(default)]
    pub data: String,
}

/// Files API upload response.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadFileResponse {
    /// Uploaded file metadata
    #[serde(default)]
    pub file: Option<FileMetadata>,
}

/// Files API file metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    /// Resource name, e.g. `files/abc123`
    #[serde(default)]
    pub name: Option<String>,
    /// URI usable in a `fileData` part
    #[serde(default)]
    pub uri: Option<String>,
    /// MIME type recorded by the service
    #[serde(default)]
    pub mime_type: Option<String>,
}
