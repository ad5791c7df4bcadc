//! Reduction of a streamed response into one image and its accompanying text.

use crate::genai::GenerateContentStream;
use crate::media::DEFAULT_IMAGE_MIME_TYPE;
use crate::types::GenerateContentResponse;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use gemini_image_mcp_common::error::Error;
use tracing::debug;

/// Image bytes extracted from an inline data part.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    /// Decoded image bytes
    pub data: Vec<u8>,
    /// Declared MIME type
    pub mime_type: String,
}

/// Everything kept from a response stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedResponse {
    /// First inline image, if any
    pub image: Option<InlineImage>,
    /// All text parts concatenated in arrival order
    pub text: String,
}

/// Accumulates response frames.
///
/// Only the first non-empty inline image is kept; later ones are ignored.
#[derive(Debug, Default)]
pub struct ResponseDecoder {
    decoded: DecodedResponse,
    frames: usize,
}

impl ResponseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one frame into the result.
    ///
    /// Frames without candidate content are skipped. Fails only when an
    /// inline payload is not valid base64.
    pub fn push(&mut self, chunk: GenerateContentResponse) -> Result<(), Error> {
        self.frames += 1;
        let Some(parts) = chunk.into_first_parts() else {
            debug!(frame = self.frames, "Skipping frame without content parts");
            return Ok(());
        };

        for part in parts {
            if let Some(text) = part.text {
                self.decoded.text.push_str(&text);
            }

            let Some(inline) = part.inline_data else {
                continue;
            };
            if inline.data.is_empty() {
                continue;
            }
            if self.decoded.image.is_some() {
                debug!(frame = self.frames, "Ignoring additional inline image");
                continue;
            }

            let data = BASE64
                .decode(inline.data.as_bytes())
                .map_err(|e| Error::malformed(format!("Invalid base64 in inline data: {}", e)))?;
            let mime_type = inline
                .mime_type
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_IMAGE_MIME_TYPE.to_string());

            debug!(frame = self.frames, size = data.len(), mime_type = %mime_type, "Extracted inline image");
            self.decoded.image = Some(InlineImage { data, mime_type });
        }

        Ok(())
    }

    /// Finish decoding.
    pub fn finish(self) -> DecodedResponse {
        self.decoded
    }

    /// Drain `stream` to completion.
    pub async fn decode(mut self, stream: &mut GenerateContentStream) -> Result<DecodedResponse, Error> {
        while let Some(chunk) = stream.next_chunk().await {
            self.push(chunk?)?;
        }
        debug!(
            frames = self.frames,
            has_image = self.decoded.image.is_some(),
            text_len = self.decoded.text.len(),
            "Response stream complete"
        );
        Ok(self.finish())
    }
}
