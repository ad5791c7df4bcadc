//! MCP Server implementation for the image server.
//!
//! This module provides the MCP server handler that exposes:
//! - `generate_image` tool for text-to-image generation
//! - `transform_image` tool for editing an existing image with a prompt

use crate::handler::{
    DEFAULT_GENERATE_OUTPUT_NAME, DEFAULT_TRANSFORM_OUTPUT_NAME, GenerateImageParams,
    ImageHandler, ImageResult, TransformImageParams,
};
use gemini_image_mcp_common::error::Error;
use rmcp::{
    model::{
        CallToolRequestParam, CallToolResult, Content, ErrorCode, ListToolsResult,
        PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
    },
    service::{RequestContext, RoleServer},
    ErrorData as McpError, ServerHandler,
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::borrow::Cow;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Name of the text-to-image tool.
pub const GENERATE_IMAGE_TOOL: &str = "generate_image";

/// Name of the image transformation tool.
pub const TRANSFORM_IMAGE_TOOL: &str = "transform_image";

/// MCP Server for image generation and transformation.
#[derive(Clone)]
pub struct ImageServer {
    /// Handler for image operations
    handler: Arc<ImageHandler>,
    /// Held for the duration of a tool call; one call runs at a time
    in_flight: Arc<Mutex<()>>,
}

/// Tool parameters wrapper for generate_image.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GenerateImageToolParams {
    /// Text prompt describing the image to generate
    pub prompt: String,
    /// Output file name without directory (default: generated_image). The
    /// extension is added from the image type when missing.
    #[serde(default)]
    pub output_name: Option<String>,
}

impl From<GenerateImageToolParams> for GenerateImageParams {
    fn from(params: GenerateImageToolParams) -> Self {
        Self {
            prompt: params.prompt,
            output_name: params
                .output_name
                .unwrap_or_else(|| DEFAULT_GENERATE_OUTPUT_NAME.to_string()),
        }
    }
}

/// Tool parameters wrapper for transform_image.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct TransformImageToolParams {
    /// Source image as an http(s) URL or a local file path
    pub image_source: String,
    /// Instructions describing how to transform the image
    pub prompt: String,
    /// Output file name without directory (default: transformed_image)
    #[serde(default)]
    pub output_name: Option<String>,
}

impl From<TransformImageToolParams> for TransformImageParams {
    fn from(params: TransformImageToolParams) -> Self {
        Self {
            image_source: params.image_source,
            prompt: params.prompt,
            output_name: params
                .output_name
                .unwrap_or_else(|| DEFAULT_TRANSFORM_OUTPUT_NAME.to_string()),
        }
    }
}

impl ImageServer {
    /// Create a new ImageServer around an initialized handler.
    pub fn new(handler: ImageHandler) -> Self {
        Self {
            handler: Arc::new(handler),
            in_flight: Arc::new(Mutex::new(())),
        }
    }

    /// The tools this server exposes.
    pub fn tools() -> Vec<Tool> {
        vec![
            Tool {
                name: Cow::Borrowed(GENERATE_IMAGE_TOOL),
                description: Some(Cow::Borrowed(
                    "Generate an image from a text prompt using Gemini. \
                     Saves the image and an HTML preview to the output directory \
                     and returns their paths with any text the model produced.",
                )),
                input_schema: input_schema::<GenerateImageToolParams>(),
                annotations: None,
                icons: None,
                meta: None,
                output_schema: None,
                title: None,
            },
            Tool {
                name: Cow::Borrowed(TRANSFORM_IMAGE_TOOL),
                description: Some(Cow::Borrowed(
                    "Transform an existing image according to a text prompt using Gemini. \
                     The source may be an http(s) URL or a local file path. \
                     Saves the result and an HTML preview to the output directory.",
                )),
                input_schema: input_schema::<TransformImageToolParams>(),
                annotations: None,
                icons: None,
                meta: None,
                output_schema: None,
                title: None,
            },
        ]
    }

    /// Run the tool named `name` with raw JSON arguments.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> Result<CallToolResult, McpError> {
        let _guard = self.in_flight.lock().await;
        debug!(tool = name, "Dispatching tool call");

        let result = match name {
            GENERATE_IMAGE_TOOL => {
                let params: GenerateImageToolParams = parse_arguments(arguments)?;
                info!(output_name = ?params.output_name, "Generating image");
                self.handler.generate_image(params.into()).await
            }
            TRANSFORM_IMAGE_TOOL => {
                let params: TransformImageToolParams = parse_arguments(arguments)?;
                info!(source = %params.image_source, output_name = ?params.output_name, "Transforming image");
                self.handler.transform_image(params.into()).await
            }
            other => Err(Error::UnknownTool(other.to_string())),
        };

        result.map(into_call_result).map_err(to_mcp_error)
    }
}

fn input_schema<T: JsonSchema>() -> Arc<serde_json::Map<String, serde_json::Value>> {
    let schema = schemars::schema_for!(T);
    match serde_json::to_value(&schema).unwrap_or_default() {
        serde_json::Value::Object(map) => Arc::new(map),
        _ => Arc::new(serde_json::Map::new()),
    }
}

fn parse_arguments<T: DeserializeOwned>(
    arguments: Option<serde_json::Map<String, serde_json::Value>>,
) -> Result<T, McpError> {
    arguments
        .map(|args| serde_json::from_value(serde_json::Value::Object(args)))
        .transpose()
        .map_err(|e| McpError::invalid_params(format!("Invalid parameters: {}", e), None))?
        .ok_or_else(|| McpError::invalid_params("Missing parameters", None))
}

fn into_call_result(result: ImageResult) -> CallToolResult {
    let mut call_result = CallToolResult::success(vec![Content::text(result.summary())]);
    call_result.structured_content = serde_json::to_value(&result).ok();
    call_result
}

/// Map a handler error onto the MCP error it is reported as.
pub fn to_mcp_error(err: Error) -> McpError {
    match err {
        Error::Validation(_) | Error::SourceImageNotFound(_) => {
            McpError::invalid_params(err.to_string(), None)
        }
        Error::UnknownTool(_) => McpError::new(ErrorCode::METHOD_NOT_FOUND, err.to_string(), None),
        other => McpError::internal_error(other.to_string(), None),
    }
}

impl ServerHandler for ImageServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Image generation server using the Google Gemini API. \
                 Use generate_image to create an image from a text prompt, \
                 and transform_image to edit an existing image from a URL or local path. \
                 Images and HTML previews are saved to the server's output directory."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _params: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        async move {
            Ok(ListToolsResult {
                tools: Self::tools(),
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn call_tool(
        &self,
        params: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move { self.dispatch(params.name.as_ref(), params.arguments).await }
    }
}
