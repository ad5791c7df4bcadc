//! Gemini Image MCP Server Library
//!
//! This library provides image generation and transformation using the
//! Gemini API, exposed as MCP tools.

pub mod browser;
pub mod decoder;
pub mod genai;
pub mod handler;
pub mod media;
pub mod preview;
pub mod server;
pub mod sse;
pub mod staging;
pub mod types;

pub use handler::{GenerateImageParams, ImageHandler, ImageResult, TransformImageParams};
pub use server::ImageServer;
