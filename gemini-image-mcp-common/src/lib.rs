//! Gemini Image MCP Common Library
//!
//! Shared configuration, error handling, tracing and transport utilities for
//! the Gemini image MCP server.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod error;
pub mod server;
pub mod tracing;
pub mod transport;


pub use config::Config;
pub use error::{ConfigError, Error, Result};
pub use server::{McpServerBuilder, ServerError, shutdown_channel};
pub use transport::{Transport, TransportArgs, TransportMode};
