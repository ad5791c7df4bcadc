//! Workspace-level integration tests for the Gemini image MCP server.
//!
//! These tests verify:
//! - The server can be constructed from configuration and reports its info
//! - Tool registration and schema generation
//! - Property-based tests for tool schema validity and input validation

pub mod input_validation;
pub mod server_startup;
pub mod tool_schema;
