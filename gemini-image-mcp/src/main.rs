//! Gemini Image MCP Server
//!
//! MCP server for image generation and transformation using the Gemini API.

use anyhow::Result;
use clap::Parser;
use gemini_image_mcp::{ImageHandler, ImageServer};
use gemini_image_mcp_common::tracing::init_tracing;
use gemini_image_mcp_common::{Config, McpServerBuilder, TransportArgs};

/// Command-line arguments for the image server.
#[derive(Parser, Debug)]
#[command(name = "gemini-image-mcp")]
#[command(about = "MCP server for image generation and transformation using Gemini")]
struct Args {
    /// Transport configuration
    #[command(flatten)]
    transport: TransportArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    tracing::info!("gemini-image-mcp server starting...");

    // Parse command-line arguments
    let args = Args::parse();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        model = %config.model,
        remote_mode = config.remote_mode,
        output_dir = %config.output_dir.display(),
        temp_dir = %config.temp_dir.display(),
        "Configuration loaded"
    );

    // Create the server handler
    let handler = ImageHandler::new(config).await?;
    let server = ImageServer::new(handler);

    // Build and run the MCP server
    let transport = args.transport.into_transport();
    tracing::info!(transport = %transport, "Starting MCP server");

    McpServerBuilder::new(server)
        .with_transport(transport)
        .run()
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
