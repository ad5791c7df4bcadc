//! MCP transport selection.
//!
//! The server speaks MCP over one of two transports:
//!
//! - **Stdio**: default; the host launches the server as a subprocess
//! - **HTTP**: streamable HTTP (with SSE responses) mounted at `/mcp`
//!
//! # Example
//!
//! ```ignore
//! use gemini_image_mcp_common::transport::TransportArgs;
//! use clap::Parser;
//!
//! #[derive(Parser)]
//! struct Args {
//!     #[command(flatten)]
//!     transport: TransportArgs,
//! }
//!
//! let transport = Args::parse().transport.into_transport();
//! ```

use clap::Args;
use std::fmt;
use std::net::IpAddr;

/// Default bind address for the HTTP transport.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Transport mode for MCP server communication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    /// Standard input/output transport (default).
    #[default]
    Stdio,
    /// Streamable HTTP transport bound to `host:port`.
    Http {
        /// Address to bind
        host: IpAddr,
        /// Port to listen on
        port: u16,
    },
}

impl Transport {
    /// Create a new stdio transport.
    pub fn stdio() -> Self {
        Transport::Stdio
    }

    /// Create a new HTTP transport bound to the given address.
    pub fn http(host: IpAddr, port: u16) -> Self {
        Transport::Http { host, port }
    }

    /// Check if this is a stdio transport.
    pub fn is_stdio(&self) -> bool {
        matches!(self, Transport::Stdio)
    }

    /// Check if this is an HTTP transport.
    pub fn is_http(&self) -> bool {
        matches!(self, Transport::Http { .. })
    }

    /// Get the port if this is a network transport.
    pub fn port(&self) -> Option<u16> {
        match self {
            Transport::Stdio => None,
            Transport::Http { port, .. } => Some(*port),
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Stdio => write!(f, "stdio"),
            Transport::Http { host, port } => write!(f, "http ({}:{})", host, port),
        }
    }
}

/// Command-line arguments for transport configuration.
#[derive(Args, Debug, Clone)]
pub struct TransportArgs {
    /// Transport mode: stdio or http ("sse" is accepted as an alias of http)
    #[arg(long, default_value = "stdio", value_parser = parse_transport_mode)]
    pub transport: TransportMode,

    /// Address to bind for the HTTP transport
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    pub host: IpAddr,

    /// Port for the HTTP transport (default: 8080, or from PORT env var)
    #[arg(long, env = "PORT", default_value = "8080")]
    pub port: u16,
}

/// Transport mode parsed from command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportMode {
    #[default]
    Stdio,
    Http,
}

pub(crate) fn parse_transport_mode(s: &str) -> Result<TransportMode, String> {
    match s.to_lowercase().as_str() {
        "stdio" => Ok(TransportMode::Stdio),
        // Streamable HTTP answers with SSE streams, so both names map here.
        "http" | "sse" => Ok(TransportMode::Http),
        _ => Err(format!(
            "Invalid transport mode '{}'. Valid options: stdio, http",
            s
        )),
    }
}

impl TransportArgs {
    /// Convert command-line arguments into a Transport configuration.
    pub fn into_transport(self) -> Transport {
        match self.transport {
            TransportMode::Stdio => Transport::Stdio,
            TransportMode::Http => Transport::Http {
                host: self.host,
                port: self.port,
            },
        }
    }
}

impl Default for TransportArgs {
    fn default() -> Self {
        Self {
            transport: TransportMode::Stdio,
            host: IpAddr::from([127, 0, 0, 1]),
            port: 8080,
        }
    }
}
