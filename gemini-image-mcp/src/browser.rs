//! Opening previews in the host's default browser.

use gemini_image_mcp_common::config::Config;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Best-effort launcher for the platform's "open this file" command.
#[derive(Debug, Clone, Copy)]
pub struct BrowserLauncher {
    enabled: bool,
}

impl BrowserLauncher {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Enabled unless the server runs in remote mode.
    pub fn from_config(config: &Config) -> Self {
        Self::new(!config.remote_mode)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Open `path`. Never fails; problems are logged.
    pub async fn open(&self, path: &Path) {
        if !self.enabled {
            debug!(path = %path.display(), "Browser launch disabled");
            return;
        }

        // Child output must not reach our stdout, which may carry the MCP stream.
        let mut command = open_command(path);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        match command.status().await {
            Ok(status) if status.success() => {
                debug!(path = %path.display(), "Opened preview");
            }
            Ok(status) => {
                warn!(path = %path.display(), status = %status, "Browser command exited unsuccessfully");
            }
            Err(e) => {
                warn!(path = %path.display(), program = open_program(), error = %e, "Failed to launch browser");
            }
        }
    }
}

/// Name of the program used to open files on this platform.
pub fn open_program() -> &'static str {
    if cfg!(target_os = "windows") {
        "cmd"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

fn open_command(path: &Path) -> Command {
    let mut command = Command::new(open_program());
    if cfg!(target_os = "windows") {
        command.args(["/C", "start", ""]);
    }
    command.arg(path);
    command
}
