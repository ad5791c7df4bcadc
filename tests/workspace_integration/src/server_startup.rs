//! Server startup integration tests.
//!
//! Tests that the MCP server can be instantiated from configuration and
//! provides correct server info.

use gemini_image_mcp_common::Config;
use std::collections::HashMap;
use std::path::Path;

/// Test configuration rooted at `root`, never reaching a real API.
fn test_config(root: &Path, remote_mode: bool) -> Config {
    let env: HashMap<&str, String> = HashMap::from([
        ("GEMINI_API_KEY", "test-key".to_string()),
        ("GEMINI_API_BASE_URL", "http://127.0.0.1:9".to_string()),
        ("REMOTE_MODE", remote_mode.to_string()),
        ("OUTPUT_DIR", "output".to_string()),
        ("TEMP_DIR", "temp".to_string()),
    ]);
    Config::from_lookup(root.to_path_buf(), |name| env.get(name).cloned())
        .expect("test configuration should be valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemini_image_mcp::{ImageHandler, ImageServer};
    use rmcp::ServerHandler;

    #[tokio::test]
    async fn test_image_server_startup() {
        let root = tempfile::tempdir().unwrap();
        let handler = ImageHandler::new(test_config(root.path(), true)).await.unwrap();
        let server = ImageServer::new(handler);
        let info = server.get_info();

        let instructions = info.instructions.as_ref().unwrap().to_lowercase();
        assert!(
            instructions.contains("image"),
            "Server instructions should mention 'image'"
        );
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_none());

        assert!(root.path().join("output").is_dir());
        assert!(root.path().join("temp").is_dir());
    }

    /// Local startup creates the output and temp directories.
    #[tokio::test]
    async fn test_startup_creates_directories() {
        let root = tempfile::tempdir().unwrap();
        ImageHandler::new(test_config(root.path(), false)).await.unwrap();

        assert!(root.path().join("output").is_dir());
        assert!(root.path().join("temp").is_dir());
    }

    #[test]
    fn test_remote_mode_disables_browser() {
        let root = tempfile::tempdir().unwrap();

        let handler = ImageHandler::from_config(test_config(root.path(), true));
        assert!(!handler.browser.is_enabled());

        let handler = ImageHandler::from_config(test_config(root.path(), false));
        assert!(handler.browser.is_enabled());
    }

    #[test]
    fn test_missing_api_key_is_rejected() {
        let result = Config::from_lookup(Path::new("/work").to_path_buf(), |_| None);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("GEMINI_API_KEY"));
    }
}
