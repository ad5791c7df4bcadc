//! HTML preview documents for saved images.

use std::path::Path;

const TEMPLATE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Gemini Image Preview</title>
  <style>
    body { margin: 0; min-height: 100vh; display: flex; align-items: center; justify-content: center; background: #1e1e1e; }
    img { max-width: 95vw; max-height: 95vh; box-shadow: 0 4px 24px rgba(0, 0, 0, 0.5); }
  </style>
</head>
<body>
  <img src=""#;

const TEMPLATE_TAIL: &str = r#"" alt="Generated image">
</body>
</html>
"#;

/// Render the preview document for the image at `image_path`.
///
/// The path is inserted verbatim as a `file://` URL. Characters with special
/// meaning in HTML are not escaped.
pub fn render(image_path: &Path) -> String {
    let url = file_url(image_path);
    let mut html = String::with_capacity(TEMPLATE_HEAD.len() + url.len() + TEMPLATE_TAIL.len());
    html.push_str(TEMPLATE_HEAD);
    html.push_str(&url);
    html.push_str(TEMPLATE_TAIL);
    html
}

fn file_url(path: &Path) -> String {
    let display = path.to_string_lossy().replace('\\', "/");
    if display.starts_with('/') {
        format!("file://{}", display)
    } else {
        // Windows drive paths need the extra slash.
        format!("file:///{}", display)
    }
}
