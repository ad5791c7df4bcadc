//! Media type and file extension helpers.

use std::path::Path;

/// MIME type assumed when a payload or source declares none we recognize.
pub const DEFAULT_IMAGE_MIME_TYPE: &str = "image/png";

/// Extension used when a MIME type has no known mapping.
pub const DEFAULT_IMAGE_EXTENSION: &str = "png";

const IMAGE_TYPES: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/webp", "webp"),
    ("image/gif", "gif"),
    ("image/heic", "heic"),
    ("image/heif", "heif"),
];

/// File extension (without dot) for an image MIME type.
///
/// Parameters such as `; charset=...` are ignored. Unknown types map to `png`.
pub fn extension_for_mime_type(mime_type: &str) -> &'static str {
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "image/jpg" | "image/pjpeg" => "jpg",
        other => IMAGE_TYPES
            .iter()
            .find(|(mime, _)| *mime == other)
            .map(|(_, ext)| *ext)
            .unwrap_or(DEFAULT_IMAGE_EXTENSION),
    }
}

/// Image MIME type for a file extension (without dot), if recognized.
pub fn mime_type_for_extension(extension: &str) -> Option<&'static str> {
    let ext = extension.to_ascii_lowercase();
    if ext == "jpeg" {
        return Some("image/jpeg");
    }
    IMAGE_TYPES
        .iter()
        .find(|(_, known)| *known == ext)
        .map(|(mime, _)| *mime)
}

/// Image MIME type guessed from a path's extension.
pub fn mime_type_for_path(path: &Path) -> Option<&'static str> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(mime_type_for_extension)
}

/// Output file name for `base` carrying the extension of `mime_type`.
///
/// The extension is appended only when `base` does not already end with it,
/// so `cat.png` stays `cat.png` for an `image/png` payload.
pub fn output_file_name(base: &str, mime_type: &str) -> String {
    let base = base.trim().trim_end_matches('.');
    let extension = extension_for_mime_type(mime_type);

    let current = Path::new(base)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let already_tagged = match current.as_deref() {
        Some(ext) if ext == extension => true,
        Some("jpeg") => extension == "jpg",
        _ => false,
    };

    if already_tagged {
        base.to_string()
    } else {
        format!("{}.{}", base, extension)
    }
}
