//! Embedding local files as data URIs.

use base64::{engine::general_purpose::STANDARD, Engine};
use std::path::Path;

fn mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mov") => "video/quicktime",
        _ => "application/octet-stream",
    }
}

/// Reads `path` into a `data:<mime>;base64,...` URI.
pub fn data_uri(path: &Path) -> Result<String, std::io::Error> {
    let bytes = std::fs::read(path)?;
    Ok(format!(
        "data:{};base64,{}",
        mime_type(path),
        STANDARD.encode(bytes)
    ))
}

/// Either the literal value or the uploaded file.
pub fn value_or_upload(
    value: Option<String>,
    upload: Option<&Path>,
) -> Result<String, Box<dyn std::error::Error>> {
    match (value, upload) {
        (_, Some(path)) => match data_uri(path) {
            Ok(uri) => Ok(uri),
            Err(e) => Err(format!("Failed to read {}: {}", path.display(), e).into()),
        },
        (Some(value), None) => Ok(value),
        (None, None) => Err("a value or --upload FILE is required".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_data_uri_png() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("logo.PNG");
        std::fs::write(&path, b"abc").unwrap();

        assert_eq!(data_uri(&path).unwrap(), "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_unknown_extension() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("blob");
        std::fs::write(&path, b"").unwrap();

        assert_eq!(
            data_uri(&path).unwrap(),
            "data:application/octet-stream;base64,"
        );
    }

    #[test]
    fn test_upload_wins_over_value() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("intro.mp4");
        std::fs::write(&path, b"abc").unwrap();

        let value = value_or_upload(Some("ignored".into()), Some(&path)).unwrap();
        assert!(value.starts_with("data:video/mp4;base64,"));
        assert_eq!(value_or_upload(Some("x".into()), None).unwrap(), "x");
        assert!(value_or_upload(None, None).is_err());
    }

    #[test]
    fn test_missing_file_is_error() {
        let temp = TempDir::new().unwrap();
        let err = value_or_upload(None, Some(&temp.path().join("nope.png"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
