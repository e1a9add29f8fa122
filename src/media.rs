// In-memory image representation shared by workflows and the gallery.
// Images travel as base64 payloads because that is what the AI service
// consumes and produces.

use std::fs;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StyloError};

/// An image held in memory: base64 payload (no data-URI prefix), MIME type,
/// and the original filename. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFile {
    pub base64: String,
    pub mime_type: String,
    pub name: String,
}

impl ImageFile {
    /// Build an ImageFile from an AI response payload.
    pub fn from_inline(base64: String, mime_type: String, name: String) -> Self {
        Self {
            base64,
            mime_type,
            name,
        }
    }

    /// Read a local file and encode it for upload.
    /// Only image extensions are accepted; anything else is rejected.
    pub fn from_path(path: &Path) -> Result<Self> {
        let mime_type = mime_for_path(path)
            .ok_or_else(|| StyloError::UnsupportedImage(path.display().to_string()))?;
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        Ok(Self {
            base64: BASE64.encode(&bytes),
            mime_type: mime_type.to_string(),
            name,
        })
    }

    /// Decode the payload back into raw bytes (for export).
    pub fn decode(&self) -> Result<Vec<u8>> {
        BASE64
            .decode(&self.base64)
            .map_err(|e| StyloError::Other(format!("Invalid image payload: {}", e)))
    }

    /// Approximate decoded size in bytes, without decoding.
    pub fn payload_size(&self) -> usize {
        self.base64.len() / 4 * 3
    }
}

/// Map a file extension to a MIME type. Returns None for non-image files.
fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

/// File extension for a MIME type, used when exporting to disk.
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/bmp" => "bmp",
        _ => "bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_from_path_encodes_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pixel.png");
        let bytes = [0x89u8, 0x50, 0x4e, 0x47];
        fs::File::create(&path)
            .unwrap()
            .write_all(&bytes)
            .unwrap();

        let image = ImageFile::from_path(&path).unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.name, "pixel.png");
        assert_eq!(image.decode().unwrap(), bytes);
    }

    #[test]
    fn test_from_path_rejects_non_image() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();

        let err = ImageFile::from_path(&path).unwrap_err();
        assert!(matches!(err, StyloError::UnsupportedImage(_)));
    }

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("a.JPG")), Some("image/jpeg"));
        assert_eq!(mime_for_path(Path::new("a.webp")), Some("image/webp"));
        assert_eq!(mime_for_path(Path::new("a.pdf")), None);
        assert_eq!(mime_for_path(Path::new("noext")), None);
    }

    #[test]
    fn test_decode_invalid_payload() {
        let image = ImageFile::from_inline("not base64!!".into(), "image/png".into(), "x".into());
        assert!(image.decode().is_err());
    }
}
