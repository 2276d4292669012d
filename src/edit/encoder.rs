//! Turns local image files into [`EncodedImage`] values.

use crate::edit::types::{EncodedImage, ImageFormat};
use crate::error::{AccessorizeError, Result};
use base64::Engine;
use std::path::Path;

/// MIME type declared when neither extension nor content identify the file.
const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Encodes in-memory image bytes under the caller-declared MIME type.
pub fn encode_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Result<EncodedImage> {
    if bytes.is_empty() {
        return Err(AccessorizeError::Encoding("empty selection".into()));
    }
    Ok(EncodedImage::from_base64(
        base64::engine::general_purpose::STANDARD.encode(bytes),
        mime_type,
    ))
}

/// Reads a whole file and encodes it.
///
/// The MIME type comes from the file extension, then from the magic bytes.
/// Image types are expected but not enforced.
pub async fn encode_file(path: impl AsRef<Path>) -> Result<EncodedImage> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AccessorizeError::Encoding(format!("{}: {}", path.display(), e)))?;

    if bytes.is_empty() {
        return Err(AccessorizeError::Encoding(format!(
            "{}: file is empty",
            path.display()
        )));
    }

    let mime_type = declared_mime_type(path, &bytes);
    tracing::debug!(path = %path.display(), mime_type, size = bytes.len(), "encoded image file");
    encode_bytes(&bytes, mime_type)
}

fn declared_mime_type(path: &Path, bytes: &[u8]) -> &'static str {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(ImageFormat::from_extension)
        .or_else(|| ImageFormat::from_magic_bytes(bytes))
        .map(|f| f.mime_type())
        .unwrap_or(FALLBACK_MIME_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 12] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    #[test]
    fn test_encode_bytes_round_trips() {
        let bytes = b"\x00\x01\x02binary\xff\xfe";
        let image = encode_bytes(bytes, "image/webp").unwrap();
        assert_eq!(image.mime_type(), "image/webp");
        assert_eq!(image.decode().unwrap(), bytes);
    }

    #[test]
    fn test_encode_bytes_rejects_empty() {
        let err = encode_bytes(&[], "image/png").unwrap_err();
        assert!(matches!(err, AccessorizeError::Encoding(_)));
    }

    #[test]
    fn test_declared_mime_type_prefers_extension() {
        // Extension wins even when the content says otherwise.
        assert_eq!(
            declared_mime_type(Path::new("photo.jpg"), &PNG_MAGIC),
            "image/jpeg"
        );
        assert_eq!(
            declared_mime_type(Path::new("photo"), &PNG_MAGIC),
            "image/png"
        );
        assert_eq!(
            declared_mime_type(Path::new("notes.txt"), b"hello"),
            FALLBACK_MIME_TYPE
        );
    }
}
