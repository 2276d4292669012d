//! Core types for image editing.

use crate::error::{AccessorizeError, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Image formats the encoder recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG format (lossless).
    Png,
    /// JPEG format (lossy).
    Jpeg,
    /// WebP format (modern, efficient).
    WebP,
}

impl ImageFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    /// Attempts to detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Maps a MIME type back to a format.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.to_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 12 {
            return None;
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }

        None
    }
}

/// An image as base64 text paired with its media type.
///
/// Fields are private so a value cannot change after it is built; use
/// [`encode_bytes`](crate::edit::encode_bytes) or
/// [`encode_file`](crate::edit::encode_file) to make one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[must_use = "encoded image should be sent or saved"]
pub struct EncodedImage {
    data: String,
    mime_type: String,
}

impl EncodedImage {
    /// Wraps base64 data that was already encoded elsewhere (e.g. by the API).
    pub(crate) fn from_base64(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Returns the base64 payload.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Returns the declared MIME type.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Returns the known format for the declared MIME type, if any.
    pub fn format(&self) -> Option<ImageFormat> {
        ImageFormat::from_mime_type(&self.mime_type)
    }

    /// Decodes the payload back to raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.data)
            .map_err(|e| AccessorizeError::Decode(e.to_string()))
    }

    /// Returns the image as a data URL.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Decodes the image and writes it to the specified path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.decode()?)?;
        Ok(())
    }
}

/// One image plus the instruction to apply to it.
#[derive(Debug, Clone)]
pub struct EditRequest {
    image: EncodedImage,
    instruction: String,
}

impl EditRequest {
    /// Creates a request, rejecting blank instructions.
    pub fn new(image: EncodedImage, instruction: impl Into<String>) -> Result<Self> {
        let instruction = instruction.into();
        if instruction.trim().is_empty() {
            return Err(AccessorizeError::InvalidRequest(
                "instruction must not be empty".into(),
            ));
        }
        Ok(Self { image, instruction })
    }

    /// The image to edit.
    pub fn image(&self) -> &EncodedImage {
        &self.image
    }

    /// The edit instruction.
    pub fn instruction(&self) -> &str {
        &self.instruction
    }
}

/// The accessory presets offered to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Accessory {
    /// Dark sunglasses.
    #[default]
    Sunglasses,
    /// A striped party hat.
    PartyHat,
}

impl Accessory {
    /// Both presets, in display order.
    pub const ALL: [Accessory; 2] = [Accessory::Sunglasses, Accessory::PartyHat];

    /// Returns the instruction sent to the model.
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::Sunglasses => {
                "Add a pair of stylish dark sunglasses to the person in this photo. \
                 Keep their face, pose, lighting and the background unchanged."
            }
            Self::PartyHat => {
                "Put a colorful striped party hat on the person's head in this photo. \
                 Keep their face, pose, lighting and the background unchanged."
            }
        }
    }

    /// Returns the label shown next to the edited image.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sunglasses => "Wearing sunglasses",
            Self::PartyHat => "Wearing a party hat",
        }
    }
}

impl std::fmt::Display for Accessory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sunglasses => write!(f, "sunglasses"),
            Self::PartyHat => write!(f, "party-hat"),
        }
    }
}
