//! Image assets and base64 encoding.

use crate::error::{ForgeError, Result};
use base64::Engine;
use std::path::{Path, PathBuf};

/// Maximum accepted input size, in bytes.
pub const MAX_ASSET_BYTES: u64 = 10 * 1024 * 1024;

/// Supported input image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG format.
    Png,
    /// JPEG format.
    Jpeg,
    /// GIF format.
    Gif,
    /// WebP format.
    WebP,
}

impl ImageFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::WebP => "webp",
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::WebP => "image/webp",
        }
    }

    /// Attempts to detect format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::WebP),
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

        // GIF: GIF87a or GIF89a
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some(Self::Gif);
        }

        // WebP: RIFF....WEBP
        if data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }

        None
    }
}

/// A base64-encoded image ready for transport.
///
/// Derived deterministically from an [`ImageAsset`]; immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// Declared MIME type, carried through from the asset unchanged.
    pub mime_type: String,
    /// Base64-encoded image bytes (standard alphabet, padded).
    pub base64_data: String,
}

impl EncodedImage {
    /// Returns the image as a data URL.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_data)
    }

    /// Decodes the base64 payload back to raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.base64_data)
            .map_err(|e| ForgeError::Decode(e.to_string()))
    }
}

#[derive(Debug)]
enum AssetSource {
    Path(PathBuf),
    Memory(Vec<u8>),
}

/// A user-supplied image with its declared MIME type.
///
/// Held only for the duration of one operation; dropped when the caller
/// removes or replaces it.
#[derive(Debug)]
pub struct ImageAsset {
    source: AssetSource,
    mime_type: String,
}

impl ImageAsset {
    /// Opens an image file, validating type and size up front.
    ///
    /// Accepts JPEG, PNG, GIF, and WebP, up to [`MAX_ASSET_BYTES`]. The file
    /// itself is read later, when the asset is encoded.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ImageFormat::from_extension)
            .ok_or_else(|| {
                ForgeError::InvalidAsset(format!(
                    "unsupported image type: {} (expected jpg, png, gif, or webp)",
                    path.display()
                ))
            })?;

        let len = std::fs::metadata(path)
            .map_err(|e| ForgeError::Read(format!("{}: {e}", path.display())))?
            .len();
        if len > MAX_ASSET_BYTES {
            return Err(ForgeError::InvalidAsset(format!(
                "{} is {len} bytes, limit is {MAX_ASSET_BYTES}",
                path.display()
            )));
        }

        Ok(Self {
            source: AssetSource::Path(path.to_path_buf()),
            mime_type: format.mime_type().to_string(),
        })
    }

    /// Wraps in-memory image bytes with a declared MIME type.
    pub fn from_bytes(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            source: AssetSource::Memory(bytes),
            mime_type: mime_type.into(),
        }
    }

    /// Returns the declared MIME type.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Reads the full binary content and encodes it as base64.
    ///
    /// A failed read is terminal for the enclosing operation; it is never
    /// retried here.
    pub async fn encode(&self) -> Result<EncodedImage> {
        let bytes = match &self.source {
            AssetSource::Path(path) => tokio::fs::read(path)
                .await
                .map_err(|e| ForgeError::Read(format!("{}: {e}", path.display())))?,
            AssetSource::Memory(bytes) => bytes.clone(),
        };

        Ok(EncodedImage {
            mime_type: self.mime_type.clone(),
            base64_data: base64::engine::general_purpose::STANDARD.encode(&bytes),
        })
    }
}
