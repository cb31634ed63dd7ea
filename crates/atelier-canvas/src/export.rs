//! Composite image export
//!
//! Flattened canvases are encoded as PNG and handed to downstream
//! consumers as base64 or as a `data:` URL.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

use crate::error::{Error, Result};

/// Prefix of PNG data URLs
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// A flattened, PNG-encoded canvas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeImage {
    width: u32,
    height: u32,
    png: Vec<u8>,
}

impl CompositeImage {
    /// Encode a flattened buffer as PNG
    pub fn encode(image: &RgbaImage) -> Result<Self> {
        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(Self {
            width: image.width(),
            height: image.height(),
            png,
        })
    }

    /// Image width in pixels
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw PNG bytes
    #[must_use]
    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    /// Base64 of the PNG bytes (no prefix)
    #[must_use]
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.png)
    }

    /// `data:image/png;base64,...` URL
    #[must_use]
    pub fn to_data_url(&self) -> String {
        format!("{PNG_DATA_URL_PREFIX}{}", self.to_base64())
    }

    /// Decode back into pixels
    pub fn decode(&self) -> Result<RgbaImage> {
        let image = image::load_from_memory_with_format(&self.png, ImageFormat::Png)?;
        Ok(image.to_rgba8())
    }

    /// Parse a base64 payload or PNG data URL
    pub fn from_base64(data: &str) -> Result<Self> {
        let payload = data.strip_prefix(PNG_DATA_URL_PREFIX).unwrap_or(data);
        let png = STANDARD
            .decode(payload.trim())
            .map_err(|e| Error::Encoding(format!("invalid base64: {e}")))?;
        let image = image::load_from_memory_with_format(&png, ImageFormat::Png)?;
        Ok(Self {
            width: image.width(),
            height: image.height(),
            png,
        })
    }
}

/// Serializable form of an export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedImage {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// PNG data URL
    pub data_url: String,
}

impl From<&CompositeImage> for ExportedImage {
    fn from(image: &CompositeImage) -> Self {
        Self {
            width: image.width,
            height: image.height,
            data_url: image.to_data_url(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn sample() -> RgbaImage {
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(2, 1, Rgba([0, 0, 255, 128]));
        img
    }

    #[test]
    fn test_encode_produces_png() {
        let exported = CompositeImage::encode(&sample()).unwrap();
        assert_eq!(exported.width(), 3);
        assert_eq!(exported.height(), 2);
        assert_eq!(&exported.png_bytes()[1..4], b"PNG");
        assert_eq!(exported.decode().unwrap(), sample());
    }

    #[test]
    fn test_data_url_prefix() {
        let exported = CompositeImage::encode(&sample()).unwrap();
        let url = exported.to_data_url();
        assert!(url.starts_with("data:image/png;base64,iVBOR"));

        let parsed = CompositeImage::from_base64(&url).unwrap();
        assert_eq!(parsed, exported);
    }

    #[test]
    fn test_from_base64_rejects_non_png() {
        let err = CompositeImage::from_base64("aGVsbG8=").unwrap_err();
        assert_eq!(err.code(), "encoding_error");
        assert!(CompositeImage::from_base64("***").is_err());
    }

    #[test]
    fn test_exported_image_view() {
        let exported = CompositeImage::encode(&sample()).unwrap();
        let view = ExportedImage::from(&exported);
        assert_eq!(view.width, 3);
        assert_eq!(view.data_url, exported.to_data_url());
    }
}
