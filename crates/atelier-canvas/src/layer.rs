//! Canvas layers
//!
//! A layer is a fixed-size RGBA buffer. Its index in the compositor's stack
//! is both its identity and its paint order.

use image::RgbaImage;

/// An independently paintable raster buffer
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    buffer: RgbaImage,
}

impl Layer {
    /// Create a fully transparent layer
    #[must_use]
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            buffer: RgbaImage::new(width, height),
        }
    }

    /// Committed pixels of this layer
    #[must_use]
    pub fn buffer(&self) -> &RgbaImage {
        &self.buffer
    }

    /// Layer dimensions
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    /// Whether no pixel has any coverage
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.buffer.pixels().all(|p| p[3] == 0)
    }

    /// Replace the committed pixels (stroke commit)
    pub(crate) fn commit(&mut self, buffer: RgbaImage) {
        debug_assert_eq!(buffer.dimensions(), self.buffer.dimensions());
        self.buffer = buffer;
    }

    /// Reset to a transparent buffer of the same size
    pub(crate) fn clear(&mut self) {
        let (width, height) = self.buffer.dimensions();
        self.buffer = RgbaImage::new(width, height);
    }

    /// Pad or crop to new dimensions, keeping pixels anchored at the top-left
    pub(crate) fn resize(&mut self, width: u32, height: u32) {
        let mut resized = RgbaImage::new(width, height);
        let (old_width, old_height) = self.buffer.dimensions();
        for y in 0..old_height.min(height) {
            for x in 0..old_width.min(width) {
                resized.put_pixel(x, y, *self.buffer.get_pixel(x, y));
            }
        }
        self.buffer = resized;
    }
}
