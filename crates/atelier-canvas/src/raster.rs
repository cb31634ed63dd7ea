//! Raster primitives
//!
//! Source-over blending and the freehand stroke rasterizer. A stroke is a
//! chain of capsules (segments swept by a disc of the brush radius), which
//! gives round caps and round joins. Each pixel is painted at most once per
//! stroke, so translucent brushes do not darken where segments overlap.

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Smallest accepted brush width in pixels
pub const MIN_BRUSH_WIDTH: u32 = 1;
/// Largest accepted brush width in pixels
pub const MAX_BRUSH_WIDTH: u32 = 50;

/// A pointer position in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal offset from the left edge
    pub x: f32,
    /// Vertical offset from the top edge
    pub y: f32,
}

impl Point {
    /// Create a point
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite numbers
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Brush parameters applied to every new stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brush {
    /// Stroke color
    pub color: Color,
    /// Stroke width in pixels
    pub width: u32,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 5,
        }
    }
}

/// Blend `src` over `dst` (straight alpha, source-over)
pub fn blend_over(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let sa = src[3];
    if sa == 0 {
        return;
    }
    if sa == 255 || dst[3] == 0 {
        *dst = src;
        return;
    }

    let sa = f32::from(sa) / 255.0;
    let da = f32::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);

    for c in 0..3 {
        let sc = f32::from(src[c]);
        let dc = f32::from(dst[c]);
        let value = (sc * sa + dc * da * (1.0 - sa)) / out_a;
        dst[c] = value.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

/// Flatten `top` onto `bottom`; both must share dimensions
pub fn composite_over(bottom: &mut RgbaImage, top: &RgbaImage) {
    debug_assert_eq!(bottom.dimensions(), top.dimensions());
    for (dst, src) in bottom.pixels_mut().zip(top.pixels()) {
        blend_over(dst, *src);
    }
}

/// Distance from `p` to the segment `a`-`b`
fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.x + t * dx, a.y + t * dy);
    ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt()
}

/// An in-progress freehand stroke
///
/// Segments are painted into a working copy of the target layer; the
/// layer's stored buffer is only replaced when the stroke is finished.
#[derive(Debug, Clone)]
pub struct Stroke {
    brush: Brush,
    last: Point,
    scratch: RgbaImage,
    covered: Vec<bool>,
    segments: usize,
}

impl Stroke {
    /// Start a stroke over `target`, painting the initial dot at `point`
    #[must_use]
    pub fn begin(target: &RgbaImage, brush: Brush, point: Point) -> Self {
        let (width, height) = target.dimensions();
        let mut stroke = Self {
            brush,
            last: point,
            scratch: target.clone(),
            covered: vec![false; width as usize * height as usize],
            segments: 0,
        };
        stroke.paint_segment(point, point);
        stroke
    }

    /// Extend the stroke to `point`; returns the number of newly painted pixels
    pub fn extend(&mut self, point: Point) -> usize {
        let from = self.last;
        self.last = point;
        self.segments += 1;
        self.paint_segment(from, point)
    }

    /// Number of segments added after the initial dot
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments
    }

    /// Working buffer including the uncommitted stroke
    #[must_use]
    pub fn preview(&self) -> &RgbaImage {
        &self.scratch
    }

    /// Consume the stroke, yielding the painted buffer
    #[must_use]
    pub fn finish(self) -> RgbaImage {
        self.scratch
    }

    fn paint_segment(&mut self, a: Point, b: Point) -> usize {
        let (width, height) = self.scratch.dimensions();
        if width == 0 || height == 0 || self.brush.color.is_transparent() {
            return 0;
        }

        let radius = self.brush.width as f32 / 2.0;
        let min_x = (a.x.min(b.x) - radius).floor();
        let max_x = (a.x.max(b.x) + radius).ceil();
        let min_y = (a.y.min(b.y) - radius).floor();
        let max_y = (a.y.max(b.y) + radius).ceil();

        // Entirely off-canvas
        if max_x < 0.0 || max_y < 0.0 || min_x >= width as f32 || min_y >= height as f32 {
            return 0;
        }

        let x0 = min_x.max(0.0) as u32;
        let y0 = min_y.max(0.0) as u32;
        let x1 = (max_x as u32).min(width - 1);
        let y1 = (max_y as u32).min(height - 1);

        let pixel = self.brush.color.to_pixel();
        let mut painted = 0;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let idx = y as usize * width as usize + x as usize;
                if self.covered[idx] {
                    continue;
                }
                let center = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                if distance_to_segment(center, a, b) <= radius {
                    self.covered[idx] = true;
                    blend_over(self.scratch.get_pixel_mut(x, y), pixel);
                    painted += 1;
                }
            }
        }
        painted
    }
}
