//! Layer Compositor
//!
//! The compositor owns an ordered stack of layers and flattens them on
//! demand into a PNG export. It is a single-owner state machine: callers
//! either use the methods directly or dispatch [`CanvasCommand`]s through
//! [`Compositor::apply`], one at a time.
//!
//! Index invariants:
//! - `active` and `selected` are `Some` exactly when the stack is non-empty,
//!   and always point at an existing layer.
//! - The active layer is the drawing target; the selected layer is the one
//!   highlighted in the layer list. They move independently.

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::export::{CompositeImage, ExportedImage};
use crate::layer::Layer;
use crate::protocol::{CanvasCommand, CanvasUpdate};
use crate::raster::{self, Brush, Point, Stroke, MAX_BRUSH_WIDTH, MIN_BRUSH_WIDTH};

/// Default canvas width
pub const DEFAULT_WIDTH: u32 = 1400;
/// Default canvas height
pub const DEFAULT_HEIGHT: u32 = 800;
/// Default upper bound for either canvas dimension
pub const DEFAULT_MAX_DIMENSION: u32 = 4096;

/// Initial settings for a new compositor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSettings {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Upper bound for either dimension
    pub max_dimension: u32,
    /// Background painted under all layers on export
    pub background: Color,
    /// Brush used by new strokes
    pub brush: Brush,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            max_dimension: DEFAULT_MAX_DIMENSION,
            background: Color::TRANSPARENT,
            brush: Brush::default(),
        }
    }
}

/// Point-in-time view of the compositor state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSnapshot {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Number of layers in the stack
    pub layer_count: usize,
    /// Drawing target
    pub active_layer: Option<usize>,
    /// Highlighted layer
    pub selected_layer: Option<usize>,
    /// Background color
    pub background: Color,
    /// Current brush
    pub brush: Brush,
    /// Whether a stroke is in progress
    pub stroking: bool,
}

/// Multi-layer paint surface
#[derive(Debug, Clone)]
pub struct Compositor {
    layers: Vec<Layer>,
    active: Option<usize>,
    selected: Option<usize>,
    width: u32,
    height: u32,
    max_dimension: u32,
    background: Color,
    brush: Brush,
    stroke: Option<Stroke>,
}

impl Compositor {
    /// Create a compositor with default settings and one empty layer
    #[must_use]
    pub fn new() -> Self {
        Self {
            layers: vec![Layer::transparent(DEFAULT_WIDTH, DEFAULT_HEIGHT)],
            active: Some(0),
            selected: Some(0),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            max_dimension: DEFAULT_MAX_DIMENSION,
            background: Color::TRANSPARENT,
            brush: Brush::default(),
            stroke: None,
        }
    }

    /// Create a compositor from explicit settings, with one empty layer
    pub fn with_settings(settings: CanvasSettings) -> Result<Self> {
        validate_dimensions(settings.width, settings.height, settings.max_dimension)?;
        validate_brush_width(settings.brush.width)?;
        Ok(Self {
            layers: vec![Layer::transparent(settings.width, settings.height)],
            active: Some(0),
            selected: Some(0),
            width: settings.width,
            height: settings.height,
            max_dimension: settings.max_dimension,
            background: settings.background,
            brush: settings.brush,
            stroke: None,
        })
    }

    /// Canvas dimensions
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of layers
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Whether the stack has no layers
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layer at `index`
    #[must_use]
    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    /// Index of the drawing target
    #[must_use]
    pub fn active_layer(&self) -> Option<usize> {
        self.active
    }

    /// Index of the highlighted layer
    #[must_use]
    pub fn selected_layer(&self) -> Option<usize> {
        self.selected
    }

    /// Background color
    #[must_use]
    pub fn background(&self) -> Color {
        self.background
    }

    /// Current brush
    #[must_use]
    pub fn brush(&self) -> Brush {
        self.brush
    }

    /// Whether a stroke session is open
    #[must_use]
    pub fn is_stroking(&self) -> bool {
        self.stroke.is_some()
    }

    /// Summary of the current state
    #[must_use]
    pub fn snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot {
            width: self.width,
            height: self.height,
            layer_count: self.layers.len(),
            active_layer: self.active,
            selected_layer: self.selected,
            background: self.background,
            brush: self.brush,
            stroking: self.stroke.is_some(),
        }
    }

    /// Append a transparent layer and make it the drawing target
    pub fn add_layer(&mut self) -> Result<usize> {
        self.ensure_idle("add a layer")?;
        self.layers.push(Layer::transparent(self.width, self.height));
        let index = self.layers.len() - 1;
        self.active = Some(index);
        if self.selected.is_none() {
            self.selected = Some(index);
        }
        debug!(index, layers = self.layers.len(), "Layer added");
        Ok(index)
    }

    /// Remove the active layer; returns the removed index
    ///
    /// The active index resets to the first remaining layer. Deleting the
    /// last layer leaves the compositor empty, with no active or selected
    /// layer, until [`Compositor::add_layer`] is called again.
    pub fn delete_layer(&mut self) -> Result<usize> {
        self.ensure_idle("delete a layer")?;
        let index = self.require_active()?;
        self.layers.remove(index);

        if self.layers.is_empty() {
            self.active = None;
            self.selected = None;
        } else {
            self.active = Some(0);
            self.selected = self.selected.map(|selected| match selected {
                s if s == index => 0,
                s if s > index => s - 1,
                s => s,
            });
        }
        debug!(index, layers = self.layers.len(), "Layer deleted");
        Ok(index)
    }

    /// Replace the active layer's pixels with a transparent buffer
    pub fn clear_layer(&mut self) -> Result<usize> {
        self.ensure_idle("clear a layer")?;
        let index = self.require_active()?;
        self.layers[index].clear();
        debug!(index, "Layer cleared");
        Ok(index)
    }

    /// Highlight a layer; the drawing target does not change
    pub fn select_layer(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.selected = Some(index);
        Ok(())
    }

    /// Make an existing layer the drawing target
    pub fn activate_layer(&mut self, index: usize) -> Result<()> {
        self.ensure_idle("change the active layer")?;
        self.check_index(index)?;
        self.active = Some(index);
        Ok(())
    }

    /// Set the color used by future strokes
    pub fn set_brush_color(&mut self, color: Color) {
        self.brush.color = color;
    }

    /// Set the width used by future strokes
    pub fn set_brush_width(&mut self, width: u32) -> Result<()> {
        validate_brush_width(width)?;
        self.brush.width = width;
        Ok(())
    }

    /// Pointer down: open a stroke on the active layer
    pub fn begin_stroke(&mut self, point: Point) -> Result<()> {
        validate_point(point)?;
        if self.stroke.is_some() {
            return Err(Error::invalid_state("stroke already in progress"));
        }
        let index = self.require_active()?;
        self.stroke = Some(Stroke::begin(self.layers[index].buffer(), self.brush, point));
        Ok(())
    }

    /// Pointer move: extend the open stroke
    ///
    /// Returns `false` when no stroke is open, in which case nothing changes.
    pub fn continue_stroke(&mut self, point: Point) -> Result<bool> {
        validate_point(point)?;
        match self.stroke.as_mut() {
            Some(stroke) => {
                stroke.extend(point);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Pointer up: commit the stroke into the active layer and export
    ///
    /// An export is produced even when no stroke was open.
    pub fn end_stroke(&mut self) -> Result<CompositeImage> {
        if let Some(stroke) = self.stroke.take() {
            let segments = stroke.segment_count();
            match self.active {
                Some(index) => {
                    self.layers[index].commit(stroke.finish());
                    debug!(index, segments, "Stroke committed");
                }
                None => return Err(Error::invalid_state("active layer vanished mid-stroke")),
            }
        }
        self.composite()
    }

    /// Update the background color; layer buffers are untouched
    pub fn change_background_color(&mut self, color: Color) {
        self.background = color;
    }

    /// Change the canvas size, padding or cropping every layer at the top-left
    pub fn resize_canvas(&mut self, width: u32, height: u32) -> Result<()> {
        validate_dimensions(width, height, self.max_dimension)?;
        self.ensure_idle("resize the canvas")?;
        for layer in &mut self.layers {
            layer.resize(width, height);
        }
        self.width = width;
        self.height = height;
        debug!(width, height, "Canvas resized");
        Ok(())
    }

    /// Flatten background and committed layers, lowest index first
    #[must_use]
    pub fn flatten(&self) -> RgbaImage {
        let mut out = RgbaImage::from_pixel(self.width, self.height, self.background.to_pixel());
        for layer in &self.layers {
            if layer.dimensions() != (self.width, self.height) || layer.is_blank() {
                continue;
            }
            raster::composite_over(&mut out, layer.buffer());
        }
        out
    }

    /// Flatten and encode as PNG
    pub fn composite(&self) -> Result<CompositeImage> {
        CompositeImage::encode(&self.flatten())
    }

    /// Dispatch a single command
    pub fn apply(&mut self, command: CanvasCommand) -> Result<CanvasUpdate> {
        let update = match command {
            CanvasCommand::AddLayer => CanvasUpdate::LayerAdded {
                index: self.add_layer()?,
            },
            CanvasCommand::DeleteLayer => {
                let index = self.delete_layer()?;
                CanvasUpdate::LayerDeleted {
                    index,
                    active_layer: self.active,
                    selected_layer: self.selected,
                }
            }
            CanvasCommand::ClearLayer => CanvasUpdate::LayerCleared {
                index: self.clear_layer()?,
            },
            CanvasCommand::SelectLayer { index } => {
                self.select_layer(index)?;
                CanvasUpdate::LayerSelected { index }
            }
            CanvasCommand::ActivateLayer { index } => {
                self.activate_layer(index)?;
                CanvasUpdate::LayerActivated { index }
            }
            CanvasCommand::SetBrushColor { color } => {
                self.set_brush_color(color);
                CanvasUpdate::BrushChanged { brush: self.brush }
            }
            CanvasCommand::SetBrushWidth { width } => {
                self.set_brush_width(width)?;
                CanvasUpdate::BrushChanged { brush: self.brush }
            }
            CanvasCommand::BeginStroke { point } => {
                self.begin_stroke(point)?;
                CanvasUpdate::StrokeStarted
            }
            CanvasCommand::ContinueStroke { point } => CanvasUpdate::StrokeContinued {
                applied: self.continue_stroke(point)?,
            },
            CanvasCommand::EndStroke => CanvasUpdate::Exported {
                image: ExportedImage::from(&self.end_stroke()?),
            },
            CanvasCommand::ChangeBackgroundColor { color } => {
                self.change_background_color(color);
                CanvasUpdate::BackgroundChanged { color }
            }
            CanvasCommand::ResizeCanvas { width, height } => {
                self.resize_canvas(width, height)?;
                CanvasUpdate::CanvasResized { width, height }
            }
            CanvasCommand::Export => CanvasUpdate::Exported {
                image: ExportedImage::from(&self.composite()?),
            },
        };
        Ok(update)
    }

    fn ensure_idle(&self, action: &str) -> Result<()> {
        if self.stroke.is_some() {
            return Err(Error::invalid_state(format!(
                "cannot {action} while a stroke is in progress"
            )));
        }
        Ok(())
    }

    fn require_active(&self) -> Result<usize> {
        self.active
            .filter(|&index| index < self.layers.len())
            .ok_or_else(|| Error::invalid_state("no active layer"))
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.layers.len() {
            return Err(Error::invalid_state(format!(
                "layer index {index} out of range ({} layers)",
                self.layers.len()
            )));
        }
        Ok(())
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_dimensions(width: u32, height: u32, max_dimension: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::invalid_argument(format!(
            "canvas dimensions must be positive, got {width}x{height}"
        )));
    }
    if width > max_dimension || height > max_dimension {
        return Err(Error::invalid_argument(format!(
            "canvas dimensions {width}x{height} exceed the {max_dimension}px limit"
        )));
    }
    Ok(())
}

fn validate_brush_width(width: u32) -> Result<()> {
    if !(MIN_BRUSH_WIDTH..=MAX_BRUSH_WIDTH).contains(&width) {
        return Err(Error::invalid_argument(format!(
            "brush width must be between {MIN_BRUSH_WIDTH} and {MAX_BRUSH_WIDTH}, got {width}"
        )));
    }
    Ok(())
}

fn validate_point(point: Point) -> Result<()> {
    if !point.is_finite() {
        return Err(Error::invalid_argument("stroke point must be finite"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const RED: Color = Color::rgb(255, 0, 0);
    const BLUE: Color = Color::rgb(0, 0, 255);

    fn small() -> Compositor {
        Compositor::with_settings(CanvasSettings {
            width: 40,
            height: 30,
            ..CanvasSettings::default()
        })
        .unwrap()
    }

    fn paint_line(c: &mut Compositor, color: Color, from: Point, to: Point) {
        c.set_brush_color(color);
        c.begin_stroke(from).unwrap();
        c.continue_stroke(to).unwrap();
        c.end_stroke().unwrap();
    }

    #[test]
    fn test_new_compositor_defaults() {
        let c = Compositor::new();
        assert_eq!(c.dimensions(), (1400, 800));
        assert_eq!(c.layer_count(), 1);
        assert_eq!(c.active_layer(), Some(0));
        assert_eq!(c.selected_layer(), Some(0));
        assert_eq!(c.brush(), Brush::default());
        assert!(c.background().is_transparent());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let err = Compositor::with_settings(CanvasSettings {
            width: 0,
            ..CanvasSettings::default()
        })
        .unwrap_err();
        assert_eq!(err.code(), "invalid_argument");

        let err = Compositor::with_settings(CanvasSettings {
            brush: Brush {
                color: Color::BLACK,
                width: 0,
            },
            ..CanvasSettings::default()
        })
        .unwrap_err();
        assert_eq!(err.code(), "invalid_argument");
    }

    #[test]
    fn test_add_layer_becomes_active() {
        let mut c = small();
        let index = c.add_layer().unwrap();
        assert_eq!(index, 1);
        assert_eq!(c.active_layer(), Some(1));
        // Selection is independent of the drawing target
        assert_eq!(c.selected_layer(), Some(0));
        assert!(c.layer(1).unwrap().is_blank());
        assert_eq!(c.layer(1).unwrap().dimensions(), (40, 30));
    }

    #[test]
    fn test_delete_resets_active_to_first() {
        let mut c = small();
        c.add_layer().unwrap();
        c.add_layer().unwrap();
        c.select_layer(2).unwrap();

        assert_eq!(c.delete_layer().unwrap(), 2);
        assert_eq!(c.layer_count(), 2);
        assert_eq!(c.active_layer(), Some(0));
        assert_eq!(c.selected_layer(), Some(0));
    }

    #[test]
    fn test_delete_keeps_selection_on_same_layer() {
        let mut c = small();
        c.add_layer().unwrap();
        c.add_layer().unwrap();
        c.select_layer(2).unwrap();
        c.activate_layer(1).unwrap();

        c.delete_layer().unwrap();
        assert_eq!(c.selected_layer(), Some(1));
    }

    #[test]
    fn test_delete_last_layer_enters_empty_state() {
        let mut c = small();
        c.delete_layer().unwrap();
        assert!(c.is_empty());
        assert_eq!(c.active_layer(), None);
        assert_eq!(c.selected_layer(), None);

        let err = c.delete_layer().unwrap_err();
        assert_eq!(err.code(), "invalid_state");
        assert!(c.clear_layer().is_err());
        assert!(c.begin_stroke(Point::new(1.0, 1.0)).is_err());

        // Export still works and yields the background only
        c.change_background_color(Color::WHITE);
        let flat = c.composite().unwrap().decode().unwrap();
        assert!(flat.pixels().all(|p| *p == Rgba([255, 255, 255, 255])));

        c.add_layer().unwrap();
        assert_eq!(c.active_layer(), Some(0));
        assert_eq!(c.selected_layer(), Some(0));
    }

    #[test]
    fn test_active_index_always_valid() {
        let mut c = small();
        let ops = [true, true, false, true, false, false, false, false, true, false];
        for add in ops {
            let _ = if add {
                c.add_layer().map(|_| ())
            } else {
                c.delete_layer().map(|_| ())
            };
            match c.active_layer() {
                Some(i) => assert!(i < c.layer_count()),
                None => assert!(c.is_empty()),
            }
            match c.selected_layer() {
                Some(i) => assert!(i < c.layer_count()),
                None => assert!(c.is_empty()),
            }
        }
    }

    #[test]
    fn test_select_out_of_range() {
        let mut c = small();
        let err = c.select_layer(3).unwrap_err();
        assert_eq!(err.code(), "invalid_state");
        assert!(c.activate_layer(1).is_err());
    }

    #[test]
    fn test_stroke_commits_on_end() {
        let mut c = small();
        c.begin_stroke(Point::new(5.0, 5.0)).unwrap();
        assert!(c.continue_stroke(Point::new(20.0, 5.0)).unwrap());
        assert!(c.is_stroking());
        // Uncommitted strokes are invisible to export
        assert!(c.layer(0).unwrap().is_blank());

        let exported = c.end_stroke().unwrap();
        assert!(!c.is_stroking());
        assert!(!c.layer(0).unwrap().is_blank());

        let flat = exported.decode().unwrap();
        assert_eq!(*flat.get_pixel(10, 5), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_continue_without_begin_is_noop() {
        let mut c = small();
        assert!(!c.continue_stroke(Point::new(3.0, 3.0)).unwrap());
        assert!(c.layer(0).unwrap().is_blank());
        // Pointer-up with no open stroke still exports
        assert!(c.end_stroke().is_ok());
    }

    #[test]
    fn test_double_begin_rejected() {
        let mut c = small();
        c.begin_stroke(Point::new(1.0, 1.0)).unwrap();
        let err = c.begin_stroke(Point::new(2.0, 2.0)).unwrap_err();
        assert_eq!(err.code(), "invalid_state");
    }

    #[test]
    fn test_structural_ops_blocked_mid_stroke() {
        let mut c = small();
        c.begin_stroke(Point::new(1.0, 1.0)).unwrap();
        assert!(c.add_layer().is_err());
        assert!(c.delete_layer().is_err());
        assert!(c.clear_layer().is_err());
        assert!(c.resize_canvas(10, 10).is_err());
        // Selection is presentation state and stays available
        assert!(c.select_layer(0).is_ok());
    }

    #[test]
    fn test_non_finite_point_rejected() {
        let mut c = small();
        let err = c.begin_stroke(Point::new(f32::NAN, 1.0)).unwrap_err();
        assert_eq!(err.code(), "invalid_argument");
    }

    #[test]
    fn test_stroke_outside_canvas_leaves_layer_unchanged() {
        let mut c = small();
        let before = c.layer(0).unwrap().clone();
        paint_line(&mut c, RED, Point::new(-100.0, -100.0), Point::new(-60.0, 500.0));
        paint_line(&mut c, RED, Point::new(200.0, 10.0), Point::new(300.0, 20.0));
        assert_eq!(c.layer(0).unwrap(), &before);
    }

    #[test]
    fn test_composite_is_idempotent() {
        let mut c = small();
        paint_line(&mut c, RED, Point::new(2.0, 2.0), Point::new(30.0, 20.0));
        c.change_background_color(Color::WHITE);

        let first = c.composite().unwrap();
        let second = c.composite().unwrap();
        assert_eq!(first.png_bytes(), second.png_bytes());
    }

    #[test]
    fn test_later_layer_wins_in_overlap() {
        let mut c = small();
        paint_line(&mut c, RED, Point::new(5.0, 15.0), Point::new(35.0, 15.0));
        c.add_layer().unwrap();
        paint_line(&mut c, BLUE, Point::new(20.0, 2.0), Point::new(20.0, 28.0));

        let flat = c.flatten();
        assert_eq!(*flat.get_pixel(20, 15), Rgba([0, 0, 255, 255]));
        assert_eq!(*flat.get_pixel(8, 15), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_clear_hides_only_active_layer() {
        let mut c = small();
        paint_line(&mut c, RED, Point::new(5.0, 5.0), Point::new(35.0, 5.0));
        c.add_layer().unwrap();
        paint_line(&mut c, BLUE, Point::new(5.0, 25.0), Point::new(35.0, 25.0));

        c.clear_layer().unwrap();
        let flat = c.composite().unwrap().decode().unwrap();
        assert_eq!(flat.get_pixel(20, 25)[3], 0);
        assert_eq!(*flat.get_pixel(20, 5), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_background_is_export_only() {
        let mut c = small();
        c.change_background_color(Color::rgb(10, 20, 30));
        assert!(c.layer(0).unwrap().is_blank());
        assert_eq!(*c.flatten().get_pixel(0, 0), Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_resize_pads_existing_layers() {
        let mut c = small();
        paint_line(&mut c, RED, Point::new(2.0, 2.0), Point::new(4.0, 2.0));
        c.resize_canvas(80, 60).unwrap();

        assert_eq!(c.dimensions(), (80, 60));
        assert_eq!(c.layer(0).unwrap().dimensions(), (80, 60));
        assert_eq!(*c.flatten().get_pixel(3, 2), Rgba([255, 0, 0, 255]));
        let added = c.add_layer().unwrap();
        assert_eq!(c.layer(added).unwrap().dimensions(), (80, 60));
    }

    #[test]
    fn test_resize_rejects_bad_dimensions() {
        let mut c = small();
        assert_eq!(c.resize_canvas(0, 10).unwrap_err().code(), "invalid_argument");
        assert_eq!(
            c.resize_canvas(DEFAULT_MAX_DIMENSION + 1, 10).unwrap_err().code(),
            "invalid_argument"
        );
        assert_eq!(c.dimensions(), (40, 30));
    }

    #[test]
    fn test_brush_width_bounds() {
        let mut c = small();
        assert!(c.set_brush_width(50).is_ok());
        assert!(c.set_brush_width(51).is_err());
        assert!(c.set_brush_width(0).is_err());
        assert_eq!(c.brush().width, 50);
    }

    #[test]
    fn test_apply_dispatches_commands() {
        let mut c = small();
        let update = c.apply(CanvasCommand::AddLayer).unwrap();
        assert_eq!(update, CanvasUpdate::LayerAdded { index: 1 });

        c.apply(CanvasCommand::BeginStroke {
            point: Point::new(10.0, 10.0),
        })
        .unwrap();
        let update = c
            .apply(CanvasCommand::ContinueStroke {
                point: Point::new(12.0, 10.0),
            })
            .unwrap();
        assert_eq!(update, CanvasUpdate::StrokeContinued { applied: true });

        match c.apply(CanvasCommand::EndStroke).unwrap() {
            CanvasUpdate::Exported { image } => {
                assert_eq!((image.width, image.height), (40, 30));
                assert!(image.data_url.starts_with("data:image/png;base64,"));
            }
            other => unreachable!("Expected Exported update, got {:?}", other),
        }

        let update = c.apply(CanvasCommand::DeleteLayer).unwrap();
        assert_eq!(
            update,
            CanvasUpdate::LayerDeleted {
                index: 1,
                active_layer: Some(0),
                selected_layer: Some(0),
            }
        );
    }
}
