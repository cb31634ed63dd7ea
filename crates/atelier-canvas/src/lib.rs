//! Atelier Canvas - Layered Paint Surface
//!
//! This crate provides the drawing surface for Atelier:
//! - Compositor: ordered layer stack, stroke sessions and flattening
//! - Raster: source-over blending and the round-cap stroke rasterizer
//! - Export: PNG encoding with base64 / data URL output
//! - Protocol: command/update messages for the compositor state machine
//! - Session: per-user canvas sessions
//! - WebSocket: real-time pointer event streaming
//! - Store: persistent painting storage
//! - Error: Error types for canvas operations
//!
//! ## Usage
//!
//! ```ignore
//! use atelier_canvas::{CanvasCommand, Compositor, Point};
//!
//! let mut canvas = Compositor::new();
//! canvas.apply(CanvasCommand::BeginStroke { point: Point::new(10.0, 10.0) })?;
//! canvas.apply(CanvasCommand::ContinueStroke { point: Point::new(80.0, 40.0) })?;
//! let exported = canvas.end_stroke()?;
//! println!("{}", exported.to_data_url());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod color;
pub mod compositor;
pub mod error;
pub mod export;
pub mod layer;
pub mod protocol;
pub mod raster;
pub mod session;
pub mod store;
pub mod websocket;

// Re-export main types
pub use color::Color;
pub use compositor::{CanvasSettings, CanvasSnapshot, Compositor};
pub use error::{Error, Result};
pub use export::{CompositeImage, ExportedImage};
pub use layer::Layer;
pub use protocol::{CanvasCommand, CanvasUpdate, ClientMessage, ServerMessage, UpdateSource};
pub use raster::{Brush, Point};
pub use session::{CanvasSession, CanvasSessionManager, SessionInfo};
pub use store::{Painting, PaintingStore};
pub use websocket::{canvas_ws_handler, BroadcastMessage, CanvasState};
