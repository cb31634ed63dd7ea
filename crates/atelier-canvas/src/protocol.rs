//! Canvas Protocol Messages
//!
//! Pointer and toolbar events reach the compositor as [`CanvasCommand`]s and
//! each applied command yields a [`CanvasUpdate`]. The WebSocket API wraps
//! both in [`ClientMessage`] / [`ServerMessage`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::color::Color;
use crate::compositor::CanvasSnapshot;
use crate::export::ExportedImage;
use crate::raster::{Brush, Point};

/// A single event for the compositor state machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CanvasCommand {
    /// Append a layer and make it active
    AddLayer,
    /// Remove the active layer
    DeleteLayer,
    /// Clear the active layer
    ClearLayer,
    /// Highlight a layer in the layer list
    SelectLayer {
        /// Layer index
        index: usize,
    },
    /// Change the drawing target
    ActivateLayer {
        /// Layer index
        index: usize,
    },
    /// Change the brush color
    SetBrushColor {
        /// New color
        color: Color,
    },
    /// Change the brush width
    SetBrushWidth {
        /// New width in pixels
        width: u32,
    },
    /// Pointer down
    BeginStroke {
        /// Pointer position
        point: Point,
    },
    /// Pointer move
    ContinueStroke {
        /// Pointer position
        point: Point,
    },
    /// Pointer up
    EndStroke,
    /// Change the export background
    ChangeBackgroundColor {
        /// New color
        color: Color,
    },
    /// Change the canvas size
    ResizeCanvas {
        /// New width in pixels
        width: u32,
        /// New height in pixels
        height: u32,
    },
    /// Produce a composite export
    Export,
}

impl CanvasCommand {
    /// Whether this command is part of a pointer stroke
    #[must_use]
    pub fn is_pointer_event(&self) -> bool {
        matches!(
            self,
            Self::BeginStroke { .. } | Self::ContinueStroke { .. } | Self::EndStroke
        )
    }
}

/// Result of an applied command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CanvasUpdate {
    /// A layer was appended
    LayerAdded {
        /// Index of the new layer
        index: usize,
    },
    /// A layer was removed
    LayerDeleted {
        /// Index that was removed
        index: usize,
        /// Drawing target after removal
        active_layer: Option<usize>,
        /// Highlighted layer after removal
        selected_layer: Option<usize>,
    },
    /// A layer was cleared
    LayerCleared {
        /// Cleared layer
        index: usize,
    },
    /// Highlight changed
    LayerSelected {
        /// Highlighted layer
        index: usize,
    },
    /// Drawing target changed
    LayerActivated {
        /// New drawing target
        index: usize,
    },
    /// Brush settings changed
    BrushChanged {
        /// Current brush
        brush: Brush,
    },
    /// A stroke was opened
    StrokeStarted,
    /// A pointer move was processed
    StrokeContinued {
        /// Whether a stroke was open to receive it
        applied: bool,
    },
    /// Background color changed
    BackgroundChanged {
        /// New color
        color: Color,
    },
    /// Canvas size changed
    CanvasResized {
        /// New width
        width: u32,
        /// New height
        height: u32,
    },
    /// A composite image was produced
    Exported {
        /// The flattened canvas
        image: ExportedImage,
    },
}

/// Messages sent from client to server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Apply a compositor command
    Command {
        /// The command
        command: CanvasCommand,
    },
    /// Request the current state
    Sync,
    /// Ping to keep connection alive
    Ping,
}

/// Messages sent from server to client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Welcome message with session state
    Welcome {
        /// Session ID
        session_id: Uuid,
        /// Current compositor state
        state: CanvasSnapshot,
    },

    /// Full state sync
    State {
        /// Current compositor state
        state: CanvasSnapshot,
    },

    /// A command was applied
    Update {
        /// What changed
        update: CanvasUpdate,
        /// Who made the change
        source: UpdateSource,
    },

    /// Error message
    Error {
        /// Error code
        code: String,
        /// Error message
        message: String,
    },

    /// Pong response to ping
    Pong,
}

/// Source of an update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateSource {
    /// Update from the current connection
    User,
    /// Update from another connection on the same session
    OtherUser,
}

impl ServerMessage {
    /// Create an error message
    #[must_use]
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a welcome message
    #[must_use]
    pub fn welcome(session_id: Uuid, state: CanvasSnapshot) -> Self {
        Self::Welcome { session_id, state }
    }

    /// Create an update message
    #[must_use]
    pub fn update(update: CanvasUpdate, source: UpdateSource) -> Self {
        Self::Update { update, source }
    }
}
