//! Input abstraction layer.
//!
//! Normalizes browser pointer, context-menu and keyboard events into a
//! unified `InputEvent` enum. Coordinates are client (viewport) pixels;
//! [`CanvasFrame::to_local`] maps them onto the canvas.

use dd_core::id::ElementId;

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };
}

/// Which pointer button went down. Mirrors `MouseEvent.button`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Other,
}

impl PointerButton {
    pub fn from_index(button: i16) -> Self {
        match button {
            0 => PointerButton::Primary,
            2 => PointerButton::Secondary,
            _ => PointerButton::Other,
        }
    }
}

/// Where keyboard focus was when a key went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// Canvas, page body, or any non-editable node.
    Canvas,
    /// The editable text surface of a text block.
    EditableText(ElementId),
    /// `input`, `textarea`, `select` or any other contenteditable node.
    FormControl,
}

impl FocusTarget {
    pub fn is_editing(self) -> bool {
        !matches!(self, FocusTarget::Canvas)
    }
}

/// A normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown {
        x: f32,
        y: f32,
        button: PointerButton,
        modifiers: Modifiers,
    },
    PointerMove {
        x: f32,
        y: f32,
        modifiers: Modifiers,
    },
    PointerUp {
        x: f32,
        y: f32,
    },
    /// Right click (or the platform's context-menu gesture).
    ContextMenu {
        x: f32,
        y: f32,
    },
    /// `key` is the `KeyboardEvent.key` value (e.g. `"Delete"`).
    Key {
        key: String,
        modifiers: Modifiers,
        focus: FocusTarget,
    },
}

impl InputEvent {
    pub fn pointer_down(x: f32, y: f32) -> Self {
        Self::PointerDown {
            x,
            y,
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_move(x: f32, y: f32) -> Self {
        Self::PointerMove {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_up(x: f32, y: f32) -> Self {
        Self::PointerUp { x, y }
    }

    pub fn key(key: &str, focus: FocusTarget) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers: Modifiers::NONE,
            focus,
        }
    }

    /// Extract position if this is a pointer event.
    pub fn position(&self) -> Option<(f32, f32)> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y }
            | Self::ContextMenu { x, y } => Some((*x, *y)),
            Self::Key { .. } => None,
        }
    }

    /// The same event with its position mapped into canvas-local pixels.
    pub fn to_local(&self, frame: &CanvasFrame) -> Self {
        let mut out = self.clone();
        match &mut out {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y }
            | Self::ContextMenu { x, y } => (*x, *y) = frame.to_local(*x, *y),
            Self::Key { .. } => {}
        }
        out
    }
}

/// Where the canvas sits in the viewport, as last reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasFrame {
    /// Top-left corner in client pixels. `None` until the host measures it.
    pub origin: Option<(f32, f32)>,
    /// Measured width. `None` leaves drags unbounded horizontally.
    pub width: Option<f32>,
    pub height: f32,
}

impl CanvasFrame {
    pub fn new(height: f32) -> Self {
        Self {
            origin: None,
            width: None,
            height,
        }
    }

    /// Client → canvas-local. Without a known origin the client
    /// coordinate is used as is.
    pub fn to_local(&self, x: f32, y: f32) -> (f32, f32) {
        match self.origin {
            Some((ox, oy)) => (x - ox, y - oy),
            None => (x, y),
        }
    }
}
