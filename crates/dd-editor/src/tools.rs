//! Canvas pointer tool: select, drag and corner resize.
//!
//! The tool translates pointer events plus a [`Hit`] into `EditorMutation`s.
//! Drags and resizes keep a live preview box in the tool and write to the
//! model only when the pointer is released:
//!
//! | Grab zone | Pointer down | Pointer move | Pointer up |
//! |-----------|--------------|--------------|------------|
//! | body | select | - | - |
//! | edge strip | select | move preview, kept inside the canvas | commit `x, y` |
//! | corner | select | resize preview, opposite corner anchored | commit box, size floored |
//! | empty | deselect | - | - |

use crate::hit::{Corner, Hit, HitZone};
use crate::input::{CanvasFrame, InputEvent, PointerButton};
use crate::sync::EditorMutation;
use dd_core::id::ElementId;
use dd_core::model::*;
use smallvec::{SmallVec, smallvec};

pub type Mutations = SmallVec<[EditorMutation; 2]>;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Dragging {
        id: ElementId,
        /// Pointer offset from the box origin at grab time.
        grab: (f32, f32),
        preview: Rect,
    },
    Resizing {
        id: ElementId,
        corner: Corner,
        start: Rect,
        preview: Rect,
    },
}

/// The single pointer tool of the canvas.
#[derive(Debug, Clone)]
pub struct CanvasTool {
    gesture: Gesture,
    min_size: Size,
}

impl CanvasTool {
    pub fn new(min_size: Size) -> Self {
        Self {
            gesture: Gesture::Idle,
            min_size,
        }
    }

    /// The box being dragged or resized, as it should be drawn right now.
    pub fn preview(&self) -> Option<(ElementId, Rect)> {
        match self.gesture {
            Gesture::Idle => None,
            Gesture::Dragging { id, preview, .. } | Gesture::Resizing { id, preview, .. } => {
                Some((id, preview))
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.gesture != Gesture::Idle
    }

    /// Abandon the current gesture without committing.
    pub fn cancel(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Handle a canvas-local pointer event. `hit` is only consulted on
    /// pointer down.
    pub fn handle(&mut self, event: &InputEvent, hit: Option<Hit>, frame: &CanvasFrame) -> Mutations {
        match *event {
            InputEvent::PointerDown { x, y, button, .. } => self.pointer_down(x, y, button, hit),
            InputEvent::PointerMove { x, y, .. } => {
                self.pointer_move(x, y, frame);
                Mutations::new()
            }
            InputEvent::PointerUp { .. } => self.pointer_up(),
            InputEvent::ContextMenu { .. } | InputEvent::Key { .. } => Mutations::new(),
        }
    }

    fn pointer_down(&mut self, x: f32, y: f32, button: PointerButton, hit: Option<Hit>) -> Mutations {
        self.gesture = Gesture::Idle;
        let Some(hit) = hit else {
            return smallvec![EditorMutation::Select(None)];
        };
        if button == PointerButton::Primary {
            self.gesture = match hit.zone {
                HitZone::Body => Gesture::Idle,
                HitZone::DragEdge => Gesture::Dragging {
                    id: hit.id,
                    grab: (x - hit.rect.x, y - hit.rect.y),
                    preview: hit.rect,
                },
                HitZone::Resize(corner) => Gesture::Resizing {
                    id: hit.id,
                    corner,
                    start: hit.rect,
                    preview: hit.rect,
                },
            };
        }
        smallvec![EditorMutation::Select(Some(hit.id))]
    }

    fn pointer_move(&mut self, x: f32, y: f32, frame: &CanvasFrame) {
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Dragging { grab, preview, .. } => {
                let (nx, ny) = clamp_origin(x - grab.0, y - grab.1, preview.size(), frame);
                preview.x = nx;
                preview.y = ny;
            }
            Gesture::Resizing {
                corner,
                start,
                preview,
                ..
            } => {
                *preview = resize_from_corner(start, *corner, x, y, frame);
            }
        }
    }

    fn pointer_up(&mut self) -> Mutations {
        let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
        match gesture {
            Gesture::Idle => Mutations::new(),
            Gesture::Dragging { id, preview, .. } => {
                log::trace!("tool: drag {id} → ({}, {})", preview.x, preview.y);
                smallvec![EditorMutation::Patch {
                    id,
                    patch: ElementPatch::position(preview.x, preview.y),
                }]
            }
            Gesture::Resizing { id, preview, .. } => {
                let committed = Rect::new(
                    preview.x,
                    preview.y,
                    preview.w.max(self.min_size.w),
                    preview.h.max(self.min_size.h),
                );
                log::trace!("tool: resize {id} → {committed:?}");
                smallvec![EditorMutation::Patch {
                    id,
                    patch: ElementPatch::rect(committed),
                }]
            }
        }
    }
}

/// Keep a box of `size` inside the canvas when its width is known.
fn clamp_origin(x: f32, y: f32, size: Size, frame: &CanvasFrame) -> (f32, f32) {
    let Some(width) = frame.width else {
        return (x, y);
    };
    (
        x.min(width - size.w).max(0.0),
        y.min(frame.height - size.h).max(0.0),
    )
}

/// New box when `corner` of `start` is dragged to `(px, py)`. The opposite
/// corner stays put; the pointer cannot cross it or leave the canvas.
fn resize_from_corner(start: &Rect, corner: Corner, px: f32, py: f32, frame: &CanvasFrame) -> Rect {
    let px = match frame.width {
        Some(width) => px.clamp(0.0, width.max(0.0)),
        None => px,
    };
    let py = if frame.width.is_some() {
        py.clamp(0.0, frame.height.max(0.0))
    } else {
        py
    };

    let (x, w) = if corner.is_left() {
        let x = px.min(start.right());
        (x, start.right() - x)
    } else {
        (start.x, (px - start.x).max(0.0))
    };
    let (y, h) = if corner.is_top() {
        let y = py.min(start.bottom());
        (y, start.bottom() - y)
    } else {
        (start.y, (py - start.y).max(0.0))
    };
    Rect::new(x, y, w, h)
}
