//! Hit testing: point → element and grab zone.
//!
//! The selected block is tested first: its corner handles resize it and
//! the strips along its borders move it. Everything else is a plain body
//! hit on the topmost block under the pointer.

use dd_core::id::ElementId;
use dd_core::model::*;

/// Half-thickness of the drag strips around a selected block.
pub const EDGE_GRIP: f32 = 6.0;

/// Grab radius of a corner resize handle.
pub const CORNER_RADIUS: f32 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// Position of this corner on `rect`.
    pub fn point(self, rect: &Rect) -> (f32, f32) {
        match self {
            Corner::TopLeft => (rect.x, rect.y),
            Corner::TopRight => (rect.right(), rect.y),
            Corner::BottomLeft => (rect.x, rect.bottom()),
            Corner::BottomRight => (rect.right(), rect.bottom()),
        }
    }

    pub fn is_left(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::BottomLeft)
    }

    pub fn is_top(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }
}

/// Which part of a block the pointer landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitZone {
    Body,
    DragEdge,
    Resize(Corner),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub id: ElementId,
    pub zone: HitZone,
    /// The block's box at the time of the hit.
    pub rect: Rect,
}

/// Find what lies under `(px, py)`. `None` means empty canvas.
pub fn hit_test(
    elements: &[Element],
    selected: Option<ElementId>,
    px: f32,
    py: f32,
) -> Option<Hit> {
    if let Some(sel) = selected.and_then(|id| elements.iter().find(|el| el.id == id))
        && let Some(zone) = handle_zone(&sel.rect, px, py)
    {
        return Some(Hit {
            id: sel.id,
            zone,
            rect: sel.rect,
        });
    }

    // Topmost first: highest z, and on ties the later entry.
    let mut order: Vec<&Element> = elements.iter().collect();
    order.sort_by_key(|el| el.z);
    order
        .into_iter()
        .rev()
        .find(|el| el.rect.contains(px, py))
        .map(|el| Hit {
            id: el.id,
            zone: HitZone::Body,
            rect: el.rect,
        })
}

/// Resize corner or drag strip of a selected block's box, if any.
fn handle_zone(rect: &Rect, px: f32, py: f32) -> Option<HitZone> {
    for corner in Corner::ALL {
        let (cx, cy) = corner.point(rect);
        if (px - cx).hypot(py - cy) <= CORNER_RADIUS {
            return Some(HitZone::Resize(corner));
        }
    }
    let outer = rect.inflate(EDGE_GRIP);
    let inner = rect.inflate(-EDGE_GRIP);
    let on_strip = outer.contains(px, py)
        && !(px > inner.x && px < inner.right() && py > inner.y && py < inner.bottom());
    on_strip.then_some(HitZone::DragEdge)
}
