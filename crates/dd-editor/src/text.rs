//! In-place text editing: one surface handle per text block.
//!
//! A surface is the editable node the host renders for a text block. While
//! it holds focus it owns its content and the model follows it; otherwise
//! the model owns the content and [`TextRegistry::reconcile`] pushes it
//! down. Focus is tracked by an explicit flag per slot, fed by the host's
//! focus and blur events, so the registry never has to query the platform.

use dd_core::id::ElementId;
use dd_core::model::Element;
use std::collections::HashMap;

/// An editable text node owned by the host.
pub trait TextSurface {
    fn text_content(&self) -> String;

    /// Overwrite the node's content. Only called while it is not focused.
    fn set_text_content(&mut self, text: &str);
}

#[derive(Debug)]
struct TextSlot<S> {
    surface: S,
    focused: bool,
}

/// Arena of text surfaces keyed by element id.
#[derive(Debug)]
pub struct TextRegistry<S: TextSurface> {
    slots: HashMap<ElementId, TextSlot<S>>,
}

impl<S: TextSurface> Default for TextRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TextSurface> TextRegistry<S> {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    /// Register the surface for `id`, replacing (and returning) any
    /// previous one. A fresh surface starts unfocused.
    pub fn attach(&mut self, id: ElementId, surface: S) -> Option<S> {
        self.slots
            .insert(
                id,
                TextSlot {
                    surface,
                    focused: false,
                },
            )
            .map(|slot| slot.surface)
    }

    pub fn detach(&mut self, id: ElementId) -> Option<S> {
        self.slots.remove(&id).map(|slot| slot.surface)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.slots.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn surface(&self, id: ElementId) -> Option<&S> {
        self.slots.get(&id).map(|slot| &slot.surface)
    }

    // ─── Focus ───────────────────────────────────────────────────────────

    /// Mark `id` focused. At most one surface holds focus at a time.
    /// Returns `false` if no surface is attached for `id`.
    pub fn set_focused(&mut self, id: ElementId) -> bool {
        if !self.slots.contains_key(&id) {
            return false;
        }
        for (slot_id, slot) in &mut self.slots {
            slot.focused = *slot_id == id;
        }
        true
    }

    pub fn set_blurred(&mut self, id: ElementId) {
        if let Some(slot) = self.slots.get_mut(&id) {
            slot.focused = false;
        }
    }

    pub fn is_focused(&self, id: ElementId) -> bool {
        self.slots.get(&id).is_some_and(|slot| slot.focused)
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.slots
            .iter()
            .find(|(_, slot)| slot.focused)
            .map(|(id, _)| *id)
    }

    // ─── Content ─────────────────────────────────────────────────────────

    /// Current content of the surface for `id`.
    pub fn read(&self, id: ElementId) -> Option<String> {
        self.slots.get(&id).map(|slot| slot.surface.text_content())
    }

    /// Push model text into every unfocused surface whose content differs,
    /// and drop surfaces whose block no longer exists (or is not text).
    /// Returns the number of surfaces written.
    pub fn reconcile(&mut self, elements: &[Element]) -> usize {
        let texts: HashMap<ElementId, &str> = elements
            .iter()
            .filter_map(|el| el.text_content().map(|t| (el.id, t)))
            .collect();

        let before = self.slots.len();
        self.slots.retain(|id, _| texts.contains_key(id));
        if self.slots.len() != before {
            log::debug!("text: pruned {} stale surfaces", before - self.slots.len());
        }

        let mut written = 0;
        for (id, slot) in &mut self.slots {
            if slot.focused {
                continue;
            }
            let Some(&model_text) = texts.get(id) else {
                continue;
            };
            if slot.surface.text_content() != model_text {
                slot.surface.set_text_content(model_text);
                written += 1;
            }
        }
        written
    }
}
