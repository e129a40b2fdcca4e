//! The element store: canonical list, stacking order and selection.
//!
//! The list lives behind an `Arc` and is copy-on-write. A [`snapshot`]
//! handed to the renderer or serializer never changes underneath it; the
//! next mutation clones the list if a snapshot is still alive.
//!
//! [`snapshot`]: ElementStore::snapshot

use crate::error::{EditorError, EditorResult};
use crate::id::ElementId;
use crate::model::{Element, ElementPatch};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct ElementStore {
    elements: Arc<Vec<Element>>,
    selected: Option<ElementId>,
}

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_elements(elements: Vec<Element>) -> Self {
        Self {
            elements: Arc::new(elements),
            selected: None,
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|el| el.id == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Shared, immutable view of the current list.
    pub fn snapshot(&self) -> Arc<Vec<Element>> {
        Arc::clone(&self.elements)
    }

    /// Elements in paint order (ascending `z`, list order on ties).
    pub fn sorted_by_z(&self) -> Vec<&Element> {
        let mut sorted: Vec<&Element> = self.elements.iter().collect();
        sorted.sort_by_key(|el| el.z);
        sorted
    }

    /// Highest `z` in the list, `0` when empty.
    pub fn max_z(&self) -> i32 {
        self.elements.iter().map(|el| el.z).max().unwrap_or(0)
    }

    /// The `z` a newly touched element receives.
    pub fn next_z(&self) -> i32 {
        self.max_z() + 1
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.selected.and_then(|id| self.get(id))
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Append an element and return its id.
    pub fn add(&mut self, el: Element) -> ElementId {
        let id = el.id;
        log::debug!("store: add {id} ({:?}) z={}", el.element_type(), el.z);
        Arc::make_mut(&mut self.elements).push(el);
        id
    }

    /// Apply a partial update. `Ok(false)` means the patch was a no-op and
    /// the list was left as is.
    pub fn patch(&mut self, id: ElementId, patch: &ElementPatch) -> EditorResult<bool> {
        let idx = self.index_of(id)?;
        let mut updated = self.elements[idx].clone();
        if !patch.apply(&mut updated) {
            return Ok(false);
        }
        Arc::make_mut(&mut self.elements)[idx] = updated;
        Ok(true)
    }

    /// Remove an element. Clears the selection if it pointed at it.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let idx = self.index_of(id).ok()?;
        let removed = Arc::make_mut(&mut self.elements).remove(idx);
        if self.selected == Some(id) {
            self.selected = None;
        }
        log::debug!("store: remove {id}");
        Some(removed)
    }

    /// Give `id` the value `max(z) + 1`. Returns the new `z`.
    pub fn bring_to_front(&mut self, id: ElementId) -> EditorResult<i32> {
        let idx = self.index_of(id)?;
        let z = self.next_z();
        Arc::make_mut(&mut self.elements)[idx].z = z;
        Ok(z)
    }

    /// Select an element (bringing it to front) or clear the selection.
    pub fn select(&mut self, id: Option<ElementId>) -> EditorResult<()> {
        match id {
            Some(id) => {
                self.bring_to_front(id)?;
                self.selected = Some(id);
            }
            None => self.selected = None,
        }
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Swap in a whole new list. Selection is cleared.
    pub fn replace_all(&mut self, elements: Vec<Element>) {
        self.elements = Arc::new(elements);
        self.selected = None;
    }

    fn index_of(&self, id: ElementId) -> EditorResult<usize> {
        self.elements
            .iter()
            .position(|el| el.id == id)
            .ok_or(EditorError::ElementNotFound(id))
    }
}
