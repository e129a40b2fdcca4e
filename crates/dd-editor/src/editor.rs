//! The page editor: one controller wiring input, menu, text surfaces and
//! the sync engine together.
//!
//! Every state change funnels through [`SyncEngine::apply_mutation`], so
//! the HTML and the change callback stay in step with the model. After
//! each change unfocused text surfaces are reconciled with the model.

use crate::hit::hit_test;
use crate::input::{CanvasFrame, FocusTarget, InputEvent, Modifiers};
use crate::media::MediaFile;
use crate::menu::{ContextMenu, FONT_SIZES, MenuAction, MenuControls, MenuOutcome};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::sync::{EditorMutation, ImportOutcome, SyncEngine, SyncKey};
use crate::text::{TextRegistry, TextSurface};
use crate::tools::CanvasTool;
use dd_core::config::EditorConfig;
use dd_core::error::{EditorError, EditorResult};
use dd_core::id::ElementId;
use dd_core::model::*;
use dd_core::store::ElementStore;
use dd_core::style::is_safe_css_value;
use std::sync::Arc;

/// Where the seed block is placed in a fresh editor.
const SEED_ORIGIN: (f32, f32) = (60.0, 60.0);

/// What the host should do with the event it just forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Not ours; let the platform handle it.
    Ignored,
    /// Acted on; prevent the default action and re-render.
    Handled,
    /// A key typed into a text surface. Keep the default action, stop
    /// propagation to canvas-level handlers.
    TextKey,
    /// Like `TextKey`, and call [`PageEditor::resync_text`] for this block
    /// on the next frame, once the platform has applied the deletion.
    TextKeyResync(ElementId),
}

pub struct PageEditor<S: TextSurface> {
    engine: SyncEngine,
    tool: CanvasTool,
    menu: ContextMenu,
    text: TextRegistry<S>,
    frame: CanvasFrame,
    /// New text block whose surface the host should focus once it exists.
    focus_request: Option<ElementId>,
}

impl<S: TextSurface> PageEditor<S> {
    /// A fresh editor holding the configured seed block, if any.
    pub fn new(config: EditorConfig) -> Self {
        let seed: Vec<Element> = config
            .seed_text
            .as_deref()
            .map(|text| {
                let rect = Rect::at(SEED_ORIGIN.0, SEED_ORIGIN.1, config.text_size);
                Element::text(text, rect, &config).with_z(1)
            })
            .into_iter()
            .collect();
        Self::with_elements(config, seed)
    }

    pub fn with_elements(config: EditorConfig, elements: Vec<Element>) -> Self {
        let frame = CanvasFrame::new(config.canvas_height);
        let tool = CanvasTool::new(config.min_size);
        Self {
            engine: SyncEngine::with_elements(config, elements),
            tool,
            menu: ContextMenu::default(),
            text: TextRegistry::new(),
            frame,
            focus_request: None,
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &EditorConfig {
        self.engine.config()
    }

    pub fn store(&self) -> &ElementStore {
        self.engine.store()
    }

    pub fn elements(&self) -> Arc<Vec<Element>> {
        self.engine.store().snapshot()
    }

    pub fn html(&self) -> &str {
        self.engine.html()
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.engine.store().selected()
    }

    pub fn menu(&self) -> &ContextMenu {
        &self.menu
    }

    pub fn menu_controls(&self) -> MenuControls {
        MenuControls::for_selection(self.engine.store().selected_element())
    }

    /// Live box of an in-progress drag or resize.
    pub fn preview(&self) -> Option<(ElementId, Rect)> {
        self.tool.preview()
    }

    pub fn has_unsynced_edits(&self) -> bool {
        self.engine.has_unsynced_edits()
    }

    pub fn text_surface(&self, id: ElementId) -> Option<&S> {
        self.text.surface(id)
    }

    // ─── Host wiring ─────────────────────────────────────────────────────

    /// Install the HTML change callback; it fires once immediately.
    pub fn set_on_change(&mut self, listener: impl FnMut(&str) + 'static) {
        self.engine.set_listener(listener);
    }

    /// Report the canvas's client-space origin and measured width.
    pub fn set_canvas_frame(&mut self, origin: Option<(f32, f32)>, width: Option<f32>) {
        self.frame.origin = origin;
        self.frame.width = width;
    }

    /// Import `html` when `key` has changed since the last call.
    pub fn sync(&mut self, key: Option<SyncKey>, html: &str) -> ImportOutcome {
        let outcome = self.engine.sync(key, html);
        if let ImportOutcome::Replaced {
            discarded_unsynced, ..
        } = outcome
        {
            if discarded_unsynced {
                log::warn!("editor: canvas edits discarded by import");
            }
            self.menu.close();
            self.tool.cancel();
            self.focus_request = None;
            self.render_text();
        }
        outcome
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Route a host event. Pointer and context-menu coordinates are client
    /// pixels.
    pub fn handle_event(&mut self, event: &InputEvent) -> EditorResult<EventOutcome> {
        let local = event.to_local(&self.frame);
        match &local {
            InputEvent::PointerDown { x, y, .. } => {
                self.menu.close();
                let hit = hit_test(&self.elements(), self.selected(), *x, *y);
                let mutations = self.tool.handle(&local, hit, &self.frame);
                self.commit(mutations)?;
                Ok(EventOutcome::Handled)
            }
            InputEvent::PointerMove { .. } => {
                self.tool.handle(&local, None, &self.frame);
                Ok(if self.tool.is_active() {
                    EventOutcome::Handled
                } else {
                    EventOutcome::Ignored
                })
            }
            InputEvent::PointerUp { .. } => {
                let was_active = self.tool.is_active();
                let mutations = self.tool.handle(&local, None, &self.frame);
                self.commit(mutations)?;
                Ok(if was_active {
                    EventOutcome::Handled
                } else {
                    EventOutcome::Ignored
                })
            }
            InputEvent::ContextMenu { x, y } => {
                self.open_menu(*x, *y)?;
                Ok(EventOutcome::Handled)
            }
            InputEvent::Key {
                key,
                modifiers,
                focus,
            } => self.handle_key(key, *modifiers, *focus),
        }
    }

    /// Right click at canvas-local `(x, y)`: select what is under it and
    /// open the menu there.
    fn open_menu(&mut self, x: f32, y: f32) -> EditorResult<()> {
        self.tool.cancel();
        if let Some(hit) = hit_test(&self.elements(), self.selected(), x, y) {
            self.commit([EditorMutation::Select(Some(hit.id))])?;
        }
        self.menu.open_at(x, y);
        Ok(())
    }

    fn handle_key(
        &mut self,
        key: &str,
        modifiers: Modifiers,
        focus: FocusTarget,
    ) -> EditorResult<EventOutcome> {
        // The host's focus report and our own focus flag both count.
        let focus = match (focus, self.text.focused()) {
            (FocusTarget::Canvas, Some(id)) => FocusTarget::EditableText(id),
            (focus, _) => focus,
        };
        if let FocusTarget::EditableText(id) = focus {
            return Ok(match key {
                "Delete" | "Backspace" => EventOutcome::TextKeyResync(id),
                _ => EventOutcome::TextKey,
            });
        }

        match ShortcutMap::resolve(key, modifiers, focus, self.selected().is_some()) {
            Some(ShortcutAction::DeleteSelected) => {
                self.delete_selected()?;
                Ok(EventOutcome::Handled)
            }
            Some(ShortcutAction::Dismiss) => {
                self.dismiss()?;
                Ok(EventOutcome::Handled)
            }
            None => Ok(EventOutcome::Ignored),
        }
    }

    // ─── Actions ─────────────────────────────────────────────────────────

    /// Run a context-menu action. Rejected actions leave everything as is.
    pub fn apply_menu(&mut self, action: MenuAction) -> EditorResult<MenuOutcome> {
        let result = self.run_menu_action(&action);
        if let Err(err) = &result {
            log::warn!("menu: {action:?} rejected: {err}");
        }
        result
    }

    fn run_menu_action(&mut self, action: &MenuAction) -> EditorResult<MenuOutcome> {
        match action {
            MenuAction::AddText => {
                let (x, y) = self.menu.anchor();
                self.add_text_at(x, y)?;
            }
            MenuAction::SetFontSize(size) => {
                if !FONT_SIZES.contains(size) {
                    return Err(EditorError::UnsupportedFontSize(*size));
                }
                let id = self.selected_text()?;
                self.patch(
                    id,
                    ElementPatch {
                        font_size: Some(*size as f32),
                        ..ElementPatch::default()
                    },
                )?;
            }
            MenuAction::SetTextColor(color) => {
                check_color(color)?;
                let id = self.selected_text()?;
                self.patch(
                    id,
                    ElementPatch {
                        color: Some(color.clone()),
                        ..ElementPatch::default()
                    },
                )?;
            }
            MenuAction::SetBackground(color) => {
                check_color(color)?;
                let id = self.selected().ok_or(EditorError::NothingSelected)?;
                self.patch(
                    id,
                    ElementPatch {
                        bg_color: Some(color.clone()),
                        ..ElementPatch::default()
                    },
                )?;
            }
            MenuAction::SetVariant(variant) => {
                let id = self.selected().ok_or(EditorError::NothingSelected)?;
                self.patch(
                    id,
                    ElementPatch {
                        variant: Some(*variant),
                        ..ElementPatch::default()
                    },
                )?;
            }
            MenuAction::AttachImage | MenuAction::AttachVideo => {
                if let Some(kind) = action.media_kind() {
                    return Ok(MenuOutcome::PickFile(kind));
                }
            }
            MenuAction::DeleteSelected => {
                self.delete_selected()?;
            }
            MenuAction::Close => self.menu.close(),
        }
        Ok(MenuOutcome::Updated)
    }

    /// Add a text block at canvas-local `(x, y)`, select it and queue a
    /// focus request for its surface (see [`Self::take_focus_request`]).
    pub fn add_text_at(&mut self, x: f32, y: f32) -> EditorResult<ElementId> {
        let config = self.engine.config();
        let rect = Rect::at(
            config.clamp_placement(x),
            config.clamp_placement(y),
            config.text_size,
        );
        let el = Element::text(&config.new_text, rect, config)
            .with_z(self.engine.store().next_z());
        let id = el.id;
        self.commit([EditorMutation::Add(el), EditorMutation::Select(Some(id))])?;
        self.menu.close();
        self.focus_request = Some(id);
        Ok(id)
    }

    /// Insert a picked file at the menu's anchor. A file that cannot be
    /// read creates nothing.
    pub fn attach_media(&mut self, kind: MediaKind, file: MediaFile) -> EditorResult<ElementId> {
        let name = file.name.clone();
        let media = file.into_media(kind).inspect_err(|err| {
            log::error!("media: could not attach {name:?}: {err}");
        })?;

        let config = self.engine.config();
        let (x, y) = self.menu.anchor();
        let rect = Rect::at(
            config.clamp_placement(x),
            config.clamp_placement(y),
            kind.default_size(config),
        );
        let el = Element::new(ElementKind::media(kind, media), rect)
            .with_bg(&config.default_bg)
            .with_variant(config.media_variant)
            .with_z(self.engine.store().next_z());
        let id = el.id;
        self.commit([EditorMutation::Add(el), EditorMutation::Select(Some(id))])?;
        self.menu.close();
        Ok(id)
    }

    /// Remove the selected block and close the menu.
    pub fn delete_selected(&mut self) -> EditorResult<ElementId> {
        let id = self.selected().ok_or(EditorError::NothingSelected)?;
        self.commit([EditorMutation::Remove(id)])?;
        self.text.detach(id);
        self.menu.close();
        Ok(id)
    }

    /// Close the menu, abandon any gesture and clear the selection.
    pub fn dismiss(&mut self) -> EditorResult<()> {
        self.menu.close();
        self.tool.cancel();
        self.commit([EditorMutation::Select(None)])?;
        Ok(())
    }

    // ─── Text surfaces ───────────────────────────────────────────────────

    /// Register the editable node of a text block. The model's text is
    /// pushed into it right away unless it is focused.
    pub fn attach_text(&mut self, id: ElementId, surface: S) {
        self.text.attach(id, surface);
        self.render_text();
    }

    /// The block whose surface should take focus now, if its surface is
    /// attached. Focusing fires focus and blur events that come back into
    /// the editor, so the host must do it after this call returns and its
    /// own borrow of the editor has ended.
    pub fn take_focus_request(&mut self) -> Option<ElementId> {
        let id = self.focus_request?;
        if !self.text.contains(id) {
            return None;
        }
        self.focus_request = None;
        Some(id)
    }

    pub fn detach_text(&mut self, id: ElementId) -> Option<S> {
        self.text.detach(id)
    }

    /// A text surface gained focus: it now owns its content, and its block
    /// becomes the selection.
    pub fn text_focused(&mut self, id: ElementId) -> EditorResult<()> {
        if !self.text.set_focused(id) {
            log::debug!("text: focus on unattached surface {id}");
        }
        self.commit([EditorMutation::Select(Some(id))])?;
        Ok(())
    }

    pub fn text_blurred(&mut self, id: ElementId) {
        self.text.set_blurred(id);
        self.render_text();
    }

    /// The surface's content changed: copy it into the model.
    pub fn text_input(&mut self, id: ElementId) -> EditorResult<bool> {
        let Some(text) = self.text.read(id) else {
            return Ok(false);
        };
        self.commit([EditorMutation::SetText { id, text }])
    }

    /// Deferred re-read after a deletion key.
    pub fn resync_text(&mut self, id: ElementId) -> EditorResult<bool> {
        self.text_input(id)
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn selected_text(&self) -> EditorResult<ElementId> {
        let el = self
            .engine
            .store()
            .selected_element()
            .ok_or(EditorError::NothingSelected)?;
        if el.is_text() {
            Ok(el.id)
        } else {
            Err(EditorError::NotTextElement(el.id))
        }
    }

    fn patch(&mut self, id: ElementId, patch: ElementPatch) -> EditorResult<bool> {
        self.commit([EditorMutation::Patch { id, patch }])
    }

    fn commit(&mut self, mutations: impl IntoIterator<Item = EditorMutation>) -> EditorResult<bool> {
        let changed = self.engine.apply_all(mutations)?;
        if changed {
            self.render_text();
        }
        Ok(changed)
    }

    fn render_text(&mut self) {
        let elements = self.engine.store().snapshot();
        self.text.reconcile(&elements);
    }
}

fn check_color(color: &str) -> EditorResult<()> {
    if is_safe_css_value(color) {
        Ok(())
    } else {
        Err(EditorError::InvalidColor(color.to_string()))
    }
}
