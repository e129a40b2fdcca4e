//! WASM bridge for DD: exposes the page editor to a browser host.
//!
//! Compiled via `wasm-pack build --target web`. The host draws the canvas
//! DOM from `elements_json()` and `box_style()`, forwards pointer, key and
//! text events here, and receives the serialized page through the
//! `set_on_change` callback.

mod dom;
mod logger;

use dd_core::config::EditorConfig;
use dd_core::id::ElementId;
use dd_core::import::import_html;
use dd_core::model::MediaKind;
use dd_core::style::box_style;
use dd_editor::menu::FONT_SIZES;
use dd_editor::{
    EventOutcome, FocusTarget, ImportOutcome, InputEvent, MenuAction, MenuOutcome, Modifiers,
    PageEditor, PointerButton, SyncKey,
};
use dom::DomText;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{File, HtmlElement};

/// State shared between the canvas handle and in-flight file reads.
struct Shared {
    editor: RefCell<PageEditor<DomText>>,
    /// Latest HTML not yet handed to the host callback.
    pending: Rc<RefCell<Option<String>>>,
    on_change: RefCell<Option<js_sys::Function>>,
}

impl Shared {
    /// Run `f` against the editor, then deliver any HTML change and any
    /// focus request once the editor is released. Both call back into the
    /// canvas (the change callback, the node's focus and blur handlers).
    fn edit<R>(&self, f: impl FnOnce(&mut PageEditor<DomText>) -> R) -> R {
        let out = f(&mut self.editor.borrow_mut());
        self.deliver();
        self.focus_requested();
        out
    }

    fn focus_requested(&self) {
        let node = {
            let mut editor = self.editor.borrow_mut();
            let request = editor.take_focus_request();
            request
                .and_then(|id| editor.text_surface(id))
                .map(|surface| surface.node().clone())
        };
        if let Some(node) = node {
            dom::focus(&node);
        }
    }

    fn read<R>(&self, f: impl FnOnce(&PageEditor<DomText>) -> R) -> R {
        f(&self.editor.borrow())
    }

    fn deliver(&self) {
        let Some(html) = self.pending.borrow_mut().take() else {
            return;
        };
        let callback = self.on_change.borrow().clone();
        if let Some(callback) = callback
            && let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(&html))
        {
            log::error!("bridge: change callback threw: {err:?}");
        }
    }
}

/// The main WASM-facing editor controller.
#[wasm_bindgen]
pub struct DdCanvas {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl DdCanvas {
    /// Create an editor. `config_json` may override any subset of the
    /// defaults, e.g. `{"canvasHeight": 900}`.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<DdCanvas, JsValue> {
        console_error_panic_hook_setup();
        logger::init(log::LevelFilter::Info);

        let config = match config_json.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(json) => serde_json::from_str::<EditorConfig>(json)
                .map_err(|err| dom::js_error(format!("invalid config: {err}")))?,
            None => EditorConfig::default(),
        };

        let pending = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&pending);
        let mut editor = PageEditor::new(config);
        editor.set_on_change(move |html| *sink.borrow_mut() = Some(html.to_string()));

        Ok(Self {
            shared: Rc::new(Shared {
                editor: RefCell::new(editor),
                pending,
                on_change: RefCell::new(None),
            }),
        })
    }

    /// Register the callback receiving the serialized page. It is called
    /// right away with the current page, then after every change.
    pub fn set_on_change(&self, callback: js_sys::Function) {
        *self.shared.on_change.borrow_mut() = Some(callback);
        let html = self.shared.read(|ed| ed.html().to_string());
        *self.shared.pending.borrow_mut() = Some(html);
        self.shared.deliver();
    }

    /// Set the console log level (`"error"` … `"trace"`). Returns `false`
    /// for an unknown name.
    pub fn set_log_level(&self, level: &str) -> bool {
        match logger::parse_level(level) {
            Some(filter) => {
                logger::init(filter);
                true
            }
            None => false,
        }
    }

    /// Report where the canvas sits (`getBoundingClientRect`).
    pub fn set_canvas_frame(&self, left: f32, top: f32, width: Option<f32>) {
        self.shared
            .edit(|ed| ed.set_canvas_frame(Some((left, top)), width));
    }

    // ─── Pointer & keyboard ──────────────────────────────────────────────

    /// Pointer down in client coordinates. Returns the outcome as JSON.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_pointer_down(
        &self,
        x: f32,
        y: f32,
        button: i16,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        self.dispatch(InputEvent::PointerDown {
            x,
            y,
            button: PointerButton::from_index(button),
            modifiers: Modifiers {
                ctrl,
                shift,
                alt,
                meta,
            },
        })
    }

    pub fn handle_pointer_move(&self, x: f32, y: f32, shift: bool) -> String {
        self.dispatch(InputEvent::PointerMove {
            x,
            y,
            modifiers: Modifiers {
                shift,
                ..Modifiers::NONE
            },
        })
    }

    pub fn handle_pointer_up(&self, x: f32, y: f32) -> String {
        self.dispatch(InputEvent::PointerUp { x, y })
    }

    /// Right click in client coordinates.
    pub fn handle_context_menu(&self, x: f32, y: f32) -> String {
        self.dispatch(InputEvent::ContextMenu { x, y })
    }

    /// Key down. `focus` is `"canvas"`, `"text"` (with `text_id`) or
    /// `"form"`. Returns JSON `{"outcome": ..., "id"?: ...}`; on
    /// `textKeyResync` call `resync_text(id)` on the next animation frame.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_key(
        &self,
        key: &str,
        focus: &str,
        text_id: Option<String>,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let focus = match focus {
            "text" => match text_id.as_deref().and_then(ElementId::lookup) {
                Some(id) => FocusTarget::EditableText(id),
                // Still typing somewhere; never treat it as a canvas key.
                None => FocusTarget::FormControl,
            },
            "form" => FocusTarget::FormControl,
            _ => FocusTarget::Canvas,
        };
        self.dispatch(InputEvent::Key {
            key: key.to_string(),
            modifiers: Modifiers {
                ctrl,
                shift,
                alt,
                meta,
            },
            focus,
        })
    }

    /// Close the menu and clear the selection.
    pub fn dismiss(&self) -> bool {
        self.shared.edit(|ed| ed.dismiss()).is_ok()
    }

    /// Delete the selected block. Returns `false` when nothing was selected.
    pub fn delete_selected(&self) -> bool {
        self.shared.edit(|ed| ed.delete_selected()).is_ok()
    }

    // ─── Context menu ────────────────────────────────────────────────────

    /// Run a menu action given as `{"action": "...", "value": ...}`.
    /// Returns `{"ok":true}`, `{"ok":true,"pickFile":"image","accept":"image/*"}`
    /// or `{"ok":false,"error":"..."}`.
    pub fn apply_menu(&self, action_json: &str) -> String {
        let action: MenuAction = match serde_json::from_str(action_json) {
            Ok(action) => action,
            Err(err) => {
                return json!({ "ok": false, "error": format!("bad menu action: {err}") })
                    .to_string();
            }
        };
        let value = match self.shared.edit(|ed| ed.apply_menu(action)) {
            Ok(MenuOutcome::Updated) => json!({ "ok": true }),
            Ok(MenuOutcome::PickFile(kind)) => {
                json!({ "ok": true, "pickFile": kind.name(), "accept": kind.accept() })
            }
            Err(err) => json!({ "ok": false, "error": err.to_string() }),
        };
        value.to_string()
    }

    /// Read a picked file in the background and insert it at the menu
    /// anchor. The new block arrives through the change callback; a file
    /// that cannot be read alerts the user and creates nothing. Returns
    /// `false` for an unknown `kind`.
    pub fn attach_file(&self, kind: &str, file: File) -> bool {
        let Some(kind) = MediaKind::from_name(kind) else {
            log::warn!("bridge: unknown media kind {kind:?}");
            return false;
        };
        let shared = Rc::clone(&self.shared);
        wasm_bindgen_futures::spawn_local(async move {
            let name = file.name();
            let attached = match dom::read_file(&file).await {
                Ok(media) => shared.edit(|ed| ed.attach_media(kind, media)).is_ok(),
                Err(reason) => {
                    log::error!("bridge: reading {name:?} failed: {reason}");
                    false
                }
            };
            if !attached {
                dom::alert(&format!("Could not load the {} file \"{name}\".", kind.name()));
            }
        });
        true
    }

    // ─── Text surfaces ───────────────────────────────────────────────────

    /// Register the contenteditable node of a text block.
    pub fn attach_text(&self, id: &str, node: HtmlElement) -> bool {
        let Some(id) = known_id(id) else {
            return false;
        };
        self.shared
            .edit(|ed| ed.attach_text(id, DomText::new(node)));
        true
    }

    pub fn detach_text(&self, id: &str) -> bool {
        known_id(id).is_some_and(|id| self.shared.edit(|ed| ed.detach_text(id)).is_some())
    }

    pub fn text_focused(&self, id: &str) -> bool {
        known_id(id).is_some_and(|id| self.shared.edit(|ed| ed.text_focused(id)).is_ok())
    }

    pub fn text_blurred(&self, id: &str) {
        if let Some(id) = known_id(id) {
            self.shared.edit(|ed| ed.text_blurred(id));
        }
    }

    /// `input` event on a text node. Returns whether the model changed.
    pub fn text_input(&self, id: &str) -> bool {
        known_id(id).is_some_and(|id| {
            self.shared
                .edit(|ed| ed.text_input(id))
                .unwrap_or(false)
        })
    }

    pub fn resync_text(&self, id: &str) -> bool {
        known_id(id).is_some_and(|id| {
            self.shared
                .edit(|ed| ed.resync_text(id))
                .unwrap_or(false)
        })
    }

    // ─── HTML sync ───────────────────────────────────────────────────────

    /// Import `html` if `key` (number or string) changed since the last call.
    /// The first call with any key imports, which is how the host loads the
    /// initial page.
    pub fn sync(&self, key: JsValue, html: &str) -> String {
        let key = match key.as_f64() {
            Some(n) => Some(SyncKey::Number(n)),
            None => key.as_string().map(SyncKey::Text),
        };
        let value = match self.shared.edit(|ed| ed.sync(key, html)) {
            ImportOutcome::KeyUnchanged => json!({ "outcome": "keyUnchanged" }),
            ImportOutcome::NothingImported => json!({ "outcome": "nothingImported" }),
            ImportOutcome::Replaced {
                count,
                discarded_unsynced,
            } => json!({
                "outcome": "replaced",
                "count": count,
                "discardedUnsynced": discarded_unsynced,
            }),
        };
        value.to_string()
    }

    // ─── Snapshots ───────────────────────────────────────────────────────

    pub fn html(&self) -> String {
        self.shared.read(|ed| ed.html().to_string())
    }

    /// Elements in paint order, as JSON.
    pub fn elements_json(&self) -> String {
        self.shared.read(|ed| {
            serde_json::to_string(&ed.store().sorted_by_z()).unwrap_or_else(|err| {
                log::error!("bridge: elements serialization failed: {err}");
                "[]".to_string()
            })
        })
    }

    pub fn selected_id(&self) -> Option<String> {
        self.shared
            .read(|ed| ed.selected().map(|id| id.as_str().to_string()))
    }

    /// Presentational inline style of a block's box (background + variant).
    pub fn box_style(&self, id: &str) -> Option<String> {
        let id = known_id(id)?;
        self.shared.read(|ed| ed.store().get(id).map(box_style))
    }

    /// Menu state: `{"open", "x", "y", "state", "controls", "fontSizes"}`,
    /// where `x, y` is the margin-adjusted draw position.
    pub fn menu_json(&self) -> String {
        self.shared.read(|ed| {
            let menu = ed.menu();
            let (x, y) = menu.display_position(ed.config().menu_margin);
            json!({
                "open": menu.is_open(),
                "x": x,
                "y": y,
                "state": menu,
                "controls": ed.menu_controls(),
                "fontSizes": FONT_SIZES,
            })
            .to_string()
        })
    }

    /// Live box of an in-progress drag or resize, or `null`.
    pub fn preview_json(&self) -> String {
        self.shared.read(|ed| match ed.preview() {
            Some((id, rect)) => json!({
                "id": id.as_str(),
                "x": rect.x,
                "y": rect.y,
                "w": rect.w,
                "h": rect.h,
            })
            .to_string(),
            None => "null".to_string(),
        })
    }

    pub fn has_unsynced_edits(&self) -> bool {
        self.shared.read(|ed| ed.has_unsynced_edits())
    }
}

impl DdCanvas {
    fn dispatch(&self, event: InputEvent) -> String {
        let value = match self.shared.edit(|ed| ed.handle_event(&event)) {
            Ok(EventOutcome::Ignored) => json!({ "outcome": "ignored" }),
            Ok(EventOutcome::Handled) => json!({ "outcome": "handled" }),
            Ok(EventOutcome::TextKey) => json!({ "outcome": "textKey" }),
            Ok(EventOutcome::TextKeyResync(id)) => {
                json!({ "outcome": "textKeyResync", "id": id.as_str() })
            }
            Err(err) => {
                log::warn!("bridge: {event:?} failed: {err}");
                json!({ "outcome": "error", "error": err.to_string() })
            }
        };
        value.to_string()
    }
}

/// Resolve an id handed back by the host without interning new strings.
fn known_id(id: &str) -> Option<ElementId> {
    let found = ElementId::lookup(id);
    if found.is_none() {
        log::debug!("bridge: unknown element id {id:?}");
    }
    found
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("DD WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone helpers (no canvas needed) ───────────────────────────────

/// Import an HTML page with default settings and return the elements as
/// JSON: `{"ok":true,"elements":[...]}` or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn import_to_json(html: &str) -> String {
    let config = EditorConfig::default();
    match import_html(html, &config) {
        Some(elements) => json!({ "ok": true, "elements": elements }).to_string(),
        None => json!({ "ok": false, "error": "nothing importable" }).to_string(),
    }
}
