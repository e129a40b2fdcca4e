//! DOM glue: text surfaces backed by `HtmlElement`, file reading, alerts.

use dd_editor::{MediaFile, TextSurface};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, HtmlElement};

/// A contenteditable node rendered by the host for one text block.
pub struct DomText(HtmlElement);

impl DomText {
    pub fn new(node: HtmlElement) -> Self {
        Self(node)
    }

    pub fn node(&self) -> &HtmlElement {
        &self.0
    }
}

impl TextSurface for DomText {
    fn text_content(&self) -> String {
        self.0.text_content().unwrap_or_default()
    }

    fn set_text_content(&mut self, text: &str) {
        self.0.set_text_content(Some(text));
    }
}

/// Move keyboard focus into `node`. The browser dispatches blur and focus
/// events synchronously from here.
pub fn focus(node: &HtmlElement) {
    if let Err(err) = node.focus() {
        log::warn!("dom: focus failed: {err:?}");
    }
}

/// Read a picked file into memory.
pub async fn read_file(file: &File) -> Result<MediaFile, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|err| format!("{err:?}"))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(MediaFile::new(file.name(), file.type_(), bytes))
}

/// Show a blocking notice to the user.
pub fn alert(message: &str) {
    let Some(window) = web_sys::window() else {
        log::error!("dom: no window for alert: {message}");
        return;
    };
    if let Err(err) = window.alert_with_message(message) {
        log::error!("dom: alert failed: {err:?}");
    }
}

/// An error message as a `JsValue`, for `Result<_, JsValue>` returns.
pub fn js_error(message: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&message.to_string())
}
