//! Bidirectional sync engine: canvas ↔ HTML.
//!
//! - **Canvas → HTML**: every mutation goes through [`SyncEngine::apply_mutation`],
//!   which updates the store and re-emits the page fragment. The change
//!   listener fires only when the emitted string actually differs.
//!
//! - **HTML → Canvas**: [`SyncEngine::sync`] imports external HTML, but only
//!   when the host's sync key changes. The import replaces the model
//!   wholesale; if canvas edits were made since the last import and the
//!   incoming HTML is not our own latest output, those edits are reported
//!   as discarded.

use dd_core::config::EditorConfig;
use dd_core::emitter::emit_html;
use dd_core::error::EditorResult;
use dd_core::id::ElementId;
use dd_core::import::import_html;
use dd_core::model::*;
use dd_core::store::ElementStore;
use std::fmt;

/// A mutation of the element model, produced by tools, menu actions and
/// text input.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorMutation {
    Add(Element),
    Patch { id: ElementId, patch: ElementPatch },
    Remove(ElementId),
    BringToFront(ElementId),
    /// Select (and bring to front) or clear the selection.
    Select(Option<ElementId>),
    SetText { id: ElementId, text: String },
    ReplaceAll(Vec<Element>),
}

/// Token whose *change* triggers an import.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncKey {
    Number(f64),
    Text(String),
}

impl From<f64> for SyncKey {
    fn from(n: f64) -> Self {
        SyncKey::Number(n)
    }
}

impl From<i32> for SyncKey {
    fn from(n: i32) -> Self {
        SyncKey::Number(f64::from(n))
    }
}

impl From<&str> for SyncKey {
    fn from(s: &str) -> Self {
        SyncKey::Text(s.to_string())
    }
}

impl From<String> for SyncKey {
    fn from(s: String) -> Self {
        SyncKey::Text(s)
    }
}

/// Result of [`SyncEngine::sync`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// No key, or the same key as last time.
    KeyUnchanged,
    /// Key changed but the HTML held nothing importable; model untouched.
    NothingImported,
    /// Model replaced by `count` imported elements.
    Replaced {
        count: usize,
        discarded_unsynced: bool,
    },
}

type ChangeListener = Box<dyn FnMut(&str)>;

/// Holds the authoritative element store and keeps the HTML in step.
pub struct SyncEngine {
    store: ElementStore,
    html: String,
    config: EditorConfig,
    sync_key: Option<SyncKey>,
    /// Canvas edits happened since the last import (or since start).
    unsynced: bool,
    listener: Option<ChangeListener>,
}

impl fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncEngine")
            .field("elements", &self.store.len())
            .field("sync_key", &self.sync_key)
            .field("unsynced", &self.unsynced)
            .finish_non_exhaustive()
    }
}

impl SyncEngine {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_elements(config, Vec::new())
    }

    pub fn with_elements(config: EditorConfig, elements: Vec<Element>) -> Self {
        let html = emit_html(&elements, config.canvas_height);
        Self {
            store: ElementStore::with_elements(elements),
            html,
            config,
            sync_key: None,
            unsynced: false,
            listener: None,
        }
    }

    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The current serialized page.
    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn has_unsynced_edits(&self) -> bool {
        self.unsynced
    }

    /// Install the change callback. It is invoked once right away with the
    /// current HTML, then after every change.
    pub fn set_listener(&mut self, mut listener: impl FnMut(&str) + 'static) {
        listener(&self.html);
        self.listener = Some(Box::new(listener));
    }

    // ─── Canvas → HTML direction ─────────────────────────────────────────

    /// Apply a mutation. Returns whether the model changed.
    pub fn apply_mutation(&mut self, mutation: EditorMutation) -> EditorResult<bool> {
        let changed = match mutation {
            EditorMutation::Add(el) => {
                self.store.add(el);
                true
            }
            EditorMutation::Patch { id, patch } => self.store.patch(id, &patch)?,
            EditorMutation::Remove(id) => self.store.remove(id).is_some(),
            EditorMutation::BringToFront(id) => {
                self.store.bring_to_front(id)?;
                true
            }
            EditorMutation::Select(id) => {
                let before = self.store.selected();
                self.store.select(id)?;
                id.is_some() || before.is_some()
            }
            EditorMutation::SetText { id, text } => self.store.patch(
                id,
                &ElementPatch {
                    text: Some(text),
                    ..ElementPatch::default()
                },
            )?,
            EditorMutation::ReplaceAll(elements) => {
                self.store.replace_all(elements);
                true
            }
        };
        if changed && self.flush_html() {
            self.unsynced = true;
        }
        Ok(changed)
    }

    /// Apply a batch in order, stopping at the first failure.
    pub fn apply_all(
        &mut self,
        mutations: impl IntoIterator<Item = EditorMutation>,
    ) -> EditorResult<bool> {
        let mut changed = false;
        for m in mutations {
            changed |= self.apply_mutation(m)?;
        }
        Ok(changed)
    }

    /// Re-emit the HTML; notify the listener if it differs. Returns whether
    /// the HTML changed.
    fn flush_html(&mut self) -> bool {
        let html = emit_html(&self.store.snapshot(), self.config.canvas_height);
        if html == self.html {
            return false;
        }
        self.html = html;
        if let Some(listener) = self.listener.as_mut() {
            listener(&self.html);
        }
        true
    }

    // ─── HTML → Canvas direction ─────────────────────────────────────────

    /// Import `html` if `key` differs from the last key seen.
    pub fn sync(&mut self, key: Option<SyncKey>, html: &str) -> ImportOutcome {
        let Some(key) = key else {
            return ImportOutcome::KeyUnchanged;
        };
        if self.sync_key.as_ref() == Some(&key) {
            return ImportOutcome::KeyUnchanged;
        }
        self.sync_key = Some(key);
        self.import(html)
    }

    /// Unconditional import. An empty or unrecognisable document leaves the
    /// model as it is.
    pub fn import(&mut self, html: &str) -> ImportOutcome {
        let Some(elements) = import_html(html, &self.config) else {
            log::info!("sync: nothing importable, keeping {} elements", self.store.len());
            return ImportOutcome::NothingImported;
        };

        let discarded_unsynced = self.unsynced && html.trim() != self.html.trim();
        if discarded_unsynced {
            log::warn!(
                "sync: import replaces {} elements with unsynced canvas edits",
                self.store.len()
            );
        }
        let count = elements.len();
        self.store.replace_all(elements);
        self.flush_html();
        self.unsynced = false;
        log::info!("sync: imported {count} elements");
        ImportOutcome::Replaced {
            count,
            discarded_unsynced,
        }
    }
}
