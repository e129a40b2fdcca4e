//! Keyboard shortcut mapping.
//!
//! Maps a key press to a canvas-level `ShortcutAction`, taking focus into
//! account: while the user is typing into a text block or a form control
//! the canvas shortcuts stay silent, so Backspace deletes characters and
//! never the block that contains them.

use crate::input::{FocusTarget, Modifiers};

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Remove the selected block.
    DeleteSelected,
    /// Close the context menu and clear the selection.
    Dismiss,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value. Returns `None` if the combo
    /// has no binding in the current focus.
    pub fn resolve(
        key: &str,
        _modifiers: Modifiers,
        focus: FocusTarget,
        has_selection: bool,
    ) -> Option<ShortcutAction> {
        if focus.is_editing() {
            return None;
        }
        match key {
            "Delete" | "Backspace" if has_selection => Some(ShortcutAction::DeleteSelected),
            "Escape" => Some(ShortcutAction::Dismiss),
            _ => None,
        }
    }
}
