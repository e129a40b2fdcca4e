//! Context menu: anchor position, enabled controls and actions.

use dd_core::model::{Element, MediaKind, Variant};
use serde::{Deserialize, Serialize};

/// Font sizes offered for text blocks, in px.
pub const FONT_SIZES: [u32; 9] = [12, 14, 16, 18, 20, 24, 28, 32, 40];

/// Open/closed state plus the canvas-local point it was opened at.
///
/// The anchor outlives the menu: a file picked after the menu closed is
/// still placed at the last anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextMenu {
    open: bool,
    canvas_x: f32,
    canvas_y: f32,
}

impl ContextMenu {
    pub fn open_at(&mut self, x: f32, y: f32) {
        self.open = true;
        self.canvas_x = x;
        self.canvas_y = y;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn anchor(&self) -> (f32, f32) {
        (self.canvas_x, self.canvas_y)
    }

    /// Where to draw the menu: never closer than `margin` to the canvas's
    /// top-left edges.
    pub fn display_position(&self, margin: f32) -> (f32, f32) {
        (self.canvas_x.max(margin), self.canvas_y.max(margin))
    }
}

/// Which controls are usable for the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuControls {
    /// Font size and text color.
    pub text_style: bool,
    /// Background color and variant.
    pub box_style: bool,
    pub delete: bool,
}

impl MenuControls {
    pub fn for_selection(selected: Option<&Element>) -> Self {
        Self {
            text_style: selected.is_some_and(Element::is_text),
            box_style: selected.is_some(),
            delete: selected.is_some(),
        }
    }
}

/// Everything the menu can ask for. Deserializes from the host's
/// `{"action": "setVariant", "value": "shadow"}` form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "camelCase")]
pub enum MenuAction {
    AddText,
    SetFontSize(u32),
    SetTextColor(String),
    SetBackground(String),
    SetVariant(Variant),
    AttachImage,
    AttachVideo,
    DeleteSelected,
    Close,
}

impl MenuAction {
    /// The media kind an attach action asks a file for.
    pub fn media_kind(&self) -> Option<MediaKind> {
        match self {
            MenuAction::AttachImage => Some(MediaKind::Image),
            MenuAction::AttachVideo => Some(MediaKind::Video),
            _ => None,
        }
    }
}

/// What the host should do after a menu action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    /// Model or menu state changed; re-render.
    Updated,
    /// Open the native file picker for this kind, then call back with the file.
    PickFile(MediaKind),
}

#[cfg(test)]
mod tests {
    use super::*;
    use dd_core::config::EditorConfig;
    use dd_core::model::{ElementKind, Media, Rect};
    use pretty_assertions::assert_eq;

    #[test]
    fn display_position_respects_margin() {
        let mut menu = ContextMenu::default();
        menu.open_at(2.0, 300.0);
        assert_eq!(menu.display_position(8.0), (8.0, 300.0));
        assert_eq!(menu.anchor(), (2.0, 300.0));
        menu.close();
        assert!(!menu.is_open());
        assert_eq!(menu.anchor(), (2.0, 300.0));
    }

    #[test]
    fn controls_follow_selection() {
        let config = EditorConfig::default();
        let text = Element::text("t", Rect::new(0.0, 0.0, 1.0, 1.0), &config);
        let image = Element::new(
            ElementKind::Image(Media {
                src: String::new(),
                file_name: "a".into(),
            }),
            Rect::new(0.0, 0.0, 1.0, 1.0),
        );
        assert_eq!(
            MenuControls::for_selection(None),
            MenuControls {
                text_style: false,
                box_style: false,
                delete: false
            }
        );
        assert!(MenuControls::for_selection(Some(&text)).text_style);
        let media = MenuControls::for_selection(Some(&image));
        assert!(!media.text_style && media.box_style && media.delete);
    }

    #[test]
    fn actions_from_host_json() {
        let a: MenuAction = serde_json::from_str(r#"{"action":"setVariant","value":"roundedShadow"}"#).unwrap();
        assert_eq!(a, MenuAction::SetVariant(Variant::RoundedShadow));
        let a: MenuAction = serde_json::from_str(r#"{"action":"setFontSize","value":24}"#).unwrap();
        assert_eq!(a, MenuAction::SetFontSize(24));
        let a: MenuAction = serde_json::from_str(r#"{"action":"attachVideo"}"#).unwrap();
        assert_eq!(a.media_kind(), Some(MediaKind::Video));
    }
}
