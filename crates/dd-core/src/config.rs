//! Editor configuration.
//!
//! Every tunable constant of the canvas lives here so the host can override
//! a subset through JSON and leave the rest at their defaults.

use crate::model::{Size, Variant};
use serde::{Deserialize, Serialize};

/// Configuration for a `PageEditor` and the HTML bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Height of the serialized wrapper `div` (and of the canvas), in px.
    pub canvas_height: f32,

    /// Smallest size a resize may commit. Also the floor applied on import.
    pub min_size: Size,

    /// New elements are clamped to `[0, placement_limit]` on both axes.
    pub placement_limit: f32,

    /// Default size of text blocks, also the fallback for unparsable imports.
    pub text_size: Size,
    pub image_size: Size,
    pub video_size: Size,

    pub default_bg: String,
    pub default_text_color: String,
    pub default_font_size: f32,

    /// Content of a text block created from the context menu.
    pub new_text: String,

    /// Content of the block a fresh editor starts with. `None` = empty canvas.
    pub seed_text: Option<String>,

    /// Variant given to freshly attached images and videos.
    pub media_variant: Variant,

    /// The context menu is never drawn closer than this to the canvas edge.
    pub menu_margin: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_height: 720.0,
            min_size: Size::new(60.0, 40.0),
            placement_limit: 5000.0,
            text_size: Size::new(320.0, 120.0),
            image_size: Size::new(360.0, 240.0),
            video_size: Size::new(420.0, 260.0),
            default_bg: "#ffffff".to_string(),
            default_text_color: "#0f172a".to_string(),
            default_font_size: 18.0,
            new_text: "New text".to_string(),
            seed_text: Some("Click the text to edit.".to_string()),
            media_variant: Variant::BorderRounded,
            menu_margin: 8.0,
        }
    }
}

impl EditorConfig {
    /// Clamp a creation coordinate into the placement range.
    pub fn clamp_placement(&self, v: f32) -> f32 {
        if v.is_finite() {
            v.clamp(0.0, self.placement_limit)
        } else {
            0.0
        }
    }
}
