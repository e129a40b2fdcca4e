//! Element data model for the free-form page canvas.
//!
//! A page is a flat list of absolutely positioned blocks. Each block is
//! text, an image, or a video; it carries geometry, a stacking order, a
//! background color and one of six fixed box variants. There is no
//! hierarchy: stacking is expressed purely through `z`.

use crate::config::EditorConfig;
use crate::id::ElementId;
use serde::{Deserialize, Serialize};

// ─── Geometry ────────────────────────────────────────────────────────────

/// Width/height pair in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub w: f32,
    pub h: f32,
}

impl Size {
    pub const fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }
}

/// Axis-aligned box in canvas-local pixels. `x, y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn at(x: f32, y: f32, size: Size) -> Self {
        Self::new(x, y, size.w, size.h)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    /// Grow the box by `d` on every side.
    pub fn inflate(&self, d: f32) -> Self {
        Self::new(self.x - d, self.y - d, self.w + 2.0 * d, self.h + 2.0 * d)
    }
}

// ─── Variant ─────────────────────────────────────────────────────────────

/// Presentational box style. Closed set; the CSS for each lives in
/// [`crate::style`] and is shared by the renderer and the serializer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Variant {
    #[default]
    Plain,
    Border,
    Shadow,
    Rounded,
    RoundedShadow,
    BorderRounded,
}

impl Variant {
    pub const ALL: [Variant; 6] = [
        Variant::Plain,
        Variant::Border,
        Variant::Shadow,
        Variant::Rounded,
        Variant::RoundedShadow,
        Variant::BorderRounded,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Variant::Plain => "plain",
            Variant::Border => "border",
            Variant::Shadow => "shadow",
            Variant::Rounded => "rounded",
            Variant::RoundedShadow => "roundedShadow",
            Variant::BorderRounded => "borderRounded",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.name() == name)
    }

    pub fn has_border(self) -> bool {
        matches!(self, Variant::Border | Variant::BorderRounded)
    }

    pub fn has_shadow(self) -> bool {
        matches!(self, Variant::Shadow | Variant::RoundedShadow)
    }

    pub fn is_rounded(self) -> bool {
        matches!(
            self,
            Variant::Rounded | Variant::RoundedShadow | Variant::BorderRounded
        )
    }
}

// ─── Element ─────────────────────────────────────────────────────────────

/// Tag of an element, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Text,
    Image,
    Video,
}

/// The two kinds of file-backed blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "image" => Some(MediaKind::Image),
            "video" => Some(MediaKind::Video),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    /// Value for the `accept` attribute of the native file picker.
    pub fn accept(self) -> &'static str {
        match self {
            MediaKind::Image => "image/*",
            MediaKind::Video => "video/*",
        }
    }

    pub fn default_size(self, config: &EditorConfig) -> Size {
        match self {
            MediaKind::Image => config.image_size,
            MediaKind::Video => config.video_size,
        }
    }
}

/// Payload of an image or video block. `src` is normally a data URL so the
/// serialized page is self-contained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub src: String,
    pub file_name: String,
}

/// Type-specific content of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Text {
        text: String,
        #[serde(rename = "fontSize")]
        font_size: f32,
        color: String,
    },
    Image(Media),
    Video(Media),
}

impl ElementKind {
    pub fn element_type(&self) -> ElementType {
        match self {
            ElementKind::Text { .. } => ElementType::Text,
            ElementKind::Image(_) => ElementType::Image,
            ElementKind::Video(_) => ElementType::Video,
        }
    }

    pub fn media(kind: MediaKind, media: Media) -> Self {
        match kind {
            MediaKind::Image => ElementKind::Image(media),
            MediaKind::Video => ElementKind::Video(media),
        }
    }
}

/// A single placed block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    #[serde(flatten)]
    pub kind: ElementKind,
    #[serde(flatten)]
    pub rect: Rect,
    pub z: i32,
    pub bg_color: String,
    pub variant: Variant,
}

impl Element {
    /// Create an element with a fresh id, `z = 0`, white background and the plain variant.
    pub fn new(kind: ElementKind, rect: Rect) -> Self {
        Self {
            id: ElementId::fresh(),
            kind,
            rect,
            z: 0,
            bg_color: "#ffffff".to_string(),
            variant: Variant::Plain,
        }
    }

    /// A text block using the configured font, color and background.
    pub fn text(content: &str, rect: Rect, config: &EditorConfig) -> Self {
        Self::new(
            ElementKind::Text {
                text: content.to_string(),
                font_size: config.default_font_size,
                color: config.default_text_color.clone(),
            },
            rect,
        )
        .with_bg(&config.default_bg)
    }

    pub fn with_z(mut self, z: i32) -> Self {
        self.z = z;
        self
    }

    pub fn with_bg(mut self, bg: &str) -> Self {
        self.bg_color = bg.to_string();
        self
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, ElementKind::Text { .. })
    }

    /// Text content, for text blocks only.
    pub fn text_content(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Media source, for image and video blocks only.
    pub fn src(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Image(m) | ElementKind::Video(m) => Some(&m.src),
            ElementKind::Text { .. } => None,
        }
    }
}

// ─── Patch ───────────────────────────────────────────────────────────────

/// Partial update of an element. `None` fields are left untouched;
/// text-only fields are ignored on image and video blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementPatch {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub w: Option<f32>,
    pub h: Option<f32>,
    pub z: Option<i32>,
    pub bg_color: Option<String>,
    pub variant: Option<Variant>,
    pub text: Option<String>,
    pub font_size: Option<f32>,
    pub color: Option<String>,
}

impl ElementPatch {
    /// Patch that only moves the element.
    pub fn position(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Patch that replaces the whole box.
    pub fn rect(rect: Rect) -> Self {
        Self {
            x: Some(rect.x),
            y: Some(rect.y),
            w: Some(rect.w),
            h: Some(rect.h),
            ..Self::default()
        }
    }

    pub fn touches_text_fields(&self) -> bool {
        self.text.is_some() || self.font_size.is_some() || self.color.is_some()
    }

    /// Apply onto `el`. Returns `true` if anything changed.
    pub fn apply(&self, el: &mut Element) -> bool {
        let before = el.clone();
        if let Some(x) = self.x {
            el.rect.x = x;
        }
        if let Some(y) = self.y {
            el.rect.y = y;
        }
        if let Some(w) = self.w {
            el.rect.w = w;
        }
        if let Some(h) = self.h {
            el.rect.h = h;
        }
        if let Some(z) = self.z {
            el.z = z;
        }
        if let Some(ref bg) = self.bg_color {
            el.bg_color.clone_from(bg);
        }
        if let Some(variant) = self.variant {
            el.variant = variant;
        }
        if let ElementKind::Text {
            text,
            font_size,
            color,
        } = &mut el.kind
        {
            if let Some(ref t) = self.text {
                text.clone_from(t);
            }
            if let Some(fs) = self.font_size {
                *font_size = fs;
            }
            if let Some(ref c) = self.color {
                color.clone_from(c);
            }
        }
        *el != before
    }
}
