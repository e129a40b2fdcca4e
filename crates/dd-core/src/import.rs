//! Importer: HTML fragment → element list.
//!
//! Best-effort inverse of [`crate::emitter::emit_html`]. Reads geometry,
//! background and variant back out of each child's inline `style`, and the
//! type-specific payload from the tag itself. Ids and `z` are always fresh.

use crate::config::EditorConfig;
use crate::model::*;
use crate::parser::{HtmlDocument, HtmlElement, element_children, parse_fragment};
use crate::style::{StyleMap, detect_variant, is_safe_css_value, parse_px};

/// Parse `html` into a fresh element list.
///
/// Returns `None` when nothing importable was found (empty input, no
/// recognised children); callers leave their current model untouched in
/// that case.
pub fn import_html(html: &str, config: &EditorConfig) -> Option<Vec<Element>> {
    let trimmed = html.trim();
    if trimmed.is_empty() {
        return None;
    }
    let doc = parse_fragment(trimmed);
    let imported = import_document(&doc, config);
    if imported.is_empty() {
        log::debug!("import: no recognised elements in {} bytes of html", html.len());
        None
    } else {
        Some(imported)
    }
}

/// Import from an already parsed document.
pub fn import_document(doc: &HtmlDocument, config: &EditorConfig) -> Vec<Element> {
    let wrapper = doc.find_first(|el| {
        el.tag == "div"
            && el
                .attr("style")
                .is_some_and(|s| s.contains("position:relative"))
    });
    let children: Vec<&HtmlElement> = match wrapper {
        Some(w) => w.element_children().collect(),
        None => element_children(doc.body_nodes()).collect(),
    };

    let mut out = Vec::with_capacity(children.len());
    for node in children {
        if let Some(el) = import_element(node, config) {
            let z = out.len() as i32 + 1;
            out.push(el.with_z(z));
        }
    }
    out
}

/// Reconstruct one element from a positioned node. Unknown tags yield `None`.
pub fn import_element(node: &HtmlElement, config: &EditorConfig) -> Option<Element> {
    let style = StyleMap::parse(node.attr("style").unwrap_or_default());

    let kind = match node.tag.as_str() {
        "div" => {
            let font_size = parse_px(style.get("font-size"));
            ElementKind::Text {
                text: node.text_content(),
                font_size: if font_size != 0.0 {
                    font_size
                } else {
                    config.default_font_size
                },
                color: css_value_or(style.get("color"), &config.default_text_color),
            }
        }
        "img" => ElementKind::Image(Media {
            src: node.attr("src").unwrap_or_default().to_string(),
            file_name: "image".to_string(),
        }),
        "video" => ElementKind::Video(Media {
            src: node.attr("src").unwrap_or_default().to_string(),
            file_name: "video".to_string(),
        }),
        other => {
            log::trace!("import: skipping <{other}>");
            return None;
        }
    };

    let x = parse_px(style.get("left"));
    let y = parse_px(style.get("top"));
    let w = or_default(parse_px(style.get("width")), config.text_size.w);
    let h = or_default(parse_px(style.get("height")), config.text_size.h);
    let rect = Rect::new(x, y, w.max(config.min_size.w), h.max(config.min_size.h));

    let bg = css_value_or(style.get("background"), &config.default_bg);
    Some(
        Element::new(kind, rect)
            .with_bg(&bg)
            .with_variant(detect_variant(&style)),
    )
}

/// An imported colour, or `default` when it is missing or could escape
/// its declaration once re-emitted.
fn css_value_or(value: Option<&str>, default: &str) -> String {
    match value {
        Some(v) if is_safe_css_value(v) => v.to_string(),
        Some(v) => {
            log::debug!("import: replacing unusable css value {v:?}");
            default.to_string()
        }
        None => default.to_string(),
    }
}

/// Zero means "missing" for sizes.
fn or_default(v: f32, default: f32) -> f32 {
    if v != 0.0 { v } else { default }
}
