//! Emitter: element list → self-contained HTML fragment.
//!
//! Output is a fixed-height relative wrapper with one absolutely positioned
//! child per element, ordered by ascending `z` so document order matches
//! visual stacking. Only inline styles are used, so the fragment renders
//! anywhere without a stylesheet, and it round-trips through
//! [`crate::import::import_html`].

use crate::model::*;
use crate::style::variant_css;
use std::fmt::Write;

/// Emit the page fragment for `elements` inside a wrapper of `canvas_height` px.
#[must_use]
pub fn emit_html(elements: &[Element], canvas_height: f32) -> String {
    let mut sorted: Vec<&Element> = elements.iter().collect();
    // Stable: equal z keeps list order.
    sorted.sort_by_key(|el| el.z);

    let items: Vec<String> = sorted.into_iter().map(emit_element).collect();

    format!(
        "<div style=\"position:relative;width:100%;height:{}px;\">\n{}\n</div>",
        format_num(canvas_height),
        items.join("\n")
    )
}

/// Emit a single element as its positioned HTML node.
pub fn emit_element(el: &Element) -> String {
    let mut base = String::with_capacity(256);
    let r = &el.rect;
    let _ = write!(
        base,
        "position:absolute;left:{}px;top:{}px;width:{}px;height:{}px;\
         background:{};box-sizing:border-box;overflow:hidden;{}",
        round_px(r.x),
        round_px(r.y),
        round_px(r.w),
        round_px(r.h),
        escape_html(&el.bg_color),
        variant_css(el.variant)
    );

    match &el.kind {
        ElementKind::Text {
            text,
            font_size,
            color,
        } => format!(
            "<div style=\"{base}padding:12px;white-space:pre-wrap;word-break:break-word;\
             color:{};font-size:{}px;\">{}</div>",
            escape_html(color),
            format_num(*font_size),
            escape_html(text)
        ),
        ElementKind::Image(media) => format!(
            "<img src=\"{}\" style=\"{base}padding:8px;object-fit:contain;\" />",
            escape_html(&media.src)
        ),
        ElementKind::Video(media) => format!(
            "<video src=\"{}\" style=\"{base}padding:8px;object-fit:contain;\" controls></video>",
            escape_html(&media.src)
        ),
    }
}

/// Escape `& < > " '` so user text can never be read back as markup.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Round half-up to a whole pixel (`-0.5` → `0`, `2.5` → `3`).
fn round_px(v: f32) -> i64 {
    if v.is_finite() {
        (v as f64 + 0.5).floor() as i64
    } else {
        0
    }
}

fn format_num(n: f32) -> String {
    if n == n.floor() {
        format!("{}", n as i64)
    } else {
        format!("{n:.2}")
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use pretty_assertions::assert_eq;

    fn text_at(x: f32, y: f32, z: i32, content: &str) -> Element {
        let config = EditorConfig::default();
        Element::text(content, Rect::new(x, y, 320.0, 120.0), &config).with_z(z)
    }

    #[test]
    fn emit_empty_page() {
        assert_eq!(
            emit_html(&[], 720.0),
            "<div style=\"position:relative;width:100%;height:720px;\">\n\n</div>"
        );
    }

    #[test]
    fn emit_text_exact() {
        let el = text_at(60.0, 60.0, 1, "Hi");
        assert_eq!(
            emit_element(&el),
            "<div style=\"position:absolute;left:60px;top:60px;width:320px;height:120px;\
             background:#ffffff;box-sizing:border-box;overflow:hidden;padding:12px;\
             white-space:pre-wrap;word-break:break-word;color:#0f172a;font-size:18px;\">Hi</div>"
        );
    }

    #[test]
    fn emit_media_exact() {
        let media = Media {
            src: "data:image/png;base64,AAAA".into(),
            file_name: "a.png".into(),
        };
        let img = Element::new(
            ElementKind::Image(media.clone()),
            Rect::new(10.4, 10.5, 360.0, 240.0),
        )
        .with_variant(Variant::BorderRounded);
        assert_eq!(
            emit_element(&img),
            "<img src=\"data:image/png;base64,AAAA\" style=\"position:absolute;left:10px;top:11px;\
             width:360px;height:240px;background:#ffffff;box-sizing:border-box;overflow:hidden;\
             border:1px solid rgba(148,163,184,0.9);border-radius:14px;padding:8px;\
             object-fit:contain;\" />"
        );

        let video = Element::new(ElementKind::Video(media), Rect::new(0.0, 0.0, 420.0, 260.0));
        let html = emit_element(&video);
        assert!(html.starts_with("<video src=\"data:image/png;base64,AAAA\""));
        assert!(html.ends_with(" controls></video>"));
    }

    #[test]
    fn emit_orders_by_z() {
        let a = text_at(0.0, 0.0, 5, "top");
        let b = text_at(0.0, 0.0, 1, "bottom");
        let html = emit_html(&[a, b], 720.0);
        let top = html.find(">top<").unwrap();
        let bottom = html.find(">bottom<").unwrap();
        assert!(bottom < top, "lower z must come first:\n{html}");
    }

    #[test]
    fn escape_all_specials() {
        assert_eq!(
            escape_html(r#"<b>"it's" & co</b>"#),
            "&lt;b&gt;&quot;it&#039;s&quot; &amp; co&lt;/b&gt;"
        );
    }

    #[test]
    fn style_values_cannot_close_the_attribute() {
        let mut el = text_at(0.0, 0.0, 1, "x").with_bg("red\"><b>");
        if let ElementKind::Text { color, .. } = &mut el.kind {
            *color = "blue\" onclick=\"x".into();
        }
        let html = emit_element(&el);
        assert!(html.contains("background:red&quot;&gt;&lt;b&gt;;"), "{html}");
        assert!(html.contains("color:blue&quot; onclick=&quot;x;"), "{html}");
        assert_eq!(html.matches('"').count(), 2, "{html}");
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(round_px(2.5), 3);
        assert_eq!(round_px(-0.5), 0);
        assert_eq!(round_px(-1.6), -2);
        assert_eq!(round_px(f32::NAN), 0);
    }

    #[test]
    fn fractional_font_size() {
        let mut el = text_at(0.0, 0.0, 1, "x");
        if let ElementKind::Text { font_size, .. } = &mut el.kind {
            *font_size = 18.5;
        }
        assert!(emit_element(&el).contains("font-size:18.5px;"));
    }
}
