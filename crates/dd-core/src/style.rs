//! Inline CSS: the variant mapping and its inverse.
//!
//! `variant_declarations` is the single table both the serializer and the
//! live renderer read from; `detect_variant` inverts it when importing. Keep
//! the two next to each other so they cannot drift apart.

use crate::model::{Element, Variant};
use smallvec::SmallVec;
use std::fmt::Write;
use winnow::ascii::{digit0, digit1};
use winnow::combinator::{alt, opt, preceded};
use winnow::prelude::*;
use winnow::token::{one_of, take_till};

pub const BORDER: (&str, &str) = ("border", "1px solid rgba(148,163,184,0.9)");
pub const SHADOW: (&str, &str) = ("box-shadow", "0 10px 24px rgba(15,23,42,0.12)");
pub const RADIUS: (&str, &str) = ("border-radius", "14px");

/// CSS declarations for a variant, in emission order.
pub fn variant_declarations(variant: Variant) -> SmallVec<[(&'static str, &'static str); 2]> {
    let mut out = SmallVec::new();
    match variant {
        Variant::Plain => {}
        Variant::Border => out.push(BORDER),
        Variant::Shadow => out.push(SHADOW),
        Variant::Rounded => out.push(RADIUS),
        Variant::RoundedShadow => {
            out.push(RADIUS);
            out.push(SHADOW);
        }
        Variant::BorderRounded => {
            out.push(BORDER);
            out.push(RADIUS);
        }
    }
    out
}

/// The variant as an inline CSS fragment, e.g. `border-radius:14px;`.
pub fn variant_css(variant: Variant) -> String {
    let mut out = String::new();
    for (k, v) in variant_declarations(variant) {
        let _ = write!(out, "{k}:{v};");
    }
    out
}

/// Presentational style of an element's bounding box, as the live canvas
/// draws it: background plus the variant declarations.
pub fn box_style(el: &Element) -> String {
    format!("background:{};{}", el.bg_color, variant_css(el.variant))
}

/// Infer the variant from parsed declarations.
///
/// Exact inverse of [`variant_declarations`]: border is detected by a
/// `solid` border, shadow by any non-empty `box-shadow`, rounding by a
/// positive `border-radius`.
pub fn detect_variant(style: &StyleMap) -> Variant {
    let has_border = style.get("border").is_some_and(|v| v.contains("solid"));
    let has_shadow = style.get("box-shadow").is_some_and(|v| !v.is_empty());
    let rounded = parse_px(style.get("border-radius")) > 0.0;

    match (has_border, has_shadow, rounded) {
        (true, _, true) => Variant::BorderRounded,
        (false, true, true) => Variant::RoundedShadow,
        (true, _, false) => Variant::Border,
        (false, true, false) => Variant::Shadow,
        (false, false, true) => Variant::Rounded,
        (false, false, false) => Variant::Plain,
    }
}

// ─── Inline style parsing ────────────────────────────────────────────────

/// Parsed `style="..."` attribute. Keys are lower-cased; a repeated key
/// keeps its last value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleMap {
    decls: SmallVec<[(String, String); 16]>,
}

impl StyleMap {
    pub fn parse(style: &str) -> Self {
        let mut map = StyleMap::default();
        let mut input = style;
        // Every item consumes at least one character of non-empty input.
        while !input.is_empty() {
            match declaration.parse_next(&mut input) {
                Ok(Some((key, value))) => map.set(key.to_ascii_lowercase(), value.to_string()),
                Ok(None) => {}
                Err(_) => break,
            }
        }
        map
    }

    fn set(&mut self, key: String, value: String) {
        if let Some(slot) = self.decls.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.decls.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.decls
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

/// One `key: value` item up to the next `;`. Items without a colon or
/// with an empty key yield `None`. Values split at the first colon only.
fn declaration<'s>(input: &mut &'s str) -> ModalResult<Option<(&'s str, &'s str)>> {
    (
        take_till(0.., [':', ';']),
        opt(preceded(':', take_till(0.., ';'))),
        opt(';'),
    )
        .map(|(key, value, _): (&'s str, Option<&'s str>, Option<char>)| {
            let key = key.trim();
            value
                .filter(|_| !key.is_empty())
                .map(|value| (key, value.trim()))
        })
        .parse_next(input)
}

/// Leading numeric value of a CSS length, `px` stripped. Mirrors browser
/// `parseFloat`: `"14px"` → 14, `"0 10px 24px"` → 0. Missing or
/// unparsable values read as 0.
pub fn parse_px(value: Option<&str>) -> f32 {
    let Some(value) = value else {
        return 0.0;
    };
    let stripped = value.replacen("px", "", 1);
    let mut input = stripped.trim();
    css_number
        .parse_next(&mut input)
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

fn css_number(input: &mut &str) -> ModalResult<f32> {
    (
        opt(one_of(['+', '-'])),
        alt(((digit1, opt(('.', digit0))).void(), ('.', digit1).void())),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)),
    )
        .take()
        .try_map(str::parse::<f32>)
        .parse_next(input)
}

/// Whether `value` can be embedded in an inline style without breaking out
/// of the declaration or the attribute.
pub fn is_safe_css_value(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= 64
        && !value
            .chars()
            .any(|c| c.is_control() || matches!(c, ';' | '"' | '\'' | '<' | '>' | '{' | '}' | '\\'))
}
