//! Lenient HTML fragment parser.
//!
//! Built on `winnow` 0.7 for the tag grammar; the outer loop is a small
//! tokenizer feeding a stack-based tree builder. It never fails: anything
//! that does not look like markup is kept as text, unbalanced end tags are
//! ignored, and elements still open at end of input are closed.
//!
//! Handles: elements, quoted/unquoted/boolean attributes, self-closing and
//! void elements, comments, doctype / processing instructions, raw-text
//! `script`/`style`/`textarea`/`title`, and character references.

use std::borrow::Cow;
use winnow::ascii::multispace0;
use winnow::combinator::{alt, delimited, opt, preceded, repeat};
use winnow::prelude::*;
use winnow::token::{one_of, take_till, take_while};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

// ─── Tree ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum HtmlNode {
    Element(HtmlElement),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HtmlElement {
    /// Lower-cased tag name.
    pub tag: String,
    /// Attributes in source order; names lower-cased, values entity-decoded.
    pub attrs: Vec<(String, String)>,
    pub children: Vec<HtmlNode>,
}

impl HtmlElement {
    /// First attribute with this (lower-case) name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(k, _)| k == name)
    }

    /// Concatenated text of all descendants, like DOM `textContent`.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Direct element children, skipping text nodes.
    pub fn element_children(&self) -> impl Iterator<Item = &HtmlElement> {
        element_children(&self.children)
    }
}

/// A parsed fragment: the top-level node list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HtmlDocument {
    pub nodes: Vec<HtmlNode>,
}

impl HtmlDocument {
    /// First element in document order (pre-order) matching `pred`.
    pub fn find_first(&self, pred: impl Fn(&HtmlElement) -> bool) -> Option<&HtmlElement> {
        find_in(&self.nodes, &pred)
    }

    /// Nodes that a browser would place in `<body>`: the children of an
    /// explicit `body` (or `html`) element, else the top-level list.
    pub fn body_nodes(&self) -> &[HtmlNode] {
        if let Some(body) = self.find_first(|el| el.tag == "body") {
            return &body.children;
        }
        if let Some(html) = self.find_first(|el| el.tag == "html") {
            return &html.children;
        }
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

pub fn element_children(nodes: &[HtmlNode]) -> impl Iterator<Item = &HtmlElement> {
    nodes.iter().filter_map(|n| match n {
        HtmlNode::Element(el) => Some(el),
        HtmlNode::Text(_) => None,
    })
}

fn find_in<'a>(
    nodes: &'a [HtmlNode],
    pred: &impl Fn(&HtmlElement) -> bool,
) -> Option<&'a HtmlElement> {
    for el in element_children(nodes) {
        if pred(el) {
            return Some(el);
        }
        if let Some(hit) = find_in(&el.children, pred) {
            return Some(hit);
        }
    }
    None
}

fn collect_text(nodes: &[HtmlNode], out: &mut String) {
    for node in nodes {
        match node {
            HtmlNode::Text(t) => out.push_str(t),
            HtmlNode::Element(el) => collect_text(&el.children, out),
        }
    }
}

// ─── Entry point ─────────────────────────────────────────────────────────

/// Parse an HTML fragment (or full document) into a node tree.
#[must_use = "parsing result should be used"]
pub fn parse_fragment(input: &str) -> HtmlDocument {
    let mut builder = TreeBuilder::default();
    let mut rest = input;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("<!--") {
            rest = after.find("-->").map_or("", |p| &after[p + 3..]);
            continue;
        }
        if rest.starts_with("<!") || rest.starts_with("<?") {
            rest = rest.find('>').map_or("", |p| &rest[p + 1..]);
            continue;
        }
        if rest.starts_with("</") {
            let mut lookahead = rest;
            if let Ok(name) = end_tag.parse_next(&mut lookahead) {
                builder.close(&name.to_ascii_lowercase());
                rest = lookahead;
                continue;
            }
        } else if rest.starts_with('<') {
            let mut lookahead = rest;
            if let Ok(tag) = start_tag.parse_next(&mut lookahead) {
                rest = lookahead;
                let raw = !tag.self_closing && RAW_TEXT_ELEMENTS.contains(&tag.name.as_str());
                let name = tag.name.clone();
                builder.open(tag);
                if raw {
                    let (text, after) = split_raw_text(rest, &name);
                    builder.text(text.to_string());
                    builder.close(&name);
                    rest = after;
                }
                continue;
            }
        }

        // Plain text up to the next '<' (a '<' that opened nothing is literal).
        let skip = usize::from(rest.starts_with('<'));
        let end = rest[skip..].find('<').map_or(rest.len(), |p| p + skip);
        builder.text(decode_entities(&rest[..end]).into_owned());
        rest = &rest[end..];
    }

    builder.finish()
}

// ─── Tree builder ────────────────────────────────────────────────────────

#[derive(Debug)]
struct StartTag {
    name: String,
    attrs: Vec<(String, String)>,
    self_closing: bool,
}

#[derive(Default)]
struct TreeBuilder {
    stack: Vec<HtmlElement>,
    roots: Vec<HtmlNode>,
}

impl TreeBuilder {
    fn push_node(&mut self, node: HtmlNode) {
        match self.stack.last_mut() {
            Some(top) => top.children.push(node),
            None => self.roots.push(node),
        }
    }

    fn open(&mut self, tag: StartTag) {
        let leaf = tag.self_closing || VOID_ELEMENTS.contains(&tag.name.as_str());
        let el = HtmlElement {
            tag: tag.name,
            attrs: tag.attrs,
            children: Vec::new(),
        };
        if leaf {
            self.push_node(HtmlNode::Element(el));
        } else {
            self.stack.push(el);
        }
    }

    fn text(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        // Merge adjacent runs (e.g. a literal '<' followed by more text).
        let last = match self.stack.last_mut() {
            Some(top) => top.children.last_mut(),
            None => self.roots.last_mut(),
        };
        if let Some(HtmlNode::Text(prev)) = last {
            prev.push_str(&text);
        } else {
            self.push_node(HtmlNode::Text(text));
        }
    }

    /// Close the nearest open element named `name`, closing everything above it.
    /// End tags with no open match are dropped.
    fn close(&mut self, name: &str) {
        let Some(pos) = self.stack.iter().rposition(|el| el.tag == name) else {
            log::trace!("ignoring stray </{name}>");
            return;
        };
        while self.stack.len() > pos {
            if let Some(el) = self.stack.pop() {
                self.push_node(HtmlNode::Element(el));
            }
        }
    }

    fn finish(mut self) -> HtmlDocument {
        while let Some(el) = self.stack.pop() {
            self.push_node(HtmlNode::Element(el));
        }
        HtmlDocument { nodes: self.roots }
    }
}

// ─── Tag grammar ─────────────────────────────────────────────────────────

fn tag_name<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    (
        one_of(|c: char| c.is_ascii_alphabetic()),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '-' || c == ':'),
    )
        .take()
        .parse_next(input)
}

fn start_tag(input: &mut &str) -> ModalResult<StartTag> {
    (
        preceded('<', tag_name),
        repeat(0.., preceded(multispace0, attribute)),
        multispace0,
        alt(("/>".value(true), ">".value(false))),
    )
        .map(
            |(name, attrs, _, self_closing): (&str, Vec<(String, String)>, &str, bool)| StartTag {
                name: name.to_ascii_lowercase(),
                attrs,
                self_closing,
            },
        )
        .parse_next(input)
}

fn end_tag<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    delimited("</", tag_name, (take_till(0.., '>'), '>')).parse_next(input)
}

fn attribute(input: &mut &str) -> ModalResult<(String, String)> {
    (
        attr_name,
        opt(preceded((multispace0, '=', multispace0), attr_value)),
    )
        .map(|(name, value): (&str, Option<&str>)| {
            (
                name.to_ascii_lowercase(),
                value.map(|v| decode_entities(v).into_owned()).unwrap_or_default(),
            )
        })
        .parse_next(input)
}

fn attr_name<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| {
        !c.is_whitespace() && !matches!(c, '/' | '>' | '=' | '"' | '\'' | '<')
    })
    .parse_next(input)
}

fn attr_value<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    alt((
        delimited('"', take_till(0.., '"'), '"'),
        delimited('\'', take_till(0.., '\''), '\''),
        take_while(1.., |c: char| !c.is_whitespace() && c != '>'),
    ))
    .parse_next(input)
}

/// Split raw text content at the matching (case-insensitive) end tag.
/// Returns `(content, rest_after_end_tag)`.
fn split_raw_text<'a>(input: &'a str, name: &str) -> (&'a str, &'a str) {
    let needle = format!("</{name}");
    let lower = input.to_ascii_lowercase();
    match lower.find(&needle) {
        Some(pos) => {
            let after = &input[pos..];
            let close = after.find('>').map_or(after.len(), |p| p + 1);
            (&input[..pos], &after[close..])
        }
        None => (input, ""),
    }
}

// ─── Character references ────────────────────────────────────────────────

/// Decode `&amp;`-style named, decimal and hex references. Unknown or
/// malformed references are kept verbatim.
pub fn decode_entities(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match decode_one(rest) {
            Some((ch, used)) => {
                out.push(ch);
                rest = &rest[used..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Decode a reference at the start of `s` (which begins with `&`).
/// Returns the character and the number of bytes consumed.
fn decode_one(s: &str) -> Option<(char, usize)> {
    let semi = s[1..].find(';')? + 1;
    if semi > 12 {
        return None;
    }
    let body = &s[1..semi];
    let ch = if let Some(num) = body.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        char::from_u32(code)?
    } else {
        match body {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            "nbsp" => '\u{a0}',
            _ => return None,
        }
    };
    Some((ch, semi + 1))
}
