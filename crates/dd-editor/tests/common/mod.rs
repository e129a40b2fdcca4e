//! Shared test doubles.

#![allow(dead_code)]

use dd_editor::TextSurface;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct FakeNode {
    content: String,
    cursor: usize,
    writes: usize,
}

/// Stand-in for a contenteditable node. Clones share the node, the way a
/// DOM handle does, so a test can keep typing into a surface the editor
/// holds.
#[derive(Debug, Default, Clone)]
pub struct FakeText(Rc<RefCell<FakeNode>>);

impl FakeText {
    pub fn new() -> Self {
        Self::default()
    }

    /// The user types `s` at the caret.
    pub fn type_str(&self, s: &str) {
        let mut node = self.0.borrow_mut();
        let at = node.cursor;
        node.content.insert_str(at, s);
        node.cursor += s.len();
    }

    /// The user presses Backspace at the caret.
    pub fn backspace(&self) {
        let mut node = self.0.borrow_mut();
        let at = node.cursor;
        if let Some(c) = node.content[..at].chars().next_back() {
            node.cursor -= c.len_utf8();
            let cursor = node.cursor;
            node.content.remove(cursor);
        }
    }

    /// Put the caret at the end of the content.
    pub fn caret_to_end(&self) {
        let mut node = self.0.borrow_mut();
        node.cursor = node.content.len();
    }

    pub fn content(&self) -> String {
        self.0.borrow().content.clone()
    }

    pub fn cursor(&self) -> usize {
        self.0.borrow().cursor
    }

    pub fn writes(&self) -> usize {
        self.0.borrow().writes
    }
}

impl TextSurface for FakeText {
    fn text_content(&self) -> String {
        self.content()
    }

    fn set_text_content(&mut self, text: &str) {
        let mut node = self.0.borrow_mut();
        node.content = text.to_string();
        node.cursor = 0;
        node.writes += 1;
    }
}
