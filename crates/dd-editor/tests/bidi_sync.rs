//! Integration tests: canvas → HTML on every change, HTML → canvas on
//! sync-key change.

mod common;

use common::FakeText;
use dd_core::model::*;
use dd_core::{EditorConfig, emit_html};
use dd_editor::media::is_data_url;
use dd_editor::{
    FocusTarget, ImportOutcome, InputEvent, MediaFile, MenuAction, MenuOutcome, PageEditor,
    SyncKey,
};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

// ─── Helpers ─────────────────────────────────────────────────────────────

fn blank_editor() -> PageEditor<FakeText> {
    PageEditor::new(EditorConfig {
        seed_text: None,
        ..EditorConfig::default()
    })
}

fn record(ed: &mut PageEditor<FakeText>) -> Rc<RefCell<Vec<String>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    ed.set_on_change(move |html| sink.borrow_mut().push(html.to_string()));
    seen
}

fn png() -> MediaFile {
    MediaFile::new("photo.png", "image/png", vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a])
}

// ─── Scenarios ───────────────────────────────────────────────────────────

#[test]
fn rounded_shadow_block_roundtrips_through_sync() {
    let mut ed = blank_editor();
    ed.handle_event(&InputEvent::ContextMenu { x: 60.0, y: 60.0 })
        .unwrap();
    ed.apply_menu(MenuAction::AddText).unwrap();
    ed.apply_menu(MenuAction::SetVariant(Variant::RoundedShadow))
        .unwrap();
    ed.apply_menu(MenuAction::SetBackground("#ffffff".into()))
        .unwrap();

    let html = ed.html().to_string();
    assert!(html.contains("border-radius:14px"));
    assert!(html.contains("box-shadow:0 10px 24px rgba(15,23,42,0.12)"));
    assert!(html.contains("left:60px;top:60px"));

    let outcome = ed.sync(Some(SyncKey::from(1)), &html);
    assert_eq!(
        outcome,
        ImportOutcome::Replaced {
            count: 1,
            discarded_unsynced: false
        }
    );
    let els = ed.elements();
    assert_eq!(els.len(), 1);
    assert_eq!(els[0].variant, Variant::RoundedShadow);
    assert_eq!(els[0].rect, Rect::new(60.0, 60.0, 320.0, 120.0));
    assert_eq!(ed.html(), html);
}

#[test]
fn attached_image_lands_at_menu_anchor() {
    let mut ed = blank_editor();
    ed.handle_event(&InputEvent::ContextMenu { x: 100.0, y: 100.0 })
        .unwrap();
    assert_eq!(
        ed.apply_menu(MenuAction::AttachImage),
        Ok(MenuOutcome::PickFile(MediaKind::Image))
    );
    let id = ed.attach_media(MediaKind::Image, png()).unwrap();

    let el = ed.store().get(id).unwrap();
    assert_eq!(el.element_type(), ElementType::Image);
    assert_eq!(el.rect, Rect::new(100.0, 100.0, 360.0, 240.0));
    assert_eq!(el.variant, Variant::BorderRounded);
    assert!(is_data_url(el.src().unwrap()));
    match &el.kind {
        ElementKind::Image(media) => assert_eq!(media.file_name, "photo.png"),
        other => panic!("expected image, got {other:?}"),
    }
    assert_eq!(ed.selected(), Some(id));
    assert!(!ed.menu().is_open());
    assert!(ed.html().contains("<img src=\"data:image/png;base64,"));
}

#[test]
fn attached_video_uses_video_size() {
    let mut ed = blank_editor();
    ed.handle_event(&InputEvent::ContextMenu { x: 10.0, y: 20.0 })
        .unwrap();
    let file = MediaFile::new("clip.mp4", "video/mp4", vec![0, 0, 0, 0x18]);
    let id = ed.attach_media(MediaKind::Video, file).unwrap();
    assert_eq!(ed.store().get(id).unwrap().rect.size(), Size::new(420.0, 260.0));
    assert!(ed.html().contains(" controls></video>"));
}

// ─── Change callback ─────────────────────────────────────────────────────

#[test]
fn callback_tracks_every_html_change() {
    let mut ed: PageEditor<FakeText> = PageEditor::new(EditorConfig::default());
    let seen = record(&mut ed);
    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(seen.borrow()[0], ed.html());

    ed.handle_event(&InputEvent::ContextMenu { x: 500.0, y: 400.0 })
        .unwrap();
    ed.apply_menu(MenuAction::AddText).unwrap();
    assert_eq!(seen.borrow().len(), 2);

    // Menu open/close and deselection are not page changes.
    ed.handle_event(&InputEvent::key("Escape", FocusTarget::Canvas))
        .unwrap();
    ed.apply_menu(MenuAction::Close).unwrap();
    assert_eq!(seen.borrow().len(), 2);

    assert_eq!(seen.borrow().last().map(String::as_str), Some(ed.html()));
}

// ─── Import ──────────────────────────────────────────────────────────────

#[test]
fn import_only_on_key_change() {
    let config = EditorConfig::default();
    let external = emit_html(
        &[Element::text("from code", Rect::new(5.0, 5.0, 200.0, 100.0), &config)],
        720.0,
    );
    let mut ed: PageEditor<FakeText> = PageEditor::new(config);

    assert_eq!(ed.sync(None, &external), ImportOutcome::KeyUnchanged);
    assert_eq!(ed.elements()[0].text_content(), Some("Click the text to edit."));

    assert!(matches!(
        ed.sync(Some("a".into()), &external),
        ImportOutcome::Replaced { count: 1, .. }
    ));
    assert_eq!(ed.elements()[0].text_content(), Some("from code"));

    // Same key, different html: ignored.
    assert_eq!(ed.sync(Some("a".into()), "<div></div>"), ImportOutcome::KeyUnchanged);
}

#[test]
fn garbage_import_leaves_canvas_alone() {
    let mut ed: PageEditor<FakeText> = PageEditor::new(EditorConfig::default());
    let before = ed.html().to_string();
    assert_eq!(ed.sync(Some(1.into()), ""), ImportOutcome::NothingImported);
    assert_eq!(
        ed.sync(Some(2.into()), "<<<not html at all"),
        ImportOutcome::NothingImported
    );
    assert_eq!(ed.html(), before);
    assert_eq!(ed.elements().len(), 1);
}

#[test]
fn import_discarding_canvas_edits_is_reported() {
    let config = EditorConfig::default();
    let external = emit_html(
        &[Element::text("older", Rect::new(0.0, 0.0, 320.0, 120.0), &config)],
        720.0,
    );
    let mut ed: PageEditor<FakeText> = PageEditor::new(config);
    ed.handle_event(&InputEvent::ContextMenu { x: 500.0, y: 300.0 })
        .unwrap();
    ed.apply_menu(MenuAction::AddText).unwrap();
    ed.handle_event(&InputEvent::ContextMenu { x: 510.0, y: 310.0 })
        .unwrap();
    assert!(ed.has_unsynced_edits());

    let outcome = ed.sync(Some(1.into()), &external);
    assert_eq!(
        outcome,
        ImportOutcome::Replaced {
            count: 1,
            discarded_unsynced: true
        }
    );
    assert_eq!(ed.selected(), None);
    assert!(!ed.menu().is_open());
    assert!(!ed.has_unsynced_edits());
}

#[test]
fn imported_text_reaches_new_surfaces() {
    let config = EditorConfig::default();
    let external = emit_html(
        &[Element::text("a < b", Rect::new(0.0, 0.0, 320.0, 120.0), &config)],
        720.0,
    );
    let mut ed: PageEditor<FakeText> = PageEditor::new(config);
    let old = ed.elements()[0].id;
    let old_surface = FakeText::new();
    ed.attach_text(old, old_surface.clone());

    ed.sync(Some(1.into()), &external);
    // Old block is gone, so is its surface.
    assert!(ed.text_surface(old).is_none());

    let new_id = ed.elements()[0].id;
    let surface = FakeText::new();
    ed.attach_text(new_id, surface.clone());
    assert_eq!(surface.content(), "a < b");
}
