//! Integration tests: pointer, keyboard and text-surface interaction
//! driven through `PageEditor` the way a browser host drives it.

mod common;

use common::FakeText;
use dd_core::model::*;
use dd_core::{EditorConfig, ElementId};
use dd_editor::{EventOutcome, FocusTarget, InputEvent, MediaFile, MenuAction, PageEditor};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

// ─── Helpers ─────────────────────────────────────────────────────────────

fn editor() -> PageEditor<FakeText> {
    PageEditor::new(EditorConfig::default())
}

fn seed(ed: &PageEditor<FakeText>) -> ElementId {
    ed.elements()[0].id
}

fn rect_of(ed: &PageEditor<FakeText>, id: ElementId) -> Rect {
    ed.store().get(id).unwrap().rect
}

fn add_text_at(ed: &mut PageEditor<FakeText>, x: f32, y: f32) -> ElementId {
    ed.handle_event(&InputEvent::ContextMenu { x, y }).unwrap();
    ed.apply_menu(MenuAction::AddText).unwrap();
    ed.selected().unwrap()
}

fn click(ed: &mut PageEditor<FakeText>, x: f32, y: f32) {
    ed.handle_event(&InputEvent::pointer_down(x, y)).unwrap();
    ed.handle_event(&InputEvent::pointer_up(x, y)).unwrap();
}

// ─── Selection & z-order ─────────────────────────────────────────────────

#[test]
fn touched_block_always_holds_max_z() {
    let mut ed = editor();
    let a = seed(&ed);
    let b = add_text_at(&mut ed, 500.0, 300.0);
    let c = add_text_at(&mut ed, 900.0, 500.0);

    for (id, (x, y)) in [(a, (100.0, 100.0)), (c, (950.0, 550.0)), (b, (550.0, 350.0)), (a, (70.0, 70.0))] {
        click(&mut ed, x, y);
        assert_eq!(ed.selected(), Some(id));
        let z = ed.store().get(id).unwrap().z;
        for other in ed.elements().iter().filter(|el| el.id != id) {
            assert!(z > other.z, "{id} z={z} not above {} z={}", other.id, other.z);
        }
    }
}

#[test]
fn clicking_a_block_body_keeps_it_in_place() {
    let mut ed = editor();
    let id = seed(&ed);
    click(&mut ed, 200.0, 120.0);
    assert_eq!(ed.selected(), Some(id));
    assert_eq!(rect_of(&ed, id), Rect::new(60.0, 60.0, 320.0, 120.0));
}

// ─── Drag & resize ───────────────────────────────────────────────────────

#[test]
fn edge_drag_moves_block_on_release() {
    let mut ed = editor();
    let id = seed(&ed);
    click(&mut ed, 200.0, 120.0);

    // Grab the top edge strip.
    ed.handle_event(&InputEvent::pointer_down(200.0, 58.0)).unwrap();
    let out = ed
        .handle_event(&InputEvent::pointer_move(250.0, 108.0))
        .unwrap();
    assert_eq!(out, EventOutcome::Handled);
    assert_eq!(ed.preview(), Some((id, Rect::new(110.0, 110.0, 320.0, 120.0))));
    // Model untouched until release.
    assert_eq!(rect_of(&ed, id).x, 60.0);

    ed.handle_event(&InputEvent::pointer_up(250.0, 108.0)).unwrap();
    assert_eq!(rect_of(&ed, id), Rect::new(110.0, 110.0, 320.0, 120.0));
    assert!(ed.html().contains("left:110px;top:110px;"));
}

#[test]
fn body_drag_does_not_move() {
    let mut ed = editor();
    let id = seed(&ed);
    click(&mut ed, 200.0, 120.0);
    ed.handle_event(&InputEvent::pointer_down(200.0, 120.0)).unwrap();
    let out = ed
        .handle_event(&InputEvent::pointer_move(260.0, 160.0))
        .unwrap();
    assert_eq!(out, EventOutcome::Ignored);
    ed.handle_event(&InputEvent::pointer_up(260.0, 160.0)).unwrap();
    assert_eq!(rect_of(&ed, id), Rect::new(60.0, 60.0, 320.0, 120.0));
}

#[test]
fn resize_floor_holds_for_any_request() {
    let requests = [(70.0, 65.0), (-500.0, -500.0), (121.0, 101.0), (60.0, 60.0)];
    for (px, py) in requests {
        let mut ed = editor();
        let id = seed(&ed);
        click(&mut ed, 200.0, 120.0);
        // Bottom-right corner of (60, 60, 320, 120).
        ed.handle_event(&InputEvent::pointer_down(380.0, 180.0)).unwrap();
        ed.handle_event(&InputEvent::pointer_move(px, py)).unwrap();
        ed.handle_event(&InputEvent::pointer_up(px, py)).unwrap();
        let r = rect_of(&ed, id);
        assert!(r.w >= 60.0 && r.h >= 40.0, "request ({px}, {py}) gave {r:?}");
        assert_eq!((r.x, r.y), (60.0, 60.0));
    }
}

#[test]
fn top_left_resize_moves_origin() {
    let mut ed = editor();
    let id = seed(&ed);
    click(&mut ed, 200.0, 120.0);
    ed.handle_event(&InputEvent::pointer_down(61.0, 61.0)).unwrap();
    ed.handle_event(&InputEvent::pointer_move(40.0, 30.0)).unwrap();
    ed.handle_event(&InputEvent::pointer_up(40.0, 30.0)).unwrap();
    assert_eq!(rect_of(&ed, id), Rect::new(40.0, 30.0, 340.0, 150.0));
}

#[test]
fn drag_stays_inside_measured_canvas() {
    let mut ed = editor();
    ed.set_canvas_frame(Some((0.0, 0.0)), Some(1000.0));
    let id = seed(&ed);
    click(&mut ed, 200.0, 120.0);
    ed.handle_event(&InputEvent::pointer_down(200.0, 58.0)).unwrap();
    ed.handle_event(&InputEvent::pointer_move(2000.0, -400.0)).unwrap();
    ed.handle_event(&InputEvent::pointer_up(2000.0, -400.0)).unwrap();
    assert_eq!(rect_of(&ed, id), Rect::new(680.0, 0.0, 320.0, 120.0));
}

// ─── Delete arbitration ──────────────────────────────────────────────────

#[test]
fn delete_while_editing_text_keeps_block() {
    let mut ed = editor();
    let id = seed(&ed);
    let surface = FakeText::new();
    ed.attach_text(id, surface.clone());
    ed.text_focused(id).unwrap();
    assert_eq!(ed.selected(), Some(id));

    let out = ed
        .handle_event(&InputEvent::key("Delete", FocusTarget::EditableText(id)))
        .unwrap();
    assert_eq!(out, EventOutcome::TextKeyResync(id));
    assert!(ed.store().contains(id));

    // Host misreports focus; the surface's own focus flag still wins.
    let out = ed
        .handle_event(&InputEvent::key("Backspace", FocusTarget::Canvas))
        .unwrap();
    assert_eq!(out, EventOutcome::TextKeyResync(id));
    assert!(ed.store().contains(id));

    let out = ed
        .handle_event(&InputEvent::key("x", FocusTarget::EditableText(id)))
        .unwrap();
    assert_eq!(out, EventOutcome::TextKey);
}

#[test]
fn delete_in_form_control_is_ignored() {
    let mut ed = editor();
    let id = seed(&ed);
    click(&mut ed, 200.0, 120.0);
    let out = ed
        .handle_event(&InputEvent::key("Backspace", FocusTarget::FormControl))
        .unwrap();
    assert_eq!(out, EventOutcome::Ignored);
    assert!(ed.store().contains(id));
}

#[test]
fn delete_on_canvas_removes_exactly_the_selection() {
    let mut ed = editor();
    let keep = seed(&ed);
    let doomed = add_text_at(&mut ed, 500.0, 300.0);
    ed.attach_text(doomed, FakeText::new());
    ed.text_focused(doomed).unwrap();
    ed.text_blurred(doomed);

    let out = ed
        .handle_event(&InputEvent::key("Delete", FocusTarget::Canvas))
        .unwrap();
    assert_eq!(out, EventOutcome::Handled);
    assert!(!ed.store().contains(doomed));
    assert!(ed.store().contains(keep));
    assert_eq!(ed.selected(), None);
    assert!(ed.text_surface(doomed).is_none());

    // Nothing selected now: Delete is not ours.
    let out = ed
        .handle_event(&InputEvent::key("Delete", FocusTarget::Canvas))
        .unwrap();
    assert_eq!(out, EventOutcome::Ignored);
    assert_eq!(ed.elements().len(), 1);
}

#[test]
fn menu_delete_closes_menu() {
    let mut ed = editor();
    ed.handle_event(&InputEvent::ContextMenu { x: 100.0, y: 100.0 })
        .unwrap();
    assert!(ed.menu_controls().delete);
    ed.apply_menu(MenuAction::DeleteSelected).unwrap();
    assert!(ed.elements().is_empty());
    assert!(!ed.menu().is_open());
}

// ─── Text surfaces ───────────────────────────────────────────────────────

#[test]
fn focused_surface_survives_unrelated_changes() {
    let mut ed = editor();
    let id = seed(&ed);
    let surface = FakeText::new();
    ed.attach_text(id, surface.clone());
    assert_eq!(surface.content(), "Click the text to edit.");
    assert_eq!(surface.writes(), 1);

    ed.text_focused(id).unwrap();
    surface.caret_to_end();
    surface.type_str(" Now");
    assert!(ed.text_input(id).unwrap());
    assert_eq!(
        ed.store().get(id).unwrap().text_content(),
        Some("Click the text to edit. Now")
    );
    let caret = surface.cursor();

    // Unrelated model churn while focused.
    ed.apply_menu(MenuAction::SetVariant(Variant::Border)).unwrap();
    ed.apply_menu(MenuAction::SetFontSize(24)).unwrap();
    ed.attach_media(
        MediaKind::Image,
        MediaFile::new("a.png", "image/png", vec![7, 7, 7]),
    )
    .unwrap();

    assert_eq!(surface.writes(), 1);
    assert_eq!(surface.cursor(), caret);
    assert_eq!(surface.content(), "Click the text to edit. Now");
}

#[test]
fn backspace_resync_reads_surface_after_deletion() {
    let mut ed = editor();
    let id = seed(&ed);
    let surface = FakeText::new();
    ed.attach_text(id, surface.clone());
    ed.text_focused(id).unwrap();
    surface.caret_to_end();

    let out = ed
        .handle_event(&InputEvent::key("Backspace", FocusTarget::EditableText(id)))
        .unwrap();
    assert_eq!(out, EventOutcome::TextKeyResync(id));
    // The platform applies the deletion before the next frame.
    surface.backspace();
    ed.resync_text(id).unwrap();
    assert_eq!(
        ed.store().get(id).unwrap().text_content(),
        Some("Click the text to edit")
    );
}

#[test]
fn blurred_surface_takes_model_text() {
    let mut ed = editor();
    let id = seed(&ed);
    let surface = FakeText::new();
    ed.attach_text(id, surface.clone());
    ed.text_focused(id).unwrap();
    surface.type_str("stale ");
    // Input never reported; on blur the model wins again.
    ed.text_blurred(id);
    assert_eq!(surface.content(), "Click the text to edit.");
}

#[test]
fn new_text_focus_is_handed_to_the_host_after_release() {
    let ed = Rc::new(RefCell::new(editor()));
    let id = add_text_at(&mut ed.borrow_mut(), 500.0, 300.0);
    let surface = FakeText::new();
    ed.borrow_mut().attach_text(id, surface.clone());
    assert_eq!(surface.content(), "New text");

    // The host's focus handler re-enters the editor, the way a DOM node's
    // `focus` event does when `focus()` is called on it.
    let host = Rc::clone(&ed);
    let focus_node = move |id: ElementId| host.borrow_mut().text_focused(id).unwrap();

    let request = ed.borrow_mut().take_focus_request();
    assert_eq!(request, Some(id));
    focus_node(id);

    let out = ed
        .borrow_mut()
        .handle_event(&InputEvent::key("Backspace", FocusTarget::Canvas))
        .unwrap();
    assert_eq!(out, EventOutcome::TextKeyResync(id));
    assert_eq!(ed.borrow_mut().take_focus_request(), None);
}
