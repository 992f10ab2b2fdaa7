use ratatui::layout::Rect;

use term_dock::drop::{DropAreaKind, DropPolicy};
use term_dock::layout::{ContentId, ContentItem, PaneKind, PaneNode, WindowId};
use term_dock::window::{DockManager, WindowKind};

/// One document window at the origin and one tool window to its right.
fn dock_pair() -> (DockManager<u8>, WindowId, WindowId, ContentId) {
    let mut mgr = DockManager::new();

    let pane = mgr.alloc_pane_id();
    let mut root = PaneNode::pane(pane, PaneKind::Document);
    let doc = mgr.alloc_content_id();
    root.add_item(pane, ContentItem::document(doc, "main.rs", 0)).unwrap();
    let editor = mgr.open_window(WindowKind::Document, "editor", root);

    let pane = mgr.alloc_pane_id();
    let mut root = PaneNode::pane(pane, PaneKind::Anchorable);
    let tool = mgr.alloc_content_id();
    root.add_item(pane, ContentItem::anchorable(tool, "outline", 0)).unwrap();
    let tools = mgr.open_window(WindowKind::Anchorable, "tools", root);

    mgr.window_mut(editor).unwrap().set_bounds(Rect::new(0, 0, 24, 10));
    mgr.window_mut(tools).unwrap().set_bounds(Rect::new(30, 0, 20, 10));
    (mgr, editor, tools, tool)
}

#[test]
fn anchorable_drag_offers_document_panes() {
    let (mut mgr, editor, tools, _) = dock_pair();

    mgr.show_overlay(editor, tools).unwrap();
    let areas = mgr.drop_areas(editor, tools).to_vec();
    assert_eq!(areas.len(), 1);
    assert_eq!(areas[0].kind, DropAreaKind::DocumentPane);
    // the surface sits inside the target's bounds
    assert!(areas[0].surface.bounds.x < 24);
}

#[test]
fn dissenter_suppresses_document_panes() {
    let (mut mgr, editor, tools, tool) = dock_pair();
    mgr.window_mut(tools)
        .unwrap()
        .root_mut()
        .item_mut(tool)
        .unwrap()
        .set_dock_as_tabbed_document(false);

    mgr.show_overlay(editor, tools).unwrap();
    assert!(mgr.drop_areas(editor, tools).is_empty());
}

#[test]
fn document_drag_needs_the_policy_flag() {
    let (mut mgr, editor, _, _) = dock_pair();
    // a second document window to drag over the first
    let pane = mgr.alloc_pane_id();
    let mut root = PaneNode::pane(pane, PaneKind::Document);
    let doc = mgr.alloc_content_id();
    root.add_item(pane, ContentItem::document(doc, "lib.rs", 0)).unwrap();
    let other = mgr.open_window(WindowKind::Document, "editor 2", root);
    mgr.window_mut(other).unwrap().set_bounds(Rect::new(0, 20, 24, 10));

    mgr.show_overlay(editor, other).unwrap();
    assert!(mgr.drop_areas(editor, other).is_empty());

    mgr.set_drop_policy(DropPolicy {
        document_window_targets_document_panes: true,
    });
    mgr.show_overlay(editor, other).unwrap();
    let areas = mgr.drop_areas(editor, other);
    assert_eq!(areas.len(), 1);
    assert_eq!(areas[0].kind, DropAreaKind::DocumentPane);
}

#[test]
fn drop_areas_are_cached_for_the_whole_gesture() {
    let (mut mgr, editor, tools, _) = dock_pair();

    mgr.show_overlay(editor, tools).unwrap();
    assert_eq!(mgr.drop_areas(editor, tools).len(), 1);

    // emptying the target mid-gesture does not change the cached answer
    let doc = mgr
        .window(editor)
        .unwrap()
        .root()
        .visible_items()
        .first()
        .map(|item| item.id())
        .unwrap();
    mgr.window_mut(editor).unwrap().root_mut().detach(doc);
    assert_eq!(mgr.drop_areas(editor, tools).len(), 1);

    // ending the gesture drops the cache; the next one re-enumerates
    mgr.hide_overlay();
    mgr.show_overlay(editor, tools).unwrap();
    assert!(mgr.drop_areas(editor, tools).is_empty());
}

#[test]
fn hit_test_never_matches_the_origin_sentinel() {
    let (mut mgr, editor, tools, _) = dock_pair();

    mgr.show_overlay(editor, tools).unwrap();
    // the editor covers the origin, but (0, 0) means "no drag point"
    assert!(!mgr.overlay_hit_test(0, 0));
    assert!(mgr.overlay_hit_test(1, 1));
    assert!(mgr.overlay_hit_test(23, 9));
    assert!(!mgr.overlay_hit_test(24, 0));

    mgr.hide_overlay();
    assert!(!mgr.overlay_hit_test(1, 1));
}

#[test]
fn overlay_ownership_follows_the_dragged_window() {
    let (mut mgr, editor, tools, _) = dock_pair();
    mgr.window_mut(tools)
        .unwrap()
        .set_owned_by_manager_window(false);

    let overlay = mgr.show_overlay(editor, tools).unwrap();
    assert!(!overlay.owned_by_manager_window());
    assert!(overlay.targets_active());
}
