//! Floating windows and the manager that owns them.

mod dock_manager;

pub use dock_manager::DockManager;

use ratatui::prelude::Rect;

use crate::drop::DragProfile;
use crate::layout::{PaneNode, WindowId};

/// The content family a floating window was created for. Document windows
/// may host anchorables tabbed alongside their documents; anchorable windows
/// host anchorables only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    Document,
    Anchorable,
}

/// A top-level floating surface hosting a pane tree. Constructed by
/// [`DockManager::open_window`]; `bounds` are screen cells.
#[derive(Debug, Clone)]
pub struct FloatingWindow<T> {
    id: WindowId,
    kind: WindowKind,
    title: String,
    root: PaneNode<T>,
    bounds: Rect,
    owned_by_manager_window: bool,
}

impl<T> FloatingWindow<T> {
    pub(crate) fn new(
        id: WindowId,
        kind: WindowKind,
        title: impl Into<String>,
        root: PaneNode<T>,
    ) -> Self {
        Self {
            id,
            kind,
            title: title.into(),
            root,
            bounds: Rect::default(),
            owned_by_manager_window: true,
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn root(&self) -> &PaneNode<T> {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut PaneNode<T> {
        &mut self.root
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// Whether this window is owned by the manager's top-level window. An
    /// independently ownable window leaves the drop overlay unowned too.
    pub fn owned_by_manager_window(&self) -> bool {
        self.owned_by_manager_window
    }

    pub fn set_owned_by_manager_window(&mut self, owned: bool) {
        self.owned_by_manager_window = owned;
    }

    /// What drop-target discovery reads off this window while it is being
    /// dragged. Hidden anchorables still count: they travel with the window.
    pub fn drag_profile(&self) -> DragProfile {
        let docks_as_tabbed_document = self
            .root
            .items()
            .iter()
            .all(|item| item.caps().docks_as_tabbed_document());
        DragProfile {
            kind: self.kind,
            docks_as_tabbed_document,
            owned_by_manager_window: self.owned_by_manager_window,
        }
    }

    /// True when no pane hosts a visible item. Hidden items do not count.
    pub fn has_visible_content(&self) -> bool {
        self.root.has_visible_content()
    }

    /// True when the tree hosts nothing at all, hidden items included.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{ContentId, ContentItem, PaneId, PaneKind};

    fn anchorable(id: u64) -> ContentItem<()> {
        ContentItem::anchorable(ContentId::new(id), format!("a{id}"), ())
    }

    fn window_with(items: Vec<ContentItem<()>>) -> FloatingWindow<()> {
        let pane = PaneId::new(1);
        let mut root = PaneNode::pane(pane, PaneKind::Anchorable);
        for item in items {
            root.add_item(pane, item).unwrap();
        }
        FloatingWindow::new(WindowId::new(1), WindowKind::Anchorable, "tools", root)
    }

    #[test]
    fn drag_profile_reflects_a_single_dissenter() {
        let mut dissenter = anchorable(2);
        dissenter.set_dock_as_tabbed_document(false);
        let window = window_with(vec![anchorable(1), dissenter, anchorable(3)]);
        assert!(!window.drag_profile().docks_as_tabbed_document);

        let window = window_with(vec![anchorable(1), anchorable(3)]);
        assert!(window.drag_profile().docks_as_tabbed_document);
    }

    #[test]
    fn hidden_dissenter_still_counts() {
        let mut dissenter = anchorable(2);
        dissenter.set_dock_as_tabbed_document(false);
        let mut window = window_with(vec![anchorable(1), dissenter]);
        assert!(window.root_mut().hide(ContentId::new(2)));
        assert!(!window.drag_profile().docks_as_tabbed_document);
    }

    #[test]
    fn visibility_and_emptiness_diverge_on_hidden_items() {
        let mut window = window_with(vec![anchorable(1)]);
        assert!(window.has_visible_content());
        assert!(!window.is_empty());
        window.root_mut().hide(ContentId::new(1));
        assert!(!window.has_visible_content());
        assert!(!window.is_empty());
    }
}
