//! Drop-target discovery for drag-docking gestures.
//!
//! While a floating window is dragged over another, the target offers a set
//! of [`DropArea`]s. Enumeration is driven by one [`DropPolicy`] for every
//! window kind, cached per gesture, and fed by a [`SurfaceLocator`] so hosts
//! can substitute their own pane geometry.

use ratatui::prelude::Rect;

use crate::layout::{PaneId, PaneKind};
use crate::window::{FloatingWindow, WindowKind};

/// Kind tag on a drop area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropAreaKind {
    AnchorablePane,
    DocumentPane,
}

impl From<PaneKind> for DropAreaKind {
    fn from(kind: PaneKind) -> Self {
        match kind {
            PaneKind::Anchorable => DropAreaKind::AnchorablePane,
            PaneKind::Document => DropAreaKind::DocumentPane,
        }
    }
}

/// A pane-host surface under the target window's visual root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneSurface {
    pub pane: PaneId,
    /// Screen cells.
    pub bounds: Rect,
}

/// One surface a dragged window may dock onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropArea {
    pub surface: PaneSurface,
    pub kind: DropAreaKind,
}

/// Enumeration policy, one rule for every dragged-window kind: anchorable
/// panes are always offered; document panes are offered to anchorable
/// windows unless a hosted anchorable dissents, and to document windows only
/// when `document_window_targets_document_panes` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DropPolicy {
    /// Off by default: dragging a document window re-docks via its own
    /// chrome, not by targeting another window's document panes.
    pub document_window_targets_document_panes: bool,
}

/// What discovery reads off the window being dragged. Computed by
/// [`FloatingWindow::drag_profile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragProfile {
    pub kind: WindowKind,
    /// False when any hosted anchorable forbids tabbing into document panes.
    pub docks_as_tabbed_document: bool,
    /// Carried through to overlay ownership.
    pub owned_by_manager_window: bool,
}

/// Enumerates pane-host surfaces of one kind under a target window's visual
/// root. Injected so discovery never walks presentation internals itself.
pub trait SurfaceLocator {
    fn pane_surfaces(&self, kind: PaneKind) -> Vec<PaneSurface>;
}

/// Locator over a window's own pane tree: a pane's surface is its layout
/// region within the window bounds, and panes with no visible content are
/// not drop surfaces.
pub struct WindowSurfaces<'a, T> {
    window: &'a FloatingWindow<T>,
}

impl<'a, T> WindowSurfaces<'a, T> {
    pub fn new(window: &'a FloatingWindow<T>) -> Self {
        Self { window }
    }
}

impl<T> SurfaceLocator for WindowSurfaces<'_, T> {
    fn pane_surfaces(&self, kind: PaneKind) -> Vec<PaneSurface> {
        let root = self.window.root();
        // panes() and pane_regions() share one depth-first order
        root.panes()
            .into_iter()
            .zip(root.pane_regions(self.window.bounds()))
            .filter(|(pane, _)| pane.kind() == kind && pane.has_visible_items())
            .map(|(pane, (_, _, bounds))| PaneSurface {
                pane: pane.id(),
                bounds,
            })
            .collect()
    }
}

/// Per-gesture cache of drop areas for one target window.
#[derive(Debug)]
pub struct DropAreaRegistry {
    policy: DropPolicy,
    cache: Option<Vec<DropArea>>,
}

impl DropAreaRegistry {
    pub fn new(policy: DropPolicy) -> Self {
        Self {
            policy,
            cache: None,
        }
    }

    pub fn policy(&self) -> DropPolicy {
        self.policy
    }

    /// Areas for the current gesture, enumerated on first call and cached
    /// until [`invalidate`](Self::invalidate).
    pub fn drop_areas(
        &mut self,
        profile: DragProfile,
        surfaces: &dyn SurfaceLocator,
    ) -> &[DropArea] {
        let policy = self.policy;
        self.cache
            .get_or_insert_with(|| enumerate_drop_areas(policy, profile, surfaces))
            .as_slice()
    }

    /// Forget the cache; the next query re-enumerates.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }
}

fn enumerate_drop_areas(
    policy: DropPolicy,
    profile: DragProfile,
    surfaces: &dyn SurfaceLocator,
) -> Vec<DropArea> {
    let mut areas = Vec::new();
    for surface in surfaces.pane_surfaces(PaneKind::Anchorable) {
        areas.push(DropArea {
            surface,
            kind: DropAreaKind::AnchorablePane,
        });
    }
    let include_document_panes = match profile.kind {
        WindowKind::Document => policy.document_window_targets_document_panes,
        WindowKind::Anchorable => profile.docks_as_tabbed_document,
    };
    if include_document_panes {
        for surface in surfaces.pane_surfaces(PaneKind::Document) {
            areas.push(DropArea {
                surface,
                kind: DropAreaKind::DocumentPane,
            });
        }
    }
    tracing::trace!(count = areas.len(), kind = ?profile.kind, "enumerated drop areas");
    areas
}
