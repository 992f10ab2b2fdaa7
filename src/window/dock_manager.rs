//! Owner of the floating windows, their adapters, and the drag overlay.

use std::collections::BTreeMap;

use crate::adapter::AdapterMap;
use crate::cascade::{self, CloseVerdict, DockDelegate};
use crate::drop::{DropArea, DropPolicy, WindowSurfaces};
use crate::layout::{ContentId, DockError, PaneId, PaneNode, WindowId, rect_contains};
use crate::overlay::{DropOverlay, OverlayHost};
use crate::window::{FloatingWindow, WindowKind};

struct OverlaySlot {
    target: WindowId,
    host: OverlayHost,
}

/// Owns every floating window and drives the close/hide and drag-docking
/// protocols. Hosts feed it events and render from its state.
pub struct DockManager<T> {
    windows: BTreeMap<WindowId, FloatingWindow<T>>,
    /// Last entry is topmost.
    z_order: Vec<WindowId>,
    adapters: AdapterMap<T>,
    policy: DropPolicy,
    /// At most one drag overlay is alive, over at most one target.
    overlay: Option<OverlaySlot>,
    closed_windows: Vec<WindowId>,
    show_system_menu: bool,
    next_window: u64,
    next_pane: u64,
    next_content: u64,
}

impl<T> DockManager<T> {
    pub fn new() -> Self {
        Self {
            windows: BTreeMap::new(),
            z_order: Vec::new(),
            adapters: AdapterMap::new(),
            policy: DropPolicy::default(),
            overlay: None,
            closed_windows: Vec::new(),
            show_system_menu: true,
            next_window: 1,
            next_pane: 1,
            next_content: 1,
        }
    }

    pub fn adapters(&self) -> &AdapterMap<T> {
        &self.adapters
    }

    pub fn adapters_mut(&mut self) -> &mut AdapterMap<T> {
        &mut self.adapters
    }

    pub fn drop_policy(&self) -> DropPolicy {
        self.policy
    }

    /// Change the enumeration policy. Any in-flight gesture is torn down so
    /// the next one picks the new policy up.
    pub fn set_drop_policy(&mut self, policy: DropPolicy) {
        self.policy = policy;
        self.hide_overlay();
    }

    /// Whether window chrome should offer the system menu.
    pub fn show_system_menu(&self) -> bool {
        self.show_system_menu
    }

    pub fn set_show_system_menu(&mut self, show: bool) {
        self.show_system_menu = show;
    }

    pub fn alloc_content_id(&mut self) -> ContentId {
        let id = ContentId::new(self.next_content);
        self.next_content += 1;
        id
    }

    pub fn alloc_pane_id(&mut self) -> PaneId {
        let id = PaneId::new(self.next_pane);
        self.next_pane += 1;
        id
    }

    /// Open a floating window hosting `root`. The new window is topmost.
    pub fn open_window(
        &mut self,
        kind: WindowKind,
        title: impl Into<String>,
        root: PaneNode<T>,
    ) -> WindowId {
        let id = WindowId::new(self.next_window);
        self.next_window += 1;
        self.windows.insert(id, FloatingWindow::new(id, kind, title, root));
        self.z_order.push(id);
        tracing::debug!(window_id = ?id, "opened window");
        id
    }

    pub fn window(&self, id: WindowId) -> Option<&FloatingWindow<T>> {
        self.windows.get(&id)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut FloatingWindow<T>> {
        self.windows.get_mut(&id)
    }

    pub fn window_ids(&self) -> Vec<WindowId> {
        self.windows.keys().copied().collect()
    }

    /// Bottom-to-top draw order.
    pub fn z_order(&self) -> &[WindowId] {
        &self.z_order
    }

    pub fn bring_to_front(&mut self, id: WindowId) {
        if self.windows.contains_key(&id) {
            self.z_order.retain(|window_id| *window_id != id);
            self.z_order.push(id);
        }
    }

    /// Topmost window containing the cell, if any.
    pub fn window_at(&self, column: u16, row: u16) -> Option<WindowId> {
        for id in self.z_order.iter().rev() {
            if let Some(window) = self.windows.get(id)
                && rect_contains(window.bounds(), column, row)
            {
                return Some(*id);
            }
        }
        None
    }

    /// User-initiated close: run the full two-phase protocol, tear the
    /// window down only on a close verdict, and prune windows other close
    /// actions may have emptied.
    pub fn request_close(
        &mut self,
        id: WindowId,
        delegate: &mut dyn DockDelegate<T>,
    ) -> CloseVerdict {
        let Some(window) = self.windows.get_mut(&id) else {
            tracing::warn!(window_id = ?id, "close requested for unknown window");
            return CloseVerdict::Cancel;
        };
        let verdict = cascade::request_close(window, &self.adapters, delegate);
        if verdict == CloseVerdict::Close {
            self.close_window(id);
        }
        self.prune_empty_windows();
        verdict
    }

    /// Programmatic close: no validation, no per-item notifications. The id
    /// is queued for [`take_closed_windows`](Self::take_closed_windows).
    pub fn close_window(&mut self, id: WindowId) {
        if self.windows.remove(&id).is_some() {
            self.z_order.retain(|window_id| *window_id != id);
            if self.overlay.as_ref().is_some_and(|slot| slot.target == id) {
                self.hide_overlay();
            }
            self.closed_windows.push(id);
            tracing::debug!(window_id = ?id, "closing window");
        }
    }

    /// Windows torn down since the last call, in close order.
    pub fn take_closed_windows(&mut self) -> Vec<WindowId> {
        std::mem::take(&mut self.closed_windows)
    }

    /// Close every window whose tree hosts nothing at all. A window whose
    /// last visible item was hidden is retained, not pruned.
    pub fn prune_empty_windows(&mut self) {
        let empty: Vec<WindowId> = self
            .windows
            .iter()
            .filter(|(_, window)| window.is_empty())
            .map(|(&id, _)| id)
            .collect();
        for id in empty {
            self.close_window(id);
        }
    }

    pub fn can_close_all_content(&self, id: WindowId) -> bool {
        self.windows
            .get(&id)
            .is_some_and(|window| cascade::can_close_all_content(window, &self.adapters))
    }

    /// Title-bar "close all": runs each item's close action without the
    /// validation hooks, then prunes. Returns false when gating fails.
    pub fn close_all_content(&mut self, id: WindowId, delegate: &mut dyn DockDelegate<T>) -> bool {
        let Some(window) = self.windows.get_mut(&id) else {
            return false;
        };
        if !cascade::can_close_all_content(window, &self.adapters) {
            return false;
        }
        cascade::close_all_content(window, &self.adapters, delegate);
        self.prune_empty_windows();
        true
    }

    pub fn can_hide_all_content(&self, id: WindowId) -> bool {
        self.windows
            .get(&id)
            .is_some_and(|window| cascade::can_hide_all_content(window, &self.adapters))
    }

    /// Title-bar "hide all". The window stays resident: hidden content
    /// keeps it alive. Returns false when gating fails.
    pub fn hide_all_content(&mut self, id: WindowId, delegate: &mut dyn DockDelegate<T>) -> bool {
        let Some(window) = self.windows.get_mut(&id) else {
            return false;
        };
        if !cascade::can_hide_all_content(window, &self.adapters) {
            return false;
        }
        cascade::hide_all_content(window, &self.adapters, delegate);
        true
    }

    /// Hide one anchorable directly, bypassing the close/hide protocol.
    /// Returns whether the hide took effect.
    pub fn hide_content(&mut self, window: WindowId, content: ContentId) -> Result<bool, DockError> {
        let win = self
            .windows
            .get_mut(&window)
            .ok_or(DockError::UnknownWindow(window))?;
        if win.root().item(content).is_none() {
            return Err(DockError::UnknownContent(content));
        }
        Ok(win.root_mut().hide(content))
    }

    /// Mount a hidden item back into its pane. Returns whether the restore
    /// took effect.
    pub fn restore_content(
        &mut self,
        window: WindowId,
        content: ContentId,
    ) -> Result<bool, DockError> {
        let win = self
            .windows
            .get_mut(&window)
            .ok_or(DockError::UnknownWindow(window))?;
        if win.root().item(content).is_none() {
            return Err(DockError::UnknownContent(content));
        }
        Ok(win.root_mut().restore(content))
    }

    /// Show (or refresh) the drop overlay over `target` while `dragging` is
    /// in flight. Switching targets tears the previous overlay down first.
    pub fn show_overlay(&mut self, target: WindowId, dragging: WindowId) -> Option<&DropOverlay> {
        if target == dragging {
            return None;
        }
        let profile = self.windows.get(&dragging)?.drag_profile();
        if !self.windows.contains_key(&target) {
            return None;
        }
        if self.overlay.as_ref().is_some_and(|slot| slot.target != target) {
            self.hide_overlay();
        }
        let policy = self.policy;
        let slot = self.overlay.get_or_insert_with(|| OverlaySlot {
            target,
            host: OverlayHost::new(policy),
        });
        let window = self.windows.get(&target)?;
        slot.host.set_target_bounds(window.bounds());
        let surfaces = WindowSurfaces::new(window);
        Some(slot.host.show_overlay(profile, &surfaces))
    }

    /// Tear down the drag overlay, if any. Idempotent.
    pub fn hide_overlay(&mut self) {
        if let Some(mut slot) = self.overlay.take() {
            slot.host.hide_overlay();
        }
    }

    pub fn overlay(&self) -> Option<&DropOverlay> {
        self.overlay.as_ref().and_then(|slot| slot.host.overlay())
    }

    pub fn overlay_target(&self) -> Option<WindowId> {
        self.overlay.as_ref().map(|slot| slot.target)
    }

    /// Cached drop areas for the gesture shown by
    /// [`show_overlay`](Self::show_overlay). Empty when no overlay targets
    /// `target`.
    pub fn drop_areas(&mut self, target: WindowId, dragging: WindowId) -> &[DropArea] {
        let profile = match self.windows.get(&dragging) {
            Some(window) => window.drag_profile(),
            None => return &[],
        };
        let Some(slot) = self.overlay.as_mut() else {
            return &[];
        };
        if slot.target != target {
            return &[];
        }
        let Some(window) = self.windows.get(&target) else {
            return &[];
        };
        let surfaces = WindowSurfaces::new(window);
        slot.host.drop_areas(profile, &surfaces)
    }

    /// Whether a screen cell falls inside the overlay's target window.
    /// `(0, 0)` is the no-drag sentinel and never hits.
    pub fn overlay_hit_test(&self, column: u16, row: u16) -> bool {
        self.overlay
            .as_ref()
            .is_some_and(|slot| slot.host.hit_test_screen(column, row))
    }
}

impl<T> Default for DockManager<T> {
    fn default() -> Self {
        Self::new()
    }
}
