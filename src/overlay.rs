//! Transient drop overlay shown over a target window during a drag.

use ratatui::Frame;
use ratatui::prelude::{Color, Rect};

use crate::drop::{DragProfile, DropArea, DropAreaKind, DropAreaRegistry, DropPolicy, SurfaceLocator};
use crate::layout::rect_contains;

fn area_tint(kind: DropAreaKind) -> Color {
    match kind {
        DropAreaKind::AnchorablePane => Color::Cyan,
        DropAreaKind::DocumentPane => Color::Magenta,
    }
}

fn area_glyph(kind: DropAreaKind) -> &'static str {
    match kind {
        DropAreaKind::AnchorablePane => "A",
        DropAreaKind::DocumentPane => "D",
    }
}

/// The overlay surface itself: where it sits, who owns it, and the drop
/// visuals it is presenting.
#[derive(Debug, Clone)]
pub struct DropOverlay {
    bounds: Rect,
    owned_by_manager_window: bool,
    targets_active: bool,
    areas: Vec<DropArea>,
}

impl DropOverlay {
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Whether the overlay is owned by the manager's top-level window. False
    /// when the dragged window is independently ownable.
    pub fn owned_by_manager_window(&self) -> bool {
        self.owned_by_manager_window
    }

    pub fn targets_active(&self) -> bool {
        self.targets_active
    }

    pub fn areas(&self) -> &[DropArea] {
        &self.areas
    }

    fn deactivate(&mut self) {
        self.targets_active = false;
        self.areas.clear();
    }

    /// Tint every drop area into `frame` and mark it with its kind glyph,
    /// clipped to the buffer.
    pub fn render(&self, frame: &mut Frame<'_>) {
        if !self.targets_active {
            return;
        }
        let buffer = frame.buffer_mut();
        for area in &self.areas {
            let color = area_tint(area.kind);
            let clip = area.surface.bounds.intersection(buffer.area);
            if clip.width == 0 || clip.height == 0 {
                continue;
            }
            for y in clip.y..clip.y.saturating_add(clip.height) {
                for x in clip.x..clip.x.saturating_add(clip.width) {
                    if let Some(cell) = buffer.cell_mut((x, y)) {
                        let mut style = cell.style();
                        style.bg = Some(color);
                        cell.set_style(style);
                    }
                }
            }
            if let Some(cell) = buffer.cell_mut((clip.x, clip.y)) {
                cell.set_symbol(area_glyph(area.kind));
            }
        }
    }
}

/// Overlay lifecycle and hit-testing for one target window during one drag
/// gesture. Created by the manager when a drag enters the target.
#[derive(Debug)]
pub struct OverlayHost {
    target_bounds: Rect,
    registry: DropAreaRegistry,
    overlay: Option<DropOverlay>,
}

impl OverlayHost {
    pub fn new(policy: DropPolicy) -> Self {
        Self {
            target_bounds: Rect::default(),
            registry: DropAreaRegistry::new(policy),
            overlay: None,
        }
    }

    pub fn target_bounds(&self) -> Rect {
        self.target_bounds
    }

    pub fn set_target_bounds(&mut self, bounds: Rect) {
        self.target_bounds = bounds;
    }

    /// Show the overlay, or refresh it in place when already visible.
    /// Repeat calls are safe and reuse the cached drop areas.
    pub fn show_overlay(
        &mut self,
        profile: DragProfile,
        surfaces: &dyn SurfaceLocator,
    ) -> &DropOverlay {
        let areas = self.registry.drop_areas(profile, surfaces).to_vec();
        let bounds = self.target_bounds;
        let owned = profile.owned_by_manager_window;
        let overlay = self.overlay.get_or_insert_with(|| DropOverlay {
            bounds,
            owned_by_manager_window: owned,
            targets_active: true,
            areas: Vec::new(),
        });
        overlay.bounds = bounds;
        overlay.owned_by_manager_window = owned;
        overlay.targets_active = true;
        overlay.areas = areas;
        tracing::debug!(?bounds, "overlay shown");
        overlay
    }

    /// Tear the overlay down and forget the drop-area cache so the next
    /// show re-enumerates. Safe to call when nothing is showing.
    pub fn hide_overlay(&mut self) {
        if let Some(mut overlay) = self.overlay.take() {
            overlay.deactivate();
            tracing::debug!("overlay hidden");
        }
        self.registry.invalidate();
    }

    pub fn overlay(&self) -> Option<&DropOverlay> {
        self.overlay.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.overlay.is_some()
    }

    /// Cached drop areas for the current gesture.
    pub fn drop_areas(
        &mut self,
        profile: DragProfile,
        surfaces: &dyn SurfaceLocator,
    ) -> &[DropArea] {
        self.registry.drop_areas(profile, surfaces)
    }

    /// Whether a screen cell falls inside the target window's bounds.
    /// `(0, 0)` is the no-drag sentinel and never hits.
    pub fn hit_test_screen(&self, column: u16, row: u16) -> bool {
        if column == 0 && row == 0 {
            return false;
        }
        rect_contains(self.target_bounds, column, row)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::drop::PaneSurface;
    use crate::layout::PaneId;
    use crate::window::WindowKind;

    struct FixedLocator {
        surfaces: Vec<PaneSurface>,
        calls: Cell<usize>,
    }

    impl FixedLocator {
        fn one(bounds: Rect) -> Self {
            Self {
                surfaces: vec![PaneSurface {
                    pane: PaneId::new(1),
                    bounds,
                }],
                calls: Cell::new(0),
            }
        }
    }

    impl SurfaceLocator for FixedLocator {
        fn pane_surfaces(&self, kind: crate::layout::PaneKind) -> Vec<PaneSurface> {
            self.calls.set(self.calls.get() + 1);
            match kind {
                crate::layout::PaneKind::Anchorable => self.surfaces.clone(),
                crate::layout::PaneKind::Document => Vec::new(),
            }
        }
    }

    fn profile() -> DragProfile {
        DragProfile {
            kind: WindowKind::Anchorable,
            docks_as_tabbed_document: true,
            owned_by_manager_window: true,
        }
    }

    fn host_over(bounds: Rect) -> OverlayHost {
        let mut host = OverlayHost::new(DropPolicy::default());
        host.set_target_bounds(bounds);
        host
    }

    #[test]
    fn show_is_idempotent_and_keeps_the_cache() {
        let locator = FixedLocator::one(Rect::new(1, 1, 4, 2));
        let mut host = host_over(Rect::new(0, 0, 10, 6));

        assert_eq!(host.show_overlay(profile(), &locator).areas().len(), 1);
        let calls = locator.calls.get();
        let overlay = host.show_overlay(profile(), &locator);
        assert!(overlay.targets_active());
        assert_eq!(locator.calls.get(), calls);
        assert!(host.is_visible());
    }

    #[test]
    fn hide_is_idempotent_and_drops_the_cache() {
        let locator = FixedLocator::one(Rect::new(1, 1, 4, 2));
        let mut host = host_over(Rect::new(0, 0, 10, 6));

        host.show_overlay(profile(), &locator);
        host.hide_overlay();
        assert!(!host.is_visible());
        host.hide_overlay();
        assert!(!host.is_visible());

        // the next show re-enumerates
        let calls = locator.calls.get();
        host.show_overlay(profile(), &locator);
        assert!(locator.calls.get() > calls);
    }

    #[test]
    fn ownership_follows_the_dragged_window() {
        let locator = FixedLocator::one(Rect::new(1, 1, 4, 2));
        let mut host = host_over(Rect::new(0, 0, 10, 6));

        let mut independent = profile();
        independent.owned_by_manager_window = false;
        assert!(!host.show_overlay(independent, &locator).owned_by_manager_window());
        assert!(host.show_overlay(profile(), &locator).owned_by_manager_window());
    }

    #[test]
    fn hit_test_rejects_the_origin_sentinel() {
        // a target that genuinely covers the origin still never hits (0, 0)
        let host = host_over(Rect::new(0, 0, 10, 6));
        assert!(!host.hit_test_screen(0, 0));
        assert!(host.hit_test_screen(1, 0));
        assert!(host.hit_test_screen(0, 1));
        assert!(host.hit_test_screen(9, 5));
        assert!(!host.hit_test_screen(10, 0));
    }

    #[test]
    fn hit_test_respects_target_bounds() {
        let host = host_over(Rect::new(5, 2, 4, 3));
        assert!(host.hit_test_screen(5, 2));
        assert!(host.hit_test_screen(8, 4));
        assert!(!host.hit_test_screen(9, 2));
        assert!(!host.hit_test_screen(4, 3));
    }

    #[test]
    fn render_tints_area_cells() {
        let locator = FixedLocator::one(Rect::new(2, 1, 3, 2));
        let mut host = host_over(Rect::new(0, 0, 10, 6));
        host.show_overlay(profile(), &locator);
        let overlay = host.overlay().unwrap().clone();

        let backend = TestBackend::new(10, 6);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| overlay.render(frame)).unwrap();

        let buffer = terminal.backend().buffer();
        let tinted = buffer.cell((2, 1)).unwrap();
        assert_eq!(tinted.style().bg, Some(Color::Cyan));
        // the area's first cell carries the kind glyph
        assert_eq!(tinted.symbol(), "A");
        let untouched = buffer.cell((6, 1)).unwrap();
        assert_ne!(untouched.style().bg, Some(Color::Cyan));
    }
}
