//! Content identity, capability flags, and the pane tree hosted by a
//! floating window. Geometry is terminal-cell based (`ratatui::Rect`).

pub mod tree;

pub use tree::*;

use ratatui::prelude::Rect;
use thiserror::Error;

/// Identity of one dockable content item. Allocated by the manager and
/// stable for the life of the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentId(u64);

impl ContentId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Identity of one pane inside a window's layout tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PaneId(u64);

impl PaneId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Identity of one floating window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(u64);

impl WindowId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Document,
    Anchorable,
}

/// Capability flags, tagged by content kind so each kind only carries the
/// flags it legitimately has. Documents are close-only; anchorables may also
/// be hidden and may opt out of tabbing into document panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capabilities {
    Document {
        can_close: bool,
    },
    Anchorable {
        can_close: bool,
        can_hide: bool,
        dock_as_tabbed_document: bool,
    },
}

impl Capabilities {
    pub fn kind(self) -> ContentKind {
        match self {
            Capabilities::Document { .. } => ContentKind::Document,
            Capabilities::Anchorable { .. } => ContentKind::Anchorable,
        }
    }

    pub fn can_close(self) -> bool {
        match self {
            Capabilities::Document { can_close } => can_close,
            Capabilities::Anchorable { can_close, .. } => can_close,
        }
    }

    /// Documents never expose hide capability.
    pub fn can_hide(self) -> bool {
        match self {
            Capabilities::Document { .. } => false,
            Capabilities::Anchorable { can_hide, .. } => can_hide,
        }
    }

    pub fn docks_as_tabbed_document(self) -> bool {
        match self {
            Capabilities::Document { .. } => true,
            Capabilities::Anchorable {
                dock_as_tabbed_document,
                ..
            } => dock_as_tabbed_document,
        }
    }
}

/// One dockable unit of content. `T` is the host application's payload; the
/// built-in close path drops it, a hide retains it.
#[derive(Debug, Clone)]
pub struct ContentItem<T> {
    id: ContentId,
    title: String,
    caps: Capabilities,
    payload: Option<T>,
    hidden: bool,
}

impl<T> ContentItem<T> {
    pub fn new(id: ContentId, title: impl Into<String>, caps: Capabilities, payload: T) -> Self {
        Self {
            id,
            title: title.into(),
            caps,
            payload: Some(payload),
            hidden: false,
        }
    }

    /// Document with default capabilities (closable).
    pub fn document(id: ContentId, title: impl Into<String>, payload: T) -> Self {
        Self::new(id, title, Capabilities::Document { can_close: true }, payload)
    }

    /// Anchorable with default capabilities (closable, hidable, tabs into
    /// document panes).
    pub fn anchorable(id: ContentId, title: impl Into<String>, payload: T) -> Self {
        Self::new(
            id,
            title,
            Capabilities::Anchorable {
                can_close: true,
                can_hide: true,
                dock_as_tabbed_document: true,
            },
            payload,
        )
    }

    pub fn id(&self) -> ContentId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> ContentKind {
        self.caps.kind()
    }

    pub fn caps(&self) -> Capabilities {
        self.caps
    }

    pub fn can_close(&self) -> bool {
        self.caps.can_close()
    }

    pub fn can_hide(&self) -> bool {
        self.caps.can_hide()
    }

    pub fn set_can_close(&mut self, allow: bool) {
        match &mut self.caps {
            Capabilities::Document { can_close } => *can_close = allow,
            Capabilities::Anchorable { can_close, .. } => *can_close = allow,
        }
    }

    /// No effect on documents.
    pub fn set_can_hide(&mut self, allow: bool) {
        if let Capabilities::Anchorable { can_hide, .. } = &mut self.caps {
            *can_hide = allow;
        }
    }

    /// No effect on documents.
    pub fn set_dock_as_tabbed_document(&mut self, allow: bool) {
        if let Capabilities::Anchorable {
            dock_as_tabbed_document,
            ..
        } = &mut self.caps
        {
            *dock_as_tabbed_document = allow;
        }
    }

    /// Hidden items stay hosted by their pane but are not mounted in a view.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub(crate) fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    pub fn payload_mut(&mut self) -> Option<&mut T> {
        self.payload.as_mut()
    }

    pub(crate) fn clear_payload(&mut self) {
        self.payload = None;
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DockError {
    #[error("unknown window {0:?}")]
    UnknownWindow(WindowId),
    #[error("unknown pane {0:?}")]
    UnknownPane(PaneId),
    #[error("unknown content item {0:?}")]
    UnknownContent(ContentId),
    #[error("content item {0:?} is already hosted")]
    DuplicateContent(ContentId),
    #[error("pane {pane:?} does not accept {kind:?} content")]
    KindMismatch { pane: PaneId, kind: ContentKind },
}

pub fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    if rect.width == 0 || rect.height == 0 {
        return false;
    }
    let max_x = rect.x.saturating_add(rect.width);
    let max_y = rect.y.saturating_add(rect.height);
    column >= rect.x && column < max_x && row >= rect.y && row < max_y
}
