//! Per content-item adapters: user-substitutable close/hide actions looked
//! up by content identity. A missing entry always means "built-in path".

use std::collections::BTreeMap;

use crate::layout::{ContentId, ContentKind};
use crate::window::FloatingWindow;

/// A user-substitutable action attached to a content item. Consulted for
/// invocability during validation, invoked during execution.
pub trait ItemCommand<T> {
    /// Whether the action can run right now.
    fn can_run(&self, window: &FloatingWindow<T>, id: ContentId) -> bool {
        let _ = (window, id);
        true
    }

    /// Invoke the action. May mutate the window's tree.
    fn run(&self, window: &mut FloatingWindow<T>, id: ContentId);
}

/// An action slot: an optional command plus the default-path flag.
///
/// With no command attached the flag is always true and the engine runs its
/// built-in logic. A command may also be attached with the flag left set
/// (`default_command`): it is consulted for invocability but the built-in
/// path still executes.
pub struct ActionSlot<T> {
    command: Option<Box<dyn ItemCommand<T>>>,
    is_default: bool,
}

impl<T> ActionSlot<T> {
    /// Built-in path, no user command.
    pub fn builtin() -> Self {
        Self {
            command: None,
            is_default: true,
        }
    }

    /// User-supplied replacement for the built-in path.
    pub fn custom(command: impl ItemCommand<T> + 'static) -> Self {
        Self {
            command: Some(Box::new(command)),
            is_default: false,
        }
    }

    /// A command object standing in for the built-in path: visible to
    /// presentation surfaces and invocability checks, but execution still
    /// runs the built-in logic.
    pub fn default_command(command: impl ItemCommand<T> + 'static) -> Self {
        Self {
            command: Some(Box::new(command)),
            is_default: true,
        }
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn command(&self) -> Option<&dyn ItemCommand<T>> {
        self.command.as_deref()
    }

    /// Invocability for validation: an attached command must consent, an
    /// empty slot always does.
    pub(crate) fn invocable(&self, window: &FloatingWindow<T>, id: ContentId) -> bool {
        match &self.command {
            Some(command) => command.can_run(window, id),
            None => true,
        }
    }

    /// The command to invoke in place of the built-in path, if any.
    pub(crate) fn override_command(&self) -> Option<&dyn ItemCommand<T>> {
        if self.is_default {
            None
        } else {
            self.command.as_deref()
        }
    }
}

impl<T> Default for ActionSlot<T> {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Kind-tagged adapter. Documents never carry a hide action.
pub enum ItemAdapter<T> {
    Document { close: ActionSlot<T> },
    Anchorable {
        close: ActionSlot<T>,
        hide: ActionSlot<T>,
    },
}

impl<T> ItemAdapter<T> {
    pub fn document() -> Self {
        Self::Document {
            close: ActionSlot::builtin(),
        }
    }

    pub fn document_with(close: ActionSlot<T>) -> Self {
        Self::Document { close }
    }

    pub fn anchorable() -> Self {
        Self::Anchorable {
            close: ActionSlot::builtin(),
            hide: ActionSlot::builtin(),
        }
    }

    pub fn anchorable_with(close: ActionSlot<T>, hide: ActionSlot<T>) -> Self {
        Self::Anchorable { close, hide }
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            ItemAdapter::Document { .. } => ContentKind::Document,
            ItemAdapter::Anchorable { .. } => ContentKind::Anchorable,
        }
    }

    pub(crate) fn close_slot(&self) -> &ActionSlot<T> {
        match self {
            ItemAdapter::Document { close } => close,
            ItemAdapter::Anchorable { close, .. } => close,
        }
    }

    pub(crate) fn hide_slot(&self) -> Option<&ActionSlot<T>> {
        match self {
            ItemAdapter::Document { .. } => None,
            ItemAdapter::Anchorable { hide, .. } => Some(hide),
        }
    }
}

/// Adapter lookup by content identity, owned by the manager and read by the
/// engines.
pub struct AdapterMap<T> {
    map: BTreeMap<ContentId, ItemAdapter<T>>,
}

impl<T> AdapterMap<T> {
    pub fn new() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, id: ContentId, adapter: ItemAdapter<T>) -> Option<ItemAdapter<T>> {
        self.map.insert(id, adapter)
    }

    pub fn remove(&mut self, id: ContentId) -> Option<ItemAdapter<T>> {
        self.map.remove(&id)
    }

    pub fn get(&self, id: ContentId) -> Option<&ItemAdapter<T>> {
        self.map.get(&id)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Adapter for an item, tolerating absent and kind-mismatched entries.
    /// Both mean "use the built-in path".
    pub(crate) fn resolve(&self, id: ContentId, kind: ContentKind) -> Option<&ItemAdapter<T>> {
        let adapter = self.map.get(&id)?;
        if adapter.kind() != kind {
            tracing::warn!(content_id = ?id, "adapter kind mismatch, using built-in path");
            return None;
        }
        Some(adapter)
    }
}

impl<T> Default for AdapterMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{PaneId, PaneKind, PaneNode, WindowId};
    use crate::window::{FloatingWindow, WindowKind};

    struct Rejecting;

    impl ItemCommand<()> for Rejecting {
        fn can_run(&self, _window: &FloatingWindow<()>, _id: ContentId) -> bool {
            false
        }

        fn run(&self, _window: &mut FloatingWindow<()>, _id: ContentId) {}
    }

    fn empty_window() -> FloatingWindow<()> {
        FloatingWindow::new(
            WindowId::new(1),
            WindowKind::Document,
            "w",
            PaneNode::pane(PaneId::new(1), PaneKind::Document),
        )
    }

    #[test]
    fn empty_slot_is_default_and_invocable() {
        let slot: ActionSlot<()> = ActionSlot::builtin();
        assert!(slot.is_default());
        assert!(slot.command().is_none());
        assert!(slot.invocable(&empty_window(), ContentId::new(1)));
        assert!(slot.override_command().is_none());
    }

    #[test]
    fn custom_slot_overrides_and_gates() {
        let slot: ActionSlot<()> = ActionSlot::custom(Rejecting);
        assert!(!slot.is_default());
        assert!(slot.override_command().is_some());
        // the attached command's consent gates invocability
        assert!(!slot.invocable(&empty_window(), ContentId::new(1)));
    }

    #[test]
    fn default_command_slot_never_overrides() {
        let slot: ActionSlot<()> = ActionSlot::default_command(Rejecting);
        assert!(slot.is_default());
        assert!(slot.command().is_some());
        assert!(slot.override_command().is_none());
        assert!(!slot.invocable(&empty_window(), ContentId::new(1)));
    }

    #[test]
    fn resolve_rejects_kind_mismatch() {
        let mut adapters: AdapterMap<()> = AdapterMap::new();
        adapters.insert(ContentId::new(1), ItemAdapter::document());
        assert!(adapters.resolve(ContentId::new(1), ContentKind::Document).is_some());
        assert!(adapters.resolve(ContentId::new(1), ContentKind::Anchorable).is_none());
        assert!(adapters.resolve(ContentId::new(2), ContentKind::Document).is_none());
    }

    #[test]
    fn document_adapter_has_no_hide_slot() {
        let adapter: ItemAdapter<()> = ItemAdapter::document();
        assert!(adapter.hide_slot().is_none());
        let adapter: ItemAdapter<()> = ItemAdapter::anchorable();
        assert!(adapter.hide_slot().is_some());
    }
}
