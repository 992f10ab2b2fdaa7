//! Two-phase close/hide engine for floating windows.
//!
//! Phase 1 ([`evaluate`]) walks every visible content item and either vetoes
//! the whole request or produces a [`ClosePlan`]. Phase 2 ([`execute`]) runs
//! the plan. The split keeps validation free of mutation: `evaluate` borrows
//! the window immutably, so a veto leaves every item untouched.

use crate::adapter::AdapterMap;
use crate::layout::{ContentId, ContentItem, ContentKind};
use crate::window::FloatingWindow;

/// Consent returned by pre-close and pre-hide hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consent {
    Allow,
    Veto,
}

/// Consent returned by the manager's hide hook. `CloseInstead` asks for a
/// close in lieu of the hide; the hide path is only reached by items that
/// cannot close, so it counts as a veto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HideConsent {
    Allow,
    Veto,
    CloseInstead,
}

/// Owning-application hooks: per-item veto points raised during validation
/// and terminal notifications raised during execution. Every method has a
/// permissive default.
pub trait DockDelegate<T> {
    /// The item's own pre-close hook.
    fn item_closing(&mut self, _item: &ContentItem<T>) -> Consent {
        Consent::Allow
    }

    /// The item's own pre-hide hook.
    fn item_hiding(&mut self, _item: &ContentItem<T>) -> Consent {
        Consent::Allow
    }

    /// Manager-level close veto point, raised once per item.
    fn manager_closing(&mut self, _item: &ContentItem<T>) -> Consent {
        Consent::Allow
    }

    /// Manager-level hide veto point, raised once per item.
    fn manager_hiding(&mut self, _item: &ContentItem<T>) -> HideConsent {
        HideConsent::Allow
    }

    /// The item's presentation resources can be released.
    fn release_view(&mut self, _item: &ContentItem<T>) {}

    /// A document left the tree. Its payload has already been dropped.
    fn document_closed(&mut self, _item: ContentItem<T>) {}

    /// An anchorable left the tree. Its payload has already been dropped.
    fn anchorable_closed(&mut self, _item: ContentItem<T>) {}

    /// An anchorable was unmounted but retained, payload intact.
    fn anchorable_hidden(&mut self, _item: &ContentItem<T>) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlannedOp {
    CloseDocument,
    CloseAnchorable,
    HideAnchorable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PlannedStep {
    item: ContentId,
    op: PlannedOp,
}

/// The work Phase 2 will perform, in walk order: documents as one group,
/// then anchorables.
#[derive(Debug)]
pub struct ClosePlan {
    steps: Vec<PlannedStep>,
}

impl ClosePlan {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Items planned for a close, in execution order.
    pub fn closes(&self) -> Vec<ContentId> {
        self.steps
            .iter()
            .filter(|step| step.op != PlannedOp::HideAnchorable)
            .map(|step| step.item)
            .collect()
    }

    /// Items planned for a hide, in execution order.
    pub fn hides(&self) -> Vec<ContentId> {
        self.steps
            .iter()
            .filter(|step| step.op == PlannedOp::HideAnchorable)
            .map(|step| step.item)
            .collect()
    }
}

/// Result of Phase 1.
#[derive(Debug)]
pub enum CloseDecision {
    /// One item refused; nothing may be executed. Carries the refusing item.
    Veto { item: ContentId },
    /// Every item accepted an operation.
    Proceed(ClosePlan),
}

/// Terminal decision for the window after Phase 2.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseVerdict {
    /// Every item was closed; the window may be torn down.
    Close,
    /// Content was hidden or retained; the window stays resident.
    Cancel,
}

/// Phase 1: validate a user close request against every visible item.
///
/// Documents must be closable. Anchorables close when they can, otherwise
/// hide when they can; an item that can do neither, or whose checks fail,
/// vetoes the whole request. Hidden items are residue from earlier gestures
/// and are not re-processed.
pub fn evaluate<T>(
    window: &FloatingWindow<T>,
    adapters: &AdapterMap<T>,
    delegate: &mut dyn DockDelegate<T>,
) -> CloseDecision {
    let items = window.root().visible_items();
    let mut steps = Vec::with_capacity(items.len());

    for item in items.iter().filter(|item| item.kind() == ContentKind::Document) {
        if !item.can_close() || !close_checks(window, adapters, delegate, item) {
            tracing::debug!(content_id = ?item.id(), "close vetoed by document");
            return CloseDecision::Veto { item: item.id() };
        }
        steps.push(PlannedStep {
            item: item.id(),
            op: PlannedOp::CloseDocument,
        });
    }

    for item in items.iter().filter(|item| item.kind() == ContentKind::Anchorable) {
        // close takes priority over hide; an item that can close either
        // passes the close checks or vetoes, it never falls back to a hide
        let op = if item.can_close() {
            if !close_checks(window, adapters, delegate, item) {
                tracing::debug!(content_id = ?item.id(), "close vetoed by anchorable");
                return CloseDecision::Veto { item: item.id() };
            }
            PlannedOp::CloseAnchorable
        } else if item.can_hide() {
            if !hide_checks(window, adapters, delegate, item) {
                tracing::debug!(content_id = ?item.id(), "hide vetoed by anchorable");
                return CloseDecision::Veto { item: item.id() };
            }
            PlannedOp::HideAnchorable
        } else {
            tracing::debug!(content_id = ?item.id(), "anchorable can neither close nor hide");
            return CloseDecision::Veto { item: item.id() };
        };
        steps.push(PlannedStep {
            item: item.id(),
            op,
        });
    }

    CloseDecision::Proceed(ClosePlan { steps })
}

/// Phase 2: run a plan produced by [`evaluate`]. No validation hooks are
/// re-raised. Returns [`CloseVerdict::Cancel`] when anything was hidden or
/// the window retains hidden items from earlier gestures.
pub fn execute<T>(
    plan: ClosePlan,
    window: &mut FloatingWindow<T>,
    adapters: &AdapterMap<T>,
    delegate: &mut dyn DockDelegate<T>,
) -> CloseVerdict {
    let mut hid_any = false;
    for step in plan.steps {
        match step.op {
            PlannedOp::CloseDocument => {
                close_item(window, adapters, delegate, step.item, ContentKind::Document);
            }
            PlannedOp::CloseAnchorable => {
                close_item(window, adapters, delegate, step.item, ContentKind::Anchorable);
            }
            PlannedOp::HideAnchorable => {
                hide_item(window, adapters, delegate, step.item);
                hid_any = true;
            }
        }
    }

    let residue = window.root().items().iter().any(|item| item.is_hidden());
    if hid_any || residue {
        tracing::debug!(window_id = ?window.id(), "window retains hidden content");
        CloseVerdict::Cancel
    } else {
        CloseVerdict::Close
    }
}

/// Full user-initiated close protocol: validate, then execute. Programmatic
/// closes performed by the docking system itself bypass this entirely.
pub fn request_close<T>(
    window: &mut FloatingWindow<T>,
    adapters: &AdapterMap<T>,
    delegate: &mut dyn DockDelegate<T>,
) -> CloseVerdict {
    match evaluate(window, adapters, delegate) {
        CloseDecision::Veto { item } => {
            tracing::debug!(window_id = ?window.id(), content_id = ?item, "close request vetoed");
            CloseVerdict::Cancel
        }
        CloseDecision::Proceed(plan) => execute(plan, window, adapters, delegate),
    }
}

/// Title-bar gating: whether every visible item can close and its close
/// action is invocable. Raises no hooks. False for an empty window.
pub fn can_close_all_content<T>(window: &FloatingWindow<T>, adapters: &AdapterMap<T>) -> bool {
    let items = window.root().visible_items();
    !items.is_empty()
        && items
            .iter()
            .all(|item| item.can_close() && close_invocable(window, adapters, item))
}

/// Title-bar command: run the close action for every visible item, user
/// command or built-in. Callers gate with [`can_close_all_content`].
pub fn close_all_content<T>(
    window: &mut FloatingWindow<T>,
    adapters: &AdapterMap<T>,
    delegate: &mut dyn DockDelegate<T>,
) {
    let targets: Vec<(ContentId, ContentKind)> = window
        .root()
        .visible_items()
        .iter()
        .map(|item| (item.id(), item.kind()))
        .collect();
    for (id, kind) in targets {
        close_item(window, adapters, delegate, id, kind);
    }
}

/// Title-bar gating: whether every visible item can hide and its hide action
/// is invocable. Documents never can, so this is false for any window
/// hosting one. False for an empty window.
pub fn can_hide_all_content<T>(window: &FloatingWindow<T>, adapters: &AdapterMap<T>) -> bool {
    let items = window.root().visible_items();
    !items.is_empty()
        && items
            .iter()
            .all(|item| item.can_hide() && hide_invocable(window, adapters, item))
}

/// Title-bar command: run the hide action for every visible item. Callers
/// gate with [`can_hide_all_content`].
pub fn hide_all_content<T>(
    window: &mut FloatingWindow<T>,
    adapters: &AdapterMap<T>,
    delegate: &mut dyn DockDelegate<T>,
) {
    let targets: Vec<ContentId> = window
        .root()
        .visible_items()
        .iter()
        .map(|item| item.id())
        .collect();
    for id in targets {
        hide_item(window, adapters, delegate, id);
    }
}

/// The three close checks shared by documents and anchorables: item hook,
/// manager hook, attached action invocable.
fn close_checks<T>(
    window: &FloatingWindow<T>,
    adapters: &AdapterMap<T>,
    delegate: &mut dyn DockDelegate<T>,
    item: &ContentItem<T>,
) -> bool {
    delegate.item_closing(item) == Consent::Allow
        && delegate.manager_closing(item) == Consent::Allow
        && close_invocable(window, adapters, item)
}

fn hide_checks<T>(
    window: &FloatingWindow<T>,
    adapters: &AdapterMap<T>,
    delegate: &mut dyn DockDelegate<T>,
    item: &ContentItem<T>,
) -> bool {
    if delegate.item_hiding(item) == Consent::Veto {
        return false;
    }
    match delegate.manager_hiding(item) {
        HideConsent::Veto | HideConsent::CloseInstead => return false,
        HideConsent::Allow => {}
    }
    hide_invocable(window, adapters, item)
}

fn close_invocable<T>(
    window: &FloatingWindow<T>,
    adapters: &AdapterMap<T>,
    item: &ContentItem<T>,
) -> bool {
    match adapters.resolve(item.id(), item.kind()) {
        Some(adapter) => adapter.close_slot().invocable(window, item.id()),
        None => true,
    }
}

fn hide_invocable<T>(
    window: &FloatingWindow<T>,
    adapters: &AdapterMap<T>,
    item: &ContentItem<T>,
) -> bool {
    adapters
        .resolve(item.id(), item.kind())
        .and_then(|adapter| adapter.hide_slot())
        .is_none_or(|slot| slot.invocable(window, item.id()))
}

fn close_item<T>(
    window: &mut FloatingWindow<T>,
    adapters: &AdapterMap<T>,
    delegate: &mut dyn DockDelegate<T>,
    id: ContentId,
    kind: ContentKind,
) {
    if let Some(command) = adapters
        .resolve(id, kind)
        .and_then(|adapter| adapter.close_slot().override_command())
    {
        command.run(window, id);
        return;
    }
    builtin_close(window, delegate, id);
}

fn builtin_close<T>(
    window: &mut FloatingWindow<T>,
    delegate: &mut dyn DockDelegate<T>,
    id: ContentId,
) {
    // a user command run earlier in the plan may already have mutated the tree
    let Some(mut item) = window.root_mut().detach(id) else {
        tracing::trace!(content_id = ?id, "item vanished before built-in close");
        return;
    };
    delegate.release_view(&item);
    item.clear_payload();
    tracing::debug!(content_id = ?id, "closed content item");
    match item.kind() {
        ContentKind::Document => delegate.document_closed(item),
        ContentKind::Anchorable => delegate.anchorable_closed(item),
    }
}

fn hide_item<T>(
    window: &mut FloatingWindow<T>,
    adapters: &AdapterMap<T>,
    delegate: &mut dyn DockDelegate<T>,
    id: ContentId,
) {
    if let Some(command) = adapters
        .resolve(id, ContentKind::Anchorable)
        .and_then(|adapter| adapter.hide_slot())
        .and_then(|slot| slot.override_command())
    {
        command.run(window, id);
        return;
    }
    // only a hide that takes effect raises the notification
    if window.root_mut().hide(id) {
        tracing::debug!(content_id = ?id, "hid content item");
        if let Some(item) = window.root().item(id) {
            delegate.anchorable_hidden(item);
        }
    }
}
