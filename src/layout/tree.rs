use ratatui::prelude::{Direction, Rect};

use super::{ContentId, ContentItem, ContentKind, DockError, PaneId};

/// Which family of content a pane hosts. Document panes also accept
/// anchorables tabbed in as documents; anchorable panes host anchorables
/// only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneKind {
    Document,
    Anchorable,
}

impl PaneKind {
    pub fn accepts(self, kind: ContentKind) -> bool {
        match self {
            PaneKind::Document => true,
            PaneKind::Anchorable => kind == ContentKind::Anchorable,
        }
    }
}

/// A tabbed host for content items.
#[derive(Debug, Clone)]
pub struct Pane<T> {
    id: PaneId,
    kind: PaneKind,
    items: Vec<ContentItem<T>>,
}

impl<T> Pane<T> {
    pub(crate) fn new(id: PaneId, kind: PaneKind) -> Self {
        Self {
            id,
            kind,
            items: Vec::new(),
        }
    }

    pub fn id(&self) -> PaneId {
        self.id
    }

    pub fn kind(&self) -> PaneKind {
        self.kind
    }

    pub fn items(&self) -> &[ContentItem<T>] {
        &self.items
    }

    pub fn visible_items(&self) -> Vec<&ContentItem<T>> {
        self.items.iter().filter(|item| !item.is_hidden()).collect()
    }

    pub fn has_visible_items(&self) -> bool {
        self.items.iter().any(|item| !item.is_hidden())
    }
}

/// Layout subtree owned by a floating window: panes at the leaves, weighted
/// directional splits above them.
#[derive(Debug, Clone)]
pub enum PaneNode<T> {
    Pane(Pane<T>),
    Split {
        direction: Direction,
        children: Vec<PaneNode<T>>,
        weights: Vec<f32>,
    },
}

impl<T> PaneNode<T> {
    pub fn pane(id: PaneId, kind: PaneKind) -> Self {
        Self::Pane(Pane::new(id, kind))
    }

    /// Evenly weighted split.
    pub fn split(direction: Direction, children: Vec<PaneNode<T>>) -> Self {
        Self::Split {
            direction,
            children,
            weights: Vec::new(),
        }
    }

    pub fn split_weighted(
        direction: Direction,
        children: Vec<PaneNode<T>>,
        weights: Vec<f32>,
    ) -> Self {
        Self::Split {
            direction,
            children,
            weights,
        }
    }

    /// Panes in depth-first order.
    pub fn panes(&self) -> Vec<&Pane<T>> {
        let mut panes = Vec::new();
        self.collect_panes(&mut panes);
        panes
    }

    fn collect_panes<'a>(&'a self, out: &mut Vec<&'a Pane<T>>) {
        match self {
            PaneNode::Pane(pane) => out.push(pane),
            PaneNode::Split { children, .. } => {
                for child in children {
                    child.collect_panes(out);
                }
            }
        }
    }

    pub fn pane_by_id(&self, id: PaneId) -> Option<&Pane<T>> {
        self.panes().into_iter().find(|pane| pane.id() == id)
    }

    fn pane_by_id_mut(&mut self, id: PaneId) -> Option<&mut Pane<T>> {
        match self {
            PaneNode::Pane(pane) => (pane.id == id).then_some(pane),
            PaneNode::Split { children, .. } => {
                children.iter_mut().find_map(|child| child.pane_by_id_mut(id))
            }
        }
    }

    /// Descendant content items in depth-first order, hidden items included.
    pub fn items(&self) -> Vec<&ContentItem<T>> {
        let mut items = Vec::new();
        self.collect_items(&mut items);
        items
    }

    fn collect_items<'a>(&'a self, out: &mut Vec<&'a ContentItem<T>>) {
        match self {
            PaneNode::Pane(pane) => out.extend(pane.items.iter()),
            PaneNode::Split { children, .. } => {
                for child in children {
                    child.collect_items(out);
                }
            }
        }
    }

    /// Descendant content items currently mounted in a view, depth-first.
    pub fn visible_items(&self) -> Vec<&ContentItem<T>> {
        self.items()
            .into_iter()
            .filter(|item| !item.is_hidden())
            .collect()
    }

    pub fn item(&self, id: ContentId) -> Option<&ContentItem<T>> {
        self.items().into_iter().find(|item| item.id() == id)
    }

    pub fn item_mut(&mut self, id: ContentId) -> Option<&mut ContentItem<T>> {
        match self {
            PaneNode::Pane(pane) => pane.items.iter_mut().find(|item| item.id() == id),
            PaneNode::Split { children, .. } => {
                children.iter_mut().find_map(|child| child.item_mut(id))
            }
        }
    }

    pub fn contains(&self, id: ContentId) -> bool {
        self.item(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        match self {
            PaneNode::Pane(pane) => pane.items.is_empty(),
            PaneNode::Split { children, .. } => children.iter().all(|child| child.is_empty()),
        }
    }

    pub fn item_count(&self) -> usize {
        match self {
            PaneNode::Pane(pane) => pane.items.len(),
            PaneNode::Split { children, .. } => {
                children.iter().map(|child| child.item_count()).sum()
            }
        }
    }

    pub fn has_visible_content(&self) -> bool {
        match self {
            PaneNode::Pane(pane) => pane.has_visible_items(),
            PaneNode::Split { children, .. } => {
                children.iter().any(|child| child.has_visible_content())
            }
        }
    }

    /// Add `item` to the pane `pane`. The pane must exist, accept the item's
    /// kind, and the id must not already be hosted anywhere in the subtree.
    pub fn add_item(&mut self, pane: PaneId, item: ContentItem<T>) -> Result<(), DockError> {
        if self.contains(item.id()) {
            return Err(DockError::DuplicateContent(item.id()));
        }
        let Some(target) = self.pane_by_id_mut(pane) else {
            return Err(DockError::UnknownPane(pane));
        };
        if !target.kind.accepts(item.kind()) {
            return Err(DockError::KindMismatch {
                pane,
                kind: item.kind(),
            });
        }
        target.items.push(item);
        Ok(())
    }

    /// Remove the item from its pane and return it. A pane emptied by the
    /// removal is pruned from its parent split, and a split left with one
    /// child collapses into that child. The root node itself is never
    /// removed.
    pub fn detach(&mut self, id: ContentId) -> Option<ContentItem<T>> {
        match self {
            PaneNode::Pane(pane) => {
                let index = pane.items.iter().position(|item| item.id() == id)?;
                Some(pane.items.remove(index))
            }
            PaneNode::Split {
                children, weights, ..
            } => {
                let mut detached = None;
                let mut index = 0;
                while index < children.len() {
                    if let Some(item) = children[index].detach(id) {
                        detached = Some(item);
                        let prune = match &children[index] {
                            PaneNode::Pane(pane) => pane.items.is_empty(),
                            PaneNode::Split {
                                children: grand, ..
                            } => grand.is_empty(),
                        };
                        if prune {
                            children.remove(index);
                            if index < weights.len() {
                                weights.remove(index);
                            }
                        }
                        break;
                    }
                    index += 1;
                }
                if detached.is_some() && children.len() == 1 {
                    let only = children.remove(0);
                    *self = only;
                }
                detached
            }
        }
    }

    /// Unmount an anchorable without removing it from its pane. Returns
    /// whether the hide took effect (false for documents, unknown ids, and
    /// items already hidden).
    pub fn hide(&mut self, id: ContentId) -> bool {
        let Some(item) = self.item_mut(id) else {
            return false;
        };
        if item.kind() != ContentKind::Anchorable || item.is_hidden() {
            return false;
        }
        item.set_hidden(true);
        true
    }

    /// Remount a hidden anchorable. Returns whether the restore took effect.
    pub fn restore(&mut self, id: ContentId) -> bool {
        let Some(item) = self.item_mut(id) else {
            return false;
        };
        if !item.is_hidden() {
            return false;
        }
        item.set_hidden(false);
        true
    }

    /// Screen rectangles of every pane when the subtree fills `area`, in
    /// depth-first order. Splits divide along their direction by weight;
    /// a weight list of the wrong length falls back to an even split.
    pub fn pane_regions(&self, area: Rect) -> Vec<(PaneId, PaneKind, Rect)> {
        let mut regions = Vec::new();
        self.regions_recursive(area, &mut regions);
        regions
    }

    fn regions_recursive(&self, area: Rect, out: &mut Vec<(PaneId, PaneKind, Rect)>) {
        match self {
            PaneNode::Pane(pane) => out.push((pane.id, pane.kind, area)),
            PaneNode::Split {
                direction,
                children,
                weights,
            } => {
                let rects = split_weighted(*direction, area, weights, children.len());
                for (child, rect) in children.iter().zip(rects) {
                    child.regions_recursive(rect, out);
                }
            }
        }
    }
}

fn split_weighted(direction: Direction, area: Rect, weights: &[f32], count: usize) -> Vec<Rect> {
    let weights = if weights.len() == count {
        weights.to_vec()
    } else {
        vec![1.0; count]
    };
    let total_weight: f32 = weights.iter().sum::<f32>().max(1.0);
    let total = match direction {
        Direction::Horizontal => area.width,
        Direction::Vertical => area.height,
    };
    let mut rects = Vec::with_capacity(count);
    let mut cursor = match direction {
        Direction::Horizontal => area.x,
        Direction::Vertical => area.y,
    };
    let mut used: u16 = 0;
    for (idx, weight) in weights.iter().enumerate() {
        // last child takes the remainder so the rects tile the area exactly
        let size = if idx + 1 == count {
            total.saturating_sub(used)
        } else {
            let portion = ((*weight / total_weight) * total as f32).floor() as u16;
            used = used.saturating_add(portion);
            portion
        };
        let rect = match direction {
            Direction::Horizontal => Rect {
                x: cursor,
                y: area.y,
                width: size,
                height: area.height,
            },
            Direction::Vertical => Rect {
                x: area.x,
                y: cursor,
                width: area.width,
                height: size,
            },
        };
        cursor = cursor.saturating_add(size);
        rects.push(rect);
    }
    rects
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchorable(id: u64) -> ContentItem<&'static str> {
        ContentItem::anchorable(ContentId::new(id), format!("a{id}"), "payload")
    }

    fn document(id: u64) -> ContentItem<&'static str> {
        ContentItem::document(ContentId::new(id), format!("d{id}"), "payload")
    }

    fn two_pane_tree() -> PaneNode<&'static str> {
        let mut root = PaneNode::split(
            Direction::Horizontal,
            vec![
                PaneNode::pane(PaneId::new(1), PaneKind::Document),
                PaneNode::pane(PaneId::new(2), PaneKind::Anchorable),
            ],
        );
        root.add_item(PaneId::new(1), document(10)).unwrap();
        root.add_item(PaneId::new(1), document(11)).unwrap();
        root.add_item(PaneId::new(2), anchorable(20)).unwrap();
        root
    }

    #[test]
    fn items_are_depth_first() {
        let root = two_pane_tree();
        let ids: Vec<u64> = root.items().iter().map(|item| item.id().raw()).collect();
        assert_eq!(ids, vec![10, 11, 20]);
    }

    #[test]
    fn add_item_rejects_duplicates_and_kind_mismatch() {
        let mut root = two_pane_tree();
        assert_eq!(
            root.add_item(PaneId::new(1), document(10)),
            Err(DockError::DuplicateContent(ContentId::new(10)))
        );
        assert_eq!(
            root.add_item(PaneId::new(2), document(30)),
            Err(DockError::KindMismatch {
                pane: PaneId::new(2),
                kind: ContentKind::Document,
            })
        );
        assert_eq!(
            root.add_item(PaneId::new(9), anchorable(31)),
            Err(DockError::UnknownPane(PaneId::new(9)))
        );
        // anchorables tab into document panes
        assert!(root.add_item(PaneId::new(1), anchorable(32)).is_ok());
    }

    #[test]
    fn detach_prunes_empty_pane_and_collapses_split() {
        let mut root = two_pane_tree();
        let item = root.detach(ContentId::new(20)).unwrap();
        assert_eq!(item.id(), ContentId::new(20));
        // pane 2 emptied and was pruned; the split collapsed to pane 1
        assert!(root.pane_by_id(PaneId::new(2)).is_none());
        assert!(matches!(root, PaneNode::Pane(_)));
        assert_eq!(root.item_count(), 2);
        assert!(root.detach(ContentId::new(20)).is_none());
    }

    #[test]
    fn root_pane_survives_emptying() {
        let mut root: PaneNode<&'static str> = PaneNode::pane(PaneId::new(1), PaneKind::Document);
        root.add_item(PaneId::new(1), document(1)).unwrap();
        assert!(root.detach(ContentId::new(1)).is_some());
        assert!(root.is_empty());
        assert!(root.pane_by_id(PaneId::new(1)).is_some());
    }

    #[test]
    fn hide_and_restore_report_effect() {
        let mut root = two_pane_tree();
        assert!(root.hide(ContentId::new(20)));
        // already hidden
        assert!(!root.hide(ContentId::new(20)));
        // documents cannot hide
        assert!(!root.hide(ContentId::new(10)));
        assert!(!root.hide(ContentId::new(99)));
        assert!(root.item(ContentId::new(20)).unwrap().is_hidden());
        assert_eq!(root.visible_items().len(), 2);
        assert!(root.restore(ContentId::new(20)));
        assert!(!root.restore(ContentId::new(20)));
        assert_eq!(root.visible_items().len(), 3);
    }

    #[test]
    fn hidden_items_keep_the_tree_occupied() {
        let mut root: PaneNode<&'static str> =
            PaneNode::pane(PaneId::new(1), PaneKind::Anchorable);
        root.add_item(PaneId::new(1), anchorable(1)).unwrap();
        assert!(root.hide(ContentId::new(1)));
        assert!(!root.is_empty());
        assert!(!root.has_visible_content());
    }

    #[test]
    fn pane_regions_weighted() {
        let root: PaneNode<()> = PaneNode::split_weighted(
            Direction::Horizontal,
            vec![
                PaneNode::pane(PaneId::new(1), PaneKind::Anchorable),
                PaneNode::pane(PaneId::new(2), PaneKind::Document),
            ],
            vec![1.0, 2.0],
        );
        let area = Rect {
            x: 0,
            y: 0,
            width: 9,
            height: 4,
        };
        let regions = root.pane_regions(area);
        assert_eq!(regions.len(), 2);
        // floor(1/3 * 9) = 3, remainder 6
        assert_eq!(regions[0].2.width, 3);
        assert_eq!(regions[1].2.width, 6);
        assert_eq!(regions[1].2.x, 3);
        assert_eq!(regions[0].1, PaneKind::Anchorable);
    }

    #[test]
    fn pane_regions_zero_area() {
        let root = two_pane_tree();
        let regions = root.pane_regions(Rect::default());
        assert_eq!(regions.len(), 2);
        assert!(regions.iter().all(|(_, _, rect)| rect.area() == 0));
    }
}
