//! Dispatch targets and two-phase dispatch.

use crate::{EventHandler, GesturePointerEvent, HandlerFlags};

/// Position of a handler-bearing node in a [`DispatchTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(usize);

impl TargetId {
    /// Creates an id from its raw index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A tree of event targets, walked from a target to the root.
pub trait DispatchTree {
    /// Returns the parent of `target`.
    fn parent(&self, target: TargetId) -> Option<TargetId>;

    /// Returns the handlers registered on `target`.
    fn handlers(&self, target: TargetId) -> &[EventHandler];
}

#[derive(Debug, Default)]
struct TargetNode {
    parent: Option<TargetId>,
    handlers: Vec<EventHandler>,
}

/// Arena-backed [`DispatchTree`].
#[derive(Debug, Default)]
pub struct TargetTree {
    nodes: Vec<TargetNode>,
}

impl TargetTree {
    /// Creates an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Adds a target without a parent.
    pub fn add_root(&mut self) -> TargetId {
        self.push(None)
    }

    /// Adds a target under `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not part of this tree.
    pub fn add_child(&mut self, parent: TargetId) -> TargetId {
        assert!(
            parent.index() < self.nodes.len(),
            "parent must exist before inserting children"
        );
        self.push(Some(parent))
    }

    /// Registers `handler` on `target`. Unknown targets are ignored.
    pub fn add_handler(&mut self, target: TargetId, handler: EventHandler) {
        if let Some(node) = self.nodes.get_mut(target.index()) {
            node.handlers.push(handler);
        }
    }

    /// Unregisters `handler` from `target`, returning whether it was there.
    pub fn remove_handler(&mut self, target: TargetId, handler: &EventHandler) -> bool {
        let Some(node) = self.nodes.get_mut(target.index()) else {
            return false;
        };
        let before = node.handlers.len();
        node.handlers.retain(|h| !h.ptr_eq(handler));
        node.handlers.len() != before
    }

    fn push(&mut self, parent: Option<TargetId>) -> TargetId {
        let id = TargetId::new(self.nodes.len());
        self.nodes.push(TargetNode {
            parent,
            handlers: Vec::new(),
        });
        id
    }
}

impl DispatchTree for TargetTree {
    fn parent(&self, target: TargetId) -> Option<TargetId> {
        self.nodes.get(target.index()).and_then(|node| node.parent)
    }

    fn handlers(&self, target: TargetId) -> &[EventHandler] {
        self.nodes
            .get(target.index())
            .map_or(&[], |node| node.handlers.as_slice())
    }
}

/// A target together with its matching handlers.
#[derive(Debug, Clone)]
pub struct DispatchTarget {
    /// The target.
    pub target: TargetId,
    /// Matching handlers, in registration order.
    pub handlers: Vec<EventHandler>,
}

/// Collects the targets from `target` up to the root that hold at least one
/// handler accepted by `matches`.
///
/// The result is ordered target first, root last.
pub fn accumulate_dispatch_targets<T, F>(
    tree: &T,
    target: Option<TargetId>,
    mut matches: F,
) -> Vec<DispatchTarget>
where
    T: DispatchTree + ?Sized,
    F: FnMut(&EventHandler) -> bool,
{
    let mut targets = Vec::new();
    let mut cursor = target;
    while let Some(current) = cursor {
        let handlers: Vec<EventHandler> = tree
            .handlers(current)
            .iter()
            .filter(|h| matches(h))
            .cloned()
            .collect();
        if !handlers.is_empty() {
            targets.push(DispatchTarget {
                target: current,
                handlers,
            });
        }
        cursor = tree.parent(current);
    }
    targets
}

/// Delivers `event` to `targets` in two phases.
///
/// Capture handlers run first, root to target. The remaining handlers run
/// after them, target to root.
pub fn dispatch_event<F>(targets: &[DispatchTarget], event: &GesturePointerEvent, mut dispatch: F)
where
    F: FnMut(&EventHandler, &GesturePointerEvent),
{
    for target in targets.iter().rev() {
        for handler in target.handlers.iter().filter(|h| h.flags().contains(HandlerFlags::CAPTURE)) {
            dispatch(handler, event);
        }
    }
    for target in targets {
        for handler in target.handlers.iter().filter(|h| !h.flags().contains(HandlerFlags::CAPTURE)) {
            dispatch(handler, event);
        }
    }
}

/// Returns the union of the touch-action bits of every handler in `targets`.
#[must_use]
pub fn touch_action_flags(targets: &[DispatchTarget]) -> HandlerFlags {
    targets
        .iter()
        .flat_map(|t| &t.handlers)
        .fold(HandlerFlags::empty(), |flags, h| {
            flags | (h.flags() & HandlerFlags::TOUCH_ACTIONS)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PointerAction, SourceId};
    use std::{cell::RefCell, rc::Rc};

    fn recorder(
        log: &Rc<RefCell<Vec<&'static str>>>,
        source: SourceId,
        flags: HandlerFlags,
        name: &'static str,
    ) -> EventHandler {
        let log = Rc::clone(log);
        EventHandler::new(source, flags, move |_| log.borrow_mut().push(name))
    }

    #[test]
    fn accumulates_from_target_to_root() {
        let source = SourceId::next();
        let other = SourceId::next();
        let log = Rc::default();
        let mut tree = TargetTree::new();
        let root = tree.add_root();
        let middle = tree.add_child(root);
        let leaf = tree.add_child(middle);
        tree.add_handler(root, recorder(&log, source, HandlerFlags::empty(), "root"));
        tree.add_handler(middle, recorder(&log, other, HandlerFlags::empty(), "other"));
        tree.add_handler(leaf, recorder(&log, source, HandlerFlags::empty(), "leaf"));

        let targets = accumulate_dispatch_targets(&tree, Some(leaf), |h| h.source() == source);
        let ids: Vec<TargetId> = targets.iter().map(|t| t.target).collect();
        assert_eq!(ids, [leaf, root]);
        assert!(accumulate_dispatch_targets(&tree, None, |_| true).is_empty());
    }

    #[test]
    fn capture_runs_root_first_then_bubble() {
        let source = SourceId::next();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut tree = TargetTree::new();
        let root = tree.add_root();
        let leaf = tree.add_child(root);
        tree.add_handler(root, recorder(&log, source, HandlerFlags::CAPTURE, "root-capture"));
        tree.add_handler(root, recorder(&log, source, HandlerFlags::empty(), "root-bubble"));
        tree.add_handler(leaf, recorder(&log, source, HandlerFlags::CAPTURE, "leaf-capture"));
        tree.add_handler(leaf, recorder(&log, source, HandlerFlags::empty(), "leaf-bubble"));

        let targets = accumulate_dispatch_targets(&tree, Some(leaf), |_| true);
        let event = GesturePointerEvent::new(1, PointerAction::Down, 0.0, 0.0);
        dispatch_event(&targets, &event, |h, e| h.call(e));

        assert_eq!(
            *log.borrow(),
            ["root-capture", "leaf-capture", "leaf-bubble", "root-bubble"]
        );
    }

    #[test]
    fn touch_actions_are_unioned() {
        let source = SourceId::next();
        let log = Rc::default();
        let mut tree = TargetTree::new();
        let root = tree.add_root();
        let leaf = tree.add_child(root);
        tree.add_handler(
            root,
            recorder(&log, source, HandlerFlags::TOUCH_ACTION_PAN_X | HandlerFlags::CAPTURE, "a"),
        );
        tree.add_handler(leaf, recorder(&log, source, HandlerFlags::TOUCH_ACTION_PAN_Y, "b"));

        let targets = accumulate_dispatch_targets(&tree, Some(leaf), |_| true);
        assert_eq!(
            touch_action_flags(&targets),
            HandlerFlags::TOUCH_ACTION_PAN_X | HandlerFlags::TOUCH_ACTION_PAN_Y
        );
    }
}
