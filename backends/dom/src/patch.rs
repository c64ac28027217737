//! Patch operations emitted by the reconciler.

use core::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use arbor_core::{ElementTag, Str, Value};

/// Identifier of a node in the render target.
///
/// Ids are unique across the process, so several roots can share one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Allocates a fresh id.
    #[must_use]
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw value backing this identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One mutation of the render target.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    /// Creates a detached element.
    CreateElement {
        /// Id of the new node.
        id: NodeId,
        /// Tag, including SVG and void traits.
        tag: ElementTag,
    },
    /// Creates a detached text node.
    CreateText {
        /// Id of the new node.
        id: NodeId,
        /// Text content.
        content: Str,
    },
    /// Replaces the content of a text node.
    SetText {
        /// Text node.
        id: NodeId,
        /// New content.
        content: Str,
    },
    /// Replaces all children of an element with text. Empty text clears them.
    SetTextContent {
        /// Element.
        id: NodeId,
        /// New content.
        content: Str,
    },
    /// Replaces all children of an element with raw markup.
    SetInnerHtml {
        /// Element.
        id: NodeId,
        /// Markup.
        html: Str,
    },
    /// Sets the class attribute. `None` removes it.
    SetClassName {
        /// Element.
        id: NodeId,
        /// New class name.
        class_name: Option<Str>,
    },
    /// Sets an attribute.
    SetAttribute {
        /// Element.
        id: NodeId,
        /// Attribute name.
        name: Str,
        /// Attribute value.
        value: Value,
    },
    /// Removes an attribute.
    RemoveAttribute {
        /// Element.
        id: NodeId,
        /// Attribute name.
        name: Str,
    },
    /// Sets an inline style property.
    SetStyle {
        /// Element.
        id: NodeId,
        /// Property name.
        name: Str,
        /// Property value.
        value: Value,
    },
    /// Removes an inline style property.
    RemoveStyle {
        /// Element.
        id: NodeId,
        /// Property name.
        name: Str,
    },
    /// Inserts `id` into `parent` before `before`, or appends it.
    ///
    /// If `id` is already attached somewhere this is a move.
    Insert {
        /// New parent.
        parent: NodeId,
        /// Node to insert.
        id: NodeId,
        /// Reference sibling.
        before: Option<NodeId>,
    },
    /// Detaches `id` from `parent` and drops its subtree.
    Remove {
        /// Current parent.
        parent: NodeId,
        /// Node to remove.
        id: NodeId,
    },
}

impl Patch {
    /// Returns the node the patch mutates.
    #[must_use]
    pub const fn target(&self) -> NodeId {
        match self {
            Self::CreateElement { id, .. }
            | Self::CreateText { id, .. }
            | Self::SetText { id, .. }
            | Self::SetTextContent { id, .. }
            | Self::SetInnerHtml { id, .. }
            | Self::SetClassName { id, .. }
            | Self::SetAttribute { id, .. }
            | Self::RemoveAttribute { id, .. }
            | Self::SetStyle { id, .. }
            | Self::RemoveStyle { id, .. } => *id,
            Self::Insert { parent, .. } | Self::Remove { parent, .. } => *parent,
        }
    }

    /// Returns `true` for node creation patches.
    #[must_use]
    pub const fn is_create(&self) -> bool {
        matches!(self, Self::CreateElement { .. } | Self::CreateText { .. })
    }
}

/// Ordered list of patches produced by one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchList(Vec<Patch>);

impl PatchList {
    pub(crate) const fn new() -> Self {
        Self(Vec::new())
    }

    pub(crate) fn push(&mut self, patch: Patch) {
        tracing::trace!(?patch, "emit patch");
        self.0.push(patch);
    }

    /// Returns the patches in application order.
    #[must_use]
    pub fn as_slice(&self) -> &[Patch] {
        &self.0
    }

    /// Iterates over the patches.
    pub fn iter(&self) -> std::slice::Iter<'_, Patch> {
        self.0.iter()
    }

    /// Returns the number of patches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the pass changed nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Counts patches matching `predicate`.
    #[must_use]
    pub fn count(&self, predicate: impl Fn(&Patch) -> bool) -> usize {
        self.0.iter().filter(|p| predicate(p)).count()
    }
}

impl IntoIterator for PatchList {
    type Item = Patch;
    type IntoIter = std::vec::IntoIter<Patch>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a PatchList {
    type Item = &'a Patch;
    type IntoIter = std::slice::Iter<'a, Patch>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
