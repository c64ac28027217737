//! Node flag bits.
//!
//! Every [`VNode`](crate::VNode) carries a [`NodeFlags`] set describing its kind,
//! the shape of its children and a handful of element traits. The set is computed
//! when the node is constructed and never changes afterwards. Blueprint nodes copy
//! these bits and add [`NodeFlags::DEEP_CONNECT`].

bitflags::bitflags! {
    /// Kind, children-shape and trait bits of a node descriptor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u32 {
        /// Text node.
        const TEXT = 1;
        /// Element node.
        const ELEMENT = 1 << 1;
        /// Class component.
        const COMPONENT_CLASS = 1 << 2;
        /// Stateless function component.
        const COMPONENT_FUNCTION = 1 << 3;
        /// Context provider.
        const UPDATE_CONTEXT = 1 << 4;
        /// Connector evaluated against the live context.
        const CONNECT = 1 << 5;
        /// Keep-alive boundary.
        const KEEP_ALIVE = 1 << 6;
        /// Node renders nothing.
        const EMPTY = 1 << 7;

        /// Node has an explicit key.
        const KEY = 1 << 8;
        /// Children are a single node.
        const CHILDREN_VNODE = 1 << 9;
        /// Children are a list of nodes.
        const CHILDREN_ARRAY = 1 << 10;
        /// Children are raw text content.
        const CHILDREN_BASIC = 1 << 11;
        /// Children are raw, unescaped markup.
        const UNSAFE_HTML = 1 << 12;

        /// Element lives in the SVG namespace.
        const SVG_ELEMENT = 1 << 13;
        /// Element has no closing tag and can't hold children.
        const VOID_ELEMENT = 1 << 14;
        /// A reuse blueprint was linked to this node.
        const LINKED_BLUEPRINT = 1 << 15;

        /// Subtree contains a connector that must be re-evaluated on every render.
        const DEEP_CONNECT = 1 << 16;

        /// Any component kind.
        const COMPONENT = Self::COMPONENT_CLASS.bits() | Self::COMPONENT_FUNCTION.bits();
        /// Bits that identify the node kind.
        const KIND = Self::TEXT.bits()
            | Self::ELEMENT.bits()
            | Self::COMPONENT.bits()
            | Self::UPDATE_CONTEXT.bits()
            | Self::CONNECT.bits()
            | Self::KEEP_ALIVE.bits()
            | Self::EMPTY.bits();
        /// Bits that describe the children payload.
        const CHILDREN = Self::CHILDREN_VNODE.bits()
            | Self::CHILDREN_ARRAY.bits()
            | Self::CHILDREN_BASIC.bits()
            | Self::UNSAFE_HTML.bits();
    }
}

impl NodeFlags {
    /// Returns only the kind bits.
    #[must_use]
    pub const fn kind(self) -> Self {
        self.intersection(Self::KIND)
    }

    /// Returns the structural bits compared during blueprint reuse.
    ///
    /// Excludes [`NodeFlags::LINKED_BLUEPRINT`] and [`NodeFlags::DEEP_CONNECT`],
    /// which are not part of a node's shape.
    #[must_use]
    pub const fn structural(self) -> Self {
        self.difference(Self::LINKED_BLUEPRINT.union(Self::DEEP_CONNECT))
    }
}
