//! Node descriptors.
//!
//! A [`VNode`] is an immutable description of one tree position. Application code
//! builds a tree of descriptors on every render; the SSR backend turns it into a
//! blueprint and markup, the DOM backend reconciles it against the previous tree.
//!
//! # Example
//!
//! ```rust
//! use arbor_core::{html::{div, span}, text};
//!
//! let node = div()
//!     .class_name("list")
//!     .props([("id", "main")])
//!     .children([span().with_key("a").text_content("first"), text("tail")]);
//!
//! assert_eq!(node.element().unwrap().children().as_slice().len(), 2);
//! ```

use alloc::{boxed::Box, rc::Rc, string::ToString, vec::Vec};
use core::{any::Any, fmt, slice};

use crate::{
    Attrs, ComponentId, Context, ContextValues, Key, NodeFlags, Str, component::ComponentNode,
};

/// Element tag name plus element traits (SVG namespace, void).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementTag {
    name: Str,
    flags: NodeFlags,
}

impl ElementTag {
    /// Creates a plain HTML element tag.
    #[must_use]
    pub fn new(name: impl Into<Str>) -> Self {
        Self::with_flags(name, NodeFlags::empty())
    }

    /// Creates a tag with element trait flags.
    ///
    /// Only [`NodeFlags::SVG_ELEMENT`] and [`NodeFlags::VOID_ELEMENT`] are kept.
    #[must_use]
    pub fn with_flags(name: impl Into<Str>, flags: NodeFlags) -> Self {
        Self {
            name: name.into(),
            flags: flags & (NodeFlags::SVG_ELEMENT | NodeFlags::VOID_ELEMENT),
        }
    }

    /// Returns the tag name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` for SVG elements.
    #[must_use]
    pub const fn is_svg(&self) -> bool {
        self.flags.contains(NodeFlags::SVG_ELEMENT)
    }

    /// Returns `true` for void elements, which have no closing tag.
    #[must_use]
    pub const fn is_void(&self) -> bool {
        self.flags.contains(NodeFlags::VOID_ELEMENT)
    }

    /// Returns the element trait flags.
    #[must_use]
    pub const fn flags(&self) -> NodeFlags {
        self.flags
    }
}

/// Children payload of an element. Exactly one form per element.
#[derive(Debug, Clone, Default)]
pub enum Children {
    /// No children.
    #[default]
    None,
    /// A single child node.
    Node(Box<VNode>),
    /// An ordered list of child nodes.
    Nodes(Vec<VNode>),
    /// Raw text content, escaped on output.
    Text(Str),
    /// Raw markup, emitted verbatim.
    UnsafeHtml(Str),
}

impl Children {
    /// Returns the children-shape flag for this form.
    #[must_use]
    pub const fn flags(&self) -> NodeFlags {
        match self {
            Self::None => NodeFlags::empty(),
            Self::Node(_) => NodeFlags::CHILDREN_VNODE,
            Self::Nodes(_) => NodeFlags::CHILDREN_ARRAY,
            Self::Text(_) => NodeFlags::CHILDREN_BASIC,
            Self::UnsafeHtml(_) => NodeFlags::UNSAFE_HTML,
        }
    }

    /// Returns child nodes as a slice. Empty for text, markup and no children.
    #[must_use]
    pub fn as_slice(&self) -> &[VNode] {
        match self {
            Self::Node(node) => slice::from_ref(&**node),
            Self::Nodes(nodes) => nodes,
            Self::None | Self::Text(_) | Self::UnsafeHtml(_) => &[],
        }
    }

    /// Returns `true` when there are no children in any form.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// An element position.
#[derive(Debug, Clone)]
pub struct Element {
    tag: ElementTag,
    class_name: Option<Str>,
    props: Attrs,
    style: Attrs,
    dynamic_props: Attrs,
    children: Children,
}

impl Element {
    /// Returns the tag.
    #[must_use]
    pub const fn tag(&self) -> &ElementTag {
        &self.tag
    }

    /// Returns the static class name.
    #[must_use]
    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    /// Returns the static props.
    #[must_use]
    pub const fn props(&self) -> &Attrs {
        &self.props
    }

    /// Returns the static inline style.
    #[must_use]
    pub const fn style(&self) -> &Attrs {
        &self.style
    }

    /// Returns the per-render props.
    ///
    /// These are applied by the client-side reconciler only. They take no part in
    /// blueprint reuse and never appear in server-rendered markup.
    #[must_use]
    pub const fn dynamic_props(&self) -> &Attrs {
        &self.dynamic_props
    }

    /// Returns the children payload.
    #[must_use]
    pub const fn children(&self) -> &Children {
        &self.children
    }
}

/// A context-provider position.
#[derive(Debug, Clone)]
pub struct ContextNode {
    values: ContextValues,
    child: Box<VNode>,
}

impl ContextNode {
    /// Returns the values published to the subtree.
    #[must_use]
    pub const fn values(&self) -> &ContextValues {
        &self.values
    }

    /// Returns the provider's only child.
    #[must_use]
    pub fn child(&self) -> &VNode {
        &self.child
    }
}

/// A connector position: a render function reading the live context.
#[derive(Clone)]
pub struct ConnectNode {
    id: ComponentId,
    select: Rc<dyn Fn(&Context) -> VNode>,
}

impl_debug!(ConnectNode);

impl ConnectNode {
    /// Returns the connector identity.
    #[must_use]
    pub const fn id(&self) -> ComponentId {
        self.id
    }

    /// Evaluates the connector against `context`.
    #[must_use]
    pub fn render(&self, context: &Context) -> VNode {
        (self.select)(context)
    }
}

/// The payload of a node descriptor.
#[derive(Debug, Clone)]
pub enum VNodeKind {
    /// Text content.
    Text(Str),
    /// Element.
    Element(Element),
    /// Class or function component.
    Component(ComponentNode),
    /// Context provider.
    Context(ContextNode),
    /// Connector.
    Connect(ConnectNode),
    /// Keep-alive boundary around a single child.
    KeepAlive(Box<VNode>),
    /// Renders nothing.
    Empty,
}

impl VNodeKind {
    fn flags(&self) -> NodeFlags {
        match self {
            Self::Text(_) => NodeFlags::TEXT,
            Self::Element(e) => NodeFlags::ELEMENT | e.tag.flags() | e.children.flags(),
            Self::Component(c) => c.kind().flags(),
            Self::Context(_) => NodeFlags::UPDATE_CONTEXT,
            Self::Connect(_) => NodeFlags::CONNECT,
            Self::KeepAlive(_) => NodeFlags::KEEP_ALIVE,
            Self::Empty => NodeFlags::EMPTY,
        }
    }
}

/// An immutable node descriptor.
///
/// `Clone` is a full deep clone: every child is cloned recursively. Descriptors
/// never hold renderer instance state, so a clone can be mounted anywhere.
#[derive(Clone)]
pub struct VNode {
    flags: NodeFlags,
    key: Option<Key>,
    kind: VNodeKind,
    linked: Option<Rc<dyn Any>>,
}

impl fmt::Debug for VNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VNode")
            .field("flags", &self.flags)
            .field("key", &self.key)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl VNode {
    pub(crate) fn from_kind(kind: VNodeKind) -> Self {
        Self {
            flags: kind.flags(),
            key: None,
            kind,
            linked: None,
        }
    }

    pub(crate) fn from_tag(tag: ElementTag) -> Self {
        Self::from_kind(VNodeKind::Element(Element {
            tag,
            class_name: None,
            props: Attrs::new(),
            style: Attrs::new(),
            dynamic_props: Attrs::new(),
            children: Children::None,
        }))
    }

    /// Creates a node that renders nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_kind(VNodeKind::Empty)
    }

    /// Returns the node flags.
    #[must_use]
    pub const fn flags(&self) -> NodeFlags {
        self.flags
    }

    /// Returns the sibling key, if any.
    #[must_use]
    pub const fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    /// Returns the node payload.
    #[must_use]
    pub const fn kind(&self) -> &VNodeKind {
        &self.kind
    }

    /// Returns the element payload, if this is an element.
    #[must_use]
    pub const fn element(&self) -> Option<&Element> {
        match &self.kind {
            VNodeKind::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the blueprint linked with [`VNode::link`], if any.
    #[must_use]
    pub const fn linked(&self) -> Option<&Rc<dyn Any>> {
        self.linked.as_ref()
    }

    /// Sets the sibling key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self.flags |= NodeFlags::KEY;
        self
    }

    /// Attaches an opaque reuse hint, consumed by the SSR backend.
    #[must_use]
    pub fn link(mut self, hint: Rc<dyn Any>) -> Self {
        self.linked = Some(hint);
        self.flags |= NodeFlags::LINKED_BLUEPRINT;
        self
    }

    /// Returns a copy without children or unsafe markup.
    ///
    /// Tag, class, props, style, dynamic props and key are kept. Context providers
    /// and keep-alive boundaries keep their position but get an [`VNode::empty`]
    /// child. Other kinds have no subtree of their own and are cloned as is.
    #[must_use]
    pub fn shallow_clone(&self) -> Self {
        let kind = match &self.kind {
            VNodeKind::Element(e) => VNodeKind::Element(Element {
                children: Children::None,
                ..e.clone()
            }),
            VNodeKind::Context(c) => VNodeKind::Context(ContextNode {
                values: c.values.clone(),
                child: Box::new(Self::empty()),
            }),
            VNodeKind::KeepAlive(_) => VNodeKind::KeepAlive(Box::new(Self::empty())),
            other => other.clone(),
        };
        let mut node = Self::from_kind(kind);
        node.key.clone_from(&self.key);
        if node.key.is_some() {
            node.flags |= NodeFlags::KEY;
        }
        node
    }

    #[track_caller]
    fn element_mut(&mut self, method: &str) -> &mut Element {
        match &mut self.kind {
            VNodeKind::Element(e) => e,
            _ => panic!("`{method}` called on a non-element node"),
        }
    }

    fn set_children(&mut self, children: Children) {
        let element = self.element_mut("children");
        element.children = children;
        let flags = element.children.flags();
        self.flags = (self.flags - NodeFlags::CHILDREN) | flags;
    }

    /// Sets the static class name.
    ///
    /// # Panics
    ///
    /// Panics if this is not an element.
    #[must_use]
    #[track_caller]
    pub fn class_name(mut self, class_name: impl Into<Str>) -> Self {
        self.element_mut("class_name").class_name = Some(class_name.into());
        self
    }

    /// Sets the static props.
    ///
    /// # Panics
    ///
    /// Panics if this is not an element.
    #[must_use]
    #[track_caller]
    pub fn props(mut self, props: impl Into<Attrs>) -> Self {
        self.element_mut("props").props = props.into();
        self
    }

    /// Sets the static inline style.
    ///
    /// # Panics
    ///
    /// Panics if this is not an element.
    #[must_use]
    #[track_caller]
    pub fn style(mut self, style: impl Into<Attrs>) -> Self {
        self.element_mut("style").style = style.into();
        self
    }

    /// Sets the per-render props.
    ///
    /// # Panics
    ///
    /// Panics if this is not an element.
    #[must_use]
    #[track_caller]
    pub fn dynamic_props(mut self, props: impl Into<Attrs>) -> Self {
        self.element_mut("dynamic_props").dynamic_props = props.into();
        self
    }

    /// Sets a single child node.
    ///
    /// # Panics
    ///
    /// Panics if this is not an element.
    #[must_use]
    #[track_caller]
    pub fn child(mut self, child: impl Into<Self>) -> Self {
        self.set_children(Children::Node(Box::new(child.into())));
        self
    }

    /// Sets a list of child nodes.
    ///
    /// # Panics
    ///
    /// Panics if this is not an element.
    #[must_use]
    #[track_caller]
    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Self>,
    {
        let nodes = children.into_iter().map(Into::into).collect();
        self.set_children(Children::Nodes(nodes));
        self
    }

    /// Sets raw text content.
    ///
    /// # Panics
    ///
    /// Panics if this is not an element.
    #[must_use]
    #[track_caller]
    pub fn text_content(mut self, content: impl ToString) -> Self {
        self.set_children(Children::Text(content.to_string().into()));
        self
    }

    /// Sets raw markup emitted without escaping.
    ///
    /// # Panics
    ///
    /// Panics if this is not an element.
    #[must_use]
    #[track_caller]
    pub fn unsafe_html(mut self, html: impl Into<Str>) -> Self {
        self.set_children(Children::UnsafeHtml(html.into()));
        self
    }
}

/// Creates a text node.
#[must_use]
pub fn text(content: impl ToString) -> VNode {
    VNode::from_kind(VNodeKind::Text(content.to_string().into()))
}

/// Creates an HTML element with an arbitrary tag name.
#[must_use]
pub fn element(tag: impl Into<Str>) -> VNode {
    VNode::from_tag(ElementTag::new(tag))
}

/// Creates a context provider publishing `values` to `child`'s subtree.
#[must_use]
pub fn context(values: ContextValues, child: impl Into<VNode>) -> VNode {
    VNode::from_kind(VNodeKind::Context(ContextNode {
        values,
        child: Box::new(child.into()),
    }))
}

/// Creates a connector.
///
/// The identity of a connector is the type of `select`, so reusing the same
/// closure site across renders keeps the position structurally identical.
#[must_use]
pub fn connect<F>(select: F) -> VNode
where
    F: Fn(&Context) -> VNode + 'static,
{
    VNode::from_kind(VNodeKind::Connect(ConnectNode {
        id: ComponentId::of::<F>(),
        select: Rc::new(select),
    }))
}

/// Wraps `child` in a keep-alive boundary.
#[must_use]
pub fn keep_alive(child: impl Into<VNode>) -> VNode {
    VNode::from_kind(VNodeKind::KeepAlive(Box::new(child.into())))
}

impl From<&str> for VNode {
    fn from(value: &str) -> Self {
        text(value)
    }
}

impl From<alloc::string::String> for VNode {
    fn from(value: alloc::string::String) -> Self {
        text(value)
    }
}
