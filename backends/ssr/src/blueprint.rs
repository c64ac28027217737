//! Blueprint trees.
//!
//! A blueprint mirrors a descriptor tree with every static piece of markup
//! already serialized. Building a blueprint against the blueprint of the
//! previous render returns the previous nodes, by pointer, wherever the
//! structure did not change.

use std::{any::Any, collections::HashMap, rc::Rc};

use arbor_core::{
    Attrs, Children, ComponentId, ConnectNode, Context, ContextValues, ElementTag, Key, KeyMode,
    NodeFlags, Str, VNode, VNodeKind, check_sibling_keys,
};

use crate::{
    SsrError,
    markup::{escape_text, open_tag},
    render,
};

/// Structural snapshot of the descriptor a blueprint node was built from.
///
/// Only the parts that decide reuse are kept.
#[derive(Debug, Clone)]
pub enum Shape {
    /// Text node with its raw content.
    Text(Str),
    /// Element with its static parts.
    Element {
        /// Tag.
        tag: ElementTag,
        /// Static class name.
        class_name: Option<Str>,
        /// Static props.
        props: Attrs,
        /// Static style.
        style: Attrs,
    },
    /// Component position.
    Component(ComponentId),
    /// Context provider with the values it published.
    Context(ContextValues),
    /// Connector, kept so rendering can re-evaluate it.
    Connect {
        /// The connector.
        connector: ConnectNode,
        /// Context the connector was built against, used when rendering
        /// without an explicit context.
        context: Context,
    },
    /// Keep-alive boundary.
    KeepAlive,
    /// Empty node.
    Empty,
}

/// Children of a blueprint node, mirroring the descriptor's children form.
#[derive(Debug, Clone, Default)]
pub enum BlueprintChildren {
    /// No children.
    #[default]
    None,
    /// Single child. Also used for the expanded output of components,
    /// connectors, context providers and keep-alive boundaries.
    Node(Rc<BlueprintNode>),
    /// List of children.
    Nodes(Vec<Rc<BlueprintNode>>),
    /// Text content with its escaped markup.
    Text {
        /// Raw content.
        content: Str,
        /// Escaped markup.
        markup: String,
    },
    /// Raw markup.
    Html(Str),
}

impl BlueprintChildren {
    /// Returns child blueprint nodes as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Rc<BlueprintNode>] {
        match self {
            Self::Node(node) => std::slice::from_ref(node),
            Self::Nodes(nodes) => nodes,
            Self::None | Self::Text { .. } | Self::Html(_) => &[],
        }
    }

    fn deep_connect(&self) -> bool {
        self.as_slice()
            .iter()
            .any(|child| child.flags.contains(NodeFlags::DEEP_CONNECT))
    }
}

/// A cached, reusable node of a blueprint tree.
#[derive(Debug)]
pub struct BlueprintNode {
    flags: NodeFlags,
    key: Option<Key>,
    shape: Shape,
    string: String,
    children: BlueprintChildren,
}

impl BlueprintNode {
    /// Returns the source flags plus [`NodeFlags::DEEP_CONNECT`] when set.
    #[must_use]
    pub const fn flags(&self) -> NodeFlags {
        self.flags
    }

    /// Returns `true` if the subtree must be re-evaluated on every render.
    #[must_use]
    pub const fn is_deep_connect(&self) -> bool {
        self.flags.contains(NodeFlags::DEEP_CONNECT)
    }

    /// Returns the key of the source descriptor.
    #[must_use]
    pub const fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    /// Returns the structural snapshot.
    #[must_use]
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the cached markup.
    ///
    /// Elements cache their opening tag and text nodes their escaped content.
    /// Components cache the full markup of their output, unless the output
    /// contains a connector, in which case the string is empty.
    #[must_use]
    pub fn string(&self) -> &str {
        &self.string
    }

    /// Returns the children.
    #[must_use]
    pub const fn children(&self) -> &BlueprintChildren {
        &self.children
    }

    /// Returns the first child, if any.
    #[must_use]
    pub fn first_child(&self) -> Option<&Rc<Self>> {
        self.children.as_slice().first()
    }

    fn new(flags: NodeFlags, key: Option<Key>, shape: Shape, children: BlueprintChildren) -> Self {
        let mut flags = flags.structural();
        if matches!(shape, Shape::Connect { .. }) || children.deep_connect() {
            flags |= NodeFlags::DEEP_CONNECT;
        }
        Self {
            flags,
            key,
            shape,
            string: String::new(),
            children,
        }
    }

    const fn connect_context(&self) -> Option<&Context> {
        match &self.shape {
            Shape::Connect { context, .. } => Some(context),
            _ => None,
        }
    }

    fn same_shape(&self, node: &VNode) -> bool {
        if self.flags.structural() != node.flags().structural() {
            return false;
        }
        let same = match (&self.shape, node.kind()) {
            (Shape::Text(a), VNodeKind::Text(b)) => a == b,
            (
                Shape::Element {
                    tag,
                    class_name,
                    props,
                    style,
                },
                VNodeKind::Element(e),
            ) => {
                tag == e.tag()
                    && class_name.as_deref() == e.class_name()
                    && props == e.props()
                    && style == e.style()
            }
            (Shape::Component(a), VNodeKind::Component(c)) => *a == c.id(),
            (Shape::Context(a), VNodeKind::Context(c)) => a.ptr_eq(c.values()),
            (Shape::Connect { connector, .. }, VNodeKind::Connect(c)) => connector.id() == c.id(),
            (Shape::KeepAlive, VNodeKind::KeepAlive(_)) | (Shape::Empty, VNodeKind::Empty) => true,
            _ => false,
        };
        same && self.key.as_ref() == node.key()
    }
}

/// Builds the blueprint of `node`.
///
/// `context` is the ambient context of the position, `previous` the blueprint
/// built for the same position by an earlier render. When `previous` is not
/// given, a hint attached with [`link_blueprint`] is used instead. The result is
/// `previous` itself when nothing changed structurally.
///
/// Components and connectors are expanded during the build. Connector nodes keep
/// the context they saw, so [`render_to_string`](crate::render_to_string)
/// re-evaluates them against it, and they are only reused when built against the
/// same frames. Dynamic props take no part in the comparison.
///
/// # Errors
///
/// Returns [`SsrError::VoidElementChildren`] when a void element has children
/// and [`SsrError::Key`] when a child list mixes keyed and unkeyed nodes or
/// repeats a key.
pub fn create_blueprint(
    node: &VNode,
    context: Option<&Context>,
    previous: Option<&Rc<BlueprintNode>>,
) -> Result<Rc<BlueprintNode>, SsrError> {
    let root = Context::root();
    let blueprint = build(node, context.unwrap_or(&root), previous)?;
    tracing::debug!(
        reused = previous.is_some_and(|p| Rc::ptr_eq(p, &blueprint)),
        deep_connect = blueprint.is_deep_connect(),
        "built blueprint"
    );
    Ok(blueprint)
}

/// Attaches `blueprint` to `node` as a reuse hint for [`create_blueprint`].
#[must_use]
pub fn link_blueprint(node: VNode, blueprint: &Rc<BlueprintNode>) -> VNode {
    let hint: Rc<dyn Any> = blueprint.clone();
    node.link(hint)
}

fn linked(node: &VNode) -> Option<Rc<BlueprintNode>> {
    node.linked()
        .and_then(|hint| Rc::clone(hint).downcast::<BlueprintNode>().ok())
}

fn build(
    node: &VNode,
    context: &Context,
    previous: Option<&Rc<BlueprintNode>>,
) -> Result<Rc<BlueprintNode>, SsrError> {
    let hint = linked(node);
    let previous = previous.or(hint.as_ref());
    let prev_children = previous.map_or(&[][..], |p| p.children.as_slice());
    let key = node.key().cloned();

    let blueprint = match node.kind() {
        VNodeKind::Text(content) => {
            if let Some(prev) = previous.filter(|p| p.same_shape(node)) {
                return Ok(Rc::clone(prev));
            }
            let mut blueprint = BlueprintNode::new(
                node.flags(),
                key,
                Shape::Text(content.clone()),
                BlueprintChildren::None,
            );
            blueprint.string = escape_text(content);
            blueprint
        }
        VNodeKind::Element(element) => {
            let tag = element.tag();
            if tag.is_void() && !element.children().is_none() {
                return Err(SsrError::VoidElementChildren {
                    tag: tag.name().to_owned(),
                });
            }
            let children = match element.children() {
                Children::None => BlueprintChildren::None,
                Children::Node(child) => {
                    BlueprintChildren::Node(build(child, context, prev_children.first())?)
                }
                Children::Nodes(nodes) => {
                    BlueprintChildren::Nodes(build_list(nodes, context, prev_children)?)
                }
                Children::Text(content) => BlueprintChildren::Text {
                    content: content.clone(),
                    markup: escape_text(content),
                },
                Children::UnsafeHtml(html) => BlueprintChildren::Html(html.clone()),
            };
            if let Some(prev) = previous.filter(|p| p.same_shape(node) && same_children(p, &children)) {
                tracing::trace!(tag = tag.name(), "reused element blueprint");
                return Ok(Rc::clone(prev));
            }
            let shape = Shape::Element {
                tag: tag.clone(),
                class_name: element.class_name().map(Str::from),
                props: element.props().clone(),
                style: element.style().clone(),
            };
            let mut blueprint = BlueprintNode::new(node.flags(), key, shape, children);
            blueprint.string = open_tag(element);
            blueprint
        }
        VNodeKind::Component(component) => {
            let output = component.render(context);
            let child = build(&output, context, prev_children.first())?;
            let children = BlueprintChildren::Node(child);
            if let Some(prev) = previous.filter(|p| p.same_shape(node) && same_children(p, &children)) {
                tracing::trace!(component = component.id().name(), "reused component blueprint");
                return Ok(Rc::clone(prev));
            }
            let mut blueprint = BlueprintNode::new(
                node.flags(),
                key,
                Shape::Component(component.id()),
                children,
            );
            if !blueprint.is_deep_connect() {
                let mut out = String::new();
                for child in blueprint.children.as_slice() {
                    render::write_blueprint(child, Some(context), &mut out)?;
                }
                blueprint.string = out;
            }
            blueprint
        }
        VNodeKind::Context(provider) => {
            let inner = context.push(provider.values());
            let child = build(provider.child(), &inner, prev_children.first())?;
            let children = BlueprintChildren::Node(child);
            if let Some(prev) = previous.filter(|p| p.same_shape(node) && same_children(p, &children)) {
                return Ok(Rc::clone(prev));
            }
            BlueprintNode::new(
                node.flags(),
                key,
                Shape::Context(provider.values().clone()),
                children,
            )
        }
        VNodeKind::Connect(connector) => {
            let output = connector.render(context);
            let child = build(&output, context, prev_children.first())?;
            let children = BlueprintChildren::Node(child);
            if let Some(prev) = previous.filter(|p| {
                p.same_shape(node)
                    && p.connect_context().is_some_and(|built| built.same_frames(context))
                    && same_children(p, &children)
            }) {
                return Ok(Rc::clone(prev));
            }
            BlueprintNode::new(
                node.flags(),
                key,
                Shape::Connect {
                    connector: connector.clone(),
                    context: context.clone(),
                },
                children,
            )
        }
        VNodeKind::KeepAlive(child) => {
            let child = build(child, context, prev_children.first())?;
            let children = BlueprintChildren::Node(child);
            if let Some(prev) = previous.filter(|p| p.same_shape(node) && same_children(p, &children)) {
                return Ok(Rc::clone(prev));
            }
            BlueprintNode::new(node.flags(), key, Shape::KeepAlive, children)
        }
        VNodeKind::Empty => {
            if let Some(prev) = previous.filter(|p| p.same_shape(node)) {
                return Ok(Rc::clone(prev));
            }
            BlueprintNode::new(node.flags(), key, Shape::Empty, BlueprintChildren::None)
        }
    };
    Ok(Rc::new(blueprint))
}

/// Builds a child list, matching previous children by key when the list is
/// keyed and by position otherwise.
fn build_list(
    nodes: &[VNode],
    context: &Context,
    previous: &[Rc<BlueprintNode>],
) -> Result<Vec<Rc<BlueprintNode>>, SsrError> {
    match check_sibling_keys(nodes)? {
        KeyMode::Positional => nodes
            .iter()
            .enumerate()
            .map(|(i, node)| build(node, context, previous.get(i)))
            .collect(),
        KeyMode::Keyed => {
            let by_key: HashMap<&Key, &Rc<BlueprintNode>> = previous
                .iter()
                .filter_map(|prev| prev.key.as_ref().map(|key| (key, prev)))
                .collect();
            nodes
                .iter()
                .map(|node| {
                    let prev = node.key().and_then(|key| by_key.get(key).copied());
                    build(node, context, prev)
                })
                .collect()
        }
    }
}

/// Returns `true` when `children` are exactly the children of `previous`,
/// by pointer and in the same positions.
fn same_children(previous: &BlueprintNode, children: &BlueprintChildren) -> bool {
    match (&previous.children, children) {
        (BlueprintChildren::None, BlueprintChildren::None) => true,
        (BlueprintChildren::Node(a), BlueprintChildren::Node(b)) => Rc::ptr_eq(a, b),
        (BlueprintChildren::Nodes(a), BlueprintChildren::Nodes(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| Rc::ptr_eq(a, b))
        }
        (BlueprintChildren::Text { content: a, .. }, BlueprintChildren::Text { content: b, .. })
        | (BlueprintChildren::Html(a), BlueprintChildren::Html(b)) => a == b,
        _ => false,
    }
}
