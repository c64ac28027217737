//! Class and function components.
//!
//! A component position in a descriptor tree stores an erased render closure
//! together with a [`ComponentId`]. Renderers expand the closure to obtain the
//! component's subtree; reuse decisions compare only the identity.

use alloc::rc::Rc;
use core::{
    any::{TypeId, type_name},
    fmt,
    hash::{Hash, Hasher},
};

use crate::{Context, NodeFlags, VNode, VNodeKind};

/// A component constructed from props and the ambient context.
///
/// # Example
///
/// ```rust
/// use arbor_core::{ComponentClass, Context, VNode, component, html::div, text};
///
/// struct Greeting(String);
///
/// impl ComponentClass for Greeting {
///     type Props = String;
///
///     fn new(props: &String, _context: &Context) -> Self {
///         Self(props.clone())
///     }
///
///     fn render(&self) -> VNode {
///         div().child(text(format!("Hello, {}", self.0)))
///     }
/// }
///
/// let node = component::<Greeting>("World".to_string());
/// assert!(node.flags().contains(arbor_core::NodeFlags::COMPONENT_CLASS));
/// ```
pub trait ComponentClass: Sized + 'static {
    /// Input properties.
    type Props: 'static;

    /// Creates an instance.
    fn new(props: &Self::Props, context: &Context) -> Self;

    /// Renders the instance into a descriptor subtree.
    fn render(&self) -> VNode;
}

/// Identity of a component (or connector) type.
///
/// Two positions hold the same component iff their ids are equal. Function
/// components use the type of the function item or closure, so every distinct
/// function has its own id.
#[derive(Clone, Copy)]
pub struct ComponentId {
    type_id: TypeId,
    name: &'static str,
}

impl ComponentId {
    /// Returns the id of `T`.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Returns the type name, for diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ComponentId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ComponentId {}

impl Hash for ComponentId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Whether a component position holds a class or a function component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// [`ComponentClass`] implementation.
    Class,
    /// Stateless function component.
    Function,
}

impl ComponentKind {
    pub(crate) const fn flags(self) -> NodeFlags {
        match self {
            Self::Class => NodeFlags::COMPONENT_CLASS,
            Self::Function => NodeFlags::COMPONENT_FUNCTION,
        }
    }
}

type RenderFn = Rc<dyn Fn(&Context) -> VNode>;

/// A component position: identity plus erased render closure.
#[derive(Clone)]
pub struct ComponentNode {
    kind: ComponentKind,
    id: ComponentId,
    render: RenderFn,
}

impl_debug!(ComponentNode);

impl ComponentNode {
    /// Returns the component kind.
    #[must_use]
    pub const fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// Returns the component identity.
    #[must_use]
    pub const fn id(&self) -> ComponentId {
        self.id
    }

    /// Invokes the component and returns its rendered subtree.
    #[must_use]
    pub fn render(&self, context: &Context) -> VNode {
        (self.render)(context)
    }
}

/// Creates a class component position.
#[must_use]
pub fn component<C: ComponentClass>(props: C::Props) -> VNode {
    let node = ComponentNode {
        kind: ComponentKind::Class,
        id: ComponentId::of::<C>(),
        render: Rc::new(move |context| C::new(&props, context).render()),
    };
    VNode::from_kind(VNodeKind::Component(node))
}

/// Creates a stateless function component position.
///
/// Pass function items or closures directly, not as coerced `fn` pointers:
/// the component identity is the type of `f`.
#[must_use]
pub fn stateless<P, F>(f: F, props: P) -> VNode
where
    P: 'static,
    F: Fn(&P) -> VNode + 'static,
{
    let node = ComponentNode {
        kind: ComponentKind::Function,
        id: ComponentId::of::<F>(),
        render: Rc::new(move |_context| f(&props)),
    };
    VNode::from_kind(VNodeKind::Component(node))
}
