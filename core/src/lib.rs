#![doc = include_str!("../README.md")]
#![allow(clippy::module_name_repetitions)]

extern crate alloc;

#[macro_use]
mod macros;

pub mod component;
pub mod context;
pub mod flags;
pub mod html;
pub mod key;
pub mod svg;
pub mod value;
pub mod vnode;

#[doc(inline)]
pub use component::{ComponentClass, ComponentId, ComponentKind, component, stateless};
#[doc(inline)]
pub use context::{Context, ContextValues};
#[doc(inline)]
pub use flags::NodeFlags;
#[doc(inline)]
pub use key::{Key, KeyError, KeyMode, check_sibling_keys};
#[doc(inline)]
pub use value::{Attrs, Value};
#[doc(inline)]
pub use vnode::{
    Children, ConnectNode, ContextNode, Element, ElementTag, VNode, VNodeKind, connect, context,
    element, keep_alive, text,
};

/// Shared immutable string used throughout node descriptors.
pub type Str = alloc::rc::Rc<str>;
