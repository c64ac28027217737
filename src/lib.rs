#![doc = include_str!("../README.md")]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod logging;

#[doc(inline)]
pub use arbor_core::{
    Attrs, Children, ComponentClass, Context, ContextValues, Element, Key, KeyError, NodeFlags,
    Str, VNode, VNodeKind, Value, component, connect, context, element, html, keep_alive,
    stateless, svg, text,
};
pub use arbor_dom as dom;
pub use arbor_events as events;
pub use arbor_ssr as ssr;

#[doc(inline)]
pub use config::{Config, ConfigError};
#[doc(inline)]
pub use logging::install_tracing;

/// Logging facade used across Arbor.
pub use tracing as log;

pub mod prelude {
    //! Commonly used items, importable with a single `use arbor::prelude::*`.
    //!
    //! ```rust
    //! use arbor::prelude::*;
    //!
    //! let page = div().class_name("page").child(p().text_content("hello"));
    //! assert_eq!(render_vnode_to_string(&page, None).unwrap(), r#"<div class="page"><p>hello</p></div>"#);
    //! ```
    pub use arbor_core::html::*;
    pub use arbor_core::{
        ComponentClass, Context, ContextValues, VNode, Value, component, connect, context,
        keep_alive, stateless, text,
    };
    pub use arbor_dom::{MemoryDom, Root};
    pub use arbor_events::{
        EventHandler, EventSource, GestureEventSource, GesturePointerEvent, HandlerFlags,
        PointerAction,
    };
    pub use arbor_ssr::{create_blueprint, render_to_string, render_vnode_to_string};
}
