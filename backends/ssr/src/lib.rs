#![doc = include_str!("../README.md")]
#![allow(clippy::module_name_repetitions)]

pub mod blueprint;
mod error;
mod markup;
mod options;
mod render;
mod state;


#[doc(inline)]
pub use blueprint::{BlueprintChildren, BlueprintNode, Shape, create_blueprint, link_blueprint};
pub use error::SsrError;
pub use options::SsrOptions;
pub use render::{
    render_document, render_to_string, render_to_string_with_context, render_vnode_to_string,
};
pub use state::serialize_state;
