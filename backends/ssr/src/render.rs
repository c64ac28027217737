//! Markup rendering of blueprints and raw descriptors.

use arbor_core::{Children, Context, VNode, VNodeKind};

use crate::{
    BlueprintChildren, BlueprintNode, Shape, SsrError, SsrOptions,
    markup::{escape_text, open_tag, write_close_tag},
};

/// Renders `blueprint` to markup.
///
/// Connectors are re-evaluated against the context they were built with, so the
/// output matches the context given to [`create_blueprint`](crate::create_blueprint).
///
/// # Errors
///
/// Fails when a connector re-evaluated during rendering produces an invalid
/// subtree. See [`render_vnode_to_string`].
pub fn render_to_string(blueprint: &BlueprintNode) -> Result<String, SsrError> {
    let mut out = String::new();
    write_blueprint(blueprint, None, &mut out)?;
    Ok(out)
}

/// Renders `blueprint` to markup with `context` as the ambient context.
///
/// Cached strings are emitted as they are. Connectors are re-evaluated against
/// `context` plus the frames of the providers above them, instead of the
/// context they were built with.
///
/// # Errors
///
/// See [`render_to_string`].
pub fn render_to_string_with_context(
    blueprint: &BlueprintNode,
    context: &Context,
) -> Result<String, SsrError> {
    let mut out = String::new();
    write_blueprint(blueprint, Some(context), &mut out)?;
    Ok(out)
}

/// Renders `blueprint` as a full document, following `options`.
///
/// # Errors
///
/// See [`render_to_string`].
pub fn render_document(blueprint: &BlueprintNode, options: &SsrOptions) -> Result<String, SsrError> {
    let mut out = String::new();
    if options.doctype {
        out.push_str("<!DOCTYPE html>");
    }
    write_blueprint(blueprint, None, &mut out)?;
    Ok(out)
}

/// Renders a descriptor directly, without building a blueprint.
///
/// # Errors
///
/// Returns [`SsrError::VoidElementChildren`] when a void element has children.
pub fn render_vnode_to_string(node: &VNode, context: Option<&Context>) -> Result<String, SsrError> {
    let root = Context::root();
    let mut out = String::new();
    write_vnode(node, context.unwrap_or(&root), &mut out)?;
    Ok(out)
}

/// Writes `blueprint`. Without `context`, connectors use the context captured
/// at build time.
pub(crate) fn write_blueprint(
    blueprint: &BlueprintNode,
    context: Option<&Context>,
    out: &mut String,
) -> Result<(), SsrError> {
    match blueprint.shape() {
        Shape::Text(_) => out.push_str(blueprint.string()),
        Shape::Element { tag, .. } => {
            out.push_str(blueprint.string());
            match blueprint.children() {
                BlueprintChildren::None => {}
                BlueprintChildren::Node(child) => write_blueprint(child, context, out)?,
                BlueprintChildren::Nodes(children) => {
                    for child in children {
                        write_blueprint(child, context, out)?;
                    }
                }
                BlueprintChildren::Text { markup, .. } => out.push_str(markup),
                BlueprintChildren::Html(html) => out.push_str(html),
            }
            write_close_tag(out, tag);
        }
        Shape::Component(_) if !blueprint.is_deep_connect() => out.push_str(blueprint.string()),
        Shape::Context(values) => {
            let inner = context.map(|context| context.push(values));
            for child in blueprint.children().as_slice() {
                write_blueprint(child, inner.as_ref(), out)?;
            }
        }
        Shape::Connect {
            connector,
            context: built,
        } => {
            let context = context.unwrap_or(built);
            tracing::trace!(connector = connector.id().name(), "re-evaluating connector");
            write_vnode(&connector.render(context), context, out)?;
        }
        Shape::Component(_) | Shape::KeepAlive => {
            for child in blueprint.children().as_slice() {
                write_blueprint(child, context, out)?;
            }
        }
        Shape::Empty => {}
    }
    Ok(())
}

fn write_vnode(node: &VNode, context: &Context, out: &mut String) -> Result<(), SsrError> {
    match node.kind() {
        VNodeKind::Text(content) => out.push_str(&escape_text(content)),
        VNodeKind::Element(element) => {
            let tag = element.tag();
            if tag.is_void() && !element.children().is_none() {
                return Err(SsrError::VoidElementChildren {
                    tag: tag.name().to_owned(),
                });
            }
            out.push_str(&open_tag(element));
            match element.children() {
                Children::None => {}
                Children::Node(child) => write_vnode(child, context, out)?,
                Children::Nodes(children) => {
                    arbor_core::check_sibling_keys(children)?;
                    for child in children {
                        write_vnode(child, context, out)?;
                    }
                }
                Children::Text(content) => out.push_str(&escape_text(content)),
                Children::UnsafeHtml(html) => out.push_str(html),
            }
            write_close_tag(out, tag);
        }
        VNodeKind::Component(component) => write_vnode(&component.render(context), context, out)?,
        VNodeKind::Context(provider) => {
            write_vnode(provider.child(), &context.push(provider.values()), out)?;
        }
        VNodeKind::Connect(connector) => write_vnode(&connector.render(context), context, out)?,
        VNodeKind::KeepAlive(child) => write_vnode(child, context, out)?,
        VNodeKind::Empty => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::{
        ContextValues, connect, context,
        html::{br, div, input, span},
        text,
    };

    #[test]
    fn raw_descriptor_rendering() {
        let node = div()
            .class_name("a")
            .children([span().text_content("1 < 2"), br(), text("&")]);
        assert_eq!(
            render_vnode_to_string(&node, None).unwrap(),
            r#"<div class="a"><span>1 &lt; 2</span><br>&amp;</div>"#
        );
    }

    #[test]
    fn void_element_with_children_fails() {
        let node = input().child(span());
        assert!(matches!(
            render_vnode_to_string(&node, None),
            Err(SsrError::VoidElementChildren { tag }) if tag == "input"
        ));
    }

    #[test]
    fn connector_reads_live_context() {
        let node = context(
            ContextValues::new().with("name", "arbor"),
            connect(|ctx| text(ctx.get::<&'static str>("name").copied().unwrap_or("?"))),
        );
        assert_eq!(render_vnode_to_string(&node, None).unwrap(), "arbor");
    }

    #[test]
    fn unsafe_html_is_verbatim() {
        let node = div().unsafe_html("<b>x</b>");
        assert_eq!(render_vnode_to_string(&node, None).unwrap(), "<div><b>x</b></div>");
    }
}
