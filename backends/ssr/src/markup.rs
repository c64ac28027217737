//! Markup serialization of descriptor parts.
//!
//! Attribute order is fixed: `class`, then props in insertion order, then
//! `style`.

use arbor_core::{Attrs, Element, ElementTag};
use html_escape::{encode_double_quoted_attribute_to_string, encode_text_to_string};

/// Serializes the opening tag of `element`, static parts only.
pub(crate) fn open_tag(element: &Element) -> String {
    let mut out = String::with_capacity(element.tag().name().len() + 2);
    out.push('<');
    out.push_str(element.tag().name());

    if let Some(class_name) = element.class_name() {
        out.push_str(" class=\"");
        encode_double_quoted_attribute_to_string(class_name, &mut out);
        out.push('"');
    }

    write_props(&mut out, element.props());

    if element.style().iter().any(|(_, v)| v.is_present()) {
        out.push_str(" style=\"");
        write_style(&mut out, element.style());
        out.push('"');
    }

    out.push('>');
    out
}

fn write_props(out: &mut String, props: &Attrs) {
    for (name, value) in props.iter().filter(|(_, v)| v.is_present()) {
        out.push(' ');
        out.push_str(name);
        if !value.is_bare() {
            out.push_str("=\"");
            encode_double_quoted_attribute_to_string(value.to_string(), out);
            out.push('"');
        }
    }
}

fn write_style(out: &mut String, style: &Attrs) {
    let mut first = true;
    for (name, value) in style.iter().filter(|(_, v)| v.is_present()) {
        if !first {
            out.push(';');
        }
        first = false;
        let declaration = format!("{name}:{value}");
        encode_double_quoted_attribute_to_string(declaration, out);
    }
}

/// Appends the closing tag. Void elements have none.
pub(crate) fn write_close_tag(out: &mut String, tag: &ElementTag) {
    if !tag.is_void() {
        out.push_str("</");
        out.push_str(tag.name());
        out.push('>');
    }
}

/// Escapes text content.
pub(crate) fn escape_text(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    encode_text_to_string(content, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::html::{br, div};

    fn open(node: &arbor_core::VNode) -> String {
        open_tag(node.element().unwrap())
    }

    #[test]
    fn class_props_style_order() {
        let node = div()
            .style([("color", "green")])
            .props([("id", "123")])
            .class_name("abc");
        assert_eq!(open(&node), r#"<div class="abc" id="123" style="color:green">"#);
    }

    #[test]
    fn boolean_props() {
        let node = div().props([("hidden", true), ("draggable", false)]);
        assert_eq!(open(&node), "<div hidden>");
    }

    #[test]
    fn attribute_values_are_escaped() {
        let node = div().props([("title", r#"a"b<c"#)]);
        assert_eq!(open(&node), r#"<div title="a&quot;b&lt;c">"#);
    }

    #[test]
    fn void_has_no_close_tag() {
        let mut out = String::new();
        write_close_tag(&mut out, br().element().unwrap().tag());
        assert!(out.is_empty());
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(escape_text("a < b & c"), "a &lt; b &amp; c");
    }
}
