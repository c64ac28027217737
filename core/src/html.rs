//! HTML element factories.

use crate::NodeFlags;

element_factories! { NodeFlags::empty();
    /// `<a>`
    a => "a",
    /// `<div>`
    div => "div",
    /// `<li>`
    li => "li",
    /// `<p>`
    p => "p",
    /// `<span>`
    span => "span",
    /// `<strong>`
    strong => "strong",
    /// `<ul>`
    ul => "ul",
}

element_factories! { NodeFlags::VOID_ELEMENT;
    /// `<br>`
    br => "br",
    /// `<hr>`
    hr => "hr",
    /// `<img>`
    img => "img",
    /// `<input>`
    input => "input",
}
