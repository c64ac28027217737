//! SVG element factories.

use crate::NodeFlags;

element_factories! { NodeFlags::SVG_ELEMENT;
    /// `<svg>`
    svg => "svg",
    /// `<circle>`
    circle => "circle",
    /// `<path>`
    path => "path",
    /// `<g>`
    g => "g",
}
