//! In-memory render target.

use std::collections::HashMap;

use arbor_core::{Attrs, ElementTag, Str};
use html_escape::{encode_double_quoted_attribute_to_string, encode_text_to_string};

use crate::{NodeId, Patch, PatchList, ReconcileError};

#[derive(Debug)]
enum NodeData {
    Container,
    Element {
        tag: ElementTag,
        class_name: Option<Str>,
        attrs: Attrs,
        style: Attrs,
    },
    Text(Str),
    Html(Str),
}

#[derive(Debug)]
struct DomNode {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl DomNode {
    const fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// A render target living in memory.
///
/// Every applied patch is recorded, so tests can assert on the exact mutations
/// a pass performed rather than only on the resulting tree.
#[derive(Debug)]
pub struct MemoryDom {
    nodes: HashMap<NodeId, DomNode>,
    container: NodeId,
    mutations: Vec<Patch>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// Creates a target holding an empty container node.
    #[must_use]
    pub fn new() -> Self {
        let container = NodeId::next();
        let mut nodes = HashMap::new();
        nodes.insert(container, DomNode::new(NodeData::Container));
        Self {
            nodes,
            container,
            mutations: Vec::new(),
        }
    }

    /// Returns the container node to mount roots into.
    #[must_use]
    pub const fn container(&self) -> NodeId {
        self.container
    }

    /// Applies `patches` in order.
    ///
    /// # Errors
    ///
    /// Fails on the first patch that references an unknown node or targets a
    /// node of the wrong type. Patches before it stay applied.
    pub fn apply(&mut self, patches: &PatchList) -> Result<(), ReconcileError> {
        for patch in patches {
            self.apply_patch(patch)?;
            self.mutations.push(patch.clone());
        }
        Ok(())
    }

    /// Returns every patch applied so far.
    #[must_use]
    pub fn mutations(&self) -> &[Patch] {
        &self.mutations
    }

    /// Clears the mutation log.
    pub fn clear_mutations(&mut self) {
        self.mutations.clear();
    }

    /// Returns the number of live nodes, the container included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if only the container is left.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Returns the children of `id`.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map_or(&[], |node| node.children.as_slice())
    }

    /// Returns the content of text node `id`.
    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes.get(&id)?.data {
            NodeData::Text(content) => Some(content),
            _ => None,
        }
    }

    /// Serializes the children of the container.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for &child in self.children(self.container) {
            self.write_html(child, &mut out);
        }
        out
    }

    /// Serializes node `id` and its subtree.
    #[must_use]
    pub fn node_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        match &node.data {
            NodeData::Container => {
                for &child in &node.children {
                    self.write_html(child, out);
                }
            }
            NodeData::Text(content) => {
                encode_text_to_string(content, out);
            }
            NodeData::Html(html) => out.push_str(html),
            NodeData::Element {
                tag,
                class_name,
                attrs,
                style,
            } => {
                out.push('<');
                out.push_str(tag.name());
                if let Some(class_name) = class_name {
                    out.push_str(" class=\"");
                    encode_double_quoted_attribute_to_string(class_name, out);
                    out.push('"');
                }
                for (name, value) in attrs.iter() {
                    out.push(' ');
                    out.push_str(name);
                    if !value.is_bare() {
                        out.push_str("=\"");
                        encode_double_quoted_attribute_to_string(value.to_string(), out);
                        out.push('"');
                    }
                }
                if !style.is_empty() {
                    let declarations: Vec<String> =
                        style.iter().map(|(name, value)| format!("{name}:{value}")).collect();
                    out.push_str(" style=\"");
                    encode_double_quoted_attribute_to_string(declarations.join(";"), out);
                    out.push('"');
                }
                out.push('>');
                if tag.is_void() {
                    return;
                }
                for &child in &node.children {
                    self.write_html(child, out);
                }
                out.push_str("</");
                out.push_str(tag.name());
                out.push('>');
            }
        }
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut DomNode, ReconcileError> {
        self.nodes.get_mut(&id).ok_or(ReconcileError::UnknownNode(id))
    }

    fn element_mut(
        &mut self,
        id: NodeId,
    ) -> Result<(&mut Option<Str>, &mut Attrs, &mut Attrs), ReconcileError> {
        match &mut self.node_mut(id)?.data {
            NodeData::Element {
                class_name,
                attrs,
                style,
                ..
            } => Ok((class_name, attrs, style)),
            _ => Err(ReconcileError::UnexpectedNode {
                id,
                expected: "an element",
            }),
        }
    }

    fn create(&mut self, id: NodeId, data: NodeData) {
        self.nodes.insert(id, DomNode::new(data));
    }

    fn detach(&mut self, id: NodeId) -> Result<(), ReconcileError> {
        let parent = self.node_mut(id)?.parent.take();
        if let Some(parent) = parent {
            self.node_mut(parent)?.children.retain(|&child| child != id);
        }
        Ok(())
    }

    fn drop_subtree(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.remove(&id) {
            for child in node.children {
                self.drop_subtree(child);
            }
        }
    }

    fn clear_children(&mut self, id: NodeId) -> Result<(), ReconcileError> {
        let children = std::mem::take(&mut self.node_mut(id)?.children);
        for child in children {
            self.drop_subtree(child);
        }
        Ok(())
    }

    fn append_new(&mut self, parent: NodeId, data: NodeData) -> Result<(), ReconcileError> {
        let id = NodeId::next();
        self.create(id, data);
        self.insert(parent, id, None)
    }

    fn insert(
        &mut self,
        parent: NodeId,
        id: NodeId,
        before: Option<NodeId>,
    ) -> Result<(), ReconcileError> {
        self.detach(id)?;
        let siblings = &mut self.node_mut(parent)?.children;
        let index = match before {
            Some(before) => siblings
                .iter()
                .position(|&child| child == before)
                .ok_or(ReconcileError::UnknownNode(before))?,
            None => siblings.len(),
        };
        siblings.insert(index, id);
        self.node_mut(id)?.parent = Some(parent);
        Ok(())
    }

    fn apply_patch(&mut self, patch: &Patch) -> Result<(), ReconcileError> {
        match patch {
            Patch::CreateElement { id, tag } => self.create(
                *id,
                NodeData::Element {
                    tag: tag.clone(),
                    class_name: None,
                    attrs: Attrs::new(),
                    style: Attrs::new(),
                },
            ),
            Patch::CreateText { id, content } => self.create(*id, NodeData::Text(content.clone())),
            Patch::SetText { id, content } => match &mut self.node_mut(*id)?.data {
                NodeData::Text(text) => text.clone_from(content),
                _ => {
                    return Err(ReconcileError::UnexpectedNode {
                        id: *id,
                        expected: "a text node",
                    });
                }
            },
            Patch::SetTextContent { id, content } => {
                self.element_mut(*id)?;
                self.clear_children(*id)?;
                if !content.is_empty() {
                    self.append_new(*id, NodeData::Text(content.clone()))?;
                }
            }
            Patch::SetInnerHtml { id, html } => {
                self.element_mut(*id)?;
                self.clear_children(*id)?;
                self.append_new(*id, NodeData::Html(html.clone()))?;
            }
            Patch::SetClassName { id, class_name } => {
                self.element_mut(*id)?.0.clone_from(class_name);
            }
            Patch::SetAttribute { id, name, value } => {
                self.element_mut(*id)?.1.insert(name.clone(), value.clone());
            }
            Patch::RemoveAttribute { id, name } => {
                self.element_mut(*id)?.1.remove(name);
            }
            Patch::SetStyle { id, name, value } => {
                self.element_mut(*id)?.2.insert(name.clone(), value.clone());
            }
            Patch::RemoveStyle { id, name } => {
                self.element_mut(*id)?.2.remove(name);
            }
            Patch::Insert { parent, id, before } => self.insert(*parent, *id, *before)?,
            Patch::Remove { parent, id } => {
                if self.nodes.get(id).and_then(|node| node.parent) != Some(*parent) {
                    return Err(ReconcileError::UnknownNode(*id));
                }
                self.detach(*id)?;
                self.drop_subtree(*id);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::{Value, html::div};

    #[test]
    fn applies_and_records_patches() {
        let mut dom = MemoryDom::new();
        let el = NodeId::next();
        let text = NodeId::next();
        let mut patches = PatchList::new();
        patches.push(Patch::CreateElement {
            id: el,
            tag: div().element().unwrap().tag().clone(),
        });
        patches.push(Patch::SetAttribute {
            id: el,
            name: "id".into(),
            value: Value::from("a"),
        });
        patches.push(Patch::CreateText {
            id: text,
            content: "x".into(),
        });
        patches.push(Patch::Insert {
            parent: el,
            id: text,
            before: None,
        });
        patches.push(Patch::Insert {
            parent: dom.container(),
            id: el,
            before: None,
        });
        dom.apply(&patches).unwrap();

        assert_eq!(dom.to_html(), r#"<div id="a">x</div>"#);
        assert_eq!(dom.mutations().len(), 5);
        assert_eq!(dom.text(text), Some("x"));
    }

    #[test]
    fn unknown_nodes_fail() {
        let mut dom = MemoryDom::new();
        let ghost = NodeId::next();
        let mut patches = PatchList::new();
        patches.push(Patch::SetText {
            id: ghost,
            content: "x".into(),
        });
        assert_eq!(dom.apply(&patches), Err(ReconcileError::UnknownNode(ghost)));
        assert!(dom.mutations().is_empty());
    }
}
