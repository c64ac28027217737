//! Tree reconciliation.
//!
//! The reconciler keeps a mounted mirror of the last descriptor tree. Every
//! pass walks the new descriptors against the mirror, emits patches for the
//! differences and returns the next mirror. The previous mirror is only read,
//! so a failed pass leaves the root exactly as it was.

use std::collections::HashMap;

use arbor_core::{
    Attrs, Children, ComponentId, Context, Element, ElementTag, Key, KeyMode, Str, VNode,
    VNodeKind, Value, check_sibling_keys,
};

use crate::{NodeId, Patch, PatchList, ReconcileError, lis::stable_positions};

#[derive(Debug, Clone)]
struct Mounted {
    key: Option<Key>,
    kind: MountedKind,
}

#[derive(Debug, Clone)]
enum MountedKind {
    Text { id: NodeId, content: Str },
    Element(MountedElement),
    Component { id: ComponentId, child: Box<Mounted> },
    Context { child: Box<Mounted> },
    Connect { id: ComponentId, child: Box<Mounted> },
    KeepAlive { child: Box<Mounted> },
    // rendered as an empty text node so the position keeps an anchor
    Empty { id: NodeId },
}

#[derive(Debug, Clone)]
struct MountedElement {
    id: NodeId,
    tag: ElementTag,
    class_name: Option<Str>,
    attrs: Attrs,
    style: Attrs,
    children: MountedChildren,
}

#[derive(Debug, Clone)]
enum MountedChildren {
    None,
    Nodes(Vec<Mounted>),
    Text(Str),
    Html(Str),
}

impl Mounted {
    /// Returns the target node standing for this position.
    fn dom_id(&self) -> NodeId {
        match &self.kind {
            MountedKind::Text { id, .. } | MountedKind::Empty { id } => *id,
            MountedKind::Element(element) => element.id,
            MountedKind::Component { child, .. }
            | MountedKind::Context { child }
            | MountedKind::Connect { child, .. }
            | MountedKind::KeepAlive { child } => child.dom_id(),
        }
    }

    /// Returns `true` when `node` can be patched into this position.
    fn matches(&self, node: &VNode) -> bool {
        if self.key.as_ref() != node.key() {
            return false;
        }
        match (&self.kind, node.kind()) {
            (MountedKind::Text { .. }, VNodeKind::Text(_))
            | (MountedKind::Context { .. }, VNodeKind::Context(_))
            | (MountedKind::KeepAlive { .. }, VNodeKind::KeepAlive(_))
            | (MountedKind::Empty { .. }, VNodeKind::Empty) => true,
            (MountedKind::Element(element), VNodeKind::Element(e)) => element.tag == *e.tag(),
            (MountedKind::Component { id, .. }, VNodeKind::Component(c)) => *id == c.id(),
            (MountedKind::Connect { id, .. }, VNodeKind::Connect(c)) => *id == c.id(),
            _ => false,
        }
    }
}

/// Props applied to the target: static props overridden by dynamic ones.
fn effective_props(element: &Element) -> Attrs {
    let mut attrs = element.props().clone();
    for (name, value) in element.dynamic_props().iter() {
        attrs.insert(name.clone(), value.clone());
    }
    attrs
}

fn check_void(element: &Element) -> Result<(), ReconcileError> {
    let tag = element.tag();
    if tag.is_void() && !element.children().is_none() {
        return Err(ReconcileError::VoidElementChildren {
            tag: tag.name().to_owned(),
        });
    }
    Ok(())
}

#[derive(Debug)]
struct Reconciler {
    patches: PatchList,
}

impl Reconciler {
    const fn new() -> Self {
        Self {
            patches: PatchList::new(),
        }
    }

    fn emit(&mut self, patch: Patch) {
        self.patches.push(patch);
    }

    /// Creates `node` and inserts it into `parent`.
    fn mount(
        &mut self,
        node: &VNode,
        context: &Context,
        parent: NodeId,
        before: Option<NodeId>,
    ) -> Result<Mounted, ReconcileError> {
        let mounted = self.create(node, context)?;
        self.emit(Patch::Insert {
            parent,
            id: mounted.dom_id(),
            before,
        });
        Ok(mounted)
    }

    fn create(&mut self, node: &VNode, context: &Context) -> Result<Mounted, ReconcileError> {
        let kind = match node.kind() {
            VNodeKind::Text(content) => {
                let id = NodeId::next();
                self.emit(Patch::CreateText {
                    id,
                    content: content.clone(),
                });
                MountedKind::Text {
                    id,
                    content: content.clone(),
                }
            }
            VNodeKind::Element(element) => MountedKind::Element(self.create_element(element, context)?),
            VNodeKind::Component(component) => MountedKind::Component {
                id: component.id(),
                child: Box::new(self.create(&component.render(context), context)?),
            },
            VNodeKind::Context(provider) => {
                let inner = context.push(provider.values());
                MountedKind::Context {
                    child: Box::new(self.create(provider.child(), &inner)?),
                }
            }
            VNodeKind::Connect(connector) => MountedKind::Connect {
                id: connector.id(),
                child: Box::new(self.create(&connector.render(context), context)?),
            },
            VNodeKind::KeepAlive(child) => MountedKind::KeepAlive {
                child: Box::new(self.create(child, context)?),
            },
            VNodeKind::Empty => {
                let id = NodeId::next();
                self.emit(Patch::CreateText {
                    id,
                    content: Str::from(""),
                });
                MountedKind::Empty { id }
            }
        };
        Ok(Mounted {
            key: node.key().cloned(),
            kind,
        })
    }

    fn create_element(
        &mut self,
        element: &Element,
        context: &Context,
    ) -> Result<MountedElement, ReconcileError> {
        check_void(element)?;
        let id = NodeId::next();
        self.emit(Patch::CreateElement {
            id,
            tag: element.tag().clone(),
        });

        let class_name = element.class_name().map(Str::from);
        if class_name.is_some() {
            self.emit(Patch::SetClassName {
                id,
                class_name: class_name.clone(),
            });
        }
        let attrs = effective_props(element);
        self.diff_attrs(id, &Attrs::new(), &attrs);
        self.diff_style(id, &Attrs::new(), element.style());

        let children = self.create_children(id, element.children(), context)?;
        Ok(MountedElement {
            id,
            tag: element.tag().clone(),
            class_name,
            attrs,
            style: element.style().clone(),
            children,
        })
    }

    fn create_children(
        &mut self,
        parent: NodeId,
        children: &Children,
        context: &Context,
    ) -> Result<MountedChildren, ReconcileError> {
        Ok(match children {
            Children::None => MountedChildren::None,
            Children::Node(_) | Children::Nodes(_) => {
                let nodes = children.as_slice();
                check_sibling_keys(nodes)?;
                MountedChildren::Nodes(self.mount_all(nodes, context, parent)?)
            }
            Children::Text(content) => {
                self.emit(Patch::SetTextContent {
                    id: parent,
                    content: content.clone(),
                });
                MountedChildren::Text(content.clone())
            }
            Children::UnsafeHtml(html) => {
                self.emit(Patch::SetInnerHtml {
                    id: parent,
                    html: html.clone(),
                });
                MountedChildren::Html(html.clone())
            }
        })
    }

    fn mount_all(
        &mut self,
        nodes: &[VNode],
        context: &Context,
        parent: NodeId,
    ) -> Result<Vec<Mounted>, ReconcileError> {
        nodes
            .iter()
            .map(|node| self.mount(node, context, parent, None))
            .collect()
    }

    fn remove(&mut self, mounted: &Mounted, parent: NodeId) {
        self.emit(Patch::Remove {
            parent,
            id: mounted.dom_id(),
        });
    }

    fn replace(
        &mut self,
        old: &Mounted,
        node: &VNode,
        context: &Context,
        parent: NodeId,
    ) -> Result<Mounted, ReconcileError> {
        let mounted = self.mount(node, context, parent, Some(old.dom_id()))?;
        self.remove(old, parent);
        Ok(mounted)
    }

    /// Patches `old` into `node`. Mismatched kinds, tags or keys are replaced.
    fn patch(
        &mut self,
        old: &Mounted,
        node: &VNode,
        context: &Context,
        parent: NodeId,
    ) -> Result<Mounted, ReconcileError> {
        if !old.matches(node) {
            return self.replace(old, node, context, parent);
        }
        let kind = match (&old.kind, node.kind()) {
            (MountedKind::Text { id, content }, VNodeKind::Text(next)) => {
                if content != next {
                    self.emit(Patch::SetText {
                        id: *id,
                        content: next.clone(),
                    });
                }
                MountedKind::Text {
                    id: *id,
                    content: next.clone(),
                }
            }
            (MountedKind::Element(old), VNodeKind::Element(element)) => {
                MountedKind::Element(self.patch_element(old, element, context)?)
            }
            (MountedKind::Component { child, .. }, VNodeKind::Component(component)) => {
                MountedKind::Component {
                    id: component.id(),
                    child: Box::new(self.patch(child, &component.render(context), context, parent)?),
                }
            }
            (MountedKind::Context { child }, VNodeKind::Context(provider)) => {
                let inner = context.push(provider.values());
                MountedKind::Context {
                    child: Box::new(self.patch(child, provider.child(), &inner, parent)?),
                }
            }
            (MountedKind::Connect { child, .. }, VNodeKind::Connect(connector)) => {
                MountedKind::Connect {
                    id: connector.id(),
                    child: Box::new(self.patch(child, &connector.render(context), context, parent)?),
                }
            }
            (MountedKind::KeepAlive { child }, VNodeKind::KeepAlive(next)) => MountedKind::KeepAlive {
                child: Box::new(self.patch(child, next, context, parent)?),
            },
            (MountedKind::Empty { id }, VNodeKind::Empty) => MountedKind::Empty { id: *id },
            _ => return self.replace(old, node, context, parent),
        };
        Ok(Mounted {
            key: node.key().cloned(),
            kind,
        })
    }

    fn patch_element(
        &mut self,
        old: &MountedElement,
        element: &Element,
        context: &Context,
    ) -> Result<MountedElement, ReconcileError> {
        check_void(element)?;
        let id = old.id;

        let class_name = element.class_name().map(Str::from);
        if class_name != old.class_name {
            self.emit(Patch::SetClassName {
                id,
                class_name: class_name.clone(),
            });
        }
        let attrs = effective_props(element);
        self.diff_attrs(id, &old.attrs, &attrs);
        self.diff_style(id, &old.style, element.style());

        let children = self.patch_children(id, &old.children, element.children(), context)?;
        Ok(MountedElement {
            id,
            tag: old.tag.clone(),
            class_name,
            attrs,
            style: element.style().clone(),
            children,
        })
    }

    fn diff_attrs(&mut self, id: NodeId, old: &Attrs, new: &Attrs) {
        self.diff_values(
            old,
            new,
            |name, value| Patch::SetAttribute { id, name, value },
            |name| Patch::RemoveAttribute { id, name },
        );
    }

    fn diff_style(&mut self, id: NodeId, old: &Attrs, new: &Attrs) {
        self.diff_values(
            old,
            new,
            |name, value| Patch::SetStyle { id, name, value },
            |name| Patch::RemoveStyle { id, name },
        );
    }

    fn diff_values(
        &mut self,
        old: &Attrs,
        new: &Attrs,
        set: impl Fn(Str, Value) -> Patch,
        remove: impl Fn(Str) -> Patch,
    ) {
        for (name, value) in new.iter() {
            let previous = old.get(name).filter(|v| v.is_present());
            if value.is_present() {
                if previous != Some(value) {
                    self.emit(set(name.clone(), value.clone()));
                }
            } else if previous.is_some() {
                self.emit(remove(name.clone()));
            }
        }
        for (name, value) in old.iter() {
            if value.is_present() && new.get(name).is_none() {
                self.emit(remove(name.clone()));
            }
        }
    }

    fn patch_children(
        &mut self,
        parent: NodeId,
        old: &MountedChildren,
        new: &Children,
        context: &Context,
    ) -> Result<MountedChildren, ReconcileError> {
        match (old, new) {
            (MountedChildren::None, Children::None) => Ok(MountedChildren::None),
            (MountedChildren::Nodes(old), Children::Node(_) | Children::Nodes(_)) => Ok(
                MountedChildren::Nodes(self.patch_list(parent, old, new.as_slice(), context)?),
            ),
            (MountedChildren::Text(a), Children::Text(b)) => {
                if a != b {
                    self.emit(Patch::SetTextContent {
                        id: parent,
                        content: b.clone(),
                    });
                }
                Ok(MountedChildren::Text(b.clone()))
            }
            (MountedChildren::Html(a), Children::UnsafeHtml(b)) => {
                if a != b {
                    self.emit(Patch::SetInnerHtml {
                        id: parent,
                        html: b.clone(),
                    });
                }
                Ok(MountedChildren::Html(b.clone()))
            }
            _ => {
                match old {
                    MountedChildren::Nodes(nodes) => {
                        for node in nodes {
                            self.remove(node, parent);
                        }
                    }
                    // text and markup replace each other without clearing first
                    MountedChildren::Text(_) | MountedChildren::Html(_)
                        if !matches!(new, Children::Text(_) | Children::UnsafeHtml(_)) =>
                    {
                        self.emit(Patch::SetTextContent {
                            id: parent,
                            content: Str::from(""),
                        });
                    }
                    _ => {}
                }
                self.create_children(parent, new, context)
            }
        }
    }

    fn patch_list(
        &mut self,
        parent: NodeId,
        old: &[Mounted],
        new: &[VNode],
        context: &Context,
    ) -> Result<Vec<Mounted>, ReconcileError> {
        let mode = check_sibling_keys(new)?;
        if old.is_empty() {
            return self.mount_all(new, context, parent);
        }
        if new.is_empty() {
            for node in old {
                self.remove(node, parent);
            }
            return Ok(Vec::new());
        }

        let old_keyed = old.iter().all(|m| m.key.is_some());
        match (mode, old_keyed) {
            (KeyMode::Positional, false) => self.patch_positional(parent, old, new, context),
            (KeyMode::Keyed, true) => self.patch_keyed(parent, old, new, context),
            _ => {
                for node in old {
                    self.remove(node, parent);
                }
                self.mount_all(new, context, parent)
            }
        }
    }

    fn patch_positional(
        &mut self,
        parent: NodeId,
        old: &[Mounted],
        new: &[VNode],
        context: &Context,
    ) -> Result<Vec<Mounted>, ReconcileError> {
        let common = old.len().min(new.len());
        let mut out = Vec::with_capacity(new.len());
        for (old, node) in old.iter().zip(new) {
            out.push(self.patch(old, node, context, parent)?);
        }
        for node in &new[common..] {
            out.push(self.mount(node, context, parent, None)?);
        }
        for node in &old[common..] {
            self.remove(node, parent);
        }
        Ok(out)
    }

    fn patch_keyed(
        &mut self,
        parent: NodeId,
        old: &[Mounted],
        new: &[VNode],
        context: &Context,
    ) -> Result<Vec<Mounted>, ReconcileError> {
        let mut result: Vec<Option<Mounted>> = vec![None; new.len()];

        // common prefix and suffix stay where they are
        let mut start = 0;
        while start < old.len() && start < new.len() && old[start].key.as_ref() == new[start].key() {
            result[start] = Some(self.patch(&old[start], &new[start], context, parent)?);
            start += 1;
        }
        let (mut old_end, mut new_end) = (old.len(), new.len());
        while old_end > start
            && new_end > start
            && old[old_end - 1].key.as_ref() == new[new_end - 1].key()
        {
            old_end -= 1;
            new_end -= 1;
            result[new_end] = Some(self.patch(&old[old_end], &new[new_end], context, parent)?);
        }

        let old_index: HashMap<&Key, usize> = (start..old_end)
            .filter_map(|i| old[i].key.as_ref().map(|key| (key, i)))
            .collect();
        let sources: Vec<Option<usize>> = new[start..new_end]
            .iter()
            .map(|node| node.key().and_then(|key| old_index.get(key).copied()))
            .collect();

        let mut matched = vec![false; old.len()];
        for &i in sources.iter().flatten() {
            matched[i] = true;
        }
        for i in start..old_end {
            if !matched[i] {
                self.remove(&old[i], parent);
            }
        }

        let stay = stable_positions(&sources);
        let mut moves = 0_usize;
        for j in (start..new_end).rev() {
            let anchor = result.get(j + 1).and_then(Option::as_ref).map(Mounted::dom_id);
            let mounted = match sources[j - start] {
                None => self.mount(&new[j], context, parent, anchor)?,
                Some(i) => {
                    let mounted = self.patch(&old[i], &new[j], context, parent)?;
                    if !stay[j - start] {
                        moves += 1;
                        self.emit(Patch::Insert {
                            parent,
                            id: mounted.dom_id(),
                            before: anchor,
                        });
                    }
                    mounted
                }
            };
            result[j] = Some(mounted);
        }
        tracing::trace!(%parent, moves, "keyed children diffed");

        Ok(result.into_iter().flatten().collect())
    }
}

/// A descriptor tree mounted into a container node of the render target.
#[derive(Debug)]
pub struct Root {
    container: NodeId,
    context: Context,
    tree: Option<Mounted>,
}

impl Root {
    /// Mounts `node` as the last child of `container`.
    ///
    /// `context` is the ambient context of the whole tree.
    ///
    /// # Errors
    ///
    /// Returns an error when the tree violates the sibling key contract or when
    /// a void element has children.
    pub fn mount(
        container: NodeId,
        node: &VNode,
        context: Option<&Context>,
    ) -> Result<(Self, PatchList), ReconcileError> {
        let context = context.cloned().unwrap_or_default();
        let mut reconciler = Reconciler::new();
        let tree = reconciler.mount(node, &context, container, None)?;
        tracing::debug!(%container, patches = reconciler.patches.len(), "mounted root");
        let root = Self {
            container,
            context,
            tree: Some(tree),
        };
        Ok((root, reconciler.patches))
    }

    /// Reconciles the mounted tree against `node`.
    ///
    /// On error no patch is returned and the root keeps its previous tree.
    ///
    /// # Errors
    ///
    /// See [`Root::mount`].
    pub fn update(&mut self, node: &VNode) -> Result<PatchList, ReconcileError> {
        let mut reconciler = Reconciler::new();
        let tree = match &self.tree {
            Some(old) => reconciler.patch(old, node, &self.context, self.container)?,
            None => reconciler.mount(node, &self.context, self.container, None)?,
        };
        self.tree = Some(tree);
        tracing::debug!(container = %self.container, patches = reconciler.patches.len(), "updated root");
        Ok(reconciler.patches)
    }

    /// Removes the mounted tree from the container.
    pub fn unmount(&mut self) -> PatchList {
        let mut reconciler = Reconciler::new();
        if let Some(tree) = self.tree.take() {
            reconciler.remove(&tree, self.container);
        }
        reconciler.patches
    }

    /// Replaces the ambient context used by later updates.
    pub fn set_context(&mut self, context: Context) {
        self.context = context;
    }

    /// Returns the container node.
    #[must_use]
    pub const fn container(&self) -> NodeId {
        self.container
    }

    /// Returns `true` while a tree is mounted.
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.tree.is_some()
    }
}
