//! Arena-backed tree builder.
//!
//! The builder owns every node created during a render pass and performs the
//! structural mutations a reconciliation host needs: instantiation, child
//! insertion and removal, container attachment and in-place updates. Nodes are
//! addressed through copyable [`NodeId`] handles, so the same node can be
//! referenced from the reconciler's bookkeeping and from its parent at once.

use log::{debug, warn};
use serde_json::Value;

use crate::error::TreeResult;
use crate::node::{Node, NodeKind, Props, TEXT_PROP, strip_children};


/// A handle to a node owned by a [`TreeBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Slot {
    kind: NodeKind,
    children: Vec<NodeId>,
    properties: Props,
    parent: Option<NodeId>,
}

/// The root holder of one render pass.
///
/// It remembers the most recent `Document` node attached to it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Container {
    root: Option<NodeId>,
}

impl Container {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// The attached document node, if any.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Forgets the attached document node.
    pub fn clear(&mut self) {
        self.root = None;
    }
}

/// Owns and mutates the nodes of a document tree.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    slots: Vec<Slot>,
}

impl TreeBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes ever created by this builder.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no node has been created yet.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Creates a node for an element tag.
    ///
    /// Run-like kinds keep their property bag verbatim; every other kind drops
    /// the `children` key.
    pub fn instantiate(&mut self, tag: &str, props: &Props) -> TreeResult<NodeId> {
        let kind = NodeKind::from_tag(tag)?;
        Ok(self.instantiate_kind(kind, props))
    }

    /// Creates a node of a known kind.
    pub fn instantiate_kind(&mut self, kind: NodeKind, props: &Props) -> NodeId {
        let properties = if kind.is_run_like() {
            props.clone()
        } else {
            strip_children(props)
        };
        self.alloc(kind, properties)
    }

    /// Creates a `TextRun` node for a bare text value.
    pub fn instantiate_text(&mut self, text: &str) -> NodeId {
        let mut properties = Props::new();
        properties.insert(TEXT_PROP.into(), Value::String(text.into()));
        self.alloc(NodeKind::TextRun, properties)
    }

    fn alloc(&mut self, kind: NodeKind, properties: Props) -> NodeId {
        let id = NodeId(self.slots.len());
        self.slots.push(Slot {
            kind,
            children: Vec::new(),
            properties,
            parent: None,
        });
        id
    }

    /// Appends `child` at the end of `parent`'s children.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.slots[parent.0].children.push(child);
        self.slots[child.0].parent = Some(parent);
    }

    /// Inserts `child` immediately before `reference` in `parent`'s children.
    ///
    /// Returns `false` and leaves the tree untouched when `reference` is not a
    /// child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) -> bool {
        if child == reference {
            return self.slots[child.0].parent == Some(parent);
        }
        if !self.slots[parent.0].children.contains(&reference) {
            warn!(
                "insert_before: {:?} is not a child of {:?}, ignoring insertion of {:?}",
                reference, parent, child
            );
            return false;
        }

        self.detach(child);
        let siblings = &mut self.slots[parent.0].children;
        let index = siblings
            .iter()
            .position(|&id| id == reference)
            .unwrap_or(siblings.len());
        siblings.insert(index, child);
        self.slots[child.0].parent = Some(parent);
        true
    }

    /// Removes `child` from `parent`'s children, if present.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        let siblings = &mut self.slots[parent.0].children;
        if let Some(index) = siblings.iter().position(|&id| id == child) {
            siblings.remove(index);
            self.slots[child.0].parent = None;
        }
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(parent) = self.slots[child.0].parent.take() {
            self.slots[parent.0].children.retain(|&id| id != child);
        }
    }

    /// Attaches a node to the container.
    ///
    /// Only `Document` nodes become the container root.
    pub fn append_to_container(&self, container: &mut Container, node: NodeId) {
        let kind = self.kind(node);
        if kind == NodeKind::Document {
            container.root = Some(node);
        } else {
            debug!("container: ignoring top-level {kind} node");
        }
    }

    /// Detaches a node from the container if it is the current root.
    pub fn remove_from_container(&self, container: &mut Container, node: NodeId) {
        if container.root == Some(node) {
            container.root = None;
        }
    }

    /// Replaces the `text` property of a node.
    pub fn commit_text_update(&mut self, node: NodeId, text: &str) {
        self.slots[node.0]
            .properties
            .insert(TEXT_PROP.into(), Value::String(text.into()));
    }

    /// Replaces the property bag of a node, dropping `children`.
    pub fn commit_properties_update(&mut self, node: NodeId, props: &Props) {
        self.slots[node.0].properties = strip_children(props);
    }

    /// The kind of a node.
    pub fn kind(&self, node: NodeId) -> NodeKind {
        self.slots[node.0].kind
    }

    /// The ordered children of a node.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.slots[node.0].children
    }

    /// The property bag of a node.
    pub fn properties(&self, node: NodeId) -> &Props {
        &self.slots[node.0].properties
    }

    /// The current parent of a node.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.slots[node.0].parent
    }

    /// Copies the subtree rooted at `node` into an owned [`Node`].
    pub fn materialize(&self, node: NodeId) -> Node {
        let slot = &self.slots[node.0];
        Node {
            kind: slot.kind,
            children: slot.children.iter().map(|&id| self.materialize(id)).collect(),
            properties: slot.properties.clone(),
        }
    }
}
