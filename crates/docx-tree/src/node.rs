//! Node definitions for the intermediate document tree.
//!
//! A [`Node`] is the owned, detached form of a tree built by
//! [`TreeBuilder`](crate::TreeBuilder). Nodes carry a [`NodeKind`] tag and a
//! free-form property bag whose interpretation belongs to the consumer.

use serde_json::{Map, Value};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::{TreeError, TreeResult};

/// Property bag attached to a node.
pub type Props = Map<String, Value>;

/// The key under which text-bearing nodes store their text.
pub const TEXT_PROP: &str = "text";

/// The property key that never survives into a structural node's bag.
pub const CHILDREN_PROP: &str = "children";

/// The closed set of node kinds understood by the tree.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, EnumIter,
)]
pub enum NodeKind {
    /// The root of a document.
    Document,
    /// A page-layout region.
    Section,
    /// A block of inline content.
    Paragraph,
    /// A span of text with uniform formatting.
    TextRun,
    /// A grid of rows.
    Table,
    /// A row of cells.
    TableRow,
    /// A cell holding block content.
    TableCell,
    /// A tab stop.
    Tab,
    /// An inline picture.
    ImageRun,
    /// A link to an external URL.
    ExternalHyperlink,
    /// A link to a bookmark in the same document.
    InternalHyperlink,
    /// A forced page break.
    PageBreak,
    /// A named anchor around inline content.
    Bookmark,
    /// A character from a symbol font.
    SymbolRun,
    /// An inline formula.
    Math,
    /// A line break inside a paragraph.
    Break,
}

impl NodeKind {
    /// Resolves an element tag into a node kind.
    ///
    /// Tags are the variant names (`"Paragraph"`). The `RD`-prefixed spelling
    /// (`"RDParagraph"`) is accepted as well.
    pub fn from_tag(tag: &str) -> TreeResult<Self> {
        let name = tag.strip_prefix("RD").unwrap_or(tag);
        name.parse()
            .or_else(|_| tag.parse())
            .map_err(|_| TreeError::UnknownElementKind(tag.into()))
    }

    /// Returns the tag used for this kind in element trees.
    pub fn tag(self) -> &'static str {
        self.into()
    }

    /// Whether the property bag is kept verbatim, `children` key included.
    pub fn is_run_like(self) -> bool {
        matches!(
            self,
            NodeKind::TextRun | NodeKind::ImageRun | NodeKind::SymbolRun
        )
    }

    /// Whether the kind maps to a packager object that cannot hold children.
    pub fn is_leaf(self) -> bool {
        matches!(
            self,
            NodeKind::TextRun
                | NodeKind::SymbolRun
                | NodeKind::ImageRun
                | NodeKind::Tab
                | NodeKind::PageBreak
                | NodeKind::Break
        )
    }
}

/// An owned node of the document tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// The kind of this node.
    pub kind: NodeKind,
    /// Ordered children.
    pub children: Vec<Node>,
    /// The property bag.
    pub properties: Props,
}

impl Node {
    /// Creates a node without properties or children.
    pub fn new(kind: NodeKind) -> Self {
        Self::with_properties(kind, Props::new())
    }

    /// Creates a node with the given property bag.
    pub fn with_properties(kind: NodeKind, properties: Props) -> Self {
        Self {
            kind,
            children: Vec::new(),
            properties,
        }
    }

    /// Creates a `TextRun` node holding `text`.
    pub fn text(text: impl Into<String>) -> Self {
        let mut properties = Props::new();
        properties.insert(TEXT_PROP.into(), Value::String(text.into()));
        Self::with_properties(NodeKind::TextRun, properties)
    }

    /// Appends a child and returns the node.
    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Looks up a property.
    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Looks up a string property.
    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.prop(key).and_then(Value::as_str)
    }

    /// The `text` property, if it is a string.
    pub fn text_content(&self) -> Option<&str> {
        self.prop_str(TEXT_PROP)
    }
}

/// Copies a property bag without its `children` key.
pub fn strip_children(props: &Props) -> Props {
    props
        .iter()
        .filter(|(key, _)| key.as_str() != CHILDREN_PROP)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
