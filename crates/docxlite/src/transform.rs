//! Turns a node tree into the typed document object graph.
//!
//! Every node kind maps to exactly one packager object. Property bags are
//! deserialized into the object's option struct; children are transformed
//! recursively and must fit the slot their parent offers.

use docx_tree::node::CHILDREN_PROP;
use docx_tree::{Node, NodeKind};
use log::warn;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::model::{
    Block, Document, DocumentOptions, ImageOptions, Inline, Paragraph, ParagraphOptions,
    RunOptions, Section, SectionOptions, SymbolOptions, Table, TableCell, TableCellOptions,
    TableOptions, TableRow, TableRowOptions,
};
use crate::{Error, Result, TransformFeat};

#[cfg(test)]
mod tests;

/// The packager object produced for a single node.
#[derive(Debug, Clone, PartialEq)]
pub enum DocxObject {
    /// The document root.
    Document(Document),
    /// A section.
    Section(Section),
    /// A paragraph.
    Paragraph(Paragraph),
    /// A table.
    Table(Table),
    /// A table row.
    TableRow(TableRow),
    /// A table cell.
    TableCell(TableCell),
    /// A page break, valid both between blocks and inside a paragraph.
    PageBreak,
    /// Inline paragraph content.
    Inline(Inline),
}

impl DocxObject {
    /// A short name for messages.
    pub fn name(&self) -> &'static str {
        match self {
            DocxObject::Document(_) => "Document",
            DocxObject::Section(_) => "Section",
            DocxObject::Paragraph(_) => "Paragraph",
            DocxObject::Table(_) => "Table",
            DocxObject::TableRow(_) => "TableRow",
            DocxObject::TableCell(_) => "TableCell",
            DocxObject::PageBreak => "PageBreak",
            DocxObject::Inline(inline) => match inline {
                Inline::Run(_) => "TextRun",
                Inline::Tab => "Tab",
                Inline::PageBreak => "PageBreak",
                Inline::Image(_) => "ImageRun",
                Inline::Symbol(_) => "SymbolRun",
                Inline::ExternalHyperlink { .. } => "ExternalHyperlink",
                Inline::InternalHyperlink { .. } => "InternalHyperlink",
                Inline::Bookmark { .. } => "Bookmark",
                Inline::Math { .. } => "Math",
            },
        }
    }

    fn misplaced(&self, parent: NodeKind) -> Error {
        Error::structural(format!(
            "{} cannot be placed inside {parent}",
            self.name()
        ))
    }

    fn into_block(self, parent: NodeKind) -> Result<Block> {
        match self {
            DocxObject::Paragraph(paragraph) => Ok(Block::Paragraph(paragraph)),
            DocxObject::Table(table) => Ok(Block::Table(table)),
            DocxObject::PageBreak => Ok(Block::PageBreak),
            other => Err(other.misplaced(parent)),
        }
    }

    fn into_inline(self, parent: NodeKind) -> Result<Inline> {
        match self {
            DocxObject::Inline(inline) => Ok(inline),
            DocxObject::PageBreak => Ok(Inline::PageBreak),
            other => Err(other.misplaced(parent)),
        }
    }

    fn into_row(self, parent: NodeKind) -> Result<TableRow> {
        match self {
            DocxObject::TableRow(row) => Ok(row),
            other => Err(other.misplaced(parent)),
        }
    }

    fn into_cell(self, parent: NodeKind) -> Result<TableCell> {
        match self {
            DocxObject::TableCell(cell) => Ok(cell),
            other => Err(other.misplaced(parent)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LinkOptions {
    link: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AnchorOptions {
    anchor: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BookmarkOptions {
    id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MathOptions {
    text: String,
}

/// Converts node trees into document graphs.
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    feat: TransformFeat,
}

impl Transformer {
    /// Creates a transformer with the given features.
    pub fn new(feat: TransformFeat) -> Self {
        Self { feat }
    }

    /// Transforms the container root into a document.
    pub fn transform_root(&self, root: Option<&Node>) -> Result<Document> {
        match root {
            Some(node) if node.kind == NodeKind::Document => self.transform_document(node),
            _ => Err(Error::structural("No Document element found at root")),
        }
    }

    /// Transforms a single node and its subtree.
    pub fn transform_node(&self, node: &Node) -> Result<DocxObject> {
        Ok(match node.kind {
            NodeKind::Document => DocxObject::Document(self.transform_document(node)?),
            NodeKind::Section => DocxObject::Section(self.transform_section(node)?),
            NodeKind::Paragraph => DocxObject::Paragraph(Paragraph {
                options: options::<ParagraphOptions>(node)?,
                children: self.inline_children(node)?,
            }),
            NodeKind::Table => DocxObject::Table(Table {
                options: options::<TableOptions>(node)?,
                rows: self.children(node, DocxObject::into_row)?,
            }),
            NodeKind::TableRow => DocxObject::TableRow(TableRow {
                options: options::<TableRowOptions>(node)?,
                children: self.children(node, DocxObject::into_cell)?,
            }),
            NodeKind::TableCell => DocxObject::TableCell(TableCell {
                options: options::<TableCellOptions>(node)?,
                children: self.children(node, DocxObject::into_block)?,
            }),
            NodeKind::TextRun => {
                let mut run = options::<RunOptions>(node)?;
                if let Some(text) = self.run_text(node)? {
                    run.text = Some(text);
                }
                DocxObject::Inline(Inline::Run(run))
            }
            NodeKind::Tab => {
                self.leaf(node)?;
                DocxObject::Inline(Inline::Tab)
            }
            NodeKind::ImageRun => {
                self.leaf(node)?;
                DocxObject::Inline(Inline::Image(options::<ImageOptions>(node)?))
            }
            NodeKind::PageBreak => {
                self.leaf(node)?;
                DocxObject::PageBreak
            }
            NodeKind::SymbolRun => {
                self.leaf(node)?;
                let symbol = options::<SymbolOptions>(node)?;
                if symbol.character().is_none() {
                    return Err(Error::invalid_properties(
                        "SymbolRun",
                        format!("`char` must be a hex code point, got {:?}", symbol.code),
                    ));
                }
                DocxObject::Inline(Inline::Symbol(symbol))
            }
            NodeKind::Break => {
                self.leaf(node)?;
                DocxObject::Inline(Inline::Run(RunOptions::line_break()))
            }
            NodeKind::ExternalHyperlink => DocxObject::Inline(Inline::ExternalHyperlink {
                link: options::<LinkOptions>(node)?.link,
                children: self.inline_children(node)?,
            }),
            NodeKind::InternalHyperlink => DocxObject::Inline(Inline::InternalHyperlink {
                anchor: options::<AnchorOptions>(node)?.anchor,
                children: self.inline_children(node)?,
            }),
            NodeKind::Bookmark => DocxObject::Inline(Inline::Bookmark {
                id: options::<BookmarkOptions>(node)?.id,
                children: self.inline_children(node)?,
            }),
            NodeKind::Math => DocxObject::Inline(Inline::Math {
                text: options::<MathOptions>(node)?.text,
                children: self.inline_children(node)?,
            }),
        })
    }

    fn transform_document(&self, node: &Node) -> Result<Document> {
        let properties = options::<DocumentOptions>(node)?;
        let sections = node
            .children
            .iter()
            .map(|child| match child.kind {
                NodeKind::Section => self.transform_section(child),
                kind => Err(Error::structural(format!(
                    "Document children must be Section nodes, got: {kind}"
                ))),
            })
            .collect::<Result<_>>()?;

        Ok(Document {
            properties,
            sections,
        })
    }

    fn transform_section(&self, node: &Node) -> Result<Section> {
        Ok(Section {
            properties: options::<SectionOptions>(node)?,
            children: self.children(node, DocxObject::into_block)?,
        })
    }

    fn inline_children(&self, node: &Node) -> Result<Vec<Inline>> {
        self.children(node, DocxObject::into_inline)
    }

    fn children<T>(
        &self,
        node: &Node,
        fit: impl Fn(DocxObject, NodeKind) -> Result<T>,
    ) -> Result<Vec<T>> {
        node.children
            .iter()
            .map(|child| fit(self.transform_node(child)?, node.kind))
            .collect()
    }

    /// Leaf kinds map to objects without a child slot.
    fn leaf(&self, node: &Node) -> Result<()> {
        self.drop_children(node.kind, node.children.len())
    }

    fn drop_children(&self, kind: NodeKind, count: usize) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        if self.feat.strict_leaf_children {
            return Err(Error::structural(format!("{kind} cannot have children")));
        }
        warn!("dropping {count} children of {kind} node");
        Ok(())
    }

    /// Collects the literal text of a run.
    ///
    /// The `text` property comes first, then string `children` properties,
    /// then bare text children. Any other child is treated as a leaf child.
    fn run_text(&self, node: &Node) -> Result<Option<String>> {
        let mut text = node.text_content().map(str::to_owned);
        let mut push = |chunk: &str| text.get_or_insert_with(String::new).push_str(chunk);

        match node.prop(CHILDREN_PROP) {
            Some(Value::String(chunk)) => push(chunk),
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).for_each(&mut push),
            _ => {}
        }

        let mut others = 0;
        for child in &node.children {
            match literal_text(child) {
                Some(chunk) => push(chunk),
                None => others += 1,
            }
        }
        self.drop_children(node.kind, others)?;

        Ok(text)
    }
}

/// The text of a bare text child: a childless `TextRun` carrying only `text`.
fn literal_text(node: &Node) -> Option<&str> {
    let bare = node.kind == NodeKind::TextRun
        && node.children.is_empty()
        && node.properties.len() == 1;
    bare.then(|| node.text_content()).flatten()
}

/// Deserializes the property bag of `node` into an option struct.
fn options<T: DeserializeOwned + Default>(node: &Node) -> Result<T> {
    if node.properties.is_empty() {
        return Ok(T::default());
    }
    serde_json::from_value(Value::Object(node.properties.clone()))
        .map_err(|err| Error::invalid_properties(node.kind.tag(), err))
}
