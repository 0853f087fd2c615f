//! Typed factories for document elements.
//!
//! ```
//! use docx_tree::components::*;
//!
//! let doc = document()
//!     .prop("title", "Report")
//!     .child(section().child(paragraph().child(text_run("Hello"))))
//!     .build();
//! # let _ = doc;
//! ```

use ecow::EcoString;
use serde_json::Value;

use crate::element::{Element, HostElement};
use crate::node::{NodeKind, Props, TEXT_PROP};

/// A fluent builder for a host element of a fixed kind.
#[derive(Debug, Clone)]
pub struct ElementBuilder {
    kind: NodeKind,
    key: Option<EcoString>,
    props: Props,
    children: Vec<Element>,
}

impl ElementBuilder {
    /// Starts an element of `kind`.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            key: None,
            props: Props::new(),
            children: Vec::new(),
        }
    }

    /// Sets a property.
    pub fn prop(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    /// Merges a property bag, overriding existing keys.
    pub fn props(mut self, props: Props) -> Self {
        self.props.extend(props);
        self
    }

    /// Sets the sibling identity.
    pub fn key(mut self, key: impl Into<EcoString>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Appends a child element.
    pub fn child(mut self, child: impl Into<Element>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Appends several child elements.
    pub fn children<E: Into<Element>>(mut self, children: impl IntoIterator<Item = E>) -> Self {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Appends a bare text child.
    pub fn text(self, text: impl Into<EcoString>) -> Self {
        self.child(Element::text(text))
    }

    /// Finishes the element.
    pub fn build(self) -> Element {
        Element::Host(HostElement {
            tag: self.kind.tag().into(),
            key: self.key,
            props: self.props,
            children: self.children,
        })
    }
}

impl From<ElementBuilder> for Element {
    fn from(builder: ElementBuilder) -> Self {
        builder.build()
    }
}

/// The root of a document.
pub fn document() -> ElementBuilder {
    ElementBuilder::new(NodeKind::Document)
}

/// A page-layout region.
pub fn section() -> ElementBuilder {
    ElementBuilder::new(NodeKind::Section)
}

/// A paragraph.
pub fn paragraph() -> ElementBuilder {
    ElementBuilder::new(NodeKind::Paragraph)
}

/// A run of text.
pub fn text_run(text: impl Into<String>) -> ElementBuilder {
    ElementBuilder::new(NodeKind::TextRun).prop(TEXT_PROP, Value::String(text.into()))
}

/// A table.
pub fn table() -> ElementBuilder {
    ElementBuilder::new(NodeKind::Table)
}

/// A table row.
pub fn table_row() -> ElementBuilder {
    ElementBuilder::new(NodeKind::TableRow)
}

/// A table cell.
pub fn table_cell() -> ElementBuilder {
    ElementBuilder::new(NodeKind::TableCell)
}

/// A tab stop.
pub fn tab() -> ElementBuilder {
    ElementBuilder::new(NodeKind::Tab)
}

/// An image from base64 data.
pub fn image_run(data: impl Into<String>) -> ElementBuilder {
    ElementBuilder::new(NodeKind::ImageRun).prop("data", Value::String(data.into()))
}

/// A link to an external URL.
pub fn external_hyperlink(link: impl Into<String>) -> ElementBuilder {
    ElementBuilder::new(NodeKind::ExternalHyperlink).prop("link", Value::String(link.into()))
}

/// A link to a bookmark.
pub fn internal_hyperlink(anchor: impl Into<String>) -> ElementBuilder {
    ElementBuilder::new(NodeKind::InternalHyperlink).prop("anchor", Value::String(anchor.into()))
}

/// A page break.
pub fn page_break() -> ElementBuilder {
    ElementBuilder::new(NodeKind::PageBreak)
}

/// A bookmark named `id`.
pub fn bookmark(id: impl Into<String>) -> ElementBuilder {
    ElementBuilder::new(NodeKind::Bookmark).prop("id", Value::String(id.into()))
}

/// A symbol-font character given as a hex code point, e.g. `"F071"`.
pub fn symbol_run(code: impl Into<String>) -> ElementBuilder {
    ElementBuilder::new(NodeKind::SymbolRun).prop("char", Value::String(code.into()))
}

/// An inline formula.
pub fn math(text: impl Into<String>) -> ElementBuilder {
    ElementBuilder::new(NodeKind::Math).prop(TEXT_PROP, Value::String(text.into()))
}

/// A line break.
pub fn line_break() -> ElementBuilder {
    ElementBuilder::new(NodeKind::Break)
}

/// Wraps a render function as a named component.
pub fn component(name: impl Into<EcoString>, render: impl Fn() -> Element + 'static) -> Element {
    Element::component(name, render)
}
