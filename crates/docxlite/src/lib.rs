//! # Docxlite
//!
//! Renders declarative element trees into editable Word documents.
//!
//! The pipeline runs in three stages: the element tree is reconciled into a
//! mutable node tree ([`docx_tree::build_tree`]), the node tree is transformed
//! into a typed document graph ([`transform::Transformer`]), and the graph is
//! packed by a [`writer::FormatWriter`].
//!
//! ```
//! use docx_tree::components::{document, paragraph, section, text_run};
//!
//! let tree = document()
//!     .child(section().child(paragraph().child(text_run("Hello"))))
//!     .build();
//! let doc = docxlite::render_to_docx(tree).unwrap();
//! assert_eq!(doc.sections.len(), 1);
//! ```

mod error;
pub mod model;
pub mod transform;
pub mod writer;

pub use error::{Error, ErrorKind};

use bytes::Bytes;
use docx_tree::Element;
use ecow::EcoString;
use log::debug;

use crate::model::Document;
use crate::transform::Transformer;
use crate::writer::{Format, create_writer};

/// The result type for docxlite.
pub type Result<T, Err = Error> = std::result::Result<T, Err>;

pub use docx_tree;

/// The MIME type of a DOCX package.
pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Feature flags of a render.
#[derive(Debug, Default, Clone)]
pub struct TransformFeat {
    /// Fail on leaf nodes that carry children instead of dropping them.
    pub strict_leaf_children: bool,
    /// The title of the HTML preview. Defaults to the document title.
    pub preview_title: Option<String>,
}

/// A packed document tagged with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    /// The MIME type of `data`.
    pub mime_type: &'static str,
    /// The packed bytes.
    pub data: Bytes,
}

impl Blob {
    /// The size of the packed data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Renders element trees with a configurable feature set.
#[derive(Debug, Default, Clone)]
pub struct DocxRenderer {
    feat: TransformFeat,
}

impl DocxRenderer {
    /// Creates a renderer with default features.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the feature set.
    pub fn with_feature(mut self, feat: TransformFeat) -> Self {
        self.feat = feat;
        self
    }

    /// Builds the document graph of an element tree.
    pub fn render_to_docx(&self, element: Element) -> Result<Document> {
        let root = docx_tree::build_tree(element)?;
        debug!("docxlite: tree built, root present: {}", root.is_some());

        let document = Transformer::new(self.feat.clone()).transform_root(root.as_ref())?;
        debug!(
            "docxlite: transformed document with {} section(s)",
            document.sections.len()
        );
        Ok(document)
    }

    /// Renders the element tree as a DOCX package.
    #[cfg(feature = "docx")]
    pub fn render_to_buffer(&self, element: Element) -> Result<Vec<u8>> {
        let document = self.render_to_docx(element)?;
        let buffer = create_writer(Format::Docx, &self.feat).write_vec(&document)?;
        debug!("docxlite: packed {} bytes", buffer.len());
        Ok(buffer)
    }

    /// Renders the element tree as a DOCX blob.
    #[cfg(feature = "docx")]
    pub fn render_to_blob(&self, element: Element) -> Result<Blob> {
        Ok(Blob {
            mime_type: DOCX_MIME_TYPE,
            data: Bytes::from(self.render_to_buffer(element)?),
        })
    }

    /// Renders the element tree as a base64-encoded DOCX package.
    #[cfg(feature = "docx")]
    pub fn render_to_base64(&self, element: Element) -> Result<String> {
        use base64::Engine;

        let buffer = self.render_to_buffer(element)?;
        Ok(base64::engine::general_purpose::STANDARD.encode(buffer))
    }

    /// Renders the element tree as a standalone HTML preview.
    pub fn render_to_html(&self, element: Element) -> Result<EcoString> {
        let document = self.render_to_docx(element)?;
        let mut output = EcoString::new();
        create_writer(Format::Html, &self.feat).write_eco(&document, &mut output)?;
        Ok(output)
    }
}

/// Builds the document graph of an element tree.
pub fn render_to_docx(element: Element) -> Result<Document> {
    DocxRenderer::new().render_to_docx(element)
}

/// Renders the element tree as a DOCX package.
#[cfg(feature = "docx")]
pub fn render_to_buffer(element: Element) -> Result<Vec<u8>> {
    DocxRenderer::new().render_to_buffer(element)
}

/// Renders the element tree as a DOCX blob.
#[cfg(feature = "docx")]
pub fn render_to_blob(element: Element) -> Result<Blob> {
    DocxRenderer::new().render_to_blob(element)
}

/// Renders the element tree as a base64-encoded DOCX package.
#[cfg(feature = "docx")]
pub fn render_to_base64(element: Element) -> Result<String> {
    DocxRenderer::new().render_to_base64(element)
}

/// Renders the element tree as a standalone HTML preview.
pub fn render_to_html(element: Element) -> Result<EcoString> {
    DocxRenderer::new().render_to_html(element)
}

/// Alias of [`render_to_buffer`].
#[cfg(feature = "docx")]
pub fn render(element: Element) -> Result<Vec<u8>> {
    render_to_buffer(element)
}
