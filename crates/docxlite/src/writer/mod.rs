//! Writer implementations for different output formats

#[cfg(feature = "docx")]
pub mod docx;
pub mod html;

#[cfg(feature = "docx")]
pub use self::docx::DocxWriter;
pub use html::HtmlWriter;

use ecow::EcoString;

use crate::Result;
use crate::TransformFeat;
use crate::model::Document;

/// Output formats a document graph can be written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// An Office Open XML package.
    #[cfg(feature = "docx")]
    Docx,
    /// A standalone HTML preview.
    Html,
}

/// A writer that serializes a document graph.
pub trait FormatWriter {
    /// Writes the document as bytes.
    fn write_vec(&mut self, document: &Document) -> Result<Vec<u8>>;
    /// Writes the document as text.
    fn write_eco(&mut self, document: &Document, output: &mut EcoString) -> Result<()>;
}

/// Create a writer instance based on the specified format
pub fn create_writer(format: Format, feat: &TransformFeat) -> Box<dyn FormatWriter> {
    match format {
        #[cfg(feature = "docx")]
        Format::Docx => Box::new(docx::DocxWriter::new()),
        Format::Html => Box::new(html::HtmlWriter::new().with_title(feat.preview_title.clone())),
    }
}
