//! DOCX packaging using docx-rs
//!
//! - Writer: maps the document graph onto docx-rs builders and packs the zip
//! - Styles: heading and hyperlink style registration
//! - Image processor: image validation, sizing and re-encoding

mod image_processor;
mod styles;
mod writer;

pub use writer::DocxWriter;
