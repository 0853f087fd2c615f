//! Paragraph and character styles referenced by the writer

use docx_rs::{Docx, Style, StyleType};

use crate::model::HeadingLevel;

/// Heading styles with their display names and sizes in half-points.
const HEADINGS: [(HeadingLevel, &str, usize); 7] = [
    (HeadingLevel::Title, "Title", 56),
    (HeadingLevel::Heading1, "Heading 1", 32),
    (HeadingLevel::Heading2, "Heading 2", 28),
    (HeadingLevel::Heading3, "Heading 3", 26),
    (HeadingLevel::Heading4, "Heading 4", 24),
    (HeadingLevel::Heading5, "Heading 5", 22),
    (HeadingLevel::Heading6, "Heading 6", 20),
];

/// Registers the styles paragraphs and links refer to by id.
#[derive(Clone, Debug, Default)]
pub struct DocxStyles;

impl DocxStyles {
    /// Creates the style registry.
    pub fn new() -> Self {
        Self
    }

    fn heading(level: HeadingLevel, display_name: &str, size: usize) -> Style {
        Style::new(level.style_id(), StyleType::Paragraph)
            .name(display_name)
            .size(size)
            .bold()
    }

    /// Adds the heading styles and the `Hyperlink` character style.
    pub fn initialize_styles(&self, docx: Docx) -> Docx {
        let docx = HEADINGS
            .into_iter()
            .fold(docx, |docx, (level, name, size)| {
                docx.add_style(Self::heading(level, name, size))
            });

        docx.add_style(
            Style::new("Hyperlink", StyleType::Character)
                .name("Hyperlink")
                .color("0563C1")
                .underline("single"),
        )
    }
}
