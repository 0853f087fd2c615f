//! HTML preview writer.
//!
//! Renders the document graph as a standalone page: sections become white
//! pages, paragraphs and runs carry their formatting as inline styles.

use ecow::EcoString;

use crate::Result;
use crate::model::{
    Alignment, Block, Document, ImageOptions, Inline, Paragraph, ParagraphBorders,
    ParagraphOptions, RunOptions, Section, Table, TableCell, TableRow,
};
use crate::writer::FormatWriter;

/// Title used when neither the renderer nor the document provides one.
pub const DEFAULT_TITLE: &str = "Document Preview";

const PAGE_STYLE: &str = "* { margin: 0; padding: 0; box-sizing: border-box; }
body { background-color: #525659; padding: 20px; }
.document { max-width: 850px; margin: 0 auto; }
.section { background: white; padding: 96px; min-height: 1056px; box-shadow: 0 2px 8px rgba(0, 0, 0, 0.1); margin-bottom: 20px; }
p, h1, h2, h3, h4, h5, h6 { margin: 0; }
.page-break { border-top: 1px dashed #999; margin: 12px 0; }
table { border-collapse: collapse; width: 100%; }
table td, table th { border: 1px solid #000; padding: 4pt 8pt; }";

/// Converts packager units and names into CSS.
pub struct StyleConverter;

impl StyleConverter {
    /// Half-points to points.
    pub fn size_to_pt(size: u32) -> String {
        format!("{}pt", f64::from(size) / 2.0)
    }

    /// Twips to points.
    pub fn twips_to_pt(twips: i64) -> String {
        format!("{}pt", twips as f64 / 20.0)
    }

    /// Hex colors gain a `#` prefix.
    pub fn color(color: &str) -> String {
        if color.starts_with('#') {
            color.to_owned()
        } else {
            format!("#{color}")
        }
    }

    /// CSS `text-align` value.
    pub fn alignment(alignment: Alignment) -> &'static str {
        match alignment {
            Alignment::Left | Alignment::Start => "left",
            Alignment::Center => "center",
            Alignment::Right | Alignment::End => "right",
            Alignment::Both | Alignment::Justified | Alignment::Distribute => "justify",
        }
    }

    /// Inline styles of a text run, defaults included.
    pub fn text_run_styles(run: &RunOptions) -> String {
        let mut styles = vec![
            format!("font-family: '{}'", run.font.as_deref().unwrap_or("Calibri")),
            format!(
                "font-size: {}",
                run.size.map_or_else(|| "11pt".to_owned(), Self::size_to_pt)
            ),
            format!(
                "color: {}",
                run.color.as_deref().map_or_else(|| "#000000".to_owned(), Self::color)
            ),
        ];

        if run.bold {
            styles.push("font-weight: bold".into());
        }
        if run.italics {
            styles.push("font-style: italic".into());
        }
        let underline = run.underline.as_ref().and_then(|u| u.kind()).is_some();
        let strike = run.strike || run.double_strike;
        match (underline, strike) {
            (true, true) => styles.push("text-decoration: underline line-through".into()),
            (true, false) => styles.push("text-decoration: underline".into()),
            (false, true) => styles.push("text-decoration: line-through".into()),
            (false, false) => {}
        }
        if let Some(highlight) = &run.highlight {
            styles.push(format!("background-color: {highlight}"));
        }
        if run.all_caps {
            styles.push("text-transform: uppercase".into());
        }
        if run.small_caps {
            styles.push("font-variant: small-caps".into());
        }
        if run.superscript {
            styles.push("vertical-align: super".into());
        } else if run.subscript {
            styles.push("vertical-align: sub".into());
        }

        styles.join("; ")
    }

    /// Inline styles of a paragraph; empty when nothing is set.
    pub fn paragraph_styles(options: &ParagraphOptions) -> String {
        let mut styles = Vec::new();

        if let Some(alignment) = options.alignment {
            styles.push(format!("text-align: {}", Self::alignment(alignment)));
        }
        if let Some(spacing) = &options.spacing {
            if let Some(before) = spacing.before {
                styles.push(format!("margin-top: {}", Self::twips_to_pt(before.into())));
            }
            if let Some(after) = spacing.after {
                styles.push(format!("margin-bottom: {}", Self::twips_to_pt(after.into())));
            }
            if let Some(line) = spacing.line {
                styles.push(format!("line-height: {}", f64::from(line) / 240.0));
            }
        }
        if let Some(indent) = &options.indent {
            if let Some(left) = indent.left {
                styles.push(format!("margin-left: {}", Self::twips_to_pt(left.into())));
            }
            if let Some(right) = indent.right {
                styles.push(format!("margin-right: {}", Self::twips_to_pt(right.into())));
            }
            if let Some(first_line) = indent.first_line {
                styles.push(format!("text-indent: {}", Self::twips_to_pt(first_line.into())));
            } else if let Some(hanging) = indent.hanging {
                styles.push(format!("text-indent: {}", Self::twips_to_pt(-i64::from(hanging))));
            }
        }
        if let Some(border) = &options.border {
            Self::border_styles(border, &mut styles);
        }
        if options.page_break_before {
            styles.push("break-before: page".into());
        }

        styles.join("; ")
    }

    fn border_styles(border: &ParagraphBorders, styles: &mut Vec<String>) {
        let sides = [
            ("left", &border.left),
            ("right", &border.right),
            ("top", &border.top),
            ("bottom", &border.bottom),
        ];
        for (side, options) in sides {
            if let Some(options) = options {
                let color = match options.color.as_deref() {
                    Some(color) if color != "auto" => Self::color(color),
                    _ => "#000000".to_owned(),
                };
                styles.push(format!("border-{side}: 1px solid {color}"));
            }
        }
    }
}

/// Guesses the MIME type of base64 image data from its first bytes.
fn image_source(data: &str) -> String {
    if data.starts_with("data:") {
        return data.to_owned();
    }
    let mime = if data.starts_with("/9j/") {
        "image/jpeg"
    } else if data.starts_with("R0lGOD") {
        "image/gif"
    } else if data.starts_with("UklGR") {
        "image/webp"
    } else {
        "image/png"
    };
    format!("data:{mime};base64,{data}")
}

/// A writer producing a standalone HTML preview.
#[derive(Debug, Default)]
pub struct HtmlWriter {
    title: Option<String>,
    buffer: EcoString,
    tag_opened: bool,
}

impl HtmlWriter {
    /// Creates a writer using the document title.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the page title.
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    /// Consumes the writer and returns the generated HTML string.
    pub fn into_string(mut self) -> EcoString {
        self.ensure_tag_closed();
        self.buffer
    }

    // --- Low-level HTML writing primitives ---

    fn ensure_tag_closed(&mut self) {
        if self.tag_opened {
            self.buffer.push('>');
            self.tag_opened = false;
        }
    }

    fn start_tag(&mut self, tag_name: &str) {
        self.ensure_tag_closed();
        self.buffer.push('<');
        self.buffer.push_str(tag_name);
        self.tag_opened = true;
    }

    fn attribute(&mut self, key: &str, value: &str) {
        debug_assert!(self.tag_opened, "attribute written outside of a tag");
        self.buffer.push(' ');
        self.buffer.push_str(key);
        self.buffer.push_str("=\"");
        self.buffer
            .push_str(&html_escape::encode_double_quoted_attribute(value));
        self.buffer.push('"');
    }

    fn style_attribute(&mut self, style: &str) {
        if !style.is_empty() {
            self.attribute("style", style);
        }
    }

    fn end_tag(&mut self, tag_name: &str) {
        self.ensure_tag_closed();
        self.buffer.push_str("</");
        self.buffer.push_str(tag_name);
        self.buffer.push('>');
    }

    fn void_tag(&mut self, tag_name: &str) {
        self.start_tag(tag_name);
        self.ensure_tag_closed();
    }

    fn text(&mut self, text: &str) {
        self.ensure_tag_closed();
        self.buffer.push_str(&html_escape::encode_text(text));
    }

    fn raw_html(&mut self, html: &str) {
        self.ensure_tag_closed();
        self.buffer.push_str(html);
    }

    // --- Document structure ---

    fn write_document(&mut self, doc: &Document) {
        let title = self
            .title
            .clone()
            .or_else(|| doc.properties.title.clone())
            .unwrap_or_else(|| DEFAULT_TITLE.to_owned());

        self.raw_html("<!DOCTYPE html>\n");
        self.start_tag("html");
        self.attribute("lang", "en");
        self.raw_html("\n<head>\n");
        self.start_tag("meta");
        self.attribute("charset", "UTF-8");
        self.ensure_tag_closed();
        self.raw_html("\n");
        self.start_tag("meta");
        self.attribute("name", "viewport");
        self.attribute("content", "width=device-width, initial-scale=1.0");
        self.ensure_tag_closed();
        self.raw_html("\n<title>");
        self.text(&title);
        self.raw_html("</title>\n<style>\n");
        self.raw_html(PAGE_STYLE);
        self.raw_html("\n</style>\n</head>\n<body>\n");

        self.start_tag("div");
        self.attribute("class", "document");
        self.ensure_tag_closed();
        for section in &doc.sections {
            self.raw_html("\n");
            self.write_section(section);
        }
        self.raw_html("\n");
        self.end_tag("div");
        self.raw_html("\n</body>\n</html>\n");
    }

    fn write_section(&mut self, section: &Section) {
        self.start_tag("div");
        self.attribute("class", "section");
        for block in &section.children {
            self.write_block(block);
        }
        self.end_tag("div");
    }

    fn write_block(&mut self, block: &Block) {
        match block {
            Block::Paragraph(para) => self.write_paragraph(para),
            Block::Table(table) => self.write_table(table),
            Block::PageBreak => {
                self.start_tag("div");
                self.attribute("class", "page-break");
                self.end_tag("div");
            }
        }
    }

    fn write_paragraph(&mut self, para: &Paragraph) {
        let tag = para.options.heading.map_or("p", |heading| heading.html_tag());
        self.start_tag(tag);
        self.style_attribute(&StyleConverter::paragraph_styles(&para.options));
        for inline in &para.children {
            self.write_inline(inline);
        }
        self.end_tag(tag);
    }

    fn write_inline(&mut self, inline: &Inline) {
        match inline {
            Inline::Run(run) => self.write_run(run),
            Inline::Tab => self.raw_html("&nbsp;&nbsp;&nbsp;&nbsp;"),
            Inline::PageBreak => {
                self.start_tag("br");
                self.attribute("class", "page-break");
                self.ensure_tag_closed();
            }
            Inline::Image(image) => self.write_image(image),
            Inline::Symbol(symbol) => {
                self.start_tag("span");
                self.attribute("style", &format!("font-family: '{}'", symbol.font()));
                if let Some(ch) = symbol.character() {
                    self.text(ch.encode_utf8(&mut [0; 4]));
                }
                self.end_tag("span");
            }
            Inline::ExternalHyperlink { link, children } => {
                self.start_tag("a");
                self.attribute("href", link);
                children.iter().for_each(|child| self.write_inline(child));
                self.end_tag("a");
            }
            Inline::InternalHyperlink { anchor, children } => {
                self.start_tag("a");
                self.attribute("href", &format!("#{anchor}"));
                children.iter().for_each(|child| self.write_inline(child));
                self.end_tag("a");
            }
            Inline::Bookmark { id, children } => {
                self.start_tag("span");
                self.attribute("id", id);
                children.iter().for_each(|child| self.write_inline(child));
                self.end_tag("span");
            }
            Inline::Math { text, children } => {
                self.start_tag("span");
                self.attribute("class", "math");
                self.attribute("style", "font-family: 'Cambria Math'");
                self.text(text);
                children.iter().for_each(|child| self.write_inline(child));
                self.end_tag("span");
            }
        }
    }

    fn write_run(&mut self, run: &RunOptions) {
        for _ in 0..run.break_count.unwrap_or(0) {
            self.void_tag("br");
        }
        if let Some(text) = &run.text {
            self.start_tag("span");
            self.attribute("style", &StyleConverter::text_run_styles(run));
            self.text(text);
            self.end_tag("span");
        }
    }

    fn write_image(&mut self, image: &ImageOptions) {
        self.start_tag("img");
        self.attribute("src", &image_source(&image.data));
        if let Some(transformation) = &image.transformation {
            self.attribute("width", &transformation.width.to_string());
            self.attribute("height", &transformation.height.to_string());
        }
        if let Some(alt) = image.alt_text.as_ref().and_then(|alt| alt.text()) {
            self.attribute("alt", alt);
        }
        self.ensure_tag_closed();
    }

    fn write_table(&mut self, table: &Table) {
        self.start_tag("table");
        if !table.options.column_widths.is_empty() {
            self.start_tag("colgroup");
            for width in &table.options.column_widths {
                self.start_tag("col");
                self.attribute(
                    "style",
                    &format!("width: {}", StyleConverter::twips_to_pt((*width).into())),
                );
                self.ensure_tag_closed();
            }
            self.end_tag("colgroup");
        }
        for row in &table.rows {
            self.write_row(row);
        }
        self.end_tag("table");
    }

    fn write_row(&mut self, row: &TableRow) {
        self.start_tag("tr");
        if let Some(height) = &row.options.height {
            self.attribute(
                "style",
                &format!("height: {}", StyleConverter::twips_to_pt(height.value.into())),
            );
        }
        let cell_tag = if row.options.table_header { "th" } else { "td" };
        for cell in &row.children {
            self.write_cell(cell, cell_tag);
        }
        self.end_tag("tr");
    }

    fn write_cell(&mut self, cell: &TableCell, tag: &str) {
        self.start_tag(tag);
        if let Some(span) = cell.options.column_span.filter(|span| *span > 1) {
            self.attribute("colspan", &span.to_string());
        }
        if let Some(span) = cell.options.row_span.filter(|span| *span > 1) {
            self.attribute("rowspan", &span.to_string());
        }
        if let Some(fill) = cell.options.shading.as_ref().and_then(|s| s.fill.as_deref()) {
            self.attribute(
                "style",
                &format!("background-color: {}", StyleConverter::color(fill)),
            );
        }
        for block in &cell.children {
            self.write_block(block);
        }
        self.end_tag(tag);
    }
}

impl FormatWriter for HtmlWriter {
    fn write_vec(&mut self, document: &Document) -> Result<Vec<u8>> {
        let mut output = EcoString::new();
        self.write_eco(document, &mut output)?;
        Ok(output.as_bytes().to_vec())
    }

    fn write_eco(&mut self, document: &Document, output: &mut EcoString) -> Result<()> {
        self.buffer = EcoString::new();
        self.tag_opened = false;
        self.write_document(document);
        self.ensure_tag_closed();
        output.push_str(&self.buffer);
        Ok(())
    }
}
