//! The typed document object graph.
//!
//! Each type mirrors the construction contract of one packager object. Option
//! structs are deserialized from node property bags: keys are camelCase and
//! unknown keys are ignored.

use serde::Deserialize;

/// A whole document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// Document-level properties.
    pub properties: DocumentOptions,
    /// Sections in order.
    pub sections: Vec<Section>,
}

/// Document-level properties.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentOptions {
    /// Document title.
    pub title: Option<String>,
    /// Author name.
    pub creator: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Subject line.
    pub subject: Option<String>,
    /// Comma-separated keywords.
    pub keywords: Option<String>,
    /// Name of the last editor.
    pub last_modified_by: Option<String>,
}

/// A page-layout region.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    /// Layout options.
    pub properties: SectionOptions,
    /// Block content.
    pub children: Vec<Block>,
}

/// The property bag of a section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionOptions {
    /// Layout properties.
    pub properties: SectionProperties,
}

/// Section layout properties.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionProperties {
    /// Page size and margins.
    pub page: PageOptions,
}

/// Page setup of a section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageOptions {
    /// Page dimensions.
    pub size: Option<PageSize>,
    /// Page margins.
    pub margin: Option<PageMargin>,
}

/// Page size in twips.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageSize {
    /// Page width.
    pub width: Option<u32>,
    /// Page height.
    pub height: Option<u32>,
    /// Swaps the dimensions when landscape.
    pub orientation: Option<Orientation>,
}

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Taller than wide.
    Portrait,
    /// Wider than tall.
    Landscape,
}

/// Page margins in twips.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageMargin {
    /// Top margin.
    pub top: Option<i32>,
    /// Right margin.
    pub right: Option<i32>,
    /// Bottom margin.
    pub bottom: Option<i32>,
    /// Left margin.
    pub left: Option<i32>,
    /// Distance of the header from the page edge.
    pub header: Option<i32>,
    /// Distance of the footer from the page edge.
    pub footer: Option<i32>,
}

/// Content that can sit directly in a section or a table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// A paragraph.
    Paragraph(Paragraph),
    /// A table.
    Table(Table),
    /// A forced page break between blocks.
    PageBreak,
}

/// A paragraph of inline content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    /// Paragraph formatting.
    pub options: ParagraphOptions,
    /// Inline content in order.
    pub children: Vec<Inline>,
}

/// Paragraph formatting.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParagraphOptions {
    /// Horizontal alignment.
    pub alignment: Option<Alignment>,
    /// Spacing around and between lines.
    pub spacing: Option<Spacing>,
    /// Indentation.
    pub indent: Option<Indent>,
    /// Heading style; overrides `style`.
    pub heading: Option<HeadingLevel>,
    /// Paragraph style id.
    pub style: Option<String>,
    /// Starts the paragraph on a new page.
    pub page_break_before: bool,
    /// Keeps the paragraph on the page of the next one.
    pub keep_next: bool,
    /// Keeps the lines of the paragraph together.
    pub keep_lines: bool,
    /// Paragraph borders.
    pub border: Option<ParagraphBorders>,
}

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Aligned left.
    Left,
    /// Same as `Left` in left-to-right text.
    Start,
    /// Centered.
    Center,
    /// Aligned right.
    Right,
    /// Same as `Right` in left-to-right text.
    End,
    /// Justified, as Word names it.
    Both,
    /// Justified.
    Justified,
    /// Justified with distributed characters.
    Distribute,
}

/// Heading styles, named as the packager names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum HeadingLevel {
    /// Document title.
    Title,
    /// Heading level 1.
    Heading1,
    /// Heading level 2.
    Heading2,
    /// Heading level 3.
    Heading3,
    /// Heading level 4.
    Heading4,
    /// Heading level 5.
    Heading5,
    /// Heading level 6.
    Heading6,
}

impl HeadingLevel {
    /// The paragraph style id.
    pub fn style_id(self) -> &'static str {
        match self {
            HeadingLevel::Title => "Title",
            HeadingLevel::Heading1 => "Heading1",
            HeadingLevel::Heading2 => "Heading2",
            HeadingLevel::Heading3 => "Heading3",
            HeadingLevel::Heading4 => "Heading4",
            HeadingLevel::Heading5 => "Heading5",
            HeadingLevel::Heading6 => "Heading6",
        }
    }

    /// The matching HTML element.
    pub fn html_tag(self) -> &'static str {
        match self {
            HeadingLevel::Title | HeadingLevel::Heading1 => "h1",
            HeadingLevel::Heading2 => "h2",
            HeadingLevel::Heading3 => "h3",
            HeadingLevel::Heading4 => "h4",
            HeadingLevel::Heading5 => "h5",
            HeadingLevel::Heading6 => "h6",
        }
    }
}

/// Paragraph spacing; `before`/`after` in twips, `line` in 240ths of a line.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Spacing {
    /// Space above in twips.
    pub before: Option<u32>,
    /// Space below in twips.
    pub after: Option<u32>,
    /// Line height in 240ths of a line.
    pub line: Option<u32>,
}

/// Paragraph indentation in twips.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Indent {
    /// Left indentation.
    pub left: Option<i32>,
    /// Right indentation.
    pub right: Option<i32>,
    /// Extra indentation of the first line.
    pub first_line: Option<i32>,
    /// Outdent of the first line.
    pub hanging: Option<i32>,
}

/// Borders around a paragraph.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParagraphBorders {
    /// Top border.
    pub top: Option<BorderOptions>,
    /// Bottom border.
    pub bottom: Option<BorderOptions>,
    /// Left border.
    pub left: Option<BorderOptions>,
    /// Right border.
    pub right: Option<BorderOptions>,
}

/// One paragraph border; `size` in eighths of a point.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BorderOptions {
    /// Line style, e.g. `single`.
    pub style: Option<String>,
    /// Width in eighths of a point.
    pub size: Option<u32>,
    /// Hex color or `auto`.
    pub color: Option<String>,
    /// Gap to the text in points.
    pub space: Option<u32>,
}

/// Inline content of a paragraph.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    /// A run of text.
    Run(RunOptions),
    /// A tab stop.
    Tab,
    /// A page break inside a paragraph.
    PageBreak,
    /// An inline picture.
    Image(ImageOptions),
    /// A symbol-font character.
    Symbol(SymbolOptions),
    /// A link to a URL around runs.
    ExternalHyperlink {
        /// Target URL.
        link: String,
        /// Linked content.
        children: Vec<Inline>,
    },
    /// A link to a bookmark around runs.
    InternalHyperlink {
        /// Target bookmark id.
        anchor: String,
        /// Linked content.
        children: Vec<Inline>,
    },
    /// A named anchor around runs.
    Bookmark {
        /// Bookmark id.
        id: String,
        /// Bookmarked content.
        children: Vec<Inline>,
    },
    /// An inline formula.
    Math {
        /// Formula source.
        text: String,
        /// Nested formula parts.
        children: Vec<Inline>,
    },
}

/// Formatting and content of a text run.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunOptions {
    /// The text of the run.
    pub text: Option<String>,
    /// Bold weight.
    pub bold: bool,
    /// Italic style.
    pub italics: bool,
    /// Underline, if any.
    pub underline: Option<Underline>,
    /// Single strikethrough.
    pub strike: bool,
    /// Double strikethrough.
    pub double_strike: bool,
    /// Hex color, with or without `#`.
    pub color: Option<String>,
    /// Font size in half-points.
    pub size: Option<u32>,
    /// Font family.
    pub font: Option<String>,
    /// Highlight color name.
    pub highlight: Option<String>,
    /// Character style id.
    pub style: Option<String>,
    /// Renders the text in capitals.
    pub all_caps: bool,
    /// Renders lowercase letters as small capitals.
    pub small_caps: bool,
    /// Superscript.
    pub superscript: bool,
    /// Subscript.
    pub subscript: bool,
    /// Number of line breaks emitted before the text.
    #[serde(rename = "break")]
    pub break_count: Option<u32>,
}

impl RunOptions {
    /// A run holding only `text`.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// A run holding only a line break.
    pub fn line_break() -> Self {
        Self {
            break_count: Some(1),
            ..Self::default()
        }
    }
}

/// Underline as a flag or a styled description.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Underline {
    /// `true` for a single underline.
    Enabled(bool),
    /// An underline with a style and color.
    Styled {
        /// Underline style, `single` when absent.
        #[serde(rename = "type", default)]
        kind: Option<String>,
        /// Underline hex color.
        #[serde(default)]
        color: Option<String>,
    },
}

impl Underline {
    /// The underline style, or `None` when disabled.
    pub fn kind(&self) -> Option<&str> {
        match self {
            Underline::Enabled(false) => None,
            Underline::Enabled(true) => Some("single"),
            Underline::Styled { kind, .. } => Some(kind.as_deref().unwrap_or("single")),
        }
    }

    /// The underline color, if any.
    pub fn color(&self) -> Option<&str> {
        match self {
            Underline::Styled { color, .. } => color.as_deref(),
            Underline::Enabled(_) => None,
        }
    }
}

/// An inline picture.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageOptions {
    /// Base64 data, optionally as a data URL.
    pub data: String,
    /// Display size in pixels.
    pub transformation: Option<ImageTransformation>,
    /// Accessible description.
    pub alt_text: Option<AltText>,
}

/// Display size of an image.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageTransformation {
    /// Display width.
    pub width: f64,
    /// Display height.
    pub height: f64,
}

/// Accessible description of an image.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AltText {
    /// A plain description.
    Plain(String),
    /// A structured description.
    Detailed {
        /// Short title.
        #[serde(default)]
        title: Option<String>,
        /// Long description.
        #[serde(default)]
        description: Option<String>,
        /// Object name.
        #[serde(default)]
        name: Option<String>,
    },
}

impl AltText {
    /// The most descriptive text available.
    pub fn text(&self) -> Option<&str> {
        match self {
            AltText::Plain(text) => Some(text),
            AltText::Detailed {
                title,
                description,
                name,
            } => description
                .as_deref()
                .or(title.as_deref())
                .or(name.as_deref()),
        }
    }
}

/// A character from a symbol font.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SymbolOptions {
    /// Hex code point, e.g. `"F071"`.
    #[serde(rename = "char")]
    pub code: String,
    /// Symbol font; defaults to [`DEFAULT_SYMBOL_FONT`].
    #[serde(rename = "symbolfont")]
    pub symbol_font: Option<String>,
    /// Run formatting.
    #[serde(flatten)]
    pub run: RunOptions,
}

/// The font symbol runs use when none is given.
pub const DEFAULT_SYMBOL_FONT: &str = "Wingdings";

impl SymbolOptions {
    /// The symbol font in effect.
    pub fn font(&self) -> &str {
        self.symbol_font.as_deref().unwrap_or(DEFAULT_SYMBOL_FONT)
    }

    /// Decodes the code point, or `None` when it is not valid hex.
    pub fn character(&self) -> Option<char> {
        u32::from_str_radix(self.code.trim_start_matches("0x"), 16)
            .ok()
            .and_then(char::from_u32)
    }
}

/// A table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Table formatting.
    pub options: TableOptions,
    /// Rows in order.
    pub rows: Vec<TableRow>,
}

/// Table formatting.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableOptions {
    /// Grid column widths in twips.
    pub column_widths: Vec<u32>,
    /// Preferred table width.
    pub width: Option<TableWidth>,
    /// Table style id.
    pub style: Option<String>,
}

/// A width with its unit.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableWidth {
    /// Width in `kind` units.
    pub size: u32,
    /// Unit of `size`, twips when absent.
    #[serde(rename = "type")]
    pub kind: Option<WidthKind>,
}

/// Unit of a table width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidthKind {
    /// Sized to content.
    Auto,
    /// Twips.
    Dxa,
    /// Zero width.
    Nil,
    /// Percent of the available width.
    Pct,
}

/// A table row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRow {
    /// Row formatting.
    pub options: TableRowOptions,
    /// Cells in order.
    pub children: Vec<TableCell>,
}

/// Row formatting.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableRowOptions {
    /// Repeats the row on every page.
    pub table_header: bool,
    /// Minimum or exact row height.
    pub height: Option<RowHeight>,
}

/// Row height with its rule.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RowHeight {
    /// Height in twips.
    pub value: u32,
    /// `atLeast`, `exact` or `auto`.
    pub rule: Option<String>,
}

/// A table cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableCell {
    /// Cell formatting.
    pub options: TableCellOptions,
    /// Block content in order.
    pub children: Vec<Block>,
}

/// Cell formatting.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableCellOptions {
    /// Number of grid columns covered.
    pub column_span: Option<usize>,
    /// Number of rows covered.
    pub row_span: Option<usize>,
    /// Preferred cell width.
    pub width: Option<TableWidth>,
    /// Background shading.
    pub shading: Option<Shading>,
}

/// Cell background shading.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Shading {
    /// Background hex color.
    pub fill: Option<String>,
    /// Pattern hex color.
    pub color: Option<String>,
}
