//! DOCX document writer implementation

use docx_rs::{
    AlignmentType, BreakType, Docx, Hyperlink, HyperlinkType, LineSpacing, PageMargin,
    Paragraph, Run, RunFonts, SpecialIndentType, Table, TableCell, TableRow, VMergeType,
    WidthType,
};
use ecow::EcoString;
use log::debug;
use std::io::Cursor;

use crate::model::{
    self, Alignment, Block, Inline, Orientation, PageOptions, RunOptions, WidthKind,
};
use crate::writer::FormatWriter;
use crate::{Error, Result};

use super::image_processor::DocxImageProcessor;
use super::styles::DocxStyles;

/// Font used for inline formulas.
const MATH_FONT: &str = "Cambria Math";
/// A4 in twips, used when a page size gives only one dimension.
const DEFAULT_PAGE_WIDTH: u32 = 11906;
const DEFAULT_PAGE_HEIGHT: u32 = 16838;
/// Word's limit on the columns of a table grid.
const MAX_GRID_COLUMNS: usize = 63;

fn fonts(name: &str) -> RunFonts {
    RunFonts::new()
        .ascii(name)
        .hi_ansi(name)
        .east_asia(name)
        .cs(name)
}

fn page_break_run() -> Run {
    Run::new().add_break(BreakType::Page)
}

/// DOCX writer that packs the document graph with docx-rs
pub struct DocxWriter {
    styles: DocxStyles,
    image_processor: DocxImageProcessor,
    next_bookmark_id: usize,
}

impl Default for DocxWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocxWriter {
    /// Creates a writer with the default styles.
    pub fn new() -> Self {
        Self {
            styles: DocxStyles::new(),
            image_processor: DocxImageProcessor::new(),
            next_bookmark_id: 0,
        }
    }

    /// Builds the docx-rs document for `doc`.
    pub fn build(&mut self, doc: &model::Document) -> Result<Docx> {
        self.next_bookmark_id = 0;
        let mut docx = self.styles.initialize_styles(Docx::new());

        for (index, section) in doc.sections.iter().enumerate() {
            let page = &section.properties.properties.page;
            if index == 0 {
                docx = Self::apply_page_setup(docx, page);
            } else {
                if page.size.is_some() || page.margin.is_some() {
                    debug!("docx: page setup of section {index} ignored, the first section's applies");
                }
                docx = docx.add_paragraph(Paragraph::new().add_run(page_break_run()));
            }

            for block in &section.children {
                docx = match block {
                    Block::Paragraph(para) => docx.add_paragraph(self.build_paragraph(para)?),
                    Block::Table(table) => docx.add_table(self.build_table(table)?),
                    Block::PageBreak => docx.add_paragraph(Paragraph::new().add_run(page_break_run())),
                };
            }
        }

        Ok(docx)
    }

    fn apply_page_setup(mut docx: Docx, page: &PageOptions) -> Docx {
        if let Some(size) = &page.size {
            let mut width = size.width.unwrap_or(DEFAULT_PAGE_WIDTH);
            let mut height = size.height.unwrap_or(DEFAULT_PAGE_HEIGHT);
            if size.orientation == Some(Orientation::Landscape) && width < height {
                std::mem::swap(&mut width, &mut height);
            }
            docx = docx.page_size(width, height);
        }

        if let Some(margin) = &page.margin {
            let mut page_margin = PageMargin::new();
            if let Some(top) = margin.top {
                page_margin = page_margin.top(top);
            }
            if let Some(right) = margin.right {
                page_margin = page_margin.right(right);
            }
            if let Some(bottom) = margin.bottom {
                page_margin = page_margin.bottom(bottom);
            }
            if let Some(left) = margin.left {
                page_margin = page_margin.left(left);
            }
            if let Some(header) = margin.header {
                page_margin = page_margin.header(header);
            }
            if let Some(footer) = margin.footer {
                page_margin = page_margin.footer(footer);
            }
            docx = docx.page_margin(page_margin);
        }

        docx
    }

    fn map_alignment(alignment: Alignment) -> AlignmentType {
        match alignment {
            Alignment::Left | Alignment::Start => AlignmentType::Left,
            Alignment::Center => AlignmentType::Center,
            Alignment::Right | Alignment::End => AlignmentType::Right,
            Alignment::Both | Alignment::Justified | Alignment::Distribute => AlignmentType::Both,
        }
    }

    fn build_paragraph(&mut self, para: &model::Paragraph) -> Result<Paragraph> {
        let options = &para.options;
        let mut out = Paragraph::new();

        if let Some(heading) = options.heading {
            out = out.style(heading.style_id());
        } else if let Some(style) = &options.style {
            out = out.style(style);
        }
        if let Some(alignment) = options.alignment {
            out = out.align(Self::map_alignment(alignment));
        }
        if let Some(spacing) = &options.spacing {
            let mut line_spacing = LineSpacing::new();
            if let Some(before) = spacing.before {
                line_spacing = line_spacing.before(before);
            }
            if let Some(after) = spacing.after {
                line_spacing = line_spacing.after(after);
            }
            if let Some(line) = spacing.line {
                line_spacing = line_spacing.line(line as _);
            }
            out = out.line_spacing(line_spacing);
        }
        if let Some(indent) = &options.indent {
            let special = indent
                .first_line
                .map(SpecialIndentType::FirstLine)
                .or(indent.hanging.map(SpecialIndentType::Hanging));
            out = out.indent(indent.left, special, indent.right, None);
        }
        if options.keep_next || options.keep_lines || options.border.is_some() {
            debug!("docx: keepNext, keepLines and borders are not packed");
        }
        if options.page_break_before {
            out = out.add_run(page_break_run());
        }

        for inline in &para.children {
            out = self.push_inline(out, inline)?;
        }
        Ok(out)
    }

    fn push_inline(&mut self, mut para: Paragraph, inline: &Inline) -> Result<Paragraph> {
        match inline {
            Inline::ExternalHyperlink { link, children } => {
                let hyperlink = Hyperlink::new(link, HyperlinkType::External);
                Ok(para.add_hyperlink(self.link_runs(hyperlink, children)?))
            }
            Inline::InternalHyperlink { anchor, children } => {
                let hyperlink = Hyperlink::new(anchor, HyperlinkType::Anchor);
                Ok(para.add_hyperlink(self.link_runs(hyperlink, children)?))
            }
            Inline::Bookmark { id, children } => {
                let bookmark = self.next_bookmark_id;
                self.next_bookmark_id += 1;
                para = para.add_bookmark_start(bookmark, id);
                for child in children {
                    para = self.push_inline(para, child)?;
                }
                Ok(para.add_bookmark_end(bookmark))
            }
            _ => {
                for run in self.inline_runs(inline)? {
                    para = para.add_run(run);
                }
                Ok(para)
            }
        }
    }

    fn link_runs(&mut self, mut hyperlink: Hyperlink, children: &[Inline]) -> Result<Hyperlink> {
        for child in children {
            for run in self.inline_runs(child)? {
                hyperlink = hyperlink.add_run(run);
            }
        }
        Ok(hyperlink)
    }

    /// Flattens an inline into runs.
    ///
    /// Links and bookmarks nested inside other links lose their wrapper.
    fn inline_runs(&mut self, inline: &Inline) -> Result<Vec<Run>> {
        Ok(match inline {
            Inline::Run(options) => vec![Self::build_run(options)],
            Inline::Tab => vec![Run::new().add_tab()],
            Inline::PageBreak => vec![page_break_run()],
            Inline::Image(options) => {
                vec![self.image_processor.process_inline_image(Run::new(), options)?]
            }
            Inline::Symbol(symbol) => {
                let mut run = Self::build_run(&symbol.run);
                if let Some(ch) = symbol.character() {
                    run = run.add_text(ch.to_string());
                }
                vec![run.fonts(fonts(symbol.font()))]
            }
            Inline::Math { text, children } => {
                let mut runs = Vec::new();
                if !text.is_empty() {
                    runs.push(Run::new().add_text(text.as_str()));
                }
                for child in children {
                    runs.extend(self.inline_runs(child)?);
                }
                runs.into_iter().map(|run| run.fonts(fonts(MATH_FONT))).collect()
            }
            Inline::ExternalHyperlink { children, .. }
            | Inline::InternalHyperlink { children, .. }
            | Inline::Bookmark { children, .. } => {
                debug!("docx: flattening nested link or bookmark");
                let mut runs = Vec::new();
                for child in children {
                    runs.extend(self.inline_runs(child)?);
                }
                runs
            }
        })
    }

    fn build_run(options: &RunOptions) -> Run {
        let mut run = Run::new();

        for _ in 0..options.break_count.unwrap_or(0) {
            run = run.add_break(BreakType::TextWrapping);
        }
        if let Some(text) = &options.text {
            run = if options.all_caps {
                run.add_text(text.to_uppercase())
            } else {
                run.add_text(text.as_str())
            };
        }

        if let Some(style) = &options.style {
            run = run.style(style);
        }
        if options.bold {
            run = run.bold();
        }
        if options.italics {
            run = run.italic();
        }
        if let Some(kind) = options.underline.as_ref().and_then(|u| u.kind()) {
            run = run.underline(kind);
        }
        if options.strike || options.double_strike {
            run = run.strike();
        }
        if let Some(color) = &options.color {
            run = run.color(color.trim_start_matches('#'));
        }
        if let Some(size) = options.size {
            run = run.size(size as _);
        }
        if let Some(font) = &options.font {
            run = run.fonts(fonts(font));
        }
        if let Some(highlight) = &options.highlight {
            run = run.highlight(highlight.as_str());
        }
        if options.small_caps || options.superscript || options.subscript {
            debug!("docx: smallCaps, superscript and subscript are not packed");
        }

        run
    }

    fn width_type(kind: Option<WidthKind>) -> WidthType {
        match kind {
            Some(WidthKind::Pct) => WidthType::Pct,
            Some(WidthKind::Auto) => WidthType::Auto,
            Some(WidthKind::Nil) => WidthType::Nil,
            Some(WidthKind::Dxa) | None => WidthType::Dxa,
        }
    }

    /// Process table
    ///
    /// `columnSpan` becomes a grid span; `rowSpan` opens a vertical merge that
    /// later rows continue with placeholder cells.
    fn build_table(&mut self, table: &model::Table) -> Result<Table> {
        let mut columns = table.options.column_widths.len();
        for row in &table.rows {
            let mut width = 0usize;
            for cell in &row.children {
                width = width.saturating_add(Self::column_span(cell)?);
            }
            columns = columns.max(width);
        }

        // (remaining rows, grid span) of the merge started at each column
        let mut vmerge = vec![(0usize, 1usize); columns];
        let mut rows = Vec::with_capacity(table.rows.len());

        for row in &table.rows {
            let mut cells = Vec::new();
            let mut col_index = 0;
            let mut cell_iter = row.children.iter();

            while col_index < columns {
                let (remaining, span) = vmerge[col_index];
                if remaining > 0 {
                    let mut cell = TableCell::new()
                        .vertical_merge(VMergeType::Continue)
                        .add_paragraph(Paragraph::new());
                    if span > 1 {
                        cell = cell.grid_span(span);
                    }
                    cells.push(cell);
                    vmerge[col_index].0 -= 1;
                    col_index += span;
                    continue;
                }

                let Some(cell) = cell_iter.next() else {
                    cells.push(TableCell::new().add_paragraph(Paragraph::new()));
                    col_index += 1;
                    continue;
                };

                let span = Self::column_span(cell)?;
                let mut table_cell = self.build_cell(cell)?;
                if span > 1 {
                    table_cell = table_cell.grid_span(span);
                }
                let row_span = cell.options.row_span.unwrap_or(1);
                if row_span > 1 {
                    table_cell = table_cell.vertical_merge(VMergeType::Restart);
                    vmerge[col_index] = (row_span - 1, span);
                }
                cells.push(table_cell);
                col_index += span;
            }

            if cell_iter.next().is_some() {
                debug!("docx: dropping cells beyond the table grid");
            }
            rows.push(TableRow::new(cells));
        }

        let mut out = Table::new(rows);
        if !table.options.column_widths.is_empty() {
            let grid = table
                .options
                .column_widths
                .iter()
                .map(|&width| width as usize)
                .collect();
            out = out.set_grid(grid);
        }
        if let Some(width) = &table.options.width {
            out = out.width(width.size as usize, Self::width_type(width.kind));
        }
        if let Some(style) = &table.options.style {
            out = out.style(style);
        }
        Ok(out)
    }

    /// The grid span of a cell, at least one column and at most the grid limit.
    fn column_span(cell: &model::TableCell) -> Result<usize> {
        match cell.options.column_span.unwrap_or(1) {
            span if span <= MAX_GRID_COLUMNS => Ok(span.max(1)),
            span => Err(Error::invalid_properties(
                "TableCell",
                format!("columnSpan must not exceed {MAX_GRID_COLUMNS}, got {span}"),
            )),
        }
    }

    fn build_cell(&mut self, cell: &model::TableCell) -> Result<TableCell> {
        let mut out = TableCell::new();
        if let Some(width) = &cell.options.width {
            out = out.width(width.size as usize, Self::width_type(width.kind));
        }
        if cell.options.shading.is_some() {
            debug!("docx: cell shading is not packed");
        }

        for block in &cell.children {
            out = match block {
                Block::Paragraph(para) => out.add_paragraph(self.build_paragraph(para)?),
                Block::Table(table) => out.add_table(self.build_table(table)?),
                Block::PageBreak => out.add_paragraph(Paragraph::new().add_run(page_break_run())),
            };
        }
        // Word requires every cell to end with a paragraph.
        if !matches!(
            cell.children.last(),
            Some(Block::Paragraph(_) | Block::PageBreak)
        ) {
            out = out.add_paragraph(Paragraph::new());
        }
        Ok(out)
    }

    /// Generate DOCX document
    pub fn generate_docx(&mut self, doc: &model::Document) -> Result<Vec<u8>> {
        let docx = self.build(doc)?;

        let mut buffer = Vec::new();
        docx.build()
            .pack(&mut Cursor::new(&mut buffer))
            .map_err(|e| Error::packager(format!("Failed to pack DOCX: {e}")))?;

        Ok(buffer)
    }
}

impl FormatWriter for DocxWriter {
    fn write_vec(&mut self, document: &model::Document) -> Result<Vec<u8>> {
        self.generate_docx(document)
    }

    fn write_eco(&mut self, _document: &model::Document, _output: &mut EcoString) -> Result<()> {
        Err("DOCX format does not support EcoString output".into())
    }
}
