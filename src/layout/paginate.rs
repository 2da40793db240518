//! Row measurement and pagination.
//!
//! Pagination runs in three steps. Every table is measured first (column
//! boxes, wrapped cells, row heights); rows of one table are independent, so
//! they may be measured on the rayon pool. The measured heights are then
//! walked in source order to decide page breaks. Finally each planned page is
//! drawn into a content stream and attached to the document together with its
//! outline entry.

use std::mem;
use std::ops::Range;

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::{CellValue, DataTable, Dataset, Row};
use crate::pdf::{
    Color, ContentStream, DocumentRoot, GraphicObject, NodeId, Page, PageCollection, TextRun,
};
use crate::text::{sanitize, wrap_text, FontMetrics, FontSpec, WrappedLine};

use super::options::LayoutOptions;

const RULE_WIDTH: f64 = 0.5;

/// Horizontal alignment of the lines in a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Flush with the left padding
    Left,
    /// Flush with the right padding
    Right,
}

impl Align {
    fn of(value: &CellValue) -> Self {
        if value.is_numeric() {
            Align::Right
        } else {
            Align::Left
        }
    }
}

/// Horizontal extent of one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnBox {
    /// Left edge
    pub x: f64,
    /// Width including padding
    pub width: f64,
}

/// A cell wrapped to its column.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredCell {
    /// Wrapped lines, at least one
    pub lines: Vec<WrappedLine>,
    /// Alignment within the column
    pub align: Align,
}

/// A row whose cells have been wrapped.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredRow {
    /// Cells in column order
    pub cells: Vec<MeasuredCell>,
    /// Tallest cell's line count times the line height, plus row padding
    pub height: f64,
}

impl MeasuredRow {
    /// Line count of the tallest cell.
    pub fn line_count(&self) -> usize {
        self.cells
            .iter()
            .map(|cell| cell.lines.len())
            .max()
            .unwrap_or(1)
    }
}

/// A table with every row measured against its column boxes.
#[derive(Debug, Clone)]
pub struct MeasuredTable {
    /// Table name, sanitized for the title font
    pub title: String,
    /// Height of the title line
    pub title_height: f64,
    /// Column boxes, left to right
    pub columns: Vec<ColumnBox>,
    /// Column header row
    pub header: MeasuredRow,
    /// Body rows in source order
    pub rows: Vec<MeasuredRow>,
}

impl MeasuredTable {
    fn left(&self) -> Option<f64> {
        self.columns.first().map(|c| c.x)
    }

    fn width(&self) -> f64 {
        self.columns.iter().map(|c| c.width).sum()
    }

    /// Body row heights in source order.
    pub fn row_heights(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.height).collect()
    }
}

/// One block placed on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Table title line
    Title {
        /// Table index
        table: usize,
    },
    /// Column header row, at the start of a table or repeated on a continuation page
    Header {
        /// Table index
        table: usize,
    },
    /// Body row
    Row {
        /// Table index
        table: usize,
        /// Row index within the table
        row: usize,
    },
}

/// Blocks assigned to one page, top to bottom.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PagePlan {
    /// Outline title taken from the page's leading table
    pub outline_title: Option<String>,
    /// Placed blocks in drawing order
    pub placements: Vec<Placement>,
    /// Sum of the heights of all placed blocks
    pub content_height: f64,
    /// A single row taller than the usable height was placed here
    pub oversized: bool,
}

impl PagePlan {
    /// Body rows on this page as `(table, row)` pairs.
    pub fn rows(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.placements.iter().filter_map(|p| match *p {
            Placement::Row { table, row } => Some((table, row)),
            _ => None,
        })
    }

    /// Number of body rows on this page.
    pub fn row_count(&self) -> usize {
        self.rows().count()
    }

    /// Check whether nothing is placed on this page.
    pub fn is_blank(&self) -> bool {
        self.placements.is_empty()
    }
}

/// Page-break decisions over measured heights.
struct Planner {
    usable: f64,
    pages: Vec<PagePlan>,
    current: PagePlan,
}

impl Planner {
    fn new(usable: f64) -> Self {
        Self {
            usable,
            pages: Vec::new(),
            current: PagePlan::default(),
        }
    }

    // Exact fit stays on the current page.
    fn fits(&self, height: f64) -> bool {
        self.current.content_height + height <= self.usable
    }

    fn place(&mut self, placement: Placement, height: f64) {
        self.current.placements.push(placement);
        self.current.content_height += height;
    }

    fn name_page(&mut self, title: impl Into<String>) {
        if self.current.outline_title.is_none() {
            self.current.outline_title = Some(title.into());
        }
    }

    fn break_page(&mut self) {
        log::debug!(
            "Closing page {} with {} rows, {:.2} of {:.2} pt used",
            self.pages.len() + 1,
            self.current.row_count(),
            self.current.content_height,
            self.usable
        );
        let page = mem::take(&mut self.current);
        self.pages.push(page);
    }

    fn place_table(
        &mut self,
        table: usize,
        name: &str,
        title_height: Option<f64>,
        header_height: f64,
        rows: &[f64],
    ) {
        let lead = title_height.unwrap_or(0.0) + header_height;
        let first_row = rows.first().copied().unwrap_or(0.0);
        if !self.current.is_blank() && !self.fits(lead + first_row) {
            self.break_page();
        }

        self.name_page(name);
        if let Some(height) = title_height {
            self.place(Placement::Title { table }, height);
        }
        self.place(Placement::Header { table }, header_height);

        for (row, &height) in rows.iter().enumerate() {
            if !self.fits(height) && self.current.row_count() > 0 {
                self.break_page();
                self.name_page(format!("{} (continued)", name));
                self.place(Placement::Header { table }, header_height);
            }
            if !self.fits(height) {
                log::warn!(
                    "Row {} of table '{}' is {:.2} pt tall but only {:.2} pt are available; placing it alone",
                    row + 1,
                    name,
                    height,
                    self.usable - self.current.content_height
                );
                self.current.oversized = true;
            }
            self.place(Placement::Row { table, row }, height);
        }
    }

    fn finish(mut self) -> Vec<PagePlan> {
        // The last page is kept even when blank, so an empty dataset has one page.
        self.break_page();
        self.pages
    }
}

/// Split a single table's rows into per-page ranges.
///
/// `repeated_header` is placed at the top of every page before the rows.
/// A row that exactly fills the remaining height stays on the current page;
/// a row taller than the usable height gets a page to itself.
pub fn split_rows(heights: &[f64], usable: f64, repeated_header: f64) -> Vec<Range<usize>> {
    let mut planner = Planner::new(usable);
    planner.place_table(0, "", None, repeated_header, heights);
    planner
        .finish()
        .iter()
        .map(|page| {
            let mut rows = page.rows().map(|(_, row)| row);
            match rows.next() {
                Some(first) => first..rows.last().unwrap_or(first) + 1,
                None => 0..0,
            }
        })
        .collect()
}

/// Compute column boxes for a table.
///
/// Columns with a fixed width keep it; the remaining content width is shared
/// equally by the others. A column that ends up non-positive, or no wider than
/// its cell padding, is a configuration error.
pub fn column_boxes(table: &DataTable, options: &LayoutOptions) -> Result<Vec<ColumnBox>> {
    let available = options.page.content_width();
    let fixed: f64 = table.columns.iter().filter_map(|c| c.width).sum();
    let auto = table.columns.iter().filter(|c| c.width.is_none()).count();
    let share = if auto > 0 {
        (available - fixed) / auto as f64
    } else {
        0.0
    };

    let mut x = options.page.margins.left;
    let mut boxes = Vec::with_capacity(table.columns.len());
    for column in &table.columns {
        let width = column.width.unwrap_or(share);
        if !(width.is_finite() && width > 0.0) {
            return Err(Error::LayoutConfiguration(format!(
                "column '{}' of table '{}' has width {} pt",
                column.name, table.name, width
            )));
        }
        if width <= 2.0 * options.cell_padding {
            return Err(Error::LayoutConfiguration(format!(
                "column '{}' of table '{}' is {} pt wide, not wider than its padding",
                column.name, table.name, width
            )));
        }
        boxes.push(ColumnBox { x, width });
        x += width;
    }

    if fixed > available {
        log::warn!(
            "Table '{}' is {:.2} pt wide but the content area is {:.2} pt",
            table.name,
            fixed,
            available
        );
    }
    Ok(boxes)
}

/// Splits a dataset into pages and emits them into a [`DocumentRoot`].
pub struct Paginator<'a> {
    options: &'a LayoutOptions,
    metrics: &'a FontMetrics,
}

/// Nodes produced by [`Paginator::paginate`].
#[derive(Debug, Clone)]
pub struct Pagination {
    /// The page collection, created but not yet attached
    pub pages: NodeId,
    /// Attached pages in order
    pub page_ids: Vec<NodeId>,
    /// Attached outline entries, one per page
    pub outline_ids: Vec<NodeId>,
    /// The plan each page was drawn from
    pub plans: Vec<PagePlan>,
}

impl<'a> Paginator<'a> {
    /// Create a paginator.
    pub fn new(options: &'a LayoutOptions, metrics: &'a FontMetrics) -> Self {
        Self { options, metrics }
    }

    fn measure_row(
        &self,
        cells: impl Iterator<Item = (String, Align)>,
        columns: &[ColumnBox],
        font: &FontSpec,
    ) -> Result<MeasuredRow> {
        let padding = self.options.cell_padding;
        let mut measured = Vec::with_capacity(columns.len());
        for ((text, align), column) in cells.zip(columns) {
            let text = sanitize(&text, font.variant, self.metrics, self.options.glyph_policy)?;
            let lines = wrap_text(self.metrics, &text, font, column.width - 2.0 * padding)?;
            measured.push(MeasuredCell { lines, align });
        }

        let mut row = MeasuredRow {
            cells: measured,
            height: 0.0,
        };
        row.height = row.line_count() as f64 * font.line_height() + self.options.row_padding;
        Ok(row)
    }

    /// Measure one table.
    pub fn measure_table(&self, table: &DataTable) -> Result<MeasuredTable> {
        let columns = column_boxes(table, self.options)?;
        let title_font = &self.options.title_font;
        let title = sanitize(
            &table.name,
            title_font.variant,
            self.metrics,
            self.options.glyph_policy,
        )?;

        let header = self.measure_row(
            table.columns.iter().map(|c| (c.name.clone(), Align::Left)),
            &columns,
            &self.options.header_font,
        )?;

        let measure = |row: &Row| {
            self.measure_row(
                row.cells.iter().map(|c| (c.to_string(), Align::of(c))),
                &columns,
                &self.options.body_font,
            )
        };
        let rows = if self.options.parallel {
            table.rows.par_iter().map(measure).collect::<Result<Vec<_>>>()?
        } else {
            table.rows.iter().map(measure).collect::<Result<Vec<_>>>()?
        };

        log::debug!(
            "Measured table '{}': {} columns, {} rows, {:.2} pt of rows",
            table.name,
            columns.len(),
            rows.len(),
            rows.iter().map(|r| r.height).sum::<f64>()
        );

        Ok(MeasuredTable {
            title,
            title_height: title_font.line_height() + self.options.row_padding,
            columns,
            header,
            rows,
        })
    }

    /// Measure every table of a dataset.
    pub fn measure(&self, dataset: &Dataset) -> Result<Vec<MeasuredTable>> {
        dataset
            .tables
            .iter()
            .map(|table| self.measure_table(table))
            .collect()
    }

    /// Decide page breaks for already measured tables.
    pub fn plan_measured(&self, tables: &[MeasuredTable]) -> Vec<PagePlan> {
        let usable = self.options.page.usable_height();
        log::debug!("Usable content height {:.2} pt", usable);

        let mut planner = Planner::new(usable);
        for (index, table) in tables.iter().enumerate() {
            planner.place_table(
                index,
                &table.title,
                Some(table.title_height),
                table.header.height,
                &table.row_heights(),
            );
        }
        planner.finish()
    }

    /// Measure and plan a dataset without touching any document.
    pub fn plan(&self, dataset: &Dataset) -> Result<Vec<PagePlan>> {
        let tables = self.measure(dataset)?;
        Ok(self.plan_measured(&tables))
    }

    /// Lay out `dataset` and attach its pages to `root`.
    ///
    /// Each page is attached, then its content stream, then its outline
    /// entry under `outlines`. Every page references `fonts` by name. The
    /// returned page collection is created but left unattached so the caller
    /// decides where it is numbered.
    pub fn paginate(
        &self,
        root: &mut DocumentRoot,
        dataset: &Dataset,
        outlines: NodeId,
        fonts: &[(String, NodeId)],
    ) -> Result<Pagination> {
        let tables = self.measure(dataset)?;
        let plans = self.plan_measured(&tables);
        let fallback = self.options.report_title(dataset);
        let page = &self.options.page;

        let collection = root.create(PageCollection::new());
        let mut page_ids = Vec::with_capacity(plans.len());
        let mut outline_ids = Vec::with_capacity(plans.len());

        for (index, plan) in plans.iter().enumerate() {
            let mut stream = ContentStream::new();
            self.draw(&mut stream, plan, &tables);
            let contents = root.create(stream);

            let node = fonts.iter().fold(
                Page::new(collection, contents, page.width, page.height),
                |node, (name, font)| node.with_font(name.clone(), *font),
            );
            let page_id = root.add(node);
            root.attach(contents)?;
            root.get_mut::<PageCollection>(collection)?.push(page_id);

            let title = match plan.outline_title {
                Some(ref title) => title.clone(),
                None if !fallback.is_empty() => fallback.clone(),
                None => format!("Page {}", index + 1),
            };
            outline_ids.push(root.append_outline(outlines, title, page_id)?);
            page_ids.push(page_id);
        }

        log::debug!(
            "Paginated {} tables into {} pages",
            tables.len(),
            page_ids.len()
        );

        Ok(Pagination {
            pages: collection,
            page_ids,
            outline_ids,
            plans,
        })
    }

    fn draw(&self, stream: &mut ContentStream, plan: &PagePlan, tables: &[MeasuredTable]) {
        let options = self.options;
        let mut top = options.page.content_top();

        for placement in &plan.placements {
            match *placement {
                Placement::Title { table } => {
                    let table = &tables[table];
                    let font = &options.title_font;
                    let baseline = top - options.row_padding / 2.0 - font.size;
                    let x = table.left().unwrap_or(options.page.margins.left);
                    let width = self.metrics.measure_width_lossy(&table.title, font);
                    let available = options.page.content_width();
                    if width > available {
                        stream.add(GraphicObject::Scaled {
                            scale: available / width,
                            x,
                            y: baseline,
                            children: vec![
                                TextRun::styled(font, 0.0, 0.0, table.title.clone()).into()
                            ],
                        });
                    } else {
                        stream.add(TextRun::styled(font, x, baseline, table.title.clone()));
                    }
                    top -= table.title_height;
                }
                Placement::Header { table } => {
                    let table = &tables[table];
                    let row = &table.header;
                    if let Some(x) = table.left() {
                        stream.add(GraphicObject::Rect {
                            x,
                            y: top - row.height,
                            width: table.width(),
                            height: row.height,
                            fill: options.header_background,
                        });
                    }
                    self.draw_row(stream, &table.columns, row, top, &options.header_font);
                    top -= row.height;
                }
                Placement::Row { table, row } => {
                    let table = &tables[table];
                    let row = &table.rows[row];
                    self.draw_row(stream, &table.columns, row, top, &options.body_font);
                    top -= row.height;
                    if let Some(x) = table.left() {
                        stream.add(GraphicObject::Line {
                            from: (x, top),
                            to: (x + table.width(), top),
                            width: RULE_WIDTH,
                            color: Color::SILVER,
                        });
                    }
                }
            }
        }
    }

    fn draw_row(
        &self,
        stream: &mut ContentStream,
        columns: &[ColumnBox],
        row: &MeasuredRow,
        top: f64,
        font: &FontSpec,
    ) {
        let padding = self.options.cell_padding;
        let first_baseline = top - self.options.row_padding / 2.0 - font.size;

        for (cell, column) in row.cells.iter().zip(columns) {
            let inner = column.width - 2.0 * padding;
            for (index, line) in cell.lines.iter().enumerate() {
                if line.text.is_empty() {
                    continue;
                }
                let baseline = first_baseline - index as f64 * font.line_height();
                let scale = line.fit_scale(inner);
                if scale < 1.0 {
                    // Oversized word: shrink it into the column.
                    stream.add(GraphicObject::Scaled {
                        scale,
                        x: column.x + padding,
                        y: baseline,
                        children: vec![TextRun::styled(font, 0.0, 0.0, line.text.clone()).into()],
                    });
                    continue;
                }
                let x = match cell.align {
                    Align::Left => column.x + padding,
                    Align::Right => column.x + column.width - padding - line.width,
                };
                stream.add(TextRun::styled(font, x, baseline, line.text.clone()));
            }
        }
    }
}
