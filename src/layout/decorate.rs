//! Running header and footer.
//!
//! Footers carry `Page N of T`, so decoration runs as a second pass over
//! pages that are already attached, once the total is known.

use crate::error::{Error, Result};
use crate::pdf::{Color, ContentStream, DocumentRoot, GraphicObject, NodeId, Page, TextRun};
use crate::text::{sanitize, FontMetrics, FontSpec};

use super::options::LayoutOptions;

const RULE_WIDTH: f64 = 0.75;

/// Distance between a band rule and the content area edge.
const BAND_GAP: f64 = 6.0;

/// Footer label for page `number` (1-based) of `total`.
pub fn page_label(number: usize, total: usize) -> String {
    format!("Page {} of {}", number, total)
}

/// Draws the header band and footer band of every page.
pub struct Decorator<'a> {
    options: &'a LayoutOptions,
    metrics: &'a FontMetrics,
    title: String,
}

impl<'a> Decorator<'a> {
    /// Create a decorator showing `title` in the header band.
    pub fn new(
        options: &'a LayoutOptions,
        metrics: &'a FontMetrics,
        title: &str,
    ) -> Result<Self> {
        let title = sanitize(
            title,
            options.header_font.variant,
            metrics,
            options.glyph_policy,
        )?;
        Ok(Self {
            options,
            metrics,
            title,
        })
    }

    fn fitted_text(&self, font: &FontSpec, x: f64, y: f64, text: &str) -> Result<GraphicObject> {
        let width = self.metrics.measure_width(text, font)?;
        let available = self.options.page.content_width();
        if width > available {
            return Ok(GraphicObject::Scaled {
                scale: available / width,
                x,
                y,
                children: vec![TextRun::styled(font, 0.0, 0.0, text).into()],
            });
        }
        Ok(TextRun::styled(font, x, y, text).into())
    }

    fn rule(&self, y: f64) -> GraphicObject {
        let page = &self.options.page;
        GraphicObject::Line {
            from: (page.margins.left, y),
            to: (page.width - page.margins.right, y),
            width: RULE_WIDTH,
            color: Color::GRAY,
        }
    }

    /// Header band: the report title above a rule.
    pub fn header(&self) -> Result<Vec<GraphicObject>> {
        let page = &self.options.page;
        let band_top = page.height - page.margins.top;
        let rule_y = band_top - page.header_height + BAND_GAP;

        let mut objects = Vec::with_capacity(2);
        if !self.title.is_empty() {
            objects.push(self.fitted_text(
                &self.options.header_font,
                page.margins.left,
                rule_y + 4.0,
                &self.title,
            )?);
        }
        objects.push(self.rule(rule_y));
        Ok(objects)
    }

    /// Footer band: a rule above the right-aligned page label.
    pub fn footer(&self, number: usize, total: usize) -> Result<Vec<GraphicObject>> {
        if number == 0 || number > total {
            return Err(Error::AssemblyInvariant(format!(
                "footer for page {} of {}",
                number, total
            )));
        }
        let page = &self.options.page;
        let font = &self.options.body_font;
        let rule_y = page.margins.bottom + page.footer_height - BAND_GAP;

        let label = page_label(number, total);
        let width = self.metrics.measure_width(&label, font)?;
        let x = page.width - page.margins.right - width;
        Ok(vec![
            self.rule(rule_y),
            TextRun::styled(font, x, rule_y - 4.0 - font.size, label).into(),
        ])
    }

    /// Append header and footer to every page's content stream.
    pub fn decorate(&self, root: &mut DocumentRoot, pages: &[NodeId]) -> Result<()> {
        let total = pages.len();
        let header = self.header()?;
        for (index, page) in pages.iter().enumerate() {
            let contents = root.get::<Page>(*page)?.contents();
            let footer = self.footer(index + 1, total)?;
            let stream = root.get_mut::<ContentStream>(contents)?;
            stream.extend(header.iter().cloned());
            stream.extend(footer);
        }
        log::debug!("Decorated {} pages", total);
        Ok(())
    }
}
