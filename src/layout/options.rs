//! Page geometry and layout options.

use crate::error::{Error, Result};
use crate::model::Dataset;
use crate::pdf::{Color, Info};
use crate::text::{FontSpec, GlyphPolicy};
use serde::{Deserialize, Serialize};

/// Per-side insets in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    /// Top inset
    pub top: f64,
    /// Right inset
    pub right: f64,
    /// Bottom inset
    pub bottom: f64,
    /// Left inset
    pub left: f64,
}

impl Margins {
    /// The same inset on every side.
    pub fn all(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::all(36.0)
    }
}

/// Page size, margins and the bands reserved for header and footer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    /// Page width in points
    pub width: f64,
    /// Page height in points
    pub height: f64,
    /// Insets
    #[serde(default)]
    pub margins: Margins,
    /// Height reserved at the top for the running header
    #[serde(default = "default_header_height")]
    pub header_height: f64,
    /// Height reserved at the bottom for the running footer
    #[serde(default = "default_footer_height")]
    pub footer_height: f64,
}

fn default_header_height() -> f64 {
    30.0
}

fn default_footer_height() -> f64 {
    24.0
}

impl PageLayout {
    /// Create a layout with default margins and bands.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margins: Margins::default(),
            header_height: default_header_height(),
            footer_height: default_footer_height(),
        }
    }

    /// US Letter (8.5 x 11 inches).
    pub fn letter() -> Self {
        Self::new(612.0, 792.0)
    }

    /// A4 (210 x 297 mm).
    pub fn a4() -> Self {
        Self::new(595.0, 842.0)
    }

    /// Set margins and return self.
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Set header and footer band heights and return self.
    pub fn with_bands(mut self, header_height: f64, footer_height: f64) -> Self {
        self.header_height = header_height;
        self.footer_height = footer_height;
        self
    }

    /// Vertical space available for table content on one page.
    pub fn usable_height(&self) -> f64 {
        self.height
            - self.margins.top
            - self.margins.bottom
            - self.header_height
            - self.footer_height
    }

    /// Horizontal space between the side margins.
    pub fn content_width(&self) -> f64 {
        self.width - self.margins.left - self.margins.right
    }

    /// Y coordinate of the top of the content area.
    pub fn content_top(&self) -> f64 {
        self.height - self.margins.top - self.header_height
    }

    /// Reject geometry that leaves no content area.
    pub fn validate(&self) -> Result<()> {
        let values = [
            self.width,
            self.height,
            self.margins.top,
            self.margins.right,
            self.margins.bottom,
            self.margins.left,
            self.header_height,
            self.footer_height,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::LayoutConfiguration(
                "page geometry contains a non-finite value".into(),
            ));
        }
        let insets = [
            ("top margin", self.margins.top),
            ("right margin", self.margins.right),
            ("bottom margin", self.margins.bottom),
            ("left margin", self.margins.left),
            ("header height", self.header_height),
            ("footer height", self.footer_height),
        ];
        if let Some((name, value)) = insets.iter().find(|(_, v)| *v < 0.0) {
            return Err(Error::LayoutConfiguration(format!(
                "{} must not be negative, got {}",
                name, value
            )));
        }
        if self.usable_height() <= 0.0 {
            return Err(Error::LayoutConfiguration(format!(
                "usable content height is {} pt",
                self.usable_height()
            )));
        }
        if self.content_width() <= 0.0 {
            return Err(Error::LayoutConfiguration(format!(
                "content width is {} pt",
                self.content_width()
            )));
        }
        Ok(())
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::letter()
    }
}

/// Options for laying out a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutOptions {
    /// Page geometry
    pub page: PageLayout,

    /// Font for body cells and running header/footer
    pub body_font: FontSpec,

    /// Font for column header cells
    pub header_font: FontSpec,

    /// Font for table titles
    pub title_font: FontSpec,

    /// Background of column header cells
    pub header_background: Color,

    /// Horizontal inset of text inside a cell
    pub cell_padding: f64,

    /// Vertical space added to every row
    pub row_padding: f64,

    /// Handling of characters missing from the width tables
    pub glyph_policy: GlyphPolicy,

    /// Measure rows in parallel
    pub parallel: bool,

    /// Report title shown in the running header; falls back to the dataset name
    pub title: Option<String>,

    /// Document information dictionary
    pub info: Info,
}

impl LayoutOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set page geometry.
    pub fn with_page_layout(mut self, page: PageLayout) -> Self {
        self.page = page;
        self
    }

    /// Set the size of body, header and title fonts together.
    ///
    /// Titles stay proportionally larger than body text.
    pub fn with_font_size(mut self, size: f64) -> Self {
        let ratio = self.title_font.size / self.body_font.size;
        self.body_font.size = size;
        self.header_font.size = size;
        self.title_font.size = size * ratio;
        self
    }

    /// Set cell padding.
    pub fn with_cell_padding(mut self, padding: f64) -> Self {
        self.cell_padding = padding;
        self
    }

    /// Set row padding.
    pub fn with_row_padding(mut self, padding: f64) -> Self {
        self.row_padding = padding;
        self
    }

    /// Set glyph policy.
    pub fn with_glyph_policy(mut self, policy: GlyphPolicy) -> Self {
        self.glyph_policy = policy;
        self
    }

    /// Fail on characters missing from the width tables.
    pub fn strict(mut self) -> Self {
        self.glyph_policy = GlyphPolicy::Strict;
        self
    }

    /// Enable or disable parallel row measurement.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel row measurement.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the report title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the document information dictionary.
    pub fn with_info(mut self, info: Info) -> Self {
        self.info = info;
        self
    }

    /// Title for the running header: the configured title, else the dataset name.
    pub fn report_title(&self, dataset: &Dataset) -> String {
        match self.title {
            Some(ref title) if !title.is_empty() => title.clone(),
            _ => dataset.name.clone(),
        }
    }

    /// Reject options that cannot produce a page.
    pub fn validate(&self) -> Result<()> {
        self.page.validate()?;
        for (name, font) in [
            ("body", &self.body_font),
            ("header", &self.header_font),
            ("title", &self.title_font),
        ] {
            if !(font.size.is_finite() && font.size > 0.0) {
                return Err(Error::LayoutConfiguration(format!(
                    "{} font size must be positive, got {}",
                    name, font.size
                )));
            }
        }
        if !(self.cell_padding.is_finite() && self.cell_padding >= 0.0) {
            return Err(Error::LayoutConfiguration(format!(
                "cell padding must not be negative, got {}",
                self.cell_padding
            )));
        }
        if !(self.row_padding.is_finite() && self.row_padding >= 0.0) {
            return Err(Error::LayoutConfiguration(format!(
                "row padding must not be negative, got {}",
                self.row_padding
            )));
        }
        Ok(())
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            page: PageLayout::default(),
            body_font: FontSpec::helvetica(9.0),
            header_font: FontSpec::helvetica_bold(9.0),
            title_font: FontSpec::helvetica_bold(14.0).with_color(Color::GREEN),
            header_background: Color::SILVER,
            cell_padding: 3.0,
            row_padding: 4.0,
            glyph_policy: GlyphPolicy::Substitute,
            parallel: true,
            title: None,
            info: Info::default(),
        }
    }
}
