//! Structural objects: info, fonts, page tree, pages and catalog.

use crate::error::Result;
use crate::text::{pdf_literal, FontVariant};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::object::{fmt_num, NodeId, PdfObject, References};

/// Document information dictionary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Info {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Creator application
    pub creator: Option<String>,

    /// Producer
    pub producer: Option<String>,

    /// Creation date; left out by default so output is reproducible
    pub creation_date: Option<DateTime<Utc>>,
}

impl Info {
    /// Create info with a title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }
}

/// PDF date string, e.g. `D:20240131120000Z`.
pub fn pdf_date(date: &DateTime<Utc>) -> String {
    format!("D:{}Z", date.format("%Y%m%d%H%M%S"))
}

impl PdfObject for Info {
    fn kind(&self) -> &'static str {
        "Info"
    }

    fn render_body(&self, _refs: &References<'_>) -> Result<String> {
        let mut out = String::from("<<\n");
        let fields = [
            ("Title", &self.title),
            ("Author", &self.author),
            ("Creator", &self.creator),
            ("Producer", &self.producer),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                out.push_str(&format!("  /{} {}\n", key, pdf_literal(value)));
            }
        }
        if let Some(ref date) = self.creation_date {
            out.push_str(&format!("  /CreationDate {}\n", pdf_literal(&pdf_date(date))));
        }
        out.push_str(">>\n");
        Ok(out)
    }
}

/// An immutable (symbolic name, base font) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontResource {
    name: String,
    base_font: String,
}

impl FontResource {
    /// Create a Type1 font resource.
    pub fn new(name: impl Into<String>, base_font: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_font: base_font.into(),
        }
    }

    /// Resource for one of the built-in variants.
    pub fn builtin(variant: FontVariant) -> Self {
        Self::new(variant.resource_name(), variant.base_font())
    }

    /// Symbolic name referenced from content streams.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base font identifier.
    pub fn base_font(&self) -> &str {
        &self.base_font
    }
}

impl PdfObject for FontResource {
    fn kind(&self) -> &'static str {
        "FontResource"
    }

    fn render_body(&self, _refs: &References<'_>) -> Result<String> {
        Ok(format!(
            "<<\n  /Type /Font\n  /Subtype /Type1\n  /Name /{}\n  /BaseFont /{}\n  /Encoding /WinAnsiEncoding\n>>\n",
            self.name, self.base_font
        ))
    }
}

/// The page tree root.
#[derive(Debug, Clone, Default)]
pub struct PageCollection {
    kids: Vec<NodeId>,
}

impl PageCollection {
    /// Create an empty page collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page.
    pub fn push(&mut self, page: NodeId) {
        self.kids.push(page);
    }

    /// Pages in order.
    pub fn pages(&self) -> &[NodeId] {
        &self.kids
    }

    /// Value of `/Count`.
    pub fn count(&self) -> usize {
        self.kids.len()
    }
}

impl PdfObject for PageCollection {
    fn kind(&self) -> &'static str {
        "PageCollection"
    }

    fn render_body(&self, refs: &References<'_>) -> Result<String> {
        let kids = self
            .kids
            .iter()
            .map(|id| refs.reference(*id, self.kind(), "Page"))
            .collect::<Result<Vec<_>>>()?;
        Ok(format!(
            "<<\n  /Type /Pages\n  /Kids [{}]\n  /Count {}\n>>\n",
            kids.join(" "),
            self.count()
        ))
    }
}

/// A single page: geometry, resources and its content stream.
#[derive(Debug, Clone)]
pub struct Page {
    parent: NodeId,
    contents: NodeId,
    fonts: Vec<(String, NodeId)>,
    /// Media box width in points
    pub width: f64,
    /// Media box height in points
    pub height: f64,
}

impl Page {
    /// Create a page under `parent` drawing `contents`.
    pub fn new(parent: NodeId, contents: NodeId, width: f64, height: f64) -> Self {
        Self {
            parent,
            contents,
            fonts: Vec::new(),
            width,
            height,
        }
    }

    /// Make a font resource available under its symbolic name.
    pub fn with_font(mut self, name: impl Into<String>, font: NodeId) -> Self {
        self.fonts.push((name.into(), font));
        self
    }

    /// Parent page collection.
    pub fn parent(&self) -> NodeId {
        self.parent
    }

    /// Content stream drawn on this page.
    pub fn contents(&self) -> NodeId {
        self.contents
    }
}

impl PdfObject for Page {
    fn kind(&self) -> &'static str {
        "Page"
    }

    fn render_body(&self, refs: &References<'_>) -> Result<String> {
        let parent = refs.reference(self.parent, self.kind(), "PageCollection")?;
        let contents = refs.reference(self.contents, self.kind(), "ContentStream")?;
        let mut fonts = String::new();
        for (name, id) in &self.fonts {
            fonts.push_str(&format!(
                " /{} {}",
                name,
                refs.reference(*id, self.kind(), "FontResource")?
            ));
        }
        Ok(format!(
            "<<\n  /Type /Page\n  /Parent {}\n  /MediaBox [0 0 {} {}]\n  /Contents {}\n  /Resources <<\n    /ProcSet [/PDF /Text]\n    /Font <<{} >>\n  >>\n>>\n",
            parent,
            fmt_num(self.width),
            fmt_num(self.height),
            contents,
            fonts
        ))
    }
}

/// Document catalog; references the outlines and the page tree by number.
#[derive(Debug, Clone)]
pub struct Catalog {
    outlines: NodeId,
    pages: NodeId,
}

impl Catalog {
    /// Create a catalog.
    pub fn new(outlines: NodeId, pages: NodeId) -> Self {
        Self { outlines, pages }
    }
}

impl PdfObject for Catalog {
    fn kind(&self) -> &'static str {
        "Catalog"
    }

    fn render_body(&self, refs: &References<'_>) -> Result<String> {
        Ok(format!(
            "<<\n  /Type /Catalog\n  /Outlines {}\n  /Pages {}\n  /PageMode /UseOutlines\n>>\n",
            refs.reference(self.outlines, self.kind(), "OutlineCollection")?,
            refs.reference(self.pages, self.kind(), "PageCollection")?
        ))
    }
}
