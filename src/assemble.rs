//! Document assembly.
//!
//! [`Assembler`] wires the pieces together in a fixed attachment order:
//! info, fonts, outline collection, then per page the page, its content
//! stream and its outline entry, then the page collection and finally the
//! catalog. Header and footer are added after pagination, once the page
//! count is known. Either a complete document is returned or an error; no
//! partial output is produced.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::layout::{Decorator, LayoutOptions, Paginator};
use crate::model::Dataset;
use crate::pdf::{Catalog, DocumentRoot, FontResource, Info, OutlineCollection};
use crate::text::{FontMetrics, FontVariant};

/// The assembled document and its bookkeeping.
#[derive(Debug, Clone)]
pub struct AssembledDocument {
    /// Complete file contents
    pub bytes: Vec<u8>,
    /// Number of pages
    pub page_count: usize,
    /// Number of numbered objects (the trailer's `/Size` minus one)
    pub object_count: usize,
    /// Byte offset of every object, indexed by `number - 1`
    pub offsets: Vec<usize>,
    /// Byte offset of the `xref` keyword
    pub startxref: usize,
}

impl AssembledDocument {
    /// Write the document to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, &self.bytes)?;
        Ok(())
    }

    /// Borrow the file contents as text; the output is pure ASCII.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.bytes).unwrap_or_default()
    }
}

/// Builds documents from datasets.
///
/// # Example
///
/// ```
/// use tabpdf::{Assembler, DataTable, Dataset, LayoutOptions, Row};
///
/// let mut table = DataTable::new("People", ["Name", "Age"]);
/// table.add_row(Row::from_strings(["Ada", "36"]));
/// let mut dataset = Dataset::new("Staff");
/// dataset.add_table(table);
///
/// let doc = Assembler::new(LayoutOptions::new()).assemble(&dataset)?;
/// assert_eq!(doc.page_count, 1);
/// assert!(doc.bytes.starts_with(b"%PDF-1.4\n"));
/// # Ok::<(), tabpdf::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Assembler {
    options: LayoutOptions,
    metrics: FontMetrics,
}

impl Assembler {
    /// Create an assembler using the built-in font metrics.
    pub fn new(options: LayoutOptions) -> Self {
        Self {
            options,
            metrics: FontMetrics::builtin(),
        }
    }

    /// Use different font metrics.
    pub fn with_metrics(mut self, metrics: FontMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Layout options in use.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Build the object graph for `dataset` without serializing it.
    pub fn build(&self, dataset: &Dataset) -> Result<(DocumentRoot, usize)> {
        self.options.validate()?;
        dataset.validate()?;

        let title = self.options.report_title(dataset);
        let mut root = DocumentRoot::new();

        let mut info: Info = self.options.info.clone();
        if info.title.is_none() && !title.is_empty() {
            info.title = Some(title.clone());
        }
        let info = root.add(info);
        root.set_info(info);

        let fonts: Vec<(String, _)> = FontVariant::ALL
            .iter()
            .map(|variant| {
                let font = FontResource::builtin(*variant);
                (font.name().to_string(), root.add(font))
            })
            .collect();

        let outlines = root.add(OutlineCollection::new());

        let pagination = Paginator::new(&self.options, &self.metrics).paginate(
            &mut root, dataset, outlines, &fonts,
        )?;
        root.attach(pagination.pages)?;

        Decorator::new(&self.options, &self.metrics, &title)?
            .decorate(&mut root, &pagination.page_ids)?;

        let catalog = root.add(Catalog::new(outlines, pagination.pages));
        root.set_catalog(catalog);

        log::info!(
            "Assembled '{}': {} pages, {} objects",
            title,
            pagination.page_ids.len(),
            root.object_count()
        );
        Ok((root, pagination.page_ids.len()))
    }

    /// Assemble `dataset` into document bytes.
    pub fn assemble(&self, dataset: &Dataset) -> Result<AssembledDocument> {
        let (root, page_count) = self.build(dataset)?;
        let serialized = root.serialize()?;
        Ok(AssembledDocument {
            page_count,
            object_count: root.object_count(),
            offsets: serialized.offsets,
            startxref: serialized.startxref,
            bytes: serialized.text.into_bytes(),
        })
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new(LayoutOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{Column, DataTable, Row};

    fn sample() -> Dataset {
        let mut table = DataTable::new("People", ["Name", "Age"]);
        table.add_row(Row::from_strings(["Alice", "30"]));
        table.add_row(Row::from_strings(["Bob", "25"]));
        let mut dataset = Dataset::new("Staff");
        dataset.add_table(table);
        dataset
    }

    #[test]
    fn test_attachment_order() {
        let assembler = Assembler::new(LayoutOptions::new().sequential());
        let doc = assembler.assemble(&sample()).unwrap();
        let text = doc.as_str();

        // info, F1, F2, outlines, page, contents, outline entry, pages, catalog
        assert_eq!(doc.object_count, 9);
        assert!(text.contains("1 0 obj\n<<\n  /Title (Staff)\n"));
        assert!(text.contains("2 0 obj\n<<\n  /Type /Font\n"));
        assert!(text.contains("4 0 obj\n<<\n  /Type /Outlines\n"));
        assert!(text.contains("5 0 obj\n<<\n  /Type /Page\n  /Parent 8 0 R\n"));
        assert!(text.contains("8 0 obj\n<<\n  /Type /Pages\n  /Kids [5 0 R]\n"));
        assert!(text.contains("9 0 obj\n<<\n  /Type /Catalog\n"));
        assert!(text.contains("/Root 9 0 R\n"));
    }

    #[test]
    fn test_build_graph() {
        let assembler = Assembler::new(LayoutOptions::new().sequential());
        let (root, pages) = assembler.build(&sample()).unwrap();
        assert_eq!(pages, 1);
        let collections: Vec<_> = root
            .attached()
            .filter(|(_, node)| node.kind() == "PageCollection")
            .collect();
        assert_eq!(collections.len(), 1);
        assert!(root.validate().is_ok());
    }

    #[test]
    fn test_configuration_error_before_output() {
        let mut dataset = sample();
        dataset.tables[0].columns[0] = Column::new("Name").width(-5.0);
        let err = Assembler::default().assemble(&dataset).unwrap_err();
        assert!(matches!(err, Error::LayoutConfiguration(_)));
    }

    #[test]
    fn test_invalid_dataset() {
        let mut dataset = sample();
        dataset.tables[0].add_row(Row::from_strings(["only one"]));
        let err = Assembler::default().assemble(&dataset).unwrap_err();
        assert!(matches!(err, Error::Dataset(_)));
    }

    #[test]
    fn test_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        let doc = Assembler::default().assemble(&sample()).unwrap();
        doc.save(&path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), doc.bytes);
    }
}
