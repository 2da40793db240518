//! # tabpdf
//!
//! Tabular dataset to PDF document assembly.
//!
//! This library lays out named tables across pages using the metrics of the
//! built-in Helvetica fonts, and writes a self-contained PDF with a page
//! tree, one bookmark per page and a byte-exact cross-reference table.
//!
//! ## Quick Start
//!
//! ```no_run
//! use tabpdf::{render_file, LayoutOptions};
//!
//! fn main() -> tabpdf::Result<()> {
//!     let options = LayoutOptions::new().with_title("Inventory");
//!     let doc = render_file("inventory.json", "inventory.pdf", &options)?;
//!     println!("{} pages", doc.page_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Pagination**: rows are never split; column headers repeat on continuation pages
//! - **Outline**: one bookmark per page, titled after the table on it
//! - **Running header and footer**: report title and `Page N of T`
//! - **Glyph policy**: substitute or reject characters outside the font tables
//! - **Parallel measurement**: rows are measured with Rayon
//! - **Deterministic output**: identical input gives identical bytes

pub mod assemble;
pub mod error;
pub mod inspect;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod text;

// Re-export commonly used types
pub use assemble::{AssembledDocument, Assembler};
pub use error::{Error, Result};
pub use inspect::{detect_header, inspect_bytes, inspect_file, DocumentSummary, PdfHeader};
pub use layout::{LayoutOptions, Margins, PageLayout};
pub use model::{CellValue, Column, DataTable, Dataset, Row};
pub use pdf::Info as DocumentInfo;
pub use text::{FontMetrics, FontSpec, FontVariant, GlyphPolicy};

use std::path::Path;

/// Assemble a dataset into document bytes.
///
/// # Example
///
/// ```
/// use tabpdf::{render_dataset, DataTable, Dataset, LayoutOptions, Row};
///
/// let mut table = DataTable::new("Fruit", ["Name", "Count"]);
/// table.add_row(Row::from_strings(["Apple", "3"]));
/// let mut dataset = Dataset::new("Basket");
/// dataset.add_table(table);
///
/// let bytes = render_dataset(&dataset, &LayoutOptions::new()).unwrap();
/// assert!(bytes.ends_with(b"%%EOF\n"));
/// ```
pub fn render_dataset(dataset: &Dataset, options: &LayoutOptions) -> Result<Vec<u8>> {
    let doc = Assembler::new(options.clone()).assemble(dataset)?;
    Ok(doc.bytes)
}

/// Load a JSON dataset and write the assembled document to `output`.
///
/// Nothing is written when loading or assembly fails.
pub fn render_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: &LayoutOptions,
) -> Result<AssembledDocument> {
    let dataset = Dataset::load_json(input)?;
    let doc = Assembler::new(options.clone()).assemble(&dataset)?;
    doc.save(output)?;
    Ok(doc)
}
