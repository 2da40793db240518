//! Object graph for the output document.
//!
//! Structural objects ([`Info`], [`FontResource`], [`OutlineCollection`],
//! [`OutlineEntry`], [`PageCollection`], [`Page`], [`ContentStream`],
//! [`Catalog`]) live in the arena of a [`DocumentRoot`] and refer to each
//! other through [`NodeId`] handles. Each renders itself to a numbered
//! object block; the root numbers them, concatenates the blocks and writes
//! the cross-reference table and trailer.

mod content;
mod document;
mod object;
mod outline;
mod structure;

pub use content::{Color, ContentStream, GraphicObject, TextRun};
pub use document::{DocumentRoot, SerializedDocument, PDF_VERSION};
pub use object::{fmt_num, Node, NodeId, NodeKind, ObjectNumber, PdfObject, References};
pub use outline::{OutlineCollection, OutlineEntry};
pub use structure::{pdf_date, Catalog, FontResource, Info, Page, PageCollection};
