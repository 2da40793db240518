//! Error types for tabpdf library.

use std::io;
use thiserror::Error;

/// Result type alias for tabpdf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while assembling a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The dataset JSON could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The dataset is structurally invalid (e.g. row arity mismatch).
    #[error("Invalid dataset: {0}")]
    Dataset(String),

    /// A node required at render time is missing (catalog, info, children...).
    #[error("Assembly invariant violated: {0}")]
    AssemblyInvariant(String),

    /// A character has no entry in the font's width table.
    #[error("Unsupported glyph {ch:?} (U+{code:04X}) for font {font}", code = char_code(.ch))]
    UnsupportedGlyph {
        /// The offending character
        ch: char,
        /// Base font name
        font: &'static str,
    },

    /// Page geometry or column widths leave no room for content.
    #[error("Layout configuration error: {0}")]
    LayoutConfiguration(String),

    /// A referenced node had no object number when it was rendered.
    #[error("Referential integrity error: {node} references an unattached {expected}")]
    ReferentialIntegrity {
        /// Kind of the node being rendered
        node: &'static str,
        /// Kind of the node it expected to reference
        expected: &'static str,
    },

    /// A document handed to the inspector is malformed.
    #[error("Malformed document: {0}")]
    Inspect(String),
}

fn char_code(ch: &char) -> u32 {
    *ch as u32
}
