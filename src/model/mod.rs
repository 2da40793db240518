//! Input dataset: named tables of columns and rows.
//!
//! The model is what the assembler consumes. It can be built in code or
//! loaded from JSON.

mod dataset;

pub use dataset::{CellValue, Column, DataTable, Dataset, Row};
