//! Dataset, table, column and row types.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// An ordered collection of named tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    /// Dataset name, used as a fallback report title
    #[serde(default)]
    pub name: String,

    /// Tables in source order
    #[serde(default)]
    pub tables: Vec<DataTable>,
}

impl Dataset {
    /// Create a new empty dataset.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: Vec::new(),
        }
    }

    /// Parse a dataset from a JSON string and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let dataset: Dataset = serde_json::from_str(json)?;
        dataset.validate()?;
        Ok(dataset)
    }

    /// Parse a dataset from a reader and validate it.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let dataset: Dataset = serde_json::from_reader(reader)?;
        dataset.validate()?;
        Ok(dataset)
    }

    /// Load a dataset from a JSON file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tabpdf::Dataset;
    ///
    /// let dataset = Dataset::load_json("sales.json").unwrap();
    /// println!("{} tables", dataset.tables.len());
    /// ```
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Add a table to the dataset.
    pub fn add_table(&mut self, table: DataTable) {
        self.tables.push(table);
    }

    /// Check if the dataset holds no rows at all.
    pub fn is_empty(&self) -> bool {
        self.tables.iter().all(|t| t.is_empty())
    }

    /// Total number of rows across all tables.
    pub fn row_count(&self) -> usize {
        self.tables.iter().map(|t| t.row_count()).sum()
    }

    /// Check that every row matches its table's column count.
    pub fn validate(&self) -> Result<()> {
        for table in &self.tables {
            table.validate()?;
        }
        Ok(())
    }
}

/// A named table: columns plus rows aligned to them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataTable {
    /// Table name
    pub name: String,

    /// Columns in display order
    pub columns: Vec<Column>,

    /// Rows in source order
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl DataTable {
    /// Create a table with the given column names.
    pub fn new<S: Into<String>>(name: impl Into<String>, columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Column::new).collect(),
            rows: Vec::new(),
        }
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check that every row has exactly one cell per column.
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() && !self.rows.is_empty() {
            return Err(Error::Dataset(format!(
                "table '{}' has rows but no columns",
                self.name
            )));
        }
        for (index, row) in self.rows.iter().enumerate() {
            if row.cells.len() != self.columns.len() {
                return Err(Error::Dataset(format!(
                    "table '{}' row {} has {} cells, expected {}",
                    self.name,
                    index + 1,
                    row.cells.len(),
                    self.columns.len()
                )));
            }
        }
        Ok(())
    }
}

/// A named column with an optional fixed width in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ColumnDef")]
pub struct Column {
    /// Column name, shown in the header row
    pub name: String,

    /// Fixed width in points; `None` shares the remaining width
    pub width: Option<f64>,
}

impl Column {
    /// Create a column that takes an automatic width.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            width: None,
        }
    }

    /// Set a fixed width and return self.
    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }
}

/// Columns may be written as a bare name or as `{ "name", "width" }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColumnDef {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        width: Option<f64>,
    },
}

impl From<ColumnDef> for Column {
    fn from(def: ColumnDef) -> Self {
        match def {
            ColumnDef::Name(name) => Column::new(name),
            ColumnDef::Full { name, width } => Column { name, width },
        }
    }
}

/// A fixed-arity tuple of cell values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    /// Cells aligned to the table's columns
    pub cells: Vec<CellValue>,
}

impl Row {
    /// Create a row from cells.
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    /// Create a row from text values.
    pub fn from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::new(
            values
                .into_iter()
                .map(|v| CellValue::Text(v.into()))
                .collect(),
        )
    }
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Missing value, rendered empty
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Integer(i64),
    /// Floating point number
    Number(f64),
    /// Free text
    Text(String),
}

impl CellValue {
    /// Numeric cells are right-aligned in the rendered table.
    pub fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Integer(_) | CellValue::Number(_))
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}
