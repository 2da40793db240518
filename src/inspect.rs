//! Header detection and structural inspection of generated documents.
//!
//! The inspector reads the cross-reference section back and checks that
//! every in-use entry points at the start of its object. It understands the
//! uncompressed, single-section layout this crate writes, not arbitrary files.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.4"
const XREF_ENTRY_LEN: usize = 20;

/// Version found in the file header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PdfHeader {
    /// Version string (e.g., "1.4")
    pub version: String,
}

impl std::fmt::Display for PdfHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

/// Recognise the `%PDF-x.y` header.
pub fn detect_header(data: &[u8]) -> Result<PdfHeader> {
    if data.len() < PDF_MAGIC.len() + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::Inspect("missing %PDF- header".into()));
    }

    let version = &data[PDF_MAGIC.len()..PDF_MAGIC.len() + VERSION_LEN];
    match version {
        [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit() => {
            Ok(PdfHeader {
                version: String::from_utf8_lossy(version).into_owned(),
            })
        }
        _ => Err(Error::Inspect(format!(
            "invalid version {:?}",
            String::from_utf8_lossy(version)
        ))),
    }
}

/// Check whether bytes start with a PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_header(data).is_ok()
}

/// What the cross-reference table and trailer say about a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSummary {
    /// Header version
    pub version: String,
    /// Trailer `/Size` (object count plus the free entry)
    pub size: usize,
    /// Catalog object number
    pub root: u32,
    /// Info object number
    pub info: Option<u32>,
    /// Byte offset of the `xref` keyword
    pub startxref: usize,
    /// Offsets of objects 1..size, each verified to point at its header
    pub offsets: Vec<usize>,
    /// `/Count` of the page tree
    pub page_count: usize,
    /// `/Count` of the outline collection
    pub outline_count: usize,
    /// `/Title` from the info dictionary, as written
    pub title: Option<String>,
}

impl DocumentSummary {
    /// Number of numbered objects.
    pub fn object_count(&self) -> usize {
        self.offsets.len()
    }
}

/// Inspect a document held in memory.
pub fn inspect_bytes(data: &[u8]) -> Result<DocumentSummary> {
    let header = detect_header(data)?;
    let text = std::str::from_utf8(data)
        .map_err(|e| Error::Inspect(format!("document is not plain text: {}", e)))?;

    let startxref = parse_startxref(text)?;
    let xref = text
        .get(startxref..)
        .filter(|rest| rest.starts_with("xref\n"))
        .ok_or_else(|| Error::Inspect(format!("startxref {} does not point at xref", startxref)))?;

    let mut lines = xref.lines().skip(1);
    let subsection = lines
        .next()
        .ok_or_else(|| Error::Inspect("missing xref subsection".into()))?;
    let size = match subsection.split_whitespace().collect::<Vec<_>>().as_slice() {
        ["0", count] => parse_number::<usize>(count, "xref count")?,
        _ => {
            return Err(Error::Inspect(format!(
                "unsupported xref subsection {:?}",
                subsection
            )))
        }
    };
    if size == 0 {
        return Err(Error::Inspect("empty xref subsection".into()));
    }
    // Every entry is exactly 20 bytes.
    if size > xref.len() / XREF_ENTRY_LEN {
        return Err(Error::Inspect(format!(
            "xref count {} exceeds the {} bytes of the section",
            size,
            xref.len()
        )));
    }

    let mut offsets = Vec::with_capacity(size - 1);
    for number in 0..size {
        let entry = lines
            .next()
            .ok_or_else(|| Error::Inspect(format!("missing xref entry {}", number)))?;
        let fields: Vec<&str> = entry.split_whitespace().collect();
        match (number, fields.as_slice()) {
            (0, [_, "65535", "f"]) => {}
            (0, _) => return Err(Error::Inspect(format!("bad free entry {:?}", entry))),
            (_, [offset, "00000", "n"]) => {
                let offset = parse_number::<usize>(offset, "xref offset")?;
                let expected = format!("{} 0 obj", number);
                if !text.get(offset..).is_some_and(|s| s.starts_with(&expected)) {
                    return Err(Error::Inspect(format!(
                        "xref entry {} points at byte {}, which is not its object header",
                        number, offset
                    )));
                }
                offsets.push(offset);
            }
            _ => return Err(Error::Inspect(format!("bad xref entry {:?}", entry))),
        }
    }

    let trailer = xref
        .find("trailer")
        .map(|at| &xref[at..])
        .ok_or_else(|| Error::Inspect("missing trailer".into()))?;
    let trailer_size = dict_number(trailer, "Size")
        .ok_or_else(|| Error::Inspect("trailer has no /Size".into()))?;
    if trailer_size != size {
        return Err(Error::Inspect(format!(
            "trailer /Size {} disagrees with {} xref entries",
            trailer_size, size
        )));
    }
    let root = dict_reference(trailer, "Root")
        .ok_or_else(|| Error::Inspect("trailer has no /Root".into()))?;
    let info = dict_reference(trailer, "Info");

    let catalog = object_text(text, &offsets, root)?;
    let page_count = match dict_reference(catalog, "Pages") {
        Some(pages) => dict_number(object_text(text, &offsets, pages)?, "Count").unwrap_or(0),
        None => 0,
    };
    let outline_count = match dict_reference(catalog, "Outlines") {
        Some(outlines) => {
            dict_number(object_text(text, &offsets, outlines)?, "Count").unwrap_or(0)
        }
        None => 0,
    };
    let title = match info {
        Some(info) => dict_literal(object_text(text, &offsets, info)?, "Title"),
        None => None,
    };

    Ok(DocumentSummary {
        version: header.version,
        size,
        root,
        info,
        startxref,
        offsets,
        page_count,
        outline_count,
        title,
    })
}

/// Inspect a document on disk.
pub fn inspect_file<P: AsRef<Path>>(path: P) -> Result<DocumentSummary> {
    let data = fs::read(path)?;
    inspect_bytes(&data)
}

fn parse_number<T: std::str::FromStr>(value: &str, what: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Inspect(format!("invalid {} {:?}", what, value)))
}

fn parse_startxref(text: &str) -> Result<usize> {
    let at = text
        .rfind("startxref")
        .ok_or_else(|| Error::Inspect("missing startxref".into()))?;
    let value = text[at + "startxref".len()..]
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or_else(|| Error::Inspect("startxref has no value".into()))?;
    parse_number(value, "startxref")
}

/// Text of object `number`, from its header to `endobj`.
fn object_text<'a>(text: &'a str, offsets: &[usize], number: u32) -> Result<&'a str> {
    let offset = (number as usize)
        .checked_sub(1)
        .and_then(|index| offsets.get(index))
        .ok_or_else(|| Error::Inspect(format!("object {} is not in the xref table", number)))?;
    let rest = &text[*offset..];
    let end = rest
        .find("endobj")
        .ok_or_else(|| Error::Inspect(format!("object {} has no endobj", number)))?;
    Ok(&rest[..end])
}

fn dict_value<'a>(dict: &'a str, key: &str) -> Option<&'a str> {
    let needle = format!("/{} ", key);
    let at = dict.find(&needle)?;
    dict[at + needle.len()..].lines().next()
}

fn dict_number(dict: &str, key: &str) -> Option<usize> {
    dict_value(dict, key)?.split_whitespace().next()?.parse().ok()
}

fn dict_reference(dict: &str, key: &str) -> Option<u32> {
    match dict_value(dict, key)?.split_whitespace().collect::<Vec<_>>().as_slice() {
        [number, "0", "R", ..] => number.parse().ok(),
        _ => None,
    }
}

fn dict_literal(dict: &str, key: &str) -> Option<String> {
    let value = dict_value(dict, key)?.trim();
    let inner = value.strip_prefix('(')?.strip_suffix(')')?;
    Some(inner.to_string())
}
