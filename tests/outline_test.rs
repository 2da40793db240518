//! Integration tests for the outline chain.

use std::collections::HashMap;

use tabpdf::pdf::{
    Catalog, ContentStream, DocumentRoot, Info, OutlineCollection, OutlineEntry, Page,
    PageCollection,
};
use tabpdf::{inspect_bytes, Assembler, CellValue, DataTable, Dataset, Row};

/// Outline entry fields read back from the serialized document.
#[derive(Debug, Default)]
struct Bookmark {
    title: String,
    prev: Option<u32>,
    next: Option<u32>,
    page: u32,
}

fn reference(object: &str, key: &str) -> Option<u32> {
    let at = object.find(&format!("/{} ", key))?;
    object[at + key.len() + 2..]
        .split_whitespace()
        .next()?
        .trim_start_matches('[')
        .parse()
        .ok()
}

fn bookmarks(bytes: &[u8]) -> (Option<u32>, Option<u32>, HashMap<u32, Bookmark>) {
    let text = std::str::from_utf8(bytes).unwrap();
    let summary = inspect_bytes(bytes).unwrap();
    let mut first = None;
    let mut last = None;
    let mut entries = HashMap::new();

    for (index, offset) in summary.offsets.iter().enumerate() {
        let rest = &text[*offset..];
        let object = &rest[..rest.find("endobj").unwrap()];
        if object.contains("/Type /Outlines") {
            first = reference(object, "First");
            last = reference(object, "Last");
        } else if object.contains("/Dest [") {
            let title = object
                .split("/Title (")
                .nth(1)
                .and_then(|s| s.split(")\n").next())
                .unwrap()
                .replace("\\(", "(")
                .replace("\\)", ")");
            entries.insert(
                index as u32 + 1,
                Bookmark {
                    title,
                    prev: reference(object, "Prev"),
                    next: reference(object, "Next"),
                    page: reference(object, "Dest").unwrap(),
                },
            );
        }
    }
    (first, last, entries)
}

fn ledger(rows: usize) -> Dataset {
    let mut table = DataTable::new("Ledger", ["Id", "Memo"]);
    for i in 0..rows {
        table.add_row(Row::new(vec![
            CellValue::Integer(i as i64),
            CellValue::Text(format!("entry {}", i)),
        ]));
    }
    let mut dataset = Dataset::new("Books");
    dataset.add_table(table);
    dataset
}

#[test]
fn test_chain_traversal_visits_every_page() {
    let doc = Assembler::default().assemble(&ledger(300)).unwrap();
    let (first, last, entries) = bookmarks(&doc.bytes);
    assert_eq!(entries.len(), doc.page_count);

    let mut visited = Vec::new();
    let mut cursor = first;
    while let Some(number) = cursor {
        assert!(visited.len() <= entries.len(), "cycle in outline chain");
        visited.push(number);
        cursor = entries[&number].next;
    }
    assert_eq!(visited.len(), doc.page_count);
    assert_eq!(visited.last().copied(), last);
}

#[test]
fn test_neighbours_are_mutual() {
    let doc = Assembler::default().assemble(&ledger(300)).unwrap();
    let (first, last, entries) = bookmarks(&doc.bytes);

    for (number, entry) in &entries {
        if let Some(next) = entry.next {
            assert_eq!(entries[&next].prev, Some(*number));
        }
        if let Some(prev) = entry.prev {
            assert_eq!(entries[&prev].next, Some(*number));
        }
    }
    assert!(entries[&first.unwrap()].prev.is_none());
    assert!(entries[&last.unwrap()].next.is_none());
}

#[test]
fn test_titles_and_destinations() {
    let doc = Assembler::default().assemble(&ledger(120)).unwrap();
    let (first, _, entries) = bookmarks(&doc.bytes);

    let mut cursor = first;
    let mut titles = Vec::new();
    let mut pages = Vec::new();
    while let Some(number) = cursor {
        titles.push(entries[&number].title.clone());
        pages.push(entries[&number].page);
        cursor = entries[&number].next;
    }

    assert_eq!(titles[0], "Ledger");
    assert!(titles[1..].iter().all(|t| t == "Ledger (continued)"));

    // Each bookmark targets a distinct page object.
    let mut unique = pages.clone();
    unique.dedup();
    assert_eq!(unique.len(), pages.len());
}

#[test]
fn test_single_page_has_unlinked_entry() {
    let doc = Assembler::default().assemble(&ledger(2)).unwrap();
    let (first, last, entries) = bookmarks(&doc.bytes);
    assert_eq!(entries.len(), 1);
    assert_eq!(first, last);
    let entry = &entries[&first.unwrap()];
    assert!(entry.prev.is_none());
    assert!(entry.next.is_none());
}

#[test]
fn test_append_outline_on_root() {
    let mut root = DocumentRoot::new();
    let info = root.add(Info::with_title("Manual"));
    root.set_info(info);
    let outlines = root.add(OutlineCollection::new());
    let pages = root.create(PageCollection::new());

    let mut entries = Vec::new();
    for i in 0..5 {
        let contents = root.create(ContentStream::new());
        let page = root.add(Page::new(pages, contents, 595.0, 842.0));
        root.attach(contents).unwrap();
        root.get_mut::<PageCollection>(pages).unwrap().push(page);
        entries.push(
            root.append_outline(outlines, format!("Section {}", i + 1), page)
                .unwrap(),
        );
    }
    root.attach(pages).unwrap();
    let catalog = root.add(Catalog::new(outlines, pages));
    root.set_catalog(catalog);

    assert_eq!(root.outline_chain(outlines).unwrap(), entries);
    let collection = root.get::<OutlineCollection>(outlines).unwrap();
    assert_eq!(collection.count(), 5);
    assert_eq!(collection.first(), entries.first().copied());
    assert_eq!(collection.last(), entries.last().copied());

    for pair in entries.windows(2) {
        let a = root.get::<OutlineEntry>(pair[0]).unwrap();
        let b = root.get::<OutlineEntry>(pair[1]).unwrap();
        assert_eq!(a.next(), Some(pair[1]));
        assert_eq!(b.prev(), Some(pair[0]));
    }

    let doc = root.serialize().unwrap();
    let summary = inspect_bytes(doc.text.as_bytes()).unwrap();
    assert_eq!(summary.page_count, 5);
    assert_eq!(summary.outline_count, 5);
    assert!(doc.text.contains("/Title (Section 3)\n"));
    assert!(doc.text.contains("/FitH 842]"));
}
