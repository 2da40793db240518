//! Outline (bookmark) collection and its doubly-linked entries.
//!
//! Entries live in the document arena; links are [`NodeId`] handles, so the
//! chain never owns its neighbours.

use crate::error::Result;
use crate::text::pdf_literal;

use super::document::DocumentRoot;
use super::object::{fmt_num, NodeId, PdfObject, References};
use super::structure::Page;

/// Root of the outline chain.
#[derive(Debug, Clone, Default)]
pub struct OutlineCollection {
    first: Option<NodeId>,
    last: Option<NodeId>,
    count: usize,
}

impl OutlineCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// First entry of the chain.
    pub fn first(&self) -> Option<NodeId> {
        self.first
    }

    /// Last entry of the chain.
    pub fn last(&self) -> Option<NodeId> {
        self.last
    }

    /// Number of entries.
    pub fn count(&self) -> usize {
        self.count
    }
}

impl PdfObject for OutlineCollection {
    fn kind(&self) -> &'static str {
        "OutlineCollection"
    }

    fn render_body(&self, refs: &References<'_>) -> Result<String> {
        let mut out = String::from("<<\n  /Type /Outlines\n");
        if let (Some(first), Some(last)) = (self.first, self.last) {
            out.push_str(&format!(
                "  /First {}\n  /Last {}\n",
                refs.reference(first, self.kind(), "OutlineEntry")?,
                refs.reference(last, self.kind(), "OutlineEntry")?
            ));
        }
        out.push_str(&format!("  /Count {}\n>>\n", self.count));
        Ok(out)
    }
}

/// One bookmark pointing at a page.
#[derive(Debug, Clone)]
pub struct OutlineEntry {
    title: String,
    parent: NodeId,
    page: NodeId,
    top: f64,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

impl OutlineEntry {
    /// Bookmark title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Owning collection.
    pub fn parent(&self) -> NodeId {
        self.parent
    }

    /// Target page.
    pub fn page(&self) -> NodeId {
        self.page
    }

    /// Previous entry in the chain.
    pub fn prev(&self) -> Option<NodeId> {
        self.prev
    }

    /// Next entry in the chain.
    pub fn next(&self) -> Option<NodeId> {
        self.next
    }
}

impl PdfObject for OutlineEntry {
    fn kind(&self) -> &'static str {
        "OutlineEntry"
    }

    fn render_body(&self, refs: &References<'_>) -> Result<String> {
        let mut out = format!(
            "<<\n  /Title {}\n  /Parent {}\n",
            pdf_literal(&self.title),
            refs.reference(self.parent, self.kind(), "OutlineCollection")?
        );
        // Absent neighbours are omitted rather than written as null.
        if let Some(prev) = self.prev {
            out.push_str(&format!(
                "  /Prev {}\n",
                refs.reference(prev, self.kind(), "OutlineEntry")?
            ));
        }
        if let Some(next) = self.next {
            out.push_str(&format!(
                "  /Next {}\n",
                refs.reference(next, self.kind(), "OutlineEntry")?
            ));
        }
        out.push_str(&format!(
            "  /Dest [{} /FitH {}]\n>>\n",
            refs.reference(self.page, self.kind(), "Page")?,
            fmt_num(self.top)
        ));
        Ok(out)
    }
}

impl DocumentRoot {
    /// Append a bookmark for `page` to the chain rooted at `collection`.
    ///
    /// The entry is attached immediately, linked after the current tail, and
    /// becomes the new tail.
    pub fn append_outline(
        &mut self,
        collection: NodeId,
        title: impl Into<String>,
        page: NodeId,
    ) -> Result<NodeId> {
        let top = self.get::<Page>(page)?.height;
        let prev = self.get::<OutlineCollection>(collection)?.last;

        let entry = OutlineEntry {
            title: title.into(),
            parent: collection,
            page,
            top,
            prev,
            next: None,
        };
        let id = self.add(entry);

        if let Some(tail) = prev {
            self.get_mut::<OutlineEntry>(tail)?.next = Some(id);
        }

        let outlines = self.get_mut::<OutlineCollection>(collection)?;
        if outlines.first.is_none() {
            outlines.first = Some(id);
        }
        outlines.last = Some(id);
        outlines.count += 1;

        Ok(id)
    }

    /// Walk the chain from `First` following `/Next`.
    pub fn outline_chain(&self, collection: NodeId) -> Result<Vec<NodeId>> {
        let outlines = self.get::<OutlineCollection>(collection)?;
        let mut chain = Vec::with_capacity(outlines.count);
        let mut cursor = outlines.first;
        while let Some(id) = cursor {
            if chain.len() > outlines.count {
                break;
            }
            chain.push(id);
            cursor = self.get::<OutlineEntry>(id)?.next;
        }
        Ok(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::{ContentStream, PageCollection};

    fn root_with_pages(n: usize) -> (DocumentRoot, NodeId, Vec<NodeId>) {
        let mut root = DocumentRoot::new();
        let outlines = root.add(OutlineCollection::new());
        let parent = root.create(PageCollection::new());
        let pages = (0..n)
            .map(|_| {
                let contents = root.create(ContentStream::new());
                root.add(Page::new(parent, contents, 612.0, 792.0))
            })
            .collect();
        (root, outlines, pages)
    }

    #[test]
    fn test_chain_links() {
        let (mut root, outlines, pages) = root_with_pages(3);
        let a = root.append_outline(outlines, "A", pages[0]).unwrap();
        let b = root.append_outline(outlines, "B", pages[1]).unwrap();
        let c = root.append_outline(outlines, "C", pages[2]).unwrap();

        let collection = root.get::<OutlineCollection>(outlines).unwrap();
        assert_eq!(collection.first(), Some(a));
        assert_eq!(collection.last(), Some(c));
        assert_eq!(collection.count(), 3);

        let entry_b = root.get::<OutlineEntry>(b).unwrap();
        assert_eq!(entry_b.prev(), Some(a));
        assert_eq!(entry_b.next(), Some(c));
        assert_eq!(root.outline_chain(outlines).unwrap(), vec![a, b, c]);
    }

    #[test]
    fn test_single_entry_has_no_links() {
        let (mut root, outlines, pages) = root_with_pages(1);
        let a = root.append_outline(outlines, "Only", pages[0]).unwrap();
        let entry = root.get::<OutlineEntry>(a).unwrap();
        assert!(entry.prev().is_none());
        assert!(entry.next().is_none());
    }

    #[test]
    fn test_render_omits_missing_neighbours() {
        let (mut root, outlines, pages) = root_with_pages(2);
        let a = root.append_outline(outlines, "First (1)", pages[0]).unwrap();
        root.append_outline(outlines, "Second", pages[1]).unwrap();

        let entry = root.get::<OutlineEntry>(a).unwrap();
        let body = entry.render_body(&root.references()).unwrap();
        assert!(body.contains("/Title (First \\(1\\))\n"));
        assert!(!body.contains("/Prev"));
        assert!(body.contains("/Next "));
        assert!(body.contains("/FitH 792]"));
    }

    #[test]
    fn test_empty_collection() {
        let collection = OutlineCollection::new();
        let body = collection.render_body(&References::new(&[])).unwrap();
        assert_eq!(body, "<<\n  /Type /Outlines\n  /Count 0\n>>\n");
    }
}
