//! The document root: node arena, object numbering and cross-reference
//! serialization.
//!
//! Nodes are created into an arena and numbered when attached. Numbers
//! follow attachment order exactly, starting at 1, which is also the order
//! in which object blocks are written. Serialization records the byte
//! offset of every block before appending it, so each cross-reference
//! entry points at the first byte of its `N 0 obj` header.

use crate::error::{Error, Result};

use super::object::{Node, NodeId, NodeKind, ObjectNumber, References};
use super::outline::{OutlineCollection, OutlineEntry};
use super::structure::{Catalog, Info};

/// File header version.
pub const PDF_VERSION: &str = "1.4";

/// Owner of every structural node and of the numbering counter.
#[derive(Debug, Clone, Default)]
pub struct DocumentRoot {
    nodes: Vec<Node>,
    numbers: Vec<Option<ObjectNumber>>,
    order: Vec<NodeId>,
    catalog: Option<NodeId>,
    info: Option<NodeId>,
}

/// Output of [`DocumentRoot::serialize`].
#[derive(Debug, Clone)]
pub struct SerializedDocument {
    /// Complete file contents (pure ASCII)
    pub text: String,
    /// Byte offset of each object, indexed by `number - 1`
    pub offsets: Vec<usize>,
    /// Byte offset of the `xref` keyword
    pub startxref: usize,
}

impl SerializedDocument {
    /// Consume into raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.text.into_bytes()
    }
}

impl DocumentRoot {
    /// Create an empty root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a node in the arena without numbering it.
    pub fn create(&mut self, node: impl Into<Node>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node.into());
        self.numbers.push(None);
        id
    }

    /// Assign the next object number to a created node.
    ///
    /// Attaching twice is an assembly-order defect.
    pub fn attach(&mut self, id: NodeId) -> Result<ObjectNumber> {
        let node = self
            .nodes
            .get(id.0)
            .ok_or_else(|| Error::AssemblyInvariant(format!("unknown node {:?}", id)))?;
        if let Some(number) = self.numbers[id.0] {
            return Err(Error::AssemblyInvariant(format!(
                "{} already attached as object {}",
                node.kind(),
                number
            )));
        }
        Ok(self.assign(id))
    }

    /// Create and attach in one step.
    pub fn add(&mut self, node: impl Into<Node>) -> NodeId {
        let id = self.create(node);
        self.assign(id);
        id
    }

    fn assign(&mut self, id: NodeId) -> ObjectNumber {
        let next = ObjectNumber(self.order.len() as u32 + 1);
        self.numbers[id.0] = Some(next);
        self.order.push(id);
        next
    }

    /// Register the catalog referenced from the trailer's `/Root`.
    pub fn set_catalog(&mut self, id: NodeId) {
        self.catalog = Some(id);
    }

    /// Register the info dictionary referenced from the trailer's `/Info`.
    pub fn set_info(&mut self, id: NodeId) {
        self.info = Some(id);
    }

    /// Object number of a node, if attached.
    pub fn number(&self, id: NodeId) -> Option<ObjectNumber> {
        self.numbers.get(id.0).copied().flatten()
    }

    /// Number of attached objects.
    pub fn object_count(&self) -> usize {
        self.order.len()
    }

    /// Attached nodes in numbering order.
    pub fn attached(&self) -> impl Iterator<Item = (ObjectNumber, &Node)> + '_ {
        self.order
            .iter()
            .filter_map(move |id| self.number(*id).map(|n| (n, &self.nodes[id.0])))
    }

    /// Borrow a node as a specific kind.
    pub fn get<T: NodeKind>(&self, id: NodeId) -> Result<&T> {
        let node = self
            .nodes
            .get(id.0)
            .ok_or_else(|| Error::AssemblyInvariant(format!("unknown node {:?}", id)))?;
        T::from_node(node).ok_or_else(|| {
            Error::AssemblyInvariant(format!(
                "node {:?} is a {}, expected {}",
                id,
                node.kind(),
                T::KIND
            ))
        })
    }

    /// Mutably borrow a node as a specific kind.
    pub fn get_mut<T: NodeKind>(&mut self, id: NodeId) -> Result<&mut T> {
        let node = self
            .nodes
            .get_mut(id.0)
            .ok_or_else(|| Error::AssemblyInvariant(format!("unknown node {:?}", id)))?;
        let kind = node.kind();
        T::from_node_mut(node).ok_or_else(|| {
            Error::AssemblyInvariant(format!(
                "node {:?} is a {}, expected {}",
                id,
                kind,
                T::KIND
            ))
        })
    }

    /// Number lookup handed to nodes while rendering.
    pub fn references(&self) -> References<'_> {
        References::new(&self.numbers)
    }

    /// Check render-time invariants before any byte is produced.
    pub fn validate(&self) -> Result<()> {
        if self.order.is_empty() {
            return Err(Error::AssemblyInvariant("document has no objects".into()));
        }
        let catalog = self
            .catalog
            .ok_or_else(|| Error::AssemblyInvariant("catalog is not set".into()))?;
        let info = self
            .info
            .ok_or_else(|| Error::AssemblyInvariant("info is not set".into()))?;
        self.get::<Catalog>(catalog)?;
        self.get::<Info>(info)?;
        if self.number(catalog).is_none() {
            return Err(Error::AssemblyInvariant("catalog is not attached".into()));
        }
        if self.number(info).is_none() {
            return Err(Error::AssemblyInvariant("info is not attached".into()));
        }

        for (_, node) in self.attached() {
            if let Node::Outline(entry) = node {
                self.validate_outline(entry)?;
            }
        }
        Ok(())
    }

    fn validate_outline(&self, entry: &OutlineEntry) -> Result<()> {
        let collection = self.get::<OutlineCollection>(entry.parent())?;
        if collection.count() > 1 && entry.prev().is_none() && entry.next().is_none() {
            return Err(Error::AssemblyInvariant(format!(
                "outline '{}' is unlinked in a chain of {}",
                entry.title(),
                collection.count()
            )));
        }
        Ok(())
    }

    /// Render every attached object and build the cross-reference table
    /// and trailer.
    pub fn serialize(&self) -> Result<SerializedDocument> {
        self.validate()?;
        let refs = self.references();

        let mut text = format!("%PDF-{}\n", PDF_VERSION);
        let mut offsets = Vec::with_capacity(self.order.len());
        for (number, node) in self.attached() {
            let block = node.as_object().render(number, &refs)?;
            offsets.push(text.len());
            text.push_str(&block);
            text.push('\n');
        }

        let startxref = text.len();
        let size = self.order.len() + 1;
        text.push_str(&format!("xref\n0 {}\n", size));
        text.push_str("0000000000 65535 f \n");
        for offset in &offsets {
            text.push_str(&format!("{:010} 00000 n \n", offset));
        }

        // validate() guarantees both are attached.
        let root_ref = refs.reference(self.catalog_id()?, "Trailer", "Catalog")?;
        let info_ref = refs.reference(self.info_id()?, "Trailer", "Info")?;
        text.push_str(&format!(
            "trailer\n<<\n  /Size {}\n  /Root {}\n  /Info {}\n>>\nstartxref\n{}\n%%EOF\n",
            size, root_ref, info_ref, startxref
        ));

        log::debug!(
            "Serialized {} objects, {} bytes, xref at {}",
            self.order.len(),
            text.len(),
            startxref
        );

        Ok(SerializedDocument {
            text,
            offsets,
            startxref,
        })
    }

    fn catalog_id(&self) -> Result<NodeId> {
        self.catalog
            .ok_or_else(|| Error::AssemblyInvariant("catalog is not set".into()))
    }

    fn info_id(&self) -> Result<NodeId> {
        self.info
            .ok_or_else(|| Error::AssemblyInvariant("info is not set".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::{ContentStream, FontResource, Page, PageCollection};
    use crate::text::FontVariant;

    fn minimal_root() -> DocumentRoot {
        let mut root = DocumentRoot::new();
        let info = root.add(Info::with_title("Test"));
        root.set_info(info);
        let font = root.add(FontResource::builtin(FontVariant::Helvetica));
        let outlines = root.add(OutlineCollection::new());
        let pages = root.create(PageCollection::new());
        let contents = root.create(ContentStream::new());
        let page = root.add(Page::new(pages, contents, 612.0, 792.0).with_font("F1", font));
        root.attach(contents).unwrap();
        root.get_mut::<PageCollection>(pages).unwrap().push(page);
        root.append_outline(outlines, "Page 1", page).unwrap();
        root.attach(pages).unwrap();
        let catalog = root.add(Catalog::new(outlines, pages));
        root.set_catalog(catalog);
        root
    }

    #[test]
    fn test_numbers_follow_attachment_order() {
        let mut root = DocumentRoot::new();
        let a = root.create(Info::default());
        let b = root.add(OutlineCollection::new());
        assert_eq!(root.attach(a).unwrap(), ObjectNumber(2));
        assert_eq!(root.number(b), Some(ObjectNumber(1)));

        let numbers: Vec<u32> = root.attached().map(|(n, _)| n.0).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_double_attach_rejected() {
        let mut root = DocumentRoot::new();
        let a = root.add(Info::default());
        assert!(matches!(root.attach(a), Err(Error::AssemblyInvariant(_))));
    }

    #[test]
    fn test_missing_catalog_or_info() {
        let root = DocumentRoot::new();
        assert!(matches!(root.serialize(), Err(Error::AssemblyInvariant(_))));

        let mut root = DocumentRoot::new();
        let info = root.add(Info::default());
        root.set_info(info);
        let err = root.serialize().unwrap_err();
        assert!(err.to_string().contains("catalog"));
    }

    #[test]
    fn test_unattached_reference_is_integrity_error() {
        let mut root = DocumentRoot::new();
        let info = root.add(Info::default());
        root.set_info(info);
        let outlines = root.add(OutlineCollection::new());
        let pages = root.create(PageCollection::new());
        let catalog = root.add(Catalog::new(outlines, pages));
        root.set_catalog(catalog);

        let err = root.serialize().unwrap_err();
        assert!(matches!(
            err,
            Error::ReferentialIntegrity {
                node: "Catalog",
                expected: "PageCollection"
            }
        ));
    }

    #[test]
    fn test_offsets_point_at_objects() {
        let doc = minimal_root().serialize().unwrap();
        for (index, offset) in doc.offsets.iter().enumerate() {
            let header = format!("{} 0 obj\n", index + 1);
            assert!(doc.text[*offset..].starts_with(&header));
        }
        assert!(doc.text[doc.startxref..].starts_with("xref\n0 9\n"));
        assert!(doc.text.ends_with(&format!("startxref\n{}\n%%EOF\n", doc.startxref)));
        assert!(doc.text.contains("/Root 8 0 R\n"));
        assert!(doc.text.contains("/Info 1 0 R\n"));
    }

    #[test]
    fn test_serialize_is_deterministic() {
        let a = minimal_root().serialize().unwrap();
        let b = minimal_root().serialize().unwrap();
        assert_eq!(a.text, b.text);
    }
}
