//! Node handles, object numbers and the render capability shared by all
//! structural objects.

use crate::error::{Error, Result};
use std::fmt;

use super::content::ContentStream;
use super::outline::{OutlineCollection, OutlineEntry};
use super::structure::{Catalog, FontResource, Info, Page, PageCollection};

/// Arena handle of a node inside a [`DocumentRoot`](super::DocumentRoot).
///
/// A handle exists as soon as a node is created; it only gains an
/// [`ObjectNumber`] once the node is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Object number assigned on attachment (1-based, contiguous).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectNumber(pub u32);

impl ObjectNumber {
    /// Indirect reference syntax, e.g. `12 0 R`.
    pub fn reference(&self) -> String {
        format!("{} 0 R", self.0)
    }
}

impl fmt::Display for ObjectNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lookup of assigned object numbers, handed to nodes while they render.
#[derive(Debug, Clone, Copy)]
pub struct References<'a> {
    numbers: &'a [Option<ObjectNumber>],
}

impl<'a> References<'a> {
    pub(crate) fn new(numbers: &'a [Option<ObjectNumber>]) -> Self {
        Self { numbers }
    }

    /// Object number of `id`, if it has been attached.
    pub fn number(&self, id: NodeId) -> Option<ObjectNumber> {
        self.numbers.get(id.0).copied().flatten()
    }

    /// Indirect reference to `id`, or a [`Error::ReferentialIntegrity`]
    /// naming the rendering node and the kind of node it expected.
    pub fn reference(&self, id: NodeId, node: &'static str, expected: &'static str) -> Result<String> {
        match self.number(id) {
            Some(number) => Ok(number.reference()),
            None => {
                log::error!(
                    "{} references {} (node {:?}) which was never attached",
                    node,
                    expected,
                    id
                );
                Err(Error::ReferentialIntegrity { node, expected })
            }
        }
    }
}

/// A structural object that renders itself to a numbered object block.
pub trait PdfObject {
    /// Node kind, used in diagnostics.
    fn kind(&self) -> &'static str;

    /// Everything between `N 0 obj` and `endobj`.
    fn render_body(&self, refs: &References<'_>) -> Result<String>;

    /// The complete object block, header and trailer included.
    fn render(&self, number: ObjectNumber, refs: &References<'_>) -> Result<String> {
        let body = self.render_body(refs)?;
        Ok(format!("{} 0 obj\n{}endobj\n", number, body))
    }
}

/// The closed set of structural nodes.
#[derive(Debug, Clone)]
pub enum Node {
    /// Document information dictionary
    Info(Info),
    /// Font resource
    Font(FontResource),
    /// Outline (bookmark) collection
    Outlines(OutlineCollection),
    /// Single outline entry
    Outline(OutlineEntry),
    /// Page tree root
    Pages(PageCollection),
    /// Single page
    Page(Page),
    /// Page content stream
    Content(ContentStream),
    /// Document catalog
    Catalog(Catalog),
}

impl Node {
    /// Dispatch to the variant's [`PdfObject`] implementation.
    pub fn as_object(&self) -> &dyn PdfObject {
        match self {
            Node::Info(n) => n,
            Node::Font(n) => n,
            Node::Outlines(n) => n,
            Node::Outline(n) => n,
            Node::Pages(n) => n,
            Node::Page(n) => n,
            Node::Content(n) => n,
            Node::Catalog(n) => n,
        }
    }

    /// Node kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        self.as_object().kind()
    }
}

/// Typed access to a [`Node`] variant.
pub trait NodeKind: Sized {
    /// Kind name used in error messages.
    const KIND: &'static str;
    /// Borrow the variant, if `node` is one.
    fn from_node(node: &Node) -> Option<&Self>;
    /// Mutably borrow the variant, if `node` is one.
    fn from_node_mut(node: &mut Node) -> Option<&mut Self>;
}

macro_rules! node_kind {
    ($ty:ty, $variant:ident, $name:literal) => {
        impl NodeKind for $ty {
            const KIND: &'static str = $name;

            fn from_node(node: &Node) -> Option<&Self> {
                match node {
                    Node::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn from_node_mut(node: &mut Node) -> Option<&mut Self> {
                match node {
                    Node::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }

        impl From<$ty> for Node {
            fn from(inner: $ty) -> Self {
                Node::$variant(inner)
            }
        }
    };
}

node_kind!(Info, Info, "Info");
node_kind!(FontResource, Font, "FontResource");
node_kind!(OutlineCollection, Outlines, "OutlineCollection");
node_kind!(OutlineEntry, Outline, "OutlineEntry");
node_kind!(PageCollection, Pages, "PageCollection");
node_kind!(Page, Page, "Page");
node_kind!(ContentStream, Content, "ContentStream");
node_kind!(Catalog, Catalog, "Catalog");

/// Format a number compactly and deterministically (at most 3 decimals).
pub fn fmt_num(value: f64) -> String {
    let mut s = format!("{:.3}", value);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}
