//! Finalized Document
//!
//! A `Document` is the frozen, shared form of the three record arrays.
//! `DocumentView` is the borrowed read interface every traversal works
//! through; the builder hands out the same view over its growing arrays.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::record::{AttrId, AttributeRecord, NamespaceRecord, NodeData, NodeId, NodeRecord, NsId};
use super::strings::{StrId, StringPool};
use crate::xdm::{Attribute, NamespaceNode, Node};

static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Borrowed view over the record arrays of a document
#[derive(Clone, Copy)]
pub struct DocumentView<'a> {
    nodes: &'a [NodeRecord],
    attributes: &'a [AttributeRecord],
    namespaces: &'a [NamespaceRecord],
    strings: &'a StringPool,
}

impl<'a> DocumentView<'a> {
    pub(crate) fn new(
        nodes: &'a [NodeRecord],
        attributes: &'a [AttributeRecord],
        namespaces: &'a [NamespaceRecord],
        strings: &'a StringPool,
    ) -> Self {
        DocumentView {
            nodes,
            attributes,
            namespaces,
            strings,
        }
    }

    /// Get a node record by position
    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&'a NodeRecord> {
        self.nodes.get(id as usize)
    }

    /// Get an attribute record by position
    #[inline]
    pub fn attribute(&self, id: AttrId) -> Option<&'a AttributeRecord> {
        self.attributes.get(id as usize)
    }

    /// Get a namespace record by position
    #[inline]
    pub fn namespace(&self, id: NsId) -> Option<&'a NamespaceRecord> {
        self.namespaces.get(id as usize)
    }

    /// Resolve an interned string
    #[inline]
    pub fn str(&self, id: StrId) -> &'a str {
        self.strings.get(id)
    }

    /// The string pool backing every `StrId` in this view
    pub fn strings(&self) -> &'a StringPool {
        self.strings
    }

    /// Raw node array, including the trailing marker once finalized
    pub fn nodes(&self) -> &'a [NodeRecord] {
        self.nodes
    }

    /// Raw attribute array, including the trailing sentinel once finalized
    pub fn attributes(&self) -> &'a [AttributeRecord] {
        self.attributes
    }

    /// Raw namespace array, including the trailing sentinel once finalized
    pub fn namespaces(&self) -> &'a [NamespaceRecord] {
        self.namespaces
    }

    /// Depth of a node
    #[inline]
    pub fn depth(&self, id: NodeId) -> Option<u32> {
        self.node(id).map(|n| n.depth)
    }

    /// Parent of a node: the nearest preceding record that is shallower
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        let depth = self.node(id)?.depth;
        if depth == 0 {
            return None;
        }
        let mut pos = id;
        loop {
            pos = pos.checked_sub(1)?;
            if self.nodes[pos as usize].depth < depth {
                return Some(pos);
            }
        }
    }

    /// Attribute run owned by an element, in array order
    pub fn attribute_run(&self, owner: NodeId) -> impl Iterator<Item = (AttrId, &'a AttributeRecord)> + 'a {
        let attributes = self.attributes;
        let start = self.node(owner).and_then(|n| n.first_attribute());
        start
            .into_iter()
            .flat_map(move |first| (first..).map_while(move |id| attributes.get(id as usize).map(|a| (id, a))))
            .take_while(move |(_, a)| a.owner == Some(owner))
    }

    /// Namespace declaration run owned by an element, in array order
    pub fn namespace_run(&self, owner: NodeId) -> impl Iterator<Item = (NsId, &'a NamespaceRecord)> + 'a {
        let namespaces = self.namespaces;
        let start = self.node(owner).and_then(|n| n.first_namespace());
        start
            .into_iter()
            .flat_map(move |first| (first..).map_while(move |id| namespaces.get(id as usize).map(|n| (id, n))))
            .take_while(move |(_, n)| n.owner == Some(owner))
    }

    /// Concatenated text of all descendant text nodes
    pub fn descendant_text(&self, id: NodeId) -> String {
        let Some(node) = self.node(id) else {
            return String::new();
        };
        let mut out = String::new();
        for record in self.nodes[id as usize + 1..].iter().take_while(|n| n.depth > node.depth) {
            if let NodeData::Text { value } = record.data {
                out.push_str(self.str(value));
            }
        }
        out
    }
}

impl fmt::Debug for DocumentView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentView")
            .field("nodes", &self.nodes.len())
            .field("attributes", &self.attributes.len())
            .field("namespaces", &self.namespaces.len())
            .finish()
    }
}

/// Frozen storage shared by every handle into a document
struct DocumentData {
    id: u64,
    nodes: Box<[NodeRecord]>,
    attributes: Box<[AttributeRecord]>,
    namespaces: Box<[NamespaceRecord]>,
    strings: StringPool,
}

/// An immutable, finalized document.
///
/// Cloning is cheap: all clones share one allocation, released when the last
/// clone (or handle into the document) is dropped.
#[derive(Clone)]
pub struct Document {
    inner: Arc<DocumentData>,
}

impl Document {
    /// Freeze finalized arrays. Each non-empty array must already end with
    /// its sentinel.
    pub(crate) fn freeze(
        nodes: Vec<NodeRecord>,
        attributes: Vec<AttributeRecord>,
        namespaces: Vec<NamespaceRecord>,
        strings: StringPool,
    ) -> Self {
        let id = NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed);
        Document {
            inner: Arc::new(DocumentData {
                id,
                nodes: nodes.into_boxed_slice(),
                attributes: attributes.into_boxed_slice(),
                namespaces: namespaces.into_boxed_slice(),
                strings,
            }),
        }
    }

    /// Process-wide unique id, increasing in creation order
    #[inline]
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Read access to the record arrays
    #[inline]
    pub fn view(&self) -> DocumentView<'_> {
        DocumentView::new(
            &self.inner.nodes,
            &self.inner.attributes,
            &self.inner.namespaces,
            &self.inner.strings,
        )
    }

    /// Number of nodes, excluding the marker
    pub fn node_count(&self) -> usize {
        self.inner.nodes.len().saturating_sub(1)
    }

    /// Number of attributes, excluding the sentinel
    pub fn attribute_count(&self) -> usize {
        self.inner.attributes.len().saturating_sub(1)
    }

    /// Number of namespace declarations, excluding the sentinel
    pub fn namespace_count(&self) -> usize {
        self.inner.namespaces.len().saturating_sub(1)
    }

    /// Handle to the top-level node
    pub fn root(&self) -> Option<Node> {
        self.node(0)
    }

    /// Handle to the node at a position
    pub fn node(&self, id: NodeId) -> Option<Node> {
        if (id as usize) < self.node_count() {
            Some(Node::new(self.clone(), id))
        } else {
            None
        }
    }

    /// Handle to the attribute at a position
    pub fn attribute(&self, id: AttrId) -> Option<Attribute> {
        if (id as usize) < self.attribute_count() {
            Some(Attribute::new(self.clone(), id))
        } else {
            None
        }
    }

    /// The namespace node of a namespace-only document
    pub fn parentless_namespace(&self) -> Option<NamespaceNode> {
        if self.node_count() != 0 || self.namespace_count() == 0 {
            return None;
        }
        let record = self.inner.namespaces.first()?;
        Some(NamespaceNode::parentless(self.clone(), record.prefix, record.uri))
    }

    /// Whether two values refer to the same document
    #[inline]
    pub fn ptr_eq(&self, other: &Document) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Document {}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("id", &self.id())
            .field("nodes", &self.node_count())
            .field("attributes", &self.attribute_count())
            .field("namespaces", &self.namespace_count())
            .finish()
    }
}
