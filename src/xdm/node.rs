//! Node handles

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::axis::{self, AxisIter};
use super::{non_empty, uri, QNameRef};
use crate::config::EventOptions;
use crate::dom::{ns, Builder, Document, DocumentView, InScopeNamespaces, NodeData, NodeId, NodeKind, NodeRecord};
use crate::error::BuildError;
use crate::sax::{player, EventHandler, TypeRef};
use crate::xpath::{attributes_of, navigate, Axis, NodeTest};

/// Handle to a document, element, text, comment or processing instruction
#[derive(Clone)]
pub struct Node {
    document: Document,
    id: NodeId,
}

impl Node {
    pub(crate) fn new(document: Document, id: NodeId) -> Self {
        Node { document, id }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Position in the node array
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    fn view(&self) -> DocumentView<'_> {
        self.document.view()
    }

    fn record(&self) -> &NodeRecord {
        &self.view().nodes()[self.id as usize]
    }

    pub fn kind(&self) -> NodeKind {
        self.record().kind()
    }

    pub fn depth(&self) -> u32 {
        self.record().depth
    }

    /// Element name, or the target of a processing instruction
    pub fn name(&self) -> Option<QNameRef<'_>> {
        let view = self.view();
        match self.record().data {
            NodeData::Element { name, .. } => Some(QNameRef {
                prefix: view.str(name.prefix),
                uri: view.str(name.uri),
                local: view.str(name.local),
            }),
            NodeData::ProcessingInstruction { target, .. } => Some(QNameRef {
                prefix: "",
                uri: "",
                local: view.str(target),
            }),
            _ => None,
        }
    }

    pub fn local_name(&self) -> Option<&str> {
        self.name().map(|n| n.local)
    }

    pub fn namespace_uri(&self) -> Option<&str> {
        self.name().and_then(|n| non_empty(n.uri))
    }

    pub fn prefix(&self) -> Option<&str> {
        self.name().and_then(|n| non_empty(n.prefix))
    }

    /// Payload of a text, comment or processing instruction node
    pub fn value(&self) -> Option<&str> {
        let view = self.view();
        self.record().value().map(|v| view.str(v))
    }

    /// XDM string value
    pub fn string_value(&self) -> String {
        match self.record().data {
            NodeData::Document { .. } | NodeData::Element { .. } => self.view().descendant_text(self.id),
            _ => self.value().unwrap_or_default().to_string(),
        }
    }

    /// Schema type: stored for elements, `xs:untypedAtomic` for text
    pub fn type_name(&self) -> Option<TypeRef<'_>> {
        let view = self.view();
        match self.record().data {
            NodeData::Element { type_name, .. } => Some(TypeRef::new(view.str(type_name.uri), view.str(type_name.local))),
            NodeData::Text { .. } => Some(TypeRef::UNTYPED_ATOMIC),
            _ => None,
        }
    }

    pub fn document_uri(&self) -> Option<&str> {
        let view = self.view();
        match self.record().data {
            NodeData::Document { uri, .. } => non_empty(view.str(uri)),
            _ => None,
        }
    }

    pub fn encoding(&self) -> Option<&str> {
        let view = self.view();
        match self.record().data {
            NodeData::Document { encoding, .. } => non_empty(view.str(encoding)),
            _ => None,
        }
    }

    /// Base URI: the document URI, adjusted by each `xml:base` attribute
    /// from the top of the tree down to this node
    pub fn base_uri(&self) -> Option<String> {
        let view = self.view();
        let xml_base = NodeTest::attribute(Some(ns::XML), Some("base"));
        let mut base: Option<String> = None;
        for id in navigate(&view, self.id, Axis::AncestorOrSelf).into_iter().rev() {
            match view.nodes()[id as usize].data {
                NodeData::Document { uri, .. } => base = non_empty(view.str(uri)).map(str::to_string),
                NodeData::Element { .. } => {
                    let value = attributes_of(&view, id)
                        .into_iter()
                        .find(|&a| xml_base.matches_attribute(&view, a))
                        .and_then(|a| view.attribute(a))
                        .and_then(|a| non_empty(view.str(a.value)));
                    if let Some(value) = value {
                        base = Some(match base {
                            Some(outer) => uri::resolve(&outer, value),
                            None => value.to_string(),
                        });
                    }
                }
                _ => {}
            }
        }
        base
    }

    /// URI bound to `prefix` in this element's scope. The empty prefix
    /// looks up the default namespace.
    pub fn lookup_namespace_uri(&self, prefix: &str) -> Option<&str> {
        let view = self.view();
        let test = NodeTest::namespace(Some(prefix));
        let mut walk = InScopeNamespaces::new(self.id, true);
        while let Some(binding) = walk.next(&view) {
            if test.matches_namespace(&view, binding.prefix) {
                return Some(view.str(binding.uri));
            }
        }
        None
    }

    /// `Some(false)` for elements, which are never nilled here; `None` for other kinds
    pub fn nilled(&self) -> Option<bool> {
        self.record().is_element().then_some(false)
    }

    pub fn parent(&self) -> Option<Node> {
        self.view()
            .parent(self.id)
            .map(|p| Node::new(self.document.clone(), p))
    }

    /// Topmost node of the tree, which is always the first record
    pub fn root(&self) -> Node {
        Node::new(self.document.clone(), 0)
    }

    pub fn children(&self) -> AxisIter {
        self.axis(Axis::Child, None)
    }

    pub fn attributes(&self) -> AxisIter {
        self.axis(Axis::Attribute, None)
    }

    /// In-scope namespaces, including the implicit `xml` binding
    pub fn namespaces(&self) -> AxisIter {
        self.axis(Axis::Namespace, None)
    }

    /// Iterate an axis, keeping only items that pass `test`
    pub fn axis(&self, axis: Axis, test: Option<NodeTest>) -> AxisIter {
        axis::from_node(self, axis, test)
    }

    /// Replay this subtree as events
    pub fn to_events<H>(&self, handler: &mut H, options: EventOptions) -> Result<(), H::Error>
    where
        H: EventHandler + ?Sized,
    {
        player::node_events(&self.view(), self.id, handler, options)
    }

    /// Copy this subtree into a new document
    pub fn copy_to_document(&self, options: EventOptions) -> Result<Document, BuildError> {
        let mut builder = Builder::new();
        self.to_events(&mut builder, options)?;
        builder.finish()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.document.ptr_eq(&other.document)
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.document.id().hash(state);
        self.id.hash(state);
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Document order; nodes of different documents order by document id
impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.document.id(), self.id).cmp(&(other.document.id(), other.id))
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Node");
        s.field("document", &self.document.id())
            .field("id", &self.id)
            .field("kind", &self.kind());
        if let Some(name) = self.name() {
            s.field("name", &name.to_string());
        }
        s.finish()
    }
}
