//! Namespace node handles

use std::fmt;
use std::hash::{Hash, Hasher};

use super::axis::{self, AxisIter};
use super::{non_empty, Node};
use crate::config::EventOptions;
use crate::dom::{Binding, Builder, Document, NodeId, StrId};
use crate::error::BuildError;
use crate::sax::EventHandler;
use crate::xpath::{Axis, NodeTest};

/// A prefix binding seen from an element, or the only content of a
/// namespace-only document.
///
/// Namespace nodes of an element are produced by its namespace axis; two
/// handles are equal when they come from the same element at the same
/// position of that walk.
#[derive(Clone)]
pub struct NamespaceNode {
    document: Document,
    owner: Option<NodeId>,
    prefix: StrId,
    uri: StrId,
    order: u32,
}

impl NamespaceNode {
    pub(crate) fn new(document: Document, owner: NodeId, binding: Binding) -> Self {
        NamespaceNode {
            document,
            owner: Some(owner),
            prefix: binding.prefix,
            uri: binding.uri,
            order: binding.order,
        }
    }

    pub(crate) fn parentless(document: Document, prefix: StrId, uri: StrId) -> Self {
        NamespaceNode {
            document,
            owner: None,
            prefix,
            uri,
            order: 0,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub(crate) fn owner_id(&self) -> Option<NodeId> {
        self.owner
    }

    pub(crate) fn prefix_id(&self) -> StrId {
        self.prefix
    }

    /// Element whose namespace axis produced this node
    pub fn owner(&self) -> Option<Node> {
        self.owner.map(|o| Node::new(self.document.clone(), o))
    }

    /// Position in the owner's namespace walk
    pub fn order(&self) -> u32 {
        self.order
    }

    /// Bound prefix; `None` for the default namespace
    pub fn prefix(&self) -> Option<&str> {
        non_empty(self.document.view().str(self.prefix))
    }

    pub fn uri(&self) -> &str {
        self.document.view().str(self.uri)
    }

    pub fn string_value(&self) -> String {
        self.uri().to_string()
    }

    /// Iterate an axis, keeping only items that pass `test`
    pub fn axis(&self, axis: Axis, test: Option<NodeTest>) -> AxisIter {
        axis::from_namespace(self, axis, test)
    }

    /// Emit this binding as a single event
    pub fn to_events<H>(&self, handler: &mut H, _options: EventOptions) -> Result<(), H::Error>
    where
        H: EventHandler + ?Sized,
    {
        let view = self.document.view();
        handler.namespace(view.str(self.prefix), view.str(self.uri))
    }

    /// Copy into a new namespace-only document
    pub fn copy_to_document(&self, options: EventOptions) -> Result<Document, BuildError> {
        let mut builder = Builder::new();
        self.to_events(&mut builder, options)?;
        builder.finish()
    }
}

impl PartialEq for NamespaceNode {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner && self.order == other.order && self.document.ptr_eq(&other.document)
    }
}

impl Eq for NamespaceNode {}

impl Hash for NamespaceNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.document.id().hash(state);
        self.owner.hash(state);
        self.order.hash(state);
    }
}

impl fmt::Debug for NamespaceNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamespaceNode")
            .field("document", &self.document.id())
            .field("owner", &self.owner)
            .field("prefix", &self.prefix().unwrap_or_default())
            .field("uri", &self.uri())
            .finish()
    }
}
